//! Library half of the `pacer` binary
//!
//! Kept separate from `main.rs` so the schedule replay and config handling
//! can be exercised from integration tests.

pub mod logging;
pub mod schedule;
pub mod simulate;
pub mod system_config;
