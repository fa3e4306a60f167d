//! Shared building blocks for pacer
//!
//! This crate provides:
//! - The error taxonomy used across the workspace
//! - A validated, non-negative [`Delay`] type
//! - The TOML configuration model
//! - Small value helpers (emptiness check, shallow merge)

pub mod config;
pub mod delay;
pub mod error;
pub mod value;

// Re-exports
pub use config::{DebounceConfig, LogConfig, PacerConfig, ThrottleConfig};
pub use delay::Delay;
pub use error::{PacerError, Result};
