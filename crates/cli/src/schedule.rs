//! Parsing of call schedules given on the command line

use pacer_core::{PacerError, Result};

/// Parse `"0,30,60"` into millisecond offsets
///
/// Offsets must be non-decreasing. Whitespace and an optional `ms` suffix on
/// each entry are accepted.
pub fn parse_offsets(text: &str) -> Result<Vec<u64>> {
    let mut offsets = Vec::new();

    for raw in text.split(',') {
        let entry = raw.trim();
        let entry = entry.strip_suffix("ms").unwrap_or(entry).trim();
        if entry.is_empty() {
            return Err(PacerError::invalid("at", format!("empty entry in '{text}'")));
        }

        let offset: u64 = entry
            .parse()
            .map_err(|_| PacerError::invalid("at", format!("not a millisecond offset: '{}'", raw.trim())))?;

        if let Some(&previous) = offsets.last() {
            if offset < previous {
                return Err(PacerError::invalid(
                    "at",
                    format!("offsets must not go backwards ({offset} after {previous})"),
                ));
            }
        }
        offsets.push(offset);
    }

    Ok(offsets)
}
