//! SOA serial sequencing in the `YYYYMMDDnn` convention.

use chrono::NaiveDate;
use tracing::debug;

use crate::error::{Error, Result};

/// Highest daily sequence that still fits the two-digit suffix.
pub const MAX_DAILY_SEQUENCE: u32 = 99;

/// Format `date` as the 8-digit serial prefix.
pub fn date_prefix(date: NaiveDate) -> String {
    date.format("%Y%m%d").to_string()
}

/// The first serial of `today`.
pub fn initial_serial(today: NaiveDate) -> String {
    format!("{}01", date_prefix(today))
}

/// Compute the serial that follows `current` on `today`.
///
/// A serial from another day (or an empty/garbled one) restarts at `today` + `01`. A serial
/// from today gets its sequence bumped by one; running past 99 is an error instead of
/// producing an 11-character serial.
pub fn next_serial(current: &str, today: NaiveDate) -> Result<String> {
    let prefix = date_prefix(today);

    let Some(sequence) = current.strip_prefix(prefix.as_str()) else {
        debug!(current, "serial date is stale, starting a new day");
        return Ok(initial_serial(today));
    };

    let n: u32 = sequence.parse().map_err(|_| Error::InvalidSerial {
        serial: current.to_string(),
    })?;

    if n >= MAX_DAILY_SEQUENCE {
        return Err(Error::SerialOverflow { date: prefix });
    }

    Ok(format!("{prefix}{:02}", n + 1))
}

#[cfg(test)]
#[path = "serial_tests.rs"]
mod tests;
