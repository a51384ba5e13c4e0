//! FILETIME conversions
//!
//! Identifiers are creation timestamps in FILETIME ticks: 100-nanosecond
//! intervals since 1601-01-01 UTC. One tick is the unit used when two entries
//! collide and one of them has to be nudged forward.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Stable per-entry key, a creation timestamp in FILETIME ticks
pub type Identifier = i64;

/// Ticks between 1601-01-01 and 1970-01-01
pub const UNIX_EPOCH_TICKS: i64 = 116_444_736_000_000_000;

const NANOS_PER_TICK: i128 = 100;

/// Convert a `SystemTime` to FILETIME ticks, saturating at the `i64` range
#[must_use]
pub fn filetime_from_system(time: SystemTime) -> Identifier {
    let nanos: i128 = match time.duration_since(UNIX_EPOCH) {
        Ok(after) => i128::try_from(after.as_nanos()).unwrap_or(i128::MAX),
        Err(e) => -i128::try_from(e.duration().as_nanos()).unwrap_or(i128::MAX),
    };
    let ticks = nanos.div_euclid(NANOS_PER_TICK) + i128::from(UNIX_EPOCH_TICKS);
    i64::try_from(ticks).unwrap_or(if ticks < 0 { i64::MIN } else { i64::MAX })
}

/// Convert FILETIME ticks back to a `SystemTime`
#[must_use]
pub fn system_from_filetime(ticks: Identifier) -> SystemTime {
    let since_unix = i128::from(ticks) - i128::from(UNIX_EPOCH_TICKS);
    let nanos = since_unix * NANOS_PER_TICK;
    let magnitude = Duration::from_nanos(u64::try_from(nanos.unsigned_abs()).unwrap_or(u64::MAX));
    if nanos >= 0 {
        UNIX_EPOCH + magnitude
    } else {
        UNIX_EPOCH - magnitude
    }
}
