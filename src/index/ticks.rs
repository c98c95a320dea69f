//! Timestamp ticks: 100-nanosecond intervals since 0001-01-01T00:00:00Z.

use chrono::{DateTime, Utc};

const TICKS_PER_SECOND: i64 = 10_000_000;
const NANOS_PER_TICK: i64 = 100;
/// Ticks between 0001-01-01 and the Unix epoch
const UNIX_EPOCH_TICKS: i64 = 621_355_968_000_000_000;

pub fn to_ticks(ts: DateTime<Utc>) -> i64 {
    let subsec = i64::from(ts.timestamp_subsec_nanos()) / NANOS_PER_TICK;
    ts.timestamp()
        .saturating_mul(TICKS_PER_SECOND)
        .saturating_add(subsec)
        .saturating_add(UNIX_EPOCH_TICKS)
}

/// Inverse of [`to_ticks`]; `None` when out of chrono's representable range
pub fn from_ticks(ticks: i64) -> Option<DateTime<Utc>> {
    let since_epoch = ticks.checked_sub(UNIX_EPOCH_TICKS)?;
    let secs = since_epoch.div_euclid(TICKS_PER_SECOND);
    let nanos = since_epoch.rem_euclid(TICKS_PER_SECOND) * NANOS_PER_TICK;
    DateTime::from_timestamp(secs, u32::try_from(nanos).ok()?)
}

/// Drop sub-tick precision so a timestamp survives a persist/restore cycle
pub fn truncate(ts: DateTime<Utc>) -> DateTime<Utc> {
    from_ticks(to_ticks(ts)).unwrap_or(ts)
}
