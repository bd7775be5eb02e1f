// Timestamp and filename helpers.
//
// The backend names stored frames `yyMMddhhmmss_mmm.bmp` and expects upload
// timestamps as epoch milliseconds. Filenames use the LOCAL calendar, the
// timestamp field does not depend on the zone. Both formats are part of the
// wire contract: a differently shaped filename is a compatibility bug.

use chrono::{Local, TimeZone, Utc};

use crate::error::{FrameError, Result};

/// Current wall-clock time as epoch milliseconds.
pub fn now_timestamp_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// Render the server-side filename for an epoch-millisecond timestamp:
/// two-digit year-of-century, zero-padded date/time fields, three-digit
/// millisecond, `.bmp` suffix. Uses the local calendar, like the original
/// capture service that names the files.
pub fn filename_for(timestamp_millis: i64) -> Result<String> {
    let dt = Local
        .timestamp_millis_opt(timestamp_millis)
        .single()
        .ok_or(FrameError::InvalidTimestamp(timestamp_millis))?;
    Ok(format!(
        "{}_{:03}.bmp",
        dt.format("%y%m%d%H%M%S"),
        dt.timestamp_subsec_millis()
    ))
}

/// Convert an explicit local date/time tuple to epoch milliseconds.
///
/// Fails for tuples that name no local instant (or an ambiguous one around
/// a daylight-saving transition).
pub fn datetime_to_millis(
    year: i32,
    month: u32,
    day: u32,
    hour: u32,
    minute: u32,
    second: u32,
    millis: i64,
) -> Result<i64> {
    let dt = Local
        .with_ymd_and_hms(year, month, day, hour, minute, second)
        .single()
        .ok_or(FrameError::InvalidDateTime {
            year,
            month,
            day,
            hour,
            minute,
            second,
        })?;
    Ok(dt.timestamp_millis() + millis)
}
