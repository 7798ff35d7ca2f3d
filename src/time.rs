//! Millisecond timestamps and the small amount of calendar math the popups
//! and the synthetic generator need.

pub const MS_PER_HOUR: i64 = 60 * 60 * 1000;
pub const MS_PER_DAY: i64 = 24 * MS_PER_HOUR;

/// Wall-clock now in milliseconds since the Unix epoch.
#[cfg(target_arch = "wasm32")]
pub fn now_ms() -> i64 {
    js_sys::Date::now() as i64
}

/// Wall-clock now in milliseconds since the Unix epoch.
#[cfg(not(target_arch = "wasm32"))]
pub fn now_ms() -> i64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0)
}

/// Civil date from days since 1970-01-01 (proleptic Gregorian).
fn civil_from_days(days: i64) -> (i64, u32, u32) {
    let z = days + 719_468;
    let era = z.div_euclid(146_097);
    let doe = z.rem_euclid(146_097);
    let yoe = (doe - doe / 1460 + doe / 36_524 - doe / 146_096) / 365;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let day = (doy - (153 * mp + 2) / 5 + 1) as u32;
    let month = (if mp < 10 { mp + 3 } else { mp - 9 }) as u32;
    let year = yoe + era * 400 + i64::from(month <= 2);
    (year, month, day)
}

/// Formats `ms` as `YYYY-MM-DDTHH:MM:SS.mmmZ`.
pub fn iso8601_from_ms(ms: i64) -> String {
    let days = ms.div_euclid(MS_PER_DAY);
    let rem = ms.rem_euclid(MS_PER_DAY);
    let (year, month, day) = civil_from_days(days);
    let hours = rem / MS_PER_HOUR;
    let minutes = (rem / 60_000) % 60;
    let seconds = (rem / 1000) % 60;
    let millis = rem % 1000;
    format!("{year:04}-{month:02}-{day:02}T{hours:02}:{minutes:02}:{seconds:02}.{millis:03}Z")
}

/// Turns an ISO-8601 UTC timestamp into `YYYY-MM-DD HH:MM UTC` for popups.
///
/// Only `Z` and `+00:00` inputs are relabelled. Timestamps with any other
/// offset, and anything that does not look like `YYYY-MM-DDTHH:MM...`, are
/// returned as is.
pub fn format_timestamp(iso: &str) -> String {
    let bytes = iso.as_bytes();
    let shaped = bytes.len() >= 16
        && bytes[4] == b'-'
        && bytes[7] == b'-'
        && (bytes[10] == b'T' || bytes[10] == b' ')
        && bytes[13] == b':';
    if !shaped || !iso.is_char_boundary(16) || !is_utc(iso) {
        return iso.to_string();
    }
    format!("{} {} UTC", &iso[..10], &iso[11..16])
}

fn is_utc(iso: &str) -> bool {
    iso.ends_with('Z') || iso.ends_with("+00:00") || iso.ends_with("+0000")
}
