use jiff::Timestamp;
use jiff::civil::{Date, DateTime, Time};
use jiff::tz::TimeZone;

/// Parse a backend date into an instant.
///
/// Accepts RFC 3339 instants, civil date-times (`2024-03-01T08:30:00`, read
/// as UTC) and plain dates (midnight UTC).
pub fn parse_instant(raw: &str) -> Option<Timestamp> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(ts) = raw.parse::<Timestamp>() {
        return Some(ts);
    }
    if let Ok(dt) = raw.parse::<DateTime>() {
        return dt.to_zoned(TimeZone::UTC).ok().map(|z| z.timestamp());
    }
    let date = raw.parse::<Date>().ok()?;
    date.to_datetime(Time::midnight())
        .to_zoned(TimeZone::UTC)
        .ok()
        .map(|z| z.timestamp())
}
