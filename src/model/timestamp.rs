use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeDelta, Utc};

/// Parse a message timestamp into a point in time.
///
/// Accepted forms, tried in order: RFC 3339, a naive ISO date-time (read
/// as UTC), a bare `YYYY-MM-DD`, `YYYY-MM` or `YYYY` date (UTC midnight of
/// its first day), and decimal Unix epoch seconds such as
/// `1704067200.000100`.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }

    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(naive.and_utc());
        }
    }

    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0).map(|naive| naive.and_utc());
    }

    if let Some(date) = parse_partial_date(raw) {
        return date.and_hms_opt(0, 0, 0).map(|naive| naive.and_utc());
    }

    parse_epoch(raw)
}

/// `YYYY` or `YYYY-MM`. Four digits are a year, never epoch seconds.
fn parse_partial_date(raw: &str) -> Option<NaiveDate> {
    let (year, month) = match raw.split_once('-') {
        Some((year, month)) if month.len() == 2 => (year, month),
        Some(_) => return None,
        None => (raw, "01"),
    };
    if year.len() != 4 || !year.bytes().chain(month.bytes()).all(|b| b.is_ascii_digit()) {
        return None;
    }
    NaiveDate::from_ymd_opt(year.parse().ok()?, month.parse().ok()?, 1)
}

fn parse_epoch(raw: &str) -> Option<DateTime<Utc>> {
    let (secs, frac) = match raw.split_once('.') {
        Some((secs, frac)) => (secs, frac),
        None => (raw, ""),
    };
    if secs.is_empty() || !frac.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let negative = secs.starts_with('-');
    let secs: i64 = secs.parse().ok()?;

    // Right-pad (or truncate) the fraction to nanoseconds.
    let mut nanos: u32 = 0;
    for (i, digit) in frac.bytes().take(9).enumerate() {
        nanos += u32::from(digit - b'0') * 10u32.pow(8 - i as u32);
    }

    // The fraction carries the sign of the whole value: -0.5 is half a
    // second before the epoch.
    let base = DateTime::from_timestamp(secs, 0)?;
    let frac = TimeDelta::nanoseconds(i64::from(nanos));
    if negative {
        base.checked_sub_signed(frac)
    } else {
        base.checked_add_signed(frac)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn parses_rfc3339_with_offset() {
        let parsed = parse_timestamp("2024-01-02T12:00:00+02:00").unwrap();
        assert_eq!(parsed, Utc.with_ymd_and_hms(2024, 1, 2, 10, 0, 0).unwrap());
    }

    #[test]
    fn parses_bare_date_as_utc_midnight() {
        let parsed = parse_timestamp("2024-01-03").unwrap();
        assert_eq!(parsed, Utc.with_ymd_and_hms(2024, 1, 3, 0, 0, 0).unwrap());
    }

    #[test]
    fn parses_naive_datetime() {
        let parsed = parse_timestamp("2024-01-03T08:30:00.250").unwrap();
        assert_eq!(parsed.timestamp_subsec_millis(), 250);
    }

    #[test]
    fn parses_epoch_seconds_with_fraction() {
        let parsed = parse_timestamp("1704067200.000100").unwrap();
        assert_eq!(parsed.timestamp(), 1_704_067_200);
        assert_eq!(parsed.timestamp_subsec_micros(), 100);
    }

    #[test]
    fn parses_integer_epoch() {
        let parsed = parse_timestamp("1704067200").unwrap();
        assert_eq!(parsed, Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap());
    }

    #[test]
    fn negative_epoch_fraction_moves_backwards() {
        let parsed = parse_timestamp("-0.5").unwrap();
        assert_eq!(parsed.timestamp_millis(), -500);

        let parsed = parse_timestamp("-10.25").unwrap();
        assert_eq!(parsed.timestamp_millis(), -10_250);
    }

    #[test]
    fn four_digits_are_a_year() {
        let parsed = parse_timestamp("2024").unwrap();
        assert_eq!(parsed, Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap());

        let parsed = parse_timestamp("2024-03").unwrap();
        assert_eq!(parsed, Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap());
    }

    #[test]
    fn short_and_long_integers_stay_epoch_seconds() {
        assert_eq!(parse_timestamp("60").unwrap().timestamp(), 60);
        assert_eq!(parse_timestamp("20240").unwrap().timestamp(), 20_240);
    }

    #[test]
    fn rejects_garbage() {
        assert!(parse_timestamp("").is_none());
        assert!(parse_timestamp("yesterday").is_none());
        assert!(parse_timestamp("12.ab").is_none());
        assert!(parse_timestamp(".5").is_none());
        assert!(parse_timestamp("2024-13").is_none());
    }
}
