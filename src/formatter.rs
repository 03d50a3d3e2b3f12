use chrono::{Local, NaiveDate, NaiveDateTime, TimeZone};

const DAY_CODE_FORMAT: &str = "%Y%m%d";
const DAY_CODE_WITH_TIME_FORMAT: &str = "%Y%m%d%H%M";

/// Parse a day code (`YYYYMMDD` or `YYYYMMDDHHMM`) into a local date-time.
///
/// A bare day resolves to midnight.
pub fn parse_day_code(code: &str) -> Option<NaiveDateTime> {
    let code = code.trim();
    match code.len() {
        8 => NaiveDate::parse_from_str(code, DAY_CODE_FORMAT)
            .ok()
            .and_then(|d| d.and_hms_opt(0, 0, 0)),
        12 => NaiveDateTime::parse_from_str(code, DAY_CODE_WITH_TIME_FORMAT).ok(),
        _ => None,
    }
}

pub fn event_date(dt: &NaiveDateTime) -> String {
    dt.format("%-d %B %Y").to_string()
}

pub fn event_time(dt: &NaiveDateTime) -> String {
    dt.format("%H:%M").to_string()
}

/// Unix seconds of a local wall-clock time, or `None` if the local zone
/// skips it. Ambiguous times resolve to the earlier instant.
pub fn unix_seconds(dt: &NaiveDateTime) -> Option<i64> {
    let local = Local.from_local_datetime(dt).earliest()?;
    Some(local.timestamp_millis() / 1000)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn parses_bare_day_as_midnight() {
        let dt = parse_day_code("20240310").unwrap();
        assert_eq!((dt.year(), dt.month(), dt.day()), (2024, 3, 10));
        assert_eq!((dt.hour(), dt.minute(), dt.second()), (0, 0, 0));
    }

    #[test]
    fn parses_day_with_time() {
        let dt = parse_day_code("202403101000").unwrap();
        assert_eq!((dt.day(), dt.hour(), dt.minute()), (10, 10, 0));
    }

    #[test]
    fn rejects_garbage() {
        assert_eq!(parse_day_code(""), None);
        assert_eq!(parse_day_code("2024-03-10"), None);
        assert_eq!(parse_day_code("20241340"), None);
        assert_eq!(parse_day_code("2024031025"), None);
    }

    #[test]
    fn labels() {
        let dt = parse_day_code("202403100905").unwrap();
        assert_eq!(event_date(&dt), "10 March 2024");
        assert_eq!(event_time(&dt), "09:05");
    }

    #[test]
    fn unix_seconds_follow_local_zone() {
        let dt = parse_day_code("202403101000").unwrap();
        let expected = Local.from_local_datetime(&dt).earliest().unwrap().timestamp();
        assert_eq!(unix_seconds(&dt), Some(expected));
    }
}
