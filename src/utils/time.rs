use chrono::{Duration, FixedOffset, NaiveDateTime, NaiveTime, Utc};

/// Parse a "HH:MM" 24-hour string into (hour, minute).
pub fn parse_hhmm(raw: &str) -> Option<(u32, u32)> {
    let (h, m) = raw.split_once(':')?;
    let hour: u32 = h.parse().ok()?;
    let minute: u32 = m.parse().ok()?;
    if hour <= 23 && minute <= 59 {
        Some((hour, minute))
    } else {
        None
    }
}

pub fn is_valid_hhmm(raw: &str) -> bool {
    parse_hhmm(raw).is_some()
}

/// Start and end of the calendar day containing `moment`.
///
/// The end bound is the last representable instant before midnight, so a
/// closed `BETWEEN start AND end` range covers the whole day. "Same day"
/// for the duplicate-tracking check is defined by these bounds in the
/// configured local offset, mirroring the tracked_at timestamp semantics.
pub fn day_bounds(moment: NaiveDateTime) -> (NaiveDateTime, NaiveDateTime) {
    let start = moment.date().and_time(NaiveTime::MIN);
    let end = start + Duration::days(1) - Duration::microseconds(1);
    (start, end)
}

/// Current wall-clock time shifted by the configured UTC offset, as a
/// naive timestamp comparable to the stored `tracked_at` values.
pub fn local_now(offset_minutes: i32) -> NaiveDateTime {
    let offset = FixedOffset::east_opt(offset_minutes * 60)
        .unwrap_or_else(|| FixedOffset::east_opt(0).expect("zero offset is valid"));
    Utc::now().with_timezone(&offset).naive_local()
}

/// Cutoff for "within the trailing `days` days" windows.
pub fn days_ago(now: NaiveDateTime, days: i64) -> NaiveDateTime {
    now - Duration::days(days)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn parse_valid_times() {
        assert_eq!(parse_hhmm("21:00"), Some((21, 0)));
        assert_eq!(parse_hhmm("9:05"), Some((9, 5)));
        assert_eq!(parse_hhmm("00:00"), Some((0, 0)));
        assert_eq!(parse_hhmm("23:59"), Some((23, 59)));
    }

    #[test]
    fn parse_rejects_out_of_range() {
        assert_eq!(parse_hhmm("24:00"), None);
        assert_eq!(parse_hhmm("12:60"), None);
        assert_eq!(parse_hhmm("-1:30"), None);
    }

    #[test]
    fn parse_rejects_garbage() {
        assert_eq!(parse_hhmm(""), None);
        assert_eq!(parse_hhmm("noon"), None);
        assert_eq!(parse_hhmm("12"), None);
        assert_eq!(parse_hhmm("12:3:4"), None);
    }

    #[test]
    fn day_bounds_cover_whole_day() {
        let moment = NaiveDate::from_ymd_opt(2025, 9, 15)
            .unwrap()
            .and_hms_opt(14, 30, 12)
            .unwrap();
        let (start, end) = day_bounds(moment);
        assert_eq!(
            start,
            NaiveDate::from_ymd_opt(2025, 9, 15)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap()
        );
        assert!(end > moment);
        assert!(end < start + Duration::days(1));
    }

    #[test]
    fn day_bounds_at_midnight() {
        let midnight = NaiveDate::from_ymd_opt(2025, 9, 15)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        let (start, end) = day_bounds(midnight);
        assert_eq!(start, midnight);
        assert!(end > midnight);
    }

    #[test]
    fn days_ago_basic() {
        let now = NaiveDate::from_ymd_opt(2025, 9, 15)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap();
        let cutoff = days_ago(now, 7);
        assert_eq!(cutoff.date(), NaiveDate::from_ymd_opt(2025, 9, 8).unwrap());
    }
}
