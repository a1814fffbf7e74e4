use chrono::prelude::*;
use chrono_tz::Tz;

/// Parses a `D/M/YYYY` civil date (1-2 digit day and month, 4 digit year).
/// Any other shape is treated as a missing date, not an error.
pub fn parse_civil_date(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    let mut parts = text.split('/');
    let day = parts.next()?;
    let month = parts.next()?;
    let year = parts.next()?;
    if parts.next().is_some() {
        return None;
    }
    if day.is_empty() || day.len() > 2 || month.is_empty() || month.len() > 2 || year.len() != 4 {
        return None;
    }
    for part in &[day, month, year] {
        if !part.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
    }
    let day = day.parse().ok()?;
    let month = month.parse().ok()?;
    let year = year.parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

/// The calendar day at the given instant as observed in `tz`, independent
/// of the host timezone.
pub fn civil_day_at(timestamp_millis: i64, tz: Tz) -> NaiveDate {
    Utc.timestamp_millis(timestamp_millis)
        .with_timezone(&tz)
        .naive_local()
        .date()
}

/// Whole-day difference `a - b`. Both operands are civil days, so the
/// result is exact across DST transitions.
pub fn day_diff(a: NaiveDate, b: NaiveDate) -> i64 {
    a.signed_duration_since(b).num_days()
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn it_parses_valid_civil_dates() {
        let cases = vec![
            ("1/1/2025", (2025, 1, 1)),
            ("01/01/2025", (2025, 1, 1)),
            ("31/12/2024", (2024, 12, 31)),
            ("29/2/2024", (2024, 2, 29)),
            (" 5/7/2025 ", (2025, 7, 5)),
        ];
        for (text, (y, m, d)) in cases {
            assert_eq!(parse_civil_date(text), Some(NaiveDate::from_ymd(y, m, d)));
        }
    }

    #[test]
    fn it_rejects_invalid_civil_dates() {
        let cases = vec![
            "",
            "2025-01-01",
            "1/1/25",
            "32/1/2025",
            "29/2/2025",
            "1/13/2025",
            "1/1/2025/1",
            "a/b/cdef",
            "001/1/2025",
        ];
        for text in cases {
            assert_eq!(parse_civil_date(text), None);
        }
    }

    #[test]
    fn civil_day_follows_the_configured_timezone() {
        let tz: Tz = "Europe/Madrid".parse().unwrap();
        // 23:30 UTC is already the next day in Madrid (UTC+1 in winter)
        let ts = Utc.ymd(2025, 1, 5).and_hms(23, 30, 0).timestamp_millis();
        assert_eq!(civil_day_at(ts, tz), NaiveDate::from_ymd(2025, 1, 6));
        // but not yet in UTC itself
        assert_eq!(civil_day_at(ts, chrono_tz::UTC), NaiveDate::from_ymd(2025, 1, 5));
    }

    #[test]
    fn day_diff_is_exact_across_dst_transitions() {
        // Spain springs forward on 2025-03-30
        let before = NaiveDate::from_ymd(2025, 3, 29);
        let after = NaiveDate::from_ymd(2025, 3, 31);
        assert_eq!(day_diff(after, before), 2);
        assert_eq!(day_diff(before, after), -2);

        // and falls back on 2024-10-27
        let before = NaiveDate::from_ymd(2024, 10, 26);
        let after = NaiveDate::from_ymd(2024, 10, 28);
        assert_eq!(day_diff(after, before), 2);
    }
}
