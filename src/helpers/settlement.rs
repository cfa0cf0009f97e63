use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;
use tracing::warn;

/// Resolves an IANA zone name, falling back to UTC for anything unknown.
pub fn resolve_timezone(timezone: &str) -> Tz {
    match timezone.parse::<Tz>() {
        Ok(tz) => tz,
        Err(_) => {
            warn!("Unknown timezone {:?}, falling back to UTC", timezone);
            Tz::UTC
        },
    }
}

/// The calendar date `now` falls on in the given zone.
pub fn local_date(timezone: &str, now: DateTime<Utc>) -> NaiveDate {
    now.with_timezone(&resolve_timezone(timezone)).date_naive()
}

pub fn needs_settlement(last: Option<NaiveDate>, timezone: &str) -> bool {
    needs_settlement_at(last, timezone, Utc::now())
}

/// A user is due for settlement once their local calendar date has moved
/// past the last settled date. Users never settled are always due.
pub fn needs_settlement_at(
    last: Option<NaiveDate>,
    timezone: &str,
    now: DateTime<Utc>,
) -> bool {
    match last {
        None => true,
        Some(last) => last < local_date(timezone, now),
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone, Timelike};

    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn never_settled_needs_settlement() {
        assert!(needs_settlement(None, "Asia/Kolkata"));
        assert!(needs_settlement(None, "not/a_zone"));
    }

    #[test]
    fn kolkata_is_five_thirty_ahead() {
        let utc_midnight = Utc.with_ymd_and_hms(2026, 1, 16, 0, 0, 0).unwrap();
        let local = utc_midnight.with_timezone(&resolve_timezone("Asia/Kolkata"));

        assert_eq!(local.hour(), 5);
        assert_eq!(local.minute(), 30);
    }

    #[test]
    fn settled_today_is_not_due() {
        let now = Utc.with_ymd_and_hms(2026, 1, 16, 12, 0, 0).unwrap();
        assert!(!needs_settlement_at(
            Some(date(2026, 1, 16)),
            "Asia/Kolkata",
            now
        ));
    }

    #[test]
    fn settled_yesterday_is_due() {
        let now = Utc.with_ymd_and_hms(2026, 1, 16, 12, 0, 0).unwrap();
        assert!(needs_settlement_at(
            Some(date(2026, 1, 15)),
            "Asia/Kolkata",
            now
        ));
    }

    #[test]
    fn local_date_rolls_over_before_utc() {
        // 20:00 UTC on the 15th is already the 16th in Kolkata.
        let now = Utc.with_ymd_and_hms(2026, 1, 15, 20, 0, 0).unwrap();
        let last = Some(date(2026, 1, 15));

        assert!(needs_settlement_at(last, "Asia/Kolkata", now));
        assert!(!needs_settlement_at(last, "UTC", now));
    }

    #[test]
    fn local_date_lags_behind_utc_in_the_west() {
        // 02:00 UTC on the 16th is still the 15th in New York.
        let now = Utc.with_ymd_and_hms(2026, 1, 16, 2, 0, 0).unwrap();
        assert!(!needs_settlement_at(
            Some(date(2026, 1, 15)),
            "America/New_York",
            now
        ));
    }

    #[test]
    fn unknown_zone_behaves_like_utc() {
        let now = Utc.with_ymd_and_hms(2026, 1, 15, 20, 0, 0).unwrap();
        let last = Some(date(2026, 1, 15));

        assert_eq!(resolve_timezone("Mars/Olympus"), Tz::UTC);
        assert_eq!(
            needs_settlement_at(last, "Mars/Olympus", now),
            needs_settlement_at(last, "UTC", now)
        );
    }

    #[test]
    fn future_settlement_date_is_not_due() {
        let now = Utc::now();
        let tomorrow = (now + Duration::days(2)).date_naive();
        assert!(!needs_settlement_at(Some(tomorrow), "UTC", now));
    }
}
