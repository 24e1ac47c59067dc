//! Activity summaries: 30-day calendar, weekly digest and relative timestamps

use std::collections::HashMap;

use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};
use serde::Serialize;

pub const CALENDAR_DAYS: i64 = 30;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CalendarDay {
    pub date: NaiveDate,
    pub weekday: char,
    pub day: u32,
    pub count: i64,
    pub is_today: bool,
}

/// The last 30 days ending at `today`, oldest first
pub fn activity_calendar(today: NaiveDate, counts: &HashMap<NaiveDate, i64>) -> Vec<CalendarDay> {
    (0..CALENDAR_DAYS)
        .rev()
        .map(|back| {
            let date = today - Duration::days(back);
            CalendarDay {
                date,
                weekday: date.format("%a").to_string().chars().next().unwrap_or('?'),
                day: date.day(),
                count: counts.get(&date).copied().unwrap_or(0),
                is_today: back == 0,
            }
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WeeklyDigest {
    pub checkins: i64,
    pub last_week_checkins: i64,
    pub checkins_change: i64,
    pub checkin_rate: i64,
}

/// Compare the last seven days with the seven before them.
///
/// `this_week` counts dates in `(today - 7, today]`, `last_week` counts
/// `(today - 14, today - 7]`.
pub fn weekly_digest(this_week: i64, last_week: i64) -> WeeklyDigest {
    WeeklyDigest {
        checkins: this_week,
        last_week_checkins: last_week,
        checkins_change: this_week - last_week,
        checkin_rate: ((this_week as f64 / 7.0) * 100.0).round() as i64,
    }
}

/// Inclusive-exclusive bounds `(start, end]` for the current and previous week
pub fn digest_windows(today: NaiveDate) -> ((NaiveDate, NaiveDate), (NaiveDate, NaiveDate)) {
    let week_ago = today - Duration::days(7);
    let two_weeks_ago = today - Duration::days(14);
    ((week_ago, today), (two_weeks_ago, week_ago))
}

/// Short relative time such as "5m ago", falling back to "Mar 04" after a week
pub fn time_ago(ts: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let seconds = (now - ts).num_seconds();
    match seconds {
        s if s < 60 => "just now".to_string(),
        s if s < 3_600 => format!("{}m ago", s / 60),
        s if s < 86_400 => format!("{}h ago", s / 3_600),
        s if s < 604_800 => format!("{}d ago", s / 86_400),
        _ => ts.format("%b %d").to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_calendar_shape() {
        let today = NaiveDate::from_ymd_opt(2025, 3, 31).unwrap();
        let mut counts = HashMap::new();
        counts.insert(today, 2);
        counts.insert(today - Duration::days(29), 1);
        counts.insert(today - Duration::days(30), 9);

        let days = activity_calendar(today, &counts);
        assert_eq!(days.len(), 30);
        assert_eq!(days[0].date, NaiveDate::from_ymd_opt(2025, 3, 2).unwrap());
        assert_eq!(days[0].count, 1);
        assert_eq!(days[29].count, 2);
        assert!(days[29].is_today);
        assert_eq!(days[29].weekday, 'M');
        assert_eq!(days.iter().filter(|d| d.is_today).count(), 1);
    }

    #[test]
    fn test_weekly_digest() {
        let digest = weekly_digest(5, 7);
        assert_eq!(digest.checkins_change, -2);
        assert_eq!(digest.checkin_rate, 71);
        assert_eq!(weekly_digest(0, 0).checkin_rate, 0);
        assert_eq!(weekly_digest(7, 0).checkin_rate, 100);
    }

    #[test]
    fn test_digest_windows() {
        let today = NaiveDate::from_ymd_opt(2025, 3, 15).unwrap();
        let ((a, b), (c, d)) = digest_windows(today);
        assert_eq!(a, NaiveDate::from_ymd_opt(2025, 3, 8).unwrap());
        assert_eq!(b, today);
        assert_eq!(c, NaiveDate::from_ymd_opt(2025, 3, 1).unwrap());
        assert_eq!(d, a);
    }

    #[test]
    fn test_time_ago() {
        let now = Utc.with_ymd_and_hms(2025, 3, 15, 12, 0, 0).unwrap();
        assert_eq!(time_ago(now - Duration::seconds(5), now), "just now");
        assert_eq!(time_ago(now - Duration::minutes(5), now), "5m ago");
        assert_eq!(time_ago(now - Duration::hours(3), now), "3h ago");
        assert_eq!(time_ago(now - Duration::days(2), now), "2d ago");
        assert_eq!(time_ago(now - Duration::days(11), now), "Mar 04");
    }
}
