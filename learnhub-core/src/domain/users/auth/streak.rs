//! Login streak state machine.
//!
//! A streak counts consecutive calendar days with at least one login.
//! Calendar days are taken at a fixed UTC offset so the result does not
//! depend on the host timezone.

use chrono::{DateTime, FixedOffset, NaiveDate, Offset, Utc};
use learnhub_model::StreakState;

/// Maps instants to calendar days at a fixed offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreakCalendar {
    offset: FixedOffset,
}

impl Default for StreakCalendar {
    fn default() -> Self {
        Self::utc()
    }
}

impl StreakCalendar {
    pub fn utc() -> Self {
        Self {
            offset: Utc.fix(),
        }
    }

    pub fn with_offset(offset: FixedOffset) -> Self {
        Self { offset }
    }

    /// `None` when `seconds_east` is outside +/- 24h.
    pub fn from_offset_seconds(seconds_east: i32) -> Option<Self> {
        FixedOffset::east_opt(seconds_east).map(Self::with_offset)
    }

    pub fn offset(&self) -> FixedOffset {
        self.offset
    }

    pub fn day_of(&self, instant: DateTime<Utc>) -> NaiveDate {
        instant.with_timezone(&self.offset).date_naive()
    }

    /// Applies one login at `now`. Returns `None` when the user already
    /// logged in today and nothing needs to be written.
    pub fn next_state(
        &self,
        now: DateTime<Utc>,
        previous: &StreakState,
    ) -> Option<StreakState> {
        let today = self.day_of(now);
        let last_day = previous.last_login.map(|at| self.day_of(at));
        if last_day == Some(today) {
            return None;
        }

        let (current, longest) =
            advance_streak(today, last_day, previous.current, previous.longest);
        Some(StreakState {
            last_login: Some(now),
            current,
            longest,
        })
    }
}

/// Pure streak transition for a login on `today`.
///
/// Same day leaves the counters untouched, yesterday extends the streak,
/// anything else (including no prior login) restarts it at 1. The longest
/// streak never decreases.
pub fn advance_streak(
    today: NaiveDate,
    last_login_day: Option<NaiveDate>,
    current: u32,
    longest: u32,
) -> (u32, u32) {
    if last_login_day == Some(today) {
        return (current, longest);
    }

    let yesterday = today.pred_opt();
    let current = if last_login_day.is_some() && last_login_day == yesterday {
        current.saturating_add(1)
    } else {
        1
    };
    (current, longest.max(current))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn transition_table() {
        let today = day(2025, 6, 10);

        assert_eq!(advance_streak(today, Some(today), 4, 9), (4, 9));
        assert_eq!(advance_streak(today, Some(day(2025, 6, 9)), 3, 3), (4, 4));
        assert_eq!(advance_streak(today, Some(day(2025, 6, 7)), 5, 8), (1, 8));
        assert_eq!(advance_streak(today, None, 0, 0), (1, 1));
    }

    #[test]
    fn longest_never_decreases() {
        let today = day(2025, 6, 10);
        for (last, current, longest) in
            [(Some(day(2025, 6, 9)), 2, 10), (None, 7, 7), (Some(day(2024, 1, 1)), 30, 30)]
        {
            let (_, next_longest) = advance_streak(today, last, current, longest);
            assert!(next_longest >= longest);
        }
    }

    #[test]
    fn month_boundaries_count_as_yesterday() {
        assert_eq!(
            advance_streak(day(2025, 3, 1), Some(day(2025, 2, 28)), 1, 1),
            (2, 2)
        );
    }

    #[test]
    fn same_day_login_writes_nothing() {
        let calendar = StreakCalendar::utc();
        let morning = Utc.with_ymd_and_hms(2025, 6, 10, 8, 0, 0).unwrap();
        let previous = StreakState {
            last_login: Some(morning),
            current: 2,
            longest: 5,
        };
        assert_eq!(calendar.next_state(morning + Duration::hours(10), &previous), None);
    }

    #[test]
    fn offset_decides_the_calendar_day() {
        // 23:30 UTC on the 9th is already the 10th at UTC+2.
        let late = Utc.with_ymd_and_hms(2025, 6, 9, 23, 30, 0).unwrap();
        let previous = StreakState {
            last_login: Some(Utc.with_ymd_and_hms(2025, 6, 9, 8, 0, 0).unwrap()),
            current: 1,
            longest: 1,
        };

        assert_eq!(StreakCalendar::utc().next_state(late, &previous), None);

        let plus_two = StreakCalendar::from_offset_seconds(2 * 3600).unwrap();
        let next = plus_two.next_state(late, &previous).unwrap();
        assert_eq!((next.current, next.longest), (2, 2));
        assert_eq!(next.last_login, Some(late));
    }
}
