//! Streak calculation over completed calendar dates
//!
//! Pure functions over the completed subset of a habit's log history. All
//! comparisons are calendar-date based (no time of day); callers compute
//! "today" once per operation and pass it in, so a single operation never
//! straddles a date boundary.
//!
//! The current streak is anchored to today or yesterday: a habit completed
//! yesterday but not yet today still counts as active (grace period until
//! end of day), while a most-recent completion two or more days back means
//! the streak is broken.

use chrono::{Days, NaiveDate};
use serde::Serialize;
use utoipa::ToSchema;

use crate::core::constants::WEEK_STRIP_DAYS;

/// Completion state of one day in the trailing week strip
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct DayCompletion {
    /// Calendar date (`YYYY-MM-DD`)
    pub date: NaiveDate,
    /// Short weekday name (Mon, Tue, ...)
    pub weekday: String,
    pub completed: bool,
}

/// Length of the active run ending today or yesterday
///
/// Dates may arrive in any order; duplicates are tolerated defensively even
/// though the store's uniqueness constraint should make them impossible.
pub fn current_streak(completed: &[NaiveDate], today: NaiveDate) -> u32 {
    let Some(&most_recent) = completed.iter().max() else {
        return 0;
    };

    let yesterday = today - Days::new(1);
    if most_recent < yesterday {
        // Last completion was 2+ days ago, streak is broken
        return 0;
    }

    let mut dates: Vec<NaiveDate> = completed.to_vec();
    dates.sort_unstable_by(|a, b| b.cmp(a));

    let mut streak = 1u32;
    let mut cursor = most_recent;
    for &date in dates.iter().skip(1) {
        if date == cursor - Days::new(1) {
            streak += 1;
            cursor = date;
        } else if date == cursor {
            // Logical duplicate, ignore
            continue;
        } else {
            // Gap found
            break;
        }
    }

    streak
}

/// Longest run of consecutive days ever observed in the given history
pub fn longest_streak(completed: &[NaiveDate]) -> u32 {
    if completed.is_empty() {
        return 0;
    }

    let mut dates: Vec<NaiveDate> = completed.to_vec();
    dates.sort_unstable();

    let mut max_run = 1u32;
    let mut run = 1u32;
    let mut prev = dates[0];
    for &date in dates.iter().skip(1) {
        if date == prev + Days::new(1) {
            run += 1;
        } else if date == prev {
            // Same day, ignore
        } else {
            run = 1;
        }
        max_run = max_run.max(run);
        prev = date;
    }

    max_run
}

/// Fraction of the trailing `window_days` (inclusive of today) with a
/// completed record, in [0, 1]
///
/// Does not account for the habit's creation date: a habit created three
/// days ago evaluated over a 30-day window necessarily shows a low rate.
/// That is accepted behavior, keeping the computation stateless.
pub fn completion_rate(completed: &[NaiveDate], window_days: u32, today: NaiveDate) -> f64 {
    if window_days == 0 {
        return 0.0;
    }

    let start = today - Days::new(u64::from(window_days) - 1);
    let hits = completed
        .iter()
        .filter(|&&d| d >= start && d <= today)
        .count();

    hits as f64 / f64::from(window_days)
}

/// Completion status for the last seven days, oldest first
pub fn week_strip(completed: &[NaiveDate], today: NaiveDate) -> Vec<DayCompletion> {
    (0..WEEK_STRIP_DAYS)
        .rev()
        .map(|back| {
            let date = today - Days::new(u64::from(back));
            DayCompletion {
                date,
                weekday: date.format("%a").to_string(),
                completed: completed.contains(&date),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    /// today - n days
    fn back(today: NaiveDate, n: u64) -> NaiveDate {
        today - Days::new(n)
    }

    const TODAY: fn() -> NaiveDate = || d(2025, 6, 15);

    #[test]
    fn test_current_streak_empty() {
        assert_eq!(current_streak(&[], TODAY()), 0);
    }

    #[test]
    fn test_current_streak_only_today() {
        assert_eq!(current_streak(&[TODAY()], TODAY()), 1);
    }

    #[test]
    fn test_current_streak_grace_period_yesterday() {
        // Completed yesterday but not yet today: streak still active
        let today = TODAY();
        assert_eq!(current_streak(&[back(today, 1)], today), 1);
    }

    #[test]
    fn test_current_streak_broken_two_days_ago() {
        let today = TODAY();
        assert_eq!(current_streak(&[back(today, 2)], today), 0);
        assert_eq!(current_streak(&[back(today, 30)], today), 0);
    }

    #[test]
    fn test_current_streak_consecutive_run_ending_today() {
        let today = TODAY();
        let dates = [back(today, 2), back(today, 1), today];
        assert_eq!(current_streak(&dates, today), 3);
    }

    #[test]
    fn test_current_streak_yesterday_and_today() {
        let today = TODAY();
        assert_eq!(current_streak(&[back(today, 1), today], today), 2);
    }

    #[test]
    fn test_current_streak_stops_at_gap() {
        let today = TODAY();
        // D-4, D-3 then gap, then D-1, D
        let dates = [back(today, 4), back(today, 3), back(today, 1), today];
        assert_eq!(current_streak(&dates, today), 2);
    }

    #[test]
    fn test_current_streak_older_run_does_not_count() {
        // Completions on D-4, D-3, D-2 with nothing since: broken
        let today = TODAY();
        let dates = [back(today, 4), back(today, 3), back(today, 2)];
        assert_eq!(current_streak(&dates, today), 0);
    }

    #[test]
    fn test_current_streak_unsorted_input() {
        let today = TODAY();
        let dates = [today, back(today, 2), back(today, 1)];
        assert_eq!(current_streak(&dates, today), 3);
    }

    #[test]
    fn test_current_streak_tolerates_duplicates() {
        // Should not occur given the unique index, handled defensively
        let today = TODAY();
        let dates = [today, today, back(today, 1), back(today, 1)];
        assert_eq!(current_streak(&dates, today), 2);
    }

    #[test]
    fn test_current_streak_future_anchor() {
        // A forward-dated completion anchors the walk without counting twice
        let today = TODAY();
        let dates = [today, back(today, 1)];
        assert_eq!(current_streak(&dates, back(today, 1)), 2);
    }

    #[test]
    fn test_longest_streak_empty() {
        assert_eq!(longest_streak(&[]), 0);
    }

    #[test]
    fn test_longest_streak_single() {
        assert_eq!(longest_streak(&[TODAY()]), 1);
    }

    #[test]
    fn test_longest_streak_finds_middle_run() {
        let today = TODAY();
        let dates = [
            back(today, 10),
            back(today, 6),
            back(today, 5),
            back(today, 4),
            back(today, 1),
        ];
        assert_eq!(longest_streak(&dates), 3);
    }

    #[test]
    fn test_longest_streak_independent_of_today() {
        // Old run of 3, nothing recent: longest is still 3
        let today = TODAY();
        let dates = [back(today, 4), back(today, 3), back(today, 2)];
        assert_eq!(longest_streak(&dates), 3);
        assert_eq!(current_streak(&dates, today), 0);
    }

    #[test]
    fn test_longest_streak_ties_pick_max() {
        let today = TODAY();
        let dates = [
            back(today, 9),
            back(today, 8),
            back(today, 5),
            back(today, 4),
            back(today, 1),
            today,
        ];
        assert_eq!(longest_streak(&dates), 2);
    }

    #[test]
    fn test_longest_streak_duplicates_do_not_inflate() {
        let today = TODAY();
        let dates = [back(today, 1), back(today, 1), today];
        assert_eq!(longest_streak(&dates), 2);
    }

    #[test]
    fn test_longest_streak_spans_month_boundary() {
        let dates = [d(2025, 1, 30), d(2025, 1, 31), d(2025, 2, 1)];
        assert_eq!(longest_streak(&dates), 3);
    }

    #[test]
    fn test_completion_rate_empty() {
        assert_eq!(completion_rate(&[], 30, TODAY()), 0.0);
    }

    #[test]
    fn test_completion_rate_window_inclusive_of_today() {
        let today = TODAY();
        // 7-day window covers D-6..=D
        assert_eq!(completion_rate(&[back(today, 6)], 7, today), 1.0 / 7.0);
        assert_eq!(completion_rate(&[back(today, 7)], 7, today), 0.0);
    }

    #[test]
    fn test_completion_rate_full_window() {
        let today = TODAY();
        let dates: Vec<NaiveDate> = (0..7).map(|n| back(today, n)).collect();
        assert_eq!(completion_rate(&dates, 7, today), 1.0);
    }

    #[test]
    fn test_completion_rate_ignores_dates_outside_window() {
        let today = TODAY();
        let dates = [today, back(today, 40)];
        assert_eq!(completion_rate(&dates, 30, today), 1.0 / 30.0);
    }

    #[test]
    fn test_completion_rate_zero_window() {
        assert_eq!(completion_rate(&[TODAY()], 0, TODAY()), 0.0);
    }

    #[test]
    fn test_week_strip_shape() {
        let today = TODAY();
        let strip = week_strip(&[today, back(today, 2)], today);
        assert_eq!(strip.len(), 7);
        assert_eq!(strip[6].date, today);
        assert_eq!(strip[0].date, back(today, 6));
        assert!(strip[6].completed);
        assert!(strip[4].completed);
        assert!(!strip[5].completed);
    }

    #[test]
    fn test_week_strip_weekday_names() {
        // 2025-06-15 is a Sunday
        let strip = week_strip(&[], TODAY());
        assert_eq!(strip[6].weekday, "Sun");
        assert_eq!(strip[5].weekday, "Sat");
        assert_eq!(strip[0].weekday, "Mon");
    }
}
