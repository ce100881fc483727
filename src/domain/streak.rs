//! Streak and completion-history calculations
//!
//! Pure functions over a sorted list of completion dates and an explicit
//! "today". The Habit entity delegates here with the current UTC date;
//! tests pin "today" to fixed dates.

use chrono::{Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// One day in a completion-history window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayCompletion {
    pub date: NaiveDate,
    pub completed: bool,
}

/// The current UTC calendar date. All "today" anchoring uses this.
pub fn today() -> NaiveDate {
    Utc::now().date_naive()
}

fn contains(dates: &[NaiveDate], date: NaiveDate) -> bool {
    // `dates` is kept sorted by the Habit entity
    dates.binary_search(&date).is_ok()
}

/// Count consecutive completed days walking backward from `today`.
///
/// Strictly anchored to `today`: a habit with an unbroken run ending
/// yesterday but nothing today has a streak of 0.
pub fn current_streak(dates: &[NaiveDate], today: NaiveDate) -> u32 {
    let mut streak = 0;
    let mut day = today;

    while contains(dates, day) {
        streak += 1;
        match day.pred_opt() {
            Some(prev) => day = prev,
            None => break,
        }
    }

    streak
}

/// Completion status for the last `days` calendar days ending at `today`,
/// oldest first. The result always has exactly `days` entries.
pub fn history(dates: &[NaiveDate], days: usize, today: NaiveDate) -> Vec<DayCompletion> {
    let mut entries = Vec::with_capacity(days);

    for back in (0..days).rev() {
        let date = today - Duration::days(back as i64);
        entries.push(DayCompletion {
            date,
            completed: contains(dates, date),
        });
    }

    entries
}

/// Percentage of the last `days` days that were completed, rounded to the
/// nearest whole number.
pub fn percentage(dates: &[NaiveDate], days: usize, today: NaiveDate) -> u32 {
    if days == 0 {
        return 0;
    }

    let completed = history(dates, days, today)
        .iter()
        .filter(|day| day.completed)
        .count();

    ((completed as f64 / days as f64) * 100.0).round() as u32
}
