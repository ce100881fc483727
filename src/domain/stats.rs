//! Aggregate views across all habits
//!
//! Statistics is the lifetime aggregate (totals, averages, bests);
//! Summary is the today-only completion snapshot. Both repositories
//! compute these over their full record set, never paginated.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::Habit;

/// Lifetime aggregate over all habits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Statistics {
    pub total_habits: usize,
    pub completed_today: usize,
    pub total_completions: usize,
    pub average_streak: u32,
    pub best_streak: u32,
}

/// Today-only completion snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub total_habits: usize,
    pub completed_today: usize,
    /// `round(100 * completed_today / total_habits)`, 0 when there are no habits
    pub completion_rate: u32,
}

/// Compute the lifetime aggregate for `habits` as of `today`.
pub fn statistics<'a, I>(habits: I, today: NaiveDate) -> Statistics
where
    I: IntoIterator<Item = &'a Habit>,
{
    let habits: Vec<&Habit> = habits.into_iter().collect();

    let total_habits = habits.len();
    let completed_today = habits.iter().filter(|h| h.is_completed_for(today)).count();
    let total_completions = habits.iter().map(|h| h.completed_dates.len()).sum();
    let average_streak = if total_habits > 0 {
        let sum: u32 = habits.iter().map(|h| h.streak).sum();
        (sum as f64 / total_habits as f64).round() as u32
    } else {
        0
    };
    let best_streak = habits.iter().map(|h| h.streak).max().unwrap_or(0);

    Statistics {
        total_habits,
        completed_today,
        total_completions,
        average_streak,
        best_streak,
    }
}

/// Compute the today-only snapshot for `habits` as of `today`.
pub fn summary<'a, I>(habits: I, today: NaiveDate) -> Summary
where
    I: IntoIterator<Item = &'a Habit>,
{
    let habits: Vec<&Habit> = habits.into_iter().collect();

    let total_habits = habits.len();
    let completed_today = habits.iter().filter(|h| h.is_completed_for(today)).count();
    let completion_rate = if total_habits > 0 {
        ((completed_today as f64 / total_habits as f64) * 100.0).round() as u32
    } else {
        0
    };

    Summary {
        total_habits,
        completed_today,
        completion_rate,
    }
}
