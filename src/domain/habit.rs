//! Habit entity and its completion tracking
//!
//! This module defines the core Habit struct that represents one tracked
//! routine: its completion-date set, the derived streak counter, and the
//! views built from them (history windows, the wire record).

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::streak::{self, DayCompletion};

/// Unique identifier for a habit
///
/// The string form of a sequential integer assigned by the owning
/// repository at creation. A newtype so habit ids can't be confused with
/// other strings flowing through the API.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HabitId(pub String);

impl HabitId {
    /// Build the id for the `n`-th created habit.
    pub fn from_sequence(n: u64) -> Self {
        Self(n.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Numeric value of the id, if it parses. Repositories use this to
    /// rebuild their next-id counter from persisted data.
    pub fn as_number(&self) -> Option<u64> {
        self.0.parse().ok()
    }
}

impl From<String> for HabitId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl std::fmt::Display for HabitId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A habit represents one routine the user wants to do every day
///
/// The entity owns its completion dates and keeps the derived `streak`
/// field consistent with them on every mutation. Field names serialize in
/// camelCase; this is both the persisted shape and the base of the wire
/// record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Habit {
    /// Repository-assigned identifier; immutable after creation
    pub id: HabitId,
    /// Display name (e.g., "Morning Exercise")
    pub name: String,
    /// Optional longer description; may be empty
    #[serde(default)]
    pub description: String,
    /// When this habit was created; immutable
    pub created_at: DateTime<Utc>,
    /// Calendar dates the habit was marked done; unique, sorted ascending
    #[serde(default)]
    pub completed_dates: Vec<NaiveDate>,
    /// Consecutive days completed, counted backward from today; recomputed
    /// on every completion mutation, never lazily on read
    #[serde(default)]
    pub streak: u32,
    /// The most recent date added via a completion mutation. Removing that
    /// date later does NOT revert this field to an earlier value.
    #[serde(default)]
    pub last_completed_date: Option<NaiveDate>,
}

impl Habit {
    /// Create a new habit with an empty completion set.
    pub fn new(id: HabitId, name: String, description: String, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            name,
            description,
            created_at,
            completed_dates: Vec::new(),
            streak: 0,
            last_completed_date: None,
        }
    }

    /// Mark the habit completed for `date`.
    ///
    /// Inserts the date keeping the set sorted, remembers it as the last
    /// completed date, and recomputes the streak. Marking an
    /// already-completed date is a no-op.
    pub fn mark_completed(&mut self, date: NaiveDate) {
        if let Err(pos) = self.completed_dates.binary_search(&date) {
            self.completed_dates.insert(pos, date);
            self.last_completed_date = Some(date);
            self.update_streak();
        }
    }

    /// Remove a completion for `date`, if present, and recompute the streak.
    ///
    /// `last_completed_date` is intentionally left untouched even when the
    /// removed date was the most recent one.
    pub fn mark_not_completed(&mut self, date: NaiveDate) {
        if let Ok(pos) = self.completed_dates.binary_search(&date) {
            self.completed_dates.remove(pos);
            self.update_streak();
        }
    }

    /// Whether the habit was completed on `date`.
    pub fn is_completed_for(&self, date: NaiveDate) -> bool {
        self.completed_dates.binary_search(&date).is_ok()
    }

    /// Whether the habit was completed on the current UTC date.
    pub fn is_completed_today(&self) -> bool {
        self.is_completed_for(streak::today())
    }

    /// Recompute `streak` from the completion set, anchored to today.
    pub fn update_streak(&mut self) {
        self.streak = streak::current_streak(&self.completed_dates, streak::today());
    }

    /// Completion status for the last `days` days ending today, oldest first.
    pub fn completion_history(&self, days: usize) -> Vec<DayCompletion> {
        streak::history(&self.completed_dates, days, streak::today())
    }

    /// Rounded percentage of the last `days` days that were completed.
    pub fn completion_percentage(&self, days: usize) -> u32 {
        streak::percentage(&self.completed_dates, days, streak::today())
    }

    /// The wire view of this habit: every stored field plus the derived
    /// `isCompletedToday` flag.
    pub fn to_record(&self) -> HabitRecord {
        HabitRecord {
            is_completed_today: self.is_completed_today(),
            habit: self.clone(),
        }
    }
}

/// A habit as returned by every repository read and mutation
///
/// Serializes to the entity's fields plus `isCompletedToday`. The derived
/// flag is never persisted; repositories compute it at read time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HabitRecord {
    #[serde(flatten)]
    pub habit: Habit,
    pub is_completed_today: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn habit() -> Habit {
        Habit::new(
            HabitId::from_sequence(1),
            "Morning Exercise".to_string(),
            "30 minutes of cardio".to_string(),
            Utc::now(),
        )
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn new_habit_has_empty_completion_set() {
        let habit = habit();

        assert!(habit.completed_dates.is_empty());
        assert_eq!(habit.streak, 0);
        assert_eq!(habit.last_completed_date, None);
    }

    #[test]
    fn mark_completed_is_idempotent() {
        let mut habit = habit();
        let day = date(2024, 3, 10);

        habit.mark_completed(day);
        habit.mark_completed(day);

        assert_eq!(habit.completed_dates, vec![day]);
        assert!(habit.is_completed_for(day));
    }

    #[test]
    fn completed_dates_stay_sorted() {
        let mut habit = habit();

        habit.mark_completed(date(2024, 3, 10));
        habit.mark_completed(date(2024, 3, 8));
        habit.mark_completed(date(2024, 3, 9));

        assert_eq!(
            habit.completed_dates,
            vec![date(2024, 3, 8), date(2024, 3, 9), date(2024, 3, 10)]
        );
    }

    #[test]
    fn mark_not_completed_restores_the_prior_set() {
        let mut habit = habit();
        let day = date(2024, 3, 10);

        habit.mark_completed(date(2024, 3, 8));
        let before = habit.completed_dates.clone();

        habit.mark_completed(day);
        habit.mark_not_completed(day);

        assert_eq!(habit.completed_dates, before);
    }

    #[test]
    fn last_completed_date_is_not_reverted_on_removal() {
        // Documented quirk: removing the most recent completion leaves
        // last_completed_date pointing at the removed date.
        let mut habit = habit();
        let earlier = date(2024, 3, 8);
        let later = date(2024, 3, 10);

        habit.mark_completed(earlier);
        habit.mark_completed(later);
        habit.mark_not_completed(later);

        assert_eq!(habit.last_completed_date, Some(later));
    }

    #[test]
    fn marking_a_past_date_moves_last_completed_to_that_date() {
        let mut habit = habit();

        habit.mark_completed(date(2024, 3, 10));
        habit.mark_completed(date(2024, 3, 1));

        assert_eq!(habit.last_completed_date, Some(date(2024, 3, 1)));
    }

    #[test]
    fn streak_counts_today_and_yesterday() {
        let mut habit = habit();
        let today = streak::today();

        habit.mark_completed(today);
        habit.mark_completed(today - Duration::days(1));

        assert_eq!(habit.streak, 2);
    }

    #[test]
    fn streak_is_zero_with_a_gap_before_today() {
        let mut habit = habit();
        let today = streak::today();

        habit.mark_completed(today - Duration::days(2));

        assert_eq!(habit.streak, 0);
    }

    #[test]
    fn record_carries_the_derived_today_flag() {
        let mut habit = habit();
        assert!(!habit.to_record().is_completed_today);

        habit.mark_completed(streak::today());
        assert!(habit.to_record().is_completed_today);
    }

    #[test]
    fn serialization_round_trips_all_stored_fields() {
        let mut habit = habit();
        habit.mark_completed(date(2024, 3, 9));
        habit.mark_completed(date(2024, 3, 10));

        let json = serde_json::to_string(&habit).unwrap();
        assert!(json.contains("\"completedDates\":[\"2024-03-09\",\"2024-03-10\"]"));
        assert!(json.contains("\"lastCompletedDate\":\"2024-03-10\""));
        assert!(json.contains("\"createdAt\""));

        let back: Habit = serde_json::from_str(&json).unwrap();
        assert_eq!(back, habit);
    }

    #[test]
    fn deserialization_tolerates_missing_optional_fields() {
        // Older documents may omit the derived fields entirely.
        let json = r#"{
            "id": "1",
            "name": "Read Books",
            "createdAt": "2024-03-01T08:00:00Z"
        }"#;

        let habit: Habit = serde_json::from_str(json).unwrap();
        assert_eq!(habit.description, "");
        assert!(habit.completed_dates.is_empty());
        assert_eq!(habit.streak, 0);
        assert_eq!(habit.last_completed_date, None);
    }
}
