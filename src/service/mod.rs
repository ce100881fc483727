//! Service layer for habit business logic
//!
//! Wraps a repository behind input validation and error normalization.
//! This is the single place where a repository's "absent" answer becomes
//! a reported not-found failure, and where raw storage errors get wrapped
//! with the name of the operation that hit them.

use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;

use crate::domain::{streak, DayCompletion, HabitId, HabitRecord, Statistics, Summary};
use crate::storage::{
    HabitIdName, HabitPage, HabitPatch, HabitRepository, NewHabit, StorageError,
};

const NAME_MAX_CHARS: usize = 100;
const DESCRIPTION_MAX_CHARS: usize = 500;

/// Failures reported by the service layer, by kind
///
/// Callers branch on the variant, not the message text; the messages keep
/// the wording the frontend displays.
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("{0}")]
    Validation(String),

    #[error("Habit not found")]
    NotFound,

    #[error("Failed to {operation}: {source}")]
    Storage {
        operation: &'static str,
        source: StorageError,
    },
}

impl ServiceError {
    fn storage(operation: &'static str) -> impl FnOnce(StorageError) -> Self {
        move |source| Self::Storage { operation, source }
    }

    fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }
}

/// A habit record extended with its recent completion history.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HabitWithHistory {
    #[serde(flatten)]
    pub record: HabitRecord,
    pub completion_history: Vec<DayCompletion>,
    pub completion_percentage: u32,
}

/// One page of history-enriched habits.
#[derive(Debug, Clone, Serialize)]
pub struct HistoryPage {
    pub habits: Vec<HabitWithHistory>,
    pub total: usize,
}

/// Business-logic facade over any repository backend
///
/// Injected with its repository at startup; holds no other state.
pub struct HabitService {
    repository: Arc<dyn HabitRepository>,
}

impl HabitService {
    pub fn new(repository: Arc<dyn HabitRepository>) -> Self {
        Self { repository }
    }

    pub async fn all_habits(
        &self,
        limit: Option<usize>,
        offset: Option<usize>,
    ) -> Result<HabitPage, ServiceError> {
        self.repository
            .get_all(limit, offset)
            .await
            .map_err(ServiceError::storage("get habits"))
    }

    pub async fn all_habits_with_today_status(
        &self,
        limit: Option<usize>,
        offset: Option<usize>,
    ) -> Result<HabitPage, ServiceError> {
        self.repository
            .get_all_with_today_status(limit, offset)
            .await
            .map_err(ServiceError::storage("get habits"))
    }

    /// Look up one habit. Absence is an Ok(None), not an error: the read
    /// endpoints report their own not-found shape.
    pub async fn habit_by_id(&self, id: &HabitId) -> Result<Option<HabitRecord>, ServiceError> {
        self.repository
            .get_by_id(id)
            .await
            .map_err(ServiceError::storage("get habit"))
    }

    pub async fn create_habit(&self, input: NewHabit) -> Result<HabitRecord, ServiceError> {
        let name = validate_name(&input.name)?;
        let description = validate_description(&input.description)?;

        self.repository
            .create(NewHabit { name, description })
            .await
            .map_err(ServiceError::storage("create habit"))
    }

    pub async fn update_habit(
        &self,
        id: &HabitId,
        patch: HabitPatch,
    ) -> Result<HabitRecord, ServiceError> {
        let name = match patch.name {
            Some(name) => {
                let trimmed = name.trim();
                if trimmed.is_empty() {
                    return Err(ServiceError::validation("Habit name cannot be empty"));
                }
                if trimmed.chars().count() > NAME_MAX_CHARS {
                    return Err(ServiceError::validation(
                        "Habit name must be less than 100 characters",
                    ));
                }
                Some(trimmed.to_string())
            }
            None => None,
        };
        let description = match patch.description {
            Some(description) => Some(validate_description(&description)?),
            None => None,
        };

        self.repository
            .update(id, HabitPatch { name, description })
            .await
            .map_err(ServiceError::storage("update habit"))?
            .ok_or(ServiceError::NotFound)
    }

    pub async fn delete_habit(&self, id: &HabitId) -> Result<(), ServiceError> {
        let deleted = self
            .repository
            .delete(id)
            .await
            .map_err(ServiceError::storage("delete habit"))?;

        if deleted {
            Ok(())
        } else {
            Err(ServiceError::NotFound)
        }
    }

    pub async fn toggle_habit_for_today(&self, id: &HabitId) -> Result<HabitRecord, ServiceError> {
        self.repository
            .toggle_complete_today(id)
            .await
            .map_err(ServiceError::storage("toggle habit"))?
            .ok_or(ServiceError::NotFound)
    }

    pub async fn mark_habit_completed_for_today(
        &self,
        id: &HabitId,
    ) -> Result<HabitRecord, ServiceError> {
        self.repository
            .mark_completed_today(id)
            .await
            .map_err(ServiceError::storage("mark habit as completed"))?
            .ok_or(ServiceError::NotFound)
    }

    pub async fn mark_habit_not_completed_for_today(
        &self,
        id: &HabitId,
    ) -> Result<HabitRecord, ServiceError> {
        self.repository
            .mark_not_completed_today(id)
            .await
            .map_err(ServiceError::storage("mark habit as not completed"))?
            .ok_or(ServiceError::NotFound)
    }

    pub async fn statistics(&self) -> Result<Statistics, ServiceError> {
        self.repository
            .get_statistics()
            .await
            .map_err(ServiceError::storage("get statistics"))
    }

    pub async fn summary(&self) -> Result<Summary, ServiceError> {
        self.repository
            .get_summary()
            .await
            .map_err(ServiceError::storage("get summary"))
    }

    pub async fn all_id_name(&self) -> Result<Vec<HabitIdName>, ServiceError> {
        self.repository
            .get_all_id_name()
            .await
            .map_err(ServiceError::storage("get habit names"))
    }

    /// Habits with their completion history over the last `days` days,
    /// optionally narrowed to one habit id after pagination.
    pub async fn habits_with_history(
        &self,
        days: usize,
        limit: Option<usize>,
        offset: Option<usize>,
        habit_id: Option<HabitId>,
    ) -> Result<HistoryPage, ServiceError> {
        let HabitPage { habits, total } = self
            .repository
            .get_all(limit, offset)
            .await
            .map_err(ServiceError::storage("get habits with history"))?;

        let today = streak::today();
        let filtered: Vec<HabitRecord> = match &habit_id {
            Some(id) => habits.into_iter().filter(|r| r.habit.id == *id).collect(),
            None => habits,
        };

        let total = if habit_id.is_some() {
            filtered.len()
        } else {
            total
        };

        let habits = filtered
            .into_iter()
            .map(|record| {
                let dates = &record.habit.completed_dates;
                HabitWithHistory {
                    completion_history: streak::history(dates, days, today),
                    completion_percentage: streak::percentage(dates, days, today),
                    record,
                }
            })
            .collect();

        Ok(HistoryPage { habits, total })
    }
}

fn validate_name(name: &str) -> Result<String, ServiceError> {
    let trimmed = name.trim();

    if trimmed.is_empty() {
        return Err(ServiceError::validation("Habit name is required"));
    }
    if trimmed.chars().count() > NAME_MAX_CHARS {
        return Err(ServiceError::validation(
            "Habit name must be less than 100 characters",
        ));
    }

    Ok(trimmed.to_string())
}

fn validate_description(description: &str) -> Result<String, ServiceError> {
    let trimmed = description.trim();

    if trimmed.chars().count() > DESCRIPTION_MAX_CHARS {
        return Err(ServiceError::validation(
            "Habit description must be less than 500 characters",
        ));
    }

    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::InMemoryHabitRepository;

    fn service() -> HabitService {
        HabitService::new(Arc::new(InMemoryHabitRepository::empty()))
    }

    #[tokio::test]
    async fn create_rejects_a_missing_name() {
        let err = service()
            .create_habit(NewHabit { name: "   ".into(), ..Default::default() })
            .await
            .unwrap_err();

        assert!(matches!(err, ServiceError::Validation(_)));
        assert!(err.to_string().contains("required"));
    }

    #[tokio::test]
    async fn create_rejects_an_overlong_name() {
        let err = service()
            .create_habit(NewHabit { name: "x".repeat(101), ..Default::default() })
            .await
            .unwrap_err();

        assert!(matches!(err, ServiceError::Validation(_)));
        assert!(err.to_string().contains("100 characters"));
    }

    #[tokio::test]
    async fn create_rejects_an_overlong_description() {
        let err = service()
            .create_habit(NewHabit { name: "Run".into(), description: "x".repeat(501) })
            .await
            .unwrap_err();

        assert!(matches!(err, ServiceError::Validation(_)));
        assert!(err.to_string().contains("500 characters"));
    }

    #[tokio::test]
    async fn create_trims_name_and_description() {
        let record = service()
            .create_habit(NewHabit { name: "  Run  ".into(), description: "  5k  ".into() })
            .await
            .unwrap();

        assert_eq!(record.habit.name, "Run");
        assert_eq!(record.habit.description, "5k");
    }

    #[tokio::test]
    async fn a_name_of_exactly_100_characters_is_accepted() {
        let record = service()
            .create_habit(NewHabit { name: "x".repeat(100), ..Default::default() })
            .await
            .unwrap();

        assert_eq!(record.habit.name.chars().count(), 100);
    }

    #[tokio::test]
    async fn update_rejects_an_empty_name_but_allows_omitting_it() {
        let service = service();
        let created = service
            .create_habit(NewHabit { name: "Run".into(), ..Default::default() })
            .await
            .unwrap();

        let err = service
            .update_habit(
                &created.habit.id,
                HabitPatch { name: Some("  ".into()), description: None },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));

        let updated = service
            .update_habit(
                &created.habit.id,
                HabitPatch { name: None, description: Some("5k".into()) },
            )
            .await
            .unwrap();
        assert_eq!(updated.habit.name, "Run");
        assert_eq!(updated.habit.description, "5k");
    }

    #[tokio::test]
    async fn mutations_on_unknown_ids_are_not_found() {
        let service = service();
        let missing = HabitId("42".into());

        assert!(matches!(
            service.update_habit(&missing, HabitPatch::default()).await,
            Err(ServiceError::NotFound)
        ));
        assert!(matches!(
            service.delete_habit(&missing).await,
            Err(ServiceError::NotFound)
        ));
        assert!(matches!(
            service.toggle_habit_for_today(&missing).await,
            Err(ServiceError::NotFound)
        ));
        assert!(matches!(
            service.mark_habit_completed_for_today(&missing).await,
            Err(ServiceError::NotFound)
        ));
        assert!(matches!(
            service.mark_habit_not_completed_for_today(&missing).await,
            Err(ServiceError::NotFound)
        ));
    }

    #[tokio::test]
    async fn listings_report_the_unpaginated_total() {
        let service = service();
        for name in ["a", "b", "c"] {
            service
                .create_habit(NewHabit { name: name.into(), ..Default::default() })
                .await
                .unwrap();
        }

        let page = service.all_habits(None, None).await.unwrap();
        assert_eq!(page.total, 3);

        let sliced = service.all_habits_with_today_status(Some(1), Some(0)).await.unwrap();
        assert_eq!(sliced.habits.len(), 1);
        assert_eq!(sliced.total, 3);
    }

    #[tokio::test]
    async fn reads_pass_absence_through_without_error() {
        let service = service();
        let missing = HabitId("42".into());

        assert!(service.habit_by_id(&missing).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn history_windows_have_the_requested_length() {
        let service = service();
        let created = service
            .create_habit(NewHabit { name: "Run".into(), ..Default::default() })
            .await
            .unwrap();
        service
            .mark_habit_completed_for_today(&created.habit.id)
            .await
            .unwrap();

        let page = service.habits_with_history(7, None, None, None).await.unwrap();

        assert_eq!(page.total, 1);
        let entry = &page.habits[0];
        assert_eq!(entry.completion_history.len(), 7);
        assert_eq!(entry.completion_history.last().unwrap().date, streak::today());
        assert!(entry.completion_history.last().unwrap().completed);
        // 1 of 7 days: round(100 / 7) == 14
        assert_eq!(entry.completion_percentage, 14);
    }

    #[tokio::test]
    async fn history_can_be_narrowed_to_a_single_habit() {
        let service = service();
        let first = service
            .create_habit(NewHabit { name: "Run".into(), ..Default::default() })
            .await
            .unwrap();
        service
            .create_habit(NewHabit { name: "Read".into(), ..Default::default() })
            .await
            .unwrap();

        let page = service
            .habits_with_history(7, None, None, Some(first.habit.id.clone()))
            .await
            .unwrap();

        assert_eq!(page.total, 1);
        assert_eq!(page.habits[0].record.habit.id, first.habit.id);
    }
}
