//! In-memory repository backend
//!
//! Holds the habits in an owned, mutex-guarded map living for the lifetime
//! of the repository instance. Nothing is persisted: a restart loses all
//! data. `new()` seeds the demo data set; `empty()` starts blank for tests
//! and composition.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::{Duration, Utc};
use tokio::sync::Mutex;

use crate::domain::{self, streak, Habit, HabitId, HabitRecord, Statistics, Summary};
use crate::storage::{
    paginate, HabitIdName, HabitPage, HabitPatch, HabitRepository, NewHabit, StorageError,
};

/// In-memory implementation of the habit repository
pub struct InMemoryHabitRepository {
    state: Mutex<MemoryState>,
}

/// Habits keyed by their numeric id. Ids are assigned in creation order,
/// so ascending key order IS insertion order and listings reverse it.
struct MemoryState {
    habits: BTreeMap<u64, Habit>,
    next_id: u64,
}

impl MemoryState {
    fn new() -> Self {
        Self {
            habits: BTreeMap::new(),
            next_id: 1,
        }
    }

    fn insert_new(&mut self, data: NewHabit) -> HabitRecord {
        let id = self.next_id;
        self.next_id += 1;

        let habit = Habit::new(
            HabitId::from_sequence(id),
            data.name,
            data.description,
            Utc::now(),
        );
        let record = habit.to_record();
        self.habits.insert(id, habit);
        record
    }

    fn get_mut(&mut self, id: &HabitId) -> Option<&mut Habit> {
        let key = id.as_number()?;
        self.habits.get_mut(&key)
    }

    fn records_newest_first(&self) -> Vec<HabitRecord> {
        self.habits.values().rev().map(Habit::to_record).collect()
    }
}

impl InMemoryHabitRepository {
    /// Create a repository seeded with the demo habit set; the first two
    /// habits are pre-marked completed for today and yesterday.
    pub fn new() -> Self {
        let mut state = MemoryState::new();

        let samples = [
            ("Morning Exercise", "30 minutes of cardio or strength training"),
            ("Read Books", "Read at least 20 pages daily"),
            ("Drink Water", "Drink 8 glasses of water"),
            ("Meditation", "10 minutes of mindfulness practice"),
            ("Sleep Early", "Go to bed before 11 PM"),
            ("Healthy Breakfast", "Eat a balanced breakfast with protein and fiber"),
            ("Stretching", "5-10 minutes of stretching in the morning"),
        ];
        for (name, description) in samples {
            state.insert_new(NewHabit {
                name: name.to_string(),
                description: description.to_string(),
            });
        }

        let today = streak::today();
        let yesterday = today - Duration::days(1);
        for habit in state.habits.values_mut().take(2) {
            habit.mark_completed(today);
            habit.mark_completed(yesterday);
        }

        Self {
            state: Mutex::new(state),
        }
    }

    /// Create a repository with no habits at all.
    pub fn empty() -> Self {
        Self {
            state: Mutex::new(MemoryState::new()),
        }
    }
}

impl Default for InMemoryHabitRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HabitRepository for InMemoryHabitRepository {
    async fn get_all(
        &self,
        limit: Option<usize>,
        offset: Option<usize>,
    ) -> Result<HabitPage, StorageError> {
        let state = self.state.lock().await;
        Ok(paginate(state.records_newest_first(), limit, offset))
    }

    async fn get_by_id(&self, id: &HabitId) -> Result<Option<HabitRecord>, StorageError> {
        let state = self.state.lock().await;
        let record = id
            .as_number()
            .and_then(|key| state.habits.get(&key))
            .map(Habit::to_record);
        Ok(record)
    }

    async fn create(&self, habit: NewHabit) -> Result<HabitRecord, StorageError> {
        let mut state = self.state.lock().await;
        Ok(state.insert_new(habit))
    }

    async fn update(
        &self,
        id: &HabitId,
        patch: HabitPatch,
    ) -> Result<Option<HabitRecord>, StorageError> {
        let mut state = self.state.lock().await;
        let Some(habit) = state.get_mut(id) else {
            return Ok(None);
        };

        if let Some(name) = patch.name {
            habit.name = name;
        }
        if let Some(description) = patch.description {
            habit.description = description;
        }

        Ok(Some(habit.to_record()))
    }

    async fn delete(&self, id: &HabitId) -> Result<bool, StorageError> {
        let mut state = self.state.lock().await;
        let removed = id
            .as_number()
            .and_then(|key| state.habits.remove(&key))
            .is_some();
        Ok(removed)
    }

    async fn toggle_complete_today(
        &self,
        id: &HabitId,
    ) -> Result<Option<HabitRecord>, StorageError> {
        let mut state = self.state.lock().await;
        let Some(habit) = state.get_mut(id) else {
            return Ok(None);
        };

        let today = streak::today();
        if habit.is_completed_for(today) {
            habit.mark_not_completed(today);
        } else {
            habit.mark_completed(today);
        }

        Ok(Some(habit.to_record()))
    }

    async fn mark_completed_today(
        &self,
        id: &HabitId,
    ) -> Result<Option<HabitRecord>, StorageError> {
        let mut state = self.state.lock().await;
        let Some(habit) = state.get_mut(id) else {
            return Ok(None);
        };

        habit.mark_completed(streak::today());
        Ok(Some(habit.to_record()))
    }

    async fn mark_not_completed_today(
        &self,
        id: &HabitId,
    ) -> Result<Option<HabitRecord>, StorageError> {
        let mut state = self.state.lock().await;
        let Some(habit) = state.get_mut(id) else {
            return Ok(None);
        };

        habit.mark_not_completed(streak::today());
        Ok(Some(habit.to_record()))
    }

    async fn get_all_with_today_status(
        &self,
        limit: Option<usize>,
        offset: Option<usize>,
    ) -> Result<HabitPage, StorageError> {
        // Records always carry the derived flag; this is get_all by contract.
        self.get_all(limit, offset).await
    }

    async fn get_statistics(&self) -> Result<Statistics, StorageError> {
        let state = self.state.lock().await;
        Ok(domain::statistics(state.habits.values(), streak::today()))
    }

    async fn get_summary(&self) -> Result<Summary, StorageError> {
        let state = self.state.lock().await;
        Ok(domain::summary(state.habits.values(), streak::today()))
    }

    async fn get_all_id_name(&self) -> Result<Vec<HabitIdName>, StorageError> {
        let state = self.state.lock().await;
        Ok(state
            .habits
            .values()
            .map(|h| HabitIdName {
                id: h.id.clone(),
                name: h.name.clone(),
            })
            .collect())
    }
}
