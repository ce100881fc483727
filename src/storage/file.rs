//! JSON-file repository backend
//!
//! The document on disk is the sole source of truth: every operation
//! reloads it into memory, works on the fresh copy, and mutations write
//! the whole document back before returning. A missing file is treated as
//! an empty store and materialized immediately. The load-mutate-persist
//! cycle runs under a single async mutex, so concurrent handlers in this
//! process cannot clobber each other's writes; cross-process writers
//! remain last-write-wins.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::fs;
use tokio::sync::Mutex;

use crate::domain::{self, streak, Habit, HabitId, HabitRecord, Statistics, Summary};
use crate::storage::{
    paginate, HabitIdName, HabitPage, HabitPatch, HabitRepository, NewHabit, StorageError,
};

/// File-based implementation of the habit repository
pub struct FileHabitRepository {
    path: PathBuf,
    // Serializes whole load-mutate-persist cycles, not just map access.
    lock: Mutex<()>,
}

/// The persisted document shape.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct HabitsDocument {
    #[serde(default)]
    habits: Vec<Habit>,
    #[serde(default = "Utc::now")]
    last_updated: DateTime<Utc>,
}

/// A backup is the same document plus its creation stamp.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct BackupDocument {
    habits: Vec<Habit>,
    last_updated: DateTime<Utc>,
    backup_created: DateTime<Utc>,
}

/// The store as loaded for one operation. Habits keep document order,
/// which is creation order for documents this backend writes.
struct FileState {
    habits: Vec<Habit>,
    next_id: u64,
}

impl FileState {
    fn from_document(doc: HabitsDocument) -> Self {
        let next_id = doc
            .habits
            .iter()
            .filter_map(|h| h.id.as_number())
            .max()
            .map_or(1, |max| max + 1);

        Self {
            habits: doc.habits,
            next_id,
        }
    }

    fn empty() -> Self {
        Self {
            habits: Vec::new(),
            next_id: 1,
        }
    }

    fn find_mut(&mut self, id: &HabitId) -> Option<&mut Habit> {
        self.habits.iter_mut().find(|h| h.id == *id)
    }

    fn insert_new(&mut self, data: NewHabit) -> HabitRecord {
        let habit = Habit::new(
            HabitId::from_sequence(self.next_id),
            data.name,
            data.description,
            Utc::now(),
        );
        self.next_id += 1;

        let record = habit.to_record();
        self.habits.push(habit);
        record
    }

    fn records_newest_first(&self) -> Vec<HabitRecord> {
        self.habits.iter().rev().map(Habit::to_record).collect()
    }
}

impl FileHabitRepository {
    /// Create a repository backed by the document at `path`. No I/O happens
    /// here; call [`initialize`](Self::initialize) to surface problems at
    /// startup instead of on the first request.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    /// Load the document once, creating an empty one if the file is missing.
    pub async fn initialize(&self) -> Result<(), StorageError> {
        let _guard = self.lock.lock().await;
        self.load().await?;
        Ok(())
    }

    /// Snapshot the current document to `backup_path`, stamped with the
    /// backup creation time.
    pub async fn backup(&self, backup_path: impl AsRef<Path>) -> Result<(), StorageError> {
        let _guard = self.lock.lock().await;
        let state = self.load().await?;

        let now = Utc::now();
        let doc = BackupDocument {
            habits: state.habits,
            last_updated: now,
            backup_created: now,
        };
        let json = serde_json::to_vec_pretty(&doc)?;
        fs::write(backup_path.as_ref(), json).await?;

        tracing::info!(path = %backup_path.as_ref().display(), "wrote habits backup");
        Ok(())
    }

    /// Replace the current document with the contents of a backup and
    /// persist the result.
    pub async fn restore(&self, backup_path: impl AsRef<Path>) -> Result<(), StorageError> {
        let _guard = self.lock.lock().await;

        let bytes = fs::read(backup_path.as_ref()).await?;
        let doc: HabitsDocument = serde_json::from_slice(&bytes)?;
        let state = FileState::from_document(doc);
        self.save(&state).await?;

        tracing::info!(path = %backup_path.as_ref().display(), "restored habits from backup");
        Ok(())
    }

    /// Parse the document into a fresh state. Missing file means an empty
    /// store, which is written out immediately; any other error propagates.
    async fn load(&self) -> Result<FileState, StorageError> {
        match fs::read(&self.path).await {
            Ok(bytes) => {
                let doc: HabitsDocument = serde_json::from_slice(&bytes)?;
                Ok(FileState::from_document(doc))
            }
            Err(err) if err.kind() == ErrorKind::NotFound => {
                tracing::info!(path = %self.path.display(), "no habits file found, starting fresh");
                let state = FileState::empty();
                self.save(&state).await?;
                Ok(state)
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Serialize the whole store back to disk, pretty-printed, with a
    /// fresh `lastUpdated` stamp.
    async fn save(&self, state: &FileState) -> Result<(), StorageError> {
        let doc = HabitsDocument {
            habits: state.habits.clone(),
            last_updated: Utc::now(),
        };
        let json = serde_json::to_vec_pretty(&doc)?;
        fs::write(&self.path, json).await?;
        Ok(())
    }

    /// Run a completion mutation against a freshly loaded store and persist
    /// the result. Returns None without rewriting when the id is unknown.
    async fn mutate<F>(&self, id: &HabitId, apply: F) -> Result<Option<HabitRecord>, StorageError>
    where
        F: FnOnce(&mut Habit),
    {
        let _guard = self.lock.lock().await;
        let mut state = self.load().await?;

        let record = match state.find_mut(id) {
            Some(habit) => {
                apply(habit);
                habit.to_record()
            }
            None => return Ok(None),
        };

        self.save(&state).await?;
        Ok(Some(record))
    }
}

#[async_trait]
impl HabitRepository for FileHabitRepository {
    async fn get_all(
        &self,
        limit: Option<usize>,
        offset: Option<usize>,
    ) -> Result<HabitPage, StorageError> {
        let _guard = self.lock.lock().await;
        let state = self.load().await?;
        Ok(paginate(state.records_newest_first(), limit, offset))
    }

    async fn get_by_id(&self, id: &HabitId) -> Result<Option<HabitRecord>, StorageError> {
        let _guard = self.lock.lock().await;
        let state = self.load().await?;
        Ok(state.habits.iter().find(|h| h.id == *id).map(Habit::to_record))
    }

    async fn create(&self, habit: NewHabit) -> Result<HabitRecord, StorageError> {
        let _guard = self.lock.lock().await;
        let mut state = self.load().await?;

        let record = state.insert_new(habit);
        self.save(&state).await?;
        Ok(record)
    }

    async fn update(
        &self,
        id: &HabitId,
        patch: HabitPatch,
    ) -> Result<Option<HabitRecord>, StorageError> {
        self.mutate(id, |habit| {
            if let Some(name) = patch.name {
                habit.name = name;
            }
            if let Some(description) = patch.description {
                habit.description = description;
            }
        })
        .await
    }

    async fn delete(&self, id: &HabitId) -> Result<bool, StorageError> {
        let _guard = self.lock.lock().await;
        let mut state = self.load().await?;

        let before = state.habits.len();
        state.habits.retain(|h| h.id != *id);
        if state.habits.len() == before {
            return Ok(false);
        }

        self.save(&state).await?;
        Ok(true)
    }

    async fn toggle_complete_today(
        &self,
        id: &HabitId,
    ) -> Result<Option<HabitRecord>, StorageError> {
        let today = streak::today();
        self.mutate(id, |habit| {
            if habit.is_completed_for(today) {
                habit.mark_not_completed(today);
            } else {
                habit.mark_completed(today);
            }
        })
        .await
    }

    async fn mark_completed_today(
        &self,
        id: &HabitId,
    ) -> Result<Option<HabitRecord>, StorageError> {
        self.mutate(id, |habit| habit.mark_completed(streak::today())).await
    }

    async fn mark_not_completed_today(
        &self,
        id: &HabitId,
    ) -> Result<Option<HabitRecord>, StorageError> {
        self.mutate(id, |habit| habit.mark_not_completed(streak::today())).await
    }

    async fn get_all_with_today_status(
        &self,
        limit: Option<usize>,
        offset: Option<usize>,
    ) -> Result<HabitPage, StorageError> {
        self.get_all(limit, offset).await
    }

    async fn get_statistics(&self) -> Result<Statistics, StorageError> {
        let _guard = self.lock.lock().await;
        let state = self.load().await?;
        Ok(domain::statistics(state.habits.iter(), streak::today()))
    }

    async fn get_summary(&self) -> Result<Summary, StorageError> {
        let _guard = self.lock.lock().await;
        let state = self.load().await?;
        Ok(domain::summary(state.habits.iter(), streak::today()))
    }

    async fn get_all_id_name(&self) -> Result<Vec<HabitIdName>, StorageError> {
        let _guard = self.lock.lock().await;
        let state = self.load().await?;
        Ok(state
            .habits
            .iter()
            .map(|h| HabitIdName {
                id: h.id.clone(),
                name: h.name.clone(),
            })
            .collect())
    }
}
