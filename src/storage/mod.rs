//! Storage layer: the repository contract and its backends
//!
//! This module defines the HabitRepository trait every backend satisfies,
//! plus the input and page types the contract trades in. Two backends
//! implement it: a process-lifetime in-memory map and a JSON-file store.
//! "Absent" is reported as None / false, never as an error; the service
//! layer is the single place that turns absence into a failure.

pub mod file;
pub mod memory;

pub use file::FileHabitRepository;
pub use memory::InMemoryHabitRepository;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::{HabitId, HabitRecord, Statistics, Summary};

/// Errors that can occur during storage operations
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Input for creating a habit. Validation happens in the service layer;
/// repositories assume the data is already normalized.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewHabit {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
}

/// Partial update: only the provided fields change.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HabitPatch {
    pub name: Option<String>,
    pub description: Option<String>,
}

/// One page of a habit listing plus the unpaginated total.
#[derive(Debug, Clone, Serialize)]
pub struct HabitPage {
    pub habits: Vec<HabitRecord>,
    pub total: usize,
}

/// The id/name projection used by the lightweight list endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HabitIdName {
    pub id: HabitId,
    pub name: String,
}

/// Slice `records` into a page. The slice is applied only when BOTH limit
/// and offset are given; otherwise the full listing is returned.
pub(crate) fn paginate(
    records: Vec<HabitRecord>,
    limit: Option<usize>,
    offset: Option<usize>,
) -> HabitPage {
    let total = records.len();
    let habits = match (limit, offset) {
        (Some(limit), Some(offset)) => records.into_iter().skip(offset).take(limit).collect(),
        _ => records,
    };
    HabitPage { habits, total }
}

/// Trait defining the storage contract for habits
///
/// Both backends satisfy this interface; the service layer is written
/// against it and the concrete implementation is chosen at startup from
/// configuration. Operations may suspend on file I/O.
#[async_trait]
pub trait HabitRepository: Send + Sync {
    /// List habits most recently created first, optionally paginated.
    async fn get_all(
        &self,
        limit: Option<usize>,
        offset: Option<usize>,
    ) -> Result<HabitPage, StorageError>;

    /// Look up a single habit.
    async fn get_by_id(&self, id: &HabitId) -> Result<Option<HabitRecord>, StorageError>;

    /// Create a habit with the next sequential id and an empty completion set.
    async fn create(&self, habit: NewHabit) -> Result<HabitRecord, StorageError>;

    /// Apply a partial update; None if the id is unknown.
    async fn update(
        &self,
        id: &HabitId,
        patch: HabitPatch,
    ) -> Result<Option<HabitRecord>, StorageError>;

    /// Remove a habit; true iff a record existed and was removed.
    async fn delete(&self, id: &HabitId) -> Result<bool, StorageError>;

    /// Flip today's completion state.
    async fn toggle_complete_today(
        &self,
        id: &HabitId,
    ) -> Result<Option<HabitRecord>, StorageError>;

    /// Mark today completed (idempotent).
    async fn mark_completed_today(
        &self,
        id: &HabitId,
    ) -> Result<Option<HabitRecord>, StorageError>;

    /// Remove today's completion, if present.
    async fn mark_not_completed_today(
        &self,
        id: &HabitId,
    ) -> Result<Option<HabitRecord>, StorageError>;

    /// Like get_all; every record carries its `isCompletedToday` flag.
    async fn get_all_with_today_status(
        &self,
        limit: Option<usize>,
        offset: Option<usize>,
    ) -> Result<HabitPage, StorageError>;

    /// Lifetime aggregate over all habits, never paginated.
    async fn get_statistics(&self) -> Result<Statistics, StorageError>;

    /// Today-only completion snapshot.
    async fn get_summary(&self) -> Result<Summary, StorageError>;

    /// Id/name pairs for every habit.
    async fn get_all_id_name(&self) -> Result<Vec<HabitIdName>, StorageError>;
}
