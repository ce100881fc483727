//! Domain module containing the core entities and calculations
//!
//! This module defines the Habit entity, the pure date-walk calculations
//! behind streaks and completion history, and the aggregate views
//! (statistics, summary) the API reports across all habits.

pub mod habit;
pub mod stats;
pub mod streak;

// Re-export public types for easy access
pub use habit::*;
pub use stats::*;
pub use streak::*;
