//! Contract conformance tests run against both repository backends
//!
//! Every backend must satisfy the same observable behavior; these tests
//! take an `Arc<dyn HabitRepository>` and assert the contract, then run
//! once per backend. File-specific durability is covered at the end.

use std::sync::Arc;

use habit_tracker_api::{
    FileHabitRepository, HabitId, HabitPatch, HabitRepository, InMemoryHabitRepository, NewHabit,
};
use tempfile::TempDir;

fn new_habit(name: &str) -> NewHabit {
    NewHabit {
        name: name.to_string(),
        ..Default::default()
    }
}

/// Build one empty instance of each backend, keeping the temp dir alive
/// for the file-backed one.
fn backends() -> Vec<(&'static str, Arc<dyn HabitRepository>, Option<TempDir>)> {
    let dir = tempfile::tempdir().unwrap();
    let file_repo = FileHabitRepository::new(dir.path().join("habits.json"));

    vec![
        ("memory", Arc::new(InMemoryHabitRepository::empty()), None),
        ("file", Arc::new(file_repo), Some(dir)),
    ]
}

#[tokio::test]
async fn create_then_get_by_id_returns_the_fresh_record() {
    for (backend, repo, _guard) in backends() {
        let created = repo.create(new_habit("X")).await.unwrap();
        let fetched = repo
            .get_by_id(&created.habit.id)
            .await
            .unwrap()
            .unwrap_or_else(|| panic!("{backend}: created habit not found"));

        assert_eq!(fetched.habit.name, "X", "{backend}");
        assert!(fetched.habit.completed_dates.is_empty(), "{backend}");
        assert_eq!(fetched.habit.streak, 0, "{backend}");
    }
}

#[tokio::test]
async fn ids_are_sequential_strings() {
    for (backend, repo, _guard) in backends() {
        let first = repo.create(new_habit("a")).await.unwrap();
        let second = repo.create(new_habit("b")).await.unwrap();

        assert_eq!(first.habit.id, HabitId("1".into()), "{backend}");
        assert_eq!(second.habit.id, HabitId("2".into()), "{backend}");
    }
}

#[tokio::test]
async fn listings_are_most_recently_created_first() {
    for (backend, repo, _guard) in backends() {
        for name in ["a", "b", "c"] {
            repo.create(new_habit(name)).await.unwrap();
        }

        let page = repo.get_all(None, None).await.unwrap();
        let names: Vec<_> = page.habits.iter().map(|r| r.habit.name.as_str()).collect();
        assert_eq!(names, vec!["c", "b", "a"], "{backend}");
        assert_eq!(page.total, 3, "{backend}");
    }
}

#[tokio::test]
async fn pagination_slices_without_changing_the_total() {
    for (backend, repo, _guard) in backends() {
        for name in ["a", "b", "c", "d"] {
            repo.create(new_habit(name)).await.unwrap();
        }

        let page = repo.get_all(Some(2), Some(1)).await.unwrap();
        assert_eq!(page.total, 4, "{backend}");
        let names: Vec<_> = page.habits.iter().map(|r| r.habit.name.as_str()).collect();
        assert_eq!(names, vec!["c", "b"], "{backend}");
    }
}

#[tokio::test]
async fn delete_of_a_nonexistent_id_is_false_and_count_is_unchanged() {
    for (backend, repo, _guard) in backends() {
        repo.create(new_habit("a")).await.unwrap();

        assert!(!repo.delete(&HabitId("99".into())).await.unwrap(), "{backend}");
        assert_eq!(repo.get_all(None, None).await.unwrap().total, 1, "{backend}");
    }
}

#[tokio::test]
async fn update_is_partial() {
    for (backend, repo, _guard) in backends() {
        let created = repo
            .create(NewHabit { name: "Run".into(), description: "5k".into() })
            .await
            .unwrap();

        let updated = repo
            .update(
                &created.habit.id,
                HabitPatch { name: Some("Jog".into()), description: None },
            )
            .await
            .unwrap()
            .unwrap();

        assert_eq!(updated.habit.name, "Jog", "{backend}");
        assert_eq!(updated.habit.description, "5k", "{backend}");
    }
}

#[tokio::test]
async fn toggle_and_mark_operations_agree_on_todays_state() {
    for (backend, repo, _guard) in backends() {
        let id = repo.create(new_habit("a")).await.unwrap().habit.id;

        let on = repo.toggle_complete_today(&id).await.unwrap().unwrap();
        assert!(on.is_completed_today, "{backend}");

        // Marking completed again is idempotent.
        let marked = repo.mark_completed_today(&id).await.unwrap().unwrap();
        assert_eq!(marked.habit.completed_dates.len(), 1, "{backend}");

        let off = repo.mark_not_completed_today(&id).await.unwrap().unwrap();
        assert!(!off.is_completed_today, "{backend}");
        assert_eq!(off.habit.streak, 0, "{backend}");
    }
}

#[tokio::test]
async fn absent_ids_never_error() {
    for (backend, repo, _guard) in backends() {
        let missing = HabitId("7".into());

        assert!(repo.get_by_id(&missing).await.unwrap().is_none(), "{backend}");
        assert!(
            repo.update(&missing, HabitPatch::default()).await.unwrap().is_none(),
            "{backend}"
        );
        assert!(
            repo.toggle_complete_today(&missing).await.unwrap().is_none(),
            "{backend}"
        );
        assert!(
            repo.mark_completed_today(&missing).await.unwrap().is_none(),
            "{backend}"
        );
        assert!(
            repo.mark_not_completed_today(&missing).await.unwrap().is_none(),
            "{backend}"
        );
    }
}

#[tokio::test]
async fn statistics_on_an_empty_store_are_all_zero() {
    for (backend, repo, _guard) in backends() {
        let stats = repo.get_statistics().await.unwrap();

        assert_eq!(stats.total_habits, 0, "{backend}");
        assert_eq!(stats.completed_today, 0, "{backend}");
        assert_eq!(stats.total_completions, 0, "{backend}");
        assert_eq!(stats.average_streak, 0, "{backend}");
        assert_eq!(stats.best_streak, 0, "{backend}");
    }
}

#[tokio::test]
async fn summary_rate_is_the_rounded_completed_share() {
    for (backend, repo, _guard) in backends() {
        let first = repo.create(new_habit("a")).await.unwrap();
        repo.create(new_habit("b")).await.unwrap();
        repo.mark_completed_today(&first.habit.id).await.unwrap();

        let summary = repo.get_summary().await.unwrap();
        assert_eq!(summary.total_habits, 2, "{backend}");
        assert_eq!(summary.completed_today, 1, "{backend}");
        assert_eq!(summary.completion_rate, 50, "{backend}");
    }
}

// File-backend specifics below: durability through fresh instances.

#[tokio::test]
async fn file_backend_round_trips_through_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("habits.json");

    let repo = FileHabitRepository::new(&path);
    let created = repo.create(new_habit("Persisted")).await.unwrap();
    repo.mark_completed_today(&created.habit.id).await.unwrap();

    // A brand new instance sees everything the first one wrote.
    let reopened = FileHabitRepository::new(&path);
    let page = reopened.get_all(None, None).await.unwrap();

    assert_eq!(page.total, 1);
    assert_eq!(page.habits[0].habit.name, "Persisted");
    assert!(page.habits[0].is_completed_today);
}

#[tokio::test]
async fn file_backend_deletions_are_durable() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("habits.json");

    let repo = FileHabitRepository::new(&path);
    let created = repo.create(new_habit("a")).await.unwrap();
    assert!(repo.delete(&created.habit.id).await.unwrap());

    let reopened = FileHabitRepository::new(&path);
    assert_eq!(reopened.get_all(None, None).await.unwrap().total, 0);
}
