//! Request handlers for the habit endpoints
//!
//! Thin translations between HTTP and the service layer: parse query and
//! path input, call the service, wrap the outcome in the response
//! envelope. All business rules live below this layer.

use axum::extract::{Path, Query, State};
use axum::http::{StatusCode, Uri};
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use serde_json::json;

use crate::api::response::{ok, ok_page, ApiError};
use crate::api::AppState;
use crate::domain::HabitId;
use crate::storage::{HabitPatch, NewHabit};

const DEFAULT_PAGE_LIMIT: usize = 9;

#[derive(Debug, Deserialize)]
pub struct PageQuery {
    pub limit: Option<usize>,
    pub offset: Option<usize>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryQuery {
    pub days: Option<usize>,
    pub limit: Option<usize>,
    pub offset: Option<usize>,
    pub habit_id: Option<String>,
}

/// GET /health
pub async fn health(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(json!({
        "success": true,
        "message": "Server is healthy",
        "timestamp": chrono::Utc::now(),
        "config": {
            "repositoryType": state.config.storage_mode.as_str(),
            "filePath": state.config.data_file,
        },
    }))
}

/// GET /api
pub async fn api_info(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(json!({
        "success": true,
        "message": "Habit Tracker API",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "habits": "/api/habits",
            "health": "/health",
        },
        "documentation": {
            "description": "RESTful API for habit tracking",
            "repositoryType": state.config.storage_mode.as_str(),
        },
    }))
}

/// GET /api/habits
pub async fn list_habits(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let limit = query.limit.unwrap_or(DEFAULT_PAGE_LIMIT);
    let offset = query.offset.unwrap_or(0);

    let page = state
        .service
        .all_habits_with_today_status(Some(limit), Some(offset))
        .await
        .map_err(|e| ApiError::from(e).internal_context("Failed to retrieve habits"))?;

    Ok(ok_page(page.habits, page.total, "Habits retrieved successfully"))
}

/// GET /api/habits/:id
pub async fn get_habit(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let record = state
        .service
        .habit_by_id(&HabitId(id))
        .await
        .map_err(|e| ApiError::from(e).internal_context("Failed to retrieve habit"))?
        .ok_or_else(|| ApiError::not_found("Habit with the specified ID was not found"))?;

    Ok(ok(record, "Habit retrieved successfully"))
}

/// POST /api/habits
pub async fn create_habit(
    State(state): State<AppState>,
    Json(input): Json<NewHabit>,
) -> Result<impl IntoResponse, ApiError> {
    let record = state
        .service
        .create_habit(input)
        .await
        .map_err(|e| ApiError::from(e).internal_context("Failed to create habit"))?;

    Ok((
        StatusCode::CREATED,
        ok(record, "Habit created successfully"),
    ))
}

/// PUT /api/habits/:id
pub async fn update_habit(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(patch): Json<HabitPatch>,
) -> Result<impl IntoResponse, ApiError> {
    let record = state
        .service
        .update_habit(&HabitId(id), patch)
        .await
        .map_err(|e| ApiError::from(e).internal_context("Failed to update habit"))?;

    Ok(ok(record, "Habit updated successfully"))
}

/// DELETE /api/habits/:id
pub async fn delete_habit(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .service
        .delete_habit(&HabitId(id))
        .await
        .map_err(|e| ApiError::from(e).internal_context("Failed to delete habit"))?;

    Ok(Json(json!({
        "success": true,
        "message": "Habit deleted successfully",
    })))
}

/// PATCH /api/habits/:id/toggle
pub async fn toggle_habit(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let record = state
        .service
        .toggle_habit_for_today(&HabitId(id))
        .await
        .map_err(|e| ApiError::from(e).internal_context("Failed to toggle habit"))?;

    Ok(ok(record, "Habit toggled successfully"))
}

/// PATCH /api/habits/:id/complete
pub async fn complete_habit(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let record = state
        .service
        .mark_habit_completed_for_today(&HabitId(id))
        .await
        .map_err(|e| ApiError::from(e).internal_context("Failed to mark habit as completed"))?;

    Ok(ok(record, "Habit marked as completed"))
}

/// PATCH /api/habits/:id/uncomplete
pub async fn uncomplete_habit(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let record = state
        .service
        .mark_habit_not_completed_for_today(&HabitId(id))
        .await
        .map_err(|e| ApiError::from(e).internal_context("Failed to mark habit as not completed"))?;

    Ok(ok(record, "Habit marked as not completed"))
}

/// GET /api/habits/stats/statistics
pub async fn statistics(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let stats = state
        .service
        .statistics()
        .await
        .map_err(|e| ApiError::from(e).internal_context("Failed to retrieve statistics"))?;

    Ok(ok(stats, "Statistics retrieved successfully"))
}

/// GET /api/habits/summary
pub async fn summary(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let summary = state
        .service
        .summary()
        .await
        .map_err(|e| ApiError::from(e).internal_context("Failed to retrieve habit summary"))?;

    Ok(ok(summary, "Habit summary retrieved successfully"))
}

/// GET /api/habits/list
pub async fn id_names(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let pairs = state
        .service
        .all_id_name()
        .await
        .map_err(|e| ApiError::from(e).internal_context("Failed to retrieve habit names"))?;

    Ok(Json(json!({ "success": true, "data": pairs })))
}

/// GET /api/habits/history
pub async fn history(
    State(state): State<AppState>,
    Query(query): Query<HistoryQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let days = query.days.unwrap_or(7);
    let habit_id = query.habit_id.map(HabitId);

    let page = state
        .service
        .habits_with_history(days, query.limit, query.offset, habit_id)
        .await
        .map_err(|e| ApiError::from(e).internal_context("Failed to retrieve habits with history"))?;

    Ok(ok_page(
        page.habits,
        page.total,
        "Habits with history retrieved successfully",
    ))
}

/// Fallback for unknown routes.
pub async fn not_found(uri: Uri) -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(json!({
            "success": false,
            "error": "Not Found",
            "message": format!("Route {uri} not found"),
            "availableEndpoints": [
                "GET /health",
                "GET /api",
                "GET /api/habits",
                "POST /api/habits",
                "GET /api/habits/:id",
                "PUT /api/habits/:id",
                "DELETE /api/habits/:id",
                "PATCH /api/habits/:id/toggle",
                "PATCH /api/habits/:id/complete",
                "PATCH /api/habits/:id/uncomplete",
                "GET /api/habits/stats/statistics",
                "GET /api/habits/history",
                "GET /api/habits/summary",
                "GET /api/habits/list",
            ],
        })),
    )
}
