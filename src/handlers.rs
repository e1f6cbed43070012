use crate::errors::AppError;
use crate::models::{
    AddResponse, DetailDraft, DetailPatch, HistoryDay, Profile, ProfileResponse, RemoveResponse,
    Summary, TodayResponse, WeekBucket,
};
use crate::state::AppState;
use crate::stats;
use crate::storage::{LOGS_KEY, PROFILE_KEY, SETUP_DISMISSED_KEY};
use crate::tracker::Tracker;
use crate::ui::render_index;
use axum::{
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    response::{Html, Redirect},
    Json,
};
use chrono::Local;
use tracing::info;

pub async fn index(State(state): State<AppState>) -> Html<String> {
    let tracker = state.tracker.lock().await;
    let today = stats::today_view(tracker.log(), &Local::now());
    Html(render_index(&today))
}

pub async fn get_summary(State(state): State<AppState>) -> Json<Summary> {
    let tracker = state.tracker.lock().await;
    Json(tracker.summary(&Local::now()))
}

pub async fn get_today(State(state): State<AppState>) -> Json<TodayResponse> {
    let tracker = state.tracker.lock().await;
    Json(stats::today_view(tracker.log(), &Local::now()))
}

pub async fn get_week(State(state): State<AppState>) -> Json<Vec<WeekBucket>> {
    let tracker = state.tracker.lock().await;
    Json(stats::week_buckets(tracker.log(), &Local::now()))
}

pub async fn get_logs(State(state): State<AppState>) -> Json<Vec<HistoryDay>> {
    let tracker = state.tracker.lock().await;
    Json(stats::history(tracker.log(), &Local))
}

pub async fn add_log(State(state): State<AppState>) -> Result<Json<AddResponse>, AppError> {
    Ok(Json(apply_add(&state).await?))
}

pub async fn remove_last(State(state): State<AppState>) -> Result<Json<RemoveResponse>, AppError> {
    Ok(Json(apply_remove(&state).await?))
}

pub async fn form_add(State(state): State<AppState>) -> Result<Redirect, AppError> {
    apply_add(&state).await?;
    Ok(Redirect::to("/"))
}

pub async fn form_remove(State(state): State<AppState>) -> Result<Redirect, AppError> {
    apply_remove(&state).await?;
    Ok(Redirect::to("/"))
}

pub async fn delete_log(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    let mut tracker = state.tracker.lock().await;
    if tracker.delete_log(&id) {
        info!(%id, "log entry deleted");
        persist_log(&state, &tracker).await?;
    }
    Ok(StatusCode::NO_CONTENT)
}

pub async fn get_profile(State(state): State<AppState>) -> Json<ProfileResponse> {
    let tracker = state.tracker.lock().await;
    Json(tracker.profile_response(&Local::now()))
}

pub async fn put_profile(
    State(state): State<AppState>,
    payload: Result<Json<Profile>, JsonRejection>,
) -> Result<Json<ProfileResponse>, AppError> {
    let Json(profile) = payload?;
    let now = Local::now();
    let mut tracker = state.tracker.lock().await;
    tracker.save_profile(profile, &now)?;
    state.storage.save(PROFILE_KEY, &tracker.profile()).await?;
    state.storage.set_flag(SETUP_DISMISSED_KEY).await?;
    info!("profile saved");
    Ok(Json(tracker.profile_response(&now)))
}

pub async fn get_draft(State(state): State<AppState>) -> Json<DetailDraft> {
    let tracker = state.tracker.lock().await;
    Json(tracker.draft().clone())
}

pub async fn patch_draft(
    State(state): State<AppState>,
    Json(patch): Json<DetailPatch>,
) -> Json<DetailDraft> {
    let mut tracker = state.tracker.lock().await;
    Json(tracker.patch_draft(patch).clone())
}

pub async fn clear_draft(State(state): State<AppState>) -> StatusCode {
    state.tracker.lock().await.clear_draft();
    StatusCode::NO_CONTENT
}

pub async fn dismiss_setup(State(state): State<AppState>) -> Result<StatusCode, AppError> {
    let mut tracker = state.tracker.lock().await;
    tracker.dismiss_setup();
    state.storage.set_flag(SETUP_DISMISSED_KEY).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn apply_add(state: &AppState) -> Result<AddResponse, AppError> {
    let now = Local::now();
    let mut tracker = state.tracker.lock().await;
    let entry = tracker.add_one(&now);
    info!(id = %entry.id, "log entry added");

    persist_log(state, &tracker).await?;

    Ok(AddResponse {
        message: tracker.impact_message().unwrap_or_default().to_string(),
        today: stats::today_view(tracker.log(), &now),
        entry,
    })
}

async fn apply_remove(state: &AppState) -> Result<RemoveResponse, AppError> {
    let now = Local::now();
    let mut tracker = state.tracker.lock().await;
    let removed = tracker.remove_last_today(&now);
    if let Some(entry) = &removed {
        info!(id = %entry.id, "removed latest entry for today");
        persist_log(state, &tracker).await?;
    }

    Ok(RemoveResponse {
        removed,
        today: stats::today_view(tracker.log(), &now),
    })
}

async fn persist_log(state: &AppState, tracker: &Tracker) -> Result<(), AppError> {
    state.storage.save(LOGS_KEY, tracker.log()).await
}
