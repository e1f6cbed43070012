use crate::handlers;
use crate::state::AppState;
use axum::{routing::{delete, get, post}, Router};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/log/add", post(handlers::form_add))
        .route("/log/remove", post(handlers::form_remove))
        .route("/api/summary", get(handlers::get_summary))
        .route("/api/today", get(handlers::get_today))
        .route("/api/week", get(handlers::get_week))
        .route("/api/logs", get(handlers::get_logs).post(handlers::add_log))
        .route("/api/logs/remove-last", post(handlers::remove_last))
        .route("/api/logs/:id", delete(handlers::delete_log))
        .route("/api/profile", get(handlers::get_profile).put(handlers::put_profile))
        .route(
            "/api/draft",
            get(handlers::get_draft)
                .patch(handlers::patch_draft)
                .delete(handlers::clear_draft),
        )
        .route("/api/setup/dismiss", post(handlers::dismiss_setup))
        .with_state(state)
}
