use crate::handlers;
use crate::state::AppState;
use axum::{routing::{get, post}, Router};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/api/state", get(handlers::get_state))
        .route("/api/increment", post(handlers::increment))
        .route("/api/reset", post(handlers::reset))
        .route("/api/session/save", post(handlers::save_session))
        .route("/api/phrase", post(handlers::set_phrase))
        .route("/api/target", post(handlers::set_target))
        .route("/api/goals", post(handlers::set_goals))
        .route("/api/settings/sound", post(handlers::toggle_sound))
        .route("/api/settings/vibration", post(handlers::toggle_vibration))
        .route("/api/settings/dark-mode", post(handlers::toggle_dark_mode))
        .route("/api/settings/notifications", post(handlers::toggle_notifications))
        .route("/api/today", get(handlers::get_today))
        .route("/api/stats", get(handlers::get_stats))
        .route("/api/export", get(handlers::export_data))
        .route("/api/import", post(handlers::import_data))
        .route("/api/wipe", post(handlers::wipe_data))
        .with_state(state)
}
