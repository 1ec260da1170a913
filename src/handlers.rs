use crate::errors::AppError;
use crate::models::{
    CounterResponse, GoalsRequest, GoalsResponse, PhraseRequest, SCHEMA_VERSION,
    SaveSessionResponse, StateResponse, StatsResponse, TallyData, TargetRequest, TodayResponse,
    ToggleResponse,
};
use crate::state::AppState;
use crate::stats::build_stats;
use crate::storage::persist_data;
use crate::store::{TallyStore, day_key};
use crate::ui::render_index;
use axum::{Json, extract::State, response::Html};
use chrono::Local;

pub async fn index(State(state): State<AppState>) -> Html<String> {
    let store = state.store.lock().await;
    Html(render_index(store.data()))
}

pub async fn get_state(State(state): State<AppState>) -> Json<StateResponse> {
    let store = state.store.lock().await;
    Json(state_view(&store))
}

pub async fn increment(State(state): State<AppState>) -> Result<Json<CounterResponse>, AppError> {
    let mut store = state.store.lock().await;
    store.increment();
    persist_data(&state.data_path, store.data()).await?;
    Ok(Json(counter_view(&store)))
}

pub async fn reset(State(state): State<AppState>) -> Result<Json<CounterResponse>, AppError> {
    let mut store = state.store.lock().await;
    store.reset();
    persist_data(&state.data_path, store.data()).await?;
    Ok(Json(counter_view(&store)))
}

pub async fn save_session(
    State(state): State<AppState>,
) -> Result<Json<SaveSessionResponse>, AppError> {
    let mut store = state.store.lock().await;
    let saved = store.save_session();
    if saved {
        persist_data(&state.data_path, store.data()).await?;
    }
    Ok(Json(SaveSessionResponse {
        saved,
        current_count: store.data().current_count,
        today: store.today_stats().cloned(),
    }))
}

pub async fn set_phrase(
    State(state): State<AppState>,
    Json(payload): Json<PhraseRequest>,
) -> Result<Json<CounterResponse>, AppError> {
    let phrase = payload.phrase.trim();
    if phrase.is_empty() {
        return Err(AppError::invalid_input("phrase must not be empty"));
    }

    let mut store = state.store.lock().await;
    store.set_phrase(phrase.to_string());
    persist_data(&state.data_path, store.data()).await?;
    Ok(Json(counter_view(&store)))
}

pub async fn set_target(
    State(state): State<AppState>,
    Json(payload): Json<TargetRequest>,
) -> Result<Json<CounterResponse>, AppError> {
    if payload.target == 0 {
        return Err(AppError::invalid_input("target must be at least 1"));
    }

    let mut store = state.store.lock().await;
    store.set_target_count(payload.target);
    persist_data(&state.data_path, store.data()).await?;
    Ok(Json(counter_view(&store)))
}

pub async fn set_goals(
    State(state): State<AppState>,
    Json(payload): Json<GoalsRequest>,
) -> Result<Json<GoalsResponse>, AppError> {
    let mut store = state.store.lock().await;
    if let Some(daily) = payload.daily {
        store.set_daily_goal(daily);
    }
    if let Some(weekly) = payload.weekly {
        store.set_weekly_goal(weekly);
    }
    persist_data(&state.data_path, store.data()).await?;
    Ok(Json(GoalsResponse {
        daily_goal: store.data().daily_goal,
        weekly_goal: store.data().weekly_goal,
    }))
}

pub async fn toggle_sound(State(state): State<AppState>) -> Result<Json<ToggleResponse>, AppError> {
    apply_toggle(&state, |store| store.toggle_sound()).await
}

pub async fn toggle_vibration(
    State(state): State<AppState>,
) -> Result<Json<ToggleResponse>, AppError> {
    apply_toggle(&state, |store| store.toggle_vibration()).await
}

pub async fn toggle_dark_mode(
    State(state): State<AppState>,
) -> Result<Json<ToggleResponse>, AppError> {
    apply_toggle(&state, |store| store.toggle_dark_mode()).await
}

pub async fn toggle_notifications(
    State(state): State<AppState>,
) -> Result<Json<ToggleResponse>, AppError> {
    apply_toggle(&state, |store| store.toggle_notifications()).await
}

pub async fn get_today(State(state): State<AppState>) -> Json<TodayResponse> {
    let store = state.store.lock().await;
    let now = Local::now();
    Json(TodayResponse {
        date: day_key(now),
        stats: store.today_stats_at(now).cloned(),
    })
}

pub async fn get_stats(State(state): State<AppState>) -> Json<StatsResponse> {
    let store = state.store.lock().await;
    Json(build_stats(store.data()))
}

pub async fn export_data(State(state): State<AppState>) -> Json<TallyData> {
    let store = state.store.lock().await;
    Json(store.data().clone())
}

pub async fn import_data(
    State(state): State<AppState>,
    Json(payload): Json<TallyData>,
) -> Result<Json<StateResponse>, AppError> {
    if payload.version > SCHEMA_VERSION {
        return Err(AppError::invalid_input(format!(
            "snapshot version {} is newer than supported version {}",
            payload.version, SCHEMA_VERSION
        )));
    }

    let mut store = state.store.lock().await;
    store.replace(payload);
    persist_data(&state.data_path, store.data()).await?;
    Ok(Json(state_view(&store)))
}

pub async fn wipe_data(State(state): State<AppState>) -> Result<Json<StateResponse>, AppError> {
    let mut store = state.store.lock().await;
    store.wipe();
    persist_data(&state.data_path, store.data()).await?;
    Ok(Json(state_view(&store)))
}

async fn apply_toggle(
    state: &AppState,
    flip: impl FnOnce(&mut TallyStore) -> bool,
) -> Result<Json<ToggleResponse>, AppError> {
    let mut store = state.store.lock().await;
    let enabled = flip(&mut *store);
    persist_data(&state.data_path, store.data()).await?;
    Ok(Json(ToggleResponse { enabled }))
}

fn counter_view(store: &TallyStore) -> CounterResponse {
    let data = store.data();
    CounterResponse {
        current_count: data.current_count,
        current_phrase: data.current_phrase.clone(),
        target_count: data.target_count,
        total_count: data.total_count,
        points: data.points,
        level: store.level(),
    }
}

fn state_view(store: &TallyStore) -> StateResponse {
    let data = store.data();
    StateResponse {
        current_count: data.current_count,
        current_phrase: data.current_phrase.clone(),
        target_count: data.target_count,
        total_count: data.total_count,
        points: data.points,
        level: store.level(),
        best_day: data.best_day.clone(),
        sound_enabled: data.sound_enabled,
        vibration_enabled: data.vibration_enabled,
        dark_mode: data.dark_mode,
        notifications: data.notifications,
        daily_goal: data.daily_goal,
        weekly_goal: data.weekly_goal,
    }
}
