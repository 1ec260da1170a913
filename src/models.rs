use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const SCHEMA_VERSION: u32 = 1;

pub const DEFAULT_PHRASE: &str = "Gratitude";
pub const DEFAULT_TARGET: u64 = 33;
pub const DEFAULT_DAILY_GOAL: i64 = 300;
pub const DEFAULT_WEEKLY_GOAL: i64 = 2000;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub id: String,
    pub phrase: String,
    pub count: u64,
    pub saved_at: DateTime<Local>,
    pub completed: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct DayStats {
    pub date: String,
    pub total_count: u64,
    pub sessions: Vec<Session>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BestDay {
    pub date: String,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TallyData {
    pub version: u32,
    pub current_count: u64,
    pub current_phrase: String,
    pub target_count: u64,
    pub total_count: u64,
    pub points: u64,
    pub days: BTreeMap<String, DayStats>,
    pub best_day: Option<BestDay>,
    pub sound_enabled: bool,
    pub vibration_enabled: bool,
    pub dark_mode: bool,
    pub notifications: bool,
    pub daily_goal: i64,
    pub weekly_goal: i64,
}

impl Default for TallyData {
    fn default() -> Self {
        Self {
            version: SCHEMA_VERSION,
            current_count: 0,
            current_phrase: DEFAULT_PHRASE.to_string(),
            target_count: DEFAULT_TARGET,
            total_count: 0,
            points: 0,
            days: BTreeMap::new(),
            best_day: None,
            sound_enabled: true,
            vibration_enabled: true,
            dark_mode: false,
            notifications: true,
            daily_goal: DEFAULT_DAILY_GOAL,
            weekly_goal: DEFAULT_WEEKLY_GOAL,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct PhraseRequest {
    pub phrase: String,
}

#[derive(Debug, Deserialize)]
pub struct TargetRequest {
    pub target: u64,
}

#[derive(Debug, Deserialize)]
pub struct GoalsRequest {
    pub daily: Option<i64>,
    pub weekly: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct CounterResponse {
    pub current_count: u64,
    pub current_phrase: String,
    pub target_count: u64,
    pub total_count: u64,
    pub points: u64,
    pub level: u64,
}

#[derive(Debug, Serialize)]
pub struct StateResponse {
    pub current_count: u64,
    pub current_phrase: String,
    pub target_count: u64,
    pub total_count: u64,
    pub points: u64,
    pub level: u64,
    pub best_day: Option<BestDay>,
    pub sound_enabled: bool,
    pub vibration_enabled: bool,
    pub dark_mode: bool,
    pub notifications: bool,
    pub daily_goal: i64,
    pub weekly_goal: i64,
}

#[derive(Debug, Serialize)]
pub struct ToggleResponse {
    pub enabled: bool,
}

#[derive(Debug, Serialize)]
pub struct GoalsResponse {
    pub daily_goal: i64,
    pub weekly_goal: i64,
}

#[derive(Debug, Serialize)]
pub struct TodayResponse {
    pub date: String,
    pub stats: Option<DayStats>,
}

#[derive(Debug, Serialize)]
pub struct SaveSessionResponse {
    pub saved: bool,
    pub current_count: u64,
    pub today: Option<DayStats>,
}

#[derive(Debug, Serialize)]
pub struct DailyPoint {
    pub date: String,
    pub total_count: u64,
}

#[derive(Debug, Serialize)]
pub struct GoalProgress {
    pub goal: i64,
    pub total: u64,
    pub remaining: i64,
    pub completed: bool,
}

#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub last_7_days: Vec<DailyPoint>,
    pub today_total: u64,
    pub weekly_total: u64,
    pub monthly_total: u64,
    pub best_day: Option<BestDay>,
    pub daily_goal: GoalProgress,
    pub weekly_goal: GoalProgress,
    pub points: u64,
    pub level: u64,
}
