use crate::models::{DailyPoint, DayStats, GoalProgress, StatsResponse, TallyData};
use crate::store::level_for;
use chrono::{DateTime, Duration, Local, NaiveDate};
use std::collections::BTreeMap;

pub fn build_stats(data: &TallyData) -> StatsResponse {
    build_stats_at(Local::now(), data)
}

pub fn build_stats_at(now: DateTime<Local>, data: &TallyData) -> StatsResponse {
    let today = now.date_naive();
    let today_total = data
        .days
        .get(&date_key(today))
        .map_or(0, |day| day.total_count);
    let weekly_total = rolling_total(&data.days, now, 7);

    StatsResponse {
        last_7_days: last_7_days(&data.days, today),
        today_total,
        weekly_total,
        monthly_total: rolling_total(&data.days, now, 30),
        best_day: data.best_day.clone(),
        daily_goal: goal_progress(data.daily_goal, today_total),
        weekly_goal: goal_progress(data.weekly_goal, weekly_total),
        points: data.points,
        level: level_for(data.points),
    }
}

/// Sum of day totals inside the inclusive rolling window ending today.
/// Day granularity: a bucket dated exactly `window_days` ago is still
/// in, one day older is out.
pub fn rolling_total(
    days: &BTreeMap<String, DayStats>,
    now: DateTime<Local>,
    window_days: i64,
) -> u64 {
    let start = (now - Duration::days(window_days)).date_naive();
    let end = now.date_naive();

    days.values()
        .filter(|day| match NaiveDate::parse_from_str(&day.date, "%Y-%m-%d") {
            Ok(date) => date >= start && date <= end,
            Err(_) => false,
        })
        .map(|day| day.total_count)
        .sum()
}

pub fn last_7_days(days: &BTreeMap<String, DayStats>, today: NaiveDate) -> Vec<DailyPoint> {
    let mut points = Vec::with_capacity(7);
    for offset in (0..7).rev() {
        let date = today - Duration::days(offset);
        let total = days.get(&date_key(date)).map_or(0, |day| day.total_count);
        points.push(DailyPoint {
            date: date.to_string(),
            total_count: total,
        });
    }
    points
}

pub fn goal_progress(goal: i64, total: u64) -> GoalProgress {
    let reached = total.min(i64::MAX as u64) as i64;
    GoalProgress {
        goal,
        total,
        remaining: (goal - reached).max(0),
        completed: reached >= goal,
    }
}

fn date_key(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}
