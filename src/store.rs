use crate::feedback::Feedback;
use crate::models::{BestDay, DayStats, SCHEMA_VERSION, Session, TallyData};
use crate::stats::rolling_total;
use chrono::{DateTime, Local};
use uuid::Uuid;

pub fn day_key(now: DateTime<Local>) -> String {
    now.date_naive().format("%Y-%m-%d").to_string()
}

pub fn level_for(points: u64) -> u64 {
    points / 1000 + 1
}

pub struct TallyStore {
    data: TallyData,
    feedback: Box<dyn Feedback>,
}

impl TallyStore {
    pub fn new(mut data: TallyData, feedback: Box<dyn Feedback>) -> Self {
        data.version = SCHEMA_VERSION;
        Self { data, feedback }
    }

    pub fn data(&self) -> &TallyData {
        &self.data
    }

    pub fn level(&self) -> u64 {
        level_for(self.data.points)
    }

    pub fn increment(&mut self) {
        self.increment_at(Local::now());
    }

    pub fn increment_at(&mut self, now: DateTime<Local>) {
        // feedback compares the count before this increment to the
        // target: the call that reaches the target no longer pulses
        if self.data.current_count < self.data.target_count {
            if self.data.sound_enabled {
                self.feedback.tone();
            }
            if self.data.vibration_enabled {
                self.feedback.pulse();
            }
        }

        self.data.current_count += 1;
        self.data.total_count += 1;
        self.data.points += 1;
        self.add_to_day(day_key(now), 1);
    }

    pub fn reset(&mut self) {
        self.data.current_count = 0;
    }

    pub fn set_phrase(&mut self, phrase: String) {
        // switching phrases discards the in-progress tally so counts
        // for different phrases never mix within one session
        self.data.current_phrase = phrase;
        self.data.current_count = 0;
    }

    pub fn set_target_count(&mut self, target: u64) {
        self.data.target_count = target;
    }

    pub fn save_session(&mut self) -> bool {
        self.save_session_at(Local::now())
    }

    pub fn save_session_at(&mut self, now: DateTime<Local>) -> bool {
        if self.data.current_count == 0 {
            return false;
        }

        let count = self.data.current_count;
        let session = Session {
            id: Uuid::new_v4().to_string(),
            phrase: self.data.current_phrase.clone(),
            count,
            saved_at: now,
            completed: count >= self.data.target_count,
        };

        let key = day_key(now);
        let entry = self
            .data
            .days
            .entry(key.clone())
            .or_insert_with(|| DayStats {
                date: key,
                total_count: 0,
                sessions: Vec::new(),
            });
        entry.sessions.push(session);
        // live increments already counted these one by one; the saved
        // session adds its full count again as a batch
        entry.total_count = entry.total_count.saturating_add(count);

        self.refresh_best_day();
        self.data.current_count = 0;
        true
    }

    pub fn toggle_sound(&mut self) -> bool {
        self.data.sound_enabled = !self.data.sound_enabled;
        self.data.sound_enabled
    }

    pub fn toggle_vibration(&mut self) -> bool {
        self.data.vibration_enabled = !self.data.vibration_enabled;
        self.data.vibration_enabled
    }

    /// The returned value doubles as the one-shot theme signal the
    /// presentation layer applies.
    pub fn toggle_dark_mode(&mut self) -> bool {
        self.data.dark_mode = !self.data.dark_mode;
        self.data.dark_mode
    }

    pub fn toggle_notifications(&mut self) -> bool {
        self.data.notifications = !self.data.notifications;
        self.data.notifications
    }

    pub fn set_daily_goal(&mut self, goal: i64) {
        self.data.daily_goal = goal;
    }

    pub fn set_weekly_goal(&mut self, goal: i64) {
        self.data.weekly_goal = goal;
    }

    pub fn today_stats(&self) -> Option<&DayStats> {
        self.today_stats_at(Local::now())
    }

    pub fn today_stats_at(&self, now: DateTime<Local>) -> Option<&DayStats> {
        self.data.days.get(&day_key(now))
    }

    pub fn weekly_total(&self) -> u64 {
        self.weekly_total_at(Local::now())
    }

    pub fn weekly_total_at(&self, now: DateTime<Local>) -> u64 {
        rolling_total(&self.data.days, now, 7)
    }

    pub fn monthly_total(&self) -> u64 {
        self.monthly_total_at(Local::now())
    }

    pub fn monthly_total_at(&self, now: DateTime<Local>) -> u64 {
        rolling_total(&self.data.days, now, 30)
    }

    pub fn replace(&mut self, mut data: TallyData) {
        data.version = SCHEMA_VERSION;
        self.data = data;
    }

    pub fn wipe(&mut self) {
        self.data = TallyData::default();
    }

    fn add_to_day(&mut self, date: String, count: u64) {
        let entry = self
            .data
            .days
            .entry(date.clone())
            .or_insert_with(|| DayStats {
                date,
                total_count: 0,
                sessions: Vec::new(),
            });
        entry.total_count = entry.total_count.saturating_add(count);
        self.refresh_best_day();
    }

    // Full recompute seeded with the incumbent; only a strictly
    // greater total replaces it, so ties keep the earliest date.
    fn refresh_best_day(&mut self) {
        let mut best = self.data.best_day.take();
        for day in self.data.days.values() {
            let beats = match &best {
                Some(current) => day.total_count > current.count,
                None => true,
            };
            if beats {
                best = Some(BestDay {
                    date: day.date.clone(),
                    count: day.total_count,
                });
            }
        }
        self.data.best_day = best;
    }
}
