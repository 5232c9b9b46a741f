//! User Profile v0.4.0
//!
//! The aggregate root the whole engine mutates: XP, level, streaks, lifetime
//! counters, achievements, chains, per-day stats, goals, notes, settings.
//! One profile per device; created on first launch, loaded and backfilled on
//! every later launch, persisted write-through after each mutation.

use crate::achievements::{
    default_achievements, default_chains, Achievement, AchievementChain, CATALOG_VERSION,
};
use crate::goals::{default_goals, SessionGoal, SessionNote};
use crate::levels;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

/// Canonical day key used for `daily_stats`.
pub fn date_key(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Per-day aggregate. Created lazily on a day's first session, never deleted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DailyStats {
    pub date: String,
    #[serde(default)]
    pub offline_minutes: u64,
    #[serde(default)]
    pub xp_earned: u64,
    #[serde(default)]
    pub achievements_unlocked: Vec<String>,
    #[serde(default)]
    pub session_count: u32,
    #[serde(default)]
    pub session_notes: Vec<Uuid>,
}

/// User-tunable engine settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default = "default_daily_goal")]
    pub daily_goal_minutes: u64,
    #[serde(default = "default_reminders")]
    pub reminders_enabled: bool,
    #[serde(default = "default_reminder_hour")]
    pub reminder_hour: u32,
}

fn default_daily_goal() -> u64 {
    60
}

fn default_reminders() -> bool {
    true
}

fn default_reminder_hour() -> u32 {
    20
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            daily_goal_minutes: default_daily_goal(),
            reminders_enabled: default_reminders(),
            reminder_hour: default_reminder_hour(),
        }
    }
}

fn default_level() -> u8 {
    1
}

/// The aggregate root. Every field `#[serde(default)]`s so profiles written
/// by older catalog versions rehydrate cleanly; `migrate` fills the rest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub total_xp: u64,
    #[serde(default = "default_level")]
    pub level: u8,
    #[serde(default)]
    pub current_streak: u32,
    #[serde(default)]
    pub longest_streak: u32,
    /// Day key of the last goal-met day counted into the streak
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_streak_date: Option<String>,
    #[serde(default)]
    pub total_offline_minutes: u64,
    #[serde(default)]
    pub total_sessions: u64,
    #[serde(default)]
    pub weekend_sessions: u64,
    #[serde(default)]
    pub morning_sessions: u64,
    #[serde(default)]
    pub evening_sessions: u64,
    #[serde(default)]
    pub achievements: Vec<Achievement>,
    #[serde(default)]
    pub chains: Vec<AchievementChain>,
    /// Chain ids whose one-time bonus has been paid
    #[serde(default)]
    pub chains_completed: Vec<String>,
    #[serde(default)]
    pub daily_stats: BTreeMap<String, DailyStats>,
    #[serde(default)]
    pub session_goals: Vec<SessionGoal>,
    #[serde(default)]
    pub session_notes: Vec<SessionNote>,
    #[serde(default)]
    pub settings: Settings,
    #[serde(default)]
    pub catalog_version: u32,
}

impl UserProfile {
    /// Fresh profile with the default catalogs.
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            created_at: now,
            updated_at: now,
            total_xp: 0,
            level: 1,
            current_streak: 0,
            longest_streak: 0,
            last_streak_date: None,
            total_offline_minutes: 0,
            total_sessions: 0,
            weekend_sessions: 0,
            morning_sessions: 0,
            evening_sessions: 0,
            achievements: default_achievements(),
            chains: default_chains(),
            chains_completed: Vec::new(),
            daily_stats: BTreeMap::new(),
            session_goals: default_goals(now),
            session_notes: Vec::new(),
            settings: Settings::default(),
            catalog_version: CATALOG_VERSION,
        }
    }

    /// Backfill a profile persisted by an older catalog version.
    ///
    /// Adds catalog entries the stored profile is missing, keyed by id;
    /// never overwrites fields that are already present, so unlock state and
    /// counters survive. Idempotent.
    pub fn migrate(&mut self, now: DateTime<Utc>) {
        for def in default_achievements() {
            if !self.achievements.iter().any(|a| a.id == def.id) {
                self.achievements.push(def);
            }
        }
        for def in default_chains() {
            if !self.chains.iter().any(|c| c.id == def.id) {
                self.chains.push(def);
            }
        }
        if self.session_goals.is_empty() {
            self.session_goals = default_goals(now);
        }
        self.catalog_version = CATALOG_VERSION;
    }

    /// Today's entry, created on first touch.
    pub fn day_mut(&mut self, date: NaiveDate) -> &mut DailyStats {
        let key = date_key(date);
        self.daily_stats.entry(key.clone()).or_insert_with(|| DailyStats {
            date: key,
            ..DailyStats::default()
        })
    }

    /// Offline minutes recorded for a day, 0 if no entry.
    pub fn day_minutes(&self, date: NaiveDate) -> u64 {
        self.daily_stats
            .get(&date_key(date))
            .map(|d| d.offline_minutes)
            .unwrap_or(0)
    }

    /// Whether a day's entry meets the daily goal.
    pub fn day_met_goal(&self, date: NaiveDate) -> bool {
        self.day_minutes(date) >= self.settings.daily_goal_minutes
    }

    /// Add XP to the running total and to a day's earned column.
    pub fn add_xp(&mut self, amount: u64, date: NaiveDate) {
        self.total_xp = self.total_xp.saturating_add(amount);
        let day = self.day_mut(date);
        day.xp_earned = day.xp_earned.saturating_add(amount);
    }

    pub fn achievement(&self, id: &str) -> Option<&Achievement> {
        self.achievements.iter().find(|a| a.id == id)
    }

    pub fn unlocked_count(&self) -> usize {
        self.achievements.iter().filter(|a| a.unlocked).count()
    }

    /// Multiplier of the profile's current level.
    pub fn xp_multiplier(&self) -> f64 {
        levels::info_for(self.level).xp_multiplier
    }

    /// Lifetime offline time in hours (minute precision internally).
    pub fn total_offline_hours(&self) -> f64 {
        self.total_offline_minutes as f64 / 60.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 4, 10, 0, 0).single().unwrap()
    }

    #[test]
    fn test_new_profile_defaults() {
        let profile = UserProfile::new(fixed_now());
        assert_eq!(profile.total_xp, 0);
        assert_eq!(profile.level, 1);
        assert_eq!(profile.current_streak, 0);
        assert!(!profile.achievements.is_empty());
        assert!(profile.achievements.iter().all(|a| !a.unlocked));
        assert_eq!(profile.chains.len(), 2);
        assert_eq!(profile.settings.daily_goal_minutes, 60);
        assert_eq!(profile.catalog_version, CATALOG_VERSION);
    }

    #[test]
    fn test_day_mut_creates_lazily() {
        let mut profile = UserProfile::new(fixed_now());
        let date = fixed_now().date_naive();
        assert_eq!(profile.day_minutes(date), 0);
        profile.day_mut(date).offline_minutes += 30;
        assert_eq!(profile.day_minutes(date), 30);
        assert_eq!(profile.daily_stats.len(), 1);
        assert_eq!(profile.daily_stats["2026-03-04"].date, "2026-03-04");
    }

    #[test]
    fn test_add_xp_updates_total_and_day() {
        let mut profile = UserProfile::new(fixed_now());
        let date = fixed_now().date_naive();
        profile.add_xp(80, date);
        assert_eq!(profile.total_xp, 80);
        assert_eq!(profile.daily_stats[&date_key(date)].xp_earned, 80);
    }

    #[test]
    fn test_migrate_adds_missing_and_preserves_unlocks() {
        let mut profile = UserProfile::new(fixed_now());
        // Simulate an older profile: fewer achievements, one unlocked
        profile.achievements.truncate(3);
        profile.achievements[0].unlocked = true;
        profile.achievements[0].unlocked_at = Some(fixed_now());
        profile.chains.clear();
        profile.catalog_version = 1;

        profile.migrate(fixed_now());

        assert_eq!(profile.achievements.len(), default_achievements().len());
        assert!(profile.achievements[0].unlocked);
        assert_eq!(profile.chains.len(), 2);
        assert_eq!(profile.catalog_version, CATALOG_VERSION);

        // Idempotent
        let snapshot = profile.clone();
        profile.migrate(fixed_now());
        assert_eq!(profile, snapshot);
    }

    #[test]
    fn test_serde_round_trip() {
        let mut profile = UserProfile::new(fixed_now());
        profile.add_xp(120, fixed_now().date_naive());
        profile.current_streak = 4;
        profile.last_streak_date = Some("2026-03-04".to_string());

        let json = serde_json::to_string(&profile).unwrap();
        let back: UserProfile = serde_json::from_str(&json).unwrap();
        assert_eq!(back, profile);
    }

    #[test]
    fn test_missing_fields_backfill_on_deserialize() {
        // An old minimal document: only XP and one unlocked achievement
        let raw = r#"{
            "total_xp": 500,
            "achievements": [{
                "id": "first_steps",
                "title": "First Steps",
                "description": "Spend 30 offline minutes in one day",
                "category": "time_based",
                "rarity": "common",
                "target": {"daily_minutes": {"minutes": 30}},
                "xp_reward": 50,
                "unlocked": true
            }]
        }"#;
        let mut profile: UserProfile = serde_json::from_str(raw).unwrap();
        assert_eq!(profile.total_xp, 500);
        assert_eq!(profile.level, 1);
        assert_eq!(profile.current_streak, 0);
        assert_eq!(profile.settings.daily_goal_minutes, 60);
        assert!(profile.daily_stats.is_empty());

        profile.migrate(Utc::now());
        assert_eq!(profile.achievements.len(), default_achievements().len());
        let first = profile.achievement("first_steps").unwrap();
        assert!(first.unlocked);
        assert!(!profile.session_goals.is_empty());
    }

    #[test]
    fn test_offline_hours_derived() {
        let mut profile = UserProfile::new(fixed_now());
        profile.total_offline_minutes = 90;
        assert_eq!(profile.total_offline_hours(), 1.5);
    }
}
