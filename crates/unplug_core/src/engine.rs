//! Progression Engine v0.4.2
//!
//! The single service object the app constructs at startup and passes to
//! every consumer. Owns the profile aggregate, the store boundary, and the
//! outgoing event queue.
//!
//! ## Session pipeline
//!
//! ```text
//! record_session
//!   -> daily stats + lifetime counters
//!   -> XP award (level multiplier, streak bonus, daily-goal bonus)
//!   -> level refresh from the level table
//!   -> achievement evaluation (+ level achievements on level-up)
//!   -> chain evaluation
//!   -> streak update
//!   -> persist (write-through) + ProfileChanged
//! ```
//!
//! Single-threaded and synchronous throughout; the engine assumes a single
//! writer and never retries or rolls back a failed store write. In-memory
//! state stays authoritative for the process lifetime.

use crate::evaluator::{self, SessionContext, Unlock};
use crate::events::ProgressionEvent;
use crate::goals::{SessionGoal, SessionNote};
use crate::levels;
use crate::profile::{date_key, DailyStats, Settings, UserProfile};
use crate::store::{KvStore, PROFILE_KEY};
use crate::streaks;
use crate::xp;
use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use tracing::{debug, warn};
use uuid::Uuid;

/// Per-achievement progress row for UI lists.
#[derive(Debug, Clone, Serialize)]
pub struct AchievementProgress {
    pub id: String,
    pub title: String,
    pub description: String,
    pub category: &'static str,
    pub rarity: &'static str,
    pub unlocked: bool,
    /// 0-100; 100 once unlocked
    pub percent: u8,
}

/// Aggregate of the last 7 daily entries.
#[derive(Debug, Clone, Default, Serialize)]
pub struct WeeklyStats {
    pub offline_minutes: u64,
    pub xp_earned: u64,
    pub achievements_unlocked: u32,
    pub goal_met_days: u32,
    pub sessions: u32,
}

/// The progression engine service object.
pub struct ProgressionEngine {
    profile: UserProfile,
    store: Box<dyn KvStore>,
    events: Vec<ProgressionEvent>,
}

impl ProgressionEngine {
    /// Load (or create) the profile and wrap it in an engine.
    pub fn new(store: Box<dyn KvStore>) -> Self {
        Self::with_clock(store, Utc::now())
    }

    /// Like `new` with an explicit clock, for deterministic tests.
    pub fn with_clock(store: Box<dyn KvStore>, now: DateTime<Utc>) -> Self {
        let profile = match store.get(PROFILE_KEY) {
            Some(raw) => match serde_json::from_str::<UserProfile>(&raw) {
                Ok(mut profile) => {
                    profile.migrate(now);
                    profile
                }
                Err(e) => {
                    warn!("stored profile unreadable, starting fresh: {e}");
                    UserProfile::new(now)
                }
            },
            None => UserProfile::new(now),
        };

        let mut engine = Self { profile, store, events: Vec::new() };
        engine.persist(now);
        engine
    }

    // ------------------------------------------------------------------
    // Tracking boundary
    // ------------------------------------------------------------------

    /// Record a completed offline session.
    pub fn record_session(&mut self, minutes: u64, start_time: Option<DateTime<Utc>>) {
        self.record_session_at(minutes, start_time, Utc::now());
    }

    /// `record_session` with an explicit completion time.
    pub fn record_session_at(
        &mut self,
        minutes: u64,
        start_time: Option<DateTime<Utc>>,
        now: DateTime<Utc>,
    ) {
        if minutes == 0 {
            debug!("ignoring zero-length session");
            return;
        }

        let start = start_time.unwrap_or(now);
        let ctx = SessionContext::new(minutes, start, now);
        let today = now.date_naive();

        // Daily stats and lifetime counters
        {
            let day = self.profile.day_mut(today);
            day.offline_minutes += minutes;
            day.session_count += 1;
        }
        self.profile.total_sessions += 1;
        self.profile.total_offline_minutes += minutes;
        if ctx.is_weekend() {
            self.profile.weekend_sessions += 1;
        }
        if ctx.is_morning() {
            self.profile.morning_sessions += 1;
        }
        if ctx.is_evening() {
            self.profile.evening_sessions += 1;
        }

        // XP for the session itself
        let goal_met = self.profile.day_met_goal(today);
        let gain = xp::session_xp(minutes, self.profile.level, self.profile.current_streak, goal_met);
        self.profile.add_xp(gain.total, today);
        debug!(minutes, xp = gain.total, "session recorded");

        // Refresh level from session XP. Achievement rewards land after this
        // point, so the level can trail total XP until the next call.
        let leveled_up = self.refresh_level();

        // Achievements, chains, streak
        let mut unlocks = evaluator::evaluate_all(&mut self.profile, &ctx);
        if leveled_up {
            unlocks.extend(evaluator::evaluate_level_unlocks(&mut self.profile, now));
        }
        self.emit_unlocks(&unlocks);

        for chain in evaluator::evaluate_chains(&mut self.profile) {
            self.events.push(ProgressionEvent::ChainCompleted {
                chain_id: chain.id,
                title: chain.title,
                reward_xp: chain.reward_xp,
            });
        }

        if let Some(streak) = streaks::update_streak(&mut self.profile, today) {
            if let Some(milestone) = streaks::milestone_for(streak) {
                self.events.push(ProgressionEvent::StreakMilestone { streak: milestone });
            }
        }

        self.persist(now);
        self.emit_profile_changed();
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    pub fn profile(&self) -> &UserProfile {
        &self.profile
    }

    /// XP still needed for the next level; 0 at max level.
    pub fn xp_for_next_level(&self) -> u64 {
        levels::xp_for_next_level(self.profile.total_xp)
    }

    /// Progress through the current level, 0-100.
    pub fn level_progress(&self) -> u8 {
        levels::progress_percent(self.profile.total_xp)
    }

    /// Progress rows for every achievement in catalog order.
    pub fn achievement_progress(&self) -> Vec<AchievementProgress> {
        self.achievement_progress_at(Utc::now())
    }

    pub fn achievement_progress_at(&self, now: DateTime<Utc>) -> Vec<AchievementProgress> {
        self.profile
            .achievements
            .iter()
            .map(|a| AchievementProgress {
                id: a.id.clone(),
                title: a.title.clone(),
                description: a.description.clone(),
                category: a.category.label(),
                rarity: a.rarity.label(),
                unlocked: a.unlocked,
                percent: evaluator::target_progress(a, &self.profile, now),
            })
            .collect()
    }

    /// Today's daily entry (zeroed if no session yet today).
    pub fn today_stats(&self) -> DailyStats {
        self.today_stats_at(Utc::now())
    }

    pub fn today_stats_at(&self, now: DateTime<Utc>) -> DailyStats {
        let key = date_key(now.date_naive());
        self.profile
            .daily_stats
            .get(&key)
            .cloned()
            .unwrap_or(DailyStats { date: key, ..DailyStats::default() })
    }

    /// Totals over the last 7 days, today included.
    pub fn weekly_stats(&self) -> WeeklyStats {
        self.weekly_stats_at(Utc::now())
    }

    pub fn weekly_stats_at(&self, now: DateTime<Utc>) -> WeeklyStats {
        let mut stats = WeeklyStats::default();
        let mut day: Option<NaiveDate> = Some(now.date_naive());
        for _ in 0..7 {
            let Some(d) = day else { break };
            if let Some(entry) = self.profile.daily_stats.get(&date_key(d)) {
                stats.offline_minutes += entry.offline_minutes;
                stats.xp_earned += entry.xp_earned;
                stats.achievements_unlocked += entry.achievements_unlocked.len() as u32;
                stats.sessions += entry.session_count;
                if entry.offline_minutes >= self.profile.settings.daily_goal_minutes {
                    stats.goal_met_days += 1;
                }
            }
            day = d.pred_opt();
        }
        stats
    }

    pub fn session_note(&self, id: Uuid) -> Option<&SessionNote> {
        self.profile.session_notes.iter().find(|n| n.id == id)
    }

    pub fn session_goal(&self, id: Uuid) -> Option<&SessionGoal> {
        self.profile.session_goals.iter().find(|g| g.id == id)
    }

    /// Drain queued notifications for external collaborators.
    pub fn drain_events(&mut self) -> Vec<ProgressionEvent> {
        std::mem::take(&mut self.events)
    }

    // ------------------------------------------------------------------
    // Commands
    // ------------------------------------------------------------------

    /// Replace engine settings.
    pub fn update_settings(&mut self, settings: Settings) {
        self.update_settings_at(settings, Utc::now());
    }

    pub fn update_settings_at(&mut self, settings: Settings, now: DateTime<Utc>) {
        self.profile.settings = settings;
        self.persist(now);
        self.emit_profile_changed();
    }

    /// Create a session goal and return its id.
    pub fn create_session_goal(
        &mut self,
        title: &str,
        target_minutes: u64,
        total_target_sessions: Option<u32>,
    ) -> Uuid {
        self.create_session_goal_at(title, target_minutes, total_target_sessions, Utc::now())
    }

    pub fn create_session_goal_at(
        &mut self,
        title: &str,
        target_minutes: u64,
        total_target_sessions: Option<u32>,
        now: DateTime<Utc>,
    ) -> Uuid {
        let goal = SessionGoal::new(title, target_minutes, total_target_sessions, now);
        let id = goal.id;
        self.profile.session_goals.push(goal);
        self.persist(now);
        self.emit_profile_changed();
        id
    }

    /// Record a completion attempt against a goal. Achieved iff the session
    /// lasted at least the goal's target; unknown ids report `false`.
    pub fn complete_session_goal(&mut self, goal_id: Uuid, duration_minutes: u64) -> bool {
        self.complete_session_goal_at(goal_id, duration_minutes, Utc::now())
    }

    pub fn complete_session_goal_at(
        &mut self,
        goal_id: Uuid,
        duration_minutes: u64,
        now: DateTime<Utc>,
    ) -> bool {
        let Some(goal) = self.profile.session_goals.iter_mut().find(|g| g.id == goal_id) else {
            debug!(%goal_id, "goal not found");
            return false;
        };
        if duration_minutes < goal.target_minutes {
            return false;
        }

        goal.completed_sessions += 1;
        let completed = ProgressionEvent::GoalCompleted {
            goal_id,
            title: goal.title.clone(),
            completed_sessions: goal.completed_sessions,
        };
        let series = goal.total_target_sessions.and_then(|cap| {
            (goal.completed_sessions == cap).then(|| ProgressionEvent::GoalSeriesCompleted {
                goal_id,
                title: goal.title.clone(),
                total_sessions: cap,
            })
        });

        self.events.push(completed);
        if let Some(event) = series {
            self.events.push(event);
        }
        self.persist(now);
        self.emit_profile_changed();
        true
    }

    /// Attach a note to today's sessions and return its id.
    pub fn add_session_note(&mut self, text: &str) -> Uuid {
        self.add_session_note_at(text, Utc::now())
    }

    pub fn add_session_note_at(&mut self, text: &str, now: DateTime<Utc>) -> Uuid {
        let today = now.date_naive();
        let note = SessionNote {
            id: Uuid::new_v4(),
            date: date_key(today),
            text: text.to_string(),
            created_at: now,
        };
        let id = note.id;
        self.profile.session_notes.push(note);
        self.profile.day_mut(today).session_notes.push(id);
        self.persist(now);
        self.emit_profile_changed();
        id
    }

    // ------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------

    /// Re-derive the level from total XP; emits LevelUp when it rises.
    fn refresh_level(&mut self) -> bool {
        let derived = levels::level_for(self.profile.total_xp);
        if derived.level <= self.profile.level {
            return false;
        }
        let from = self.profile.level;
        self.profile.level = derived.level;
        self.events.push(ProgressionEvent::LevelUp {
            from_level: from,
            to_level: derived.level,
            title: derived.title.to_string(),
            badge: derived.badge.to_string(),
            unlocked_features: derived.features.iter().map(|f| f.to_string()).collect(),
        });
        true
    }

    fn emit_unlocks(&mut self, unlocks: &[Unlock]) {
        for unlock in unlocks {
            self.events.push(ProgressionEvent::AchievementUnlocked {
                id: unlock.id.clone(),
                title: unlock.title.clone(),
                xp_reward: unlock.reward,
                rarity: unlock.rarity,
                category: unlock.category,
            });
        }
    }

    fn emit_profile_changed(&mut self) {
        self.events.push(ProgressionEvent::ProfileChanged {
            total_xp: self.profile.total_xp,
            level: self.profile.level,
            current_streak: self.profile.current_streak,
        });
    }

    /// Write-through persistence. Failures are logged and swallowed; the
    /// in-memory profile stays authoritative for this process.
    fn persist(&mut self, now: DateTime<Utc>) {
        self.profile.updated_at = now;
        match serde_json::to_string(&self.profile) {
            Ok(json) => {
                if let Err(e) = self.store.set(PROFILE_KEY, &json) {
                    warn!("profile write failed, keeping in-memory state: {e}");
                }
            }
            Err(e) => warn!("profile serialization failed: {e}"),
        }
    }
}
