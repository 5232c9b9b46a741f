//! Progression Events v0.4.0
//!
//! Structured notifications for external collaborators (social, circles,
//! challenges, the app shell). A tagged union with an exhaustive match at
//! every subscriber; `channel()` preserves the wire-level channel names.

use crate::achievements::{Category, Rarity};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Everything the engine announces.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ProgressionEvent {
    /// An achievement unlocked; `xp_reward` is the rarity-adjusted grant
    AchievementUnlocked {
        id: String,
        title: String,
        xp_reward: u64,
        rarity: Rarity,
        category: Category,
    },
    /// Level increased during a session award
    LevelUp {
        from_level: u8,
        to_level: u8,
        title: String,
        badge: String,
        unlocked_features: Vec<String>,
    },
    /// A session goal completion was recorded
    GoalCompleted {
        goal_id: Uuid,
        title: String,
        completed_sessions: u32,
    },
    /// A capped goal series reached its target
    GoalSeriesCompleted {
        goal_id: Uuid,
        title: String,
        total_sessions: u32,
    },
    /// Streak hit one of the milestone values
    StreakMilestone { streak: u32 },
    /// Every achievement in a chain unlocked; one-time bonus paid
    ChainCompleted {
        chain_id: String,
        title: String,
        reward_xp: u64,
    },
    /// Generic profile-changed notification, sent after every mutation
    ProfileChanged {
        total_xp: u64,
        level: u8,
        current_streak: u32,
    },
}

impl ProgressionEvent {
    /// Wire-level channel name on the notification stream.
    pub fn channel(&self) -> &'static str {
        match self {
            ProgressionEvent::AchievementUnlocked { .. } => "achievementUnlocked",
            ProgressionEvent::LevelUp { .. } => "levelUp",
            ProgressionEvent::GoalCompleted { .. } => "goalCompleted",
            ProgressionEvent::GoalSeriesCompleted { .. } => "goalSeriesCompleted",
            ProgressionEvent::StreakMilestone { .. } => "streakMilestone",
            ProgressionEvent::ChainCompleted { .. } => "chainCompleted",
            ProgressionEvent::ProfileChanged { .. } => "userProfile",
        }
    }

    /// One-line human-readable form for logs and the CLI.
    pub fn summary(&self) -> String {
        match self {
            ProgressionEvent::AchievementUnlocked { title, xp_reward, rarity, .. } => {
                format!("Achievement unlocked: {} ({}, +{} XP)", title, rarity.label(), xp_reward)
            }
            ProgressionEvent::LevelUp { to_level, title, badge, .. } => {
                format!("Level up! Now level {} - {} {}", to_level, title, badge)
            }
            ProgressionEvent::GoalCompleted { title, completed_sessions, .. } => {
                format!("Goal '{}' completed ({} so far)", title, completed_sessions)
            }
            ProgressionEvent::GoalSeriesCompleted { title, total_sessions, .. } => {
                format!("Goal series '{}' finished after {} sessions", title, total_sessions)
            }
            ProgressionEvent::StreakMilestone { streak } => {
                format!("Streak milestone: {} days", streak)
            }
            ProgressionEvent::ChainCompleted { title, reward_xp, .. } => {
                format!("Chain complete: {} (+{} XP)", title, reward_xp)
            }
            ProgressionEvent::ProfileChanged { total_xp, level, .. } => {
                format!("Profile updated: level {}, {} XP", level, total_xp)
            }
        }
    }
}
