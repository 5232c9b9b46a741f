//! Session Goals & Notes v0.3.0
//!
//! User-defined session goals (a target duration, optionally a series cap)
//! and free-form per-day session notes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A repeatable session goal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionGoal {
    pub id: Uuid,
    pub title: String,
    /// A completion must last at least this long
    pub target_minutes: u64,
    #[serde(default)]
    pub completed_sessions: u32,
    /// When set, completing this many sessions finishes the series
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_target_sessions: Option<u32>,
    pub created_at: DateTime<Utc>,
}

impl SessionGoal {
    pub fn new(
        title: &str,
        target_minutes: u64,
        total_target_sessions: Option<u32>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.to_string(),
            target_minutes,
            completed_sessions: 0,
            total_target_sessions,
            created_at: now,
        }
    }

    /// Whether the series cap (if any) has been reached.
    pub fn series_complete(&self) -> bool {
        self.total_target_sessions
            .map(|cap| self.completed_sessions >= cap)
            .unwrap_or(false)
    }
}

/// A note attached to a day's sessions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionNote {
    pub id: Uuid,
    /// Day key, "YYYY-MM-DD"
    pub date: String,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

/// Starter goals for a fresh profile.
pub fn default_goals(now: DateTime<Utc>) -> Vec<SessionGoal> {
    vec![
        SessionGoal::new("Morning without the phone", 30, None, now),
        SessionGoal::new("Evening winddown", 45, None, now),
        SessionGoal::new("Thirty deep-focus blocks", 90, Some(30), now),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_series_complete_boundary() {
        let now = Utc::now();
        let mut goal = SessionGoal::new("test", 60, Some(3), now);
        assert!(!goal.series_complete());
        goal.completed_sessions = 2;
        assert!(!goal.series_complete());
        goal.completed_sessions = 3;
        assert!(goal.series_complete());
    }

    #[test]
    fn test_uncapped_goal_never_completes_series() {
        let now = Utc::now();
        let mut goal = SessionGoal::new("test", 60, None, now);
        goal.completed_sessions = 1000;
        assert!(!goal.series_complete());
    }

    #[test]
    fn test_default_goals_have_distinct_ids() {
        let goals = default_goals(Utc::now());
        assert_eq!(goals.len(), 3);
        assert_ne!(goals[0].id, goals[1].id);
        assert_ne!(goals[1].id, goals[2].id);
    }
}
