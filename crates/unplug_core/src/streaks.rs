//! Streak Tracker v0.3.0
//!
//! Day-over-day continuity of meeting the daily goal. The streak only moves
//! on a goal-met day: it extends when yesterday also met the goal, restarts
//! at 1 otherwise. A goal-missed day never mutates the streak by itself;
//! the reset shows up on the next qualifying day.

use crate::profile::{date_key, UserProfile};
use chrono::NaiveDate;
use tracing::debug;

/// Streak values worth announcing.
pub const STREAK_MILESTONES: &[u32] = &[3, 7, 14, 30, 60, 100];

/// Update the streak for `today`. Returns the new streak value when it
/// changed, `None` otherwise (goal not met, or today already counted).
pub fn update_streak(profile: &mut UserProfile, today: NaiveDate) -> Option<u32> {
    if !profile.day_met_goal(today) {
        return None;
    }

    let today_key = date_key(today);
    if profile.last_streak_date.as_deref() == Some(today_key.as_str()) {
        // Already counted; a second qualifying session the same day is a no-op
        return None;
    }

    let yesterday = today.pred_opt()?;
    if profile.day_met_goal(yesterday) {
        profile.current_streak += 1;
    } else {
        profile.current_streak = 1;
    }
    profile.longest_streak = profile.longest_streak.max(profile.current_streak);
    profile.last_streak_date = Some(today_key);

    debug!(streak = profile.current_streak, "streak updated");
    Some(profile.current_streak)
}

/// The milestone hit by a streak value, if any.
pub fn milestone_for(streak: u32) -> Option<u32> {
    STREAK_MILESTONES.contains(&streak).then_some(streak)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn day(d: u32) -> NaiveDate {
        Utc.with_ymd_and_hms(2026, 3, d, 0, 0, 0)
            .single()
            .unwrap()
            .date_naive()
    }

    fn profile_with_goal_days(days: &[u32]) -> UserProfile {
        let mut profile = UserProfile::new(Utc::now());
        for &d in days {
            profile.day_mut(day(d)).offline_minutes = profile.settings.daily_goal_minutes;
        }
        profile
    }

    #[test]
    fn test_goal_not_met_leaves_streak_alone() {
        let mut profile = profile_with_goal_days(&[]);
        profile.current_streak = 5;
        assert_eq!(update_streak(&mut profile, day(10)), None);
        assert_eq!(profile.current_streak, 5);
    }

    #[test]
    fn test_first_goal_day_starts_at_one() {
        let mut profile = profile_with_goal_days(&[10]);
        assert_eq!(update_streak(&mut profile, day(10)), Some(1));
        assert_eq!(profile.current_streak, 1);
        assert_eq!(profile.longest_streak, 1);
    }

    #[test]
    fn test_consecutive_days_extend() {
        let mut profile = profile_with_goal_days(&[10, 11, 12]);
        update_streak(&mut profile, day(10));
        update_streak(&mut profile, day(11));
        assert_eq!(update_streak(&mut profile, day(12)), Some(3));
        assert_eq!(profile.longest_streak, 3);
    }

    #[test]
    fn test_gap_restarts_at_one() {
        let mut profile = profile_with_goal_days(&[10, 11, 14]);
        update_streak(&mut profile, day(10));
        update_streak(&mut profile, day(11));
        // Days 12-13 missed; next qualifying day restarts
        assert_eq!(update_streak(&mut profile, day(14)), Some(1));
        assert_eq!(profile.current_streak, 1);
        assert_eq!(profile.longest_streak, 2);
    }

    #[test]
    fn test_same_day_counted_once() {
        let mut profile = profile_with_goal_days(&[10]);
        assert_eq!(update_streak(&mut profile, day(10)), Some(1));
        assert_eq!(update_streak(&mut profile, day(10)), None);
        assert_eq!(profile.current_streak, 1);
    }

    #[test]
    fn test_milestones() {
        assert_eq!(milestone_for(3), Some(3));
        assert_eq!(milestone_for(7), Some(7));
        assert_eq!(milestone_for(14), Some(14));
        assert_eq!(milestone_for(100), Some(100));
        assert_eq!(milestone_for(4), None);
        assert_eq!(milestone_for(0), None);
    }
}
