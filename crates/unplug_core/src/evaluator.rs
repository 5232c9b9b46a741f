//! Achievement Evaluator v0.4.0
//!
//! Runs every locked achievement's predicate against the current profile and
//! session, unlocking on first match. Already-unlocked achievements are
//! skipped unconditionally, so re-running an evaluation never double-awards.
//!
//! Level achievements are the exception: they are checked on level-up only,
//! through `evaluate_level_unlocks`.

use crate::achievements::{
    Achievement, AchievementTarget, Category, ComboRule, Rarity, SeasonalRule,
};
use crate::profile::UserProfile;
use chrono::{DateTime, Datelike, Timelike, Utc, Weekday};
use tracing::info;

/// Morning sessions start within [5, 12).
pub const MORNING_HOURS: std::ops::Range<u32> = 5..12;
/// Evening sessions start within [18, 24).
pub const EVENING_HOURS: std::ops::Range<u32> = 18..24;

/// Facts about the session that triggered this evaluation pass.
#[derive(Debug, Clone)]
pub struct SessionContext {
    pub now: DateTime<Utc>,
    pub minutes: u64,
    /// Hour the session started (from the reported start time, falling back
    /// to the completion time)
    pub start_hour: u32,
    pub weekday: Weekday,
}

impl SessionContext {
    pub fn new(minutes: u64, start: DateTime<Utc>, now: DateTime<Utc>) -> Self {
        Self {
            now,
            minutes,
            start_hour: start.hour(),
            weekday: start.weekday(),
        }
    }

    pub fn is_weekend(&self) -> bool {
        self.weekday == Weekday::Sat || self.weekday == Weekday::Sun
    }

    pub fn is_morning(&self) -> bool {
        MORNING_HOURS.contains(&self.start_hour)
    }

    pub fn is_evening(&self) -> bool {
        EVENING_HOURS.contains(&self.start_hour)
    }
}

/// Summary of a single unlock, for notification payloads.
#[derive(Debug, Clone)]
pub struct Unlock {
    pub id: String,
    pub title: String,
    /// Rarity-adjusted XP actually granted
    pub reward: u64,
    pub rarity: Rarity,
    pub category: Category,
}

/// Summary of a chain payout.
#[derive(Debug, Clone)]
pub struct ChainCompletion {
    pub id: String,
    pub title: String,
    pub reward_xp: u64,
}

/// Evaluate every locked, non-level achievement. Mutates the profile:
/// unlock flags, XP, and today's daily-stat entry.
pub fn evaluate_all(profile: &mut UserProfile, ctx: &SessionContext) -> Vec<Unlock> {
    let matched: Vec<usize> = profile
        .achievements
        .iter()
        .enumerate()
        .filter(|(_, a)| !a.unlocked && a.category != Category::Level)
        .filter(|(_, a)| predicate_holds(a, profile, ctx))
        .map(|(i, _)| i)
        .collect();
    apply_unlocks(profile, &matched, ctx.now)
}

/// Evaluate level achievements. Called on level-up, not on every session.
pub fn evaluate_level_unlocks(profile: &mut UserProfile, now: DateTime<Utc>) -> Vec<Unlock> {
    let matched: Vec<usize> = profile
        .achievements
        .iter()
        .enumerate()
        .filter(|(_, a)| !a.unlocked && a.category == Category::Level)
        .filter(|(_, a)| match a.target {
            AchievementTarget::ReachLevel { level } => profile.level >= level,
            _ => false,
        })
        .map(|(i, _)| i)
        .collect();
    apply_unlocks(profile, &matched, now)
}

/// Pay out every fully-unlocked chain that has not been paid yet. The paid
/// set makes the bonus one-time even though evaluation re-runs constantly.
pub fn evaluate_chains(profile: &mut UserProfile) -> Vec<ChainCompletion> {
    let ready: Vec<_> = profile
        .chains
        .iter()
        .filter(|chain| !profile.chains_completed.contains(&chain.id))
        .filter(|chain| {
            chain
                .members
                .iter()
                .all(|id| profile.achievement(id).map(|a| a.unlocked).unwrap_or(false))
        })
        .cloned()
        .collect();

    let mut completions = Vec::new();
    for chain in ready {
        profile.chains_completed.push(chain.id.clone());
        profile.total_xp = profile.total_xp.saturating_add(chain.reward_xp);
        info!(chain = %chain.id, reward = chain.reward_xp, "chain completed");
        completions.push(ChainCompletion {
            id: chain.id,
            title: chain.title,
            reward_xp: chain.reward_xp,
        });
    }
    completions
}

fn apply_unlocks(profile: &mut UserProfile, indices: &[usize], now: DateTime<Utc>) -> Vec<Unlock> {
    let today = now.date_naive();
    let mut unlocks = Vec::new();
    for &i in indices {
        let (id, title, reward, rarity, category) = {
            let achievement = &mut profile.achievements[i];
            achievement.unlocked = true;
            achievement.unlocked_at = Some(now);
            (
                achievement.id.clone(),
                achievement.title.clone(),
                achievement.reward(),
                achievement.rarity,
                achievement.category,
            )
        };
        profile.add_xp(reward, today);
        profile.day_mut(today).achievements_unlocked.push(id.clone());
        info!(achievement = %id, reward, "achievement unlocked");
        unlocks.push(Unlock { id, title, reward, rarity, category });
    }
    unlocks
}

fn predicate_holds(a: &Achievement, profile: &UserProfile, ctx: &SessionContext) -> bool {
    if a.is_expired(ctx.now) {
        return false;
    }
    let today = ctx.now.date_naive();
    match a.target {
        AchievementTarget::DailyMinutes { minutes } => profile.day_minutes(today) >= minutes,
        AchievementTarget::CumulativeMinutes { minutes } => profile.total_offline_minutes >= minutes,
        AchievementTarget::StreakDays { days } => profile.current_streak >= days,
        AchievementTarget::SessionCount { sessions } => profile.total_sessions >= sessions,
        // Level targets are handled by evaluate_level_unlocks
        AchievementTarget::ReachLevel { .. } => false,
        AchievementTarget::TimeOfDay { start_hour, end_hour, lifetime_sessions } => {
            let counter = if start_hour < 12 {
                profile.morning_sessions
            } else {
                profile.evening_sessions
            };
            ctx.start_hour >= start_hour && ctx.start_hour < end_hour && counter >= lifetime_sessions
        }
        AchievementTarget::Weekend { min_session_minutes, lifetime_sessions } => {
            ctx.is_weekend()
                && ctx.minutes >= min_session_minutes
                && profile.weekend_sessions >= lifetime_sessions
        }
        AchievementTarget::Combo { rule } => combo_holds(rule, profile, ctx),
        AchievementTarget::Seasonal { rule } => seasonal_holds(rule, profile, ctx),
    }
}

fn combo_holds(rule: ComboRule, profile: &UserProfile, ctx: &SessionContext) -> bool {
    match rule {
        ComboRule::PerfectWeek => {
            let mut day = ctx.now.date_naive();
            for _ in 0..7 {
                if !profile.day_met_goal(day) {
                    return false;
                }
                day = match day.pred_opt() {
                    Some(d) => d,
                    None => return false,
                };
            }
            true
        }
        ComboRule::TripleThreat => {
            profile.morning_sessions >= 1
                && profile.evening_sessions >= 1
                && profile.total_sessions >= 3
        }
    }
}

fn seasonal_holds(rule: SeasonalRule, profile: &UserProfile, ctx: &SessionContext) -> bool {
    match rule {
        SeasonalRule::JanuaryStreak { days } => {
            ctx.now.month() == 1 && profile.current_streak >= days
        }
        SeasonalRule::SummerWeekendSession { minutes } => {
            ctx.now.month() == 7 && ctx.is_weekend() && ctx.minutes >= minutes
        }
    }
}

/// Fractional completion of a locked achievement, for progress displays.
/// Unlocked achievements report 100.
pub fn target_progress(a: &Achievement, profile: &UserProfile, now: DateTime<Utc>) -> u8 {
    if a.unlocked {
        return 100;
    }
    let today = now.date_naive();
    let ratio = |have: u64, want: u64| -> f64 {
        if want == 0 {
            1.0
        } else {
            have as f64 / want as f64
        }
    };
    let fraction = match a.target {
        AchievementTarget::DailyMinutes { minutes } => ratio(profile.day_minutes(today), minutes),
        AchievementTarget::CumulativeMinutes { minutes } => {
            ratio(profile.total_offline_minutes, minutes)
        }
        AchievementTarget::StreakDays { days } => {
            ratio(profile.current_streak as u64, days as u64)
        }
        AchievementTarget::SessionCount { sessions } => ratio(profile.total_sessions, sessions),
        AchievementTarget::ReachLevel { level } => ratio(profile.level as u64, level as u64),
        AchievementTarget::TimeOfDay { start_hour, lifetime_sessions, .. } => {
            let counter = if start_hour < 12 {
                profile.morning_sessions
            } else {
                profile.evening_sessions
            };
            ratio(counter, lifetime_sessions)
        }
        AchievementTarget::Weekend { lifetime_sessions, .. } => {
            ratio(profile.weekend_sessions, lifetime_sessions)
        }
        AchievementTarget::Combo { rule } => match rule {
            ComboRule::PerfectWeek => {
                let mut met = 0u64;
                let mut day = today;
                for _ in 0..7 {
                    if profile.day_met_goal(day) {
                        met += 1;
                    }
                    day = match day.pred_opt() {
                        Some(d) => d,
                        None => break,
                    };
                }
                ratio(met, 7)
            }
            ComboRule::TripleThreat => {
                let met = u64::from(profile.morning_sessions >= 1)
                    + u64::from(profile.evening_sessions >= 1)
                    + u64::from(profile.total_sessions >= 3);
                ratio(met, 3)
            }
        },
        // Calendar-bound; either available now or not, no partial credit
        AchievementTarget::Seasonal { .. } => 0.0,
    };
    (fraction.clamp(0.0, 1.0) * 100.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::UserProfile;
    use chrono::TimeZone;

    fn at(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, 0, 0).single().unwrap()
    }

    fn ctx(minutes: u64, start: DateTime<Utc>) -> SessionContext {
        SessionContext::new(minutes, start, start)
    }

    #[test]
    fn test_daily_minutes_unlocks_from_today_total() {
        // 2026-03-04 is a Wednesday
        let now = at(2026, 3, 4, 10);
        let mut profile = UserProfile::new(now);
        profile.day_mut(now.date_naive()).offline_minutes = 30;

        let unlocks = evaluate_all(&mut profile, &ctx(30, now));
        assert_eq!(unlocks.len(), 1);
        assert_eq!(unlocks[0].id, "first_steps");
        assert_eq!(unlocks[0].reward, 50);
        assert!(profile.achievement("first_steps").unwrap().unlocked);
    }

    #[test]
    fn test_second_pass_is_idempotent() {
        let now = at(2026, 3, 4, 10);
        let mut profile = UserProfile::new(now);
        profile.day_mut(now.date_naive()).offline_minutes = 30;

        evaluate_all(&mut profile, &ctx(30, now));
        let xp_after_first = profile.total_xp;
        let again = evaluate_all(&mut profile, &ctx(30, now));
        assert!(again.is_empty());
        assert_eq!(profile.total_xp, xp_after_first);
    }

    #[test]
    fn test_time_of_day_needs_window_and_counter() {
        let morning = at(2026, 3, 4, 7);
        let mut profile = UserProfile::new(morning);
        profile.morning_sessions = 4;
        // In window but counter below threshold
        assert!(evaluate_all(&mut profile, &ctx(20, morning))
            .iter()
            .all(|u| u.id != "early_bird"));

        profile.morning_sessions = 5;
        let unlocks = evaluate_all(&mut profile, &ctx(20, morning));
        assert!(unlocks.iter().any(|u| u.id == "early_bird"));

        // Counter high enough but outside the window
        let mut other = UserProfile::new(morning);
        other.morning_sessions = 50;
        let noon = at(2026, 3, 4, 12);
        assert!(evaluate_all(&mut other, &ctx(20, noon))
            .iter()
            .all(|u| u.id != "early_bird"));
    }

    #[test]
    fn test_weekend_checks_day_duration_and_counter() {
        // 2026-03-07 is a Saturday
        let saturday = at(2026, 3, 7, 15);
        let mut profile = UserProfile::new(saturday);
        profile.weekend_sessions = 1;

        let unlocks = evaluate_all(&mut profile, &ctx(30, saturday));
        assert!(unlocks.iter().any(|u| u.id == "first_weekend"));

        // Too short on a weekday: nothing
        let wednesday = at(2026, 3, 4, 15);
        let mut other = UserProfile::new(wednesday);
        other.weekend_sessions = 1;
        assert!(evaluate_all(&mut other, &ctx(30, wednesday))
            .iter()
            .all(|u| u.id != "first_weekend"));
    }

    #[test]
    fn test_triple_threat_combo() {
        let now = at(2026, 3, 4, 10);
        let mut profile = UserProfile::new(now);
        profile.morning_sessions = 1;
        profile.evening_sessions = 1;
        profile.total_sessions = 2;
        assert!(evaluate_all(&mut profile, &ctx(10, now))
            .iter()
            .all(|u| u.id != "triple_threat"));

        profile.total_sessions = 3;
        let unlocks = evaluate_all(&mut profile, &ctx(10, now));
        assert!(unlocks.iter().any(|u| u.id == "triple_threat"));
    }

    #[test]
    fn test_perfect_week_combo() {
        let now = at(2026, 3, 10, 10);
        let mut profile = UserProfile::new(now);
        let goal = profile.settings.daily_goal_minutes;
        let mut day = now.date_naive();
        for _ in 0..7 {
            profile.day_mut(day).offline_minutes = goal;
            day = day.pred_opt().unwrap();
        }

        let unlocks = evaluate_all(&mut profile, &ctx(10, now));
        assert!(unlocks.iter().any(|u| u.id == "perfect_week"));
    }

    #[test]
    fn test_perfect_week_broken_by_one_short_day() {
        let now = at(2026, 3, 10, 10);
        let mut profile = UserProfile::new(now);
        let goal = profile.settings.daily_goal_minutes;
        let mut day = now.date_naive();
        for i in 0..7 {
            let minutes = if i == 3 { goal - 1 } else { goal };
            profile.day_mut(day).offline_minutes = minutes;
            day = day.pred_opt().unwrap();
        }

        assert!(evaluate_all(&mut profile, &ctx(10, now))
            .iter()
            .all(|u| u.id != "perfect_week"));
    }

    #[test]
    fn test_level_targets_skipped_by_session_evaluation() {
        let now = at(2026, 3, 4, 10);
        let mut profile = UserProfile::new(now);
        profile.level = 20;
        assert!(evaluate_all(&mut profile, &ctx(1, now))
            .iter()
            .all(|u| u.category != Category::Level));

        let unlocks = evaluate_level_unlocks(&mut profile, now);
        let ids: Vec<_> = unlocks.iter().map(|u| u.id.as_str()).collect();
        assert!(ids.contains(&"level_5"));
        assert!(ids.contains(&"level_20"));
    }

    #[test]
    fn test_seasonal_expired_never_unlocks() {
        // January 2028 is past fresh_start's expiry (2027-02-01)
        let now = at(2028, 1, 15, 10);
        let mut profile = UserProfile::new(now);
        profile.current_streak = 40;
        assert!(evaluate_all(&mut profile, &ctx(10, now))
            .iter()
            .all(|u| u.id != "fresh_start"));
    }

    #[test]
    fn test_seasonal_unlocks_in_window() {
        let now = at(2027, 1, 31, 10);
        let mut profile = UserProfile::new(now);
        profile.current_streak = 31;
        let unlocks = evaluate_all(&mut profile, &ctx(10, now));
        assert!(unlocks.iter().any(|u| u.id == "fresh_start"));
    }

    #[test]
    fn test_chain_pays_exactly_once() {
        let now = at(2026, 3, 4, 10);
        let mut profile = UserProfile::new(now);
        for id in ["streak_3", "streak_7", "streak_30", "streak_100"] {
            if let Some(a) = profile.achievements.iter_mut().find(|a| a.id == id) {
                a.unlocked = true;
                a.unlocked_at = Some(now);
            }
        }
        let xp_before = profile.total_xp;

        let first = evaluate_chains(&mut profile);
        assert_eq!(first.len(), 1);
        assert_eq!(first[0].id, "streak_keeper");
        assert_eq!(profile.total_xp, xp_before + 1000);

        let second = evaluate_chains(&mut profile);
        assert!(second.is_empty());
        assert_eq!(profile.total_xp, xp_before + 1000);
    }

    #[test]
    fn test_incomplete_chain_pays_nothing() {
        let now = at(2026, 3, 4, 10);
        let mut profile = UserProfile::new(now);
        for id in ["streak_3", "streak_7"] {
            if let Some(a) = profile.achievements.iter_mut().find(|a| a.id == id) {
                a.unlocked = true;
            }
        }
        assert!(evaluate_chains(&mut profile).is_empty());
    }

    #[test]
    fn test_unlock_reward_uses_rarity() {
        // Scenario: legendary with base 2000 adds exactly 4000
        let now = at(2026, 3, 4, 10);
        let mut profile = UserProfile::new(now);
        profile.total_offline_minutes = 60_000;
        let unlocks = evaluate_all(&mut profile, &ctx(10, now));
        let legend = unlocks.iter().find(|u| u.id == "offline_legend").unwrap();
        assert_eq!(legend.reward, 4000);
        assert_eq!(legend.rarity, Rarity::Legendary);
    }

    #[test]
    fn test_target_progress_fractions() {
        let now = at(2026, 3, 4, 10);
        let mut profile = UserProfile::new(now);
        profile.total_sessions = 5;
        let catalog = profile.achievements.clone();
        let sessions_10 = catalog.iter().find(|a| a.id == "sessions_10").unwrap();
        assert_eq!(target_progress(sessions_10, &profile, now), 50);

        profile.day_mut(now.date_naive()).offline_minutes = 15;
        let first_steps = catalog.iter().find(|a| a.id == "first_steps").unwrap();
        assert_eq!(target_progress(first_steps, &profile, now), 50);

        let mut unlocked = first_steps.clone();
        unlocked.unlocked = true;
        assert_eq!(target_progress(&unlocked, &profile, now), 100);
    }
}
