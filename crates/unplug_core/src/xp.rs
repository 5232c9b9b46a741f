//! XP Calculator v0.3.0
//!
//! Converts raw offline minutes into awarded XP.
//!
//! ## Rules
//!
//! | Component        | Value                                   | Gate                      |
//! |------------------|-----------------------------------------|---------------------------|
//! | Base             | minutes * level multiplier              | always                    |
//! | Streak bonus     | 1 + min(streak * 0.05, 0.5)             | `streak_bonus` feature, streak >= 3 |
//! | Daily-goal bonus | 1.25                                    | `daily_bonus` feature, goal met today |
//!
//! Bonuses compose multiplicatively; rounding happens once, at the end.

use crate::levels::{self, features};
use serde::Serialize;

/// Streak length at which the streak bonus starts applying.
pub const STREAK_BONUS_MIN_DAYS: u32 = 3;
/// Bonus fraction per streak day.
pub const STREAK_BONUS_STEP: f64 = 0.05;
/// Streak bonus cap (50%).
pub const STREAK_BONUS_CAP: f64 = 0.5;
/// Multiplier once the daily goal is met.
pub const DAILY_GOAL_MULTIPLIER: f64 = 1.25;

/// How a session's XP award was composed.
#[derive(Debug, Clone, Serialize)]
pub struct XpBreakdown {
    pub base_minutes: u64,
    pub level_multiplier: f64,
    pub streak_factor: f64,
    pub daily_goal_factor: f64,
    /// Final award, rounded to nearest
    pub total: u64,
}

/// Compute the XP award for a completed session.
///
/// `daily_goal_met` reflects today's accumulated minutes including the
/// session being awarded (the session is recorded before XP is computed).
pub fn session_xp(minutes: u64, level: u8, current_streak: u32, daily_goal_met: bool) -> XpBreakdown {
    let level_multiplier = levels::info_for(level).xp_multiplier;

    let streak_factor = if levels::has_feature(level, features::STREAK_BONUS)
        && current_streak >= STREAK_BONUS_MIN_DAYS
    {
        1.0 + (current_streak as f64 * STREAK_BONUS_STEP).min(STREAK_BONUS_CAP)
    } else {
        1.0
    };

    let daily_goal_factor = if levels::has_feature(level, features::DAILY_BONUS) && daily_goal_met {
        DAILY_GOAL_MULTIPLIER
    } else {
        1.0
    };

    let total = (minutes as f64 * level_multiplier * streak_factor * daily_goal_factor).round() as u64;

    XpBreakdown {
        base_minutes: minutes,
        level_multiplier,
        streak_factor,
        daily_goal_factor,
        total,
    }
}
