//! Level System v0.3.0
//!
//! Twenty fixed levels with hand-tuned XP thresholds, titles, badges, XP
//! multipliers, and feature unlock flags. Pure lookups over a static table;
//! nothing here mutates state.
//!
//! ## XP Curve
//!
//! Thresholds are a curated list rather than a formula: early levels come
//! quickly (level 2 at 50 XP, roughly one good session), later levels take
//! weeks of daily offline time. `required_xp` is strictly increasing.

/// Feature flags unlocked by levels.
///
/// Checked by name against `LevelInfo::features`.
pub mod features {
    /// Streak XP bonus becomes active (XP Calculator).
    pub const STREAK_BONUS: &str = "streak_bonus";
    /// Daily-goal XP bonus becomes active (XP Calculator).
    pub const DAILY_BONUS: &str = "daily_bonus";
    /// User may define custom session goals.
    pub const CUSTOM_GOALS: &str = "custom_goals";
    /// Weekly summary report available.
    pub const WEEKLY_REPORT: &str = "weekly_report";
    /// Custom profile badges available.
    pub const CUSTOM_BADGES: &str = "custom_badges";
}

/// A single row of the level table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LevelInfo {
    /// Level number (1-20)
    pub level: u8,
    /// Total XP required to hold this level
    pub required_xp: u64,
    /// Display title
    pub title: &'static str,
    /// ASCII badge
    pub badge: &'static str,
    /// Multiplier applied to session minutes when computing XP
    pub xp_multiplier: f64,
    /// Feature flags unlocked at this level
    pub features: &'static [&'static str],
}

/// Highest level in the table.
pub const MAX_LEVEL: u8 = 20;

/// The static level table. `required_xp` strictly increasing.
pub const LEVEL_TABLE: &[LevelInfo] = &[
    LevelInfo { level: 1, required_xp: 0, title: "Newcomer", badge: "[seed]", xp_multiplier: 1.0, features: &[] },
    LevelInfo { level: 2, required_xp: 50, title: "Dabbler", badge: "[sprout]", xp_multiplier: 1.05, features: &[] },
    LevelInfo { level: 3, required_xp: 120, title: "Disconnector", badge: "[leaf]", xp_multiplier: 1.1, features: &[features::STREAK_BONUS] },
    LevelInfo { level: 4, required_xp: 250, title: "Pathfinder", badge: "[fern]", xp_multiplier: 1.1, features: &[] },
    LevelInfo { level: 5, required_xp: 450, title: "Mindful Novice", badge: "[sapling]", xp_multiplier: 1.15, features: &[features::DAILY_BONUS] },
    LevelInfo { level: 6, required_xp: 700, title: "Present", badge: "[branch]", xp_multiplier: 1.2, features: &[] },
    LevelInfo { level: 7, required_xp: 1000, title: "Attentive", badge: "[bloom]", xp_multiplier: 1.2, features: &[] },
    LevelInfo { level: 8, required_xp: 1400, title: "Grounded", badge: "[root]", xp_multiplier: 1.25, features: &[] },
    LevelInfo { level: 9, required_xp: 1900, title: "Steady", badge: "[stone]", xp_multiplier: 1.3, features: &[] },
    LevelInfo { level: 10, required_xp: 2500, title: "Balanced", badge: "[bonsai]", xp_multiplier: 1.35, features: &[features::CUSTOM_GOALS] },
    LevelInfo { level: 11, required_xp: 3200, title: "Centered", badge: "[stream]", xp_multiplier: 1.4, features: &[] },
    LevelInfo { level: 12, required_xp: 4000, title: "Tranquil", badge: "[pond]", xp_multiplier: 1.45, features: &[] },
    LevelInfo { level: 13, required_xp: 5000, title: "Unhurried", badge: "[reed]", xp_multiplier: 1.5, features: &[] },
    LevelInfo { level: 14, required_xp: 6200, title: "Deep Diver", badge: "[lake]", xp_multiplier: 1.55, features: &[] },
    LevelInfo { level: 15, required_xp: 7600, title: "Quiet Adept", badge: "[grove]", xp_multiplier: 1.6, features: &[features::WEEKLY_REPORT] },
    LevelInfo { level: 16, required_xp: 9200, title: "Wilderness Walker", badge: "[pine]", xp_multiplier: 1.7, features: &[] },
    LevelInfo { level: 17, required_xp: 11000, title: "Digital Hermit", badge: "[cliff]", xp_multiplier: 1.8, features: &[] },
    LevelInfo { level: 18, required_xp: 13200, title: "Offline Sage", badge: "[peak]", xp_multiplier: 1.9, features: &[] },
    LevelInfo { level: 19, required_xp: 15800, title: "Lucid", badge: "[aurora]", xp_multiplier: 2.0, features: &[] },
    LevelInfo { level: 20, required_xp: 19000, title: "Unplugged", badge: "[summit]", xp_multiplier: 2.0, features: &[features::CUSTOM_BADGES] },
];

/// Level for a given XP total.
///
/// Scans from the top of the table; the highest level whose `required_xp`
/// fits wins.
pub fn level_for(total_xp: u64) -> &'static LevelInfo {
    for info in LEVEL_TABLE.iter().rev() {
        if total_xp >= info.required_xp {
            return info;
        }
    }
    &LEVEL_TABLE[0]
}

/// Info for a specific level, defaulting to level 1 if unknown.
pub fn info_for(level: u8) -> &'static LevelInfo {
    LEVEL_TABLE
        .iter()
        .find(|info| info.level == level)
        .unwrap_or(&LEVEL_TABLE[0])
}

/// XP still needed to reach the next level. 0 at max level.
pub fn xp_for_next_level(total_xp: u64) -> u64 {
    let current = level_for(total_xp);
    if current.level >= MAX_LEVEL {
        return 0;
    }
    info_for(current.level + 1).required_xp.saturating_sub(total_xp)
}

/// Progress through the current level as a percentage (0-100). 100 at max.
pub fn progress_percent(total_xp: u64) -> u8 {
    let current = level_for(total_xp);
    if current.level >= MAX_LEVEL {
        return 100;
    }
    let next = info_for(current.level + 1);
    let span = next.required_xp - current.required_xp;
    if span == 0 {
        return 100;
    }
    let into = total_xp.saturating_sub(current.required_xp);
    ((into as f64 / span as f64) * 100.0).clamp(0.0, 100.0) as u8
}

/// Whether a named feature is available at a level.
///
/// Features accumulate: a flag unlocked at level 3 stays unlocked at 4+.
pub fn has_feature(level: u8, feature: &str) -> bool {
    LEVEL_TABLE
        .iter()
        .take_while(|info| info.level <= level)
        .any(|info| info.features.contains(&feature))
}
