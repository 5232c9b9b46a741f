//! Achievement Catalog v0.4.0
//!
//! Fixed, versioned list of achievement definitions: 8 categories, 4
//! rarities, optional chain membership, optional expiry. Definitions are
//! data; the predicates that unlock them live in `evaluator`.
//!
//! Targets are tagged variants rather than overloaded minute counts, so a
//! "milestone" target can never be confused with a literal minute value.

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// Bumped whenever the default catalog gains entries; profiles persisted
/// under an older version are backfilled on load.
pub const CATALOG_VERSION: u32 = 3;

/// Achievement rarity, scaling the XP reward at unlock time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rarity {
    Common,
    Rare,
    Epic,
    Legendary,
}

impl Rarity {
    /// Fixed reward scalar.
    pub fn multiplier(&self) -> f64 {
        match self {
            Rarity::Common => 1.0,
            Rarity::Rare => 1.2,
            Rarity::Epic => 1.5,
            Rarity::Legendary => 2.0,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Rarity::Common => "common",
            Rarity::Rare => "rare",
            Rarity::Epic => "epic",
            Rarity::Legendary => "legendary",
        }
    }
}

/// The eight achievement categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    TimeBased,
    Streak,
    Milestone,
    Level,
    TimeOfDay,
    Weekend,
    Combo,
    Seasonal,
}

impl Category {
    pub fn label(&self) -> &'static str {
        match self {
            Category::TimeBased => "time_based",
            Category::Streak => "streak",
            Category::Milestone => "milestone",
            Category::Level => "level",
            Category::TimeOfDay => "time_of_day",
            Category::Weekend => "weekend",
            Category::Combo => "combo",
            Category::Seasonal => "seasonal",
        }
    }
}

/// Cross-cutting combo predicates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComboRule {
    /// Last 7 daily entries all meet the daily goal
    PerfectWeek,
    /// At least one morning and one evening session, 3+ sessions lifetime
    TripleThreat,
}

/// Calendar-bound seasonal predicates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeasonalRule {
    /// Streak of at least `days` during January
    JanuaryStreak { days: u32 },
    /// Weekend session of at least `minutes` during July
    SummerWeekendSession { minutes: u64 },
}

/// What an achievement requires. One variant per kind of check.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AchievementTarget {
    /// Today's offline minutes reach `minutes`
    DailyMinutes { minutes: u64 },
    /// Lifetime offline minutes reach `minutes`
    CumulativeMinutes { minutes: u64 },
    /// Current streak reaches `days`
    StreakDays { days: u32 },
    /// Lifetime session count reaches `sessions`
    SessionCount { sessions: u64 },
    /// Profile level reaches `level`; checked on level-up only
    ReachLevel { level: u8 },
    /// Current session starts within [start_hour, end_hour) and the
    /// matching lifetime counter (morning for windows starting before
    /// noon, evening otherwise) reaches `lifetime_sessions`
    TimeOfDay { start_hour: u32, end_hour: u32, lifetime_sessions: u64 },
    /// Current session is on Sat/Sun, lasts at least `min_session_minutes`,
    /// and lifetime weekend sessions reach `lifetime_sessions`
    Weekend { min_session_minutes: u64, lifetime_sessions: u64 },
    /// See `ComboRule`
    Combo { rule: ComboRule },
    /// See `SeasonalRule`
    Seasonal { rule: SeasonalRule },
}

/// An achievement: immutable definition plus unlock state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Achievement {
    pub id: String,
    pub title: String,
    pub description: String,
    pub category: Category,
    pub rarity: Rarity,
    pub target: AchievementTarget,
    /// Base reward before the rarity multiplier
    pub xp_reward: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chain_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chain_order: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
    /// Never reset once true
    #[serde(default)]
    pub unlocked: bool,
    /// Set exactly once, at unlock
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unlocked_at: Option<DateTime<Utc>>,
}

impl Achievement {
    fn new(
        id: &str,
        title: &str,
        description: &str,
        category: Category,
        rarity: Rarity,
        target: AchievementTarget,
        xp_reward: u64,
    ) -> Self {
        Self {
            id: id.to_string(),
            title: title.to_string(),
            description: description.to_string(),
            category,
            rarity,
            target,
            xp_reward,
            chain_id: None,
            chain_order: None,
            expires_at: None,
            unlocked: false,
            unlocked_at: None,
        }
    }

    fn in_chain(mut self, chain_id: &str, order: u32) -> Self {
        self.chain_id = Some(chain_id.to_string());
        self.chain_order = Some(order);
        self
    }

    fn expires_on(mut self, year: i32, month: u32, day: u32) -> Self {
        self.expires_at = Utc.with_ymd_and_hms(year, month, day, 0, 0, 0).single();
        self
    }

    /// XP granted at unlock: `round(xp_reward * rarity multiplier)`.
    pub fn reward(&self) -> u64 {
        (self.xp_reward as f64 * self.rarity.multiplier()).round() as u64
    }

    /// Expired achievements can never unlock.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.map(|at| now >= at).unwrap_or(false)
    }
}

/// A chain of achievements granting a one-time bonus once all members unlock.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AchievementChain {
    pub id: String,
    pub title: String,
    /// Achievement ids, in chain order
    pub members: Vec<String>,
    pub reward_xp: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reward_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reward_badge: Option<String>,
}

/// The default achievement catalog.
pub fn default_achievements() -> Vec<Achievement> {
    use AchievementTarget as T;
    use Category as C;
    use Rarity as R;

    vec![
        // Time-based: daily totals
        Achievement::new("first_steps", "First Steps", "Spend 30 offline minutes in one day",
            C::TimeBased, R::Common, T::DailyMinutes { minutes: 30 }, 50)
            .in_chain("habit_builder", 1),
        Achievement::new("hour_of_calm", "Hour of Calm", "Spend a full offline hour in one day",
            C::TimeBased, R::Common, T::DailyMinutes { minutes: 60 }, 75),
        Achievement::new("deep_work", "Deep Work", "Spend 2 offline hours in one day",
            C::TimeBased, R::Rare, T::DailyMinutes { minutes: 120 }, 150),
        Achievement::new("digital_sunset", "Digital Sunset", "Spend 4 offline hours in one day",
            C::TimeBased, R::Epic, T::DailyMinutes { minutes: 240 }, 300),
        // Time-based: lifetime totals
        Achievement::new("quiet_fifty", "Quiet Fifty", "Accumulate 50 offline hours",
            C::TimeBased, R::Rare, T::CumulativeMinutes { minutes: 3000 }, 250),
        Achievement::new("offline_legend", "Offline Legend", "Accumulate 1000 offline hours",
            C::TimeBased, R::Legendary, T::CumulativeMinutes { minutes: 60_000 }, 2000),

        // Streaks
        Achievement::new("streak_3", "Kindling", "Meet your daily goal 3 days in a row",
            C::Streak, R::Common, T::StreakDays { days: 3 }, 100)
            .in_chain("streak_keeper", 1),
        Achievement::new("streak_7", "Week of Presence", "Meet your daily goal 7 days in a row",
            C::Streak, R::Rare, T::StreakDays { days: 7 }, 250)
            .in_chain("streak_keeper", 2),
        Achievement::new("streak_30", "Monthly Devotion", "Meet your daily goal 30 days in a row",
            C::Streak, R::Epic, T::StreakDays { days: 30 }, 750)
            .in_chain("streak_keeper", 3),
        Achievement::new("streak_100", "Hundred Days Quiet", "Meet your daily goal 100 days in a row",
            C::Streak, R::Legendary, T::StreakDays { days: 100 }, 1500)
            .in_chain("streak_keeper", 4),

        // Milestones
        Achievement::new("sessions_10", "Getting Comfortable", "Complete 10 offline sessions",
            C::Milestone, R::Common, T::SessionCount { sessions: 10 }, 100)
            .in_chain("habit_builder", 2),
        Achievement::new("sessions_50", "Regular", "Complete 50 offline sessions",
            C::Milestone, R::Rare, T::SessionCount { sessions: 50 }, 300)
            .in_chain("habit_builder", 3),
        Achievement::new("two_days_off", "Two Days Off", "Accumulate 48 offline hours",
            C::Milestone, R::Rare, T::CumulativeMinutes { minutes: 2880 }, 200),

        // Levels
        Achievement::new("level_5", "Seasoned", "Reach level 5",
            C::Level, R::Common, T::ReachLevel { level: 5 }, 150),
        Achievement::new("level_10", "Halfway Up", "Reach level 10",
            C::Level, R::Rare, T::ReachLevel { level: 10 }, 300),
        Achievement::new("level_15", "Rarefied Air", "Reach level 15",
            C::Level, R::Epic, T::ReachLevel { level: 15 }, 600),
        Achievement::new("level_20", "Summit", "Reach level 20",
            C::Level, R::Legendary, T::ReachLevel { level: 20 }, 1200),

        // Time of day
        Achievement::new("early_bird", "Early Bird", "Start 5 morning sessions, one between 6 and 8 AM",
            C::TimeOfDay, R::Rare,
            T::TimeOfDay { start_hour: 6, end_hour: 8, lifetime_sessions: 5 }, 200),
        Achievement::new("night_owl", "Night Owl", "Start 5 evening sessions, one between 9 PM and midnight",
            C::TimeOfDay, R::Rare,
            T::TimeOfDay { start_hour: 21, end_hour: 24, lifetime_sessions: 5 }, 200),

        // Weekends
        Achievement::new("first_weekend", "Weekend Breather", "Complete a 30-minute weekend session",
            C::Weekend, R::Common,
            T::Weekend { min_session_minutes: 30, lifetime_sessions: 1 }, 75),
        Achievement::new("weekend_warrior", "Weekend Warrior", "Complete 10 weekend sessions, capped by an hour-long one",
            C::Weekend, R::Rare,
            T::Weekend { min_session_minutes: 60, lifetime_sessions: 10 }, 250),

        // Combos
        Achievement::new("perfect_week", "Perfect Week", "Meet the daily goal every day for a week",
            C::Combo, R::Epic, T::Combo { rule: ComboRule::PerfectWeek }, 500),
        Achievement::new("triple_threat", "Triple Threat", "Morning and evening sessions plus 3 sessions total",
            C::Combo, R::Rare, T::Combo { rule: ComboRule::TripleThreat }, 300),

        // Seasonal (time-limited)
        Achievement::new("fresh_start", "Fresh Start", "Hold a 31-day streak through January",
            C::Seasonal, R::Epic,
            T::Seasonal { rule: SeasonalRule::JanuaryStreak { days: 31 } }, 600)
            .expires_on(2027, 2, 1),
        Achievement::new("summer_offline", "Summer Offline", "A 2-hour weekend session in July",
            C::Seasonal, R::Rare,
            T::Seasonal { rule: SeasonalRule::SummerWeekendSession { minutes: 120 } }, 300)
            .expires_on(2026, 8, 1),
    ]
}

/// The default chain catalog.
pub fn default_chains() -> Vec<AchievementChain> {
    vec![
        AchievementChain {
            id: "streak_keeper".to_string(),
            title: "Streak Keeper".to_string(),
            members: vec![
                "streak_3".to_string(),
                "streak_7".to_string(),
                "streak_30".to_string(),
                "streak_100".to_string(),
            ],
            reward_xp: 1000,
            reward_title: Some("Keeper of the Flame".to_string()),
            reward_badge: Some("<flame>".to_string()),
        },
        AchievementChain {
            id: "habit_builder".to_string(),
            title: "Habit Builder".to_string(),
            members: vec![
                "first_steps".to_string(),
                "sessions_10".to_string(),
                "sessions_50".to_string(),
            ],
            reward_xp: 500,
            reward_title: None,
            reward_badge: Some("<brick>".to_string()),
        },
    ]
}
