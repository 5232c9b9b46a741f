//! Progression engine for the Unplug digital-wellness app.
//!
//! Turns raw offline (screen-off) session durations into XP, levels,
//! achievements, chain bonuses, and daily-goal streaks over a single
//! persisted user profile. The app shell, trackers, and social services
//! talk to one [`ProgressionEngine`] instance; persistence goes through the
//! opaque [`KvStore`] boundary so the shell owns the cipher.
//!
//! State transitions are idempotent and monotonic: re-running an evaluation
//! never double-awards, and XP, counters, and the unlocked set only grow.

pub mod achievements;
pub mod engine;
pub mod error;
pub mod evaluator;
pub mod events;
pub mod goals;
pub mod levels;
pub mod profile;
pub mod store;
pub mod streaks;
pub mod xp;

pub use achievements::{Achievement, AchievementChain, AchievementTarget, Category, Rarity};
pub use engine::{AchievementProgress, ProgressionEngine, WeeklyStats};
pub use error::ProgressionError;
pub use events::ProgressionEvent;
pub use goals::{SessionGoal, SessionNote};
pub use levels::{LevelInfo, MAX_LEVEL};
pub use profile::{DailyStats, Settings, UserProfile};
pub use store::{FileStore, KvStore, MemoryStore, PROFILE_KEY};
