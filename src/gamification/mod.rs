//! Gamification system: XP, Levels, Ranks, Streaks, Shields and Medals
//!
//! Everything in here is a pure function over snapshots. The state store
//! folds these into the persisted root.

pub mod service;
pub mod streaks;

mod events;
mod levels;
mod medals;
mod rules;

pub use events::{GamificationEvent, LevelUp, Transition};
pub use levels::{
    default_rank_bands, rank_for_level, LevelCurve, LevelInfo, RankBand,
    DEFAULT_BASE_XP_FOR_LEVEL, DEFAULT_RANK_NAME, DEFAULT_XP_INCREMENT_PER_LEVEL,
};
pub use medals::{default_medals, earned_count, newly_earned, Medal};
pub use rules::{
    ProgressionRules, DEFAULT_CYCLE_BASE_XP, DEFAULT_CYCLE_COINS, DEFAULT_CYCLE_XP_PER_BLOCK,
    DEFAULT_SHIELD_INTERVAL, DEFAULT_XP_PER_MINUTE,
};
pub use streaks::{LoginOutcome, StreakType};
