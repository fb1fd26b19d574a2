//! Tunable numbers behind the progression engine

use super::levels::{default_rank_bands, LevelCurve, RankBand};
use super::medals::{default_medals, Medal};

/// XP per studied minute
pub const DEFAULT_XP_PER_MINUTE: u64 = 1;

/// Flat XP for finishing a cycle
pub const DEFAULT_CYCLE_BASE_XP: u64 = 200;

/// XP per completed block when finishing a cycle
pub const DEFAULT_CYCLE_XP_PER_BLOCK: u64 = 10;

/// Coins for finishing a cycle
pub const DEFAULT_CYCLE_COINS: u64 = 50;

/// A shield is granted every time the login streak hits a multiple of this
pub const DEFAULT_SHIELD_INTERVAL: u32 = 7;

/// Everything the pure transforms need to know about the rules
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressionRules {
    pub curve: LevelCurve,
    pub xp_per_minute: u64,
    pub cycle_base_xp: u64,
    pub cycle_xp_per_block: u64,
    pub cycle_coins: u64,
    pub shield_interval: u32,
    pub ranks: Vec<RankBand>,
    pub medals: Vec<Medal>,
}

impl Default for ProgressionRules {
    fn default() -> Self {
        Self {
            curve: LevelCurve::default(),
            xp_per_minute: DEFAULT_XP_PER_MINUTE,
            cycle_base_xp: DEFAULT_CYCLE_BASE_XP,
            cycle_xp_per_block: DEFAULT_CYCLE_XP_PER_BLOCK,
            cycle_coins: DEFAULT_CYCLE_COINS,
            shield_interval: DEFAULT_SHIELD_INTERVAL,
            ranks: default_rank_bands(),
            medals: default_medals(),
        }
    }
}
