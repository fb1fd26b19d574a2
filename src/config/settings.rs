//! Settings sections of `config.toml`

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::gamification::{
    DEFAULT_BASE_XP_FOR_LEVEL, DEFAULT_CYCLE_BASE_XP, DEFAULT_CYCLE_COINS,
    DEFAULT_CYCLE_XP_PER_BLOCK, DEFAULT_SHIELD_INTERVAL, DEFAULT_XP_INCREMENT_PER_LEVEL,
    DEFAULT_XP_PER_MINUTE,
};

/// `[progression]`: session XP and the level curve
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressionSettings {
    /// XP granted per studied minute
    #[serde(default = "default_xp_per_minute")]
    pub xp_per_minute: u64,

    /// XP needed to leave level 1
    #[serde(default = "default_base_xp_for_level")]
    pub base_xp_for_level: u64,

    /// Extra XP each further level costs
    #[serde(default = "default_xp_increment_per_level")]
    pub xp_increment_per_level: u64,
}

fn default_xp_per_minute() -> u64 {
    DEFAULT_XP_PER_MINUTE
}

fn default_base_xp_for_level() -> u64 {
    DEFAULT_BASE_XP_FOR_LEVEL
}

fn default_xp_increment_per_level() -> u64 {
    DEFAULT_XP_INCREMENT_PER_LEVEL
}

impl Default for ProgressionSettings {
    fn default() -> Self {
        Self {
            xp_per_minute: default_xp_per_minute(),
            base_xp_for_level: default_base_xp_for_level(),
            xp_increment_per_level: default_xp_increment_per_level(),
        }
    }
}

/// `[cycle]`: completion bonus
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CycleSettings {
    #[serde(default = "default_cycle_base_xp")]
    pub base_xp: u64,

    #[serde(default = "default_cycle_xp_per_block")]
    pub xp_per_block: u64,

    #[serde(default = "default_cycle_coins")]
    pub coins: u64,
}

fn default_cycle_base_xp() -> u64 {
    DEFAULT_CYCLE_BASE_XP
}

fn default_cycle_xp_per_block() -> u64 {
    DEFAULT_CYCLE_XP_PER_BLOCK
}

fn default_cycle_coins() -> u64 {
    DEFAULT_CYCLE_COINS
}

impl Default for CycleSettings {
    fn default() -> Self {
        Self {
            base_xp: default_cycle_base_xp(),
            xp_per_block: default_cycle_xp_per_block(),
            coins: default_cycle_coins(),
        }
    }
}

/// `[streak]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreakSettings {
    /// A shield is granted each time the login streak reaches a multiple of this
    #[serde(default = "default_shield_interval")]
    pub shield_interval: u32,
}

fn default_shield_interval() -> u32 {
    DEFAULT_SHIELD_INTERVAL
}

impl Default for StreakSettings {
    fn default() -> Self {
        Self {
            shield_interval: default_shield_interval(),
        }
    }
}

/// `[persistence]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersistenceSettings {
    /// Quiet window before a state write hits the disk
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,

    /// State document location (defaults to ~/.studyquest/state.json)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state_path: Option<PathBuf>,
}

fn default_debounce_ms() -> u64 {
    500
}

impl Default for PersistenceSettings {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
            state_path: None,
        }
    }
}

/// `[simulation]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationSettings {
    /// How often `watch` looks for clock commands and date changes
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    /// Pending clock commands before senders get `QueueFull`
    #[serde(default = "default_channel_capacity")]
    pub channel_capacity: usize,
}

fn default_poll_interval_ms() -> u64 {
    1000
}

fn default_channel_capacity() -> usize {
    32
}

impl Default for SimulationSettings {
    fn default() -> Self {
        Self {
            poll_interval_ms: default_poll_interval_ms(),
            channel_capacity: default_channel_capacity(),
        }
    }
}
