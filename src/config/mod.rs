//! Configuration loading and management

mod io;
mod settings;

pub use settings::{
    CycleSettings, PersistenceSettings, ProgressionSettings, SimulationSettings, StreakSettings,
};

use std::path::Path;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

use crate::gamification::{
    default_medals, default_rank_bands, LevelCurve, Medal, ProgressionRules, RankBand,
};

/// Commented default config written by `studyquest init`
pub const DEFAULT_CONFIG: &str = r#"# StudyQuest configuration

[progression]
# XP granted per studied minute
xp_per_minute = 1
# Level L needs base_xp_for_level + (L - 1) * xp_increment_per_level XP
base_xp_for_level = 100
xp_increment_per_level = 30

[cycle]
# Bonus for finishing a cycle: base_xp + xp_per_block * completed blocks
base_xp = 200
xp_per_block = 10
coins = 50

[streak]
# One protection shield every N consecutive login days
shield_interval = 7

[persistence]
debounce_ms = 500
# state_path = "/path/to/state.json"

[simulation]
poll_interval_ms = 1000
channel_capacity = 32

# Rank bands, ascending; the first must start at level 1
[[ranks]]
min_level = 1
name = "Novice"

[[ranks]]
min_level = 5
name = "Scholar"

[[ranks]]
min_level = 10
name = "Expert"

[[ranks]]
min_level = 20
name = "Master"

# Medals awarded when the level reaches `requirement`
[[medals]]
requirement = 2
title = "First Steps"

[[medals]]
requirement = 5
title = "Dedicated"

[[medals]]
requirement = 10
title = "Persistent"

[[medals]]
requirement = 15
title = "Tireless"

[[medals]]
requirement = 20
title = "Scholar of the Month"

[[medals]]
requirement = 30
title = "Unstoppable"

[[medals]]
requirement = 50
title = "Legend"
"#;

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub progression: ProgressionSettings,

    #[serde(default)]
    pub cycle: CycleSettings,

    #[serde(default)]
    pub streak: StreakSettings,

    #[serde(default)]
    pub persistence: PersistenceSettings,

    #[serde(default)]
    pub simulation: SimulationSettings,

    /// Rank bands by minimum level
    #[serde(default = "default_rank_bands")]
    pub ranks: Vec<RankBand>,

    /// Level medals
    #[serde(default = "default_medals")]
    pub medals: Vec<Medal>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            progression: ProgressionSettings::default(),
            cycle: CycleSettings::default(),
            streak: StreakSettings::default(),
            persistence: PersistenceSettings::default(),
            simulation: SimulationSettings::default(),
            ranks: default_rank_bands(),
            medals: default_medals(),
        }
    }
}

impl Config {
    /// Load and validate configuration from a file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config = Self::from_toml(&content)
            .with_context(|| format!("Invalid config file: {}", path.display()))?;

        Ok(config)
    }

    /// Parse and validate TOML text
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content).context("Failed to parse config")?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the engine cannot work with
    pub fn validate(&self) -> Result<()> {
        if self.progression.base_xp_for_level == 0 {
            bail!("progression.base_xp_for_level must be greater than zero");
        }
        if self.streak.shield_interval == 0 {
            bail!("streak.shield_interval must be greater than zero");
        }
        if self.simulation.channel_capacity == 0 {
            bail!("simulation.channel_capacity must be greater than zero");
        }

        match self.ranks.first() {
            None => bail!("at least one rank band is required"),
            Some(first) if first.min_level != 1 => {
                bail!("first rank band must start at level 1, not {}", first.min_level)
            }
            Some(_) => {}
        }
        for pair in self.ranks.windows(2) {
            if pair[1].min_level <= pair[0].min_level {
                bail!(
                    "rank bands must be ascending: '{}' ({}) follows '{}' ({})",
                    pair[1].name,
                    pair[1].min_level,
                    pair[0].name,
                    pair[0].min_level
                );
            }
        }

        if let Some(medal) = self.medals.iter().find(|m| m.requirement < 2) {
            bail!(
                "medal '{}' must require level 2 or higher, not {}",
                medal.title,
                medal.requirement
            );
        }
        for pair in self.medals.windows(2) {
            if pair[1].requirement <= pair[0].requirement {
                bail!(
                    "medal requirements must be strictly ascending: {} follows {}",
                    pair[1].requirement,
                    pair[0].requirement
                );
            }
        }

        Ok(())
    }

    /// Rules handed to the progression engine
    pub fn rules(&self) -> ProgressionRules {
        ProgressionRules {
            curve: LevelCurve::new(
                self.progression.base_xp_for_level,
                self.progression.xp_increment_per_level,
            ),
            xp_per_minute: self.progression.xp_per_minute,
            cycle_base_xp: self.cycle.base_xp,
            cycle_xp_per_block: self.cycle.xp_per_block,
            cycle_coins: self.cycle.coins,
            shield_interval: self.streak.shield_interval,
            ranks: self.ranks.clone(),
            medals: self.medals.clone(),
        }
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.persistence.debounce_ms)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.simulation.poll_interval_ms.max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_gives_defaults() {
        let config = Config::from_toml("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.rules(), ProgressionRules::default());
        assert_eq!(config.debounce(), Duration::from_millis(500));
    }

    #[test]
    fn test_default_config_text_matches_defaults() {
        let config = Config::from_toml(DEFAULT_CONFIG).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_partial_sections_keep_other_defaults() {
        let config = Config::from_toml(
            r#"
            [progression]
            xp_per_minute = 2

            [persistence]
            state_path = "/tmp/quest.json"
            "#,
        )
        .unwrap();

        assert_eq!(config.progression.xp_per_minute, 2);
        assert_eq!(config.progression.base_xp_for_level, 100);
        assert_eq!(config.persistence.debounce_ms, 500);
        assert_eq!(
            config.persistence.state_path.as_deref(),
            Some(Path::new("/tmp/quest.json"))
        );
        assert_eq!(config.ranks, default_rank_bands());
    }

    #[test]
    fn test_validate_rejects_bad_tables() {
        assert!(Config::from_toml("[progression]\nbase_xp_for_level = 0").is_err());
        assert!(Config::from_toml("[streak]\nshield_interval = 0").is_err());

        let mut config = Config::default();
        config.ranks = vec![RankBand::new(2, "Late")];
        assert!(config.validate().is_err());

        config.ranks = vec![RankBand::new(1, "A"), RankBand::new(1, "B")];
        assert!(config.validate().is_err());

        config.ranks = Vec::new();
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.medals = vec![Medal::new(5, "x"), Medal::new(5, "y")];
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_medal_earned_at_start() {
        let mut config = Config::default();
        config.medals = vec![Medal::new(1, "Welcome"), Medal::new(5, "Dedicated")];
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("Welcome"));

        config.medals = vec![Medal::new(0, "Nothing")];
        assert!(config.validate().is_err());

        config.medals = vec![Medal::new(2, "First Steps")];
        assert!(config.validate().is_ok());
    }
}
