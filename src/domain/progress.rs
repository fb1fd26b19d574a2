use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::gamification::{DEFAULT_BASE_XP_FOR_LEVEL, DEFAULT_RANK_NAME};

/// Gamified progress of the single local user
///
/// `level`, `current_xp`, `xp_to_next_level`, `rank` and `total_medals` are
/// derived from `total_xp`; the state store recomputes them after every
/// transform so they never drift.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProgress {
    pub level: u32,
    #[serde(rename = "totalXP")]
    pub total_xp: u64,
    #[serde(rename = "currentXP")]
    pub current_xp: u64,
    pub xp_to_next_level: u64,
    pub coins: u64,
    pub rank: String,
    pub login_streak: u32,
    pub cycle_streak: u32,
    pub streak_protection_shields: u32,
    pub last_login_date: Option<NaiveDate>,
    pub total_medals: u32,
}

impl Default for UserProgress {
    fn default() -> Self {
        Self {
            level: 1,
            total_xp: 0,
            current_xp: 0,
            xp_to_next_level: DEFAULT_BASE_XP_FOR_LEVEL,
            coins: 0,
            rank: DEFAULT_RANK_NAME.to_string(),
            login_streak: 0,
            cycle_streak: 0,
            streak_protection_shields: 0,
            last_login_date: None,
            total_medals: 0,
        }
    }
}

impl UserProgress {
    /// Progress towards the next level (0.0 - 1.0)
    pub fn progress_to_next(&self) -> f32 {
        if self.xp_to_next_level == 0 {
            return 1.0;
        }
        (self.current_xp as f32 / self.xp_to_next_level as f32).clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_progress_serializes_with_document_keys() {
        let json = serde_json::to_value(UserProgress::default()).unwrap();
        assert_eq!(json["totalXP"], 0);
        assert_eq!(json["currentXP"], 0);
        assert_eq!(json["xpToNextLevel"], 100);
        assert_eq!(json["streakProtectionShields"], 0);
        assert!(json["lastLoginDate"].is_null());
    }

    #[test]
    fn test_progress_to_next() {
        let progress = UserProgress {
            current_xp: 50,
            xp_to_next_level: 200,
            ..UserProgress::default()
        };
        assert!((progress.progress_to_next() - 0.25).abs() < 0.001);
    }
}
