//! XP and Level system
//!
//! Levels follow an arithmetic progression: reaching level `n + 1` from level
//! `n` costs `base_xp + (n - 1) * increment` XP. Ranks group levels into
//! ascending bands.

use serde::{Deserialize, Serialize};

/// XP needed to go from level 1 to level 2
pub const DEFAULT_BASE_XP_FOR_LEVEL: u64 = 100;

/// Extra XP each further level costs over the previous one
pub const DEFAULT_XP_INCREMENT_PER_LEVEL: u64 = 30;

/// Rank of a fresh profile
pub const DEFAULT_RANK_NAME: &str = "Novice";

/// Termination guard for level searches. Not a level cap.
const LEVEL_SEARCH_GUARD: u32 = 1_000_000;

/// Level breakdown for a given total XP
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelInfo {
    pub level: u32,
    /// XP earned inside the current level
    pub current_xp: u64,
    /// XP the current level costs in total
    pub xp_to_next_level: u64,
}

/// Arithmetic level curve
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelCurve {
    pub base_xp: u64,
    pub increment: u64,
}

impl Default for LevelCurve {
    fn default() -> Self {
        Self {
            base_xp: DEFAULT_BASE_XP_FOR_LEVEL,
            increment: DEFAULT_XP_INCREMENT_PER_LEVEL,
        }
    }
}

impl LevelCurve {
    pub fn new(base_xp: u64, increment: u64) -> Self {
        Self { base_xp, increment }
    }

    fn base(&self) -> u64 {
        self.base_xp.max(1)
    }

    /// XP the given level costs before the next one is reached
    pub fn xp_for_level(&self, level: u32) -> u64 {
        let steps = u64::from(level.max(1) - 1);
        self.base()
            .saturating_add(steps.saturating_mul(self.increment))
    }

    /// Total XP needed to stand at the start of `level`
    pub fn cumulative_xp(&self, level: u32) -> u64 {
        let n = u128::from(level.max(1) - 1);
        u64::try_from(self.cumulative_for_steps(n)).unwrap_or(u64::MAX)
    }

    /// Sum of the first `n` level costs
    fn cumulative_for_steps(&self, n: u128) -> u128 {
        let base = u128::from(self.base());
        let inc = u128::from(self.increment);
        n * base + inc * n * n.saturating_sub(1) / 2
    }

    /// Level breakdown for `total_xp` (closed-form solve)
    pub fn level_from_xp(&self, total_xp: u64) -> LevelInfo {
        let xp = u128::from(total_xp);
        let mut steps = self.estimate_steps(total_xp);

        // The float estimate is off by a step or two at most
        for _ in 0..LEVEL_SEARCH_GUARD {
            if steps == 0 || self.cumulative_for_steps(steps) <= xp {
                break;
            }
            steps -= 1;
        }
        for _ in 0..LEVEL_SEARCH_GUARD {
            if self.cumulative_for_steps(steps + 1) > xp {
                break;
            }
            steps += 1;
        }

        let level = u32::try_from(steps + 1).unwrap_or(u32::MAX);
        let below = self.cumulative_for_steps(steps);
        LevelInfo {
            level,
            current_xp: u64::try_from(xp - below).unwrap_or(u64::MAX),
            xp_to_next_level: self.xp_for_level(level),
        }
    }

    /// Floating-point root of `inc/2 * n^2 + (base - inc/2) * n = xp`
    fn estimate_steps(&self, total_xp: u64) -> u128 {
        let base = self.base() as f64;
        let xp = total_xp as f64;
        if self.increment == 0 {
            return u128::from(total_xp / self.base());
        }
        let inc = self.increment as f64;
        let b = base - inc / 2.0;
        let root = (b * b + 2.0 * inc * xp).sqrt();
        let estimate = ((root - b) / inc).floor();
        if estimate.is_finite() && estimate > 0.0 {
            estimate as u128
        } else {
            0
        }
    }

    /// Level breakdown by walking the curve one level at a time
    pub fn level_from_xp_iterative(&self, total_xp: u64) -> LevelInfo {
        let mut level = 1u32;
        let mut remaining = total_xp;

        for _ in 0..LEVEL_SEARCH_GUARD {
            let cost = self.xp_for_level(level);
            if remaining < cost {
                break;
            }
            remaining -= cost;
            level += 1;
        }

        LevelInfo {
            level,
            current_xp: remaining,
            xp_to_next_level: self.xp_for_level(level),
        }
    }
}

/// Inclusive lower bound of a rank; the band runs until the next one starts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankBand {
    pub min_level: u32,
    pub name: String,
}

impl RankBand {
    pub fn new(min_level: u32, name: &str) -> Self {
        Self {
            min_level,
            name: name.to_string(),
        }
    }
}

/// Default four-tier rank table
pub fn default_rank_bands() -> Vec<RankBand> {
    vec![
        RankBand::new(1, DEFAULT_RANK_NAME),
        RankBand::new(5, "Scholar"),
        RankBand::new(10, "Expert"),
        RankBand::new(20, "Master"),
    ]
}

/// Rank name for a level (bands must be ascending)
pub fn rank_for_level(bands: &[RankBand], level: u32) -> &str {
    bands
        .iter()
        .rev()
        .find(|b| level >= b.min_level)
        .or_else(|| bands.first())
        .map(|b| b.name.as_str())
        .unwrap_or(DEFAULT_RANK_NAME)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_xp_for_level() {
        let curve = LevelCurve::default();
        assert_eq!(curve.xp_for_level(1), 100);
        assert_eq!(curve.xp_for_level(2), 130);
        assert_eq!(curve.xp_for_level(3), 160);
        assert_eq!(curve.cumulative_xp(1), 0);
        assert_eq!(curve.cumulative_xp(2), 100);
        assert_eq!(curve.cumulative_xp(3), 230);
        assert_eq!(curve.cumulative_xp(4), 390);
    }

    #[test]
    fn test_level_for_xp() {
        let curve = LevelCurve::default();
        assert_eq!(curve.level_from_xp(0).level, 1);
        assert_eq!(curve.level_from_xp(99).level, 1);
        assert_eq!(curve.level_from_xp(100).level, 2);
        assert_eq!(curve.level_from_xp(229).level, 2);
        assert_eq!(curve.level_from_xp(230).level, 3);

        let info = curve.level_from_xp(150);
        assert_eq!(info.level, 2);
        assert_eq!(info.current_xp, 50);
        assert_eq!(info.xp_to_next_level, 130);
    }

    #[test]
    fn test_exact_boundary_landing() {
        for curve in [
            LevelCurve::default(),
            LevelCurve::new(1, 0),
            LevelCurve::new(7, 3),
            LevelCurve::new(250, 125),
        ] {
            for level in 1..=300u32 {
                let info = curve.level_from_xp(curve.cumulative_xp(level));
                assert_eq!(info.level, level, "curve {curve:?}");
                assert_eq!(info.current_xp, 0);
            }
        }
    }

    #[test]
    fn test_closed_form_matches_iterative() {
        for curve in [
            LevelCurve::default(),
            LevelCurve::new(1, 1),
            LevelCurve::new(13, 0),
            LevelCurve::new(100, 1000),
        ] {
            for level in 1..=200u32 {
                let boundary = curve.cumulative_xp(level);
                for xp in [boundary.saturating_sub(1), boundary, boundary + 1] {
                    assert_eq!(
                        curve.level_from_xp(xp),
                        curve.level_from_xp_iterative(xp),
                        "curve {curve:?} xp {xp}"
                    );
                }
            }
        }
    }

    #[test]
    fn test_current_xp_stays_below_level_cost() {
        let curve = LevelCurve::default();
        for xp in (0..20_000u64).step_by(37) {
            let info = curve.level_from_xp(xp);
            assert!(info.current_xp < info.xp_to_next_level);
            assert!(curve.cumulative_xp(info.level) <= xp);
            assert!(curve.cumulative_xp(info.level + 1) > xp);
        }
    }

    #[test]
    fn test_huge_xp_terminates() {
        let info = LevelCurve::new(1, 0).level_from_xp(u64::MAX);
        assert_eq!(info.level, u32::MAX);
        let info = LevelCurve::default().level_from_xp(u64::MAX);
        assert!(info.level > 1);
    }

    #[test]
    fn test_search_guard_is_not_a_level_cap() {
        let curve = LevelCurve::default();
        let level = LEVEL_SEARCH_GUARD * 1_000;
        let at = curve.cumulative_xp(level);

        let info = curve.level_from_xp(at);
        assert_eq!(info.level, level);
        assert_eq!(info.current_xp, 0);
        assert_eq!(curve.level_from_xp(at - 1).level, level - 1);
    }

    #[test]
    fn test_rank_for_level() {
        let bands = default_rank_bands();
        assert_eq!(rank_for_level(&bands, 1), "Novice");
        assert_eq!(rank_for_level(&bands, 4), "Novice");
        assert_eq!(rank_for_level(&bands, 5), "Scholar");
        assert_eq!(rank_for_level(&bands, 19), "Expert");
        assert_eq!(rank_for_level(&bands, 20), "Master");
        assert_eq!(rank_for_level(&bands, 500), "Master");
        assert_eq!(rank_for_level(&[], 3), "Novice");
    }
}
