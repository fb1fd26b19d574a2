//! Experience-granting transforms over `UserProgress`
//!
//! Every function is total: it takes a snapshot and returns a new one, never
//! panics, and clamps malformed numbers instead of propagating them.

use chrono::NaiveDate;
use serde_json::Value;

use super::levels::rank_for_level;
use super::medals::earned_count;
use super::rules::ProgressionRules;
use crate::domain::UserProgress;

/// Build a full progress record from an optional persisted partial
///
/// Known fields are read leniently (negative numbers clamp to zero, numeric
/// strings are accepted, anything else falls back to the default). Derived
/// fields are always recomputed from `totalXP`.
pub fn initialize_progress(stored: Option<&Value>, rules: &ProgressionRules) -> UserProgress {
    let defaults = UserProgress::default();
    let Some(Value::Object(fields)) = stored else {
        return with_level_fields(&defaults, rules);
    };

    let progress = UserProgress {
        total_xp: lenient_u64(fields.get("totalXP")).unwrap_or(defaults.total_xp),
        coins: lenient_u64(fields.get("coins")).unwrap_or(defaults.coins),
        login_streak: lenient_u32(fields.get("loginStreak")).unwrap_or(defaults.login_streak),
        cycle_streak: lenient_u32(fields.get("cycleStreak")).unwrap_or(defaults.cycle_streak),
        streak_protection_shields: lenient_u32(fields.get("streakProtectionShields"))
            .unwrap_or(defaults.streak_protection_shields),
        last_login_date: fields.get("lastLoginDate").and_then(lenient_date),
        ..defaults
    };
    with_level_fields(&progress, rules)
}

/// Recompute level, XP-in-level, rank and medal count from `total_xp`
pub fn with_level_fields(progress: &UserProgress, rules: &ProgressionRules) -> UserProgress {
    let info = rules.curve.level_from_xp(progress.total_xp);
    UserProgress {
        level: info.level,
        current_xp: info.current_xp,
        xp_to_next_level: info.xp_to_next_level,
        rank: rank_for_level(&rules.ranks, info.level).to_string(),
        total_medals: earned_count(&rules.medals, info.level),
        ..progress.clone()
    }
}

/// XP a session of `minutes` is worth (zero for non-positive durations)
pub fn session_xp(minutes: i64, rules: &ProgressionRules) -> u64 {
    if minutes <= 0 {
        return 0;
    }
    u64::try_from(minutes)
        .unwrap_or(0)
        .saturating_mul(rules.xp_per_minute)
}

/// Add raw XP and recompute the level fields
pub fn award_xp(progress: &UserProgress, amount: u64, rules: &ProgressionRules) -> UserProgress {
    let next = UserProgress {
        total_xp: progress.total_xp.saturating_add(amount),
        ..progress.clone()
    };
    with_level_fields(&next, rules)
}

/// Grant XP for a study session
///
/// Non-positive durations are a no-op. Callers detect a level-up by comparing
/// the old and new `level`.
pub fn apply_session_xp(
    progress: &UserProgress,
    minutes: i64,
    rules: &ProgressionRules,
) -> UserProgress {
    if minutes <= 0 {
        return progress.clone();
    }
    award_xp(progress, session_xp(minutes, rules), rules)
}

/// XP granted for finishing a cycle with `completed_blocks` blocks done
pub fn cycle_completion_xp(completed_blocks: usize, rules: &ProgressionRules) -> u64 {
    let blocks = u64::try_from(completed_blocks).unwrap_or(u64::MAX);
    rules
        .cycle_base_xp
        .saturating_add(rules.cycle_xp_per_block.saturating_mul(blocks))
}

/// Grant the cycle completion bonus and extend the cycle streak
pub fn apply_cycle_completion_bonus(
    progress: &UserProgress,
    completed_blocks: usize,
    rules: &ProgressionRules,
) -> UserProgress {
    let rewarded = award_xp(progress, cycle_completion_xp(completed_blocks, rules), rules);
    UserProgress {
        coins: rewarded.coins.saturating_add(rules.cycle_coins),
        cycle_streak: rewarded.cycle_streak.saturating_add(1),
        ..rewarded
    }
}

/// Spend one streak shield (never below zero)
pub fn consume_protection_shield(progress: &UserProgress) -> UserProgress {
    UserProgress {
        streak_protection_shields: progress.streak_protection_shields.saturating_sub(1),
        ..progress.clone()
    }
}

/// Drop the cycle streak back to zero
pub fn reset_cycle_streak(progress: &UserProgress) -> UserProgress {
    UserProgress {
        cycle_streak: 0,
        ..progress.clone()
    }
}

fn lenient_u64(value: Option<&Value>) -> Option<u64> {
    let value = value?;
    if let Some(n) = value.as_u64() {
        return Some(n);
    }
    let float = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    // `as` saturates; NaN maps to zero
    Some(if float.is_finite() && float > 0.0 {
        float.floor() as u64
    } else {
        0
    })
}

fn lenient_u32(value: Option<&Value>) -> Option<u32> {
    lenient_u64(value).map(|n| u32::try_from(n).unwrap_or(u32::MAX))
}

fn lenient_date(value: &Value) -> Option<NaiveDate> {
    let raw = value.as_str()?;
    let day = raw.get(..10).unwrap_or(raw);
    NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()
}
