//! Notification intents emitted by state transforms
//!
//! The engine never renders anything; a presentation layer turns these into
//! toasts, sounds or console lines.

use std::fmt;

use super::streaks::StreakType;
use crate::domain::UnifiedAppState;

/// A level up event
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelUp {
    pub old_level: u32,
    pub new_level: u32,
    pub new_rank: String,
}

/// Events that can happen during a state transform
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GamificationEvent {
    XpAwarded {
        amount: u64,
        reason: String,
    },
    LevelUp(LevelUp),
    MedalEarned {
        requirement: u32,
        title: String,
    },
    StreakIncreased {
        streak_type: StreakType,
        count: u32,
    },
    StreakProtected {
        streak_type: StreakType,
        count: u32,
        shields_left: u32,
    },
    StreakLost {
        streak_type: StreakType,
        penalty: u32,
        count: u32,
    },
    ShieldEarned {
        shields: u32,
    },
    CycleCompleted {
        exam_name: String,
        blocks_completed: usize,
        xp_awarded: u64,
        coins_awarded: u64,
    },
}

impl fmt::Display for GamificationEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::XpAwarded { amount, reason } => write!(f, "+{amount} XP ({reason})"),
            Self::LevelUp(l) => write!(
                f,
                "Level up! {} -> {} ({})",
                l.old_level, l.new_level, l.new_rank
            ),
            Self::MedalEarned { requirement, title } => {
                write!(f, "Medal earned: {title} (level {requirement})")
            }
            Self::StreakIncreased { streak_type, count } => {
                write!(f, "{} is now {count}", streak_type.label())
            }
            Self::StreakProtected {
                streak_type,
                count,
                shields_left,
            } => write!(
                f,
                "{} of {count} protected by a shield ({shields_left} left)",
                streak_type.label()
            ),
            Self::StreakLost {
                streak_type,
                penalty,
                count,
            } => write!(
                f,
                "{} dropped by {penalty} to {count}",
                streak_type.label()
            ),
            Self::ShieldEarned { shields } => {
                write!(f, "Streak shield earned (you now hold {shields})")
            }
            Self::CycleCompleted {
                exam_name,
                blocks_completed,
                xp_awarded,
                coins_awarded,
            } => write!(
                f,
                "Cycle for {exam_name} completed: {blocks_completed} blocks, +{xp_awarded} XP, +{coins_awarded} coins"
            ),
        }
    }
}

/// Result of a pure transform over the root state
#[derive(Debug, Clone)]
pub struct Transition {
    pub state: UnifiedAppState,
    pub events: Vec<GamificationEvent>,
}

impl Transition {
    pub fn new(state: UnifiedAppState) -> Self {
        Self {
            state,
            events: Vec::new(),
        }
    }

    pub fn with_events(state: UnifiedAppState, events: Vec<GamificationEvent>) -> Self {
        Self { state, events }
    }
}
