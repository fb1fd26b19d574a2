//! Pure transforms over the root state
//!
//! Each function takes the previous snapshot and returns the next one plus the
//! intents it produced. Rejections return an error and no state.

use chrono::NaiveDate;

use super::loader::initial_state;
use crate::domain::{Cycle, SessionType, StudySession, UnifiedAppState};
use crate::error::EngineError;
use crate::gamification::service::{
    apply_cycle_completion_bonus, apply_session_xp, consume_protection_shield,
    cycle_completion_xp, reset_cycle_streak, session_xp,
};
use crate::gamification::streaks::check_login;
use crate::gamification::{GamificationEvent, ProgressionRules, StreakType, Transition};

/// Input for logging a study session
#[derive(Debug, Clone)]
pub struct NewSession {
    pub subject: String,
    pub minutes: i64,
    pub session_type: SessionType,
    pub notes: Option<String>,
    /// Defaults to the effective date
    pub date: Option<NaiveDate>,
}

impl NewSession {
    pub fn new(subject: &str, minutes: i64) -> Self {
        Self {
            subject: subject.to_string(),
            minutes,
            session_type: SessionType::Theory,
            notes: None,
            date: None,
        }
    }
}

/// Daily login check for `today`
pub fn login_check(
    state: &UnifiedAppState,
    today: NaiveDate,
    rules: &ProgressionRules,
) -> Transition {
    let (progress, outcome) = check_login(&state.user_progress, today, rules.shield_interval);
    let events = outcome.events(&progress);
    Transition::with_events(
        UnifiedAppState {
            user_progress: progress,
            ..state.clone()
        },
        events,
    )
}

/// Append a session and grant its XP
pub fn record_session(
    state: &UnifiedAppState,
    session: &NewSession,
    id: String,
    today: NaiveDate,
    rules: &ProgressionRules,
) -> Result<Transition, EngineError> {
    if session.minutes <= 0 {
        return Err(EngineError::NonPositiveDuration(session.minutes));
    }

    let xp = session_xp(session.minutes, rules);
    let mut next = state.clone();
    next.user_progress = apply_session_xp(&state.user_progress, session.minutes, rules);
    next.study_sessions.push(StudySession {
        id,
        subject: session.subject.trim().to_string(),
        date: session.date.unwrap_or(today),
        duration: u32::try_from(session.minutes).unwrap_or(u32::MAX),
        session_type: session.session_type,
        notes: session.notes.clone().filter(|n| !n.trim().is_empty()),
        xp_earned: xp,
    });

    let events = vec![GamificationEvent::XpAwarded {
        amount: xp,
        reason: format!("{} min of {}", session.minutes, session.subject.trim()),
    }];
    Ok(Transition::with_events(next, events))
}

/// Remove a session from the log; granted XP is kept
pub fn delete_session(state: &UnifiedAppState, id: &str) -> Result<Transition, EngineError> {
    if !state.study_sessions.iter().any(|s| s.id == id) {
        return Err(EngineError::UnknownSession(id.to_string()));
    }
    let mut next = state.clone();
    next.study_sessions.retain(|s| s.id != id);
    Ok(Transition::new(next))
}

/// Install a new cycle from the scheduler
///
/// Replacing an unfinished cycle costs a shield, or the cycle streak when no
/// shield is left.
pub fn start_cycle(state: &UnifiedAppState, cycle: Cycle) -> Transition {
    let mut next = state.clone();
    let mut events = Vec::new();

    if state.current_cycle.is_some() {
        let progress = &state.user_progress;
        if progress.streak_protection_shields > 0 {
            next.user_progress = consume_protection_shield(progress);
            events.push(GamificationEvent::StreakProtected {
                streak_type: StreakType::Cycle,
                count: progress.cycle_streak,
                shields_left: next.user_progress.streak_protection_shields,
            });
        } else {
            next.user_progress = reset_cycle_streak(progress);
            if progress.cycle_streak > 0 {
                events.push(GamificationEvent::StreakLost {
                    streak_type: StreakType::Cycle,
                    penalty: progress.cycle_streak,
                    count: 0,
                });
            }
        }
    }

    next.current_cycle = Some(cycle);
    next.completed_blocks.clear();
    Transition::with_events(next, events)
}

fn require_block(state: &UnifiedAppState, block_id: &str) -> Result<(), EngineError> {
    match &state.current_cycle {
        Some(cycle) if cycle.contains_block(block_id) => Ok(()),
        _ => Err(EngineError::InvalidBlockReference(block_id.to_string())),
    }
}

/// Mark a block of the current cycle as done (idempotent)
pub fn complete_block(state: &UnifiedAppState, block_id: &str) -> Result<Transition, EngineError> {
    require_block(state, block_id)?;
    let mut next = state.clone();
    if !next.is_block_completed(block_id) {
        next.completed_blocks.push(block_id.to_string());
    }
    Ok(Transition::new(next))
}

/// Undo a block completion
pub fn uncomplete_block(
    state: &UnifiedAppState,
    block_id: &str,
) -> Result<Transition, EngineError> {
    require_block(state, block_id)?;
    let mut next = state.clone();
    next.completed_blocks.retain(|b| b != block_id);
    Ok(Transition::new(next))
}

/// Close the current cycle: grant the bonus and archive it
pub fn complete_cycle(
    state: &UnifiedAppState,
    rules: &ProgressionRules,
) -> Result<Transition, EngineError> {
    let Some(cycle) = &state.current_cycle else {
        return Err(EngineError::NoActiveCycle);
    };

    let blocks_completed = state.completed_blocks.len();
    let xp = cycle_completion_xp(blocks_completed, rules);
    let progress = apply_cycle_completion_bonus(&state.user_progress, blocks_completed, rules);
    let events = vec![
        GamificationEvent::CycleCompleted {
            exam_name: cycle.exam_name.clone(),
            blocks_completed,
            xp_awarded: xp,
            coins_awarded: rules.cycle_coins,
        },
        GamificationEvent::StreakIncreased {
            streak_type: StreakType::Cycle,
            count: progress.cycle_streak,
        },
    ];

    let next = UnifiedAppState {
        user_progress: progress,
        current_cycle: None,
        completed_blocks: Vec::new(),
        ..state.clone()
    };
    Ok(Transition::with_events(next, events))
}

pub fn set_target_exam(state: &UnifiedAppState, exam: Option<String>) -> Transition {
    Transition::new(UnifiedAppState {
        target_exam: exam.filter(|e| !e.trim().is_empty()),
        ..state.clone()
    })
}

/// Back to a first-run state
pub fn reset(rules: &ProgressionRules) -> Transition {
    Transition::new(initial_state(rules))
}
