//! Unified state store
//!
//! Holds the single `UnifiedAppState` root and folds every mutation through
//! one pipeline:
//!
//! ```text
//! gameplay call ──┐
//!                 ├─> transform(previous) ─> finalize ─> stamp ─> persister
//! clock command ──┘                                         (whole snapshot)
//! ```
//!
//! # Usage
//!
//! ```ignore
//! let mut store = UnifiedStateStore::open(JsonFileStorage::new(path), rules, debounce);
//! store.check_login();
//! let events = store.record_session(NewSession::new("math", 45))?;
//! // dropping the store flushes pending writes
//! ```

mod loader;
mod persister;
mod storage;
pub mod transforms;

pub use loader::{initial_state, parse_document, sanitize_completed_blocks};
pub use persister::DebouncedPersister;
pub use storage::{DurableStorage, JsonFileStorage, MemoryStorage};
pub use transforms::NewSession;

use std::time::Duration;

use chrono::{Local, NaiveDate, Utc};

use crate::domain::{Cycle, UnifiedAppState};
use crate::error::EngineError;
use crate::gamification::service::with_level_fields;
use crate::gamification::{newly_earned, GamificationEvent, LevelUp, ProgressionRules, Transition};
use crate::simulation::{self, SimCommand, SimulationReceiver};

/// Whether a commit may lower total XP
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CommitMode {
    Gameplay,
    Reset,
}

fn system_today() -> NaiveDate {
    Local::now().date_naive()
}

/// Single owner of the application state
pub struct UnifiedStateStore {
    state: UnifiedAppState,
    rules: ProgressionRules,
    persister: DebouncedPersister<UnifiedAppState>,
    clock: Option<SimulationReceiver>,
    wall_clock: fn() -> NaiveDate,
    start_checked: bool,
}

impl UnifiedStateStore {
    /// Load the stored document (or defaults) and start the persister
    ///
    /// A missing, unreadable or malformed document never fails startup.
    pub fn open<S: DurableStorage>(storage: S, rules: ProgressionRules, debounce: Duration) -> Self {
        let state = match storage.read() {
            Ok(Some(raw)) => match parse_document(&raw, &rules) {
                Ok(state) => state,
                Err(e) => {
                    tracing::warn!("{}; starting from defaults", e);
                    initial_state(&rules)
                }
            },
            Ok(None) => {
                tracing::debug!("No stored state, starting fresh");
                initial_state(&rules)
            }
            Err(e) => {
                tracing::warn!("Failed to read stored state: {}; starting from defaults", e);
                initial_state(&rules)
            }
        };

        Self {
            state,
            rules,
            persister: DebouncedPersister::new(storage, debounce),
            clock: None,
            wall_clock: system_today,
            start_checked: false,
        }
    }

    /// Replace the wall clock (tests, replays)
    pub fn with_wall_clock(mut self, wall_clock: fn() -> NaiveDate) -> Self {
        self.wall_clock = wall_clock;
        self
    }

    pub fn state(&self) -> &UnifiedAppState {
        &self.state
    }

    pub fn rules(&self) -> &ProgressionRules {
        &self.rules
    }

    /// Effective "today": the simulated date while simulating
    pub fn today(&self) -> NaiveDate {
        self.state.effective_today((self.wall_clock)())
    }

    /// Apply `transform` to the current snapshot and persist the result
    pub fn update_state<F>(&mut self, transform: F) -> Vec<GamificationEvent>
    where
        F: FnOnce(&UnifiedAppState) -> Transition,
    {
        let transition = transform(&self.state);
        self.commit(transition, CommitMode::Gameplay)
    }

    /// Like `update_state`, but the transform may reject the change
    ///
    /// A rejection is logged and leaves the state untouched.
    pub fn try_update_state<F>(&mut self, transform: F) -> Result<Vec<GamificationEvent>, EngineError>
    where
        F: FnOnce(&UnifiedAppState) -> Result<Transition, EngineError>,
    {
        match transform(&self.state) {
            Ok(transition) => Ok(self.commit(transition, CommitMode::Gameplay)),
            Err(e) => {
                tracing::warn!("Rejected update: {}", e);
                Err(e)
            }
        }
    }

    fn commit(&mut self, transition: Transition, mode: CommitMode) -> Vec<GamificationEvent> {
        let Transition {
            state: mut next,
            mut events,
        } = transition;
        let previous = &self.state;

        if mode == CommitMode::Gameplay
            && next.user_progress.total_xp < previous.user_progress.total_xp
        {
            tracing::warn!(
                "Transform lowered total XP ({} -> {}); keeping previous total",
                previous.user_progress.total_xp,
                next.user_progress.total_xp
            );
            next.user_progress.total_xp = previous.user_progress.total_xp;
        }

        next.user_progress = with_level_fields(&next.user_progress, &self.rules);
        next.completed_blocks = sanitize_completed_blocks(
            next.current_cycle.as_ref(),
            std::mem::take(&mut next.completed_blocks),
        );

        if mode == CommitMode::Gameplay {
            let (old, new) = (&previous.user_progress, &next.user_progress);
            if new.level > old.level {
                tracing::info!("Level up: {} -> {} ({})", old.level, new.level, new.rank);
                events.push(GamificationEvent::LevelUp(LevelUp {
                    old_level: old.level,
                    new_level: new.level,
                    new_rank: new.rank.clone(),
                }));
            }
            for medal in newly_earned(&self.rules.medals, old, new) {
                events.push(GamificationEvent::MedalEarned {
                    requirement: medal.requirement,
                    title: medal.title.clone(),
                });
            }
        }

        if events.is_empty() && next.same_content(previous) {
            tracing::debug!("Nothing changed, skipping commit");
            return events;
        }

        for event in &events {
            if matches!(event, GamificationEvent::StreakLost { .. }) {
                tracing::info!("{}", event);
            }
        }

        next.last_saved_at = Utc::now()
            .timestamp_millis()
            .max(previous.last_saved_at.saturating_add(1));

        tracing::debug!(
            "Committed state at {} ({} events)",
            next.last_saved_at,
            events.len()
        );
        self.state = next;
        self.persister.schedule(self.state.clone());
        events
    }

    // ========================================
    // GAMEPLAY OPERATIONS
    // ========================================

    /// Daily login streak check against the effective date
    pub fn check_login(&mut self) -> Vec<GamificationEvent> {
        let transition = transforms::login_check(&self.state, self.today(), &self.rules);
        self.commit(transition, CommitMode::Gameplay)
    }

    /// Login check for this app start
    ///
    /// Runs at most once per store; later calls return no events.
    pub fn check_login_on_start(&mut self) -> Vec<GamificationEvent> {
        if self.start_checked {
            return Vec::new();
        }
        self.start_checked = true;
        self.check_login()
    }

    pub fn record_session(&mut self, session: NewSession) -> Result<Vec<GamificationEvent>, EngineError> {
        let today = self.today();
        let id = uuid::Uuid::new_v4().to_string();
        let rules = self.rules.clone();
        self.try_update_state(|state| transforms::record_session(state, &session, id, today, &rules))
    }

    pub fn delete_session(&mut self, id: &str) -> Result<Vec<GamificationEvent>, EngineError> {
        self.try_update_state(|state| transforms::delete_session(state, id))
    }

    pub fn start_cycle(&mut self, cycle: Cycle) -> Vec<GamificationEvent> {
        self.update_state(|state| transforms::start_cycle(state, cycle))
    }

    pub fn complete_block(&mut self, block_id: &str) -> Result<Vec<GamificationEvent>, EngineError> {
        self.try_update_state(|state| transforms::complete_block(state, block_id))
    }

    pub fn uncomplete_block(&mut self, block_id: &str) -> Result<Vec<GamificationEvent>, EngineError> {
        self.try_update_state(|state| transforms::uncomplete_block(state, block_id))
    }

    pub fn complete_cycle(&mut self) -> Result<Vec<GamificationEvent>, EngineError> {
        let rules = self.rules.clone();
        self.try_update_state(|state| transforms::complete_cycle(state, &rules))
    }

    pub fn set_target_exam(&mut self, exam: Option<String>) -> Vec<GamificationEvent> {
        self.update_state(|state| transforms::set_target_exam(state, exam))
    }

    /// Wipe progress, sessions, cycle, completed blocks and simulation data
    pub fn reset(&mut self) -> Vec<GamificationEvent> {
        tracing::info!("Resetting all progress");
        let transition = transforms::reset(&self.rules);
        self.commit(transition, CommitMode::Reset)
    }

    // ========================================
    // SIMULATED CLOCK
    // ========================================

    /// Take ownership of the receiving end of a clock channel
    pub fn attach_clock(&mut self, receiver: SimulationReceiver) {
        self.clock = Some(receiver);
    }

    /// Apply every queued clock command in send order
    pub fn pump_simulation(&mut self) -> Vec<GamificationEvent> {
        let commands = match &self.clock {
            Some(receiver) => receiver.drain(),
            None => return Vec::new(),
        };

        let mut events = Vec::new();
        for command in commands {
            events.extend(self.simulate(command));
        }
        events
    }

    /// Apply a single clock command directly
    pub fn simulate(&mut self, command: SimCommand) -> Vec<GamificationEvent> {
        tracing::debug!("Simulation command: {}", command.as_str());
        let transition =
            simulation::apply_command(&self.state, command, (self.wall_clock)(), &self.rules);
        self.commit(transition, CommitMode::Gameplay)
    }

    // ========================================
    // PERSISTENCE
    // ========================================

    /// Write the latest snapshot now instead of waiting for the quiet window
    pub fn flush(&self) {
        self.persister.flush();
    }

    /// Last storage failure, if one happened since the previous call
    pub fn take_storage_advisory(&self) -> Option<String> {
        self.persister.take_advisory()
    }
}
