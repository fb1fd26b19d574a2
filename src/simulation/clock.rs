//! Command channel between the simulated clock and the state store

use std::sync::mpsc::{self, Receiver, SyncSender, TrySendError};

use crate::error::ClockError;

/// Commands the simulated clock can issue
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimCommand {
    /// Move one day forward, counting it as a consecutive login
    AdvanceDay,
    /// Move one day back, taking one day off the streak
    GoBackDay,
    /// Jump two days forward without logging in
    AdvanceTwoDaysSkip,
    /// Drop the override and return to the wall clock
    ResetSimulation,
}

impl SimCommand {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AdvanceDay => "advance_day",
            Self::GoBackDay => "go_back_day",
            Self::AdvanceTwoDaysSkip => "advance_two_days_skip",
            Self::ResetSimulation => "reset_simulation",
        }
    }
}

/// Sending half: handed to whatever drives the simulation (dev tools, QA)
#[derive(Debug, Clone)]
pub struct SimulationClock {
    tx: SyncSender<SimCommand>,
}

/// Receiving half: owned by the state store
#[derive(Debug)]
pub struct SimulationReceiver {
    rx: Receiver<SimCommand>,
}

/// Create a bounded clock channel
pub fn channel(capacity: usize) -> (SimulationClock, SimulationReceiver) {
    let (tx, rx) = mpsc::sync_channel(capacity.max(1));
    (SimulationClock { tx }, SimulationReceiver { rx })
}

impl SimulationClock {
    /// Queue a command without blocking
    pub fn send(&self, command: SimCommand) -> Result<(), ClockError> {
        self.tx.try_send(command).map_err(|e| match e {
            TrySendError::Full(_) => ClockError::QueueFull,
            TrySendError::Disconnected(_) => ClockError::Disconnected,
        })
    }

    pub fn advance_day(&self) -> Result<(), ClockError> {
        self.send(SimCommand::AdvanceDay)
    }

    pub fn go_back_day(&self) -> Result<(), ClockError> {
        self.send(SimCommand::GoBackDay)
    }

    pub fn advance_two_days_skip(&self) -> Result<(), ClockError> {
        self.send(SimCommand::AdvanceTwoDaysSkip)
    }

    pub fn reset_simulation(&self) -> Result<(), ClockError> {
        self.send(SimCommand::ResetSimulation)
    }
}

impl SimulationReceiver {
    /// Take every queued command in send order
    pub fn drain(&self) -> Vec<SimCommand> {
        self.rx.try_iter().collect()
    }
}
