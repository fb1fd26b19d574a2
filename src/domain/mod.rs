//! Core domain types for StudyQuest

mod cycle;
mod progress;
mod session;
mod simulation;
mod state;

pub use cycle::{Cycle, StudyBlock};
pub use progress::UserProgress;
pub use session::{SessionType, StudySession, StudySummary};
pub use simulation::SimulationData;
pub use state::UnifiedAppState;
