use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{Cycle, SimulationData, StudySession, StudySummary, UserProgress};

/// Persistence root: the whole document written on every change
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnifiedAppState {
    pub user_progress: UserProgress,
    pub study_sessions: Vec<StudySession>,
    pub current_cycle: Option<Cycle>,
    pub completed_blocks: Vec<String>,
    pub target_exam: Option<String>,
    pub simulation_data: SimulationData,
    /// Unix timestamp in milliseconds, strictly increasing across writes
    pub last_saved_at: i64,
}

impl UnifiedAppState {
    /// The date the engine treats as "today"
    ///
    /// While simulating this is the simulated date, otherwise `real_today`.
    pub fn effective_today(&self, real_today: NaiveDate) -> NaiveDate {
        match self.simulation_data.simulated_date {
            Some(date) if self.simulation_data.is_simulating => date,
            _ => real_today,
        }
    }

    pub fn is_block_completed(&self, block_id: &str) -> bool {
        self.completed_blocks.iter().any(|b| b == block_id)
    }

    pub fn study_summary(&self) -> StudySummary {
        StudySummary::from_sessions(&self.study_sessions)
    }

    /// Same content, ignoring the write stamp
    pub fn same_content(&self, other: &Self) -> bool {
        Self {
            last_saved_at: 0,
            ..self.clone()
        } == Self {
            last_saved_at: 0,
            ..other.clone()
        }
    }
}
