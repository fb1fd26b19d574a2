use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Persisted state of the simulated clock
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SimulationData {
    pub is_simulating: bool,
    pub simulated_date: Option<NaiveDate>,
    pub simulated_streak: u32,
    pub simulation_start_date: Option<NaiveDate>,
}
