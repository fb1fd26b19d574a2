use serde::{Deserialize, Serialize};

/// One planned unit of study inside a cycle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudyBlock {
    /// Stable identifier assigned by the scheduler
    pub id: String,
    pub subject: String,
    #[serde(default)]
    pub duration_minutes: u32,
}

/// A weekly study plan produced by the external scheduler
///
/// The engine only reads block ids and counts; block order and content are
/// owned by the scheduler.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cycle {
    pub exam_name: String,
    #[serde(default)]
    pub weekly_hour_target: f64,
    #[serde(default)]
    pub subjects: Vec<String>,
    #[serde(default)]
    pub blocks: Vec<StudyBlock>,
    /// Unix timestamp in milliseconds
    #[serde(default)]
    pub created_at: i64,
}

impl Cycle {
    pub fn contains_block(&self, block_id: &str) -> bool {
        self.blocks.iter().any(|b| b.id == block_id)
    }

    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }
}
