//! Shared test utilities for store integration tests
#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::NaiveDate;
use tempfile::TempDir;

use studyquest::domain::{Cycle, StudyBlock};
use studyquest::{JsonFileStorage, ProgressionRules, UnifiedStateStore};

/// Wall clock pinned to a fixed day
pub fn fixed_today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 5, 20).expect("valid date")
}

/// Temp dir plus the state document path inside it
pub fn state_dir() -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let path = temp_dir.path().join("state.json");
    (temp_dir, path)
}

/// Open a file-backed store with a long debounce and the pinned wall clock
pub fn open_store(path: &Path) -> UnifiedStateStore {
    UnifiedStateStore::open(
        JsonFileStorage::new(path),
        ProgressionRules::default(),
        Duration::from_secs(30),
    )
    .with_wall_clock(fixed_today)
}

/// Cycle with one block per id, all on the same subject
pub fn sample_cycle(ids: &[&str]) -> Cycle {
    Cycle {
        exam_name: "Medical boards".to_string(),
        weekly_hour_target: 15.5,
        subjects: vec!["pharmacology".to_string()],
        blocks: ids
            .iter()
            .map(|id| StudyBlock {
                id: id.to_string(),
                subject: "pharmacology".to_string(),
                duration_minutes: 45,
            })
            .collect(),
        created_at: 1_716_000_000_000,
    }
}
