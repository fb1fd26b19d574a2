//! Lenient reader for the persisted state document
//!
//! Unknown fields are ignored and missing or malformed fields fall back to
//! defaults, so documents written by older or newer versions still load.

use serde_json::Value;

use crate::domain::{Cycle, SimulationData, StudySession, UnifiedAppState};
use crate::error::EngineError;
use crate::gamification::service::initialize_progress;
use crate::gamification::ProgressionRules;

/// Fresh root state with schema defaults
pub fn initial_state(rules: &ProgressionRules) -> UnifiedAppState {
    UnifiedAppState {
        user_progress: initialize_progress(None, rules),
        ..UnifiedAppState::default()
    }
}

/// Parse a stored document
///
/// Fails with `MalformedStoredState` when the text is not JSON, not an object,
/// or has no numeric `lastSavedAt`. Individual broken fields do not fail the
/// load.
pub fn parse_document(raw: &str, rules: &ProgressionRules) -> Result<UnifiedAppState, EngineError> {
    let root: Value = serde_json::from_str(raw)
        .map_err(|e| EngineError::MalformedStoredState(e.to_string()))?;
    let Value::Object(fields) = root else {
        return Err(EngineError::MalformedStoredState(
            "document is not an object".to_string(),
        ));
    };

    let last_saved_at = fields
        .get("lastSavedAt")
        .and_then(|v| v.as_i64().or_else(|| v.as_f64().map(|f| f as i64)))
        .ok_or_else(|| EngineError::MalformedStoredState("missing lastSavedAt".to_string()))?;

    let current_cycle = match fields.get("currentCycle") {
        None | Some(Value::Null) => None,
        Some(value) => match serde_json::from_value::<Cycle>(value.clone()) {
            Ok(cycle) => Some(cycle),
            Err(e) => {
                tracing::warn!("Dropping unreadable current cycle: {}", e);
                None
            }
        },
    };

    let completed_blocks = fields
        .get("completedBlocks")
        .and_then(Value::as_array)
        .map(|ids| {
            ids.iter()
                .filter_map(|id| id.as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default();

    let simulation_data = fields
        .get("simulationData")
        .and_then(|v| serde_json::from_value::<SimulationData>(v.clone()).ok())
        .unwrap_or_default();

    Ok(UnifiedAppState {
        user_progress: initialize_progress(fields.get("userProgress"), rules),
        study_sessions: parse_sessions(fields.get("studySessions")),
        completed_blocks: sanitize_completed_blocks(current_cycle.as_ref(), completed_blocks),
        current_cycle,
        target_exam: fields
            .get("targetExam")
            .and_then(Value::as_str)
            .map(str::to_string),
        simulation_data,
        last_saved_at,
    })
}

fn parse_sessions(value: Option<&Value>) -> Vec<StudySession> {
    let Some(items) = value.and_then(Value::as_array) else {
        return Vec::new();
    };

    let sessions: Vec<StudySession> = items
        .iter()
        .filter_map(|item| serde_json::from_value(item.clone()).ok())
        .collect();

    let skipped = items.len() - sessions.len();
    if skipped > 0 {
        tracing::warn!("Skipped {} unreadable study sessions", skipped);
    }
    sessions
}

/// Keep only ids that belong to `cycle`, first occurrence wins
pub fn sanitize_completed_blocks(cycle: Option<&Cycle>, blocks: Vec<String>) -> Vec<String> {
    let Some(cycle) = cycle else {
        return Vec::new();
    };

    let mut kept: Vec<String> = Vec::with_capacity(blocks.len());
    for id in blocks {
        if cycle.contains_block(&id) && !kept.contains(&id) {
            kept.push(id);
        }
    }
    kept
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::StudyBlock;
    use serde_json::json;

    fn cycle(ids: &[&str]) -> Cycle {
        Cycle {
            exam_name: "exam".to_string(),
            weekly_hour_target: 10.0,
            subjects: vec!["math".to_string()],
            blocks: ids
                .iter()
                .map(|id| StudyBlock {
                    id: id.to_string(),
                    subject: "math".to_string(),
                    duration_minutes: 60,
                })
                .collect(),
            created_at: 0,
        }
    }

    #[test]
    fn test_rejects_documents_without_stamp() {
        let rules = ProgressionRules::default();
        assert!(parse_document("not json", &rules).is_err());
        assert!(parse_document("[]", &rules).is_err());
        assert!(parse_document("{\"userProgress\":{}}", &rules).is_err());
    }

    #[test]
    fn test_minimal_document_gets_defaults() {
        let rules = ProgressionRules::default();
        let state = parse_document("{\"lastSavedAt\": 42}", &rules).unwrap();
        assert_eq!(state.last_saved_at, 42);
        assert_eq!(state.user_progress, initial_state(&rules).user_progress);
        assert!(state.study_sessions.is_empty());
        assert!(state.current_cycle.is_none());
    }

    #[test]
    fn test_broken_fields_are_dropped_individually() {
        let rules = ProgressionRules::default();
        let raw = json!({
            "lastSavedAt": 7,
            "userProgress": { "totalXP": 100 },
            "studySessions": [
                { "id": "s1", "subject": "math", "date": "2024-01-02", "duration": 30, "type": "review", "xpEarned": 30 },
                { "id": "s2", "subject": "math", "date": "yesterday" }
            ],
            "currentCycle": { "examName": "exam", "blocks": [{ "id": "b1", "subject": "math" }] },
            "completedBlocks": ["b1", "b1", "ghost", 5],
            "targetExam": 12,
            "simulationData": "garbage",
            "addedInV9": { "anything": true }
        })
        .to_string();

        let state = parse_document(&raw, &rules).unwrap();
        assert_eq!(state.user_progress.level, 2);
        assert_eq!(state.study_sessions.len(), 1);
        assert_eq!(state.completed_blocks, vec!["b1".to_string()]);
        assert!(state.target_exam.is_none());
        assert_eq!(state.simulation_data, SimulationData::default());
    }

    #[test]
    fn test_sanitize_completed_blocks() {
        let c = cycle(&["a", "b"]);
        let kept = sanitize_completed_blocks(
            Some(&c),
            vec!["b".into(), "x".into(), "a".into(), "b".into()],
        );
        assert_eq!(kept, vec!["b".to_string(), "a".to_string()]);
        assert!(sanitize_completed_blocks(None, vec!["a".into()]).is_empty());
    }
}
