//! Integration tests for the state store against a JSON document on disk

mod common;

use std::fs;

use serde_json::Value;

use studyquest::domain::SessionType;
use studyquest::store::initial_state;
use studyquest::{GamificationEvent, NewSession, ProgressionRules};

use common::{fixed_today, open_store, sample_cycle, state_dir};

#[test]
fn test_state_survives_restart() {
    let (_dir, path) = state_dir();

    let saved = {
        let mut store = open_store(&path);
        store.check_login();
        let mut session = NewSession::new("pharmacology", 95);
        session.session_type = SessionType::Review;
        session.notes = Some("beta blockers".to_string());
        store.record_session(session).unwrap();
        store.start_cycle(sample_cycle(&["b1", "b2", "b3"]));
        store.complete_block("b2").unwrap();
        store.set_target_exam(Some("Medical boards".to_string()));
        store.state().clone()
        // dropping the store flushes the pending write
    };

    let reopened = open_store(&path);
    assert_eq!(reopened.state(), &saved);
    assert_eq!(reopened.state().study_sessions[0].notes.as_deref(), Some("beta blockers"));
    assert_eq!(reopened.state().completed_blocks, vec!["b2".to_string()]);
}

#[test]
fn test_document_uses_camel_case_schema() {
    let (_dir, path) = state_dir();
    {
        let mut store = open_store(&path);
        let events = store.record_session(NewSession::new("anatomy", 150)).unwrap();
        assert!(events
            .iter()
            .any(|e| matches!(e, GamificationEvent::LevelUp(_))));
    }

    let raw = fs::read_to_string(&path).unwrap();
    let doc: Value = serde_json::from_str(&raw).unwrap();

    let progress = &doc["userProgress"];
    assert_eq!(progress["level"], 2);
    assert_eq!(progress["totalXP"], 150);
    assert_eq!(progress["currentXP"], 50);
    assert_eq!(progress["xpToNextLevel"], 130);
    assert_eq!(progress["totalMedals"], 1);

    let session = &doc["studySessions"][0];
    assert_eq!(session["duration"], 150);
    assert_eq!(session["type"], "theory");
    assert_eq!(session["xpEarned"], 150);
    assert_eq!(session["date"], fixed_today().to_string());

    assert!(doc["currentCycle"].is_null());
    assert!(doc["lastSavedAt"].as_i64().unwrap() > 0);
}

#[test]
fn test_malformed_document_starts_fresh_and_is_replaced() {
    let (_dir, path) = state_dir();
    fs::write(&path, "{\"userProgress\": {\"totalXP\": 9000}").unwrap();

    {
        let mut store = open_store(&path);
        assert_eq!(
            store.state().user_progress,
            initial_state(&ProgressionRules::default()).user_progress
        );
        store.check_login();
    }

    let doc: Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(doc["userProgress"]["loginStreak"], 1);
}

#[test]
fn test_older_document_fills_missing_fields() {
    let (_dir, path) = state_dir();
    fs::write(
        &path,
        r#"{
            "lastSavedAt": 1700000000000,
            "userProgress": { "totalXP": 400, "loginStreak": 4, "lastLoginDate": "2024-05-19" },
            "studySessions": []
        }"#,
    )
    .unwrap();

    let mut store = open_store(&path);
    let progress = &store.state().user_progress;
    assert_eq!(progress.level, 4);
    assert_eq!(progress.current_xp, 10);
    assert_eq!(progress.rank, "Novice");
    assert!(store.state().current_cycle.is_none());

    // Next write is stamped after the stored one
    store.check_login();
    assert!(store.state().last_saved_at > 1_700_000_000_000);
    assert_eq!(store.state().user_progress.login_streak, 5);
}

#[test]
fn test_cycle_completion_persists_bonus() {
    let (_dir, path) = state_dir();
    {
        let mut store = open_store(&path);
        store.start_cycle(sample_cycle(&["a", "b"]));
        store.complete_block("a").unwrap();
        store.complete_block("b").unwrap();
        store.uncomplete_block("b").unwrap();
        store.complete_block("b").unwrap();
        let events = store.complete_cycle().unwrap();
        assert!(matches!(
            events[0],
            GamificationEvent::CycleCompleted {
                blocks_completed: 2,
                xp_awarded: 220,
                coins_awarded: 50,
                ..
            }
        ));
    }

    let store = open_store(&path);
    let progress = &store.state().user_progress;
    assert_eq!(progress.total_xp, 220);
    assert_eq!(progress.coins, 50);
    assert_eq!(progress.cycle_streak, 1);
    assert!(store.state().current_cycle.is_none());
    assert!(store.state().completed_blocks.is_empty());
}

#[test]
fn test_deleting_session_keeps_xp_on_disk() {
    let (_dir, path) = state_dir();
    {
        let mut store = open_store(&path);
        store.record_session(NewSession::new("anatomy", 60)).unwrap();
        let id = store.state().study_sessions[0].id.clone();
        store.delete_session(&id).unwrap();
        assert!(store.delete_session(&id).is_err());
    }

    let store = open_store(&path);
    assert!(store.state().study_sessions.is_empty());
    assert_eq!(store.state().user_progress.total_xp, 60);
}

#[test]
fn test_reset_is_persisted() {
    let (_dir, path) = state_dir();
    {
        let mut store = open_store(&path);
        store.check_login();
        store.record_session(NewSession::new("anatomy", 700)).unwrap();
        store.start_cycle(sample_cycle(&["a"]));
        store.reset();
    }

    let store = open_store(&path);
    assert!(store
        .state()
        .same_content(&initial_state(&ProgressionRules::default())));
}

#[test]
fn test_flush_writes_before_debounce_expires() {
    let (_dir, path) = state_dir();
    let mut store = open_store(&path);
    store.set_target_exam(Some("Bar exam".to_string()));
    assert!(!path.exists());

    store.flush();
    let doc: Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(doc["targetExam"], "Bar exam");
    assert!(store.take_storage_advisory().is_none());
}
