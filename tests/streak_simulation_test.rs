//! Integration tests for login streaks driven by the wall clock and the
//! simulated clock

mod common;

use chrono::Days;

use studyquest::error::ClockError;
use studyquest::gamification::StreakType;
use studyquest::simulation::{self, SimCommand};
use studyquest::{GamificationEvent, NewSession};

use common::{fixed_today, open_store, state_dir};

#[test]
fn test_login_is_idempotent_across_restarts() {
    let (_dir, path) = state_dir();
    {
        let mut store = open_store(&path);
        store.check_login();
        store.check_login();
    }
    let mut store = open_store(&path);
    let events = store.check_login();

    assert!(events.is_empty());
    assert_eq!(store.state().user_progress.login_streak, 1);
    assert_eq!(store.state().user_progress.last_login_date, Some(fixed_today()));
}

#[test]
fn test_week_of_simulated_logins_earns_shield_then_skip_spends_it() {
    let (_dir, path) = state_dir();
    let mut store = open_store(&path);
    let (clock, receiver) = simulation::channel(16);
    store.attach_clock(receiver);

    store.check_login();
    for _ in 0..6 {
        clock.advance_day().unwrap();
    }
    let events = store.pump_simulation();

    let progress = &store.state().user_progress;
    assert_eq!(progress.login_streak, 7);
    assert_eq!(progress.streak_protection_shields, 1);
    assert!(events.contains(&GamificationEvent::ShieldEarned { shields: 1 }));
    assert_eq!(store.today(), fixed_today() + Days::new(6));

    clock.advance_two_days_skip().unwrap();
    let events = store.pump_simulation();
    assert_eq!(store.state().user_progress.login_streak, 7);
    assert_eq!(store.state().user_progress.streak_protection_shields, 0);
    assert!(matches!(
        events[0],
        GamificationEvent::StreakProtected {
            streak_type: StreakType::Login,
            shields_left: 0,
            ..
        }
    ));

    clock.advance_two_days_skip().unwrap();
    store.pump_simulation();
    assert_eq!(store.state().user_progress.login_streak, 4);
    assert_eq!(store.state().simulation_data.simulated_streak, 4);
}

#[test]
fn test_simulated_date_survives_restart_and_dates_sessions() {
    let (_dir, path) = state_dir();
    {
        let mut store = open_store(&path);
        store.check_login();
        store.simulate(SimCommand::AdvanceDay);
        store.simulate(SimCommand::AdvanceDay);
    }

    let mut store = open_store(&path);
    let simulated = fixed_today() + Days::new(2);
    assert!(store.state().simulation_data.is_simulating);
    assert_eq!(store.today(), simulated);

    store.record_session(NewSession::new("physiology", 30)).unwrap();
    assert_eq!(store.state().study_sessions[0].date, simulated);

    // Already counted for the simulated day
    assert!(store.check_login().is_empty());
}

#[test]
fn test_reset_simulation_then_login_rebases_date() {
    let (_dir, path) = state_dir();
    let mut store = open_store(&path);
    store.check_login();
    store.simulate(SimCommand::AdvanceDay);
    store.simulate(SimCommand::AdvanceDay);
    store.simulate(SimCommand::ResetSimulation);

    assert!(!store.state().simulation_data.is_simulating);
    assert_eq!(store.today(), fixed_today());

    // lastLoginDate is in the simulated future; the wall clock is behind it
    store.check_login();
    let progress = &store.state().user_progress;
    assert_eq!(progress.login_streak, 3);
    assert_eq!(progress.last_login_date, Some(fixed_today()));
}

#[test]
fn test_go_back_day_never_goes_negative() {
    let (_dir, path) = state_dir();
    let mut store = open_store(&path);
    for _ in 0..3 {
        store.simulate(SimCommand::GoBackDay);
    }
    assert_eq!(store.state().user_progress.login_streak, 0);
    assert_eq!(store.today(), fixed_today() - Days::new(3));
}

#[test]
fn test_clock_reports_full_queue_and_dropped_store() {
    let (_dir, path) = state_dir();
    let mut store = open_store(&path);
    let (clock, receiver) = simulation::channel(1);
    store.attach_clock(receiver);

    clock.advance_day().unwrap();
    assert_eq!(clock.advance_day(), Err(ClockError::QueueFull));
    store.pump_simulation();
    assert_eq!(store.state().user_progress.login_streak, 1);

    drop(store);
    assert_eq!(clock.go_back_day(), Err(ClockError::Disconnected));
}

#[test]
fn test_startup_check_credits_login_before_first_session() {
    let (_dir, path) = state_dir();
    {
        let mut store = open_store(&path);
        let events = store.check_login_on_start();
        assert_eq!(
            events,
            vec![GamificationEvent::StreakIncreased {
                streak_type: StreakType::Login,
                count: 1
            }]
        );
        store.record_session(NewSession::new("histology", 30)).unwrap();
        assert_eq!(store.state().user_progress.login_streak, 1);
    }

    // Same day, new app start: nothing more to credit
    let mut store = open_store(&path);
    assert!(store.check_login_on_start().is_empty());
    assert_eq!(store.state().user_progress.login_streak, 1);
    assert_eq!(store.state().user_progress.last_login_date, Some(fixed_today()));
}
