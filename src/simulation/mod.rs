//! Simulated clock for exercising the streak machine without waiting days
//!
//! A `SimulationClock` queues commands on a bounded channel. The state store
//! owns the receiving end and folds each command through `apply_command`,
//! the same transform pipeline ordinary gameplay events use.

mod clock;

pub use clock::{channel, SimCommand, SimulationClock, SimulationReceiver};

use chrono::{Days, NaiveDate};

use crate::domain::{SimulationData, UnifiedAppState};
use crate::gamification::service::consume_protection_shield;
use crate::gamification::streaks::continue_streak;
use crate::gamification::{GamificationEvent, ProgressionRules, StreakType, Transition};

/// Flat streak loss for a simulated two-day skip. Deliberately not the
/// proportional penalty of the real login check.
pub const SIMULATED_SKIP_PENALTY: u32 = 3;

/// Fold one clock command into the root state
pub fn apply_command(
    state: &UnifiedAppState,
    command: SimCommand,
    real_today: NaiveDate,
    rules: &ProgressionRules,
) -> Transition {
    let mut next = state.clone();

    if command == SimCommand::ResetSimulation {
        next.simulation_data = SimulationData::default();
        return Transition::new(next);
    }

    if !next.simulation_data.is_simulating {
        next.simulation_data = SimulationData {
            is_simulating: true,
            simulated_date: Some(real_today),
            simulated_streak: next.user_progress.login_streak,
            simulation_start_date: Some(real_today),
        };
    }

    let current = next.simulation_data.simulated_date.unwrap_or(real_today);
    let mut events = Vec::new();

    let date = match command {
        SimCommand::AdvanceDay => {
            let (progress, shield_earned) =
                continue_streak(&next.user_progress, rules.shield_interval);
            events.push(GamificationEvent::StreakIncreased {
                streak_type: StreakType::Login,
                count: progress.login_streak,
            });
            if shield_earned {
                events.push(GamificationEvent::ShieldEarned {
                    shields: progress.streak_protection_shields,
                });
            }
            next.user_progress = progress;
            current.checked_add_days(Days::new(1)).unwrap_or(current)
        }
        SimCommand::GoBackDay => {
            let progress = &mut next.user_progress;
            progress.login_streak = progress.login_streak.saturating_sub(1);
            current.checked_sub_days(Days::new(1)).unwrap_or(current)
        }
        SimCommand::AdvanceTwoDaysSkip => {
            if next.user_progress.streak_protection_shields > 0 {
                next.user_progress = consume_protection_shield(&next.user_progress);
                events.push(GamificationEvent::StreakProtected {
                    streak_type: StreakType::Login,
                    count: next.user_progress.login_streak,
                    shields_left: next.user_progress.streak_protection_shields,
                });
            } else {
                let streak = next.user_progress.login_streak;
                let penalty = SIMULATED_SKIP_PENALTY.min(streak);
                next.user_progress.login_streak = streak - penalty;
                events.push(GamificationEvent::StreakLost {
                    streak_type: StreakType::Login,
                    penalty,
                    count: next.user_progress.login_streak,
                });
            }
            current.checked_add_days(Days::new(2)).unwrap_or(current)
        }
        SimCommand::ResetSimulation => current,
    };

    next.user_progress.last_login_date = Some(date);
    next.simulation_data.simulated_date = Some(date);
    next.simulation_data.simulated_streak = next.user_progress.login_streak;

    Transition::with_events(next, events)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::UserProgress;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, d).unwrap()
    }

    fn state(streak: u32, shields: u32) -> UnifiedAppState {
        UnifiedAppState {
            user_progress: UserProgress {
                login_streak: streak,
                streak_protection_shields: shields,
                last_login_date: Some(day(10)),
                ..UserProgress::default()
            },
            ..UnifiedAppState::default()
        }
    }

    fn run(start: UnifiedAppState, commands: &[SimCommand]) -> UnifiedAppState {
        let rules = ProgressionRules::default();
        commands.iter().fold(start, |s, c| {
            apply_command(&s, *c, day(10), &rules).state
        })
    }

    #[test]
    fn test_first_command_starts_simulation() {
        let next = run(state(2, 0), &[SimCommand::AdvanceDay]);
        let sim = &next.simulation_data;
        assert!(sim.is_simulating);
        assert_eq!(sim.simulation_start_date, Some(day(10)));
        assert_eq!(sim.simulated_date, Some(day(11)));
        assert_eq!(sim.simulated_streak, 3);
        assert_eq!(next.user_progress.login_streak, 3);
        assert_eq!(next.user_progress.last_login_date, Some(day(11)));
    }

    #[test]
    fn test_advance_grants_shield_on_interval() {
        let rules = ProgressionRules::default();
        let t = apply_command(&state(6, 0), SimCommand::AdvanceDay, day(10), &rules);
        assert_eq!(t.state.user_progress.login_streak, 7);
        assert_eq!(t.state.user_progress.streak_protection_shields, 1);
        assert!(t
            .events
            .contains(&GamificationEvent::ShieldEarned { shields: 1 }));
    }

    #[test]
    fn test_go_back_day() {
        let next = run(state(1, 0), &[SimCommand::GoBackDay, SimCommand::GoBackDay]);
        assert_eq!(next.user_progress.login_streak, 0);
        assert_eq!(next.simulation_data.simulated_date, Some(day(8)));
    }

    #[test]
    fn test_skip_uses_shield_first() {
        let next = run(state(9, 1), &[SimCommand::AdvanceTwoDaysSkip]);
        assert_eq!(next.user_progress.login_streak, 9);
        assert_eq!(next.user_progress.streak_protection_shields, 0);
        assert_eq!(next.simulation_data.simulated_date, Some(day(12)));
    }

    #[test]
    fn test_skip_without_shield_is_flat_penalty() {
        // The real rule would take min(2 * 2, 10) = 4; the simulated skip takes 3
        let next = run(state(10, 0), &[SimCommand::AdvanceTwoDaysSkip]);
        assert_eq!(next.user_progress.login_streak, 7);

        let next = run(state(2, 0), &[SimCommand::AdvanceTwoDaysSkip]);
        assert_eq!(next.user_progress.login_streak, 0);
    }

    #[test]
    fn test_reset_returns_to_wall_clock() {
        let next = run(
            state(3, 0),
            &[SimCommand::AdvanceDay, SimCommand::ResetSimulation],
        );
        assert_eq!(next.simulation_data, SimulationData::default());
        assert_eq!(next.effective_today(day(10)), day(10));
        assert_eq!(next.user_progress.login_streak, 4);
    }
}
