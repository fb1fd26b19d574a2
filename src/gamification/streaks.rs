//! Streak tracking system
//!
//! Daily login streak state machine with protection shields. Evaluated on
//! startup and whenever the effective date may have changed.

use chrono::NaiveDate;

use super::events::GamificationEvent;
use crate::domain::UserProgress;

/// Type of streak being tracked
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StreakType {
    /// Consecutive days with a login
    Login,
    /// Consecutive completed cycles
    Cycle,
}

impl StreakType {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Login => "Login Streak",
            Self::Cycle => "Cycle Streak",
        }
    }
}

/// What a login check did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginOutcome {
    /// No previous login on record
    FirstLogin,
    /// Already counted today
    AlreadyCounted,
    /// Logged in the day after the last login
    Continued { streak: u32, shield_earned: bool },
    /// Gap covered by a shield
    Protected { days_missed: i64, shields_left: u32 },
    /// Gap without a shield
    Lost { days_missed: i64, penalty: u32, streak: u32 },
    /// Today is before the last recorded login (clock moved back)
    ClockRewound,
}

impl LoginOutcome {
    /// Notification intents for this outcome
    pub fn events(&self, progress: &UserProgress) -> Vec<GamificationEvent> {
        match *self {
            Self::FirstLogin => vec![GamificationEvent::StreakIncreased {
                streak_type: StreakType::Login,
                count: progress.login_streak,
            }],
            Self::Continued {
                streak,
                shield_earned,
            } => {
                let mut events = vec![GamificationEvent::StreakIncreased {
                    streak_type: StreakType::Login,
                    count: streak,
                }];
                if shield_earned {
                    events.push(GamificationEvent::ShieldEarned {
                        shields: progress.streak_protection_shields,
                    });
                }
                events
            }
            Self::Protected { shields_left, .. } => vec![GamificationEvent::StreakProtected {
                streak_type: StreakType::Login,
                count: progress.login_streak,
                shields_left,
            }],
            Self::Lost {
                penalty, streak, ..
            } => vec![GamificationEvent::StreakLost {
                streak_type: StreakType::Login,
                penalty,
                count: streak,
            }],
            Self::AlreadyCounted | Self::ClockRewound => Vec::new(),
        }
    }
}

/// Whole days from `last` to `today` (negative if `today` is earlier)
pub fn days_between(today: NaiveDate, last: NaiveDate) -> i64 {
    (today - last).num_days()
}

/// Streak penalty for an unprotected gap of `days_missed` days
///
/// Two streak days per elapsed day, never more than the streak itself.
pub fn missed_days_penalty(days_missed: i64, streak: u32) -> u32 {
    let proportional = u32::try_from(days_missed.max(0).saturating_mul(2)).unwrap_or(u32::MAX);
    proportional.min(streak)
}

/// Extend the login streak by one day, granting a shield on every
/// `shield_interval`-th day. Returns the new snapshot and whether a shield was
/// granted.
pub fn continue_streak(progress: &UserProgress, shield_interval: u32) -> (UserProgress, bool) {
    let streak = progress.login_streak.saturating_add(1);
    let shield_earned = shield_interval > 0 && streak % shield_interval == 0;
    let shields = if shield_earned {
        progress.streak_protection_shields.saturating_add(1)
    } else {
        progress.streak_protection_shields
    };

    let next = UserProgress {
        login_streak: streak,
        streak_protection_shields: shields,
        ..progress.clone()
    };
    (next, shield_earned)
}

/// Run the daily login state machine for `today`
pub fn check_login(
    progress: &UserProgress,
    today: NaiveDate,
    shield_interval: u32,
) -> (UserProgress, LoginOutcome) {
    let Some(last) = progress.last_login_date else {
        let next = UserProgress {
            login_streak: 1,
            last_login_date: Some(today),
            ..progress.clone()
        };
        return (next, LoginOutcome::FirstLogin);
    };

    let days = days_between(today, last);
    if days == 0 {
        return (progress.clone(), LoginOutcome::AlreadyCounted);
    }

    let (next, outcome) = if days < 0 {
        (progress.clone(), LoginOutcome::ClockRewound)
    } else if days == 1 {
        let (next, shield_earned) = continue_streak(progress, shield_interval);
        let streak = next.login_streak;
        (
            next,
            LoginOutcome::Continued {
                streak,
                shield_earned,
            },
        )
    } else if progress.streak_protection_shields > 0 {
        let shields_left = progress.streak_protection_shields - 1;
        let next = UserProgress {
            streak_protection_shields: shields_left,
            ..progress.clone()
        };
        (
            next,
            LoginOutcome::Protected {
                days_missed: days,
                shields_left,
            },
        )
    } else {
        let penalty = missed_days_penalty(days, progress.login_streak);
        let streak = progress.login_streak.saturating_sub(penalty);
        let next = UserProgress {
            login_streak: streak,
            ..progress.clone()
        };
        (
            next,
            LoginOutcome::Lost {
                days_missed: days,
                penalty,
                streak,
            },
        )
    };

    (
        UserProgress {
            last_login_date: Some(today),
            ..next
        },
        outcome,
    )
}
