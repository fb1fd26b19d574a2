//! Level medals
//!
//! A medal is earned the moment the user's level reaches its requirement.

use serde::{Deserialize, Serialize};

use crate::domain::UserProgress;

/// Medal definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Medal {
    /// Level at which the medal is awarded
    pub requirement: u32,
    pub title: String,
}

impl Medal {
    pub fn new(requirement: u32, title: &str) -> Self {
        Self {
            requirement,
            title: title.to_string(),
        }
    }
}

/// Default medal table (sorted by requirement)
pub fn default_medals() -> Vec<Medal> {
    vec![
        Medal::new(2, "First Steps"),
        Medal::new(5, "Dedicated"),
        Medal::new(10, "Persistent"),
        Medal::new(15, "Tireless"),
        Medal::new(20, "Scholar of the Month"),
        Medal::new(30, "Unstoppable"),
        Medal::new(50, "Legend"),
    ]
}

/// Medals crossed between two snapshots, in ascending requirement order
pub fn newly_earned<'a>(
    medals: &'a [Medal],
    old: &UserProgress,
    new: &UserProgress,
) -> Vec<&'a Medal> {
    let mut crossed: Vec<&Medal> = medals
        .iter()
        .filter(|m| m.requirement <= new.level && m.requirement > old.level)
        .collect();
    crossed.sort_by_key(|m| m.requirement);
    crossed
}

/// Number of medals held at a level
pub fn earned_count(medals: &[Medal], level: u32) -> u32 {
    let count = medals.iter().filter(|m| m.requirement <= level).count();
    u32::try_from(count).unwrap_or(u32::MAX)
}
