use std::collections::BTreeMap;
use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Kind of study activity logged in a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionType {
    Theory,
    Practice,
    Review,
    Exercises,
    #[serde(other)]
    Other,
}

impl SessionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Theory => "theory",
            Self::Practice => "practice",
            Self::Review => "review",
            Self::Exercises => "exercises",
            Self::Other => "other",
        }
    }

    /// Parse a user-supplied label, falling back to `Other`
    pub fn from_label(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "theory" => Self::Theory,
            "practice" => Self::Practice,
            "review" => Self::Review,
            "exercises" | "exercise" => Self::Exercises,
            _ => Self::Other,
        }
    }
}

impl fmt::Display for SessionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A logged study session
///
/// `xp_earned` is fixed when the session is recorded; later rule changes do
/// not rewrite history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudySession {
    pub id: String,
    pub subject: String,
    pub date: NaiveDate,
    /// Minutes studied
    pub duration: u32,
    #[serde(rename = "type")]
    pub session_type: SessionType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(rename = "xpEarned", default)]
    pub xp_earned: u64,
}

/// Aggregate view over the session log
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StudySummary {
    pub session_count: usize,
    pub total_minutes: u64,
    pub minutes_by_subject: BTreeMap<String, u64>,
}

impl StudySummary {
    pub fn from_sessions(sessions: &[StudySession]) -> Self {
        let mut summary = Self::default();
        for session in sessions {
            summary.session_count += 1;
            summary.total_minutes += u64::from(session.duration);
            *summary
                .minutes_by_subject
                .entry(session.subject.clone())
                .or_insert(0) += u64::from(session.duration);
        }
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(subject: &str, duration: u32) -> StudySession {
        StudySession {
            id: format!("{subject}-{duration}"),
            subject: subject.to_string(),
            date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            duration,
            session_type: SessionType::Theory,
            notes: None,
            xp_earned: u64::from(duration),
        }
    }

    #[test]
    fn test_unknown_session_type_deserializes_as_other() {
        let parsed: SessionType = serde_json::from_str("\"flashcards\"").unwrap();
        assert_eq!(parsed, SessionType::Other);
        assert_eq!(SessionType::from_label("Review"), SessionType::Review);
    }

    #[test]
    fn test_summary_groups_by_subject() {
        let sessions = vec![session("math", 30), session("law", 45), session("math", 15)];
        let summary = StudySummary::from_sessions(&sessions);

        assert_eq!(summary.session_count, 3);
        assert_eq!(summary.total_minutes, 90);
        assert_eq!(summary.minutes_by_subject["math"], 45);
        assert_eq!(summary.minutes_by_subject["law"], 45);
    }
}
