//! Study session CLI commands.

use anyhow::Result;
use chrono::NaiveDate;

use studyquest::domain::SessionType;
use studyquest::NewSession;

use super::{finish, print_events, CliContext};

/// Log a study session
pub fn add(
    ctx: &CliContext,
    subject: String,
    minutes: i64,
    session_type: &str,
    notes: Option<String>,
    date: Option<NaiveDate>,
) -> Result<()> {
    let mut store = ctx.open_store();
    let session = NewSession {
        subject,
        minutes,
        session_type: SessionType::from_label(session_type),
        notes,
        date,
    };

    let events = store.record_session(session)?;
    if let Some(recorded) = store.state().study_sessions.last() {
        println!("Recorded session {}", recorded.id);
    }
    print_events(&events);
    finish(store);
    Ok(())
}

/// List stored sessions, newest first
pub fn list(ctx: &CliContext, limit: Option<usize>, json: bool) -> Result<()> {
    let store = ctx.open_store();
    let mut sessions: Vec<_> = store.state().study_sessions.iter().collect();
    sessions.sort_by(|a, b| b.date.cmp(&a.date));

    // Apply limit
    if let Some(n) = limit {
        sessions.truncate(n);
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&sessions)?);
        return Ok(());
    }

    if sessions.is_empty() {
        println!("No sessions found.");
        return Ok(());
    }

    println!(
        "{:<36} {:<10} {:<20} {:<10} {:>6} {:>6}",
        "ID", "DATE", "SUBJECT", "TYPE", "MIN", "XP"
    );
    println!("{}", "-".repeat(93));

    for session in sessions {
        println!(
            "{:<36} {:<10} {:<20} {:<10} {:>6} {:>6}",
            session.id,
            session.date.to_string(),
            session.subject,
            session.session_type.as_str(),
            session.duration,
            session.xp_earned
        );
        if let Some(notes) = &session.notes {
            println!("    {}", notes);
        }
    }

    Ok(())
}

/// Delete a session by id
pub fn delete(ctx: &CliContext, id: &str) -> Result<()> {
    let mut store = ctx.open_store();
    store.delete_session(id)?;
    println!("Deleted session {}", id);
    finish(store);
    Ok(())
}
