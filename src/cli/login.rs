//! Login command implementation

use anyhow::Result;

use super::{finish, CliContext};

/// Show the login streak after the startup check for the effective date
pub fn login_command(ctx: &CliContext) -> Result<()> {
    let store = ctx.open_store();
    let progress = &store.state().user_progress;

    println!(
        "Logged in for {} (login streak {}, shields {})",
        store.today(),
        progress.login_streak,
        progress.streak_protection_shields
    );
    finish(store);
    Ok(())
}
