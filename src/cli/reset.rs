//! Reset command implementation

use anyhow::{bail, Result};

use super::{finish, CliContext};

/// Wipe all progress after explicit confirmation
pub fn reset_command(ctx: &CliContext, yes: bool) -> Result<()> {
    if !yes {
        bail!("This erases all progress. Re-run with --yes to confirm.");
    }

    let mut store = ctx.open_store();
    store.reset();
    println!("All progress reset ({})", ctx.state_path.display());
    finish(store);
    Ok(())
}
