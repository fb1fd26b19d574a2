//! Study cycle CLI commands.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::Utc;

use studyquest::domain::Cycle;

use super::{finish, print_events, CliContext};

/// Start a cycle from a scheduler-produced JSON file
pub fn start(ctx: &CliContext, file: &Path) -> Result<()> {
    let content = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read cycle file: {}", file.display()))?;
    let mut cycle: Cycle = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse cycle file: {}", file.display()))?;
    if cycle.created_at == 0 {
        cycle.created_at = Utc::now().timestamp_millis();
    }

    let mut store = ctx.open_store();
    let exam = cycle.exam_name.clone();
    let blocks = cycle.block_count();
    let events = store.start_cycle(cycle);

    println!("Started cycle for {} with {} blocks", exam, blocks);
    print_events(&events);
    finish(store);
    Ok(())
}

/// Show the current cycle and its blocks
pub fn show(ctx: &CliContext) -> Result<()> {
    let store = ctx.open_store();
    let state = store.state();

    let Some(cycle) = &state.current_cycle else {
        println!("No active cycle.");
        return Ok(());
    };

    println!(
        "{} - {:.1} h/week, {}/{} blocks done",
        cycle.exam_name,
        cycle.weekly_hour_target,
        state.completed_blocks.len(),
        cycle.block_count()
    );
    for block in &cycle.blocks {
        let mark = if state.is_block_completed(&block.id) {
            "x"
        } else {
            " "
        };
        println!(
            "  [{}] {:<12} {:<24} {:>4} min",
            mark, block.id, block.subject, block.duration_minutes
        );
    }

    Ok(())
}

/// Mark a block as done
pub fn complete_block(ctx: &CliContext, block_id: &str) -> Result<()> {
    let mut store = ctx.open_store();
    store.complete_block(block_id)?;
    println!("Completed block {}", block_id);
    finish(store);
    Ok(())
}

/// Undo a block completion
pub fn uncomplete_block(ctx: &CliContext, block_id: &str) -> Result<()> {
    let mut store = ctx.open_store();
    store.uncomplete_block(block_id)?;
    println!("Reopened block {}", block_id);
    finish(store);
    Ok(())
}

/// Finish the current cycle
pub fn finish_cycle(ctx: &CliContext) -> Result<()> {
    let mut store = ctx.open_store();
    let events = store.complete_cycle()?;
    print_events(&events);
    finish(store);
    Ok(())
}
