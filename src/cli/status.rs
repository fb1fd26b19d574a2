//! Status command implementation

use anyhow::Result;

use super::CliContext;

/// Show progress, streaks, medals and the current cycle
pub fn status_command(ctx: &CliContext, json: bool) -> Result<()> {
    let store = ctx.open_store();
    let state = store.state();

    if json {
        println!("{}", serde_json::to_string_pretty(state)?);
        return Ok(());
    }

    let progress = &state.user_progress;
    println!("Level {} - {}", progress.level, progress.rank);
    println!(
        "  XP:      {}/{} ({:.0}%), {} total",
        progress.current_xp,
        progress.xp_to_next_level,
        progress.progress_to_next() * 100.0,
        progress.total_xp
    );
    println!("  Coins:   {}", progress.coins);
    println!(
        "  Streaks: login {}, cycle {}, shields {}",
        progress.login_streak, progress.cycle_streak, progress.streak_protection_shields
    );

    let medals: Vec<_> = store
        .rules()
        .medals
        .iter()
        .filter(|m| m.requirement <= progress.level)
        .map(|m| m.title.as_str())
        .collect();
    if medals.is_empty() {
        println!("  Medals:  none yet");
    } else {
        println!("  Medals:  {} ({})", progress.total_medals, medals.join(", "));
    }

    if let Some(exam) = &state.target_exam {
        println!("  Target:  {}", exam);
    }

    let summary = state.study_summary();
    println!(
        "\nStudied {} min across {} sessions",
        summary.total_minutes, summary.session_count
    );
    for (subject, minutes) in &summary.minutes_by_subject {
        println!("  {:<24} {:>6} min", subject, minutes);
    }

    match &state.current_cycle {
        Some(cycle) => println!(
            "\nCycle: {} ({}/{} blocks done)",
            cycle.exam_name,
            state.completed_blocks.len(),
            cycle.block_count()
        ),
        None => println!("\nNo active cycle."),
    }

    let sim = &state.simulation_data;
    if sim.is_simulating {
        if let Some(date) = sim.simulated_date {
            println!("\nSimulating: today is {} (streak {})", date, sim.simulated_streak);
        }
    }

    Ok(())
}
