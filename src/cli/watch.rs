//! Watch command implementation
//!
//! Runs the login check whenever the effective date changes and reads clock
//! commands from stdin (`n` next day, `b` back, `s` skip two days, `r` reset).

use std::io::BufRead;

use anyhow::Result;

use studyquest::error::ClockError;
use studyquest::simulation::{self, SimCommand, SimulationClock};

use super::{finish, print_events, CliContext};

fn parse_clock_command(line: &str) -> Option<SimCommand> {
    match line.trim() {
        "n" | "next" | "advance" => Some(SimCommand::AdvanceDay),
        "b" | "back" => Some(SimCommand::GoBackDay),
        "s" | "skip" => Some(SimCommand::AdvanceTwoDaysSkip),
        "r" | "reset" => Some(SimCommand::ResetSimulation),
        _ => None,
    }
}

/// Forward stdin lines to the clock until stdin closes
fn read_clock_commands(clock: SimulationClock) {
    for line in std::io::stdin().lock().lines() {
        let Ok(line) = line else {
            break;
        };
        if line.trim().is_empty() {
            continue;
        }
        let Some(command) = parse_clock_command(&line) else {
            eprintln!("Unknown command '{}' (n, b, s, r)", line.trim());
            continue;
        };
        match clock.send(command) {
            Ok(()) => {}
            Err(ClockError::QueueFull) => eprintln!("Clock queue full, command dropped"),
            Err(ClockError::Disconnected) => break,
        }
    }
}

pub async fn watch_command(ctx: &CliContext) -> Result<()> {
    let mut store = ctx.open_store();
    let (clock, receiver) = simulation::channel(ctx.config.simulation.channel_capacity);
    store.attach_clock(receiver);
    // Blocking stdin reader; it dies with the process
    std::thread::spawn(move || read_clock_commands(clock));

    println!("Watching {} (Ctrl-C to stop)", ctx.state_path.display());
    let mut last_day = store.today();

    let mut interval = tokio::time::interval(ctx.config.poll_interval());
    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            _ = interval.tick() => {
                let events = store.pump_simulation();
                print_events(&events);

                let today = store.today();
                if today != last_day {
                    tracing::debug!("Day changed: {} -> {}", last_day, today);
                    last_day = today;
                    print_events(&store.check_login());
                }

                if let Some(advisory) = store.take_storage_advisory() {
                    eprintln!("Warning: progress could not be saved: {}", advisory);
                }
            }
            result = &mut shutdown => {
                if let Err(e) = result {
                    tracing::warn!("Failed to listen for Ctrl-C: {}", e);
                }
                break;
            }
        }
    }

    finish(store);
    println!("Progress saved.");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_clock_command() {
        assert_eq!(parse_clock_command(" n "), Some(SimCommand::AdvanceDay));
        assert_eq!(parse_clock_command("back"), Some(SimCommand::GoBackDay));
        assert_eq!(parse_clock_command("s"), Some(SimCommand::AdvanceTwoDaysSkip));
        assert_eq!(parse_clock_command("reset"), Some(SimCommand::ResetSimulation));
        assert_eq!(parse_clock_command("tomorrow"), None);
    }
}
