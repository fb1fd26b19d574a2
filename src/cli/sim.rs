//! Simulation command implementation

use anyhow::Result;

use studyquest::simulation::{self, SimCommand};

use super::{finish, print_events, CliContext};

/// Queue one clock command and fold it into the state
pub fn sim_command(ctx: &CliContext, command: SimCommand) -> Result<()> {
    let mut store = ctx.open_store();
    let (clock, receiver) = simulation::channel(ctx.config.simulation.channel_capacity);
    store.attach_clock(receiver);

    clock.send(command)?;
    let events = store.pump_simulation();

    let state = store.state();
    if state.simulation_data.is_simulating {
        println!(
            "Simulated date: {} (login streak {}, shields {})",
            store.today(),
            state.user_progress.login_streak,
            state.user_progress.streak_protection_shields
        );
    } else {
        println!("Simulation off, back to {}", store.today());
    }
    print_events(&events);
    finish(store);
    Ok(())
}
