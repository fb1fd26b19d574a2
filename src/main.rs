use anyhow::Result;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod cli;

#[derive(Parser)]
#[command(name = "studyquest")]
#[command(about = "Gamified study planner - XP, levels, streaks and medals for your study sessions")]
#[command(version)]
struct Cli {
    /// Path to the state document (defaults to ~/.studyquest/state.json)
    #[arg(short, long, global = true)]
    state: Option<PathBuf>,

    /// Path to the config file (defaults to ~/.studyquest/config.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show level, streaks, medals and the current cycle
    Status {
        /// Print the raw state document as JSON
        #[arg(long)]
        json: bool,
    },

    /// Run the daily login check
    Login,

    /// Log and manage study sessions
    Session {
        #[command(subcommand)]
        command: SessionCommands,
    },

    /// Manage the current study cycle
    Cycle {
        #[command(subcommand)]
        command: CycleCommands,
    },

    /// Set or clear the target exam
    Exam {
        #[command(subcommand)]
        command: ExamCommands,
    },

    /// Drive the simulated clock
    Sim {
        #[command(subcommand)]
        command: SimCommands,
    },

    /// Keep running: login check on every day change, clock commands from stdin
    Watch,

    /// Wipe all progress
    Reset {
        /// Confirm the reset
        #[arg(long)]
        yes: bool,
    },

    /// Write a default ~/.studyquest/config.toml
    Init {
        /// Overwrite existing config file
        #[arg(long)]
        force: bool,
    },
}

#[derive(Subcommand)]
enum SessionCommands {
    /// Log a study session
    Add {
        /// Subject studied
        subject: String,
        /// Duration in minutes
        #[arg(allow_hyphen_values = true)]
        minutes: i64,
        /// Session type (theory, practice, review, exercises, other)
        #[arg(long = "type", short = 't', default_value = "theory")]
        session_type: String,
        /// Free-form notes
        #[arg(long, short = 'n')]
        notes: Option<String>,
        /// Date (YYYY-MM-DD), defaults to today
        #[arg(long, short = 'd')]
        date: Option<NaiveDate>,
    },
    /// List logged sessions, newest first
    List {
        /// Limit number of results
        #[arg(long, short = 'n')]
        limit: Option<usize>,
        /// Print JSON instead of human output
        #[arg(long)]
        json: bool,
    },
    /// Delete a session (XP already granted is kept)
    Delete { id: String },
}

#[derive(Subcommand)]
enum CycleCommands {
    /// Start a cycle from a JSON file produced by the scheduler
    Start { file: PathBuf },
    /// Show the current cycle and its blocks
    Show,
    /// Mark a block as done
    Complete { block: String },
    /// Undo a block completion
    Undo { block: String },
    /// Finish the cycle and collect the bonus
    Finish,
}

#[derive(Subcommand)]
enum ExamCommands {
    /// Set the target exam
    Set { name: String },
    /// Clear the target exam
    Clear,
}

#[derive(Subcommand)]
enum SimCommands {
    /// Advance one day, continuing the streak
    Advance,
    /// Go back one day
    Back,
    /// Skip two days without logging in
    Skip,
    /// Leave simulation and return to the real date
    Reset,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .init();

    let command = cli.command.unwrap_or(Commands::Status { json: false });

    // init must work without a valid config
    if let Commands::Init { force } = command {
        return cli::init::init_command(cli.config.as_deref(), force);
    }

    let ctx = cli::CliContext::load(cli.config.as_deref(), cli.state)?;

    match command {
        Commands::Status { json } => cli::status::status_command(&ctx, json)?,
        Commands::Login => cli::login::login_command(&ctx)?,
        Commands::Session { command } => match command {
            SessionCommands::Add {
                subject,
                minutes,
                session_type,
                notes,
                date,
            } => cli::session::add(&ctx, subject, minutes, &session_type, notes, date)?,
            SessionCommands::List { limit, json } => cli::session::list(&ctx, limit, json)?,
            SessionCommands::Delete { id } => cli::session::delete(&ctx, &id)?,
        },
        Commands::Cycle { command } => match command {
            CycleCommands::Start { file } => cli::cycle::start(&ctx, &file)?,
            CycleCommands::Show => cli::cycle::show(&ctx)?,
            CycleCommands::Complete { block } => cli::cycle::complete_block(&ctx, &block)?,
            CycleCommands::Undo { block } => cli::cycle::uncomplete_block(&ctx, &block)?,
            CycleCommands::Finish => cli::cycle::finish_cycle(&ctx)?,
        },
        Commands::Exam { command } => match command {
            ExamCommands::Set { name } => cli::exam::exam_command(&ctx, Some(name))?,
            ExamCommands::Clear => cli::exam::exam_command(&ctx, None)?,
        },
        Commands::Sim { command } => {
            let sim = match command {
                SimCommands::Advance => studyquest::simulation::SimCommand::AdvanceDay,
                SimCommands::Back => studyquest::simulation::SimCommand::GoBackDay,
                SimCommands::Skip => studyquest::simulation::SimCommand::AdvanceTwoDaysSkip,
                SimCommands::Reset => studyquest::simulation::SimCommand::ResetSimulation,
            };
            cli::sim::sim_command(&ctx, sim)?;
        }
        Commands::Watch => cli::watch::watch_command(&ctx).await?,
        Commands::Reset { yes } => cli::reset::reset_command(&ctx, yes)?,
        Commands::Init { .. } => {}
    }

    Ok(())
}
