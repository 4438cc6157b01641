mod commands;
mod config;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::process;

use crate::commands::{
    cmd_activity_correct, cmd_activity_log, cmd_correct, cmd_goal_set, cmd_goal_show, cmd_history,
    cmd_log, cmd_maintain, cmd_today, cmd_weight_history, cmd_weight_log, cmd_weight_show,
};
use crate::config::Config;
use tally_core::service::Tracker;

#[derive(Parser)]
#[command(
    name = "tally",
    version,
    about = "A simple calorie and weight tracker CLI",
    long_about = "\n\n  ████████╗ █████╗ ██╗     ██╗  ██╗   ██╗
  ╚══██╔══╝██╔══██╗██║     ██║  ╚██╗ ██╔╝
     ██║   ███████║██║     ██║   ╚████╔╝
     ██║   ██╔══██║██║     ██║    ╚██╔╝
     ██║   ██║  ██║███████╗███████╗██║
     ╚═╝   ╚═╝  ╚═╝╚══════╝╚══════╝╚═╝
        every calorie counted.
"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Log calories eaten (adds to today's running total)
    Log {
        /// Calories to add (negative to back out a mistake)
        calories: f64,
        /// Date to log for (YYYY-MM-DD or today/yesterday, default: today)
        #[arg(long)]
        date: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Replace a day's calorie total outright
    Correct {
        /// New total for the day
        calories: f64,
        /// Date to correct (YYYY-MM-DD or today/yesterday, default: today)
        #[arg(long)]
        date: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show today's totals
    Today {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show per-day totals, newest first
    History {
        /// Limit to the last N days with records
        #[arg(short, long)]
        days: Option<usize>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Manage the daily calorie goal
    Goal {
        #[command(subcommand)]
        command: GoalCommands,
    },
    /// Track calories burned through activity
    Activity {
        #[command(subcommand)]
        command: ActivityCommands,
    },
    /// Track body weight
    Weight {
        #[command(subcommand)]
        command: WeightCommands,
    },
    /// Compact past days and backfill goal snapshots
    Maintain {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
enum GoalCommands {
    /// Set the daily calorie goal (and optional hard maximum)
    Set {
        /// Daily calorie goal
        calories: f64,
        /// Hard daily maximum (must be at least the goal)
        #[arg(long)]
        max: Option<f64>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show the current goal
    Show {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
enum ActivityCommands {
    /// Log calories burned (adds to the day's running total)
    Log {
        /// Calories burned
        calories: f64,
        /// Date to log for (YYYY-MM-DD or today/yesterday, default: today)
        #[arg(long)]
        date: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Replace a day's burned total outright
    Correct {
        /// New burned total for the day
        calories: f64,
        /// Date to correct (YYYY-MM-DD or today/yesterday, default: today)
        #[arg(long)]
        date: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
enum WeightCommands {
    /// Log a weight measurement (same-day logs overwrite)
    Log {
        /// Weight value (number)
        value: f64,
        /// Unit: kg or lbs (default: kg)
        #[arg(short, long, default_value = "kg")]
        unit: String,
        /// Date (YYYY-MM-DD or today/yesterday, default: today)
        #[arg(long)]
        date: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show weight for a specific date (default: today)
    Show {
        /// Date (YYYY-MM-DD or today/yesterday, default: today)
        date: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show weight history
    History {
        /// Number of entries to show (default: all)
        #[arg(short, long)]
        days: Option<usize>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = Config::load()?;
    let tracker = Tracker::open(&config.db_path)?;

    match cli.command {
        Commands::Log {
            calories,
            date,
            json,
        } => cmd_log(&tracker, calories, date, json),
        Commands::Correct {
            calories,
            date,
            json,
        } => cmd_correct(&tracker, calories, date, json),
        Commands::Today { json } => cmd_today(&tracker, json),
        Commands::History { days, json } => cmd_history(&tracker, days, json),
        Commands::Goal { command } => match command {
            GoalCommands::Set {
                calories,
                max,
                json,
            } => cmd_goal_set(&tracker, calories, max, json),
            GoalCommands::Show { json } => cmd_goal_show(&tracker, json),
        },
        Commands::Activity { command } => match command {
            ActivityCommands::Log {
                calories,
                date,
                json,
            } => cmd_activity_log(&tracker, calories, date, json),
            ActivityCommands::Correct {
                calories,
                date,
                json,
            } => cmd_activity_correct(&tracker, calories, date, json),
        },
        Commands::Weight { command } => match command {
            WeightCommands::Log {
                value,
                unit,
                date,
                json,
            } => cmd_weight_log(&tracker, value, &unit, date, json),
            WeightCommands::Show { date, json } => cmd_weight_show(&tracker, date, json),
            WeightCommands::History { days, json } => cmd_weight_history(&tracker, days, json),
        },
        Commands::Maintain { json } => cmd_maintain(&tracker, json),
    }
}
