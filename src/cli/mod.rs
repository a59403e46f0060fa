use chrono::NaiveDate;
use clap::{Parser, Subcommand};

use crate::tui;

/// Terminal calendar and log browser for work-log tracking servers
#[derive(Parser)]
#[command(name = "timegrid")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Base URL of the work-log server
    #[arg(short, long, default_value = "http://localhost:8000")]
    server: String,

    /// Start the calendar at the week containing this date (YYYY-MM-DD)
    #[arg(short, long)]
    week: Option<NaiveDate>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Launch interactive TUI (default)
    Tui,
}

impl Cli {
    pub fn run(self) -> anyhow::Result<()> {
        match self.command {
            None | Some(Commands::Tui) => tui::run(&self.server, self.week),
        }
    }
}
