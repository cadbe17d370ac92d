mod app;
mod commands;
mod render;
#[cfg(feature = "tui")]
mod tui;

use std::io::IsTerminal;
use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "memocards-cli", about = "MemoCards flashcard review CLI and TUI", version)]
struct Cli {
    /// Directory holding cards.json and config.toml
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Output format
    #[arg(long, global = true, default_value = "plain")]
    format: OutputFormat,

    /// Disable ANSI colors
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Clone, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Plain,
    Json,
}

#[derive(Subcommand)]
enum Command {
    /// Review cards against the clock
    #[cfg(feature = "tui")]
    Play,

    /// Add a card on top of the stack
    Add {
        /// Text shown first
        prompt: String,
        /// Text revealed on demand
        answer: String,
    },

    /// Remove cards by id (a unique prefix is enough)
    Rm {
        #[arg(required = true)]
        ids: Vec<String>,
    },

    /// List all cards in stack order
    List {
        /// Only cards still in the current round
        #[arg(long)]
        active: bool,
    },

    /// Put every card back into the round
    Reset,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let use_color = !cli.no_color && std::io::stdout().is_terminal();
    let data_dir = cli.data_dir.as_deref();

    match cli.command {
        None => {
            // No subcommand → launch TUI
            #[cfg(feature = "tui")]
            {
                tui::run(data_dir)?;
            }
            #[cfg(not(feature = "tui"))]
            {
                eprintln!("TUI not available (built without 'tui' feature). Use a subcommand.");
                eprintln!("Run with --help for usage.");
                std::process::exit(1);
            }
        }
        #[cfg(feature = "tui")]
        Some(Command::Play) => {
            tui::run(data_dir)?;
        }
        Some(Command::Add { prompt, answer }) => {
            let mut app = app::App::new(data_dir)?;
            commands::add::run(&mut app, &prompt, &answer, &cli.format, use_color)?;
        }
        Some(Command::Rm { ids }) => {
            let mut app = app::App::new(data_dir)?;
            commands::rm::run(&mut app, &ids, &cli.format, use_color)?;
        }
        Some(Command::List { active }) => {
            let app = app::App::new(data_dir)?;
            commands::list::run(&app, active, &cli.format, use_color)?;
        }
        Some(Command::Reset) => {
            let mut app = app::App::new(data_dir)?;
            commands::reset::run(&mut app, &cli.format)?;
        }
    }

    Ok(())
}
