// Entrypoint for the CLI application.
// - With a subcommand, runs it directly (scriptable, e.g. from cron after
//   league night).
// - With no subcommand, hands control to the interactive menu.
// - Returns `anyhow::Result` so errors print with their full context chain.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use ladder_cli::api::GithubClient;
use ladder_cli::config::Config;
use ladder_cli::elo::{load_availability, pairing, Tournament};
use ladder_cli::{ui, upload};

#[derive(Parser, Debug)]
#[command(name = "ladder", version, about = "Club ladder ratings and results upload")]
struct Args {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Upload or update one file in the results repository
    Upload {
        /// Local file; the same path is used inside the repository
        file: String,

        /// Commit message for the write
        #[arg(short, long)]
        message: String,

        /// Destination repository (owner/name), overriding the environment
        #[arg(long)]
        repo: Option<String>,

        /// Destination branch, overriding the environment
        #[arg(short, long)]
        branch: Option<String>,
    },
    /// Seed event files and print the standings table
    Standings {
        /// Event JSON files, oldest first
        #[arg(value_name = "EVENT_FILE", required = true)]
        events: Vec<PathBuf>,

        /// Restrict the table to the players on a sign-up sheet
        #[arg(long, value_name = "FILE")]
        available: Option<PathBuf>,
    },
    /// Propose next pairings from a sign-up sheet
    Pairings {
        /// Sign-up sheet JSON file
        available: PathBuf,

        /// Event JSON files used to seed ratings first, oldest first
        #[arg(long = "event", value_name = "FILE")]
        events: Vec<PathBuf>,
    },
}

fn main() -> Result<()> {
    let args = Args::parse();

    match args.command {
        Some(Commands::Upload {
            file,
            message,
            repo,
            branch,
        }) => {
            let mut config = Config::from_env()?;
            if let Some(repo) = repo {
                config.repo = repo;
            }
            if let Some(branch) = branch {
                config.branch = branch;
            }
            let client = GithubClient::new(&config)?;
            upload::upload(&client, &config, &file, &message)
        }
        Some(Commands::Standings { events, available }) => {
            let mut tournament = Tournament::new();
            for path in &events {
                tournament.seed_from_json_file(path)?;
            }
            let filter = match &available {
                Some(path) => Some(load_availability(path)?),
                None => None,
            };
            print!("{}", tournament.standings(filter.as_ref()));
            println!(
                "\nSeeded {} matches across {} events",
                tournament.matches.len(),
                tournament.events_seeded
            );
            Ok(())
        }
        Some(Commands::Pairings { available, events }) => {
            let mut tournament = Tournament::new();
            for path in &events {
                tournament.seed_from_json_file(path)?;
            }
            let houses = pairing::plan_from_available(&mut tournament, &available)?;
            print!("{}", pairing::render_houses(&houses));
            Ok(())
        }
        None => ui::main_menu(),
    }
}
