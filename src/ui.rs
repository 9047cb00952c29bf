// UI layer: provides a simple interactive menu using `dialoguer`.
// The functions are small and synchronous to make the flow easy to follow.
// Seeded ratings live for the length of the menu session, so the usual
// club-night order works naturally: seed the event files, check the
// standings, plan pairings, upload the results file.

use crate::api::GithubClient;
use crate::config::Config;
use crate::elo::{load_availability, pairing, Tournament};
use crate::upload;
use anyhow::Result;
use dialoguer::{Confirm, Input, Select};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;

/// Main interactive menu: a simple select loop until the user chooses
/// "Exit".
///
/// Note: `Select::interact()` is keyboard-driven: you can use arrow keys
/// and Enter to choose an option.
pub fn main_menu() -> Result<()> {
    let mut tournament = Tournament::new();
    loop {
        let items = vec![
            "Seed event files",
            "Show standings",
            "Plan next pairings",
            "Upload results file",
            "Exit",
        ];
        let selection = Select::new().items(&items).default(0).interact()?;
        match selection {
            0 => handle_seed(&mut tournament)?,
            1 => handle_standings(&tournament)?,
            2 => handle_pairings(&mut tournament)?,
            3 => handle_upload()?,
            4 => break,
            _ => {}
        }
    }
    Ok(())
}

/// Prompt for event files and feed them into the session's tournament.
/// A bad file is reported and skipped so one typo does not cost the
/// files already seeded.
fn handle_seed(tournament: &mut Tournament) -> Result<()> {
    let input: String = Input::new()
        .with_prompt("Event files, oldest first (space separated)")
        .interact_text()?;
    for path in input.split_whitespace() {
        match tournament.seed_from_json_file(Path::new(path)) {
            Ok(()) => println!("Seeded {}", path),
            Err(e) => println!("Skipping {}: {:#}", path, e),
        }
    }
    println!(
        "{} players, {} matches across {} events",
        tournament.players.len(),
        tournament.matches.len(),
        tournament.events_seeded
    );
    Ok(())
}

fn handle_standings(tournament: &Tournament) -> Result<()> {
    let filter = if Confirm::new()
        .with_prompt("Filter to a sign-up sheet?")
        .default(false)
        .interact()?
    {
        let path: String = Input::new().with_prompt("Sign-up file").interact_text()?;
        match load_availability(Path::new(&path)) {
            Ok(file) => Some(file),
            Err(e) => {
                println!("Ignoring sign-up sheet: {:#}", e);
                None
            }
        }
    } else {
        None
    };
    print!("{}", tournament.standings(filter.as_ref()));
    Ok(())
}

fn handle_pairings(tournament: &mut Tournament) -> Result<()> {
    let path: String = Input::new().with_prompt("Sign-up file").interact_text()?;
    match pairing::plan_from_available(tournament, Path::new(&path)) {
        Ok(houses) => print!("{}", pairing::render_houses(&houses)),
        Err(e) => println!("Pairing failed: {:#}", e),
    }
    Ok(())
}

/// Upload flow: collect a path and commit message, then push the file to
/// the configured repository with a spinner while the requests run.
fn handle_upload() -> Result<()> {
    let config = match Config::from_env() {
        Ok(c) => c,
        Err(e) => {
            println!("{:#}", e);
            return Ok(());
        }
    };
    let client = GithubClient::new(&config)?;

    let file: String = Input::new().with_prompt("Results file path").interact_text()?;
    let message: String = Input::new().with_prompt("Commit message").interact_text()?;

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::with_template("{spinner} {msg}").unwrap());
    spinner.set_message(format!("Uploading to {}...", config.repo));

    let result = upload::upload(&client, &config, &file, &message);
    spinner.finish_and_clear();

    match result {
        Ok(()) => {}
        Err(e) => println!("Upload failed: {:#}", e),
    }
    Ok(())
}
