// Library root
// -----------
// This crate exposes a small library surface for the CLI. The binary
// (`main.rs`) uses these modules to implement both the subcommands and the
// interactive menu.
//
// Module responsibilities:
// - `config`: resolves the token, repository, branch and API URL from the
//   environment.
// - `api`: encapsulates HTTP interactions with the GitHub contents API
//   (repository lookup, contents get/create/update).
// - `upload`: the create-or-update flow for one local file.
// - `elo`: the club ladder - players, match resolution, standings and
//   pairing proposals.
// - `ui`: implements the terminal menu flows and delegates to the modules
//   above.
//
// Keeping this separation makes it easier to test the upload and rating
// logic without a terminal attached.
pub mod api;
pub mod config;
pub mod elo;
pub mod ui;
pub mod upload;
