// Upload flow: make the remote repository hold the same bytes as one local
// file. The path given on the command line is used verbatim as the path
// inside the repository, so `results/standings.csv` lands at
// `results/standings.csv` on the configured branch.

use anyhow::{Context, Result};

use crate::api::{ContentLookup, GithubClient};
use crate::config::Config;

/// What the lookup told us to do. Kept separate from the HTTP calls so the
/// decision itself is easy to test.
#[derive(Debug, PartialEq, Eq)]
pub enum Action {
    /// Nothing at the path: create a fresh file.
    Create,
    /// A file is there: replace it, quoting its current sha.
    Update { sha: String },
    /// The path is a directory; writing would clobber a whole tree, so the
    /// uploader leaves it alone.
    SkipDirectory,
}

impl Action {
    pub fn from_lookup(lookup: &ContentLookup) -> Action {
        match lookup {
            ContentLookup::File(f) => Action::Update { sha: f.sha.clone() },
            ContentLookup::Directory(_) => Action::SkipDirectory,
            ContentLookup::Missing => Action::Create,
        }
    }
}

/// Upload `file_path` to the configured repository with `message` as the
/// commit message. Creates the file if it is absent, updates it if present,
/// and does nothing if the path turns out to be a directory.
pub fn upload(
    client: &GithubClient,
    config: &Config,
    file_path: &str,
    message: &str,
) -> Result<()> {
    let repo = client
        .get_repo(&config.repo)
        .with_context(|| format!("cannot reach repository {}", config.repo))?;

    let content = std::fs::read(file_path)
        .with_context(|| format!("failed to read local file {}", file_path))?;

    let lookup = client.get_contents(&config.repo, file_path, &config.branch)?;

    match Action::from_lookup(&lookup) {
        Action::Create => {
            let resp = client.create_file(
                &config.repo,
                file_path,
                message,
                &content,
                &config.branch,
            )?;
            println!(
                "Created {} in {} (commit {})",
                file_path,
                repo.full_name,
                short_sha(&resp.commit.sha)
            );
        }
        Action::Update { sha } => {
            let resp = client.update_file(
                &config.repo,
                file_path,
                message,
                &content,
                &sha,
                &config.branch,
            )?;
            println!(
                "Updated {} in {} (commit {})",
                file_path,
                repo.full_name,
                short_sha(&resp.commit.sha)
            );
        }
        Action::SkipDirectory => {}
    }

    Ok(())
}

fn short_sha(sha: &str) -> &str {
    if sha.len() >= 8 {
        &sha[..8]
    } else {
        sha
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{DirEntry, RemoteFile};

    fn remote_file(sha: &str) -> RemoteFile {
        RemoteFile {
            name: "data.csv".into(),
            path: "data.csv".into(),
            sha: sha.into(),
            size: 8,
        }
    }

    #[test]
    fn missing_path_plans_a_create() {
        assert_eq!(Action::from_lookup(&ContentLookup::Missing), Action::Create);
    }

    #[test]
    fn existing_file_plans_an_update_with_its_sha() {
        let lookup = ContentLookup::File(remote_file("abc123"));
        assert_eq!(
            Action::from_lookup(&lookup),
            Action::Update {
                sha: "abc123".into()
            }
        );
    }

    #[test]
    fn directory_plans_a_no_op() {
        let lookup = ContentLookup::Directory(vec![DirEntry {
            name: "week1.json".into(),
            path: "results/week1.json".into(),
            entry_type: "file".into(),
        }]);
        assert_eq!(Action::from_lookup(&lookup), Action::SkipDirectory);
    }

    // The second of two back-to-back uploads sees the file the first one
    // wrote, so it must plan an update, never a second create.
    #[test]
    fn second_upload_of_same_path_updates() {
        let first = Action::from_lookup(&ContentLookup::Missing);
        assert_eq!(first, Action::Create);
        let second = Action::from_lookup(&ContentLookup::File(remote_file("fresh")));
        assert!(matches!(second, Action::Update { .. }));
    }

    #[test]
    fn short_sha_truncates_long_hashes_only() {
        assert_eq!(short_sha("0123456789abcdef"), "01234567");
        assert_eq!(short_sha("0123"), "0123");
    }
}
