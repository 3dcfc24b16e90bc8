//! Commits and pushes the updated dashboard page with git.

use std::{
    env,
    ffi::OsString,
    path::{Path, PathBuf},
    process::Command,
};

use chrono::Local;
use log::{info, warn};

/// Overrides the git executable, mainly for tests.
pub const GIT_ENV: &str = "NOTES_DASHBOARD_GIT";

#[derive(Debug, thiserror::Error)]
pub enum PushError {
    #[error("failed to spawn `{command}`: {error}")]
    Spawn {
        command: String,
        error: std::io::Error,
    },
    #[error("`{command}` exited with status {status}: {output}")]
    Failed {
        command: String,
        status: std::process::ExitStatus,
        output: String,
    },
}

pub fn default_commit_message() -> String {
    format!(
        "Update dashboard data {}",
        Local::now().format("%Y-%m-%d %H:%M")
    )
}

/// `git add`, `git commit`, `git push` for `document`, relative to its folder.
pub fn git_commands(document: &Path, message: &str) -> Vec<Vec<OsString>> {
    let file_name = document
        .file_name()
        .map(OsString::from)
        .unwrap_or_else(|| document.as_os_str().to_os_string());
    vec![
        vec!["add".into(), file_name],
        vec!["commit".into(), "-m".into(), message.into()],
        vec!["push".into()],
    ]
}

fn working_dir(document: &Path) -> PathBuf {
    match document.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

fn git_program() -> OsString {
    match env::var_os(GIT_ENV) {
        Some(path) if !path.is_empty() => path,
        _ => OsString::from("git"),
    }
}

pub fn push_document(document: &Path, message: &str) -> Result<(), PushError> {
    let dir = working_dir(document);
    let program = git_program();
    for args in git_commands(document, message) {
        let command = std::iter::once(program.to_string_lossy().into_owned())
            .chain(args.iter().map(|arg| arg.to_string_lossy().into_owned()))
            .collect::<Vec<_>>()
            .join(" ");
        info!("Running {command}");
        let output = Command::new(&program)
            .args(&args)
            .current_dir(&dir)
            .output()
            .map_err(|error| PushError::Spawn {
                command: command.clone(),
                error,
            })?;
        if output.status.success() {
            continue;
        }
        let combined = format!(
            "{}{}",
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr)
        );
        if combined.contains("nothing to commit") {
            info!("Nothing to commit; continuing");
            continue;
        }
        warn!("{command} failed: {}", combined.trim());
        return Err(PushError::Failed {
            command,
            status: output.status,
            output: combined.trim().to_string(),
        });
    }
    info!("Pushed {:?}", document);
    Ok(())
}
