//! Finds the newest exported table in a download folder.

use std::{
    cmp::Reverse,
    fs,
    path::{Path, PathBuf},
    time::SystemTime,
};

use glob::Pattern;
use log::{debug, info, warn};

use crate::loader::LoadError;

/// Tries `patterns` in order; the first pattern that matches any file decides
/// the candidate set and broader patterns after it are ignored. Office lock
/// files (`~$name.xlsx`) never count. Returns the most recently modified
/// candidate.
pub fn locate_latest(dir: &Path, patterns: &[String]) -> Result<PathBuf, LoadError> {
    let escaped_dir = Pattern::escape(&dir.to_string_lossy());
    for pattern in patterns {
        let full = Path::new(&escaped_dir).join(pattern);
        let matches = match glob::glob(&full.to_string_lossy()) {
            Ok(paths) => paths
                .filter_map(Result::ok)
                .filter(|path| path.is_file() && !is_lock_file(path))
                .collect::<Vec<_>>(),
            Err(err) => {
                warn!("Skipping invalid input pattern '{pattern}': {err}");
                continue;
            }
        };
        if matches.is_empty() {
            debug!("No file matches '{pattern}' in {dir:?}");
            continue;
        }
        info!("Found {} file(s) matching '{pattern}'", matches.len());
        if let Some(latest) = matches
            .into_iter()
            .min_by_key(|path| Reverse(modified_at(path)))
        {
            info!("Selected input {latest:?}");
            return Ok(latest);
        }
    }
    Err(LoadError::NoFileFound {
        dir: dir.to_path_buf(),
        patterns: patterns.to_vec(),
    })
}

fn is_lock_file(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| name.starts_with('~'))
}

fn modified_at(path: &Path) -> SystemTime {
    fs::metadata(path)
        .and_then(|meta| meta.modified())
        .unwrap_or(SystemTime::UNIX_EPOCH)
}
