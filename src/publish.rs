//! Embeds the assembled dataset into the dashboard page.
//!
//! The page declares its data as `const rawData = {...};`. The first such
//! assignment is replaced verbatim with freshly serialized JSON; nothing else
//! in the document is touched.

use std::{fs, path::Path};

use log::info;
use regex::{NoExpand, Regex};

use crate::dataset::Dataset;

const DATA_BLOCK_PATTERN: &str = r"const rawData = \{[\s\S]*?\};";

#[derive(Debug, thiserror::Error)]
pub enum PublishError {
    #[error("document {path:?} has no `const rawData = {{...}};` block")]
    MarkerNotFound { path: String },
    #[error("failed to serialize dataset: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("failed to access document ({path}): {error}")]
    Io { error: std::io::Error, path: String },
    #[error("invalid data block pattern: {0}")]
    Pattern(#[from] regex::Error),
}

/// Pretty JSON with two-space indentation and unescaped non-ASCII text.
pub fn render_dataset_json(dataset: &Dataset) -> Result<String, PublishError> {
    Ok(serde_json::to_string_pretty(dataset)?)
}

/// Replaces the first data block in `document`, or `None` when it has none.
pub fn replace_data_block(document: &str, json: &str) -> Result<Option<String>, PublishError> {
    let pattern = Regex::new(DATA_BLOCK_PATTERN)?;
    if !pattern.is_match(document) {
        return Ok(None);
    }
    let replacement = format!("const rawData = {json};");
    Ok(Some(
        pattern
            .replacen(document, 1, NoExpand(&replacement))
            .into_owned(),
    ))
}

pub fn publish_to_file(path: &Path, dataset: &Dataset) -> Result<(), PublishError> {
    let display = path.display().to_string();
    let document = fs::read_to_string(path).map_err(|error| PublishError::Io {
        error,
        path: display.clone(),
    })?;
    let json = render_dataset_json(dataset)?;
    let updated = replace_data_block(&document, &json)?
        .ok_or_else(|| PublishError::MarkerNotFound {
            path: display.clone(),
        })?;
    fs::write(path, updated).map_err(|error| PublishError::Io {
        error,
        path: display.clone(),
    })?;
    info!(
        "Embedded {} note(s) into {}",
        dataset.records.len(),
        display
    );
    Ok(())
}
