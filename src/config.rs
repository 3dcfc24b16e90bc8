//! Pipeline configuration and its YAML persistence.
//!
//! Everything the pipeline treats as fixed data (header candidates,
//! stopwords, keyword sizes, the video marker, input file patterns) lives in
//! [`PipelineConfig`]. The built-in defaults describe the Xiaohongshu creator
//! center export; a YAML file can override any section and omitted sections
//! keep their defaults.

use std::{
    fs::File,
    io::Read,
    path::Path,
};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::{keywords::KeywordConfig, schema::CandidateTable};

pub const DEFAULT_VIDEO_MARKER: &str = "视频";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub columns: CandidateTable,
    pub keywords: KeywordConfig,
    /// Substring of the type column that marks a video note.
    pub video_marker: String,
    /// Glob patterns tried in order when locating the newest export.
    pub input_patterns: Vec<String>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            columns: CandidateTable::default(),
            keywords: KeywordConfig::default(),
            video_marker: DEFAULT_VIDEO_MARKER.to_string(),
            input_patterns: default_input_patterns(),
        }
    }
}

pub fn default_input_patterns() -> Vec<String> {
    [
        "*数据*分析*.xlsx",
        "*小红书*.xlsx",
        "*笔记*数据*.xlsx",
        "*内容*数据*.xlsx",
        "*.xlsx",
        "*.csv",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

impl PipelineConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let mut file = File::open(path).with_context(|| format!("Opening config file {path:?}"))?;
        let mut raw = String::new();
        file.read_to_string(&mut raw)
            .with_context(|| format!("Reading config file {path:?}"))?;
        Self::from_yaml_str(&raw).with_context(|| format!("Parsing config file {path:?}"))
    }

    /// Loads `path` when given, otherwise falls back to the built-in defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    pub fn from_yaml_str(raw: &str) -> Result<Self> {
        if raw.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(raw)?)
    }

    pub fn to_yaml_string(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }
}
