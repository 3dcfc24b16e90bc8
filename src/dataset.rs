//! Dataset assembly: resolve, normalize, aggregate.

use anyhow::Result;
use itertools::Itertools;
use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::{
    config::PipelineConfig,
    keywords::{KeywordAnalyzer, KeywordCount},
    normalize::{Normalizer, Record},
    rows::RawTable,
    schema::{ColumnMap, Metric, resolve_columns},
};

/// The document handed to the publisher. Field names are part of the
/// dashboard's contract.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    #[serde(rename = "notes")]
    pub records: Vec<Record>,
    pub months: Vec<String>,
    #[serde(rename = "highLikesKeywords")]
    pub top_keywords_by_likes: Vec<KeywordCount>,
    #[serde(rename = "highFollowersKeywords")]
    pub top_keywords_by_followers: Vec<KeywordCount>,
}

#[derive(Debug, Clone)]
pub struct Pipeline {
    config: PipelineConfig,
    analyzer: KeywordAnalyzer,
}

impl Pipeline {
    pub fn new(config: PipelineConfig) -> Result<Self> {
        let analyzer = KeywordAnalyzer::new(config.keywords.clone())?;
        Ok(Self { config, analyzer })
    }

    pub fn analyzer(&self) -> &KeywordAnalyzer {
        &self.analyzer
    }

    pub fn resolve(&self, table: &RawTable) -> ColumnMap {
        let columns = resolve_columns(table.headers(), &self.config.columns);
        info!(
            "Resolved {} of {} field(s): {}",
            columns.len(),
            self.config.columns.len(),
            columns
                .iter()
                .map(|(field, column)| format!("{field}={}", column.label))
                .join(", ")
        );
        columns
    }

    pub fn normalize(&self, table: &RawTable, columns: &ColumnMap) -> Vec<Record> {
        let normalizer = Normalizer::new(columns, &self.config.video_marker);
        let mut records = Vec::with_capacity(table.row_count());
        let mut dropped = 0usize;
        let mut defaulted = 0usize;
        for row in table.rows() {
            match normalizer.normalize_counted(row) {
                Some((record, defaults)) => {
                    defaulted += defaults;
                    records.push(record);
                }
                None => dropped += 1,
            }
        }
        debug!("{defaulted} field value(s) fell back to defaults");
        info!(
            "Normalized {} record(s), dropped {} row(s) without a title",
            records.len(),
            dropped
        );
        records
    }

    pub fn assemble(&self, table: &RawTable) -> Dataset {
        let columns = self.resolve(table);
        let records = self.normalize(table, &columns);
        let months = collect_months(&records);
        match (months.first(), months.last()) {
            (Some(first), Some(last)) => info!("Months covered: {first} to {last}"),
            _ => info!("Months covered: none"),
        }
        let top_keywords_by_likes = self.analyzer.analyze(&records, Metric::Likes);
        let top_keywords_by_followers = self.analyzer.analyze(&records, Metric::Followers);
        Dataset {
            records,
            months,
            top_keywords_by_likes,
            top_keywords_by_followers,
        }
    }
}

/// Distinct non-empty months, ascending.
pub fn collect_months(records: &[Record]) -> Vec<String> {
    records
        .iter()
        .filter_map(|record| record.month.as_deref())
        .filter(|month| !month.is_empty())
        .unique()
        .sorted()
        .map(String::from)
        .collect()
}
