//! Canonical fields and header resolution.
//!
//! Exported spreadsheets name their columns however the exporting platform
//! felt like that month. This module owns the fixed set of [`CanonicalField`]s
//! a record carries, the [`CandidateTable`] of header names each field may
//! appear under, and [`resolve_columns`], which turns the headers actually
//! present into a [`ColumnMap`].
//!
//! ## Matching
//!
//! Each field walks its candidates in priority order. For one candidate the
//! [`MatchTier`]s are tried in order (exact, case-insensitive, substring); the
//! first tier that finds a header resolves the field and later candidates are
//! never consulted.

use std::{fmt, str::FromStr};

use anyhow::{Result, anyhow};
use clap::ValueEnum;
use indexmap::IndexMap;
use log::debug;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CanonicalField {
    Title,
    Date,
    Type,
    Impressions,
    Views,
    Ctr,
    Likes,
    Comments,
    Collects,
    Followers,
    Shares,
    AvgViewTime,
}

impl CanonicalField {
    pub const ALL: [CanonicalField; 12] = [
        CanonicalField::Title,
        CanonicalField::Date,
        CanonicalField::Type,
        CanonicalField::Impressions,
        CanonicalField::Views,
        CanonicalField::Ctr,
        CanonicalField::Likes,
        CanonicalField::Comments,
        CanonicalField::Collects,
        CanonicalField::Followers,
        CanonicalField::Shares,
        CanonicalField::AvgViewTime,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CanonicalField::Title => "title",
            CanonicalField::Date => "date",
            CanonicalField::Type => "type",
            CanonicalField::Impressions => "impressions",
            CanonicalField::Views => "views",
            CanonicalField::Ctr => "ctr",
            CanonicalField::Likes => "likes",
            CanonicalField::Comments => "comments",
            CanonicalField::Collects => "collects",
            CanonicalField::Followers => "followers",
            CanonicalField::Shares => "shares",
            CanonicalField::AvgViewTime => "avgViewTime",
        }
    }
}

impl fmt::Display for CanonicalField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CanonicalField {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self> {
        CanonicalField::ALL
            .into_iter()
            .find(|field| field.as_str().eq_ignore_ascii_case(value.trim()))
            .ok_or_else(|| anyhow!("Unknown canonical field '{value}'"))
    }
}

/// The integer metrics a record carries; also the valid keyword ranking keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[value(rename_all = "camelCase")]
pub enum Metric {
    Impressions,
    Views,
    Likes,
    Comments,
    Collects,
    Followers,
    Shares,
    AvgViewTime,
}

impl Metric {
    pub fn field(&self) -> CanonicalField {
        match self {
            Metric::Impressions => CanonicalField::Impressions,
            Metric::Views => CanonicalField::Views,
            Metric::Likes => CanonicalField::Likes,
            Metric::Comments => CanonicalField::Comments,
            Metric::Collects => CanonicalField::Collects,
            Metric::Followers => CanonicalField::Followers,
            Metric::Shares => CanonicalField::Shares,
            Metric::AvgViewTime => CanonicalField::AvgViewTime,
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.field().as_str())
    }
}

/// Priority-ordered header names per canonical field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CandidateTable {
    entries: IndexMap<CanonicalField, Vec<String>>,
}

impl CandidateTable {
    pub fn new() -> Self {
        Self {
            entries: IndexMap::new(),
        }
    }

    pub fn with_field<I, S>(mut self, field: CanonicalField, candidates: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.entries
            .insert(field, candidates.into_iter().map(Into::into).collect());
        self
    }

    pub fn candidates(&self, field: CanonicalField) -> &[String] {
        self.entries.get(&field).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn iter(&self) -> impl Iterator<Item = (CanonicalField, &[String])> {
        self.entries
            .iter()
            .map(|(field, names)| (*field, names.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for CandidateTable {
    fn default() -> Self {
        CandidateTable::new()
            .with_field(
                CanonicalField::Title,
                ["笔记标题", "标题", "title", "内容标题"],
            )
            .with_field(
                CanonicalField::Date,
                ["发布时间", "发布日期", "date", "时间", "创建时间"],
            )
            .with_field(CanonicalField::Type, ["笔记类型", "类型", "type", "内容类型"])
            .with_field(
                CanonicalField::Impressions,
                ["曝光量", "曝光", "impressions", "展现量", "展现"],
            )
            .with_field(
                CanonicalField::Views,
                ["阅读量", "观看量", "views", "播放量", "点击量"],
            )
            .with_field(CanonicalField::Ctr, ["点击率", "ctr", "点击转化率"])
            .with_field(CanonicalField::Likes, ["点赞数", "点赞", "likes", "赞"])
            .with_field(CanonicalField::Comments, ["评论数", "评论", "comments"])
            .with_field(
                CanonicalField::Collects,
                ["收藏数", "收藏", "collects", "收藏量"],
            )
            .with_field(
                CanonicalField::Followers,
                ["涨粉数", "涨粉", "followers", "新增粉丝", "粉丝增长"],
            )
            .with_field(CanonicalField::Shares, ["分享数", "分享", "shares", "分享量"])
            .with_field(
                CanonicalField::AvgViewTime,
                ["平均阅读时长", "平均观看时长", "avgViewTime", "平均时长"],
            )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MatchTier {
    Exact,
    CaseInsensitive,
    Substring,
}

impl MatchTier {
    pub const ORDER: [MatchTier; 3] = [
        MatchTier::Exact,
        MatchTier::CaseInsensitive,
        MatchTier::Substring,
    ];

    pub fn matches(&self, candidate: &str, label: &str) -> bool {
        match self {
            MatchTier::Exact => candidate == label,
            MatchTier::CaseInsensitive => candidate.to_lowercase() == label.trim().to_lowercase(),
            MatchTier::Substring => {
                let candidate = candidate.to_lowercase();
                let label = label.to_lowercase();
                let trimmed = label.trim();
                label.contains(&candidate) || (!trimmed.is_empty() && candidate.contains(trimmed))
            }
        }
    }

    /// Position of the first label this tier accepts for `candidate`.
    pub fn find(&self, candidate: &str, labels: &[String]) -> Option<usize> {
        labels
            .iter()
            .position(|label| self.matches(candidate, label))
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MatchTier::Exact => "exact",
            MatchTier::CaseInsensitive => "case-insensitive",
            MatchTier::Substring => "substring",
        }
    }
}

impl fmt::Display for MatchTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedColumn {
    pub label: String,
    pub index: usize,
    pub candidate: String,
    pub tier: MatchTier,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnMap {
    columns: IndexMap<CanonicalField, ResolvedColumn>,
}

impl ColumnMap {
    pub fn get(&self, field: CanonicalField) -> Option<&ResolvedColumn> {
        self.columns.get(&field)
    }

    pub fn label(&self, field: CanonicalField) -> Option<&str> {
        self.get(field).map(|column| column.label.as_str())
    }

    pub fn contains(&self, field: CanonicalField) -> bool {
        self.columns.contains_key(&field)
    }

    pub fn iter(&self) -> impl Iterator<Item = (CanonicalField, &ResolvedColumn)> {
        self.columns.iter().map(|(field, column)| (*field, column))
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

/// First header accepted for `field`, walking candidates then tiers.
pub fn resolve_field(candidates: &[String], labels: &[String]) -> Option<ResolvedColumn> {
    for candidate in candidates {
        if candidate.trim().is_empty() {
            continue;
        }
        for tier in MatchTier::ORDER {
            if let Some(index) = tier.find(candidate, labels) {
                return Some(ResolvedColumn {
                    label: labels[index].clone(),
                    index,
                    candidate: candidate.clone(),
                    tier,
                });
            }
        }
    }
    None
}

pub fn resolve_columns(labels: &[String], table: &CandidateTable) -> ColumnMap {
    let mut columns = IndexMap::new();
    for (field, candidates) in table.iter() {
        match resolve_field(candidates, labels) {
            Some(resolved) => {
                debug!(
                    "Resolved '{}' -> '{}' ({} match on '{}')",
                    field, resolved.label, resolved.tier, resolved.candidate
                );
                columns.insert(field, resolved);
            }
            None => debug!("No column found for '{field}'"),
        }
    }
    ColumnMap { columns }
}
