//! Title keyword frequency for the best-performing notes.
//!
//! Titles are mostly Chinese, so there is no whitespace to split words on.
//! Besides the whitespace tokens (which catch Latin words and whole CJK runs),
//! every 2- and 3-character window over the concatenated CJK text is counted
//! as a candidate. The counts are advisory, meant for skimming.

use anyhow::{Context, Result};
use indexmap::{IndexMap, IndexSet};
use itertools::Itertools;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::{normalize::Record, schema::Metric};

pub const DEFAULT_SELECTION_SIZE: usize = 20;
pub const DEFAULT_OUTPUT_SIZE: usize = 30;

const EMOJI_PATTERN: &str =
    r"[\x{1F600}-\x{1F64F}\x{1F300}-\x{1F5FF}\x{1F680}-\x{1F6FF}\x{1F1E0}-\x{1F1FF}]";
const NON_WORD_PATTERN: &str = r"[^\w\s\x{4E00}-\x{9FFF}]";
const CJK_RUN_PATTERN: &str = r"[\x{4E00}-\x{9FFF}]+";

pub type KeywordCount = (String, usize);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeywordConfig {
    /// How many top notes contribute their titles.
    pub selection_size: usize,
    /// How many keywords are returned.
    pub output_size: usize,
    pub stopwords: IndexSet<String>,
}

impl Default for KeywordConfig {
    fn default() -> Self {
        Self {
            selection_size: DEFAULT_SELECTION_SIZE,
            output_size: DEFAULT_OUTPUT_SIZE,
            stopwords: default_stopwords(),
        }
    }
}

pub fn default_stopwords() -> IndexSet<String> {
    [
        "的", "了", "是", "在", "我", "有", "和", "就", "不", "人", "都", "一", "个", "上", "这",
        "为", "吗", "你", "到", "说", "要", "会", "来", "对", "可以", "什么", "没有", "怎么",
        "那么", "这个", "一个",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

#[derive(Debug, Clone)]
pub struct KeywordAnalyzer {
    config: KeywordConfig,
    emoji: Regex,
    non_word: Regex,
    cjk_run: Regex,
}

impl KeywordAnalyzer {
    pub fn new(config: KeywordConfig) -> Result<Self> {
        Ok(Self {
            config,
            emoji: Regex::new(EMOJI_PATTERN).context("Compiling emoji pattern")?,
            non_word: Regex::new(NON_WORD_PATTERN).context("Compiling separator pattern")?,
            cjk_run: Regex::new(CJK_RUN_PATTERN).context("Compiling CJK pattern")?,
        })
    }

    pub fn config(&self) -> &KeywordConfig {
        &self.config
    }

    /// Ranked keywords from the titles of the top `selection_size` records by
    /// `metric`.
    pub fn analyze(&self, records: &[Record], metric: Metric) -> Vec<KeywordCount> {
        let mut ranked = records.iter().collect::<Vec<_>>();
        ranked.sort_by(|a, b| b.metric(metric).cmp(&a.metric(metric)));
        let text = ranked
            .iter()
            .take(self.config.selection_size)
            .map(|record| record.title.as_str())
            .join(" ");
        let candidates = self.candidates(&text);
        count_keywords(candidates, &self.config.stopwords, self.config.output_size)
    }

    /// Candidate words in emission order: whitespace tokens first, then CJK
    /// bigrams, then CJK trigrams.
    pub fn candidates(&self, text: &str) -> Vec<String> {
        let stripped = self.emoji.replace_all(text, "");
        let cleaned = self.non_word.replace_all(&stripped, " ");

        let mut words = cleaned
            .split_whitespace()
            .map(str::to_lowercase)
            .filter(|word| word.chars().count() >= 2)
            .collect::<Vec<_>>();

        let cjk = self
            .cjk_run
            .find_iter(&cleaned)
            .flat_map(|run| run.as_str().chars())
            .collect::<Vec<_>>();
        for width in [2, 3] {
            words.extend(cjk.windows(width).map(|window| window.iter().collect::<String>()));
        }
        words
    }
}

/// Counts candidates that are neither stopwords nor shorter than two
/// characters. Ties keep first-occurrence order.
pub fn count_keywords<I>(candidates: I, stopwords: &IndexSet<String>, top: usize) -> Vec<KeywordCount>
where
    I: IntoIterator<Item = String>,
{
    let mut counts: IndexMap<String, usize> = IndexMap::new();
    for word in candidates {
        if word.chars().count() < 2 || stopwords.contains(&word) {
            continue;
        }
        *counts.entry(word).or_insert(0) += 1;
    }
    let mut items = counts.into_iter().collect::<Vec<_>>();
    items.sort_by(|a, b| b.1.cmp(&a.1));
    items.truncate(top);
    items
}
