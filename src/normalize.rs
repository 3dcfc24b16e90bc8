//! Row normalization into canonical [`Record`]s.
//!
//! Every field goes through a coercion that returns a [`Coerced`] value: the
//! typed result plus a flag telling whether a default had to be substituted.
//! Only a missing or blank title rejects a row; every other problem degrades
//! to a default for that one field.

use serde::{Deserialize, Serialize};

use crate::{
    data::{RawValue, parse_calendar_date},
    rows::RawRow,
    schema::{CanonicalField, ColumnMap, Metric},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NoteType {
    #[serde(rename = "video")]
    Video,
    #[serde(rename = "image-text")]
    ImageText,
}

impl NoteType {
    pub fn as_str(&self) -> &'static str {
        match self {
            NoteType::Video => "video",
            NoteType::ImageText => "image-text",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub month: Option<String>,
    #[serde(rename = "type")]
    pub note_type: NoteType,
    pub impressions: i64,
    pub views: i64,
    pub ctr: f64,
    pub likes: i64,
    pub comments: i64,
    pub collects: i64,
    pub followers: i64,
    pub shares: i64,
    pub avg_view_time: i64,
}

impl Record {
    pub fn metric(&self, metric: Metric) -> i64 {
        match metric {
            Metric::Impressions => self.impressions,
            Metric::Views => self.views,
            Metric::Likes => self.likes,
            Metric::Comments => self.comments,
            Metric::Collects => self.collects,
            Metric::Followers => self.followers,
            Metric::Shares => self.shares,
            Metric::AvgViewTime => self.avg_view_time,
        }
    }
}

/// A coerced field value and whether it came from a default.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coerced<T> {
    pub value: T,
    pub defaulted: bool,
}

impl<T> Coerced<T> {
    pub fn parsed(value: T) -> Self {
        Self {
            value,
            defaulted: false,
        }
    }

    pub fn fallback(value: T) -> Self {
        Self {
            value,
            defaulted: true,
        }
    }

    fn take(self, defaults: &mut usize) -> T {
        if self.defaulted {
            *defaults += 1;
        }
        self.value
    }
}

pub fn coerce_title(value: &RawValue) -> Option<String> {
    let title = value.as_display().trim().to_string();
    (!title.is_empty()).then_some(title)
}

/// `None` for an empty cell; otherwise a `YYYY-MM-DD` string, or the first ten
/// characters of the raw text when no date could be parsed from it.
pub fn coerce_date(value: &RawValue) -> Coerced<Option<String>> {
    if value.is_empty() {
        return Coerced::parsed(None);
    }
    if let Some(date) = value.as_date() {
        return Coerced::parsed(Some(date.format("%Y-%m-%d").to_string()));
    }
    let raw = value.as_display();
    match parse_calendar_date(&raw) {
        Ok(date) => Coerced::parsed(Some(date.format("%Y-%m-%d").to_string())),
        Err(_) => Coerced::fallback(Some(raw.chars().take(10).collect())),
    }
}

pub fn month_of(date: &str) -> String {
    date.chars().take(7).collect()
}

pub fn coerce_type(value: Option<&RawValue>, video_marker: &str) -> Coerced<NoteType> {
    match value {
        None => Coerced::fallback(NoteType::ImageText),
        Some(value) => {
            let text = value.as_display();
            if !video_marker.is_empty() && text.trim().contains(video_marker) {
                Coerced::parsed(NoteType::Video)
            } else {
                Coerced::parsed(NoteType::ImageText)
            }
        }
    }
}

fn parse_finite(text: &str) -> Option<f64> {
    text.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Integer metric: thousands separators and percent signs are dropped, the
/// number is truncated toward zero. Negative values pass through.
pub fn coerce_count(value: &RawValue) -> Coerced<i64> {
    let parsed = match value {
        RawValue::Number(f) => Some(*f).filter(|v| v.is_finite()),
        RawValue::Text(s) => parse_finite(&s.replace([',', '%'], "")),
        _ => None,
    };
    match parsed {
        Some(v) => Coerced::parsed(v.trunc() as i64),
        None => Coerced::fallback(0),
    }
}

/// Click-through rate from a source cell. `15%` and `15` both mean 0.15; a
/// bare number above 1 is read as a whole percentage.
pub fn coerce_ctr(value: &RawValue) -> Coerced<f64> {
    let parsed = match value {
        RawValue::Text(s) if s.contains('%') => parse_finite(&s.replace('%', "")).map(|v| v / 100.0),
        RawValue::Text(s) => parse_finite(s).map(scale_whole_percent),
        RawValue::Number(f) => Some(*f).filter(|v| v.is_finite()).map(scale_whole_percent),
        _ => None,
    };
    match parsed {
        Some(v) => Coerced::parsed(v),
        None => Coerced::fallback(0.0),
    }
}

fn scale_whole_percent(value: f64) -> f64 {
    if value > 1.0 { value / 100.0 } else { value }
}

/// `views / impressions` to three decimals, or 0 without impressions.
pub fn derive_ctr(views: i64, impressions: i64) -> f64 {
    if impressions > 0 {
        round_to(views as f64 / impressions as f64, 3)
    } else {
        0.0
    }
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round_ties_even() / factor
}

#[derive(Debug, Clone, Copy)]
pub struct Normalizer<'a> {
    columns: &'a ColumnMap,
    video_marker: &'a str,
}

impl<'a> Normalizer<'a> {
    pub fn new(columns: &'a ColumnMap, video_marker: &'a str) -> Self {
        Self {
            columns,
            video_marker,
        }
    }

    pub fn normalize(&self, row: RawRow<'_>) -> Option<Record> {
        self.normalize_counted(row).map(|(record, _)| record)
    }

    /// Normalizes one row and reports how many fields fell back to defaults.
    pub fn normalize_counted(&self, row: RawRow<'_>) -> Option<(Record, usize)> {
        let cell = |field: CanonicalField| row.resolved(self.columns.get(field));
        let title = coerce_title(cell(CanonicalField::Title)?)?;

        let mut defaults = 0usize;
        let date = cell(CanonicalField::Date)
            .and_then(|value| coerce_date(value).take(&mut defaults));
        let month = date.as_deref().map(month_of);
        let note_type = coerce_type(cell(CanonicalField::Type), self.video_marker).take(&mut defaults);

        let mut count = |metric: Metric| match cell(metric.field()) {
            Some(value) => coerce_count(value).take(&mut defaults),
            None => Coerced::fallback(0).take(&mut defaults),
        };
        let impressions = count(Metric::Impressions);
        let views = count(Metric::Views);
        let likes = count(Metric::Likes);
        let comments = count(Metric::Comments);
        let collects = count(Metric::Collects);
        let followers = count(Metric::Followers);
        let shares = count(Metric::Shares);
        let avg_view_time = count(Metric::AvgViewTime);

        let ctr = match cell(CanonicalField::Ctr) {
            Some(value) if value.is_empty() => Coerced::fallback(0.0).take(&mut defaults),
            Some(value) => coerce_ctr(value).take(&mut defaults),
            None => derive_ctr(views, impressions),
        };

        Some((
            Record {
                title,
                date,
                month,
                note_type,
                impressions,
                views,
                ctr,
                likes,
                comments,
                collects,
                followers,
                shares,
                avg_view_time,
            },
            defaults,
        ))
    }
}
