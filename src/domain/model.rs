use crate::domain::content::{Section, Testimony, TimelineEntry};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Raw `Number_Displaced` value before normalization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CountValue {
    Number(u64),
    Text(String),
}

impl From<u64> for CountValue {
    fn from(value: u64) -> Self {
        CountValue::Number(value)
    }
}

impl From<&str> for CountValue {
    fn from(value: &str) -> Self {
        CountValue::Text(value.to_string())
    }
}

/// One origin → destination flow within a period, with its count already normalized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplacementRecord {
    pub period: String,
    pub origin_country: String,
    pub destination_country: String,
    pub number_displaced: u64,
}

impl DisplacementRecord {
    pub fn new(
        period: impl Into<String>,
        origin_country: impl Into<String>,
        destination_country: impl Into<String>,
        number_displaced: u64,
    ) -> Self {
        Self {
            period: period.into(),
            origin_country: origin_country.into(),
            destination_country: destination_country.into(),
            number_displaced,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DestinationAggregate {
    pub label: String,
    pub total: u64,
    /// Contributing origins, de-duplicated, in first-seen order.
    pub origins: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSlice {
    pub label: String,
    pub value: u64,
    pub origins: Vec<String>,
    pub hover: String,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegendSpec {
    pub orientation: String,
    pub x: f64,
    pub y: f64,
}

impl Default for LegendSpec {
    fn default() -> Self {
        Self {
            orientation: "v".to_string(),
            x: 1.02,
            y: 1.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SliceOutline {
    pub color: String,
    pub width: f64,
}

impl Default for SliceOutline {
    fn default() -> Self {
        Self {
            color: "#000000".to_string(),
            width: 0.5,
        }
    }
}

/// Renderer-agnostic description of a pie/donut chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSpec {
    pub title: String,
    pub slices: Vec<ChartSlice>,
    pub text_info: String,
    pub hole: f64,
    pub legend: LegendSpec,
    pub outline: SliceOutline,
}

impl ChartSpec {
    pub fn is_empty(&self) -> bool {
        self.slices.is_empty()
    }

    pub fn total(&self) -> u64 {
        self.slices.iter().fold(0u64, |acc, s| acc.saturating_add(s.value))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum MapPanel {
    Document { path: String, html: String },
    Unavailable { path: String, reason: String },
}

impl MapPanel {
    pub fn is_available(&self) -> bool {
        matches!(self, MapPanel::Document { .. })
    }
}

/// Everything the dashboard shows for one selected period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodView {
    pub period: String,
    pub title: String,
    pub map: MapPanel,
    pub description: Vec<Section>,
    pub chart: ChartSpec,
    pub timeline: Vec<TimelineEntry>,
    pub testimonies: Vec<Testimony>,
}

#[derive(Debug, Clone)]
pub struct ExtractResult {
    pub records: Vec<DisplacementRecord>,
    /// Map panels keyed by period.
    pub maps: HashMap<String, MapPanel>,
}

#[derive(Debug, Clone)]
pub struct TransformResult {
    pub views: Vec<PeriodView>,
}
