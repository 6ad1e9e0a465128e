//! Read-only narrative content keyed by period.
//!
//! The dashboard never authors this text; it is supplied through the
//! `[[periods]]` tables of the configuration file and handed to the views as-is.

use crate::utils::error::{EtlError, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    pub heading: String,
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelineEntry {
    pub date: String,
    pub heading: String,
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Testimony {
    /// Who is speaking and under what circumstances.
    pub context: String,
    pub quotes: Vec<String>,
    pub source: String,
    pub url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodContent {
    pub key: String,
    pub title: String,
    pub map_file: String,
    #[serde(default)]
    pub description: Vec<Section>,
    #[serde(default)]
    pub timeline: Vec<TimelineEntry>,
    #[serde(default)]
    pub testimonies: Vec<Testimony>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContentRepository {
    periods: Vec<PeriodContent>,
}

impl ContentRepository {
    pub fn new(periods: Vec<PeriodContent>) -> Self {
        Self { periods }
    }

    pub fn get(&self, key: &str) -> Result<&PeriodContent> {
        self.periods
            .iter()
            .find(|p| p.key == key)
            .ok_or_else(|| EtlError::UnknownPeriod {
                period: key.to_string(),
            })
    }

    pub fn contains(&self, key: &str) -> bool {
        self.periods.iter().any(|p| p.key == key)
    }

    /// Period keys in selector order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.periods.iter().map(|p| p.key.as_str())
    }

    /// The period selected when nothing else is asked for.
    pub fn default_period(&self) -> Option<&str> {
        self.periods.first().map(|p| p.key.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &PeriodContent> {
        self.periods.iter()
    }

    pub fn len(&self) -> usize {
        self.periods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.periods.is_empty()
    }
}
