//! Period selection: assembles the panels shown for one period.

use crate::core::aggregate::aggregate;
use crate::core::chart::build_chart;
use crate::domain::content::ContentRepository;
use crate::domain::model::{DisplacementRecord, MapPanel, PeriodView};
use crate::domain::ports::Storage;
use crate::domain::tables::{ColorTable, SplitTable};
use crate::utils::error::Result;
use std::collections::HashMap;

/// Read one map document. A missing or non-UTF-8 file becomes a placeholder panel.
pub async fn load_map_panel<S: Storage>(storage: &S, path: &str) -> MapPanel {
    match storage.read_file(path).await {
        Ok(bytes) => match String::from_utf8(bytes) {
            Ok(html) => MapPanel::Document {
                path: path.to_string(),
                html,
            },
            Err(e) => {
                tracing::warn!("Map document {} is not valid UTF-8: {}", path, e);
                MapPanel::Unavailable {
                    path: path.to_string(),
                    reason: format!("not valid UTF-8: {}", e),
                }
            }
        },
        Err(e) => {
            tracing::warn!("Map document {} could not be read: {}", path, e);
            MapPanel::Unavailable {
                path: path.to_string(),
                reason: e.to_string(),
            }
        }
    }
}

/// Load every configured period's map document once.
pub async fn load_maps<S: Storage>(
    storage: &S,
    content: &ContentRepository,
) -> HashMap<String, MapPanel> {
    let mut maps = HashMap::new();
    for period in content.iter() {
        let panel = load_map_panel(storage, &period.map_file).await;
        maps.insert(period.key.clone(), panel);
    }
    maps
}

pub struct Dashboard<'a> {
    records: &'a [DisplacementRecord],
    maps: &'a HashMap<String, MapPanel>,
    content: &'a ContentRepository,
    splits: &'a SplitTable,
    colors: &'a ColorTable,
}

impl<'a> Dashboard<'a> {
    pub fn new(
        records: &'a [DisplacementRecord],
        maps: &'a HashMap<String, MapPanel>,
        content: &'a ContentRepository,
        splits: &'a SplitTable,
        colors: &'a ColorTable,
    ) -> Self {
        Self {
            records,
            maps,
            content,
            splits,
            colors,
        }
    }

    pub fn records_for<'b>(
        &'b self,
        period: &'b str,
    ) -> impl Iterator<Item = &'a DisplacementRecord> + 'b {
        self.records.iter().filter(move |r| r.period == period)
    }

    /// Build every panel for `period`. Unknown periods are an error; an empty
    /// record subset yields an empty chart.
    pub fn select(&self, period: &str) -> Result<PeriodView> {
        let content = self.content.get(period)?;

        let aggregates = aggregate(self.records_for(period), self.splits)?;
        let chart = build_chart(&aggregates, period, self.colors);
        if chart.is_empty() {
            tracing::warn!("No displacement records for period {}", period);
        }

        let map = self
            .maps
            .get(period)
            .cloned()
            .unwrap_or_else(|| MapPanel::Unavailable {
                path: content.map_file.clone(),
                reason: "map document was not loaded".to_string(),
            });

        tracing::debug!(
            "Selected period {}: {} destinations, map available: {}",
            period,
            chart.slices.len(),
            map.is_available()
        );

        Ok(PeriodView {
            period: content.key.clone(),
            title: content.title.clone(),
            map,
            description: content.description.clone(),
            chart,
            timeline: content.timeline.clone(),
            testimonies: content.testimonies.clone(),
        })
    }
}
