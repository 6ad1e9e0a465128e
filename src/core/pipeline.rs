use crate::core::dashboard::{load_maps, Dashboard};
use crate::core::loader::load_records;
use crate::core::{ConfigProvider, ExtractResult, Pipeline, Storage, TransformResult};
use crate::domain::model::PeriodView;
use crate::utils::error::{EtlError, Result};
use serde::Serialize;

pub const INDEX_FILE: &str = "dashboard.json";

/// File-name friendly form of a period key: `"1991–1992"` → `"1991_1992"`.
pub fn period_slug(period: &str) -> String {
    period
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect()
}

#[derive(Debug, Serialize)]
struct DashboardIndex<'a> {
    title: &'a str,
    generated_at: String,
    default_period: Option<&'a str>,
    periods: Vec<IndexEntry<'a>>,
}

#[derive(Debug, Serialize)]
struct IndexEntry<'a> {
    period: &'a str,
    title: &'a str,
    file: String,
    destinations: usize,
    total_displaced: u64,
    map_available: bool,
}

pub struct DashboardPipeline<S: Storage, C: ConfigProvider> {
    input: S,
    output: S,
    config: C,
}

impl<S: Storage, C: ConfigProvider> DashboardPipeline<S, C> {
    /// `input` resolves the data table and map documents, `output` receives the bundles.
    pub fn new(input: S, output: S, config: C) -> Self {
        Self {
            input,
            output,
            config,
        }
    }

    pub fn config(&self) -> &C {
        &self.config
    }

    /// Selected periods, falling back to every configured period in order.
    fn periods(&self) -> Vec<String> {
        let selected = self.config.selected_periods();
        if selected.is_empty() {
            self.config.content().keys().map(str::to_string).collect()
        } else {
            selected.to_vec()
        }
    }

    fn wants(&self, format: &str) -> bool {
        self.config.output_formats().iter().any(|f| f == format)
    }

    fn destinations_csv(view: &PeriodView) -> Result<Vec<u8>> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.write_record(["label", "total", "origins", "color"])?;
        for slice in &view.chart.slices {
            writer.write_record([
                slice.label.as_str(),
                &slice.value.to_string(),
                &slice.origins.join(", "),
                slice.color.as_str(),
            ])?;
        }
        writer.into_inner().map_err(|e| EtlError::ProcessingError {
            message: format!("Failed to flush CSV output: {}", e),
        })
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> Pipeline for DashboardPipeline<S, C> {
    async fn extract(&self) -> Result<ExtractResult> {
        tracing::debug!("Reading displacement table from {}", self.config.data_path());
        let data = self.input.read_file(self.config.data_path()).await?;
        let records = load_records(&data)?;

        let maps = load_maps(&self.input, self.config.content()).await;
        let unavailable = maps.values().filter(|m| !m.is_available()).count();
        if unavailable > 0 {
            tracing::warn!("{} map document(s) unavailable", unavailable);
        }

        Ok(ExtractResult { records, maps })
    }

    async fn transform(&self, data: ExtractResult) -> Result<TransformResult> {
        let dashboard = Dashboard::new(
            &data.records,
            &data.maps,
            self.config.content(),
            self.config.splits(),
            self.config.colors(),
        );

        let views = self
            .periods()
            .iter()
            .map(|period| dashboard.select(period))
            .collect::<Result<Vec<_>>>()?;

        Ok(TransformResult { views })
    }

    async fn load(&self, result: TransformResult) -> Result<String> {
        let mut entries = Vec::with_capacity(result.views.len());

        for view in &result.views {
            let slug = period_slug(&view.period);

            if self.wants("json") {
                let file = format!("{}.json", slug);
                let json = serde_json::to_vec_pretty(view)?;
                tracing::debug!("Writing {} ({} bytes)", file, json.len());
                self.output.write_file(&file, &json).await?;
            }

            if self.wants("csv") {
                let file = format!("{}_destinations.csv", slug);
                let csv_data = Self::destinations_csv(view)?;
                tracing::debug!("Writing {} ({} bytes)", file, csv_data.len());
                self.output.write_file(&file, &csv_data).await?;
            }

            entries.push(IndexEntry {
                period: &view.period,
                title: &view.title,
                file: format!("{}.json", slug),
                destinations: view.chart.slices.len(),
                total_displaced: view.chart.total(),
                map_available: view.map.is_available(),
            });
        }

        if self.wants("json") {
            let index = DashboardIndex {
                title: self.config.dashboard_title(),
                generated_at: chrono::Utc::now().to_rfc3339(),
                default_period: self.config.content().default_period(),
                periods: entries,
            };
            let json = serde_json::to_vec_pretty(&index)?;
            self.output.write_file(INDEX_FILE, &json).await?;
        }

        Ok(self.config.output_path().to_string())
    }
}
