use crate::core::Pipeline;
use crate::utils::error::Result;
use std::time::Instant;

pub struct EtlEngine<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> EtlEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    pub fn pipeline(&self) -> &P {
        &self.pipeline
    }

    pub async fn run(&self) -> Result<String> {
        let started = Instant::now();
        tracing::info!("Starting dashboard build");

        // Extract
        let phase = Instant::now();
        let extracted = self.pipeline.extract().await?;
        tracing::info!(
            "Extracted {} records and {} map documents in {:?}",
            extracted.records.len(),
            extracted.maps.len(),
            phase.elapsed()
        );

        // Transform
        let phase = Instant::now();
        let transformed = self.pipeline.transform(extracted).await?;
        for view in &transformed.views {
            tracing::info!(
                "Period {}: {} destinations, {} displaced",
                view.period,
                view.chart.slices.len(),
                view.chart.total()
            );
        }
        tracing::info!(
            "Transformed {} periods in {:?}",
            transformed.views.len(),
            phase.elapsed()
        );

        // Load
        let phase = Instant::now();
        let output_path = self.pipeline.load(transformed).await?;
        tracing::info!("Output saved to {} in {:?}", output_path, phase.elapsed());

        tracing::info!("Dashboard build finished in {:?}", started.elapsed());
        Ok(output_path)
    }
}
