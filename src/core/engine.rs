use crate::domain::ports::Pipeline;
use crate::utils::error::Result;
use crate::utils::monitor::SystemMonitor;

/// Drives a [`Pipeline`] through extract, transform and load.
pub struct TranslateEngine<P: Pipeline> {
    pipeline: P,
    monitor: SystemMonitor,
}

impl<P: Pipeline> TranslateEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self::new_with_monitoring(pipeline, false)
    }

    pub fn new_with_monitoring(pipeline: P, monitor_enabled: bool) -> Self {
        Self {
            pipeline,
            monitor: SystemMonitor::new(monitor_enabled),
        }
    }

    /// Returns where the output went. Nothing is written unless every phase succeeds.
    pub async fn run(&self) -> Result<String> {
        tracing::info!("Loading datasets...");
        let records = self.pipeline.extract().await?;
        tracing::info!("Loaded {} records", records.len());
        self.monitor.log_stats("Extract");

        let result = self.pipeline.transform(records).await?;
        tracing::info!(
            "Translated {} texts across {} records in {} batches",
            result.stats.texts,
            result.stats.records,
            result.stats.batches
        );
        self.monitor.log_stats("Translate");

        let destination = self.pipeline.load(result).await?;
        tracing::info!("Output written to {}", destination);
        self.monitor.log_final_stats();

        Ok(destination)
    }
}
