use crate::core::Pipeline;
use crate::domain::model::FilterOutcome;
use crate::utils::error::Result;

pub struct RunReport {
    pub output_path: String,
    pub outcome: FilterOutcome,
}

/// Drives a pipeline through its three stages. Fatal errors abort before any
/// classification work; the caller maps them to a non-zero exit.
pub struct FilterEngine<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> FilterEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    pub async fn run(&self) -> Result<RunReport> {
        tracing::info!("Extracting feed...");
        let source = self.pipeline.extract().await?;

        tracing::info!("Classifying listings...");
        let outcome = self.pipeline.transform(source).await?;
        tracing::info!(
            "Classified {} listings: {} accepted, {} rejected",
            outcome.total(),
            outcome.accepted.len(),
            outcome.rejected.len()
        );

        tracing::info!("Writing filtered feed...");
        let output_path = self.pipeline.load(&outcome).await?;
        tracing::info!("Filtered feed written to {}", output_path);

        Ok(RunReport {
            output_path,
            outcome,
        })
    }
}
