use crate::core::report;
use crate::core::Pipeline;
use crate::domain::model::BatchReport;
use crate::utils::error::Result;
use chrono::Utc;

#[derive(Debug)]
pub struct BatchOutcome {
    pub output_path: String,
    pub report: BatchReport,
}

/// Runs a pipeline's extract, transform and load phases in order.
pub struct BatchEngine<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> BatchEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    pub async fn run(&self) -> Result<BatchOutcome> {
        let started = Utc::now();
        tracing::info!("Batch started at {}", started.to_rfc3339());

        let candidates = self.pipeline.extract().await?;
        println!("Found {} iGaming domains", candidates.matched_total);
        println!("Testing {} iGaming domains...\n", candidates.candidates.len());

        let report = self.pipeline.transform(candidates).await?;

        for line in report::summary_lines(&report) {
            println!("{}", line);
        }

        let output_path = self.pipeline.load(&report).await?;
        println!("\nResults saved to: {}", output_path);

        let elapsed = Utc::now() - started;
        tracing::info!(
            "Batch finished in {}s: {} tested, {} qualified, {} skipped",
            elapsed.num_seconds(),
            report.tested(),
            report.qualified_count(),
            report.skipped.len()
        );

        Ok(BatchOutcome {
            output_path,
            report,
        })
    }
}
