use clap::Parser;
use std::time::Duration;
use who_feed_filter::domain::model::{FilterOutcome, RunSummary};
use who_feed_filter::domain::ports::ConfigProvider;
use who_feed_filter::utils::{logger, validation::Validate};
use who_feed_filter::{CliConfig, FeedPipeline, FilterEngine, HttpFetcher, LocalStorage};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = CliConfig::parse();

    logger::init_cli_logger(config.verbose);

    tracing::info!("Starting who-feed-filter");
    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    if let Err(e) = config.validate() {
        tracing::error!("Configuration validation failed: {}", e);
        eprintln!("{}", e);
        std::process::exit(1);
    }

    let fetcher = HttpFetcher::new(Duration::from_secs(config.timeout_secs()))?;
    let storage = LocalStorage::new(config.output_path.clone());
    let json_summary = config.json;
    let pipeline = FeedPipeline::new(storage, config, fetcher);

    let engine = FilterEngine::new(pipeline);
    match engine.run().await {
        Ok(report) => {
            print_results(&report.outcome);
            if json_summary {
                let summary = RunSummary::from_outcome(&report.outcome);
                println!("{}", serde_json::to_string_pretty(&summary)?);
            }
            println!("Filtered feed written to {}", report.output_path);
        }
        Err(e) => {
            tracing::error!("Feed filter run failed: {}", e);
            eprintln!("{}", e);
            std::process::exit(1);
        }
    }

    Ok(())
}

fn print_results(outcome: &FilterOutcome) {
    let bar = "=".repeat(72);

    println!("\n{bar}");
    println!("  ACCEPTED ({} jobs to import)", outcome.accepted.len());
    println!("{bar}");
    for listing in &outcome.accepted {
        let grade = listing
            .grade_found
            .map(|g| g.to_string())
            .unwrap_or_default();
        println!("  + [{}]  {}", grade, listing.title);
        println!("       {}", listing.link);
    }

    println!("\n{bar}");
    println!("  REJECTED ({} jobs filtered out)", outcome.rejected.len());
    println!("{bar}");
    for listing in &outcome.rejected {
        println!("  - {}", listing.title);
        println!("       Reason: {}", listing.decision_reason);
    }
    println!();
}
