use anyhow::Context;
use clap::Parser;
use igaming_qualifier::adapters::dataset;
use igaming_qualifier::core::matcher;
use igaming_qualifier::utils::error::{ErrorSeverity, QualifierError};
use igaming_qualifier::utils::{logger, validation::Validate};
use igaming_qualifier::{
    BatchEngine, CliConfig, LocalStorage, QualificationPipeline, RankingClient, TomlConfig,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    logger::init_cli_logger(cli.verbose, cli.log_json);

    tracing::info!("Starting igaming-qualifier");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    let config = match cli.resolve() {
        Ok(config) => config,
        Err(e) => exit_with(&e),
    };

    if cli.dry_run {
        if let Err(e) = config.validate() {
            exit_with(&e);
        }
        return dry_run(&config).await;
    }

    // Missing credentials stop the run before any domain is processed.
    if let Err(e) = config.validate_for_run() {
        exit_with(&e);
    }

    let client_config = config
        .ranking_client_config()
        .context("building ranking client configuration")?;
    let client = RankingClient::new(client_config).context("building HTTP client")?;
    let storage = LocalStorage::new(config.load.output_path.clone());
    let pipeline = QualificationPipeline::new(storage, client, config);
    let engine = BatchEngine::new(pipeline);

    match engine.run().await {
        Ok(outcome) => {
            tracing::info!(
                "Batch completed: {} qualified of {} tested",
                outcome.report.qualified_count(),
                outcome.report.tested()
            );
            tracing::info!("Output saved to: {}", outcome.output_path);
            Ok(())
        }
        Err(e) => exit_with(&e),
    }
}

async fn dry_run(config: &TomlConfig) -> anyhow::Result<()> {
    tracing::info!("DRY RUN MODE - no ranking API calls will be made");

    let client = dataset::http_client(config.request_timeout())?;
    let records = dataset::load_dataset(&config.dataset_source(), &client)
        .await
        .with_context(|| format!("loading dataset from {}", config.source.dataset))?;
    let mut candidates = matcher::filter_records(&records, &config.domain_terms());
    println!("Found {} iGaming domains", candidates.len());

    if let Some(max) = config.batch.max_domains {
        candidates.truncate(max);
    }
    println!("Would test {} domains:", candidates.len());
    for domain in &candidates {
        println!("- {}", domain);
    }
    Ok(())
}

fn exit_with(e: &QualifierError) -> ! {
    tracing::error!(
        "Run failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 Suggestion: {}", e.recovery_suggestion());

    let exit_code = match e.severity() {
        ErrorSeverity::Low => 0,
        ErrorSeverity::Medium => 2,
        ErrorSeverity::High => 1,
        ErrorSeverity::Critical => 3,
    };
    std::process::exit(exit_code);
}
