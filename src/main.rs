use clap::Parser;
use router_translate::utils::{logger, validation::Validate};
use router_translate::{
    CliConfig, LocalStorage, RouterClient, TranslateEngine, TranslateError, TranslatePipeline,
};
use std::time::Duration;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = CliConfig::parse();

    logger::init_cli_logger(config.verbose);

    tracing::info!("Starting translate-texts");
    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    if let Err(e) = config.validate() {
        tracing::error!("Configuration validation failed: {}", e);
        tracing::error!("Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    if let Err(e) = run(config).await {
        tracing::error!(
            "Translation failed: {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());
        std::process::exit(e.exit_code());
    }

    Ok(())
}

async fn run(config: CliConfig) -> Result<(), TranslateError> {
    let translator = RouterClient::new(
        &config.router_host,
        config.model.clone(),
        Duration::from_secs(config.timeout_secs),
    )?;
    tracing::info!("Using router endpoint {} with model {}", translator.endpoint(), translator.model());

    let monitor_enabled = config.monitor;
    let pipeline = TranslatePipeline::new(LocalStorage::current_dir(), translator, config)?;
    let engine = TranslateEngine::new_with_monitoring(pipeline, monitor_enabled);

    engine.run().await?;
    Ok(())
}
