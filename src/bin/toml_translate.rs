use clap::Parser;
use router_translate::core::batcher::batch_texts;
use router_translate::core::extractor::flatten;
use router_translate::domain::ports::ConfigProvider;
use router_translate::utils::{logger, validation::Validate};
use router_translate::{
    DatasetLoader, LocalStorage, RouterClient, TomlConfig, TranslateEngine, TranslateError,
    TranslatePipeline,
};
use std::time::Duration;

#[derive(Parser)]
#[command(name = "toml-translate")]
#[command(about = "Dataset translation driven by a TOML configuration file")]
struct Args {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "translate.toml")]
    config: String,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Override monitoring setting from config
    #[arg(long)]
    monitor: Option<bool>,

    /// Load datasets and plan batches without calling the router
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let config = match TomlConfig::from_file(&args.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load config file '{}': {}", args.config, e);
            eprintln!("💡 Make sure the file exists and is valid TOML format");
            std::process::exit(1);
        }
    };

    if config.json_logs() {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(args.verbose);
    }
    tracing::info!("Loaded configuration from {}", args.config);

    if let Err(e) = config.validate() {
        tracing::error!("Configuration validation failed: {}", e);
        tracing::error!("Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    display_config_summary(&config, &args);

    let result = if args.dry_run {
        perform_dry_run(&config).await
    } else {
        let monitor_enabled = args.monitor.unwrap_or_else(|| config.monitoring_enabled());
        run(config, monitor_enabled).await
    };

    if let Err(e) = result {
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

async fn run(config: TomlConfig, monitor_enabled: bool) -> Result<(), TranslateError> {
    let translator = RouterClient::new(
        config.router_host(),
        config.model(),
        Duration::from_secs(config.timeout_seconds()),
    )?;
    let pipeline = TranslatePipeline::new(LocalStorage::current_dir(), translator, config)?;
    let engine = TranslateEngine::new_with_monitoring(pipeline, monitor_enabled);

    let destination = engine.run().await?;
    tracing::info!("Translation finished, output in {}", destination);
    Ok(())
}

fn display_config_summary(config: &TomlConfig, args: &Args) {
    let fields = config.accepted_fields();
    eprintln!("📋 Configuration Summary:");
    eprintln!("  Router: {} (model {})", config.router_host(), config.model());
    eprintln!("  Datasets: {}", config.dataset_paths().join(", "));
    if fields.is_unrestricted() {
        eprintln!("  Fields: all string fields");
    } else {
        eprintln!("  Fields: {}", fields.iter().collect::<Vec<_>>().join(", "));
    }
    eprintln!(
        "  Workers: {}, Batch size: {}",
        config.num_workers(),
        config.batch_size()
    );
    eprintln!("  Output: {}", config.output_path().unwrap_or("stdout"));
    if args.dry_run {
        eprintln!("  🔍 DRY RUN MODE ENABLED");
    }
    eprintln!();
}

async fn perform_dry_run(config: &TomlConfig) -> Result<(), TranslateError> {
    let loader = DatasetLoader::new(LocalStorage::current_dir(), config.dataset_type());
    let records = loader.load_all(config.dataset_paths()).await?;
    let flat = flatten(&records, &config.accepted_fields());
    let batches = batch_texts(&flat.texts, config.batch_size())?;

    eprintln!("🔍 Dry Run Analysis:");
    eprintln!("  Records: {}", records.len());
    eprintln!("  Texts to translate: {}", flat.len());
    eprintln!("  Router requests: {}", batches.len());
    eprintln!("✅ Dry run complete, the router was not contacted.");
    Ok(())
}
