use clap::Parser;
use displacement_etl::core::{ConfigProvider, Pipeline, Storage};
use displacement_etl::utils::error::ErrorSeverity;
use displacement_etl::utils::{logger, validation::Validate};
use displacement_etl::{CliConfig, DashboardPipeline, EtlEngine, LocalStorage, TomlConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = CliConfig::parse();

    // Logging
    if args.log_json {
        logger::init_json_logger(args.verbose);
    } else {
        logger::init_cli_logger(args.verbose);
    }

    tracing::info!("🚀 Starting displacement-etl v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("📁 Loading configuration from: {}", args.config);

    let mut config = match TomlConfig::from_file(&args.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load config file '{}': {}", args.config, e);
            eprintln!("💡 {}", e.recovery_suggestion());
            std::process::exit(1);
        }
    };

    args.apply_overrides(&mut config);

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    tracing::info!("✅ Configuration loaded and validated successfully");
    display_config_summary(&config, &args);

    let input = LocalStorage::new(".");
    let output = LocalStorage::new(config.output_path());
    let pipeline = DashboardPipeline::new(input, output, config);

    if args.dry_run {
        tracing::info!("🔍 DRY RUN MODE - No files will be written");
        perform_dry_run(&pipeline).await?;
        return Ok(());
    }

    let engine = EtlEngine::new(pipeline);

    match engine.run().await {
        Ok(output_path) => {
            tracing::info!("✅ Dashboard build completed successfully!");
            println!("✅ Dashboard build completed successfully!");
            println!("📁 Output saved to: {}", output_path);
        }
        Err(e) => {
            tracing::error!(
                "❌ Dashboard build failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());

            let exit_code = match e.severity() {
                ErrorSeverity::Low => 0,
                ErrorSeverity::Medium => 2,
                ErrorSeverity::High => 1,
                ErrorSeverity::Critical => 3,
            };

            if exit_code > 0 {
                std::process::exit(exit_code);
            }
        }
    }

    Ok(())
}

fn display_config_summary(config: &TomlConfig, args: &CliConfig) {
    println!("📋 Configuration Summary:");
    println!("  Dashboard: {}", config.dashboard_title());
    println!("  Data: {}", config.data_path());
    println!("  Output: {}", config.output_path());
    println!("  Formats: {}", config.output_formats().join(", "));

    let periods: Vec<&str> = if config.selected_periods().is_empty() {
        config.content().keys().collect()
    } else {
        config.selected_periods().iter().map(String::as_str).collect()
    };
    println!("  Periods: {}", periods.join(", "));

    for period in config.content().iter() {
        println!("    {} → map {}", period.key, period.map_file);
    }

    println!(
        "  Compound destinations: {}, known colors: {}",
        config.splits().len(),
        config.colors().colors().len()
    );

    if args.dry_run {
        println!("  🔍 DRY RUN MODE ENABLED");
    }

    println!();
}

async fn perform_dry_run<S: Storage, C: ConfigProvider>(
    pipeline: &DashboardPipeline<S, C>,
) -> anyhow::Result<()> {
    println!("🔍 Dry Run Analysis:");

    let extracted = pipeline.extract().await?;
    println!("  📊 Records: {}", extracted.records.len());

    let transformed = pipeline.transform(extracted).await?;
    for view in &transformed.views {
        println!(
            "  {} → {} destinations, {} displaced, map {}",
            view.period,
            view.chart.slices.len(),
            view.chart.total(),
            if view.map.is_available() { "ok" } else { "unavailable" }
        );
    }

    println!();
    println!("✅ Dry run analysis complete. Nothing was written.");
    Ok(())
}
