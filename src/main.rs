use clap::Parser;
use notional_guard::cli::{Cli, Commands};
use notional_guard::config::{Config, ExecutionMode};
use std::path::Path;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load configuration; a missing file means defaults plus environment
    let mut config = if Path::new(&cli.config).exists() {
        Config::load(&cli.config)?
    } else {
        eprintln!("Config file {} not found, using defaults", cli.config);
        Config::default()
    };
    config.apply_env_overrides(|key| std::env::var(key).ok())?;
    config.validate()?;

    // Initialize telemetry
    notional_guard::telemetry::init_telemetry(&config.telemetry)?;

    match cli.command {
        Commands::Run(args) => {
            args.execute(config).await?;
        }
        Commands::Config => {
            let api_key = config
                .credentials
                .api_key
                .as_deref()
                .filter(|k| !k.is_empty())
                .map(|k| format!("{}…", k.chars().take(4).collect::<String>()))
                .unwrap_or_else(|| "<unset>".to_string());
            let api_secret = if config.credentials.resolve().is_ok() {
                "<redacted>"
            } else {
                "<unset>"
            };

            println!("Current configuration:");
            println!("  Exposure ceiling: {}", config.guard.exposure_ceiling);
            println!("  Poll interval: {}s", config.guard.poll_interval_secs);
            println!("  Venue: {}", config.exchange.base_url);
            println!(
                "  Mode: {}",
                match config.exchange.mode {
                    ExecutionMode::Live => "live",
                    ExecutionMode::Paper => "paper",
                }
            );
            println!("  API key: {}", api_key);
            println!("  API secret: {}", api_secret);
            println!("  Log level: {}", config.telemetry.log_level);
        }
    }

    Ok(())
}
