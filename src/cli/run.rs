//! Run command implementation

use crate::config::{Config, ExecutionMode};
use crate::exchange::{BinanceConfig, BinanceFuturesClient, ExchangeGateway, PaperGateway};
use crate::guard::Guard;
use clap::Args;

#[derive(Args, Debug)]
pub struct RunArgs {
    /// Run a single cycle and exit
    #[arg(long)]
    pub once: bool,

    /// Record orders locally instead of submitting them
    #[arg(long)]
    pub paper: bool,
}

impl RunArgs {
    pub async fn execute(&self, config: Config) -> anyhow::Result<()> {
        let credentials = config.credentials.resolve().inspect_err(|e| {
            tracing::error!(error = %e, "Cannot start without credentials");
        })?;

        let client =
            BinanceFuturesClient::with_config(BinanceConfig::from(&config.exchange), credentials)?;

        let mode = if self.paper {
            ExecutionMode::Paper
        } else {
            config.exchange.mode
        };

        tracing::info!(?mode, base_url = %config.exchange.base_url, "Starting guard");

        match mode {
            ExecutionMode::Live => self.run_guard(client, &config).await,
            ExecutionMode::Paper => self.run_guard(PaperGateway::new(client), &config).await,
        }
    }

    async fn run_guard<G: ExchangeGateway>(&self, gateway: G, config: &Config) -> anyhow::Result<()> {
        let guard = Guard::start(gateway, &config.guard).await.inspect_err(|e| {
            tracing::error!(error = %e, "Failed to load step sizes");
        })?;

        if self.once {
            guard.poll_once().await;
            return Ok(());
        }

        guard
            .run(async {
                if let Err(e) = tokio::signal::ctrl_c().await {
                    tracing::error!(error = %e, "Failed to listen for shutdown signal");
                    std::future::pending::<()>().await;
                }
            })
            .await;

        Ok(())
    }
}
