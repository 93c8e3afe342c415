//! CLI binary for lookup-race.

use anyhow::Context;
use clap::{Parser, Subcommand};
use lookup_race::api::rest::{AppState, create_router};
use lookup_race::application::error::{ApplicationError, ApplicationResult};
use lookup_race::application::use_cases::{ExportQuoteUseCase, LookupAddressUseCase};
use lookup_race::infrastructure::config::AppConfig;
use lookup_race::infrastructure::providers::HttpClient;
use lookup_race::infrastructure::telemetry::init_tracing;
use std::path::PathBuf;
use tokio_util::sync::CancellationToken;
use tracing::info;

/// First-answer-wins CEP lookups and bounded quote fetching.
#[derive(Parser)]
#[command(name = "lookup-race", version, about)]
struct Cli {
    /// Path to TOML configuration file.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Subcommand to run.
    #[command(subcommand)]
    command: Command,
}

/// Available commands.
#[derive(Subcommand)]
enum Command {
    /// Resolve a CEP by racing BrasilAPI and ViaCEP.
    Cep {
        /// CEP as 01001000 or 01001-000.
        cep: String,
    },

    /// Serve /cotacao, /cep/{cep} and /health.
    Serve,

    /// Fetch the quote from a running server and write it to a file.
    Quote,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = AppConfig::load(cli.config.as_deref())
        .map_err(ApplicationError::from)
        .context("loading configuration")?;
    init_tracing(&config.log)?;

    match cli.command {
        Command::Cep { cep } => Ok(run_cep(&config, &cep).await?),
        Command::Serve => run_serve(&config).await,
        Command::Quote => Ok(run_quote(&config).await?),
    }
}

async fn run_cep(config: &AppConfig, cep: &str) -> ApplicationResult<()> {
    let client = HttpClient::new(config.cep.timeout_ms)?;
    let use_case = LookupAddressUseCase::from_config(&config.cep, client);

    let cancel = CancellationToken::new();
    let on_ctrl_c = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            on_ctrl_c.cancel();
        }
    });

    let winner = use_case.execute_with_cancellation(cep, &cancel).await?;
    println!("{}", winner.value());
    Ok(())
}

async fn run_serve(config: &AppConfig) -> anyhow::Result<()> {
    let addr = config.server.socket_addr().map_err(ApplicationError::from)?;
    let state = AppState::from_config(config)
        .await
        .with_context(|| format!("preparing server state ({})", config.database.url))?;

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {}", addr))?;
    info!(%addr, "Listening");

    axum::serve(listener, create_router(state))
        .with_graceful_shutdown(async {
            if tokio::signal::ctrl_c().await.is_ok() {
                info!("Received Ctrl+C, shutting down");
            }
        })
        .await?;

    Ok(())
}

async fn run_quote(config: &AppConfig) -> ApplicationResult<()> {
    let client = HttpClient::new(config.client.timeout_ms)?;
    let use_case = ExportQuoteUseCase::from_config(&config.client, client, &config.quote.pair);

    let quote = use_case.execute().await?;
    println!("{} -> {}", quote, config.client.output.display());
    Ok(())
}
