//! `postforge-server` — HTTP front end for the content pipeline.

use std::sync::Arc;

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use postforge::api;
use postforge::client::GeminiClient;
use postforge::config::AppConfig;
use postforge::pipeline::Pipeline;
use postforge::sink::{JsonlSink, PostSink, SheetsSink};
use postforge::usage::TokenPrice;

#[derive(Debug, Parser)]
#[command(name = "postforge-server", about = "Serve the two-stage post pipeline over HTTP")]
struct Args {
    /// Config file basename (without extension).
    #[arg(long, default_value = "postforge")]
    config: String,

    /// Override the bind address from configuration.
    #[arg(long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let config = AppConfig::load_from(&args.config)?;
    let bind_addr = args.bind.unwrap_or_else(|| config.bind_addr.clone());

    let client = Arc::new(
        GeminiClient::new(&config.model, &config.api_key)
            .with_max_output_tokens(config.max_output_tokens),
    );

    let sink: Arc<dyn PostSink> = match &config.sheets {
        Some(sheets) => Arc::new(SheetsSink::new(
            &sheets.spreadsheet_id,
            &sheets.worksheet,
            &sheets.access_token,
        )),
        None => Arc::new(JsonlSink::new(&config.log_path)),
    };

    let pipeline = Arc::new(
        Pipeline::new(client, TokenPrice::new(config.token_price)).with_sink(sink),
    );

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    info!(addr = %bind_addr, model = %config.model, "postforge server listening");

    axum::serve(listener, api::router(pipeline)).await?;
    Ok(())
}
