//! `postforge` — one-shot pipeline runs from the command line.

use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use colored::Colorize;

use postforge::client::GeminiClient;
use postforge::config::AppConfig;
use postforge::pipeline::Pipeline;
use postforge::sink::{JsonlSink, PostSink, SheetsSink};
use postforge::usage::TokenPrice;

#[derive(Debug, Parser)]
#[command(
    name = "postforge",
    about = "Draft and edit a post for a topic in one pass"
)]
struct Args {
    /// Topic to write about.
    topic: String,

    /// Config file basename (without extension).
    #[arg(long, default_value = "postforge")]
    config: String,

    /// Print the raw JSON result instead of formatted sections.
    #[arg(long)]
    json: bool,

    /// Skip persistence (no spreadsheet or JSONL append).
    #[arg(long)]
    no_persist: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let config = AppConfig::load_from(&args.config).context("loading configuration")?;

    let client = Arc::new(
        GeminiClient::new(&config.model, &config.api_key)
            .with_max_output_tokens(config.max_output_tokens),
    );

    let mut pipeline = Pipeline::new(client, TokenPrice::new(config.token_price));
    if !args.no_persist {
        let sink: Arc<dyn PostSink> = match &config.sheets {
            Some(sheets) => Arc::new(SheetsSink::new(
                &sheets.spreadsheet_id,
                &sheets.worksheet,
                &sheets.access_token,
            )),
            None => Arc::new(JsonlSink::new(&config.log_path)),
        };
        pipeline = pipeline.with_sink(sink);
    }

    let result = pipeline
        .run(&args.topic)
        .await
        .context("running the pipeline")?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    println!("{} {}", "TOPIC:".bold().cyan(), result.topic);
    println!("\n{}\n{}", "DRAFT:".bold().yellow(), result.draft);
    println!("\n{}\n{}", "CRITIQUE:".bold().magenta(), result.critique);
    println!("\n{}\n{}", "FINAL POST:".bold().green(), result.final_post);
    println!(
        "\n{} {} tokens (~${:.6})",
        "USAGE:".bold(),
        result.total_tokens,
        result.cost
    );

    Ok(())
}
