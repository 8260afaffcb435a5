use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use sentiment_client::SentimentClient;
use tubepulse_common::Config;
use tubepulse_report::guard::CancelFlag;
use tubepulse_report::{Pipeline, PipelineSettings, StreamSurface};
use youtube_client::YoutubeClient;

#[derive(Parser)]
#[command(name = "tubepulse", about = "Sentiment report for the comments of a YouTube video")]
struct Cli {
    /// URL of the page being viewed
    url: Option<String>,

    /// Write the HTML report here instead of stdout
    #[arg(long, short)]
    out: Option<PathBuf>,

    /// Emit logs as JSON
    #[arg(long)]
    json_logs: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new("tubepulse_report=info,youtube_client=info,sentiment_client=info")
    });
    let logs = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr);
    if cli.json_logs {
        logs.json().init();
    } else {
        logs.init();
    }

    info!("TubePulse starting...");

    let config = Config::from_env()?;

    let youtube = YoutubeClient::new(
        &config.youtube_api_url,
        &config.youtube_api_key,
        config.request_timeout,
    )?;
    let sentiment = SentimentClient::new(&config.sentiment_api_url, config.request_timeout)?;
    let pipeline = Pipeline::new(
        Arc::new(youtube),
        Arc::new(sentiment),
        PipelineSettings::from_config(&config),
    );

    let cancel = CancelFlag::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupted, cancelling run");
            on_interrupt.cancel();
        }
    });

    let out: Box<dyn Write> = match &cli.out {
        Some(path) => Box::new(BufWriter::new(
            File::create(path).with_context(|| format!("creating {}", path.display()))?,
        )),
        None => Box::new(io::stdout().lock()),
    };
    let mut surface = StreamSurface::new(out);
    surface.begin("YouTube Comment Analysis")?;

    let report = pipeline
        .run(cli.url.as_deref(), &mut surface, &cancel)
        .await;

    surface.finish()?;
    info!(outcome = ?report.outcome, "{}", report.stats);

    Ok(())
}
