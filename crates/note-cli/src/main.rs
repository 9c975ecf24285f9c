//! Note CLI: fetch, chart and export the equity section of a research note.
//!
//! Commands:
//! - `chart` - fetch a ticker, print the read-outs, optionally write the PNG
//!   and the document builder request

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use note::{
    DocumentRequest, EQUITY_RESEARCH, EquitySession, NoteForm, PipelineConfig, RangeWindow,
    missing_for_export,
};
use tracing::{debug, info};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "note", about = "Research note equity pipeline", version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch daily prices, compute statistics and render the chart.
    Chart {
        /// Ticker, e.g. AAPL or VOD.L.
        #[arg(long)]
        ticker: String,

        /// Look-back window: 6mo, 1y, 2y or 5y.
        #[arg(long, default_value = "1y")]
        range: String,

        /// Analyst target price for the upside read-out.
        #[arg(long)]
        target: Option<String>,

        /// Evaluate the window as of this date (YYYY-MM-DD). Defaults to today.
        #[arg(long)]
        as_of: Option<NaiveDate>,

        /// Write the chart PNG here.
        #[arg(long)]
        png: Option<PathBuf>,

        /// Write the document builder request JSON here.
        #[arg(long)]
        request: Option<PathBuf>,

        /// Note type for the request.
        #[arg(long, default_value = EQUITY_RESEARCH)]
        note_type: String,

        /// Rating for the request.
        #[arg(long, default_value = "")]
        rating: String,
    },
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Commands::Chart {
            ticker,
            range,
            target,
            as_of,
            png,
            request,
            note_type,
            rating,
        } => {
            let form = NoteForm {
                note_type,
                ticker,
                rating,
                target_price: target.unwrap_or_default(),
            };
            run_chart(form, &range, as_of, png.as_deref(), request.as_deref()).await
        }
    }
}

async fn run_chart(
    form: NoteForm,
    range: &str,
    as_of: Option<NaiveDate>,
    png: Option<&Path>,
    request: Option<&Path>,
) -> Result<()> {
    let window = RangeWindow::parse_lenient(range);
    let config = PipelineConfig::from_env()?;
    debug!(?config, "Loaded configuration");

    let session = EquitySession::from_config(config)?;
    session.set_target_input(&form.target_price);

    let outcome = match as_of {
        Some(date) => session.fetch_chart_at(&form.ticker, window, date).await,
        None => session.fetch_chart(&form.ticker, window).await,
    };

    println!("{}", session.status());
    let readouts = session.readouts();
    println!("Current price      {}", readouts.current_price);
    println!("Realised vol (ann) {}", readouts.realised_vol);
    println!("Return ({})        {}", window.label(), readouts.range_return);
    println!("Upside to target   {}", readouts.upside);

    if let Err(e) = outcome {
        bail!("{}", e.user_message());
    }

    if let Some(path) = png {
        match session.chart() {
            Some(chart) => {
                std::fs::write(path, &chart.png)
                    .with_context(|| format!("writing chart to {}", path.display()))?;
                info!(path = %path.display(), bytes = chart.len(), "Chart written");
            }
            None => println!("Charting unavailable, no PNG written"),
        }
    }

    if let Some(path) = request {
        write_request(&session.document_request(&form), path)?;
    }

    let missing = missing_for_export(&form, &session.outputs());
    if !missing.is_empty() {
        let names: Vec<String> = missing.iter().map(ToString::to_string).collect();
        println!("Missing for export: {}", names.join(", "));
    }
    Ok(())
}

fn write_request(request: &DocumentRequest, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(request)?;
    std::fs::write(path, json)
        .with_context(|| format!("writing request to {}", path.display()))?;
    info!(path = %path.display(), "Document request written");
    Ok(())
}
