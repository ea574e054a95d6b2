use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use demandcast::{
    config::Config,
    dataset::SlotKind,
    predict::{http::HttpPredictionClient, Offline, PredictionClient, PredictionSet},
    render::{self, slots, svg, text, PredictionView},
    schema::SchemaSpec,
    session::Session,
};
use std::{
    env,
    io::{self, Write},
    path::{Path, PathBuf},
};
use tracing::{info, warn};
use tracing_subscriber::{fmt, EnvFilter};

/// Validate demand-forecast inputs and request predictions.
#[derive(Parser, Debug)]
#[command(name = "demandcast", version)]
struct Cli {
    /// YAML config file (falls back to DEMANDCAST_CONFIG)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Parse both uploads and report whether they can be submitted
    Check(Uploads),

    /// Parse, validate and submit both uploads, then print the forecast
    Predict {
        #[command(flatten)]
        uploads: Uploads,

        /// Prediction endpoint, overriding config and PREDICT_ENDPOINT
        #[arg(long)]
        endpoint: Option<String>,

        /// Write the bar chart here as SVG
        #[arg(long)]
        svg: Option<PathBuf>,
    },

    /// Render a saved prediction response
    Render {
        /// JSON body returned by the prediction service
        #[arg(long)]
        response: PathBuf,

        #[arg(long)]
        svg: Option<PathBuf>,
    },

    /// List the required columns of a slot
    Columns { slot: SlotKind },

    /// Write a header-only CSV template for a slot
    Template {
        slot: SlotKind,

        /// Output path; stdout when omitted
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

#[derive(Args, Debug)]
struct Uploads {
    /// Today's sales file (.csv, .xlsx or .xls)
    #[arg(long)]
    today: PathBuf,

    /// Tomorrow's conditions file (.csv, .xlsx or .xls)
    #[arg(long)]
    tomorrow: PathBuf,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr; stdout carries the report.
    let log_level = env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));
    fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Check(uploads) => {
            let session = Session::new(Offline);
            load_uploads(&session, &uploads).await?;
            if !print_status(&session)? {
                bail!("uploads are not ready for submission");
            }
        }
        Command::Predict {
            uploads,
            endpoint,
            svg,
        } => {
            let mut cfg = Config::load(cli.config.as_deref()).context("loading config")?;
            if let Some(endpoint) = endpoint {
                cfg.set_endpoint(&endpoint)?;
            }
            let session = session_for(&cfg)?;
            load_uploads(&session, &uploads).await?;
            if !print_status(&session)? {
                bail!("uploads are not ready for submission");
            }

            info!(endpoint = %cfg.endpoint, "requesting predictions");
            let set = session
                .submit()
                .await
                .with_context(|| format!("prediction request to {} failed", cfg.endpoint))?;
            println!();
            show(&set, svg.as_deref())?;
        }
        Command::Render { response, svg } => {
            let body = tokio::fs::read(&response)
                .await
                .with_context(|| format!("reading {}", response.display()))?;
            let set: PredictionSet = serde_json::from_slice(&body)
                .with_context(|| format!("decoding prediction response {}", response.display()))?;
            show(&set, svg.as_deref())?;
        }
        Command::Columns { slot } => {
            let mut out = io::stdout().lock();
            text::write_columns(&mut out, SchemaSpec::for_slot(slot))?;
        }
        Command::Template { slot, out } => {
            let template = SchemaSpec::for_slot(slot).template_csv();
            match out {
                Some(path) => {
                    tokio::fs::write(&path, template)
                        .await
                        .with_context(|| format!("writing template {}", path.display()))?;
                    info!(%slot, path = %path.display(), "template written");
                }
                None => io::stdout().write_all(template.as_bytes())?,
            }
        }
    }
    Ok(())
}

fn session_for(cfg: &Config) -> Result<Session<HttpPredictionClient>> {
    let client = HttpPredictionClient::new(cfg.endpoint.clone(), cfg.request_timeout())
        .context("building HTTP client")?;
    Ok(Session::new(client))
}

async fn load_uploads<C: PredictionClient>(session: &Session<C>, uploads: &Uploads) -> Result<()> {
    let (today, tomorrow) = tokio::join!(
        session.load_path(SlotKind::Today, &uploads.today),
        session.load_path(SlotKind::Tomorrow, &uploads.tomorrow),
    );
    today?;
    tomorrow?;
    Ok(())
}

/// Print both slots and the readiness verdict; returns whether submission is possible.
fn print_status<C: PredictionClient>(session: &Session<C>) -> Result<bool> {
    let ctl = session.controller();
    let mut out = io::stdout().lock();
    for kind in SlotKind::ALL {
        text::write_slot(&mut out, &slots::SlotDisplay::from_controller(&ctl, kind))?;
        writeln!(out)?;
    }
    let blockers = ctl.blockers();
    text::write_readiness(&mut out, &blockers, &slots::advisories(&ctl))?;
    Ok(blockers.is_empty())
}

fn show(set: &PredictionSet, svg_path: Option<&Path>) -> Result<()> {
    let view = render::render(set);
    text::write_report(&mut io::stdout().lock(), &view)?;

    if let Some(path) = svg_path {
        match &view {
            PredictionView::Populated(report) => {
                std::fs::write(path, svg::chart_svg(&report.chart))
                    .with_context(|| format!("writing chart {}", path.display()))?;
                info!(path = %path.display(), "chart written");
            }
            PredictionView::Empty => warn!("no predictions; chart not written"),
        }
    }
    Ok(())
}
