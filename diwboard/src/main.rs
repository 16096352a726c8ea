use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use diwboard::app::{Dashboard, Panel};
use diwboard::charts::{adapt, ChartSpec};
use diwboard::config::Config;
use diwboard::db::{FileStore, ReportStore};
use diwboard::graph::{layout, render_svg, Canvas};
use diwboard::llm::LlmProvider;
use diwboard::processing::{PdfTextExtractor, UploadedFile};
use diwboard::services::{ingestion::NO_FILES_SELECTED, select_pdf_files};

#[derive(Parser)]
#[command(name = "diwboard")]
#[command(about = "Economic report dashboard with AI narratives and storyboards")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List reports, newest first
    Reports,
    /// Dated reports with their release dates
    Highlights,
    /// Print one report with its findings and charts
    Show { id: String },
    /// Structure one or more PDFs into reports and add them
    Add {
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// Synthesize a storyboard across every report
    Storyboard {
        /// Write the relationship graph as SVG
        #[arg(long)]
        svg: Option<PathBuf>,
        /// Write the raw storyboard as JSON
        #[arg(long)]
        json: Option<PathBuf>,
    },
    /// Generate a narrative analysis of one report
    Narrative { id: String },
    /// Chat about one report on stdin
    Chat { id: String },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "diwboard=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = Config::from_env();

    if let Some(llm_config) = &config.llm {
        tracing::info!("Initializing LLM provider: {}...", llm_config.model);
    }
    let llm = LlmProvider::new(config.llm.as_ref());
    if !llm.is_available() {
        tracing::warn!("LLM unavailable - AI features will be disabled");
    }

    let storage = FileStore::new(&config.storage.data_dir)
        .with_context(|| format!("opening data dir {}", config.storage.data_dir.display()))?;
    let store = ReportStore::new(storage)?;
    let canvas = Canvas::from(&config.graph);
    let label_wrap = config.graph.label_wrap;

    let mut dashboard = Dashboard::new(config, store, Arc::new(llm), Arc::new(PdfTextExtractor::new()));

    match args.command {
        Command::Reports => {
            for topic in dashboard.state().topics() {
                println!("{:<24} {}", topic.id, topic.title);
            }
        }
        Command::Highlights => {
            for highlight in dashboard.state().highlights() {
                println!("{}  {}\n    {}\n", highlight.date_label, highlight.title, highlight.summary);
            }
        }
        Command::Show { id } => {
            dashboard.select_panel(Panel::Report(id.clone()));
            let report = dashboard
                .state()
                .selected_report()
                .with_context(|| format!("no report with id '{id}'"))?;

            println!("{}", report.title);
            if let Some(date) = report.release_date() {
                println!("Released {}", date.format("%B %-d, %Y"));
            }
            println!("\n{}\n", report.summary);
            for finding in &report.key_findings {
                println!("  - {finding}");
            }
            for chart in &report.charts {
                print_chart(&adapt(chart));
            }
        }
        Command::Add { files } => {
            let mut uploads = Vec::with_capacity(files.len());
            for path in &files {
                uploads.push(UploadedFile::from_path(path).await?);
            }

            let selection = select_pdf_files(&[], uploads);
            if let Some(warning) = selection.warning {
                eprintln!("{warning}");
            }
            if selection.accepted.is_empty() {
                anyhow::bail!(NO_FILES_SELECTED);
            }

            let outcome = dashboard
                .ingest_files(&selection.accepted, |progress| eprintln!("{progress}"))
                .await;

            for report in &outcome.reports {
                println!("Added {} ({})", report.title, report.id);
            }
            if let Panel::Report(id) = dashboard.state().panel() {
                println!("Selected {id}");
            }
            if let Some(summary) = outcome.summary() {
                eprintln!("{summary}");
            }
        }
        Command::Storyboard { svg, json } => {
            let state = dashboard.generate_storyboard().await;
            if let Some(error) = &state.error {
                anyhow::bail!("{error}");
            }
            let storyboard = state
                .data
                .clone()
                .context("storyboard generation produced no result")?;

            println!("{}\n", storyboard.narrative);
            println!("## Introspection\n{}\n", storyboard.introspection);
            println!("## Retrospection\n{}\n", storyboard.retrospection);
            for actor in storyboard.key_actors() {
                println!("  * {}: {}", actor.name, actor.description);
            }
            for chart in &storyboard.charts {
                print_chart(&adapt(chart));
            }

            if let Some(path) = svg {
                let graph_layout = layout(&storyboard.relationship_graph, &canvas, label_wrap);
                tokio::fs::write(&path, render_svg(&graph_layout, &canvas)).await?;
                tracing::info!(path = %path.display(), "Wrote relationship graph");
            }
            if let Some(path) = json {
                tokio::fs::write(&path, serde_json::to_string_pretty(storyboard.as_ref())?).await?;
                tracing::info!(path = %path.display(), "Wrote storyboard");
            }
        }
        Command::Narrative { id } => {
            println!("{}", dashboard.narrative(&id).await?);
        }
        Command::Chat { id } => {
            let greeting = dashboard
                .start_chat(&id)?
                .transcript()
                .first()
                .map(|m| m.content.clone())
                .unwrap_or_default();
            println!("{greeting}");

            let mut lines = BufReader::new(tokio::io::stdin()).lines();
            let mut stdout = tokio::io::stdout();
            loop {
                stdout.write_all(b"> ").await?;
                stdout.flush().await?;
                let Some(line) = lines.next_line().await? else {
                    break;
                };
                if let Some(reply) = dashboard.send_chat(&line).await? {
                    println!("{}\n", reply.content);
                }
            }
        }
    }

    Ok(())
}

fn print_chart(spec: &ChartSpec) {
    match spec {
        ChartSpec::Cartesian {
            title,
            series_kind,
            categories,
            series,
            ..
        } => {
            println!("\n[{series_kind:?}] {title}");
            for s in series {
                let values: Vec<String> = categories
                    .iter()
                    .zip(&s.values)
                    .map(|(c, v)| match v {
                        Some(v) => format!("{c}={v}"),
                        None => format!("{c}=-"),
                    })
                    .collect();
                println!("  {}: {}", s.label, values.join(", "));
            }
        }
        ChartSpec::Pie { title, slices, .. } => {
            println!("\n[Pie] {title}");
            for slice in slices {
                match slice.value {
                    Some(v) => println!("  {}: {v}", slice.label),
                    None => println!("  {}: -", slice.label),
                }
            }
        }
        ChartSpec::Unsupported { title, message } => {
            println!("\n{title}: {message}");
        }
    }
}
