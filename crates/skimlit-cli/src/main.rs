mod display;

use std::io::Read;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use skimlit_ai::{AbstractService, OnnxClassifier};
use skimlit_client::ApiClient;
use skimlit_core::api::InputMode;
use skimlit_core::{ClassifiedAbstract, DEMO_ABSTRACT, replace_numbers};
use skimlit_server::{AppState, DEFAULT_HOME_URL, DEFAULT_PUBMED_URL, PageOptions, ServerConfig};
use skimlit_store::{MetricsReport, MetricsStore};
use tracing_subscriber::EnvFilter;

const DEFAULT_MODEL_DIR: &str = "models/skimlit";
const DEFAULT_METRICS_DIR: &str = "metrics";

#[derive(Parser, Debug)]
#[command(
    name = "skimlit",
    version,
    about = "Classify the sentences of biomedical abstracts"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Serve the web page and JSON API.
    Serve(ServeArgs),
    /// Classify an abstract and print one block per sentence.
    Predict(PredictArgs),
    /// Print the input with every digit run replaced by `@`.
    Normalize {
        /// Input file; `-` or omitted reads stdin.
        input: Option<PathBuf>,
    },
    /// Print the model and baseline metrics tables.
    Metrics(MetricsArgs),
}

#[derive(Args, Debug)]
struct ServeArgs {
    #[arg(long, env = "SKIMLIT_ADDR", default_value = "127.0.0.1:8501")]
    addr: SocketAddr,
    #[arg(long, env = "SKIMLIT_MODEL_DIR", default_value = DEFAULT_MODEL_DIR)]
    model_dir: PathBuf,
    #[arg(long, env = "SKIMLIT_METRICS_DIR", default_value = DEFAULT_METRICS_DIR)]
    metrics_dir: PathBuf,
    /// Target of the "Get abstracts from PubMed" link.
    #[arg(long, default_value = DEFAULT_PUBMED_URL)]
    pubmed_url: String,
    /// Target of the "Back to Website" link.
    #[arg(long, default_value = DEFAULT_HOME_URL)]
    home_url: String,
    /// Send demo text to the model with its digits intact.
    #[arg(long)]
    no_normalize_demo: bool,
}

#[derive(Args, Debug)]
struct PredictArgs {
    /// Input file; `-` or omitted reads stdin.
    #[arg(conflicts_with = "demo")]
    input: Option<PathBuf>,
    /// Classify the built-in demo abstract.
    #[arg(long)]
    demo: bool,
    /// Ask a running server instead of loading the model locally.
    #[arg(long)]
    server: Option<String>,
    #[arg(long, env = "SKIMLIT_MODEL_DIR", default_value = DEFAULT_MODEL_DIR)]
    model_dir: PathBuf,
    /// Print an Arrow table instead of text blocks.
    #[arg(long, conflicts_with = "reveal")]
    table: bool,
    /// Print the result word by word.
    #[arg(long)]
    reveal: bool,
}

#[derive(Args, Debug)]
struct MetricsArgs {
    /// Ask a running server instead of reading local artifacts.
    #[arg(long)]
    server: Option<String>,
    #[arg(long, env = "SKIMLIT_METRICS_DIR", default_value = DEFAULT_METRICS_DIR)]
    metrics_dir: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr so stdout stays pipeable.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Serve(args) => cmd_serve(args).await,
        Command::Predict(args) => cmd_predict(args).await,
        Command::Normalize { input } => cmd_normalize(input.as_deref()),
        Command::Metrics(args) => cmd_metrics(args).await,
    }
}

async fn cmd_serve(args: ServeArgs) -> anyhow::Result<()> {
    tracing::info!("skimlit v{}", env!("CARGO_PKG_VERSION"));

    let model_dir = args.model_dir.clone();
    let service = tokio::task::spawn_blocking(move || skimlit_ai::load_service(&model_dir))
        .await
        .context("loading model")?
        .with_normalize_demo(!args.no_normalize_demo);
    let metrics = MetricsStore::open(&args.metrics_dir);

    let page = PageOptions {
        pubmed_url: args.pubmed_url,
        home_url: args.home_url,
        ..Default::default()
    };
    let state = AppState::new(service, metrics, &page)?;
    let config = ServerConfig { addr: args.addr };
    skimlit_server::serve(config, state).await
}

async fn cmd_predict(args: PredictArgs) -> anyhow::Result<()> {
    let (text, mode) = if args.demo {
        (DEMO_ABSTRACT.to_string(), InputMode::Demo)
    } else {
        (read_input(args.input.as_deref())?, InputMode::FreeText)
    };

    let classified: ClassifiedAbstract = match &args.server {
        Some(url) => {
            let client = ApiClient::new(url.clone());
            client
                .predict(&text, mode)
                .await
                .with_context(|| format!("predicting via {url}"))?
                .into()
        }
        None => {
            let model_dir = args.model_dir.clone();
            tokio::task::spawn_blocking(move || predict_local(&model_dir, &text, mode))
                .await
                .context("inference task failed")??
        }
    };

    display::print_predictions(&classified, args.table, args.reveal)
}

fn predict_local(
    model_dir: &Path,
    text: &str,
    mode: InputMode,
) -> anyhow::Result<ClassifiedAbstract> {
    let classifier = OnnxClassifier::load(model_dir)
        .with_context(|| format!("loading model from {}", model_dir.display()))?;
    let service = AbstractService::new(Box::new(classifier));
    Ok(service.classify(text, mode)?)
}

fn cmd_normalize(input: Option<&Path>) -> anyhow::Result<()> {
    let text = read_input(input)?;
    print!("{}", replace_numbers(&text));
    Ok(())
}

async fn cmd_metrics(args: MetricsArgs) -> anyhow::Result<()> {
    match &args.server {
        Some(url) => {
            let client = ApiClient::new(url.clone());
            let metrics = client
                .metrics()
                .await
                .with_context(|| format!("fetching metrics from {url}"))?;
            display::print_table("Model Metrics", &metrics.model)?;
            println!();
            display::print_table("Baseline Metrics", &metrics.baseline)?;
            println!("\nEvaluation plot: {}{}", client.base_url(), metrics.image_url);
        }
        None => {
            let report = MetricsReport::load(&args.metrics_dir).with_context(|| {
                format!("reading metrics from {}", args.metrics_dir.display())
            })?;
            display::print_batch("Model Metrics", &report.model)?;
            println!();
            display::print_batch("Baseline Metrics", &report.baseline)?;
            println!(
                "\nEvaluation plot: {} bytes ({})",
                report.image.len(),
                report.image_mime
            );
        }
    }
    Ok(())
}

/// Read a file, or stdin when `path` is omitted or `-`.
fn read_input(path: Option<&Path>) -> anyhow::Result<String> {
    match path {
        Some(p) if p != Path::new("-") => std::fs::read_to_string(p)
            .with_context(|| format!("reading {}", p.display())),
        _ => {
            let mut text = String::new();
            std::io::stdin()
                .read_to_string(&mut text)
                .context("reading stdin")?;
            Ok(text)
        }
    }
}
