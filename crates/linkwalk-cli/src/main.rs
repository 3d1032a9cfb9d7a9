//! Linkwalk CLI
//!
//! - `run`: evaluate a BGP query by link traversal against a remote endpoint
//! - `check`: validate a query and list the path patterns it registers
//! - `rewrite`: print the continuation query one control signal produces

use anyhow::{anyhow, Context, Result};
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use linkwalk_core::{
    expand_query_text, ControlSignal, FrontierPolicy, HttpTransport, PatternRegistry,
    ResultPager, StepOutcome, Traversal, TraversalConfig, TraversalEvent, TraversalMode,
};
use linkwalk_sparql::parse_query;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;
use tracing_subscriber::EnvFilter;

mod output;

#[derive(Parser)]
#[command(name = "linkwalk")]
#[command(author, version, about = "Link-traversal evaluation of SPARQL BGP queries")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Execute a query against an endpoint, following control signals.
    Run(RunArgs),

    /// Check that a query file is in the supported fragment.
    Check {
        /// Query file
        input: PathBuf,
    },

    /// Rewrite a query with one control signal and print the continuation.
    Rewrite {
        /// Query file holding the prior query
        #[arg(long)]
        query_file: PathBuf,
        /// Control signal as JSON
        #[arg(long)]
        signal: String,
    },
}

#[derive(Args)]
struct RunArgs {
    /// JSON configuration file (camelCase keys)
    #[arg(long)]
    config: Option<PathBuf>,
    /// Endpoint base URL
    #[arg(long)]
    endpoint: Option<String>,
    /// Default graph
    #[arg(long)]
    graph: Option<String>,
    /// Query text
    #[arg(long, conflicts_with = "query_file")]
    query: Option<String>,
    /// File holding the query text
    #[arg(long)]
    query_file: Option<PathBuf>,
    #[arg(long)]
    max_depth: Option<u32>,
    /// Server-side time quantum in milliseconds
    #[arg(long)]
    quantum: Option<u64>,
    /// Wait for Enter before expanding each frontier item
    #[arg(long)]
    step: bool,
    /// Explore the frontier depth-first instead of breadth-first
    #[arg(long)]
    depth_first: bool,
    #[arg(long)]
    page_size: Option<usize>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| "linkwalk=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Run(args) => cmd_run(args),
        Commands::Check { input } => cmd_check(&input),
        Commands::Rewrite { query_file, signal } => cmd_rewrite(&query_file, &signal),
    }
}

// ============================================================================
// run
// ============================================================================

fn build_config(args: &RunArgs) -> Result<TraversalConfig> {
    let mut config = match &args.config {
        Some(path) => TraversalConfig::from_json_file(path)
            .with_context(|| format!("failed to load {}", path.display()))?,
        None => TraversalConfig::default(),
    };
    config.apply_env()?;

    if let Some(endpoint) = &args.endpoint {
        config.endpoint = endpoint.clone();
    }
    if let Some(graph) = &args.graph {
        config.graph = graph.clone();
    }
    if let Some(query) = &args.query {
        config.query = query.clone();
    }
    if let Some(path) = &args.query_file {
        config.query = fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
    }
    if let Some(depth) = args.max_depth {
        config.max_depth = depth;
    }
    if let Some(quantum) = args.quantum {
        config.quantum = quantum;
    }
    if let Some(page_size) = args.page_size {
        config.page_size = page_size;
    }
    if args.step {
        config.mode = TraversalMode::Step;
    }
    if args.depth_first {
        config.policy = FrontierPolicy::DepthFirst;
    }

    config.validate()?;
    Ok(config)
}

fn cmd_run(args: RunArgs) -> Result<()> {
    let config = build_config(&args)?;
    info!(
        endpoint = %config.endpoint,
        graph = %config.graph,
        mode = ?config.mode,
        policy = ?config.policy,
        "configuration loaded"
    );
    let transport = HttpTransport::new(
        config.endpoint.clone(),
        Duration::from_secs(config.timeout_secs),
    )?;

    let rt = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|e| anyhow!("failed to initialize tokio runtime: {e}"))?;

    rt.block_on(execute(config, transport))
}

async fn execute(config: TraversalConfig, transport: HttpTransport) -> Result<()> {
    let mut traversal = Traversal::new(config, Arc::new(transport));
    traversal.on_event(Box::new(report_event));

    let stop = traversal.stop_handle();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            stop.stop();
        }
    });

    match traversal.config().mode {
        TraversalMode::Auto => {
            traversal.run().await?;
        }
        TraversalMode::Step => drive_interactively(&mut traversal).await?,
    }

    if let Some(session) = traversal.session() {
        print!(
            "{}",
            output::render_all_pages(&session.results, traversal.config().page_size)
        );
    }
    Ok(())
}

fn report_event(event: &TraversalEvent) {
    match event {
        TraversalEvent::Started { generation } => {
            eprintln!("{} execution #{generation}", "started".green().bold());
        }
        TraversalEvent::Expanded {
            task,
            solutions,
            queued,
            pending,
        } => {
            eprintln!(
                "{} {} (+{} solutions, {} queued, {} pending)",
                "expanded".cyan(),
                task,
                solutions,
                queued,
                pending
            );
        }
        TraversalEvent::Exhausted { solutions } => {
            eprintln!("{} {} solutions", "done".green().bold(), solutions);
        }
        TraversalEvent::Stopped => eprintln!("{}", "stopped".yellow().bold()),
        TraversalEvent::Failed { message } => {
            eprintln!("{} {}", "error:".red().bold(), message);
        }
    }
}

/// Step mode: Enter expands the next frontier item; `p`/`n` page through the
/// results collected so far; `s` stops; `q` quits.
async fn drive_interactively(traversal: &mut Traversal) -> Result<()> {
    let mut outcome = traversal.start().await?;
    let mut pager = ResultPager::new(traversal.config().page_size);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    while !outcome.is_terminal() {
        let pending = traversal.session().map_or(0, |s| s.frontier.len());
        eprint!("{} [{} pending] > ", "step".bold(), pending);

        let Some(line) = lines.next_line().await? else {
            break;
        };
        match line.trim() {
            "" => outcome = traversal.step().await?,
            "s" | "stop" => {
                traversal.stop();
                outcome = StepOutcome::Stopped;
            }
            "q" | "quit" => break,
            cmd @ ("p" | "n" | "r") => {
                let Some(session) = traversal.session() else {
                    continue;
                };
                let total = session.results.len();
                match cmd {
                    "p" => pager.previous(),
                    "n" => pager.next(total),
                    _ => {}
                }
                print!("{}", output::render_page(&session.results, &pager));
            }
            other => eprintln!(
                "{} unknown command `{other}` (Enter, n, p, r, s, q)",
                "info:".yellow().bold()
            ),
        }
    }
    Ok(())
}

// ============================================================================
// check / rewrite
// ============================================================================

fn cmd_check(input: &PathBuf) -> Result<()> {
    let text = fs::read_to_string(input)
        .with_context(|| format!("failed to read {}", input.display()))?;
    let query = parse_query(&text).map_err(|e| anyhow!("{}: {e}", input.display()))?;
    let registry = PatternRegistry::from_original(&query);

    println!(
        "{} {} ({} triples, {} path patterns)",
        "ok".green().bold(),
        input.display(),
        query.triples.len(),
        registry.len()
    );
    print!("{}", output::render_patterns(&query, &registry));
    Ok(())
}

fn cmd_rewrite(query_file: &PathBuf, signal: &str) -> Result<()> {
    let prior = fs::read_to_string(query_file)
        .with_context(|| format!("failed to read {}", query_file.display()))?;
    let signal: ControlSignal =
        serde_json::from_str(signal).context("control signal is not valid JSON")?;
    let next = expand_query_text(&prior, &signal)?;
    println!("{next}");
    Ok(())
}
