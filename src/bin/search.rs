//! Search binary entry point.
//!
//! Runs a query against arXiv (or a local JSON file of records), computes the
//! similarity network of the results and prints the strongest links together
//! with the summary charts. Supports both single-query and interactive REPL
//! modes, with table or JSON output.
//!
//! # Examples
//!
//! Single query with default settings:
//! ```bash
//! search --query "graph neural networks"
//! ```
//!
//! Encode titles instead of abstracts, keep the 20 strongest links:
//! ```bash
//! search --query "diffusion models" --text-field title --max-edges 20
//! ```
//!
//! Offline run over a saved result set:
//! ```bash
//! search --input papers.json --query offline --format json
//! ```
//!
//! Interactive mode:
//! ```bash
//! search --interactive
//! ```

use anyhow::{Context, Result};
use arxiv_cluster_search::{
    embedding::{fastembed::FastEmbedProvider, EmbeddingProvider},
    pipeline::{
        PipelineConfig, SearchResult, SimilarityPipeline, DEFAULT_MAX_EDGES, DEFAULT_MAX_ENCODED,
        DEFAULT_MAX_RESULTS,
    },
    provider::{arxiv::ArxivProvider, json::JsonFileProvider, RecordProvider},
    stats::ChartStats,
    TextField,
};
use clap::{Parser, ValueEnum};
use comfy_table::{presets::UTF8_FULL, Attribute, Cell, Color, ContentArrangement, Table};
use indicatif::{ProgressBar, ProgressStyle};
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing::{debug, error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Output format for search results
#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    /// Human-friendly tables
    Table,
    /// Machine-readable JSON format
    Json,
}

/// Search arXiv and show the similarity network of the results
#[derive(Parser, Debug)]
#[command(
    name = "search",
    version,
    about = "Search arXiv and link the results by abstract similarity",
    long_about = "Fetch papers matching a query, embed their abstracts and list the most \
                  similar pairs as a network, along with publication statistics.

EXAMPLES:
  Single query:
    search --query \"graph neural networks\"

  Title similarity, top 20 links:
    search --query \"diffusion models\" --text-field title --max-edges 20

  Offline run over a JSON array of records:
    search --input papers.json --query offline --format json

  Interactive mode:
    search --interactive"
)]
struct Args {
    /// Search query (required for single-query mode, omitted in interactive mode)
    #[arg(long, value_name = "TEXT", conflicts_with = "interactive")]
    query: Option<String>,

    /// Read records from a JSON file instead of querying arXiv
    #[arg(long, value_name = "PATH")]
    input: Option<PathBuf>,

    /// Number of papers to fetch
    #[arg(long, value_name = "N", default_value_t = DEFAULT_MAX_RESULTS)]
    max_results: usize,

    /// Number of papers to embed
    #[arg(long, value_name = "N", default_value_t = DEFAULT_MAX_ENCODED)]
    max_encoded: usize,

    /// Number of strongest links to keep
    #[arg(long, value_name = "N", default_value_t = DEFAULT_MAX_EDGES)]
    max_edges: usize,

    /// Paper attribute to embed (summary or title)
    #[arg(long, value_name = "FIELD", default_value = "summary")]
    text_field: TextField,

    /// Output format
    #[arg(long, value_enum, default_value = "table")]
    format: OutputFormat,

    /// Enable interactive REPL mode
    #[arg(long, short = 'i')]
    interactive: bool,

    /// Logging verbosity level
    #[arg(long, default_value = "warn", value_name = "LEVEL")]
    log_level: String,

    /// FastEmbed model cache directory
    #[arg(long, value_name = "DIR")]
    cache_dir: Option<PathBuf>,

    /// arXiv request timeout in seconds
    #[arg(long, value_name = "SECS", default_value = "30")]
    timeout_secs: u64,
}

/// Setup logging with the specified level
fn setup_logging(log_level: &str) {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level)))
        .init();
}

/// Load the embedding model, preferring an explicit cache directory
fn create_embedding_provider(cache_dir: Option<PathBuf>) -> Result<FastEmbedProvider> {
    let cache_dir = cache_dir.or_else(|| dirs::cache_dir().map(|p| p.join("fastembed")));
    if let Some(dir) = &cache_dir {
        debug!("Using model cache directory: {}", dir.display());
    }

    let spinner = create_spinner("Loading embedding model...");
    let provider = FastEmbedProvider::new(None, cache_dir);
    spinner.finish_and_clear();

    let provider = provider.context("Failed to create FastEmbed provider")?;
    info!(
        "Embedding provider ready: {} (dimension: {})",
        provider.model_name(),
        provider.dimension()
    );
    Ok(provider)
}

/// Pick the record source: a local file when given, arXiv otherwise
async fn create_record_provider(
    input: Option<PathBuf>,
    timeout: Duration,
) -> Result<Box<dyn RecordProvider>> {
    match input {
        Some(path) => {
            let provider = JsonFileProvider::from_file(&path)
                .await
                .with_context(|| format!("Failed to load records from {}", path.display()))?;
            Ok(Box::new(provider))
        }
        None => {
            let provider =
                ArxivProvider::new(timeout).context("Failed to create arXiv provider")?;
            Ok(Box::new(provider))
        }
    }
}

fn create_spinner(message: &str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg} [{elapsed}]")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message(message.to_string());
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}

/// Execute a search and return its bundled result
async fn execute_search(
    pipeline: &SimilarityPipeline<FastEmbedProvider>,
    provider: &dyn RecordProvider,
    query: &str,
    max_results: usize,
    config: &PipelineConfig,
) -> Result<SearchResult> {
    debug!("Executing search for query: {}", query);

    let spinner = create_spinner(&format!("Searching {} for '{}'...", provider.name(), query));
    let result = pipeline.search(provider, query, max_results, config).await;
    spinner.finish_and_clear();

    result.with_context(|| format!("Failed to execute search for query: '{}'", query))
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() > max_chars {
        let head: String = text.chars().take(max_chars.saturating_sub(3)).collect();
        format!("{}...", head)
    } else {
        text.to_string()
    }
}

fn new_table(headers: &[&str]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(
            headers
                .iter()
                .map(|h| Cell::new(h).add_attribute(Attribute::Bold))
                .collect::<Vec<_>>(),
        );
    table
}

fn weight_color(weight: f32) -> Color {
    if weight >= 0.8 {
        Color::Green
    } else if weight >= 0.6 {
        Color::Cyan
    } else if weight >= 0.4 {
        Color::Yellow
    } else {
        Color::White
    }
}

/// Format the ranked links as a table
fn format_edges_table(result: &SearchResult) -> String {
    if result.edges().is_empty() {
        return "No links found.".to_string();
    }

    let mut table = new_table(&["Rank", "From", "To", "Weight", "Link"]);
    for (idx, ranked) in result.edges().iter().enumerate() {
        table.add_row(vec![
            Cell::new(idx + 1),
            Cell::new(truncate(&ranked.edge.from, 50)),
            Cell::new(truncate(&ranked.edge.to, 50)),
            Cell::new(format!("{:.4}", ranked.edge.weight)).fg(weight_color(ranked.edge.weight)),
            Cell::new(&ranked.id),
        ]);
    }

    format!("{}\n{}", result.graph().title(), table)
}

/// Format the graph nodes with their links
fn format_nodes_table(result: &SearchResult) -> String {
    let graph = result.graph();
    if graph.nodes().is_empty() {
        return "No nodes in the graph.".to_string();
    }

    let mut table = new_table(&["Node", "Title", "Degree", "Link", "DOI"]);
    for (position, node) in graph.nodes().iter().enumerate() {
        table.add_row(vec![
            Cell::new(position + 1),
            Cell::new(truncate(&node.label, 60)),
            Cell::new(node.degree),
            Cell::new(&node.id),
            Cell::new(node.doi.as_deref().unwrap_or("-")),
        ]);
    }
    table.to_string()
}

fn format_years_table(stats: &ChartStats) -> String {
    if stats.year_trend.is_empty() {
        return "No publication years.".to_string();
    }

    let peak = stats.year_trend.values().copied().max().unwrap_or(0);
    let mut table = new_table(&["Year", "Papers", ""]);
    for (year, count) in &stats.year_trend {
        let bar_len = if peak == 0 { 0 } else { count * 30 / peak };
        table.add_row(vec![
            Cell::new(year),
            Cell::new(count),
            Cell::new("█".repeat(bar_len)).fg(Color::Cyan),
        ]);
    }
    format!("Publication trend by year\n{}", table)
}

fn format_published_table(stats: &ChartStats) -> String {
    let split = &stats.published_split;
    let mut table = new_table(&["Status", "Papers", "Share"]);
    table.add_row(vec![
        Cell::new("Published").fg(Color::Green),
        Cell::new(split.published),
        Cell::new(format!("{:.1}%", split.published_percentage())),
    ]);
    table.add_row(vec![
        Cell::new("Unpublished").fg(Color::Yellow),
        Cell::new(split.unpublished),
        Cell::new(format!("{:.1}%", split.unpublished_percentage())),
    ]);
    format!("Published vs unpublished papers\n{}", table)
}

fn format_keywords_table(stats: &ChartStats) -> String {
    if stats.keywords.is_empty() {
        return "No keywords.".to_string();
    }

    let mut table = new_table(&["Keyword", "Count"]);
    for keyword in &stats.keywords {
        table.add_row(vec![Cell::new(&keyword.word), Cell::new(keyword.count)]);
    }
    format!("Keyword cloud\n{}", table)
}

/// Format results as JSON
fn format_results_json(result: &SearchResult) -> Result<String> {
    serde_json::to_string_pretty(result).context("Failed to serialize results to JSON")
}

fn print_result(result: &SearchResult, format: OutputFormat, elapsed: Duration) -> Result<()> {
    match format {
        OutputFormat::Table => {
            println!("{}", format_edges_table(result));
            println!("{}", format_years_table(result.stats()));
            println!("{}", format_published_table(result.stats()));
            println!(
                "\nFound {} papers, {} links in {:.2}s",
                result.records().len(),
                result.edges().len(),
                elapsed.as_secs_f64()
            );
        }
        OutputFormat::Json => println!("{}", format_results_json(result)?),
    }
    Ok(())
}

fn print_help() {
    println!("Commands:");
    println!("  <query>          - Search arXiv");
    println!("  /results N       - Fetch N papers per search");
    println!("  /papers N        - Embed the first N papers");
    println!("  /links N         - Keep the N strongest links");
    println!("  /field FIELD     - Embed 'summary' or 'title'");
    println!("  /format table    - Use table output format");
    println!("  /format json     - Use JSON output format");
    println!("  /nodes           - List the nodes of the last graph");
    println!("  /open N          - Show the link of node N");
    println!("  /years           - Publication trend of the last search");
    println!("  /published       - Published vs unpublished papers");
    println!("  /cloud           - Keyword cloud of the last search");
    println!("  /help            - Show this help");
    println!("  Ctrl+D or Ctrl+C - Exit");
}

fn parse_positive(parts: &[&str], usage: &str) -> Option<usize> {
    if parts.len() != 2 {
        eprintln!("Usage: {}", usage);
        return None;
    }
    match parts[1].parse::<usize>() {
        Ok(n) if n > 0 => Some(n),
        _ => {
            eprintln!("Invalid number: must be a positive integer");
            None
        }
    }
}

/// Run interactive REPL mode
async fn run_interactive(
    pipeline: SimilarityPipeline<FastEmbedProvider>,
    provider: Box<dyn RecordProvider>,
    mut max_results: usize,
    mut config: PipelineConfig,
    mut format: OutputFormat,
) -> Result<()> {
    println!("Interactive arXiv Cluster Search");
    print_help();
    println!();

    let mut rl = DefaultEditor::new().context("Failed to create readline editor")?;

    // replaced wholesale by every successful search
    let mut last_result: Option<SearchResult> = None;

    loop {
        match rl.readline("Search> ") {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }

                rl.add_history_entry(line).ok();

                if line.starts_with('/') {
                    let parts: Vec<&str> = line.split_whitespace().collect();
                    match parts[0] {
                        "/help" => print_help(),
                        "/results" => {
                            if let Some(n) = parse_positive(&parts, "/results N") {
                                max_results = n;
                                println!("Fetching {} papers per search", n);
                            }
                        }
                        "/papers" => {
                            if let Some(n) = parse_positive(&parts, "/papers N") {
                                config.max_encoded = n;
                                println!("Embedding the first {} papers", n);
                            }
                        }
                        "/links" => {
                            if let Some(n) = parse_positive(&parts, "/links N") {
                                config.max_edges = n;
                                println!("Keeping the {} strongest links", n);
                            }
                        }
                        "/field" => match parts.get(1).map(|f| f.parse::<TextField>()) {
                            Some(Ok(field)) => {
                                config.text_field = field;
                                println!("Embedding paper {}", field);
                            }
                            Some(Err(e)) => eprintln!("{}", e),
                            None => eprintln!("Usage: /field [summary|title]"),
                        },
                        "/format" => match parts.get(1).copied() {
                            Some("table") => {
                                format = OutputFormat::Table;
                                println!("Set output format to table");
                            }
                            Some("json") => {
                                format = OutputFormat::Json;
                                println!("Set output format to JSON");
                            }
                            _ => eprintln!("Usage: /format [table|json]"),
                        },
                        "/nodes" | "/open" | "/years" | "/published" | "/cloud" => {
                            let Some(result) = &last_result else {
                                eprintln!("No search yet. Enter a query first.");
                                continue;
                            };
                            match parts[0] {
                                "/nodes" => println!("{}", format_nodes_table(result)),
                                "/years" => println!("{}", format_years_table(result.stats())),
                                "/published" => {
                                    println!("{}", format_published_table(result.stats()))
                                }
                                "/cloud" => println!("{}", format_keywords_table(result.stats())),
                                _ => {
                                    if let Some(n) = parse_positive(&parts, "/open N") {
                                        match result.graph().link_for(n - 1) {
                                            Some(link) => println!("{}", link),
                                            None => eprintln!(
                                                "Node {} out of range (graph has {} nodes)",
                                                n,
                                                result.graph().nodes().len()
                                            ),
                                        }
                                    }
                                }
                            }
                        }
                        _ => eprintln!(
                            "Unknown command: {}. Type /help for available commands.",
                            parts[0]
                        ),
                    }
                } else {
                    let start = Instant::now();
                    match execute_search(&pipeline, provider.as_ref(), line, max_results, &config)
                        .await
                    {
                        Ok(result) => {
                            if let Err(e) = print_result(&result, format, start.elapsed()) {
                                eprintln!("Error formatting results: {}", e);
                            }
                            last_result = Some(result);
                        }
                        Err(e) => eprintln!("Search failed: {:#}", e),
                    }
                }
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => {
                println!("Goodbye!");
                break;
            }
            Err(err) => {
                error!("Error reading input: {}", err);
                break;
            }
        }
    }

    Ok(())
}

/// Run single-query mode
async fn run_single_query(
    pipeline: SimilarityPipeline<FastEmbedProvider>,
    provider: Box<dyn RecordProvider>,
    query: &str,
    max_results: usize,
    config: PipelineConfig,
    format: OutputFormat,
) -> Result<()> {
    let start = Instant::now();
    let result = execute_search(&pipeline, provider.as_ref(), query, max_results, &config).await?;
    print_result(&result, format, start.elapsed())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    setup_logging(&args.log_level);

    let query = match (&args.query, args.interactive) {
        (Some(query), false) => Some(query.clone()),
        (None, true) => None,
        _ => anyhow::bail!(
            "Either --query or --interactive must be specified.\n\
             Use --help for usage information."
        ),
    };

    if args.max_results == 0 {
        anyhow::bail!("--max-results must be a positive integer");
    }
    let config = PipelineConfig::new(args.text_field, args.max_encoded, args.max_edges)
        .context("Invalid pipeline configuration")?;
    info!("Pipeline configuration: {:?}", config);

    let provider =
        create_record_provider(args.input, Duration::from_secs(args.timeout_secs)).await?;
    info!("Record source: {}", provider.name());

    let pipeline = SimilarityPipeline::new(create_embedding_provider(args.cache_dir)?);

    match query {
        Some(query) => {
            run_single_query(pipeline, provider, &query, args.max_results, config, args.format)
                .await
        }
        None => run_interactive(pipeline, provider, args.max_results, config, args.format).await,
    }
}
