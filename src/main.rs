use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};

use cat_finder::app::analyze_use_case::AnalyzeUseCase;
use cat_finder::app::ports::CompanyCollector;
use cat_finder::collectors::create_collector;
use cat_finder::config::CatConfig;
use cat_finder::constants::{self, DEFAULT_OUTPUT_PATH};
use cat_finder::infra::csv_store::CsvStore;
use cat_finder::infra::http_client::ReqwestHttp;
use cat_finder::infra::rate_limiter::{Limits, RateLimiter};
use cat_finder::infra::website_analyzer::WebsiteAnalyzer;
use cat_finder::logging;
use cat_finder::pipeline::processing::evidence::EvidenceExtractor;
use cat_finder::pipeline::CatPipeline;

#[derive(Parser)]
#[command(name = "cat_finder")]
#[command(about = "Finds Russian companies that use CAT (computer-assisted translation) tools")]
#[command(version = "0.1.0")]
struct Cli {
    /// TOML configuration file (defaults to $CAT_FINDER_CONFIG, then built-in lists)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Collect companies, classify them and write the result file
    Collect {
        /// Where to write the CSV result
        #[arg(long, short, default_value = DEFAULT_OUTPUT_PATH)]
        output: PathBuf,
        /// Sources to collect from (comma-separated). Available: rusprofile, catalog, all
        #[arg(long, default_value = constants::ALL_SOURCES)]
        sources: String,
        /// Also drop companies with implausible revenue figures
        #[arg(long)]
        strict_revenue: bool,
    },
    /// Summarize an existing result file
    Analyze {
        #[arg(long, short, default_value = DEFAULT_OUTPUT_PATH)]
        output: PathBuf,
    },
}

async fn collect(
    config: Arc<CatConfig>,
    output: &Path,
    sources: &str,
    strict_revenue: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let (source_names, unknown) = constants::resolve_sources(sources);
    for name in &unknown {
        warn!(source = %name, "Unknown source");
        println!(
            "⚠️  Unknown source: {} (supported: {})",
            name,
            constants::get_supported_sources().join(", ")
        );
    }

    let collectors: Vec<Box<dyn CompanyCollector>> = source_names
        .iter()
        .filter_map(|name| create_collector(name, config.clone()))
        .collect();

    let http = Arc::new(ReqwestHttp::new(&config.http)?);
    let limiter = Arc::new(RateLimiter::new(Limits::from(&config.http)));
    let website = Arc::new(WebsiteAnalyzer::new(
        http,
        limiter,
        EvidenceExtractor::new(config.clone()),
        Duration::from_millis(config.http.batch_delay_ms),
    ));

    let pipeline = CatPipeline::new(config, collectors, website, Arc::new(CsvStore::new()))
        .with_strict_revenue(strict_revenue);

    println!("🚀 Collecting and processing company data...");
    let report = pipeline.run(output).await?;

    println!("\n📊 Pipeline Results:");
    println!("   Collected: {}", report.collected);
    println!("   After cleaning: {}", report.cleaned);
    println!("   After revenue filter: {}", report.after_revenue);
    println!("   After CAT classification: {}", report.after_classification);
    println!("   Saved: {}", report.saved);
    println!("   Output file: {}", report.output_path.display());
    if let Some(reason) = &report.fallback_reason {
        println!("\n⚠️  Demonstration data written ({})", reason);
    }
    if !report.errors.is_empty() {
        println!("\n⚠️  Errors encountered:");
        for error in &report.errors {
            println!("   - {}", error);
        }
    }
    Ok(())
}

fn analyze(output: &Path) -> Result<(), Box<dyn std::error::Error>> {
    println!("🔍 Analyzing {}...", output.display());
    let store = CsvStore::new();
    let report = AnalyzeUseCase::new(&store).run(output)?;

    println!("   Companies loaded: {}", report.total);
    println!("   Passing base validation: {}", report.valid);
    if let Some(revenue) = &report.revenue {
        println!("   Average revenue: {:.0} ₽", revenue.average);
        println!("   Maximum revenue: {:.0} ₽", revenue.max);
        println!("   Minimum revenue: {:.0} ₽", revenue.min);
    }
    println!("\n📚 Companies by source:");
    for (source, count) in &report.by_source {
        println!("   {}: {}", source, count);
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();
    logging::init_logging();

    let cli = Cli::parse();
    let config = Arc::new(CatConfig::resolve(cli.config.as_deref())?);
    info!(
        keywords = config.cat_keywords.len(),
        products = config.cat_products.len(),
        phrases = config.cat_phrases.len(),
        min_revenue = config.min_revenue,
        "Configuration loaded"
    );

    let command = cli.command.unwrap_or(Commands::Collect {
        output: PathBuf::from(DEFAULT_OUTPUT_PATH),
        sources: constants::ALL_SOURCES.to_string(),
        strict_revenue: false,
    });

    let result = match command {
        Commands::Collect {
            output,
            sources,
            strict_revenue,
        } => collect(config, &output, &sources, strict_revenue).await,
        Commands::Analyze { output } => analyze(&output),
    };

    if let Err(e) = &result {
        error!("Run failed: {}", e);
        println!("❌ Run failed: {}", e);
    }
    result
}
