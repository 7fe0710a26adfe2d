//! Coauthorship network builder - Entry Point
//!
//! Builds one-hop collaboration networks from PubMed and arXiv for each
//! requested author and writes them to the result directory.

use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use coauthor_graph::config::{BuildOptions, Config, DEFAULT_MAJOR_KEYWORDS, Sources};
use coauthor_graph::driver::{AuthorName, DEFAULT_RESULT_DIR, Driver};
use coauthor_graph::formatters::format_graph_summary;
use coauthor_graph::network::ProfileBuilder;

#[derive(Parser, Debug)]
#[command(name = "coauthor-graph")]
#[command(about = "Build coauthorship networks from PubMed and arXiv")]
#[command(version)]
struct Cli {
    /// Author to profile as "Forename|Surname" (repeatable)
    #[arg(long = "author", required = true, value_name = "FORENAME|SURNAME")]
    authors: Vec<AuthorName>,

    /// Directory for result files
    #[arg(long, default_value = DEFAULT_RESULT_DIR)]
    result_dir: PathBuf,

    /// Rebuild result files even if they already exist
    #[arg(long)]
    overwrite: bool,

    /// Ignore papers published before this year
    #[arg(long, default_value_t = BuildOptions::DEFAULT_START_YEAR)]
    start_year: i32,

    /// Middle-authorship papers allowed per year before a name is rejected
    #[arg(long, default_value_t = BuildOptions::DEFAULT_MAX_ANNUAL_PAPERS)]
    max_annual_papers: u32,

    /// Skip arXiv preprints
    #[arg(long)]
    no_arxiv: bool,

    /// Major keyword categories in priority order (comma separated)
    #[arg(long, value_delimiter = ',')]
    major_keywords: Option<Vec<String>>,

    /// NCBI API key (optional, enables higher rate limits)
    #[arg(long, env = "NCBI_API_KEY")]
    api_key: Option<String>,

    /// Contact email sent to NCBI
    #[arg(long, env = "NCBI_EMAIL")]
    email: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info", env = "RUST_LOG")]
    log_level: String,

    /// Output logs as JSON
    #[arg(long)]
    json_logs: bool,
}

impl Cli {
    fn build_options(&self) -> BuildOptions {
        let major_keywords = self.major_keywords.as_ref().map_or_else(
            || DEFAULT_MAJOR_KEYWORDS.iter().map(|k| (*k).to_string()).collect(),
            |keywords| {
                keywords
                    .iter()
                    .map(|k| k.trim().to_lowercase())
                    .filter(|k| !k.is_empty())
                    .collect()
            },
        );

        BuildOptions {
            start_year: self.start_year,
            max_annual_papers: self.max_annual_papers,
            sources: if self.no_arxiv { Sources::Literature } else { Sources::Both },
            major_keywords,
            ..BuildOptions::default()
        }
    }
}

fn init_tracing(log_level: &str, json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    let subscriber = tracing_subscriber::registry().with(filter);

    if json {
        subscriber.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        subscriber.with(tracing_subscriber::fmt::layer().compact()).init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_tracing(&cli.log_level, cli.json_logs);

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        authors = cli.authors.len(),
        result_dir = %cli.result_dir.display(),
        "Starting coauthor-graph"
    );

    let config = Config::from_env()?.with_ncbi_credentials(cli.api_key.clone(), cli.email.clone());
    tracing::info!(
        ncbi_api_key = config.has_api_key(),
        eutils_delay_ms = config.eutils_delay.as_millis(),
        arxiv_delay_ms = config.arxiv_delay.as_millis(),
        max_retries = config.max_retries,
        "Request pacing"
    );

    let profiles = ProfileBuilder::from_config(&config, cli.build_options())?;
    let driver = Driver::new(profiles, &cli.result_dir, cli.overwrite);

    let mut failed = 0_usize;
    for author in &cli.authors {
        match driver.run_author(author).await {
            Ok(summary) => println!("{}", format_graph_summary(&summary.seed, &summary.tables)),
            Err(err) => {
                tracing::error!(author = %author, error = %err, "{}", err.to_user_message());
                failed += 1;
            }
        }
    }

    tracing::info!(total = cli.authors.len(), failed, "Run complete");
    Ok(())
}
