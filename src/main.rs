use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use imdb_company_scrape::{
    ActorInput, CompanyTarget, Crawler, HttpFetcher, JsonLinesSink, RssSink,
    ScrapeConfig, ScrapeRequest,
};

/// Crawl IMDb's title search for one production or distribution company.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// Actor input file with CompanyName, CompanyId, Type, Country and Testing keys
    #[arg(long)]
    input: Option<PathBuf>,

    /// IMDb company id, e.g. co0071509 (skips the name lookup)
    #[arg(long, env = "COMPANY_ID")]
    company_id: Option<String>,

    /// Company name to look up
    #[arg(long, env = "COMPANY_NAME")]
    company_name: Option<String>,

    /// Country tag the lookup row must carry, e.g. US
    #[arg(long, env = "COMPANY_COUNTRY")]
    country: Option<String>,

    /// Company type substring, e.g. "production" or "distributors"
    #[arg(long = "type", env = "COMPANY_TYPE")]
    company_type: Option<String>,

    /// Only crawl the first listing page
    #[arg(long, env = "TESTING")]
    testing: bool,

    /// Write JSON Lines here instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Also write an RSS feed of the crawled titles
    #[arg(long)]
    rss: Option<PathBuf>,

    /// Request timeout in seconds
    #[arg(long, default_value_t = 30)]
    timeout: u64,

    /// Crawl another origin instead of https://www.imdb.com
    #[arg(long, hide = true)]
    origin: Option<String>,
}

impl Cli {
    /// Flags and environment override the input file.
    fn actor_input(&self) -> Result<ActorInput, Box<dyn std::error::Error>> {
        let mut input = match &self.input {
            Some(path) => ActorInput::from_path(path)?,
            None => ActorInput::default(),
        };
        if let Some(id) = &self.company_id {
            input.company_id = Some(id.clone());
        }
        if let Some(name) = &self.company_name {
            input.company_name = Some(name.clone());
        }
        if let Some(country) = &self.country {
            input.country = Some(country.clone());
        }
        if let Some(kind) = &self.company_type {
            input.company_type = Some(kind.clone());
        }
        input.testing |= self.testing;
        Ok(input)
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let request = ScrapeRequest::try_from(cli.actor_input()?)?;

    let config = match &cli.origin {
        Some(origin) => ScrapeConfig::with_origin(origin)?,
        None => ScrapeConfig::default(),
    }
    .with_timeout(Duration::from_secs(cli.timeout));

    let fetcher = HttpFetcher::new(&config)?;
    let crawler = Crawler::new(fetcher, config.clone())?;

    let mut rss = cli.rss.as_ref().map(|_| {
        let name = match &request.target {
            CompanyTarget::Id(id) => id.clone(),
            CompanyTarget::Name(query) => query.name.clone(),
        };
        RssSink::new(format!("IMDb titles: {name}"), config.origin.to_string())
    });

    let writer: Box<dyn Write> = match &cli.output {
        Some(path) => Box::new(BufWriter::new(File::create(path)?)),
        None => Box::new(io::stdout().lock()),
    };
    let mut jsonl = JsonLinesSink::new(writer);

    crawler.run(&request, &mut (&mut jsonl, &mut rss)).await?;

    if let (Some(path), Some(feed)) = (&cli.rss, &rss) {
        feed.write_to(path)?;
        info!(path = %path.display(), titles = feed.len(), "wrote RSS feed");
    }

    Ok(())
}
