//! Sequential crawl: resolve the company if needed, then walk listing pages
//! until there is no "Next" link or test mode stops after the first page.

use std::collections::HashSet;

use tracing::{debug, info, warn};
use url::Url;

use crate::config::{COMPANY_NOT_FOUND, ScrapeConfig, Selectors};
use crate::error::ScrapeError;
use crate::fetch::PageFetcher;
use crate::input::{CompanyTarget, ScrapeRequest};
use crate::listing::parse_listing_page;
use crate::resolver::{CompanyQuery, resolve_company};
use crate::sink::MovieSink;

/// Why the crawl stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CrawlOutcome {
    /// Last page had no "Next" link.
    #[default]
    Exhausted,
    /// Test mode capped the crawl at one page.
    TestModeCap,
    /// No company lookup row matched; nothing was emitted.
    CompanyNotFound,
    /// A "Next" link pointed back at an already fetched page.
    RevisitedPage,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrawlSummary {
    pub pages: usize,
    pub movies: usize,
    pub empty_pages: usize,
    pub outcome: CrawlOutcome,
}

pub struct Crawler<F> {
    fetcher: F,
    config: ScrapeConfig,
    selectors: Selectors,
}

impl<F: PageFetcher> Crawler<F> {
    pub fn new(fetcher: F, config: ScrapeConfig) -> Result<Self, ScrapeError> {
        Ok(Self {
            fetcher,
            config,
            selectors: Selectors::imdb()?,
        })
    }

    pub async fn run<S: MovieSink + ?Sized>(
        &self,
        request: &ScrapeRequest,
        sink: &mut S,
    ) -> Result<CrawlSummary, ScrapeError> {
        let mut summary = CrawlSummary::default();

        let start = match &request.target {
            CompanyTarget::Id(company_id) => self.config.listing_url(company_id)?,
            CompanyTarget::Name(query) => match self.resolve(query).await? {
                Some(url) => url,
                None => {
                    warn!(
                        company = %query.name,
                        country = ?query.country,
                        kind = ?query.kind,
                        "{COMPANY_NOT_FOUND}"
                    );
                    summary.outcome = CrawlOutcome::CompanyNotFound;
                    return Ok(summary);
                }
            },
        };

        info!(%start, test_mode = request.test_mode, "starting crawl");

        let mut visited = HashSet::new();
        let mut next = Some(start);
        while let Some(url) = next.take() {
            if !visited.insert(url.clone()) {
                warn!(%url, "next link points at a page already crawled, stopping");
                summary.outcome = CrawlOutcome::RevisitedPage;
                break;
            }

            let page = self.fetcher.fetch(&url).await?;
            summary.pages += 1;

            let listing = parse_listing_page(&page.body, &page.url, &self.selectors);
            info!(url = %page.url, movies = listing.movies.len(), "parsed listing page");

            if listing.movies.is_empty() {
                // next link is still followed below
                summary.empty_pages += 1;
                warn!(
                    url = %page.url,
                    "no movie blocks found, site structure changed or request blocked"
                );
            }

            for movie in &listing.movies {
                debug!(id = ?movie.id, title = ?movie.title, "movie extracted");
                sink.push(movie)?;
                summary.movies += 1;
            }

            if request.test_mode {
                summary.outcome = CrawlOutcome::TestModeCap;
                break;
            }
            next = listing.next_page;
        }

        sink.flush()?;
        info!(
            pages = summary.pages,
            movies = summary.movies,
            empty_pages = summary.empty_pages,
            outcome = ?summary.outcome,
            "crawl finished"
        );
        Ok(summary)
    }

    async fn resolve(&self, query: &CompanyQuery) -> Result<Option<Url>, ScrapeError> {
        let lookup = self.config.company_search_url(&query.name)?;
        info!(%lookup, company = %query.name, "looking up company");
        let page = self.fetcher.fetch(&lookup).await?;
        Ok(resolve_company(&page.body, &page.url, query, &self.selectors))
    }
}
