//! Fixed crawl configuration: origin, URL templates, HTTP identity and the
//! selector table for IMDb's advanced search and company lookup pages.

use std::time::Duration;

use scraper::Selector;
use url::Url;
use url::form_urlencoded::byte_serialize;

use crate::error::ScrapeError;

pub const IMDB_ORIGIN: &str = "https://www.imdb.com";
pub const USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:101.0) Gecko/20100101 Firefox/101.0";
pub const ACCEPT: &str =
    "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,*/*;q=0.8";
pub const ACCEPT_LANGUAGE: &str = "en-GB,en;q=0.5";

/// Tracking suffix IMDb appends to poster links on listing pages.
pub const TRACKING_SUFFIX: &str = "?ref_=adv_li_i";
/// Replaces everything from `V1_` onward in a thumbnail URL.
pub const BIG_POSTER_SUFFIX: &str = "V1_SY1000_CR0,0,674,1000_AL_.jpg";

pub const STARS_MARKER: &str = "Stars";
pub const VOTES_LABEL: &str = "Votes";
pub const NEXT_MARKER: &str = "Next";

pub const COMPANY_NOT_FOUND: &str = "Cannot find company, type and country!";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Immutable settings shared by the fetcher and the crawler.
#[derive(Debug, Clone)]
pub struct ScrapeConfig {
    pub origin: Url,
    pub user_agent: String,
    pub timeout: Duration,
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        Self {
            origin: Url::parse(IMDB_ORIGIN).expect("IMDB_ORIGIN is a valid URL"),
            user_agent: USER_AGENT.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl ScrapeConfig {
    /// Same settings pointed at another origin (a mirror or a local mock server).
    pub fn with_origin(origin: &str) -> Result<Self, ScrapeError> {
        let origin = Url::parse(origin).map_err(|e| ScrapeError::invalid_url(origin, e))?;
        Ok(Self {
            origin,
            ..Self::default()
        })
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// `{origin}/search/title/?companies={company_id}`
    pub fn listing_url(&self, company_id: &str) -> Result<Url, ScrapeError> {
        self.join(&format!("/search/title/?companies={company_id}"))
    }

    /// `{origin}/find?s=co&q={name}&ref_=nv_sr_sm`, name lower-cased and form-encoded.
    pub fn company_search_url(&self, company_name: &str) -> Result<Url, ScrapeError> {
        let query: String = byte_serialize(company_name.to_lowercase().as_bytes()).collect();
        self.join(&format!("/find?s=co&q={query}&ref_=nv_sr_sm"))
    }

    /// Value for the `Host` header, port included when the origin has one.
    pub fn host(&self) -> &str {
        &self.origin[url::Position::BeforeHost..url::Position::AfterPort]
    }

    fn join(&self, path: &str) -> Result<Url, ScrapeError> {
        self.origin
            .join(path)
            .map_err(|e| ScrapeError::invalid_url(path, e))
    }
}

/// Compiled selectors for listing and company lookup pages.
#[derive(Debug, Clone)]
pub struct Selectors {
    pub movie_block: Selector,
    pub title_link: Selector,
    pub year: Selector,
    pub poster: Selector,
    pub certificate: Selector,
    pub runtime: Selector,
    pub genre: Selector,
    pub rating: Selector,
    pub plot: Selector,
    pub anchor: Selector,
    pub paragraph: Selector,
    pub votes: Selector,
    pub next_link: Selector,
    pub company_row: Selector,
    pub company_link: Selector,
}

impl Selectors {
    pub fn imdb() -> Result<Self, ScrapeError> {
        Ok(Self {
            movie_block: parse(r#"[class="lister-item mode-advanced"]"#)?,
            title_link: parse(r#"a[href*="/title/"]"#)?,
            year: parse(r#"span[class="lister-item-year text-muted unbold"]"#)?,
            poster: parse("a > img[loadlate]")?,
            certificate: parse(r#"span[class="certificate"]"#)?,
            runtime: parse(r#"span[class="runtime"]"#)?,
            genre: parse(r#"span[class="genre"]"#)?,
            rating: parse(r#"div[class="ratings-bar"] strong"#)?,
            plot: parse(r#"p[class="text-muted"]"#)?,
            anchor: parse("a")?,
            paragraph: parse("p[class]")?,
            votes: parse(r#"p[class="sort-num_votes-visible"] > span"#)?,
            next_link: parse("a[href]")?,
            company_row: parse(r#"table[class="findList"] tr"#)?,
            company_link: parse("a[href]")?,
        })
    }
}

fn parse(selector: &'static str) -> Result<Selector, ScrapeError> {
    Selector::parse(selector).map_err(|e| ScrapeError::Selector {
        selector,
        message: e.to_string(),
    })
}
