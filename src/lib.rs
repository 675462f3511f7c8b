use rss::{ChannelBuilder, ItemBuilder};
use serde::Serialize;

pub mod config;
pub mod crawler;
pub mod error;
pub mod fetch;
pub mod input;
pub mod listing;
pub mod resolver;
pub mod sink;

pub use config::{ScrapeConfig, Selectors};
pub use crawler::{CrawlOutcome, CrawlSummary, Crawler};
pub use error::ScrapeError;
pub use fetch::{HttpFetcher, Page, PageFetcher};
pub use input::{ActorInput, CompanyTarget, ScrapeRequest};
pub use resolver::CompanyQuery;
pub use sink::{JsonLinesSink, MovieSink, RssSink};

/// One movie entry from an IMDb advanced search listing.
///
/// Fields serialize in declaration order; absent fields become `null`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MovieRecord {
    pub id: Option<String>,
    pub title: Option<String>,
    pub year: Option<String>,
    pub certificate: Option<String>,
    pub runtime: Option<String>,
    pub genre: Option<String>,
    pub rating: Option<String>,
    pub plot: Option<String>,
    pub stars: Stars,
    pub votes: Option<String>,
    pub url: Option<String>,
    pub poster_url: Option<String>,
    pub big_poster_url: Option<String>,
}

/// Cast names, from whichever extraction pass produced them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Stars {
    /// Linked cast names joined with `"| "`.
    Joined(String),
    /// Raw text fragments following the "Stars" label, for entries without cast links.
    Listed(Vec<String>),
}

impl Default for Stars {
    fn default() -> Self {
        Stars::Listed(Vec::new())
    }
}

impl Stars {
    pub fn is_empty(&self) -> bool {
        match self {
            Stars::Joined(names) => names.is_empty(),
            Stars::Listed(names) => names.is_empty(),
        }
    }

    /// Human-readable form used in feed descriptions.
    pub fn display(&self) -> String {
        match self {
            Stars::Joined(names) => names.clone(),
            Stars::Listed(names) => names
                .iter()
                .map(|n| n.trim())
                .filter(|n| !n.is_empty())
                .collect::<Vec<_>>()
                .join(", "),
        }
    }
}

/// Generate an RSS feed from a list of movies
pub fn generate_rss(
    movies: &[MovieRecord],
    channel_title: &str,
    channel_link: &str,
    channel_description: &str,
) -> Result<String, ScrapeError> {
    let mut items = Vec::new();

    for movie in movies {
        // Build description from available fields
        let mut description_parts = Vec::new();

        if let Some(ref plot) = movie.plot {
            description_parts.push(plot.clone());
        }

        if !movie.stars.is_empty() {
            description_parts.push(format!("Stars: {}", movie.stars.display()));
        }

        if let Some(ref year) = movie.year {
            description_parts.push(format!("Year: {}", year));
        }

        if let Some(ref runtime) = movie.runtime {
            description_parts.push(format!("Runtime: {}", runtime));
        }

        if let Some(ref genre) = movie.genre {
            description_parts.push(format!("Genre: {}", genre));
        }

        if let Some(ref rating) = movie.rating {
            description_parts.push(format!("Rating: {}", rating));
        }

        if let Some(poster) = movie.big_poster_url.as_ref().or(movie.poster_url.as_ref()) {
            description_parts.push(format!("<img src=\"{}\" alt=\"Poster\" />", poster));
        }

        let title = movie
            .title
            .clone()
            .or_else(|| movie.id.clone())
            .unwrap_or_else(|| "Untitled".to_string());

        let description = if description_parts.is_empty() {
            format!("Movie: {}", title)
        } else {
            description_parts.join("<br/>\n")
        };

        let mut item_builder = ItemBuilder::default();
        item_builder.title(title);
        item_builder.description(description);
        if let Some(ref url) = movie.url {
            item_builder.link(url.clone());
            item_builder.guid(rss::Guid {
                value: url.clone(),
                permalink: true,
            });
        }

        items.push(item_builder.build());
    }

    let channel = ChannelBuilder::default()
        .title(channel_title)
        .link(channel_link)
        .description(channel_description)
        .last_build_date(chrono::Utc::now().to_rfc2822())
        .items(items)
        .build();

    let mut buf = Vec::new();
    channel.write_to(&mut buf)?;
    Ok(String::from_utf8(buf)?)
}
