//! Parser for IMDb advanced search result pages.
//! Listing: https://www.imdb.com/search/title/?companies=co0071509
//! Each `lister-item mode-advanced` block becomes one `MovieRecord`.

use std::sync::LazyLock;

use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use url::Url;

use crate::config::{
    BIG_POSTER_SUFFIX, NEXT_MARKER, STARS_MARKER, Selectors, TRACKING_SUFFIX, VOTES_LABEL,
};
use crate::{MovieRecord, Stars};

static MOVIE_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"tt\d+").expect("invalid regex: movie id"));

static POSTER_SIZE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"V1_.+").expect("invalid regex: poster size"));

/// Everything extracted from one listing page.
#[derive(Debug, Clone, Default)]
pub struct ListingPage {
    pub movies: Vec<MovieRecord>,
    pub next_page: Option<Url>,
}

pub fn parse_listing_page(html: &str, page_url: &Url, selectors: &Selectors) -> ListingPage {
    let document = Html::parse_document(html);

    let movies = document
        .select(&selectors.movie_block)
        .map(|block| parse_movie_block(block, page_url, selectors))
        .collect();

    let next_page = document
        .select(&selectors.next_link)
        .find(|a| first_own_text_contains(*a, NEXT_MARKER))
        .and_then(|a| a.value().attr("href"))
        .and_then(|href| page_url.join(href.trim()).ok());

    ListingPage { movies, next_page }
}

fn parse_movie_block(block: ElementRef, page_url: &Url, selectors: &Selectors) -> MovieRecord {
    let title = block
        .select(&selectors.title_link)
        .flat_map(own_text)
        .map(str::trim)
        .find(|t| !t.is_empty())
        .map(String::from);

    let url = block
        .select(&selectors.title_link)
        .next()
        .and_then(|a| a.value().attr("href"))
        .and_then(|href| page_url.join(href.trim()).ok())
        .map(|url| canonical_url(url.as_str()));

    let id = url.as_deref().and_then(movie_id);

    let poster_url = block
        .select(&selectors.poster)
        .next()
        .and_then(|img| img.value().attr("loadlate"))
        .map(|src| src.trim().to_string());
    let big_poster_url = poster_url.as_deref().map(big_poster);

    MovieRecord {
        id,
        title,
        year: optional_field(block, &selectors.year, |t| t.replace(['(', ')'], "").trim().to_string()),
        certificate: optional_field(block, &selectors.certificate, str::to_string),
        runtime: optional_field(block, &selectors.runtime, str::to_string),
        genre: optional_field(block, &selectors.genre, str::to_string),
        rating: optional_field(block, &selectors.rating, str::to_string),
        plot: optional_field(block, &selectors.plot, str::to_string),
        stars: extract_stars(block, selectors),
        votes: extract_votes(block, &selectors.votes),
        url,
        poster_url,
        big_poster_url,
    }
}

/// First direct text node under `selector`, trimmed and passed through `transform`.
/// `None` when the selector matches nothing.
fn optional_field<T>(
    block: ElementRef,
    selector: &Selector,
    transform: impl FnOnce(&str) -> T,
) -> Option<T> {
    block
        .select(selector)
        .flat_map(own_text)
        .next()
        .map(|t| transform(t.trim()))
}

/// Linked cast names first; loose text after the "Stars" label when there are none.
fn extract_stars(block: ElementRef, selectors: &Selectors) -> Stars {
    let linked = linked_stars(block, &selectors.anchor);
    if linked.is_empty() {
        Stars::Listed(loose_stars(block, &selectors.paragraph))
    } else {
        Stars::Joined(linked.join("| "))
    }
}

/// Anchor text under any element whose leading text mentions "Stars".
fn linked_stars<'a>(block: ElementRef<'a>, anchor: &Selector) -> Vec<&'a str> {
    block
        .select(anchor)
        .filter(|a| {
            a.ancestors()
                .take_while(|node| *node != *block)
                .filter_map(ElementRef::wrap)
                .any(|el| first_own_text_contains(el, STARS_MARKER))
        })
        .flat_map(own_text)
        .collect()
}

/// Text fragments of `<p class="">` from the "Stars" label on, skipping
/// layout whitespace (anything containing a newline).
fn loose_stars(block: ElementRef, paragraph: &Selector) -> Vec<String> {
    let mut after_marker = false;
    let mut names = Vec::new();
    let fragments = block
        .select(paragraph)
        .filter(|p| p.value().attr("class") == Some(""))
        .flat_map(|p| p.text());
    for fragment in fragments {
        if fragment.contains(STARS_MARKER) {
            after_marker = true;
        }
        if after_marker && !fragment.contains('\n') {
            names.push(fragment.to_string());
        }
    }
    names
}

fn extract_votes(block: ElementRef, votes: &Selector) -> Option<String> {
    block
        .select(votes)
        .flat_map(own_text)
        .filter(|t| !t.contains(VOTES_LABEL))
        .map(|t| t.trim().to_string())
        .next()
}

/// Strip the listing's tracking suffix from a title URL.
pub fn canonical_url(url: &str) -> String {
    url.replace(TRACKING_SUFFIX, "")
}

/// First `tt\d+` identifier in a title URL.
pub fn movie_id(url: &str) -> Option<String> {
    MOVIE_ID.find(url).map(|m| m.as_str().to_string())
}

/// Large-format variant of an IMDb thumbnail URL.
pub fn big_poster(poster_url: &str) -> String {
    POSTER_SIZE
        .replace(poster_url, BIG_POSTER_SUFFIX)
        .into_owned()
}

fn own_text<'a>(element: ElementRef<'a>) -> impl Iterator<Item = &'a str> + 'a {
    element
        .children()
        .filter_map(|node| node.value().as_text())
        .map(|text| &**text)
}

/// Matches on the first direct text node only, like XPath `contains(text(), ..)`.
fn first_own_text_contains(element: ElementRef, needle: &str) -> bool {
    own_text(element).next().is_some_and(|t| t.contains(needle))
}
