//! Company name lookup.
//! Search page: https://www.imdb.com/find?s=co&q=warner+bros&ref_=nv_sr_sm
//! Each `findList` row links a company page that doubles as its title listing.

use scraper::Html;
use url::Url;

use crate::config::Selectors;

/// Which company to look up. `country` and `kind` narrow the match when set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompanyQuery {
    pub name: String,
    pub country: Option<String>,
    pub kind: Option<String>,
}

impl CompanyQuery {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            country: None,
            kind: None,
        }
    }

    pub fn country(mut self, country: impl Into<String>) -> Self {
        self.country = non_empty(country.into());
        self
    }

    pub fn kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = non_empty(kind.into());
        self
    }

    /// Row text must contain the name, `[country]` and the type, all at once.
    pub fn matches(&self, row_text: &str) -> bool {
        let row_text = row_text.to_lowercase();
        let name_ok = row_text.contains(&self.name.to_lowercase());
        let country_ok = self
            .country
            .as_ref()
            .is_none_or(|c| row_text.contains(&format!("[{}]", c.to_lowercase())));
        let kind_ok = self
            .kind
            .as_ref()
            .is_none_or(|k| row_text.contains(&k.to_lowercase()));
        name_ok && country_ok && kind_ok
    }
}

/// One lookup result: absolute company link plus the row's flattened, lower-cased text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompanyRow {
    pub link: Url,
    pub text: String,
}

pub fn company_rows(html: &str, page_url: &Url, selectors: &Selectors) -> Vec<CompanyRow> {
    let document = Html::parse_document(html);
    document
        .select(&selectors.company_row)
        .filter_map(|row| {
            let href = row
                .select(&selectors.company_link)
                .next()?
                .value()
                .attr("href")?;
            let link = page_url.join(href.trim()).ok()?;
            let text = row
                .text()
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .collect::<Vec<_>>()
                .join(" ")
                .to_lowercase();
            Some(CompanyRow { link, text })
        })
        .collect()
}

/// Link of the first row satisfying `query`, if any.
pub fn resolve_company(
    html: &str,
    page_url: &Url,
    query: &CompanyQuery,
    selectors: &Selectors,
) -> Option<Url> {
    company_rows(html, page_url, selectors)
        .into_iter()
        .find(|row| query.matches(&row.text))
        .map(|row| row.link)
}

fn non_empty(value: String) -> Option<String> {
    let value = value.trim().to_string();
    if value.is_empty() { None } else { Some(value) }
}
