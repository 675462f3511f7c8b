use std::path::Path;

use serde::Deserialize;

use crate::error::ScrapeError;
use crate::resolver::CompanyQuery;

/// Key-value run input, as stored by the actor platform (`INPUT.json`).
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ActorInput {
    #[serde(default)]
    pub company_name: Option<String>,
    #[serde(default)]
    pub company_id: Option<String>,
    #[serde(default, rename = "Type")]
    pub company_type: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub testing: bool,
}

impl ActorInput {
    pub fn from_json(json: &str) -> Result<Self, ScrapeError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_path(path: &Path) -> Result<Self, ScrapeError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }
}

/// Where the crawl starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompanyTarget {
    /// Known IMDb company id such as `co0071509`; no lookup needed.
    Id(String),
    /// Name to resolve through the company search page first.
    Name(CompanyQuery),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrapeRequest {
    pub target: CompanyTarget,
    /// Stop after the first listing page.
    pub test_mode: bool,
}

impl ScrapeRequest {
    pub fn by_id(company_id: impl Into<String>) -> Self {
        Self {
            target: CompanyTarget::Id(company_id.into()),
            test_mode: false,
        }
    }

    pub fn by_name(query: CompanyQuery) -> Self {
        Self {
            target: CompanyTarget::Name(query),
            test_mode: false,
        }
    }

    pub fn test_mode(mut self, test_mode: bool) -> Self {
        self.test_mode = test_mode;
        self
    }
}

impl TryFrom<ActorInput> for ScrapeRequest {
    type Error = ScrapeError;

    /// A non-empty id wins; name, type and country are then ignored.
    fn try_from(input: ActorInput) -> Result<Self, Self::Error> {
        let id = input.company_id.filter(|id| !id.trim().is_empty());
        let name = input.company_name.filter(|name| !name.trim().is_empty());

        let request = match (id, name) {
            (Some(id), _) => ScrapeRequest::by_id(id.trim()),
            (None, Some(name)) => {
                let query = CompanyQuery::new(name.trim())
                    .country(input.country.unwrap_or_default())
                    .kind(input.company_type.unwrap_or_default());
                ScrapeRequest::by_name(query)
            }
            (None, None) => {
                return Err(ScrapeError::Input(
                    "either CompanyId or CompanyName is required".to_string(),
                ));
            }
        };

        Ok(request.test_mode(input.testing))
    }
}
