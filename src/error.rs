use thiserror::Error;

/// Errors that stop a crawl. Missing fields and an unknown company are not
/// errors; they show up on the record or in the crawl summary instead.
#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("invalid URL `{url}`: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
    #[error("request error during `{stage}`: {source}")]
    Request {
        stage: &'static str,
        #[source]
        source: reqwest::Error,
    },
    #[error("unexpected HTTP status {status} for {url}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },
    #[error("invalid selector `{selector}`: {message}")]
    Selector { selector: &'static str, message: String },
    #[error("invalid header value for `{0}`")]
    InvalidHeader(&'static str),
    #[error("invalid input: {0}")]
    Input(String),
    #[error("output error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("RSS error: {0}")]
    Rss(#[from] rss::Error),
    #[error("feed is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

impl ScrapeError {
    pub fn request(stage: &'static str, source: reqwest::Error) -> Self {
        Self::Request { stage, source }
    }

    pub fn invalid_url(url: impl Into<String>, source: url::ParseError) -> Self {
        Self::InvalidUrl {
            url: url.into(),
            source,
        }
    }
}
