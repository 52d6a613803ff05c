use thiserror::Error;

#[derive(Debug, Error)]
pub enum AcsError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("request to {url} timed out")]
    Timeout { url: String },

    /// The build-time skip switch is on; no request was sent.
    #[error("network access skipped for {url} (ACS_SKIP_NETWORK is set)")]
    FetchSkipped { url: String },

    #[error("invalid URL \"{url}\": {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("slug \"{slug}\" does not embed an article id")]
    InvalidSlug { slug: String },

    /// The page was fetched but yielded no usable records.
    #[error("no usable records parsed from {page}")]
    EmptyParse { page: String },
}

impl AcsError {
    #[must_use]
    pub fn is_skipped(&self) -> bool {
        matches!(self, AcsError::FetchSkipped { .. })
    }
}
