use thiserror::Error;

/// Errors produced by this crate.
///
/// Everything a caller can fix before a request goes out (bad shape,
/// impossible footnote combination, unknown state, unsupported CPI slice)
/// surfaces as [`Error::Input`], as do the two upstream rejections the BLS
/// API reports in-band (bad registration key, exhausted daily quota).
/// Transport and decode failures pass through untouched.
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid caller input, or an upstream rejection of the credential.
    #[error("{0}")]
    Input(String),

    /// The catalog was requested from a [`crate::FetchResult`] produced
    /// without an API key. Catalog metadata is a keyed-account feature.
    #[error("catalog is not available without an API key")]
    CatalogUnavailable,

    /// A numeric field in the response did not parse.
    #[error("could not parse {field} value {raw:?} as a number")]
    Numeric { field: &'static str, raw: String },

    /// HTTP transport failure.
    #[error(transparent)]
    Http(#[from] reqwest::Error),

    /// Response body was not the JSON shape the BLS API documents.
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub(crate) fn input(msg: impl Into<String>) -> Self {
        Error::Input(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
