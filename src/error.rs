//! Error types for hashnode-backup
//!
//! Two severities exist and each has its own type:
//! - [`Error`] is fatal and aborts the whole run (bad configuration, API failures,
//!   transport failures while fetching the post list, failing to write a post)
//! - [`ImageError`] is scoped to a single image; the caller logs it and moves on

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for hashnode-backup operations
pub type Result<T> = std::result::Result<T, Error>;

/// Fatal error that ends the backup run
#[derive(Debug, Error)]
pub enum Error {
    /// One or more required environment variables are absent or empty
    #[error("missing required environment variables: {}", .names.join(", "))]
    MissingEnv {
        /// Every missing variable name, in declaration order
        names: Vec<String>,
    },

    /// The GraphQL API answered with an `errors` list
    #[error("Hashnode API error: {errors}")]
    Api {
        /// The API-reported error list, rendered as JSON
        errors: String,
    },

    /// The response carried no usable `data` field
    #[error("API response missing 'data' field: {payload}")]
    MissingData {
        /// The whole response payload, for diagnosis
        payload: String,
    },

    /// The response body did not match the expected envelope
    #[error("malformed API response: {0}")]
    MalformedResponse(#[source] serde_json::Error),

    /// A post's publish timestamp is not ISO-8601
    #[error("post '{slug}' has an unparsable publish timestamp: {value}")]
    InvalidTimestamp {
        /// Slug of the offending post
        slug: String,
        /// The raw timestamp value
        value: String,
    },

    /// A slug that would not name a single directory under the backup path
    #[error("post slug '{slug}' is not a safe directory name")]
    UnsafeSlug {
        /// The rejected slug
        slug: String,
    },

    /// Transport failure while talking to the API
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Frontmatter serialization failed
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Per-image failure; never aborts a post or the run
#[derive(Debug, Error)]
pub enum ImageError {
    /// The URL path does not end in an allowed image extension
    #[error("skipping non-supported image format: {url}")]
    UnsupportedFormat {
        /// The rejected URL
        url: String,
    },

    /// The URL could not be parsed
    #[error("invalid image URL {url}: {reason}")]
    InvalidUrl {
        /// The rejected URL
        url: String,
        /// Parser message
        reason: String,
    },

    /// The request exceeded the image timeout
    #[error("timeout downloading image {url} (exceeded {secs} seconds)")]
    Timeout {
        /// The image URL
        url: String,
        /// Configured timeout in seconds
        secs: u64,
    },

    /// The server answered with a non-2xx status
    #[error("HTTP {status} downloading image {url}")]
    HttpStatus {
        /// The image URL
        url: String,
        /// Numeric HTTP status
        status: u16,
    },

    /// Any other transport failure
    #[error("failed to download image {url}: {source}")]
    Network {
        /// The image URL
        url: String,
        /// Underlying client error
        #[source]
        source: reqwest::Error,
    },

    /// Writing the image to disk failed
    #[error("failed to write image to {path}: {source}")]
    Io {
        /// Destination path
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

impl ImageError {
    /// Classify a client error for `url`, separating timeouts from other failures
    pub(crate) fn from_reqwest(url: &str, secs: u64, source: reqwest::Error) -> Self {
        if source.is_timeout() {
            ImageError::Timeout {
                url: url.to_string(),
                secs,
            }
        } else {
            ImageError::Network {
                url: url.to_string(),
                source,
            }
        }
    }
}
