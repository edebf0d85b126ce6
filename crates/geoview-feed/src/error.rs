//! Error types for the `geoview-feed` crate.
//!
//! Feed failures are never fatal to the engine: the poller logs them and
//! retains the last good batch until a refresh succeeds.

/// Errors that can occur while fetching or decoding the feed.
#[derive(Debug, thiserror::Error)]
pub enum FeedError {
    /// The HTTP request failed (network error, timeout, non-2xx status).
    #[error("feed request failed: {source}")]
    Http {
        /// The underlying client error.
        #[from]
        source: reqwest::Error,
    },

    /// The response body was not a decodable feed document.
    #[error("feed response was not valid GeoJSON: {source}")]
    Decode {
        /// The underlying decode error.
        #[from]
        source: serde_json::Error,
    },
}
