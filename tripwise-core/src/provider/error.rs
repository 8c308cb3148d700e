use thiserror::Error;

/// Errors from [`super::DirectionsProvider`] and [`super::PlacesProvider`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProviderError {
    /// The request could not be sent or the connection failed.
    #[error("network error calling {url}: {message}")]
    Network {
        /// Request URL without credentials.
        url: String,
        /// Underlying error text.
        message: String,
    },
    /// The request exceeded the configured timeout.
    #[error("request to {url} timed out after {timeout_secs}s")]
    Timeout {
        /// Request URL without credentials.
        url: String,
        /// Configured timeout in seconds.
        timeout_secs: u64,
    },
    /// The service answered with a non-success HTTP status.
    #[error("HTTP {status} from {url}: {message}")]
    Http {
        /// Request URL without credentials.
        url: String,
        /// HTTP status code.
        status: u16,
        /// Underlying error text.
        message: String,
    },
    /// The service answered but reported a failure status in its payload.
    #[error("service returned {status}: {message}")]
    Service {
        /// Service-specific status, e.g. `REQUEST_DENIED` or `NoRoute`.
        status: String,
        /// Service-supplied message, possibly empty.
        message: String,
    },
    /// The payload could not be decoded.
    #[error("failed to parse provider response: {message}")]
    Parse {
        /// Decoder error text.
        message: String,
    },
    /// A free-text location could not be resolved to coordinates.
    #[error("could not geocode {query:?}")]
    Geocode {
        /// The text that failed to resolve.
        query: String,
    },
}
