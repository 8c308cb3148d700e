//! Blocking JSON client shared by every adapter.
//!
//! The provider traits are synchronous so the core stays embeddable in
//! non-async callers. [`HttpClient`] bridges to `reqwest` by blocking on a
//! Tokio runtime it owns, or on the caller's runtime when invoked from
//! inside a multi-threaded one.

use std::future::Future;
use std::time::Duration;

use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use tokio::runtime::{Handle, Runtime, RuntimeFlavor};
use tripwise_core::ProviderError;
use url::Url;

/// Default user agent sent with every request.
pub const DEFAULT_USER_AGENT: &str = "tripwise/0.1";

/// Default request timeout in seconds.
pub(crate) const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Query parameters never echoed into errors or logs.
const SECRET_PARAMS: [&str; 1] = ["key"];

/// Error type for adapter construction failures.
#[derive(Debug)]
pub enum ProviderBuildError {
    /// Failed to build the HTTP client.
    HttpClient(reqwest::Error),
    /// Failed to build the Tokio runtime.
    Runtime(std::io::Error),
    /// A configured base URL is not a valid absolute URL.
    BaseUrl {
        /// The rejected URL.
        url: String,
        /// Parser error.
        source: url::ParseError,
    },
}

impl std::fmt::Display for ProviderBuildError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::HttpClient(err) => write!(f, "failed to build HTTP client: {err}"),
            Self::Runtime(err) => write!(f, "failed to build Tokio runtime: {err}"),
            Self::BaseUrl { url, source } => write!(f, "invalid base URL {url:?}: {source}"),
        }
    }
}

impl std::error::Error for ProviderBuildError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::HttpClient(err) => Some(err),
            Self::Runtime(err) => Some(err),
            Self::BaseUrl { source, .. } => Some(source),
        }
    }
}

/// Check that `base_url` parses, so bad configuration fails at build time.
pub(crate) fn validate_base_url(base_url: &str) -> Result<(), ProviderBuildError> {
    Url::parse(base_url)
        .map(drop)
        .map_err(|source| ProviderBuildError::BaseUrl {
            url: base_url.to_owned(),
            source,
        })
}

/// Join `path` onto `base_url` and append `params`.
pub(crate) fn endpoint<'a>(
    base_url: &str,
    path: &str,
    params: impl IntoIterator<Item = (&'a str, String)>,
) -> Result<Url, ProviderError> {
    let joined = format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        path.trim_start_matches('/')
    );
    let mut url = Url::parse(&joined).map_err(|err| ProviderError::Parse {
        message: format!("invalid request URL {joined:?}: {err}"),
    })?;
    let mut pairs = params.into_iter().peekable();
    if pairs.peek().is_some() {
        url.query_pairs_mut().extend_pairs(pairs);
    }
    Ok(url)
}

/// Render `url` with secret query parameters masked.
pub(crate) fn redacted(url: &Url) -> String {
    if !url.query_pairs().any(|(name, _)| SECRET_PARAMS.contains(&name.as_ref())) {
        return url.to_string();
    }
    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .map(|(name, value)| {
            let shown = if SECRET_PARAMS.contains(&name.as_ref()) {
                "REDACTED".to_owned()
            } else {
                value.into_owned()
            };
            (name.into_owned(), shown)
        })
        .collect();
    let mut clean = url.clone();
    clean.query_pairs_mut().clear().extend_pairs(pairs);
    clean.into()
}

/// `reqwest` client plus the runtime that drives it.
pub(crate) struct HttpClient {
    client: Client,
    runtime: Runtime,
    timeout: Duration,
}

impl std::fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpClient")
            .field("client", &self.client)
            .field("timeout", &self.timeout)
            .field("runtime", &"<tokio::runtime::Runtime>")
            .finish()
    }
}

impl HttpClient {
    pub(crate) fn new(timeout: Duration, user_agent: &str) -> Result<Self, ProviderBuildError> {
        let client = Client::builder()
            .user_agent(user_agent)
            .connect_timeout(timeout)
            .timeout(timeout)
            .build()
            .map_err(ProviderBuildError::HttpClient)?;
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(ProviderBuildError::Runtime)?;
        Ok(Self {
            client,
            runtime,
            timeout,
        })
    }

    /// GET `url` and decode the JSON body.
    pub(crate) fn get_json<T: DeserializeOwned>(&self, url: &Url) -> Result<T, ProviderError> {
        self.block_on(self.fetch_json(self.client.get(url.clone()), url))
    }

    /// POST `form` to `url` and decode the JSON body.
    pub(crate) fn post_form_json<T: DeserializeOwned>(
        &self,
        url: &Url,
        form: &[(&str, &str)],
    ) -> Result<T, ProviderError> {
        self.block_on(self.fetch_json(self.client.post(url.clone()).form(form), url))
    }

    /// Drive `future` to completion from synchronous code.
    ///
    /// Inside a multi-threaded runtime the caller's handle is used through
    /// [`tokio::task::block_in_place`]. Anywhere else, including inside a
    /// `current_thread` runtime, the owned runtime is used; that path may
    /// deadlock if the caller's runtime drives IO this request needs.
    fn block_on<F: Future>(&self, future: F) -> F::Output {
        match Handle::try_current() {
            Ok(handle) if handle.runtime_flavor() == RuntimeFlavor::MultiThread => {
                tokio::task::block_in_place(|| handle.block_on(future))
            }
            _ => self.runtime.block_on(future),
        }
    }

    async fn fetch_json<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        url: &Url,
    ) -> Result<T, ProviderError> {
        let shown = redacted(url);
        log::debug!("requesting {shown}");
        let response = request
            .send()
            .await
            .map_err(|err| self.convert_reqwest_error(err, &shown))?
            .error_for_status()
            .map_err(|err| self.convert_reqwest_error(err, &shown))?;
        let body = response
            .bytes()
            .await
            .map_err(|err| self.convert_reqwest_error(err, &shown))?;
        serde_json::from_slice(&body).map_err(|err| ProviderError::Parse {
            message: err.to_string(),
        })
    }

    /// Map a `reqwest` failure, keeping secrets out of the message.
    fn convert_reqwest_error(&self, error: reqwest::Error, url: &str) -> ProviderError {
        let bare = error.without_url();
        if bare.is_timeout() {
            return ProviderError::Timeout {
                url: url.to_owned(),
                timeout_secs: self.timeout.as_secs(),
            };
        }

        if let Some(status) = bare.status() {
            return ProviderError::Http {
                url: url.to_owned(),
                status: status.as_u16(),
                message: bare.to_string(),
            };
        }

        ProviderError::Network {
            url: url.to_owned(),
            message: bare.to_string(),
        }
    }
}
