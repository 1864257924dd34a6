use std::fmt::Display;

use url::Url;

use super::headers::CallHeaders;
use super::{ApiClient, ApiClientError};

const DEFAULT_USER_AGENT: &str = concat!("opcat-core/", env!("CARGO_PKG_VERSION"));

/// Builder for [`ApiClient`] instances.
///
/// A base URL is mandatory; everything else has defaults. Unless overridden,
/// every client sends `accept: application/json` and a `user-agent`
/// identifying this crate, mirroring the wire contract of the generated
/// clients this engine serves.
///
/// # Example
///
/// ```rust,no_run
/// use opcat_core::ApiClient;
///
/// # fn example() -> Result<(), opcat_core::ApiClientError> {
/// let client = ApiClient::builder()
///     .with_base_url("https://api.example.com/v1")
///     .with_user_agent("my-service/2.3.0")
///     .add_header("X-App-API-Key", "secret")
///     .build()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct ApiClientBuilder {
    client: Option<reqwest::Client>,
    base_url: Option<String>,
    user_agent: Option<String>,
    default_headers: CallHeaders,
}

impl ApiClientBuilder {
    /// Sets the base URL every operation path is resolved against.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Injects a preconfigured transport.
    ///
    /// Timeouts, proxies, TLS, and connection pooling are the transport's
    /// concern; configure them on the [`reqwest::Client`] passed here.
    #[must_use]
    pub fn with_client(mut self, client: reqwest::Client) -> Self {
        self.client = Some(client);
        self
    }

    /// Overrides the client identifier sent as `user-agent`.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Adds a default header sent with every call; per-call headers override
    /// it on name collision.
    #[must_use]
    pub fn add_header(mut self, name: impl Into<String>, value: impl Display) -> Self {
        self.default_headers = self.default_headers.add_header(name, value);
        self
    }

    /// Builds the client.
    ///
    /// # Errors
    ///
    /// Returns [`ApiClientError::MissingBaseUrl`] when no base URL was
    /// configured, or [`ApiClientError::UrlError`] when it does not parse.
    pub fn build(self) -> Result<ApiClient, ApiClientError> {
        let Self {
            client,
            base_url,
            user_agent,
            default_headers,
        } = self;

        let base_url = base_url.ok_or(ApiClientError::MissingBaseUrl)?;
        let base_url = Url::parse(&base_url)?;

        let mut headers = CallHeaders::new();
        if default_headers.get("accept").is_none() {
            headers.insert("accept", "application/json".to_string());
        }
        let user_agent = user_agent.unwrap_or_else(|| DEFAULT_USER_AGENT.to_string());
        headers.insert("user-agent", user_agent);
        let default_headers = headers.merge(default_headers);

        Ok(ApiClient::from_parts(
            client.unwrap_or_default(),
            base_url,
            default_headers,
        ))
    }
}
