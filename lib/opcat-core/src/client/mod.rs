use url::Url;

mod builder;
pub use self::builder::ApiClientBuilder;

mod call;
pub use self::call::ApiCall;

mod operation;
pub use self::operation::{
    BodyKind, Catalog, Decoder, Operation, ParamLocation, ParamSpec, ParamType, Validator,
};

mod params;
pub use self::params::CallParams;

mod headers;
pub use self::headers::CallHeaders;

mod body;
pub use self::body::CallBody;

mod path;
mod query;

mod result;
pub use self::result::{decode_json, CallResponse, CallResult, RawResponse};

mod error;
pub use self::error::ApiClientError;

/// HTTP client for catalog-driven operations.
///
/// An `ApiClient` holds an immutable base URL and default header map, fixed
/// at construction via [`ApiClientBuilder`]. It is created once and reused
/// for every operation call; concurrent calls share nothing but this
/// immutable state, and cloning is cheap.
///
/// # Example
///
/// ```rust,no_run
/// use opcat_core::ApiClient;
///
/// # fn example() -> Result<(), opcat_core::ApiClientError> {
/// let client = ApiClient::builder()
///     .with_base_url("https://api.example.com/v1")
///     .add_header("X-App-API-Key", "secret")
///     .build()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
    default_headers: CallHeaders,
}

impl ApiClient {
    /// Starts building a client.
    #[must_use]
    pub fn builder() -> ApiClientBuilder {
        ApiClientBuilder::default()
    }

    /// Prepares one operation call.
    ///
    /// Nothing happens until the returned [`ApiCall`] is awaited: parameters
    /// are validated, the request is built, one network exchange is
    /// performed, and the response is classified against the operation's
    /// catalog.
    pub fn call<'c, R>(
        &'c self,
        operation: &'c Operation<R>,
        params: CallParams,
    ) -> ApiCall<'c, R> {
        ApiCall::new(self, operation, params)
    }

    /// The configured base URL.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// The default headers sent with every call, before per-call overlays.
    #[must_use]
    pub fn default_headers(&self) -> &CallHeaders {
        &self.default_headers
    }

    pub(in crate::client) fn http(&self) -> &reqwest::Client {
        &self.http
    }

    pub(in crate::client) fn from_parts(
        http: reqwest::Client,
        base_url: Url,
        default_headers: CallHeaders,
    ) -> Self {
        Self {
            http,
            base_url,
            default_headers,
        }
    }
}
