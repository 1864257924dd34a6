/// Errors that can occur when building a request or decoding a response.
///
/// Transport-level failures are wrapped transparently (the underlying
/// [`reqwest::Error`] is preserved as the source and never reclassified), while
/// the invalid-request family is raised synchronously before any network I/O.
/// Use [`ApiClientError::is_invalid_request`] to distinguish the two.
#[derive(Debug, derive_more::Error, derive_more::Display, derive_more::From)]
pub enum ApiClientError {
    /// HTTP client error from the underlying reqwest library.
    ///
    /// Occurs when network requests fail, timeouts occur, or connection issues
    /// arise. Propagated unmodified.
    ReqwestError(reqwest::Error),

    /// URL parsing error when constructing request URLs.
    UrlError(url::ParseError),

    /// HTTP header processing error.
    HeadersError(headers::Error),

    /// Invalid HTTP header name.
    InvalidHeaderName(http::header::InvalidHeaderName),

    /// Invalid HTTP header value.
    InvalidHeaderValue(http::header::InvalidHeaderValue),

    /// JSON serialization error when encoding a request body.
    JsonValueError(serde_json::Error),

    /// Query parameter serialization error.
    ///
    /// Occurs when converting the assembled parameter pairs to a query string.
    QuerySerializationError(serde_urlencoded::ser::Error),

    /// No base URL was configured.
    ///
    /// Occurs when building an `ApiClient` without calling `with_base_url`.
    #[display("A base URL is required to build an ApiClient")]
    MissingBaseUrl,

    /// A required parameter was not provided.
    ///
    /// Raised before any network call is attempted.
    #[display("{description} is required but was not provided (expected {expected})")]
    #[from(skip)]
    MissingParameter {
        /// Human-readable parameter description, e.g. `path parameter: UserId`.
        description: String,
        /// Name of the declared parameter type.
        expected: &'static str,
    },

    /// A parameter value is not a scalar the wire format can carry.
    #[display("{description} should be of type {expected} but got {actual}")]
    #[from(skip)]
    ParameterTypeMismatch {
        /// Human-readable parameter description, e.g. `query parameter: PageNumber`.
        description: String,
        /// Name of the declared parameter type.
        expected: &'static str,
        /// Name of the type actually supplied.
        actual: &'static str,
    },

    /// The operation's external validator rejected the parameters.
    #[display("invalid request: {message}")]
    #[from(skip)]
    ValidationFailed {
        /// Description of why the parameters were rejected.
        message: String,
    },

    /// Path template contains placeholders no declared parameter covers.
    #[display("Path '{path}' is missing required arguments: {missings:?}")]
    #[from(skip)]
    PathUnresolved {
        /// The path template that couldn't be resolved.
        path: String,
        /// List of unresolved placeholder names.
        missings: Vec<String>,
    },

    /// JSON response deserialization failure.
    ///
    /// Raised by [`decode_json`](crate::decode_json) when a cataloged
    /// response body cannot be parsed as the expected structure.
    #[display("Failed to decode JSON at '{path}': {error}\n{body}")]
    #[from(skip)]
    JsonError {
        /// Location within the document where deserialization failed.
        path: String,
        /// The underlying JSON parsing error.
        error: serde_json::Error,
        /// The response body that failed to parse.
        body: String,
    },
}

impl ApiClientError {
    /// Returns `true` for the synchronous, pre-network invalid-request family:
    /// missing or mismatched parameters, validator rejection, and unresolved
    /// path templates.
    ///
    /// Transport failures and response decode failures return `false`.
    #[must_use]
    pub fn is_invalid_request(&self) -> bool {
        matches!(
            self,
            Self::MissingParameter { .. }
                | Self::ParameterTypeMismatch { .. }
                | Self::ValidationFailed { .. }
                | Self::PathUnresolved { .. }
        )
    }
}
