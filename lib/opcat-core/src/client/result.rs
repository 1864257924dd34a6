use bytes::Bytes;
use http::{HeaderMap, StatusCode};
use serde::de::DeserializeOwned;

use super::ApiClientError;

/// The discriminated outcome of one operation call.
///
/// Exactly one response variant is populated: either the decoded shape
/// registered for the actual status code, or [`CallResponse::Unknown`] when
/// the status is absent from the operation's catalog. The status-code field
/// always carries the actual response status, whichever branch fired.
#[derive(Debug)]
pub struct CallResult<R> {
    status: StatusCode,
    response: CallResponse<R>,
}

/// One branch of a [`CallResult`].
#[derive(Debug)]
pub enum CallResponse<R> {
    /// The status was cataloged and its decoder produced a typed value.
    Decoded(R),
    /// The status was not cataloged; the raw response is handed over with its
    /// body unread.
    Unknown(RawResponse),
}

impl<R> CallResult<R> {
    pub(in crate::client) fn decoded(status: StatusCode, value: R) -> Self {
        Self {
            status,
            response: CallResponse::Decoded(value),
        }
    }

    pub(in crate::client) fn unknown(status: StatusCode, raw: RawResponse) -> Self {
        Self {
            status,
            response: CallResponse::Unknown(raw),
        }
    }

    /// The actual HTTP status code of the response.
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        self.status
    }

    /// Borrows the populated response variant.
    #[must_use]
    pub fn response(&self) -> &CallResponse<R> {
        &self.response
    }

    /// Consumes the result, returning the populated response variant.
    #[must_use]
    pub fn into_response(self) -> CallResponse<R> {
        self.response
    }

    /// The decoded value, if the status was cataloged.
    #[must_use]
    pub fn as_decoded(&self) -> Option<&R> {
        match &self.response {
            CallResponse::Decoded(value) => Some(value),
            CallResponse::Unknown(_) => None,
        }
    }

    /// Consumes the result, returning the decoded value if the status was
    /// cataloged.
    #[must_use]
    pub fn into_decoded(self) -> Option<R> {
        match self.response {
            CallResponse::Decoded(value) => Some(value),
            CallResponse::Unknown(_) => None,
        }
    }

    /// Whether the response status fell outside the operation's catalog.
    #[must_use]
    pub fn is_unknown(&self) -> bool {
        matches!(self.response, CallResponse::Unknown(_))
    }
}

/// A handle to a raw, undecoded HTTP response.
///
/// Returned inside [`CallResponse::Unknown`] for statuses absent from the
/// catalog. The body has not been consumed; callers needing it read it
/// themselves.
#[derive(Debug)]
pub struct RawResponse {
    inner: reqwest::Response,
}

impl RawResponse {
    pub(in crate::client) fn new(inner: reqwest::Response) -> Self {
        Self { inner }
    }

    /// The HTTP status code.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        self.inner.status()
    }

    /// The response headers.
    #[must_use]
    pub fn headers(&self) -> &HeaderMap {
        self.inner.headers()
    }

    /// Reads the full response body.
    ///
    /// # Errors
    ///
    /// Returns [`ApiClientError::ReqwestError`] if reading the body fails.
    pub async fn bytes(self) -> Result<Bytes, ApiClientError> {
        Ok(self.inner.bytes().await?)
    }

    /// Reads the full response body as text.
    ///
    /// # Errors
    ///
    /// Returns [`ApiClientError::ReqwestError`] if reading the body fails.
    pub async fn text(self) -> Result<String, ApiClientError> {
        Ok(self.inner.text().await?)
    }

    /// Unwraps the underlying transport response.
    #[must_use]
    pub fn into_inner(self) -> reqwest::Response {
        self.inner
    }
}

const BODY_EXCERPT_LENGTH: usize = 1024;

/// Decodes a JSON response body into a typed shape.
///
/// This is the canonical decoder body for catalog entries: deserialization
/// failures are reported as [`ApiClientError::JsonError`] carrying the
/// location within the document and an excerpt of the offending body.
///
/// # Examples
///
/// ```rust
/// use opcat_core::decode_json;
///
/// #[derive(Debug, serde::Deserialize)]
/// struct Health {
///     status: String,
/// }
///
/// let health: Health = decode_json(br#"{"status": "ok"}"#)?;
/// assert_eq!(health.status, "ok");
/// # Ok::<_, opcat_core::ApiClientError>(())
/// ```
///
/// # Errors
///
/// Returns [`ApiClientError::JsonError`] if the body cannot be parsed as the
/// expected structure.
pub fn decode_json<T>(body: &[u8]) -> Result<T, ApiClientError>
where
    T: DeserializeOwned,
{
    let mut deserializer = serde_json::Deserializer::from_slice(body);
    serde_path_to_error::deserialize(&mut deserializer).map_err(|err| {
        let path = err.path().to_string();
        let body = String::from_utf8_lossy(body);
        let excerpt = if body.len() > BODY_EXCERPT_LENGTH {
            let mut end = BODY_EXCERPT_LENGTH;
            while !body.is_char_boundary(end) {
                end -= 1;
            }
            format!("{}... (truncated)", &body[..end])
        } else {
            body.into_owned()
        };
        ApiClientError::JsonError {
            path,
            error: err.into_inner(),
            body: excerpt,
        }
    })
}
