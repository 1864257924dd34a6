use http::Method;
use indexmap::IndexMap;
use tracing::debug;

use super::params::CallParams;
use super::result::{CallResult, RawResponse};
use super::ApiClientError;

/// Where a declared parameter is carried on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub enum ParamLocation {
    /// Substituted into a `{name}` segment of the path template.
    #[display("path")]
    Path,
    /// Appended to the query string.
    #[display("query")]
    Query,
    /// Sent as an HTTP request header.
    #[display("header")]
    Header,
}

/// Declared scalar type of a parameter, used in error messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamType {
    /// Textual values, passed through unchanged.
    Text,
    /// Numeric values, stringified via their standard textual form.
    Number,
    /// Boolean values, stringified as `true`/`false`.
    Boolean,
}

impl ParamType {
    pub(in crate::client) fn name(self) -> &'static str {
        match self {
            Self::Text => "string",
            Self::Number => "number",
            Self::Boolean => "boolean",
        }
    }
}

/// Request body kinds an operation can declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BodyKind {
    /// No payload; no `Content-Type` header is sent.
    #[default]
    None,
    /// JSON payload serialized from the caller's [`CallBody`](super::CallBody).
    Json,
}

/// One declared parameter of an [`Operation`].
///
/// A parameter has a caller-facing `name` (the key under which
/// [`CallParams`] carries its value, e.g. `UserId`) and a `wire_name` (the
/// `{placeholder}` token, query key, or header name, e.g. `userId`).
#[derive(Debug, Clone)]
pub struct ParamSpec {
    name: &'static str,
    wire_name: &'static str,
    location: ParamLocation,
    expected: ParamType,
    required: bool,
}

impl ParamSpec {
    /// Declares a path parameter. Path parameters are always required.
    #[must_use]
    pub fn path(name: &'static str, wire_name: &'static str, expected: ParamType) -> Self {
        Self {
            name,
            wire_name,
            location: ParamLocation::Path,
            expected,
            required: true,
        }
    }

    /// Declares a query parameter, optional by default.
    #[must_use]
    pub fn query(name: &'static str, wire_name: &'static str, expected: ParamType) -> Self {
        Self {
            name,
            wire_name,
            location: ParamLocation::Query,
            expected,
            required: false,
        }
    }

    /// Declares a header parameter, optional by default.
    #[must_use]
    pub fn header(name: &'static str, wire_name: &'static str, expected: ParamType) -> Self {
        Self {
            name,
            wire_name,
            location: ParamLocation::Header,
            expected,
            required: false,
        }
    }

    /// Marks the parameter as required; an absent value then aborts the call
    /// with [`ApiClientError::MissingParameter`] before any I/O.
    #[must_use]
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// The caller-facing name.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// The name used on the wire.
    #[must_use]
    pub fn wire_name(&self) -> &'static str {
        self.wire_name
    }

    /// Where the parameter is carried.
    #[must_use]
    pub fn location(&self) -> ParamLocation {
        self.location
    }

    pub(in crate::client) fn expected(&self) -> ParamType {
        self.expected
    }

    pub(in crate::client) fn is_required(&self) -> bool {
        self.required
    }

    /// Human-readable description used in error messages,
    /// e.g. `path parameter: UserId`.
    pub(in crate::client) fn describe(&self) -> String {
        format!("{} parameter: {}", self.location, self.name)
    }
}

/// A response decoder registered for one status code.
///
/// Decoders are external collaborators: they know their own shape's layout and
/// are invoked only when their exact status is returned. Most are a one-liner
/// over [`decode_json`](crate::decode_json).
pub type Decoder<R> = fn(&[u8]) -> Result<R, ApiClientError>;

/// A per-operation validation hook run before any serialization or I/O.
///
/// A returned `Err` message aborts the call as
/// [`ApiClientError::ValidationFailed`].
pub type Validator = fn(&CallParams) -> Result<(), String>;

/// The status-code → decoder mapping of one operation.
///
/// Statuses are matched by exact equality only; there is no range or wildcard
/// matching. A status absent from the catalog yields the
/// [`Unknown`](super::CallResponse::Unknown) result variant, never an error.
pub struct Catalog<R> {
    decoders: IndexMap<u16, Decoder<R>>,
}

impl<R> Catalog<R> {
    /// Creates an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self {
            decoders: IndexMap::new(),
        }
    }

    /// Registers a decoder for a literal status code, replacing any previous
    /// decoder for the same code.
    ///
    /// # Panics
    ///
    /// Panics if the status code is invalid (outside 100-599); a bad catalog
    /// is a construction bug, not a runtime condition.
    #[must_use]
    pub fn on_status(mut self, status: u16, decoder: Decoder<R>) -> Self {
        assert!(
            (100..=599).contains(&status),
            "HTTP status code must be between 100 and 599, got {status}"
        );
        self.decoders.insert(status, decoder);
        self
    }

    /// Checks if a status code is cataloged.
    #[must_use]
    pub fn contains(&self, status: u16) -> bool {
        self.decoders.contains_key(&status)
    }

    /// The cataloged status codes, in registration order.
    pub fn statuses(&self) -> impl Iterator<Item = u16> + '_ {
        self.decoders.keys().copied()
    }

    pub(in crate::client) fn decoder_for(&self, status: u16) -> Option<Decoder<R>> {
        self.decoders.get(&status).copied()
    }
}

impl<R> Default for Catalog<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R> std::fmt::Debug for Catalog<R> {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_tuple("Catalog")
            .field(&self.decoders.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// One REST endpoint definition: method, path template, declared parameters,
/// body kind, optional validator, and the status-code catalog.
///
/// Operations are immutable once built and are typically constructed by
/// generated code inside a `LazyLock`:
///
/// ```rust
/// use std::sync::LazyLock;
///
/// use http::Method;
/// use opcat_core::{decode_json, Operation, ParamSpec, ParamType};
///
/// #[derive(Debug, serde::Deserialize)]
/// struct User {
///     id: String,
///     name: String,
/// }
///
/// #[derive(Debug)]
/// enum GetUserResponse {
///     Ok(User),
///     NotFound,
/// }
///
/// static GET_USER: LazyLock<Operation<GetUserResponse>> = LazyLock::new(|| {
///     Operation::new("get-user", Method::GET, "/users/{userId}")
///         .param(ParamSpec::path("UserId", "userId", ParamType::Text))
///         .on_status(200, |body| decode_json::<User>(body).map(GetUserResponse::Ok))
///         .on_status(404, |_| Ok(GetUserResponse::NotFound))
/// });
/// # assert_eq!(GET_USER.id(), "get-user");
/// ```
#[derive(Debug)]
pub struct Operation<R> {
    id: &'static str,
    method: Method,
    path: &'static str,
    params: Vec<ParamSpec>,
    body: BodyKind,
    validator: Option<Validator>,
    responses: Catalog<R>,
}

impl<R> Operation<R> {
    /// Creates an operation with no parameters, no body, and an empty catalog.
    #[must_use]
    pub fn new(id: &'static str, method: Method, path: &'static str) -> Self {
        Self {
            id,
            method,
            path,
            params: Vec::new(),
            body: BodyKind::None,
            validator: None,
            responses: Catalog::new(),
        }
    }

    /// Appends a declared parameter; declaration order is the wire order for
    /// query parameters.
    #[must_use]
    pub fn param(mut self, spec: ParamSpec) -> Self {
        self.params.push(spec);
        self
    }

    /// Declares that the operation carries a JSON request body.
    #[must_use]
    pub fn with_json_body(mut self) -> Self {
        self.body = BodyKind::Json;
        self
    }

    /// Attaches the operation's external validator.
    #[must_use]
    pub fn with_validator(mut self, validator: Validator) -> Self {
        self.validator = Some(validator);
        self
    }

    /// Registers a decoder for a literal status code.
    ///
    /// # Panics
    ///
    /// Panics if the status code is outside 100-599, see
    /// [`Catalog::on_status`].
    #[must_use]
    pub fn on_status(mut self, status: u16, decoder: Decoder<R>) -> Self {
        self.responses = self.responses.on_status(status, decoder);
        self
    }

    /// The operation identifier.
    #[must_use]
    pub fn id(&self) -> &'static str {
        self.id
    }

    /// The HTTP method.
    #[must_use]
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// The path template, with `{name}` placeholders.
    #[must_use]
    pub fn path_template(&self) -> &'static str {
        self.path
    }

    /// The status-code catalog.
    #[must_use]
    pub fn responses(&self) -> &Catalog<R> {
        &self.responses
    }

    /// The declared body kind.
    #[must_use]
    pub fn body_kind(&self) -> BodyKind {
        self.body
    }

    pub(in crate::client) fn validator(&self) -> Option<Validator> {
        self.validator
    }

    pub(in crate::client) fn params_in(
        &self,
        location: ParamLocation,
    ) -> impl Iterator<Item = &ParamSpec> {
        self.params
            .iter()
            .filter(move |spec| spec.location() == location)
    }

    /// Classifies a raw HTTP response against the operation's catalog.
    ///
    /// An exact status match reads the response body and runs the registered
    /// decoder; any other status yields the
    /// [`Unknown`](super::CallResponse::Unknown) variant with the body left
    /// unread. The returned result always carries the actual status code.
    ///
    /// # Errors
    ///
    /// Returns [`ApiClientError::ReqwestError`] if reading the body of a
    /// cataloged response fails, or the decoder's error if decoding fails.
    pub async fn classify(
        &self,
        response: reqwest::Response,
    ) -> Result<CallResult<R>, ApiClientError> {
        let status = response.status();
        match self.responses.decoder_for(status.as_u16()) {
            Some(decode) => {
                let body = response.bytes().await?;
                let value = decode(&body)?;
                Ok(CallResult::decoded(status, value))
            }
            None => {
                debug!(
                    operation = self.id,
                    status = status.as_u16(),
                    "status code not in catalog"
                );
                Ok(CallResult::unknown(status, RawResponse::new(response)))
            }
        }
    }
}
