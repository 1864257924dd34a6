use std::fmt::Display;
use std::future::{Future, IntoFuture};
use std::pin::Pin;

use headers::HeaderMapExt;
use http::header::{HeaderName, HeaderValue};
use reqwest::{Body, Request};
use tracing::{debug, warn};
use url::Url;

use super::body::CallBody;
use super::headers::CallHeaders;
use super::operation::{BodyKind, Operation, ParamLocation};
use super::params::{stringify, CallParams};
use super::path::resolve_path;
use super::query::to_query_string;
use super::result::CallResult;
use super::{ApiClient, ApiClientError};

/// One pending operation call: a single-shot unit of work that validates,
/// builds, exchanges, and classifies when awaited.
///
/// Created by [`ApiClient::call`]; awaiting it performs the exchange
/// directly:
///
/// ```rust,no_run
/// # use opcat_core::{ApiClient, CallParams, Operation};
/// # async fn example(client: &ApiClient, operation: &Operation<()>) -> Result<(), opcat_core::ApiClientError> {
/// let result = client
///     .call(operation, CallParams::new())
///     .with_header("X-Request-Id", "abc-123")
///     .await?;
/// # Ok(())
/// # }
/// ```
#[must_use = "an ApiCall does nothing until awaited"]
pub struct ApiCall<'c, R> {
    client: &'c ApiClient,
    operation: &'c Operation<R>,
    params: CallParams,
    headers: Option<CallHeaders>,
}

impl<'c, R> ApiCall<'c, R> {
    pub(in crate::client) fn new(
        client: &'c ApiClient,
        operation: &'c Operation<R>,
        params: CallParams,
    ) -> Self {
        Self {
            client,
            operation,
            params,
            headers: None,
        }
    }

    /// Adds a header to this call only, overriding the client's defaults on
    /// name collision.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Display) -> Self {
        let headers = self.headers.take().unwrap_or_default();
        self.headers = Some(headers.add_header(name, value));
        self
    }

    /// Merges a header collection into this call's overrides.
    pub fn with_headers(mut self, headers: CallHeaders) -> Self {
        let current = self.headers.take().unwrap_or_default();
        self.headers = Some(current.merge(headers));
        self
    }

    /// Validates the parameters, builds the request, performs the single
    /// network exchange, and classifies the response.
    async fn exchange(self) -> Result<CallResult<R>, ApiClientError> {
        let Self {
            client,
            operation,
            mut params,
            headers,
        } = self;

        // External validation runs first; a rejection aborts with no I/O.
        if let Some(validate) = operation.validator() {
            validate(&params).map_err(|message| ApiClientError::ValidationFailed { message })?;
        }

        let path = resolve_path(operation, &params)?;
        let query = to_query_string(operation, &params)?;
        let url = build_url(client.base_url(), &path, query.as_deref())?;

        let param_headers = header_parameters(operation, &params)?;
        let merged = client
            .default_headers()
            .clone()
            .merge(param_headers)
            .merge(headers.unwrap_or_default());

        let body = params.take_body();
        let request = build_request(operation, url, &merged, body)?;

        debug!(operation = operation.id(), ?request, "sending...");
        let response = client.http().execute(request).await?;
        debug!(
            operation = operation.id(),
            status = response.status().as_u16(),
            "...receiving"
        );

        operation.classify(response).await
    }
}

/// Stringifies header-located parameters under their wire names; absent
/// optional values are omitted, like query parameters.
fn header_parameters<R>(
    operation: &Operation<R>,
    params: &CallParams,
) -> Result<CallHeaders, ApiClientError> {
    let mut headers = CallHeaders::new();
    for spec in operation.params_in(ParamLocation::Header) {
        if let Some(value) = stringify(spec, params.get(spec.name()))? {
            headers.insert(spec.wire_name(), value);
        }
    }
    Ok(headers)
}

fn build_url(base_url: &Url, path: &str, query: Option<&str>) -> Result<Url, ApiClientError> {
    let base = base_url.as_str();
    let mut url = format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
    .parse::<Url>()?;
    if query.is_some() {
        url.set_query(query);
    }
    Ok(url)
}

fn build_request<R>(
    operation: &Operation<R>,
    url: Url,
    headers: &CallHeaders,
    body: Option<CallBody>,
) -> Result<Request, ApiClientError> {
    let mut request = Request::new(operation.method().clone(), url);
    let req_headers = request.headers_mut();

    for (name, value) in headers.iter() {
        req_headers.insert(
            HeaderName::from_bytes(name.as_bytes())?,
            HeaderValue::from_str(value)?,
        );
    }

    match (operation.body_kind(), body) {
        (BodyKind::Json, Some(body)) => {
            req_headers.typed_insert(body.content_type.clone());
            *request.body_mut() = Some(Body::from(body.data));
        }
        (BodyKind::None, Some(_)) => {
            warn!(
                operation = operation.id(),
                "request body supplied for an operation that declares none, dropping it"
            );
        }
        // A declared body the caller did not supply is the validator's
        // concern; the request goes out without a payload.
        (BodyKind::Json | BodyKind::None, None) => {}
    }

    Ok(request)
}

impl<'c, R> IntoFuture for ApiCall<'c, R>
where
    R: Send + 'c,
{
    type Output = Result<CallResult<R>, ApiClientError>;
    type IntoFuture = Pin<Box<dyn Future<Output = Self::Output> + Send + 'c>>;

    fn into_future(self) -> Self::IntoFuture {
        Box::pin(self.exchange())
    }
}

#[cfg(test)]
mod tests {
    use http::Method;

    use super::*;
    use crate::client::operation::{ParamSpec, ParamType};

    #[derive(Debug)]
    struct NoResponse;

    #[test]
    fn should_join_base_url_and_path() {
        let base = Url::parse("http://localhost:8080/api/").expect("a valid url");

        let url = build_url(&base, "/users/42", None).expect("should build");
        assert_eq!(url.as_str(), "http://localhost:8080/api/users/42");

        let url = build_url(&base, "users/42", Some("page=2")).expect("should build");
        assert_eq!(url.as_str(), "http://localhost:8080/api/users/42?page=2");
    }

    #[test]
    fn should_not_append_query_marker_without_query() {
        let base = Url::parse("http://localhost:8080").expect("a valid url");

        let url = build_url(&base, "/users", None).expect("should build");

        assert_eq!(url.query(), None);
        assert_eq!(url.as_str(), "http://localhost:8080/users");
    }

    #[test]
    fn should_set_content_type_only_for_declared_bodies() {
        let with_body = Operation::<NoResponse>::new("create", Method::POST, "/users/new")
            .with_json_body();
        let url = Url::parse("http://localhost/users/new").expect("a valid url");
        let body = CallBody::json(&serde_json::json!({"name": "Alice"})).expect("a valid body");

        let request = build_request(&with_body, url.clone(), &CallHeaders::new(), Some(body))
            .expect("should build");
        assert_eq!(
            request
                .headers()
                .get(http::header::CONTENT_TYPE)
                .map(|value| value.to_str().expect("ascii")),
            Some("application/json")
        );
        assert!(request.body().is_some());

        let without_body = Operation::<NoResponse>::new("logout", Method::GET, "/users/logout");
        let request = build_request(&without_body, url, &CallHeaders::new(), None)
            .expect("should build");
        assert_eq!(request.headers().get(http::header::CONTENT_TYPE), None);
        assert!(request.body().is_none());
    }

    #[test]
    fn should_drop_body_for_bodyless_operations() {
        let operation = Operation::<NoResponse>::new("logout", Method::GET, "/users/logout");
        let url = Url::parse("http://localhost/users/logout").expect("a valid url");
        let body = CallBody::json(&serde_json::json!({"ignored": true})).expect("a valid body");

        let request = build_request(&operation, url, &CallHeaders::new(), Some(body))
            .expect("should build");

        assert!(request.body().is_none());
        assert_eq!(request.headers().get(http::header::CONTENT_TYPE), None);
    }

    #[test]
    fn should_stringify_header_parameters() {
        let operation = Operation::<NoResponse>::new("list", Method::GET, "/users")
            .param(ParamSpec::header("ApiKey", "X-App-API-Key", ParamType::Text).required())
            .param(ParamSpec::header("TraceId", "X-Trace-Id", ParamType::Text));
        let params = CallParams::new().param("ApiKey", "secret");

        let headers = header_parameters(&operation, &params).expect("should build");

        assert_eq!(headers.get("X-App-API-Key"), Some("secret"));
        assert_eq!(headers.get("X-Trace-Id"), None);
        assert_eq!(headers.len(), 1);
    }

    #[test]
    fn should_fail_on_missing_required_header_parameter() {
        let operation = Operation::<NoResponse>::new("list", Method::GET, "/users")
            .param(ParamSpec::header("ApiKey", "X-App-API-Key", ParamType::Text).required());

        let error = header_parameters(&operation, &CallParams::new()).expect_err("should fail");

        insta::assert_snapshot!(error, @"header parameter: ApiKey is required but was not provided (expected string)");
    }
}
