use std::collections::HashSet;
use std::sync::LazyLock;

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use regex::Regex;
use tracing::warn;

use super::operation::{Operation, ParamLocation};
use super::params::{stringify, CallParams};
use super::ApiClientError;

/// Regular expression matching path parameters in the format `{param_name}`.
static RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{(?<name>\w+)}").expect("a valid regex"));

/// Characters percent-encoded in substituted path segments: everything except
/// RFC 3986 unreserved characters, so reserved characters are encoded exactly
/// once and plain identifiers pass through untouched.
const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

fn replace_path_param(path: &str, param_name: &str, value: &str) -> String {
    let pattern = ["{", param_name, "}"].concat();
    path.replace(&pattern, value)
}

fn encode_path_segment(value: &str) -> String {
    utf8_percent_encode(value, PATH_SEGMENT).to_string()
}

/// Substitutes every path-located parameter into the operation's template.
///
/// Parameter values are stringified, percent-encoded, and substituted at
/// their named `{placeholder}`; placeholders left unresolved after all
/// declared path parameters are consumed indicate a template/declaration
/// mismatch and fail with [`ApiClientError::PathUnresolved`].
pub(in crate::client) fn resolve_path<R>(
    operation: &Operation<R>,
    params: &CallParams,
) -> Result<String, ApiClientError> {
    let mut path = operation.path_template().to_string();

    let mut names: HashSet<String> = RE
        .captures_iter(&path)
        .filter_map(|caps| caps.name("name"))
        .map(|placeholder| placeholder.as_str().to_string())
        .collect();

    for spec in operation.params_in(ParamLocation::Path) {
        if !names.remove(spec.wire_name()) {
            warn!(name = spec.wire_name(), "placeholder not found in template");
            continue;
        }

        // Path parameters are always required, so a resolved value is present.
        let Some(value) = stringify(spec, params.get(spec.name()))? else {
            continue;
        };

        path = replace_path_param(&path, spec.wire_name(), &encode_path_segment(&value));
    }

    if names.is_empty() {
        Ok(path)
    } else {
        Err(ApiClientError::PathUnresolved {
            path,
            missings: names.into_iter().collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use http::Method;
    use serde_json::json;

    use super::*;
    use crate::client::operation::{ParamSpec, ParamType};

    #[derive(Debug)]
    struct NoResponse;

    fn get_user() -> Operation<NoResponse> {
        Operation::new("get-user", Method::GET, "/users/{userId}")
            .param(ParamSpec::path("UserId", "userId", ParamType::Text))
    }

    #[test]
    fn should_substitute_path_parameter() {
        let params = CallParams::new().param("UserId", "42");

        let path = resolve_path(&get_user(), &params).expect("should resolve");

        insta::assert_snapshot!(path, @"/users/42");
    }

    #[test]
    fn should_substitute_multiple_parameters() {
        let operation = Operation::<NoResponse>::new(
            "get-post",
            Method::GET,
            "/users/{userId}/posts/{postId}",
        )
        .param(ParamSpec::path("UserId", "userId", ParamType::Number))
        .param(ParamSpec::path("PostId", "postId", ParamType::Text));
        let params = CallParams::new()
            .param("UserId", 123)
            .param("PostId", "abc");

        let path = resolve_path(&operation, &params).expect("should resolve");

        insta::assert_snapshot!(path, @"/users/123/posts/abc");
    }

    #[test]
    fn should_percent_encode_reserved_characters_once() {
        let params = CallParams::new().param("UserId", "a/b c?d&e=f%20");

        let path = resolve_path(&get_user(), &params).expect("should resolve");

        insta::assert_snapshot!(path, @"/users/a%2Fb%20c%3Fd%26e%3Df%2520");
    }

    #[test]
    fn should_keep_unreserved_characters() {
        let params = CallParams::new().param("UserId", "user-42_x.y~z");

        let path = resolve_path(&get_user(), &params).expect("should resolve");

        insta::assert_snapshot!(path, @"/users/user-42_x.y~z");
    }

    #[test]
    fn should_fail_on_missing_required_parameter() {
        let error = resolve_path(&get_user(), &CallParams::new()).expect_err("should fail");

        insta::assert_snapshot!(error, @"path parameter: UserId is required but was not provided (expected string)");
    }

    #[test]
    fn should_fail_on_uncovered_placeholder() {
        let operation =
            Operation::<NoResponse>::new("get-user", Method::GET, "/users/{userId}/{extra}")
                .param(ParamSpec::path("UserId", "userId", ParamType::Text));
        let params = CallParams::new().param("UserId", "42");

        let error = resolve_path(&operation, &params).expect_err("should fail");

        let ApiClientError::PathUnresolved { missings, .. } = error else {
            panic!("expected an unresolved path");
        };
        assert_eq!(missings, vec!["extra".to_string()]);
    }

    #[test]
    fn should_replace_all_occurrences_of_a_placeholder() {
        let operation = Operation::<NoResponse>::new("echo", Method::GET, "/test/{id}/{id}")
            .param(ParamSpec::path("Id", "id", ParamType::Number));
        let params = CallParams::new().param("Id", 7);

        let path = resolve_path(&operation, &params).expect("should resolve");

        insta::assert_snapshot!(path, @"/test/7/7");
    }

    #[test]
    fn test_replace_path_param_no_substring_collision() {
        let result = replace_path_param("/users/{user_id}/posts/{id}", "id", "123");
        assert_eq!(result, "/users/{user_id}/posts/123");

        let result = replace_path_param("/api/{user_id}/data/{id}", "user_id", "789");
        assert_eq!(result, "/api/789/data/{id}");
    }

    #[test]
    fn should_stringify_numeric_path_values() {
        let operation = Operation::<NoResponse>::new("get", Method::GET, "/orders/{orderId}")
            .param(ParamSpec::path("OrderId", "orderId", ParamType::Number));
        let params = CallParams::new().param("OrderId", json!(1024));

        let path = resolve_path(&operation, &params).expect("should resolve");

        insta::assert_snapshot!(path, @"/orders/1024");
    }
}
