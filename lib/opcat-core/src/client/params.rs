use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;
use tracing::warn;

use super::body::CallBody;
use super::operation::ParamSpec;
use super::ApiClientError;

/// The per-call value object for one operation: parameter values keyed by
/// their declared (caller-facing) names, plus an optional request body.
///
/// Values are stored as JSON values; `Option::None` serializes to `null`,
/// which the engine treats as absent. Falsy-but-present values (`0`, `false`,
/// `""`) are kept and serialized.
///
/// # Examples
///
/// ```rust
/// use opcat_core::CallParams;
///
/// let params = CallParams::new()
///     .param("PageNumber", 2)
///     .param("PageSize", 10);
/// ```
#[derive(Debug, Clone, Default)]
pub struct CallParams {
    values: IndexMap<String, Value>,
    body: Option<CallBody>,
}

impl CallParams {
    /// Creates an empty parameter set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Supplies a value for a declared parameter.
    ///
    /// A value that cannot be serialized to JSON is dropped with a warning
    /// and treated as absent; if the parameter is required, the call then
    /// fails with [`ApiClientError::MissingParameter`].
    #[must_use]
    pub fn param(mut self, name: impl Into<String>, value: impl Serialize) -> Self {
        let name = name.into();
        match serde_json::to_value(&value) {
            Ok(value) => {
                self.values.insert(name, value);
            }
            Err(error) => {
                warn!(%name, %error, "failed to serialize parameter value");
            }
        }
        self
    }

    /// Attaches a JSON request body.
    ///
    /// # Errors
    ///
    /// Returns [`ApiClientError::JsonValueError`] if the value cannot be
    /// serialized.
    pub fn json_body<T: Serialize>(mut self, value: &T) -> Result<Self, ApiClientError> {
        self.body = Some(CallBody::json(value)?);
        Ok(self)
    }

    /// Attaches an already-serialized request body.
    #[must_use]
    pub fn with_body(mut self, body: CallBody) -> Self {
        self.body = Some(body);
        self
    }

    /// Looks up a supplied value by its declared name.
    ///
    /// External validators use this to inspect parameters before the engine
    /// serializes anything.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    /// The attached body, if any.
    #[must_use]
    pub fn body(&self) -> Option<&CallBody> {
        self.body.as_ref()
    }

    pub(in crate::client) fn take_body(&mut self) -> Option<CallBody> {
        self.body.take()
    }
}

fn value_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Converts one declared parameter's supplied value to its canonical text
/// form.
///
/// Returns `Ok(None)` when an optional parameter is absent (missing key or
/// JSON `null`), so callers can omit it from the wire entirely. Scalars pass
/// through regardless of the declared type; only non-scalars are rejected.
pub(in crate::client) fn stringify(
    spec: &ParamSpec,
    value: Option<&Value>,
) -> Result<Option<String>, ApiClientError> {
    let Some(value) = value.filter(|value| !value.is_null()) else {
        if spec.is_required() {
            return Err(ApiClientError::MissingParameter {
                description: spec.describe(),
                expected: spec.expected().name(),
            });
        }
        return Ok(None);
    };

    match value {
        Value::String(text) => Ok(Some(text.clone())),
        Value::Number(number) => Ok(Some(number.to_string())),
        Value::Bool(flag) => Ok(Some(flag.to_string())),
        Value::Null | Value::Array(_) | Value::Object(_) => {
            Err(ApiClientError::ParameterTypeMismatch {
                description: spec.describe(),
                expected: spec.expected().name(),
                actual: value_type_name(value),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use serde_json::json;

    use super::*;
    use crate::client::operation::ParamType;

    fn page_number() -> ParamSpec {
        ParamSpec::query("PageNumber", "page", ParamType::Number)
    }

    #[rstest]
    #[case::number(json!(2), "2")]
    #[case::zero(json!(0), "0")]
    #[case::truthy(json!(true), "true")]
    #[case::falsy(json!(false), "false")]
    #[case::text(json!("hound"), "hound")]
    #[case::empty_text(json!(""), "")]
    #[case::float(json!(1.5), "1.5")]
    fn should_stringify_scalars(#[case] value: Value, #[case] expected: &str) {
        let result = stringify(&page_number(), Some(&value)).expect("should stringify");
        assert_eq!(result.as_deref(), Some(expected));
    }

    #[rstest]
    #[case::missing(None)]
    #[case::null(Some(json!(null)))]
    fn should_omit_absent_optional_values(#[case] value: Option<Value>) {
        let result = stringify(&page_number(), value.as_ref()).expect("should be omitted");
        assert_eq!(result, None);
    }

    #[rstest]
    #[case::missing(None)]
    #[case::null(Some(json!(null)))]
    fn should_fail_on_absent_required_values(#[case] value: Option<Value>) {
        let spec = ParamSpec::path("UserId", "userId", ParamType::Text);

        let error = stringify(&spec, value.as_ref()).expect_err("should fail");

        insta::allow_duplicates! {
            insta::assert_snapshot!(error, @"path parameter: UserId is required but was not provided (expected string)");
        }
        assert!(error.is_invalid_request());
    }

    #[rstest]
    #[case::array(json!(["a", "b"]), "array")]
    #[case::object(json!({"nested": true}), "object")]
    fn should_reject_non_scalar_values(#[case] value: Value, #[case] actual: &str) {
        let error = stringify(&page_number(), Some(&value)).expect_err("should fail");

        let ApiClientError::ParameterTypeMismatch {
            description,
            expected,
            actual: got,
        } = error
        else {
            panic!("expected a type mismatch");
        };
        assert_eq!(description, "query parameter: PageNumber");
        assert_eq!(expected, "number");
        assert_eq!(got, actual);
    }

    #[test]
    fn should_treat_option_none_as_absent() {
        let params = CallParams::new().param("PageNumber", Option::<u32>::None);

        let result =
            stringify(&page_number(), params.get("PageNumber")).expect("should be omitted");
        assert_eq!(result, None);
    }

    #[test]
    fn should_keep_scalars_supplied_for_a_differently_declared_type() {
        // The declared type catalogs intent; scalars are not cross-checked.
        let result = stringify(&page_number(), Some(&json!("two"))).expect("should stringify");
        assert_eq!(result.as_deref(), Some("two"));
    }
}
