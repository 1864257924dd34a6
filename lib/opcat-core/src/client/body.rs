use headers::ContentType;
use serde::Serialize;

use super::ApiClientError;

/// A serialized request payload with its content type.
///
/// The payload is attached to a request only when the operation declares a
/// body; the `Content-Type` header is set from this value in that case and
/// omitted otherwise.
#[derive(Clone, derive_more::Debug)]
pub struct CallBody {
    pub(in crate::client) content_type: ContentType,
    #[debug(ignore)]
    pub(in crate::client) data: Vec<u8>,
}

impl CallBody {
    /// Creates a JSON body from a serializable value.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use opcat_core::CallBody;
    /// # use serde::Serialize;
    /// # fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// #[derive(Serialize)]
    /// struct NewUser {
    ///     name: String,
    ///     email: String,
    /// }
    ///
    /// let body = CallBody::json(&NewUser {
    ///     name: "Alice".to_string(),
    ///     email: "alice@example.com".to_string(),
    /// })?;
    /// # Ok(())
    /// # }
    /// ```
    ///
    /// # Errors
    ///
    /// Returns [`ApiClientError::JsonValueError`] if the value cannot be
    /// serialized.
    pub fn json<T>(value: &T) -> Result<Self, ApiClientError>
    where
        T: Serialize,
    {
        let data = serde_json::to_vec(value)?;
        Ok(Self {
            content_type: ContentType::json(),
            data,
        })
    }

    /// Creates a raw body with a custom content type.
    #[must_use]
    pub fn raw(data: Vec<u8>, content_type: ContentType) -> Self {
        Self { content_type, data }
    }

    /// The content type advertised for this payload.
    #[must_use]
    pub fn content_type(&self) -> &ContentType {
        &self.content_type
    }

    /// The serialized payload bytes.
    #[must_use]
    pub fn data(&self) -> &[u8] {
        &self.data
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_serialize_json_body() {
        let body = CallBody::json(&serde_json::json!({"name": "Alice", "age": 30}))
            .expect("should serialize");

        assert_eq!(body.content_type(), &ContentType::json());
        insta::assert_snapshot!(
            String::from_utf8_lossy(body.data()),
            @r#"{"age":30,"name":"Alice"}"#
        );
    }

    #[test]
    fn should_keep_raw_content_type() {
        let body = CallBody::raw(b"<user/>".to_vec(), ContentType::xml());

        assert_eq!(body.content_type(), &ContentType::xml());
        assert_eq!(body.data(), b"<user/>");
    }
}
