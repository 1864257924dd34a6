//! # opcat-core
//!
//! A catalog-driven, strongly-typed REST client engine.
//!
//! Generated SDKs describe each endpoint as an [`Operation`]: HTTP method,
//! `{name}` path template, declared parameters, body kind, and a catalog
//! mapping literal status codes to response decoders. This crate turns such a
//! description plus per-call [`CallParams`] into one HTTP exchange and a
//! discriminated [`CallResult`]:
//!
//! - the **request builder** validates parameters before any I/O, substitutes
//!   path parameters (percent-encoded exactly once), assembles the query
//!   string in declaration order, stringifies header parameters, serializes
//!   the JSON body, and overlays headers (per-call wins over client
//!   defaults);
//! - the **response discriminator** matches the status code by exact
//!   equality against the catalog and runs the registered decoder, or hands
//!   back the raw, unread response as [`CallResponse::Unknown`] — a
//!   non-cataloged status is a result, never an error.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use std::sync::LazyLock;
//!
//! use http::Method;
//! use opcat_core::{decode_json, ApiClient, CallParams, CallResponse, Operation, ParamSpec, ParamType};
//! use serde::Deserialize;
//!
//! #[derive(Debug, Deserialize)]
//! struct User {
//!     id: String,
//!     name: String,
//! }
//!
//! #[derive(Debug)]
//! enum GetUserResponse {
//!     Ok(User),
//!     NotFound,
//! }
//!
//! static GET_USER: LazyLock<Operation<GetUserResponse>> = LazyLock::new(|| {
//!     Operation::new("get-user", Method::GET, "/users/{userId}")
//!         .param(ParamSpec::path("UserId", "userId", ParamType::Text))
//!         .on_status(200, |body| decode_json::<User>(body).map(GetUserResponse::Ok))
//!         .on_status(404, |_| Ok(GetUserResponse::NotFound))
//! });
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = ApiClient::builder()
//!         .with_base_url("https://api.example.com")
//!         .build()?;
//!
//!     let params = CallParams::new().param("UserId", "42");
//!     let result = client.call(&GET_USER, params).await?;
//!
//!     match result.into_response() {
//!         CallResponse::Decoded(GetUserResponse::Ok(user)) => {
//!             tracing::info!(name = %user.name, "found user");
//!         }
//!         CallResponse::Decoded(GetUserResponse::NotFound) => {
//!             tracing::info!("no such user");
//!         }
//!         CallResponse::Unknown(raw) => {
//!             tracing::warn!(status = raw.status().as_u16(), "status not in catalog");
//!         }
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Error model
//!
//! A call either returns a populated [`CallResult`] (cataloged or unknown
//! status) or fails with exactly one [`ApiClientError`]:
//!
//! - the invalid-request family (missing/mismatched parameters, validator
//!   rejection) is raised synchronously before any network I/O — see
//!   [`ApiClientError::is_invalid_request`];
//! - transport failures propagate the underlying [`reqwest::Error`]
//!   undisguised;
//! - decode failures surface the serde path and offending body.

mod client;

pub use client::{
    decode_json, ApiCall, ApiClient, ApiClientBuilder, ApiClientError, BodyKind, CallBody,
    CallHeaders, CallParams, CallResponse, CallResult, Catalog, Decoder, Operation, ParamLocation,
    ParamSpec, ParamType, RawResponse, Validator,
};
