//! # apiservice - a base for REST resource clients
//!
//! `apiservice` gives resource clients a shared way to call a REST API: build
//! the URL from a base endpoint, send JSON with GET/POST/PUT/PATCH, read the
//! JSON answer, and log one tagged line per call. Every call returns an
//! [`ApiResponse`] envelope, so callers check a flag instead of handling
//! errors.
//!
//! ## Quick Start
//!
//! ```no_run
//! use apiservice::{ApiService, ReqwestTransport, RequestOptions, TracingLogger};
//! use serde::{Deserialize, Serialize};
//! use std::sync::Arc;
//!
//! #[derive(Serialize)]
//! struct CreateUser {
//!     name: String,
//! }
//!
//! #[derive(Deserialize)]
//! struct User {
//!     id: u64,
//!     name: String,
//! }
//!
//! #[tokio::main]
//! async fn main() -> Result<(), apiservice::Error> {
//!     // The transport owns the host and the connection pool
//!     let transport = ReqwestTransport::from_host("https://api.example.com")?;
//!
//!     // One service per resource
//!     let users = ApiService::builder()
//!         .base_endpoint("/users")
//!         .api_key("Bearer my-token")
//!         .transport(transport)
//!         .logger(Arc::new(TracingLogger))
//!         .build()?;
//!
//!     // GET /users/123
//!     let user = users.get::<User>(RequestOptions::path("123")).await;
//!     if let Some(user) = user.data {
//!         println!("User: {}", user.name);
//!     }
//!
//!     // POST /users
//!     let new_user = CreateUser { name: "Alice".to_string() };
//!     let created = users
//!         .post::<_, User>(Some(&new_user), RequestOptions::default())
//!         .await;
//!     if !created.is_success() {
//!         eprintln!("HTTP {}: {:?}", created.http_status_code, created.message);
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Envelope results** - network errors, timeouts, error statuses and bad
//!   JSON never escape a call
//! - **URL normalization** - [`uri::build_uri`] joins endpoint, sub-path and
//!   query with single separators
//! - **Pluggable transport** - anything implementing [`ApiTransport`];
//!   [`ReqwestTransport`] ships in the box
//! - **Tagged logging** - one `[DBG][HttpVerb: ..][URL: ..][HttpCode: ..]`
//!   line per call through an injected [`CallLogger`]
//! - **Builder configuration** - base endpoint, api key, default headers and
//!   logger are fixed at construction
//!
//! ## Logging
//!
//! Lines look like this:
//!
//! ```text
//! [DBG][HttpVerb: GET][URL: /users/123][HttpCode: 200]
//! [DBG][HttpVerb: GET][URL: /users/9][HttpCode: 404][Error: Response status code does not indicate success: 404 Not Found][ErrSource: Status][ErrStack][HttpStream: {"error":"missing"}]
//! ```
//!
//! Successful calls log at `INFO`, everything else at `ERROR`. A service
//! built without a logger logs nothing.

mod client;
mod error;
pub mod logging;
mod options;
pub mod people;
mod response;
pub mod transport;
pub mod uri;

pub use client::{ApiService, ApiServiceBuilder, INVALID_URL, JSON_CONTENT_TYPE, NO_VALID_PAYLOAD};
pub use error::{Error, Result};
pub use logging::{CallLogger, LogLine, NoopLogger, TracingLogger};
pub use options::{JsonOptions, RequestOptions};
pub use response::ApiResponse;
pub use transport::{ApiTransport, ReqwestTransport, TransportRequest, TransportResponse};
