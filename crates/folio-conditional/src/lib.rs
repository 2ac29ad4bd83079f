//! # Folio Conditional
//!
//! Conditional request handling for REST endpoints: `If-Match`,
//! `If-None-Match`, `If-Modified-Since` and `If-Unmodified-Since` evaluation,
//! `ETag` / `Last-Modified` synthesis and a Cache-Control policy for
//! per-user responses.
//!
//! ## Flow
//!
//! A [`ConditionalHandler`] wraps a [`ConditionalResource`]. For each request
//! it captures the resource's [`ValidatorState`] once, evaluates the
//! [`ConditionalHeaders`] against it, and either answers `304`/`412` without
//! running the resource or executes it and adds validators to the response.
//! [`CacheControlPolicy`] runs last on every response.
//!
//! ```
//! use chrono::DateTime;
//! use folio_conditional::{ConditionalHeaders, EntityTag, Outcome, ValidatorState, evaluate};
//! use hyper::Method;
//!
//! let state = ValidatorState::new()
//!     .with_entity_tag(EntityTag::strong("r42"))
//!     .with_last_modified(DateTime::from_timestamp(1_700_000_000, 0).unwrap());
//!
//! let mut request_headers = hyper::HeaderMap::new();
//! request_headers.insert("if-none-match", "\"r42\"".parse().unwrap());
//! let headers = ConditionalHeaders::from_header_map(&request_headers);
//!
//! assert_eq!(evaluate(&state, &headers, &Method::GET), Outcome::NotModified);
//! assert_eq!(evaluate(&state, &headers, &Method::PUT), Outcome::PreconditionFailed);
//! ```
//!
//! ## Configuration
//!
//! [`ConditionalConfig`] is loaded from TOML or built in code and passed to
//! [`ConditionalHandler::with_config`] and [`CacheControlMiddleware::from_config`].

pub mod cache_control;
pub mod config;
pub mod entity_tag;
pub mod error;
pub mod handler;
pub mod headers;
pub mod middleware;
pub mod precondition;
pub mod resource;
pub mod synthesizer;
pub mod validators;

pub use cache_control::{CacheControlPolicy, has_persistent_session};
pub use config::{
	ConditionalConfig, DEFAULT_SESSION_COOKIE, PRIVATE_CACHE_CONTROL, UNCACHEABLE_CACHE_CONTROL,
};
pub use entity_tag::{EntityTag, EtagCondition};
pub use error::{ConfigError, ConfigResult};
pub use handler::ConditionalHandler;
pub use headers::{ConditionalHeaders, format_http_date, parse_http_date};
pub use middleware::CacheControlMiddleware;
pub use precondition::{Outcome, PreconditionEvaluator, evaluate};
pub use resource::ConditionalResource;
pub use validators::ValidatorState;
