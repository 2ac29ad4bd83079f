//! # Folio
//!
//! Conditional request handling for REST endpoint handlers.
//!
//! Folio lets a resource handler declare its validators (entity tag,
//! last-modified time, existence) and takes care of the HTTP contract around
//! them: `If-Match` / `If-None-Match` / `If-Modified-Since` /
//! `If-Unmodified-Since` evaluation, `304 Not Modified` and
//! `412 Precondition Failed` short-circuits, `ETag` and `Last-Modified` on
//! successful reads, and a Cache-Control policy that keeps per-user responses
//! out of shared caches.
//!
//! ## Crates
//!
//! - [`http`] (`folio-http`): request, response, handler and middleware plumbing
//! - [`conditional`] (`folio-conditional`): evaluator, header synthesis,
//!   Cache-Control policy, the [`ConditionalResource`] contract and
//!   [`ConditionalHandler`]
//!
//! ## Quick Example
//!
//! ```rust
//! use folio::prelude::*;
//! use std::sync::Arc;
//!
//! struct Article;
//!
//! #[async_trait]
//! impl ConditionalResource for Article {
//!     async fn etag(&self, _request: &Request) -> Option<EntityTag> {
//!         Some(EntityTag::strong("rev-12"))
//!     }
//!
//!     async fn execute(&self, _request: Request) -> Result<Response> {
//!         Ok(Response::ok().with_body("Article text"))
//!     }
//! }
//!
//! # tokio_test::block_on(async {
//! let chain = MiddlewareChain::new(Arc::new(ConditionalHandler::new(Article)))
//!     .with_middleware(Arc::new(CacheControlMiddleware::new()));
//!
//! let request = Request::builder()
//!     .uri("/rest/v1/page/Article")
//!     .header("If-None-Match", "\"rev-12\"")
//!     .build()
//!     .unwrap();
//! let response = chain.handle(request).await.unwrap();
//! assert_eq!(response.status, StatusCode::NOT_MODIFIED);
//! # });
//! ```

pub use folio_conditional as conditional;
pub use folio_http as http;

pub use folio_http::{
	Error, Handler, Middleware, MiddlewareChain, Request, RequestBuilder, Response, Result,
};

pub use folio_conditional::{
	CacheControlMiddleware, CacheControlPolicy, ConditionalConfig, ConditionalHandler,
	ConditionalHeaders, ConditionalResource, ConfigError, ConfigResult, EntityTag, EtagCondition,
	Outcome, PreconditionEvaluator, ValidatorState, evaluate, synthesizer,
};

/// Prelude module for convenient imports
pub mod prelude {
	pub use crate::{
		CacheControlMiddleware, ConditionalConfig, ConditionalHandler, ConditionalResource,
		EntityTag, Error, Handler, Middleware, MiddlewareChain, Request, Response, Result,
		ValidatorState,
	};

	// External
	pub use async_trait::async_trait;
	pub use hyper::{Method, StatusCode};
}
