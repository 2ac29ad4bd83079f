//! Handler and middleware traits.
//!
//! A [`Handler`] turns a request into a response. A [`Middleware`] wraps the
//! next handler to add behavior before or after it, and a [`MiddlewareChain`]
//! composes several of them around an endpoint.
//!
//! ```rust
//! use folio_http::{Handler, Middleware, MiddlewareChain, Request, Response, Result};
//! use async_trait::async_trait;
//! use std::sync::Arc;
//!
//! struct PageHandler;
//!
//! #[async_trait]
//! impl Handler for PageHandler {
//!     async fn handle(&self, _request: Request) -> Result<Response> {
//!         Ok(Response::ok().with_body("wikitext"))
//!     }
//! }
//!
//! struct VaryCookie;
//!
//! #[async_trait]
//! impl Middleware for VaryCookie {
//!     async fn process(&self, request: Request, next: Arc<dyn Handler>) -> Result<Response> {
//!         let response = next.handle(request).await?;
//!         Ok(response.with_header("Vary", "Cookie"))
//!     }
//! }
//!
//! # tokio_test::block_on(async {
//! let chain = MiddlewareChain::new(Arc::new(PageHandler)).with_middleware(Arc::new(VaryCookie));
//! let response = chain.handle(Request::builder().build().unwrap()).await.unwrap();
//! assert_eq!(response.header_line("vary"), "Cookie");
//! # });
//! ```

use async_trait::async_trait;
use std::sync::Arc;

use crate::{Request, Response, Result};

/// Handler trait for processing requests.
#[async_trait]
pub trait Handler: Send + Sync {
	/// Handles an HTTP request and produces a response.
	///
	/// # Errors
	///
	/// Returns an error if the request cannot be processed.
	async fn handle(&self, request: Request) -> Result<Response>;
}

#[async_trait]
impl<T: Handler + ?Sized> Handler for Arc<T> {
	async fn handle(&self, request: Request) -> Result<Response> {
		(**self).handle(request).await
	}
}

/// Middleware trait for request/response processing.
#[async_trait]
pub trait Middleware: Send + Sync {
	/// Processes a request, usually by delegating to `next`.
	///
	/// # Errors
	///
	/// Returns an error if the middleware or next handler fails.
	async fn process(&self, request: Request, next: Arc<dyn Handler>) -> Result<Response>;

	/// Whether this middleware takes part in handling `request`.
	///
	/// Skipped middleware are left out of the composed chain entirely.
	fn should_continue(&self, _request: &Request) -> bool {
		true
	}
}

/// Middleware chain around a single endpoint handler.
///
/// Middleware run in the order they were added: the first one added sees the
/// request first and the response last.
pub struct MiddlewareChain {
	middlewares: Vec<Arc<dyn Middleware>>,
	handler: Arc<dyn Handler>,
}

impl MiddlewareChain {
	pub fn new(handler: Arc<dyn Handler>) -> Self {
		Self {
			middlewares: Vec::new(),
			handler,
		}
	}

	/// Adds a middleware using builder style.
	pub fn with_middleware(mut self, middleware: Arc<dyn Middleware>) -> Self {
		self.middlewares.push(middleware);
		self
	}

	pub fn add_middleware(&mut self, middleware: Arc<dyn Middleware>) {
		self.middlewares.push(middleware);
	}

	/// Number of registered middleware.
	pub fn len(&self) -> usize {
		self.middlewares.len()
	}

	pub fn is_empty(&self) -> bool {
		self.middlewares.is_empty()
	}
}

#[async_trait]
impl Handler for MiddlewareChain {
	async fn handle(&self, request: Request) -> Result<Response> {
		// Innermost first so the first-added middleware ends up outermost.
		let composed = self
			.middlewares
			.iter()
			.rev()
			.filter(|mw| mw.should_continue(&request))
			.fold(self.handler.clone(), |next, middleware| {
				Arc::new(ComposedHandler {
					middleware: middleware.clone(),
					next,
				}) as Arc<dyn Handler>
			});

		composed.handle(request).await
	}
}

struct ComposedHandler {
	middleware: Arc<dyn Middleware>,
	next: Arc<dyn Handler>,
}

#[async_trait]
impl Handler for ComposedHandler {
	async fn handle(&self, request: Request) -> Result<Response> {
		self.middleware.process(request, self.next.clone()).await
	}
}
