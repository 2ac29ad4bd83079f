//! Cache-Control middleware
//!
//! Applies [`CacheControlPolicy`] to every response that passes through a
//! [`MiddlewareChain`](folio_http::MiddlewareChain), including handlers that
//! do not take part in conditional evaluation.

use async_trait::async_trait;
use folio_http::{Handler, Middleware, Request, Response, Result};
use std::sync::Arc;

use crate::cache_control::{CacheControlPolicy, has_persistent_session};
use crate::config::{ConditionalConfig, DEFAULT_SESSION_COOKIE};
use crate::error::ConfigResult;

/// Cache-Control middleware
///
/// # Examples
///
/// ```
/// use async_trait::async_trait;
/// use folio_conditional::CacheControlMiddleware;
/// use folio_http::{Handler, MiddlewareChain, Request, Response, Result};
/// use hyper::Method;
/// use std::sync::Arc;
///
/// struct Login;
///
/// #[async_trait]
/// impl Handler for Login {
///     async fn handle(&self, _request: Request) -> Result<Response> {
///         Ok(Response::ok().with_header("Set-Cookie", "sessionid=s1; HttpOnly"))
///     }
/// }
///
/// # tokio_test::block_on(async {
/// let chain = MiddlewareChain::new(Arc::new(Login))
///     .with_middleware(Arc::new(CacheControlMiddleware::new()));
///
/// let request = Request::builder().method(Method::POST).build().unwrap();
/// let response = chain.handle(request).await.unwrap();
/// assert_eq!(response.header_line("cache-control"), "private,must-revalidate,s-maxage=0");
/// # });
/// ```
pub struct CacheControlMiddleware {
	policy: CacheControlPolicy,
	session_cookie_names: Vec<String>,
}

impl CacheControlMiddleware {
	pub fn new() -> Self {
		Self {
			policy: CacheControlPolicy::default(),
			session_cookie_names: vec![DEFAULT_SESSION_COOKIE.to_string()],
		}
	}

	/// Build the middleware from configured directives and session cookie names.
	///
	/// # Errors
	///
	/// Fails if a configured directive is not a legal header value.
	pub fn from_config(config: &ConditionalConfig) -> ConfigResult<Self> {
		Ok(Self {
			policy: CacheControlPolicy::from_config(config)?,
			session_cookie_names: config.session_cookie_names.clone(),
		})
	}
}

impl Default for CacheControlMiddleware {
	fn default() -> Self {
		Self::new()
	}
}

#[async_trait]
impl Middleware for CacheControlMiddleware {
	async fn process(&self, request: Request, next: Arc<dyn Handler>) -> Result<Response> {
		let method = request.method.clone();
		let persistent_session = has_persistent_session(&request, &self.session_cookie_names);

		let mut response = next.handle(request).await?;
		self.policy
			.apply_to_response(&mut response, persistent_session, &method);
		Ok(response)
	}
}
