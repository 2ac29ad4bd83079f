//! Cache-Control policy for responses that may be per-user.

use folio_http::request::is_read_only;
use folio_http::{Request, Response};
use hyper::Method;
use hyper::header::{CACHE_CONTROL, HeaderValue, SET_COOKIE};

use crate::config::{
	ConditionalConfig, PRIVATE_CACHE_CONTROL, UNCACHEABLE_CACHE_CONTROL, directive_value,
};
use crate::error::ConfigResult;

/// Keeps per-user responses out of shared caches.
///
/// - A response that sets a cookie, or answers a request with a persistent
///   session, gets the private directive regardless of what it already had.
/// - Otherwise a non-GET/HEAD response without Cache-Control gets the
///   uncacheable default.
/// - Anything else is left alone.
#[derive(Debug, Clone)]
pub struct CacheControlPolicy {
	private: HeaderValue,
	uncacheable: HeaderValue,
}

impl Default for CacheControlPolicy {
	fn default() -> Self {
		Self {
			private: HeaderValue::from_static(PRIVATE_CACHE_CONTROL),
			uncacheable: HeaderValue::from_static(UNCACHEABLE_CACHE_CONTROL),
		}
	}
}

impl CacheControlPolicy {
	pub fn new() -> Self {
		Self::default()
	}

	/// Build the policy from configured directives.
	///
	/// # Errors
	///
	/// Returns [`crate::ConfigError::InvalidValue`] if a directive is not a
	/// legal header value.
	pub fn from_config(config: &ConditionalConfig) -> ConfigResult<Self> {
		Ok(Self {
			private: directive_value("private_cache_control", &config.private_cache_control)?,
			uncacheable: directive_value(
				"uncacheable_cache_control",
				&config.uncacheable_cache_control,
			)?,
		})
	}

	/// Apply the policy.
	///
	/// # Examples
	///
	/// ```
	/// use folio_conditional::CacheControlPolicy;
	/// use folio_http::Response;
	/// use hyper::Method;
	///
	/// let policy = CacheControlPolicy::new();
	///
	/// let mut response = Response::ok().with_header("Cache-Control", "public, max-age=300");
	/// policy.apply(&mut response, true, false, &Method::GET);
	/// assert_eq!(response.header_line("cache-control"), "private,must-revalidate,s-maxage=0");
	///
	/// let mut response = Response::created();
	/// policy.apply(&mut response, false, false, &Method::POST);
	/// assert_eq!(response.header_line("cache-control"), "private,no-cache,s-maxage=0");
	///
	/// let mut response = Response::ok();
	/// policy.apply(&mut response, false, false, &Method::GET);
	/// assert!(!response.has_header("cache-control"));
	/// ```
	pub fn apply(
		&self,
		response: &mut Response,
		has_cookies: bool,
		has_persistent_session: bool,
		method: &Method,
	) {
		if has_cookies || has_persistent_session {
			tracing::trace!(
				has_cookies,
				has_persistent_session,
				"forcing private Cache-Control"
			);
			response.headers.insert(CACHE_CONTROL, self.private.clone());
		} else if !response.has_header(CACHE_CONTROL) && !is_read_only(method) {
			response.headers.insert(CACHE_CONTROL, self.uncacheable.clone());
		}
	}

	/// Apply the policy, taking `has_cookies` from the response's `Set-Cookie`.
	pub fn apply_to_response(
		&self,
		response: &mut Response,
		has_persistent_session: bool,
		method: &Method,
	) {
		let has_cookies = response.has_header(SET_COOKIE);
		self.apply(response, has_cookies, has_persistent_session, method);
	}
}

/// Whether the request carries a non-empty cookie with one of `cookie_names`.
///
/// # Examples
///
/// ```
/// use folio_conditional::has_persistent_session;
/// use folio_http::Request;
///
/// let names = vec!["wiki_session".to_string()];
/// let request = Request::builder()
///     .header("Cookie", "wiki_session=3f2a")
///     .build()
///     .unwrap();
/// assert!(has_persistent_session(&request, &names));
///
/// let anonymous = Request::builder().build().unwrap();
/// assert!(!has_persistent_session(&anonymous, &names));
/// ```
pub fn has_persistent_session(request: &Request, cookie_names: &[String]) -> bool {
	cookie_names
		.iter()
		.filter_map(|name| request.cookie(name))
		.any(|value| !value.is_empty())
}
