//! Endpoint handler that runs a [`ConditionalResource`] behind its preconditions.

use async_trait::async_trait;
use folio_http::{Handler, Request, Response, Result};
use std::sync::Arc;

use crate::cache_control::{CacheControlPolicy, has_persistent_session};
use crate::config::ConditionalConfig;
use crate::error::ConfigResult;
use crate::headers::ConditionalHeaders;
use crate::precondition::{Outcome, PreconditionEvaluator};
use crate::resource::ConditionalResource;
use crate::synthesizer;
use crate::validators::ValidatorState;

/// Wraps a resource so that every request goes through:
///
/// 1. parse the precondition headers and capture [`ValidatorState`] once
/// 2. evaluate; answer 304 or 412 without running the resource if required
/// 3. otherwise execute the resource and add `ETag` / `Last-Modified`
/// 4. apply the Cache-Control policy
///
/// # Examples
///
/// ```
/// use async_trait::async_trait;
/// use folio_conditional::{ConditionalHandler, ConditionalResource, EntityTag};
/// use folio_http::{Handler, Request, Response, Result};
/// use hyper::StatusCode;
///
/// struct MainPage;
///
/// #[async_trait]
/// impl ConditionalResource for MainPage {
///     async fn etag(&self, _request: &Request) -> Option<EntityTag> {
///         Some(EntityTag::strong("r100"))
///     }
///     async fn execute(&self, _request: Request) -> Result<Response> {
///         Ok(Response::ok().with_body("Welcome"))
///     }
/// }
///
/// # tokio_test::block_on(async {
/// let handler = ConditionalHandler::new(MainPage);
///
/// let fresh = handler.handle(Request::builder().build().unwrap()).await.unwrap();
/// assert_eq!(fresh.status, StatusCode::OK);
/// assert_eq!(fresh.header_line("etag"), "\"r100\"");
///
/// let revalidate = Request::builder().header("If-None-Match", "\"r100\"").build().unwrap();
/// let cached = handler.handle(revalidate).await.unwrap();
/// assert_eq!(cached.status, StatusCode::NOT_MODIFIED);
/// # });
/// ```
pub struct ConditionalHandler<R> {
	resource: R,
	evaluator: PreconditionEvaluator,
	cache_policy: CacheControlPolicy,
	config: Arc<ConditionalConfig>,
}

impl<R: ConditionalResource> ConditionalHandler<R> {
	/// Wrap `resource` with the default configuration.
	pub fn new(resource: R) -> Self {
		let config = ConditionalConfig::default();
		Self {
			resource,
			evaluator: PreconditionEvaluator::from_config(&config),
			cache_policy: CacheControlPolicy::default(),
			config: Arc::new(config),
		}
	}

	/// Wrap `resource` with a shared configuration.
	///
	/// # Errors
	///
	/// Fails if the configuration does not validate.
	pub fn with_config(resource: R, config: Arc<ConditionalConfig>) -> ConfigResult<Self> {
		config.validate()?;
		Ok(Self {
			resource,
			evaluator: PreconditionEvaluator::from_config(&config),
			cache_policy: CacheControlPolicy::from_config(&config)?,
			config,
		})
	}

	pub fn resource(&self) -> &R {
		&self.resource
	}

	pub fn config(&self) -> &ConditionalConfig {
		&self.config
	}

	fn short_circuit(&self, outcome: Outcome, state: &ValidatorState) -> Response {
		match outcome {
			Outcome::NotModified => synthesizer::not_modified_response(state),
			_ => Response::precondition_failed()
				.with_body(self.config.precondition_failed_body.clone()),
		}
		.with_stop_chain(true)
	}
}

#[async_trait]
impl<R: ConditionalResource> Handler for ConditionalHandler<R> {
	async fn handle(&self, request: Request) -> Result<Response> {
		let method = request.method.clone();
		let headers = ConditionalHeaders::from_request(&request);
		let persistent_session = has_persistent_session(&request, &self.config.session_cookie_names);
		let state = ValidatorState::capture(&self.resource, &request).await;

		let outcome = self.evaluator.evaluate(&state, &headers, &method);
		let mut response = if outcome.is_proceed() {
			let mut response = self.resource.execute(request).await?;
			synthesizer::apply(&mut response, &state, &method);
			response
		} else {
			tracing::debug!(
				method = %method,
				path = %request.path(),
				outcome = ?outcome,
				"precondition short-circuit"
			);
			self.short_circuit(outcome, &state)
		};

		self.cache_policy
			.apply_to_response(&mut response, persistent_session, &method);
		Ok(response)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::entity_tag::EntityTag;
	use chrono::{DateTime, Utc};
	use hyper::header::{CACHE_CONTROL, ETAG, LAST_MODIFIED};
	use hyper::{Method, StatusCode};
	use rstest::rstest;
	use std::sync::atomic::{AtomicUsize, Ordering};

	struct Page {
		revision: &'static str,
		executions: AtomicUsize,
	}

	impl Page {
		fn new(revision: &'static str) -> Self {
			Self {
				revision,
				executions: AtomicUsize::new(0),
			}
		}
	}

	#[async_trait]
	impl ConditionalResource for Page {
		async fn etag(&self, _request: &Request) -> Option<EntityTag> {
			Some(EntityTag::new(self.revision))
		}

		async fn last_modified(&self, _request: &Request) -> Option<DateTime<Utc>> {
			DateTime::from_timestamp(1000, 0)
		}

		async fn execute(&self, request: Request) -> Result<Response> {
			self.executions.fetch_add(1, Ordering::SeqCst);
			if request.method == Method::GET {
				Ok(Response::ok().with_body("page text"))
			} else {
				Ok(Response::no_content().with_header("ETag", "\"next\""))
			}
		}
	}

	struct Archived;

	#[async_trait]
	impl ConditionalResource for Archived {
		async fn etag(&self, _request: &Request) -> Option<EntityTag> {
			Some(EntityTag::strong("v1"))
		}

		async fn last_modified(&self, _request: &Request) -> Option<DateTime<Utc>> {
			DateTime::from_timestamp(-86_400, 0)
		}

		async fn execute(&self, _request: Request) -> Result<Response> {
			Ok(Response::ok().with_body("archived page"))
		}
	}

	struct Failing;

	#[async_trait]
	impl ConditionalResource for Failing {
		async fn execute(&self, _request: Request) -> Result<Response> {
			Err(folio_http::Error::Handler("storage unavailable".to_string()))
		}
	}

	#[rstest]
	#[tokio::test]
	async fn test_get_without_preconditions_sets_validators() {
		let handler = ConditionalHandler::new(Page::new("abc"));

		let response = handler
			.handle(Request::builder().build().unwrap())
			.await
			.unwrap();

		assert_eq!(response.status, StatusCode::OK);
		assert_eq!(response.header_line(ETAG), "abc");
		assert_eq!(
			response.header_line(LAST_MODIFIED),
			"Thu, 01 Jan 1970 00:16:40 GMT"
		);
		assert!(!response.has_header(CACHE_CONTROL));
		assert_eq!(handler.resource().executions.load(Ordering::SeqCst), 1);
	}

	#[rstest]
	#[tokio::test]
	async fn test_if_none_match_hit_skips_execution() {
		let handler = ConditionalHandler::new(Page::new("\"v1\""));
		let request = Request::builder()
			.header("If-None-Match", "\"v1\"")
			.build()
			.unwrap();

		let response = handler.handle(request).await.unwrap();

		assert_eq!(response.status, StatusCode::NOT_MODIFIED);
		assert!(response.should_stop_chain());
		assert_eq!(response.header_line(ETAG), "\"v1\"");
		assert!(response.body.is_empty());
		assert_eq!(handler.resource().executions.load(Ordering::SeqCst), 0);
	}

	#[rstest]
	#[tokio::test]
	async fn test_if_match_miss_returns_412() {
		let handler = ConditionalHandler::new(Page::new("\"xyz\""));
		let request = Request::builder()
			.method(Method::POST)
			.header("If-Match", "\"abc\"")
			.build()
			.unwrap();

		let response = handler.handle(request).await.unwrap();

		assert_eq!(response.status, StatusCode::PRECONDITION_FAILED);
		assert_eq!(response.body, "Precondition Failed");
		assert_eq!(response.header_line(CACHE_CONTROL), "private,no-cache,s-maxage=0");
		assert_eq!(handler.resource().executions.load(Ordering::SeqCst), 0);
	}

	#[rstest]
	#[tokio::test]
	async fn test_write_keeps_handler_validators() {
		let handler = ConditionalHandler::new(Page::new("\"v1\""));
		let request = Request::builder()
			.method(Method::PUT)
			.header("If-Match", "\"v1\"")
			.build()
			.unwrap();

		let response = handler.handle(request).await.unwrap();

		assert_eq!(response.status, StatusCode::NO_CONTENT);
		assert_eq!(response.header_line(ETAG), "\"next\"");
		assert!(!response.has_header(LAST_MODIFIED));
		assert_eq!(handler.resource().executions.load(Ordering::SeqCst), 1);
	}

	#[rstest]
	#[tokio::test]
	async fn test_session_cookie_forces_private_cache() {
		let config = ConditionalConfig::default().with_session_cookie_names(["wiki_session"]);
		let handler = ConditionalHandler::with_config(Page::new("\"v1\""), Arc::new(config)).unwrap();
		let request = Request::builder()
			.header("Cookie", "wiki_session=u42")
			.header("If-None-Match", "\"v1\"")
			.build()
			.unwrap();

		let response = handler.handle(request).await.unwrap();

		assert_eq!(response.status, StatusCode::NOT_MODIFIED);
		assert_eq!(
			response.header_line(CACHE_CONTROL),
			"private,must-revalidate,s-maxage=0"
		);
	}

	#[rstest]
	#[tokio::test]
	async fn test_custom_precondition_failed_body() {
		let config = ConditionalConfig::default().with_precondition_failed_body("edit conflict");
		let handler = ConditionalHandler::with_config(Page::new("\"v2\""), Arc::new(config)).unwrap();
		let request = Request::builder()
			.method(Method::PUT)
			.header("If-Match", "\"v1\"")
			.build()
			.unwrap();

		let response = handler.handle(request).await.unwrap();

		assert_eq!(response.body, "edit conflict");
	}

	#[rstest]
	fn test_with_config_rejects_invalid_config() {
		let config = ConditionalConfig::default().with_uncacheable_cache_control("");
		assert!(ConditionalHandler::with_config(Page::new("x"), Arc::new(config)).is_err());
	}

	#[rstest]
	#[case(None, StatusCode::OK)]
	#[case(Some("\"v1\""), StatusCode::NOT_MODIFIED)]
	#[tokio::test]
	async fn test_pre_epoch_last_modified_omits_header(
		#[case] if_none_match: Option<&str>,
		#[case] expected: StatusCode,
	) {
		let handler = ConditionalHandler::new(Archived);
		let mut builder = Request::builder();
		if let Some(value) = if_none_match {
			builder = builder.header("If-None-Match", value);
		}

		let response = handler.handle(builder.build().unwrap()).await.unwrap();

		assert_eq!(response.status, expected);
		assert_eq!(response.header_line(ETAG), "\"v1\"");
		assert!(!response.has_header(LAST_MODIFIED));
	}

	#[rstest]
	#[tokio::test]
	async fn test_execution_errors_propagate() {
		let handler = ConditionalHandler::new(Failing);

		let err = handler
			.handle(Request::builder().build().unwrap())
			.await
			.unwrap_err();

		assert_eq!(err.status_code(), 500);
	}
}
