//! Validator headers on outgoing responses.

use folio_http::Response;
use folio_http::request::is_read_only;
use hyper::Method;
use hyper::header::{ETAG, HeaderValue, LAST_MODIFIED};

use crate::headers::format_http_date;
use crate::validators::ValidatorState;

/// Attach `ETag` and `Last-Modified` from the pre-execution state.
///
/// Only GET and HEAD responses below 400 are touched; handlers of
/// state-changing methods set validators for the new state themselves.
/// Existing values are replaced, so applying twice yields the same headers.
///
/// # Examples
///
/// ```
/// use chrono::DateTime;
/// use folio_conditional::{ValidatorState, synthesizer};
/// use folio_http::Response;
/// use hyper::Method;
///
/// let state = ValidatorState::new()
///     .with_entity_tag("abc")
///     .with_last_modified(DateTime::from_timestamp(1000, 0).unwrap());
///
/// let mut response = Response::ok();
/// synthesizer::apply(&mut response, &state, &Method::GET);
///
/// assert_eq!(response.header_line("etag"), "abc");
/// assert_eq!(response.header_line("last-modified"), "Thu, 01 Jan 1970 00:16:40 GMT");
/// ```
pub fn apply(response: &mut Response, state: &ValidatorState, method: &Method) {
	if !is_read_only(method) || response.status.as_u16() >= 400 {
		return;
	}
	write_validators(response, state);
}

/// A 304 response carrying the same validators a 200 would have had.
///
/// # Examples
///
/// ```
/// use folio_conditional::{EntityTag, ValidatorState, synthesizer};
/// use hyper::StatusCode;
///
/// let state = ValidatorState::new().with_entity_tag(EntityTag::strong("r9"));
/// let response = synthesizer::not_modified_response(&state);
///
/// assert_eq!(response.status, StatusCode::NOT_MODIFIED);
/// assert_eq!(response.header_line("etag"), "\"r9\"");
/// assert!(response.body.is_empty());
/// ```
pub fn not_modified_response(state: &ValidatorState) -> Response {
	let mut response = Response::not_modified();
	write_validators(&mut response, state);
	response
}

fn write_validators(response: &mut Response, state: &ValidatorState) {
	if let Some(tag) = &state.entity_tag {
		match HeaderValue::from_str(tag.as_str()) {
			Ok(value) => {
				tracing::trace!(etag = %tag, "setting ETag");
				response.headers.insert(ETAG, value);
			}
			Err(_) => tracing::debug!(etag = ?tag.as_str(), "entity tag is not a valid header value"),
		}
	}
	if let Some(last_modified) = state.last_modified {
		match format_http_date(last_modified).map(|formatted| HeaderValue::from_str(&formatted)) {
			Some(Ok(value)) => {
				tracing::trace!(last_modified = ?value, "setting Last-Modified");
				response.headers.insert(LAST_MODIFIED, value);
			}
			_ => tracing::debug!(
				%last_modified,
				"modification time is outside the HTTP-date range"
			),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::entity_tag::EntityTag;
	use chrono::DateTime;
	use hyper::StatusCode;
	use rstest::rstest;

	fn state() -> ValidatorState {
		ValidatorState::new()
			.with_entity_tag(EntityTag::strong("v1"))
			.with_last_modified(DateTime::from_timestamp(784111777, 0).unwrap())
	}

	#[rstest]
	#[case(Method::GET)]
	#[case(Method::HEAD)]
	fn test_read_only_methods_get_validators(#[case] method: Method) {
		let mut response = Response::ok();
		apply(&mut response, &state(), &method);
		assert_eq!(response.header_line(ETAG), "\"v1\"");
		assert_eq!(
			response.header_line(LAST_MODIFIED),
			"Sun, 06 Nov 1994 08:49:37 GMT"
		);
	}

	#[rstest]
	#[case(Method::POST)]
	#[case(Method::PUT)]
	#[case(Method::DELETE)]
	#[case(Method::PATCH)]
	fn test_other_methods_are_untouched(#[case] method: Method) {
		let mut response = Response::created();
		apply(&mut response, &state(), &method);
		assert!(response.headers.is_empty());
	}

	#[rstest]
	fn test_handler_validators_are_replaced() {
		let mut response = Response::ok().with_header("ETag", "\"stale\"");
		apply(&mut response, &state(), &Method::GET);
		assert_eq!(response.headers.get_all(ETAG).iter().count(), 1);
		assert_eq!(response.header_line(ETAG), "\"v1\"");
	}

	#[rstest]
	fn test_error_responses_are_untouched() {
		let mut response = Response::not_found();
		apply(&mut response, &state(), &Method::GET);
		assert!(!response.has_header(ETAG));
		assert!(!response.has_header(LAST_MODIFIED));
	}

	#[rstest]
	fn test_apply_is_idempotent() {
		let mut once = Response::ok();
		apply(&mut once, &state(), &Method::GET);
		let mut twice = once.clone();
		apply(&mut twice, &state(), &Method::GET);
		assert_eq!(once.headers, twice.headers);
	}

	#[rstest]
	fn test_empty_state_writes_nothing() {
		let mut response = Response::ok();
		apply(&mut response, &ValidatorState::new(), &Method::GET);
		assert!(response.headers.is_empty());
	}

	#[rstest]
	fn test_invalid_entity_tag_is_skipped() {
		let state = ValidatorState::new().with_entity_tag("\"bad\nvalue\"");
		let mut response = Response::ok();
		apply(&mut response, &state, &Method::GET);
		assert!(!response.has_header(ETAG));
	}

	#[rstest]
	#[case(-1)]
	#[case(-86_400)]
	#[case(253_402_300_800)]
	fn test_unrepresentable_last_modified_is_skipped(#[case] secs: i64) {
		let state = ValidatorState::new()
			.with_entity_tag(EntityTag::strong("v1"))
			.with_last_modified(DateTime::from_timestamp(secs, 0).unwrap());

		let mut response = Response::ok();
		apply(&mut response, &state, &Method::GET);
		let not_modified = not_modified_response(&state);

		assert_eq!(response.header_line(ETAG), "\"v1\"");
		assert!(!response.has_header(LAST_MODIFIED));
		assert_eq!(not_modified.header_line(ETAG), "\"v1\"");
		assert!(!not_modified.has_header(LAST_MODIFIED));
	}

	#[rstest]
	fn test_not_modified_response_without_validators() {
		let response = not_modified_response(&ValidatorState::new());
		assert_eq!(response.status, StatusCode::NOT_MODIFIED);
		assert!(response.headers.is_empty());
	}
}
