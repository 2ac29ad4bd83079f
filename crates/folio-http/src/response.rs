use bytes::Bytes;
use hyper::header::{AsHeaderName, HeaderName, HeaderValue};
use hyper::{HeaderMap, StatusCode};
use serde::Serialize;

use crate::{Error, Result};

/// HTTP Response representation
///
/// Handlers build responses with the `with_*` helpers; the conditional layer
/// mutates them in place through [`Response::set_status`],
/// [`Response::set_header`] and [`Response::header_line`].
#[derive(Debug, Clone)]
pub struct Response {
	pub status: StatusCode,
	pub headers: HeaderMap,
	pub body: Bytes,
	/// Set on responses produced without running the endpoint's business
	/// logic. Informational only: the chain still returns the response
	/// through every enclosing middleware.
	stop_chain: bool,
}

impl Response {
	/// Create a new Response with the given status code
	///
	/// # Examples
	///
	/// ```
	/// use folio_http::Response;
	/// use hyper::StatusCode;
	///
	/// let response = Response::new(StatusCode::OK);
	/// assert_eq!(response.status, StatusCode::OK);
	/// assert!(response.body.is_empty());
	/// ```
	pub fn new(status: StatusCode) -> Self {
		Self {
			status,
			headers: HeaderMap::new(),
			body: Bytes::new(),
			stop_chain: false,
		}
	}

	pub fn ok() -> Self {
		Self::new(StatusCode::OK)
	}

	pub fn created() -> Self {
		Self::new(StatusCode::CREATED)
	}

	pub fn no_content() -> Self {
		Self::new(StatusCode::NO_CONTENT)
	}

	/// Create a Response with HTTP 304 Not Modified status
	pub fn not_modified() -> Self {
		Self::new(StatusCode::NOT_MODIFIED)
	}

	pub fn not_found() -> Self {
		Self::new(StatusCode::NOT_FOUND)
	}

	/// Create a Response with HTTP 412 Precondition Failed status
	pub fn precondition_failed() -> Self {
		Self::new(StatusCode::PRECONDITION_FAILED)
	}

	pub fn internal_server_error() -> Self {
		Self::new(StatusCode::INTERNAL_SERVER_ERROR)
	}

	/// Set the response body
	///
	/// # Examples
	///
	/// ```
	/// use folio_http::Response;
	/// use bytes::Bytes;
	///
	/// let response = Response::ok().with_body("Hello, World!");
	/// assert_eq!(response.body, Bytes::from("Hello, World!"));
	/// ```
	pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
		self.body = body.into();
		self
	}

	/// Add a custom header to the response
	///
	/// Invalid names or values are silently dropped; use
	/// [`Response::set_header`] when the caller needs to know.
	///
	/// # Examples
	///
	/// ```
	/// use folio_http::Response;
	///
	/// let response = Response::ok().with_header("Cache-Control", "no-store");
	/// assert_eq!(response.header_line("cache-control"), "no-store");
	/// ```
	pub fn with_header(mut self, name: &str, value: &str) -> Self {
		let _ = self.set_header(name, value);
		self
	}

	/// Set the response body to JSON and add appropriate Content-Type header
	///
	/// # Examples
	///
	/// ```
	/// use folio_http::Response;
	/// use serde_json::json;
	///
	/// let response = Response::ok().with_json(&json!({"title": "Main Page"})).unwrap();
	/// assert_eq!(response.header_line("content-type"), "application/json");
	/// ```
	pub fn with_json<T: Serialize>(mut self, data: &T) -> Result<Self> {
		let json = serde_json::to_vec(data).map_err(|e| Error::Serialization(e.to_string()))?;
		self.body = Bytes::from(json);
		self.headers.insert(
			hyper::header::CONTENT_TYPE,
			HeaderValue::from_static("application/json"),
		);
		Ok(self)
	}

	/// Replace the status code.
	pub fn set_status(&mut self, status: StatusCode) {
		self.status = status;
	}

	/// Replace every value of `name` with `value`.
	///
	/// # Errors
	///
	/// Returns [`Error::InvalidHeader`] if either the name or the value is not
	/// a legal HTTP token.
	///
	/// # Examples
	///
	/// ```
	/// use folio_http::Response;
	///
	/// let mut response = Response::ok();
	/// response.set_header("ETag", "\"r1\"").unwrap();
	/// response.set_header("ETag", "\"r2\"").unwrap();
	/// assert_eq!(response.header_line("etag"), "\"r2\"");
	/// assert!(response.set_header("ETag", "line\nbreak").is_err());
	/// ```
	pub fn set_header(&mut self, name: &str, value: &str) -> Result<()> {
		let header_name =
			HeaderName::from_bytes(name.as_bytes()).map_err(|e| Error::InvalidHeader {
				name: name.to_string(),
				message: e.to_string(),
			})?;
		let header_value = HeaderValue::from_str(value).map_err(|e| Error::InvalidHeader {
			name: name.to_string(),
			message: e.to_string(),
		})?;
		self.headers.insert(header_name, header_value);
		Ok(())
	}

	/// All values of a header joined with `", "`, or an empty string when absent.
	///
	/// # Examples
	///
	/// ```
	/// use folio_http::Response;
	/// use hyper::header::{HeaderValue, VARY};
	///
	/// let mut response = Response::ok();
	/// response.headers.append(VARY, HeaderValue::from_static("Cookie"));
	/// response.headers.append(VARY, HeaderValue::from_static("Accept-Language"));
	/// assert_eq!(response.header_line(VARY), "Cookie, Accept-Language");
	/// assert_eq!(response.header_line("etag"), "");
	/// ```
	pub fn header_line<K: AsHeaderName>(&self, name: K) -> String {
		self.headers
			.get_all(name)
			.iter()
			.filter_map(|v| v.to_str().ok())
			.collect::<Vec<_>>()
			.join(", ")
	}

	/// Whether at least one value of `name` is present.
	pub fn has_header<K: AsHeaderName>(&self, name: K) -> bool {
		self.headers.contains_key(name)
	}

	/// Whether this response was marked as a short-circuit.
	pub fn should_stop_chain(&self) -> bool {
		self.stop_chain
	}

	/// Mark a response produced without running the endpoint's business
	/// logic, such as a 304 or 412 precondition short-circuit.
	///
	/// [`MiddlewareChain`](crate::MiddlewareChain) does not read the mark;
	/// enclosing middleware still see the response on its way out.
	///
	/// # Examples
	///
	/// ```
	/// use folio_http::Response;
	///
	/// let response = Response::not_modified().with_stop_chain(true);
	/// assert!(response.should_stop_chain());
	/// ```
	pub fn with_stop_chain(mut self, stop: bool) -> Self {
		self.stop_chain = stop;
		self
	}
}

impl From<Error> for Response {
	fn from(error: Error) -> Self {
		let status =
			StatusCode::from_u16(error.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
		let body = serde_json::json!({
			"error": error.to_string(),
		});

		Response::new(status)
			.with_json(&body)
			.unwrap_or_else(|_| Response::internal_server_error())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use hyper::header::{CACHE_CONTROL, ETAG, SET_COOKIE};
	use rstest::rstest;

	#[rstest]
	fn test_set_header_replaces_all_values() {
		let mut response = Response::ok();
		response
			.headers
			.append(CACHE_CONTROL, HeaderValue::from_static("public"));
		response
			.headers
			.append(CACHE_CONTROL, HeaderValue::from_static("max-age=60"));

		response.set_header("Cache-Control", "no-cache").unwrap();

		assert_eq!(response.headers.get_all(CACHE_CONTROL).iter().count(), 1);
		assert_eq!(response.header_line(CACHE_CONTROL), "no-cache");
	}

	#[rstest]
	fn test_set_header_rejects_invalid_name() {
		let mut response = Response::ok();
		let err = response.set_header("E Tag", "\"x\"").unwrap_err();
		assert!(matches!(err, Error::InvalidHeader { .. }));
		assert!(!response.has_header(ETAG));
	}

	#[rstest]
	fn test_set_status() {
		let mut response = Response::ok();
		response.set_status(StatusCode::NOT_MODIFIED);
		assert_eq!(response.status, StatusCode::NOT_MODIFIED);
	}

	#[rstest]
	fn test_has_header() {
		let response = Response::ok().with_header("Set-Cookie", "sessionid=1");
		assert!(response.has_header(SET_COOKIE));
		assert!(!response.has_header(ETAG));
	}

	#[rstest]
	fn test_error_into_response() {
		let response: Response = Error::NotFound("Talk:Nowhere".to_string()).into();
		assert_eq!(response.status, StatusCode::NOT_FOUND);
		let body: serde_json::Value = serde_json::from_slice(&response.body).unwrap();
		assert_eq!(body["error"], "Not found: Talk:Nowhere");
	}
}
