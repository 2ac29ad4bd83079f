//! Incoming request representation.

use bytes::Bytes;
use hyper::header::{AsHeaderName, COOKIE, HeaderName, HeaderValue};
use hyper::{HeaderMap, Method, Uri, Version};

use crate::{Error, Result};

/// HTTP request as seen by Folio handlers.
#[derive(Debug, Clone)]
pub struct Request {
	pub method: Method,
	pub uri: Uri,
	pub version: Version,
	pub headers: HeaderMap,
	pub body: Bytes,
}

impl Request {
	/// Create a request from its parts.
	///
	/// # Examples
	///
	/// ```
	/// use folio_http::Request;
	/// use hyper::{HeaderMap, Method, Uri, Version};
	/// use bytes::Bytes;
	///
	/// let request = Request::new(
	///     Method::GET,
	///     Uri::from_static("/rest/page/Main_Page"),
	///     Version::HTTP_11,
	///     HeaderMap::new(),
	///     Bytes::new(),
	/// );
	/// assert_eq!(request.path(), "/rest/page/Main_Page");
	/// ```
	pub fn new(method: Method, uri: Uri, version: Version, headers: HeaderMap, body: Bytes) -> Self {
		Self {
			method,
			uri,
			version,
			headers,
			body,
		}
	}

	/// Start building a request.
	///
	/// # Examples
	///
	/// ```
	/// use folio_http::Request;
	/// use hyper::Method;
	///
	/// let request = Request::builder()
	///     .method(Method::PUT)
	///     .uri("/rest/page/Sandbox")
	///     .header("If-Match", "\"r42\"")
	///     .build()
	///     .unwrap();
	/// assert_eq!(request.header("if-match"), Some("\"r42\""));
	/// ```
	pub fn builder() -> RequestBuilder {
		RequestBuilder::default()
	}

	/// Path component of the request URI.
	pub fn path(&self) -> &str {
		self.uri.path()
	}

	/// Raw value of a header, if present and valid visible ASCII.
	///
	/// Values that are not representable as a string are reported as absent.
	pub fn header<K: AsHeaderName>(&self, name: K) -> Option<&str> {
		self.headers.get(name).and_then(|v| v.to_str().ok())
	}

	/// Whether the method is GET or HEAD.
	pub fn is_read_only(&self) -> bool {
		is_read_only(&self.method)
	}

	/// Value of a named cookie sent with the request.
	///
	/// # Examples
	///
	/// ```
	/// use folio_http::Request;
	///
	/// let request = Request::builder()
	///     .uri("/")
	///     .header("Cookie", "lang=en; sessionid=abc123")
	///     .build()
	///     .unwrap();
	/// assert_eq!(request.cookie("sessionid"), Some("abc123"));
	/// assert_eq!(request.cookie("missing"), None);
	/// ```
	pub fn cookie(&self, name: &str) -> Option<&str> {
		self.headers
			.get_all(COOKIE)
			.iter()
			.filter_map(|value| value.to_str().ok())
			.flat_map(|line| line.split(';'))
			.filter_map(|pair| pair.trim().split_once('='))
			.find(|(key, _)| *key == name)
			.map(|(_, value)| value)
	}
}

/// Builder for [`Request`].
#[derive(Debug)]
pub struct RequestBuilder {
	method: Method,
	uri: String,
	version: Version,
	headers: HeaderMap,
	body: Bytes,
	invalid_header: Option<Error>,
}

impl Default for RequestBuilder {
	fn default() -> Self {
		Self {
			method: Method::GET,
			uri: "/".to_string(),
			version: Version::HTTP_11,
			headers: HeaderMap::new(),
			body: Bytes::new(),
			invalid_header: None,
		}
	}
}

impl RequestBuilder {
	pub fn method(mut self, method: Method) -> Self {
		self.method = method;
		self
	}

	pub fn uri(mut self, uri: impl Into<String>) -> Self {
		self.uri = uri.into();
		self
	}

	pub fn version(mut self, version: Version) -> Self {
		self.version = version;
		self
	}

	/// Replace the whole header map.
	pub fn headers(mut self, headers: HeaderMap) -> Self {
		self.headers = headers;
		self
	}

	/// Append a single header. An invalid name or value is reported by [`RequestBuilder::build`].
	pub fn header(mut self, name: &str, value: &str) -> Self {
		let parsed = HeaderName::from_bytes(name.as_bytes())
			.map_err(|e| e.to_string())
			.and_then(|n| {
				HeaderValue::from_str(value)
					.map(|v| (n, v))
					.map_err(|e| e.to_string())
			});
		match parsed {
			Ok((n, v)) => {
				self.headers.append(n, v);
			}
			Err(message) => {
				self.invalid_header.get_or_insert(Error::InvalidHeader {
					name: name.to_string(),
					message,
				});
			}
		}
		self
	}

	pub fn body(mut self, body: impl Into<Bytes>) -> Self {
		self.body = body.into();
		self
	}

	/// Finish the request.
	///
	/// # Errors
	///
	/// Returns [`Error::InvalidHeader`] when a header passed to
	/// [`RequestBuilder::header`] was rejected, or [`Error::BadRequest`] when
	/// the URI does not parse.
	pub fn build(self) -> Result<Request> {
		if let Some(error) = self.invalid_header {
			return Err(error);
		}
		let uri = self
			.uri
			.parse::<Uri>()
			.map_err(|e| Error::BadRequest(format!("invalid URI {:?}: {}", self.uri, e)))?;
		Ok(Request::new(
			self.method,
			uri,
			self.version,
			self.headers,
			self.body,
		))
	}
}

/// Whether `method` is GET or HEAD, the methods that never change a resource.
pub fn is_read_only(method: &Method) -> bool {
	*method == Method::GET || *method == Method::HEAD
}

#[cfg(test)]
mod tests {
	use super::*;
	use hyper::header::IF_NONE_MATCH;
	use rstest::rstest;

	#[rstest]
	#[case(Method::GET, true)]
	#[case(Method::HEAD, true)]
	#[case(Method::POST, false)]
	#[case(Method::PUT, false)]
	#[case(Method::DELETE, false)]
	fn test_is_read_only(#[case] method: Method, #[case] expected: bool) {
		assert_eq!(is_read_only(&method), expected);
		let request = Request::builder().method(method).build().unwrap();
		assert_eq!(request.is_read_only(), expected);
	}

	#[rstest]
	fn test_header_lookup_is_case_insensitive() {
		let request = Request::builder()
			.header("If-None-Match", "\"v1\"")
			.build()
			.unwrap();
		assert_eq!(request.header(IF_NONE_MATCH), Some("\"v1\""));
		assert_eq!(request.header("IF-NONE-MATCH"), Some("\"v1\""));
		assert_eq!(request.header("if-match"), None);
	}

	#[rstest]
	fn test_invalid_header_is_reported_on_build() {
		let result = Request::builder().header("Bad Name", "x").build();
		assert!(matches!(result, Err(Error::InvalidHeader { .. })));
	}

	#[rstest]
	fn test_invalid_uri_is_bad_request() {
		let result = Request::builder().uri("/bad path").build();
		assert!(matches!(result, Err(Error::BadRequest(_))));
	}

	#[rstest]
	fn test_cookie_across_multiple_headers() {
		let request = Request::builder()
			.header("Cookie", "theme=dark")
			.header("Cookie", "sessionid=s1; other=2")
			.build()
			.unwrap();
		assert_eq!(request.cookie("theme"), Some("dark"));
		assert_eq!(request.cookie("sessionid"), Some("s1"));
		assert_eq!(request.cookie("session"), None);
	}
}
