//! Conditional request headers.

use chrono::{DateTime, Utc};
use folio_http::Request;
use hyper::HeaderMap;
use hyper::header::{HeaderName, IF_MATCH, IF_MODIFIED_SINCE, IF_NONE_MATCH, IF_UNMODIFIED_SINCE};

use crate::entity_tag::EtagCondition;

/// The four RFC 7232 precondition headers of a request.
///
/// Malformed values are dropped while parsing, so a field is `None` both when
/// the client did not send the header and when it sent garbage.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConditionalHeaders {
	pub if_match: Option<EtagCondition>,
	pub if_none_match: Option<EtagCondition>,
	pub if_modified_since: Option<DateTime<Utc>>,
	pub if_unmodified_since: Option<DateTime<Utc>>,
}

impl ConditionalHeaders {
	/// Read the precondition headers of a request.
	///
	/// # Examples
	///
	/// ```
	/// use folio_conditional::{ConditionalHeaders, EtagCondition};
	/// use folio_http::Request;
	///
	/// let request = Request::builder()
	///     .header("If-None-Match", "*")
	///     .header("If-Modified-Since", "not a date")
	///     .build()
	///     .unwrap();
	///
	/// let headers = ConditionalHeaders::from_request(&request);
	/// assert_eq!(headers.if_none_match, Some(EtagCondition::Any));
	/// assert_eq!(headers.if_modified_since, None);
	/// ```
	pub fn from_request(request: &Request) -> Self {
		Self::from_header_map(&request.headers)
	}

	pub fn from_header_map(headers: &HeaderMap) -> Self {
		Self {
			if_match: etag_condition(headers, IF_MATCH),
			if_none_match: etag_condition(headers, IF_NONE_MATCH),
			if_modified_since: http_date(headers, IF_MODIFIED_SINCE),
			if_unmodified_since: http_date(headers, IF_UNMODIFIED_SINCE),
		}
	}

	/// Whether no usable precondition was sent.
	pub fn is_empty(&self) -> bool {
		self.if_match.is_none()
			&& self.if_none_match.is_none()
			&& self.if_modified_since.is_none()
			&& self.if_unmodified_since.is_none()
	}

	pub fn with_if_match(mut self, condition: EtagCondition) -> Self {
		self.if_match = Some(condition);
		self
	}

	pub fn with_if_none_match(mut self, condition: EtagCondition) -> Self {
		self.if_none_match = Some(condition);
		self
	}

	pub fn with_if_modified_since(mut self, date: DateTime<Utc>) -> Self {
		self.if_modified_since = Some(date);
		self
	}

	pub fn with_if_unmodified_since(mut self, date: DateTime<Utc>) -> Self {
		self.if_unmodified_since = Some(date);
		self
	}
}

/// Parse an IMF-fixdate, RFC 850 or asctime date.
pub fn parse_http_date(value: &str) -> Option<DateTime<Utc>> {
	httpdate::parse_http_date(value.trim()).ok().map(DateTime::from)
}

/// First second an HTTP-date cannot express (`10000-01-01T00:00:00Z`).
const HTTP_DATE_END: i64 = 253_402_300_800;

/// Format a timestamp as an IMF-fixdate, e.g. `Thu, 01 Jan 1970 00:16:40 GMT`.
///
/// Returns `None` for times before the Unix epoch or from year 10000 on,
/// which the HTTP-date grammar cannot represent.
///
/// # Examples
///
/// ```
/// use chrono::DateTime;
/// use folio_conditional::format_http_date;
///
/// let date = DateTime::from_timestamp(1000, 0).unwrap();
/// assert_eq!(format_http_date(date).as_deref(), Some("Thu, 01 Jan 1970 00:16:40 GMT"));
///
/// let before_epoch = DateTime::from_timestamp(-1, 0).unwrap();
/// assert_eq!(format_http_date(before_epoch), None);
/// ```
pub fn format_http_date(date: DateTime<Utc>) -> Option<String> {
	if !(0..HTTP_DATE_END).contains(&date.timestamp()) {
		return None;
	}
	Some(httpdate::fmt_http_date(date.into()))
}

// Multiple field lines of a list header combine into one comma-separated value.
fn etag_condition(headers: &HeaderMap, name: HeaderName) -> Option<EtagCondition> {
	let mut lines = Vec::new();
	for value in headers.get_all(&name) {
		match value.to_str() {
			Ok(line) => lines.push(line),
			Err(_) => {
				tracing::debug!(header = %name, "ignoring non-ASCII conditional header");
				return None;
			}
		}
	}
	if lines.is_empty() {
		return None;
	}
	let joined = lines.join(",");
	let condition = EtagCondition::parse(&joined);
	if condition.is_none() {
		tracing::debug!(header = %name, value = %joined, "ignoring malformed conditional header");
	}
	condition
}

fn http_date(headers: &HeaderMap, name: HeaderName) -> Option<DateTime<Utc>> {
	let raw = headers.get(&name)?;
	let date = raw.to_str().ok().and_then(parse_http_date);
	if date.is_none() {
		tracing::debug!(header = %name, value = ?raw, "ignoring malformed conditional header");
	}
	date
}
