//! Error types shared by Folio handlers and middleware.

use thiserror::Error;

/// Errors produced while handling a request.
///
/// Every variant maps onto an HTTP status through [`Error::status_code`], so a
/// failed handler can always be turned into a [`crate::Response`].
#[derive(Debug, Error)]
pub enum Error {
	/// The request could not be understood.
	#[error("Bad request: {0}")]
	BadRequest(String),

	/// A header name or value could not be encoded.
	#[error("Invalid header {name}: {message}")]
	InvalidHeader {
		/// Name of the offending header.
		name: String,
		/// Why the value was rejected.
		message: String,
	},

	/// The addressed resource does not exist.
	#[error("Not found: {0}")]
	NotFound(String),

	/// The resource handler reported a failure.
	#[error("Handler error: {0}")]
	Handler(String),

	/// Body serialization failed.
	#[error("Serialization error: {0}")]
	Serialization(String),

	/// Anything else that went wrong inside the framework.
	#[error("Internal error: {0}")]
	Internal(String),
}

impl Error {
	/// HTTP status code that represents this error on the wire.
	///
	/// # Examples
	///
	/// ```
	/// use folio_http::Error;
	///
	/// assert_eq!(Error::NotFound("page".into()).status_code(), 404);
	/// assert_eq!(Error::Internal("boom".into()).status_code(), 500);
	/// ```
	pub fn status_code(&self) -> u16 {
		match self {
			Error::BadRequest(_) | Error::InvalidHeader { .. } => 400,
			Error::NotFound(_) => 404,
			Error::Handler(_) | Error::Serialization(_) | Error::Internal(_) => 500,
		}
	}
}

/// Result alias used throughout Folio.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	#[case(Error::BadRequest("x".into()), 400)]
	#[case(Error::InvalidHeader { name: "etag".into(), message: "bad".into() }, 400)]
	#[case(Error::NotFound("x".into()), 404)]
	#[case(Error::Handler("x".into()), 500)]
	#[case(Error::Serialization("x".into()), 500)]
	fn test_status_code_mapping(#[case] error: Error, #[case] expected: u16) {
		assert_eq!(error.status_code(), expected);
	}

	#[rstest]
	fn test_invalid_header_display() {
		let error = Error::InvalidHeader {
			name: "cache-control".to_string(),
			message: "contains newline".to_string(),
		};
		assert_eq!(
			error.to_string(),
			"Invalid header cache-control: contains newline"
		);
	}
}
