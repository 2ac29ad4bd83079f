//! Configuration for conditional request handling.
//!
//! Settings are passed explicitly to the evaluator, the cache-control policy
//! and the handler when they are constructed. They can be built in code or
//! loaded from TOML:
//!
//! ```toml
//! weak_if_none_match = true
//! session_cookie_names = ["wiki_session", "wikiUserID"]
//! private_cache_control = "private,must-revalidate,s-maxage=0"
//! ```

use hyper::header::HeaderValue;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{ConfigError, ConfigResult};

/// Cache-Control value forced onto responses tied to a user session.
pub const PRIVATE_CACHE_CONTROL: &str = "private,must-revalidate,s-maxage=0";

/// Cache-Control default for responses to state-changing methods.
pub const UNCACHEABLE_CACHE_CONTROL: &str = "private,no-cache,s-maxage=0";

/// Default session cookie name.
pub const DEFAULT_SESSION_COOKIE: &str = "sessionid";

/// Conditional request settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConditionalConfig {
	/// Compare `If-None-Match` tags weakly (ignoring `W/`).
	///
	/// `If-Match` always uses strong comparison.
	pub weak_if_none_match: bool,
	/// Cache-Control value for responses that set cookies or belong to a persistent session.
	pub private_cache_control: String,
	/// Cache-Control default for non-GET/HEAD responses that set none.
	pub uncacheable_cache_control: String,
	/// Cookie names whose presence on a request marks a persistent session.
	pub session_cookie_names: Vec<String>,
	/// Body sent with 412 responses.
	pub precondition_failed_body: String,
}

impl Default for ConditionalConfig {
	fn default() -> Self {
		Self {
			weak_if_none_match: false,
			private_cache_control: PRIVATE_CACHE_CONTROL.to_string(),
			uncacheable_cache_control: UNCACHEABLE_CACHE_CONTROL.to_string(),
			session_cookie_names: vec![DEFAULT_SESSION_COOKIE.to_string()],
			precondition_failed_body: "Precondition Failed".to_string(),
		}
	}
}

impl ConditionalConfig {
	pub fn new() -> Self {
		Self::default()
	}

	/// Parse and validate a TOML document. Missing keys keep their defaults.
	///
	/// # Examples
	///
	/// ```
	/// use folio_conditional::ConditionalConfig;
	///
	/// let config = ConditionalConfig::from_toml_str(r#"
	///     weak_if_none_match = true
	///     session_cookie_names = ["wiki_session"]
	/// "#).unwrap();
	///
	/// assert!(config.weak_if_none_match);
	/// assert_eq!(config.session_cookie_names, vec!["wiki_session".to_string()]);
	/// assert_eq!(config.private_cache_control, "private,must-revalidate,s-maxage=0");
	/// ```
	pub fn from_toml_str(source: &str) -> ConfigResult<Self> {
		let config: Self = toml::from_str(source)?;
		config.validate()?;
		Ok(config)
	}

	/// Read, parse and validate a TOML file.
	pub fn from_file(path: impl AsRef<Path>) -> ConfigResult<Self> {
		let source = std::fs::read_to_string(path.as_ref())?;
		Self::from_toml_str(&source)
	}

	/// Check that every field can be used as-is.
	///
	/// # Errors
	///
	/// Returns [`ConfigError::InvalidValue`] when a Cache-Control directive
	/// is empty or not a legal header value, or a session cookie name is empty.
	pub fn validate(&self) -> ConfigResult<()> {
		directive_value("private_cache_control", &self.private_cache_control)?;
		directive_value("uncacheable_cache_control", &self.uncacheable_cache_control)?;
		if self.session_cookie_names.iter().any(|name| name.trim().is_empty()) {
			return Err(ConfigError::InvalidValue {
				field: "session_cookie_names".to_string(),
				message: "cookie names must not be empty".to_string(),
			});
		}
		Ok(())
	}

	pub fn with_weak_if_none_match(mut self, enabled: bool) -> Self {
		self.weak_if_none_match = enabled;
		self
	}

	pub fn with_session_cookie_names<I, S>(mut self, names: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.session_cookie_names = names.into_iter().map(Into::into).collect();
		self
	}

	pub fn with_private_cache_control(mut self, value: impl Into<String>) -> Self {
		self.private_cache_control = value.into();
		self
	}

	pub fn with_uncacheable_cache_control(mut self, value: impl Into<String>) -> Self {
		self.uncacheable_cache_control = value.into();
		self
	}

	pub fn with_precondition_failed_body(mut self, body: impl Into<String>) -> Self {
		self.precondition_failed_body = body.into();
		self
	}
}

/// Turn a configured directive into a header value.
pub(crate) fn directive_value(field: &str, value: &str) -> ConfigResult<HeaderValue> {
	if value.trim().is_empty() {
		return Err(ConfigError::InvalidValue {
			field: field.to_string(),
			message: "directive must not be empty".to_string(),
		});
	}
	HeaderValue::from_str(value).map_err(|e| ConfigError::InvalidValue {
		field: field.to_string(),
		message: e.to_string(),
	})
}
