//! Configuration errors.

use thiserror::Error;

/// Errors raised while loading or validating [`crate::ConditionalConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
	/// The configuration file could not be read.
	#[error("IO error: {0}")]
	Io(#[from] std::io::Error),

	/// The configuration is not valid TOML or has the wrong shape.
	#[error("Parse error: {0}")]
	Parse(#[from] toml::de::Error),

	/// A field holds a value that cannot be used.
	#[error("Invalid value for {field}: {message}")]
	InvalidValue {
		/// Name of the offending field.
		field: String,
		/// Why the value was rejected.
		message: String,
	},
}

/// Result alias for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;
