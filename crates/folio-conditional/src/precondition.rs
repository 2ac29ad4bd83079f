//! Precondition evaluation (RFC 7232, section 6).

use folio_http::request::is_read_only;
use hyper::{Method, StatusCode};

use crate::config::ConditionalConfig;
use crate::headers::ConditionalHeaders;
use crate::validators::ValidatorState;

/// Result of evaluating the preconditions of a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
	/// Run the handler.
	Proceed,
	/// Answer 304 without running the handler.
	NotModified,
	/// Answer 412 without running the handler.
	PreconditionFailed,
}

impl Outcome {
	/// Status of the short-circuit response, `None` for [`Outcome::Proceed`].
	pub fn status(self) -> Option<StatusCode> {
		match self {
			Outcome::Proceed => None,
			Outcome::NotModified => Some(StatusCode::NOT_MODIFIED),
			Outcome::PreconditionFailed => Some(StatusCode::PRECONDITION_FAILED),
		}
	}

	pub fn is_proceed(self) -> bool {
		self == Outcome::Proceed
	}
}

/// Decides whether a request may proceed given the resource's validators.
///
/// Evaluation is a pure function of the validator state, the parsed headers,
/// the method and the evaluator's configuration.
#[derive(Debug, Clone, Copy, Default)]
pub struct PreconditionEvaluator {
	weak_if_none_match: bool,
}

impl PreconditionEvaluator {
	/// Evaluator using strong comparison everywhere.
	pub fn new() -> Self {
		Self::default()
	}

	pub fn from_config(config: &ConditionalConfig) -> Self {
		Self {
			weak_if_none_match: config.weak_if_none_match,
		}
	}

	/// Use weak comparison for `If-None-Match`.
	pub fn with_weak_if_none_match(mut self, enabled: bool) -> Self {
		self.weak_if_none_match = enabled;
		self
	}

	/// Evaluate the preconditions.
	///
	/// `If-Match` / `If-Unmodified-Since` are checked before
	/// `If-None-Match` / `If-Modified-Since`. Dates compare at whole-second
	/// precision.
	///
	/// # Examples
	///
	/// ```
	/// use folio_conditional::{
	///     ConditionalHeaders, EntityTag, EtagCondition, Outcome, PreconditionEvaluator,
	///     ValidatorState,
	/// };
	/// use hyper::Method;
	///
	/// let state = ValidatorState::new().with_entity_tag(EntityTag::strong("r1"));
	/// let headers = ConditionalHeaders::default()
	///     .with_if_none_match(EtagCondition::Tags(vec![EntityTag::strong("r1")]));
	///
	/// let evaluator = PreconditionEvaluator::new();
	/// assert_eq!(evaluator.evaluate(&state, &headers, &Method::GET), Outcome::NotModified);
	/// assert_eq!(evaluator.evaluate(&state, &headers, &Method::PUT), Outcome::PreconditionFailed);
	/// ```
	pub fn evaluate(
		&self,
		state: &ValidatorState,
		headers: &ConditionalHeaders,
		method: &Method,
	) -> Outcome {
		if state.is_empty() {
			return Outcome::Proceed;
		}

		let exists = state.has_representation();
		let current = state.entity_tag.as_ref();
		let last_modified = state.last_modified_secs();

		if let Some(if_match) = &headers.if_match {
			// An absent resource has nothing to match, not even `*`.
			if !exists || !if_match.matches(current, exists, false) {
				return Outcome::PreconditionFailed;
			}
		} else if let (Some(since), Some(modified)) = (headers.if_unmodified_since, last_modified)
			&& modified > since.timestamp()
		{
			return Outcome::PreconditionFailed;
		}

		let read_only = is_read_only(method);
		if let Some(if_none_match) = &headers.if_none_match {
			if if_none_match.matches(current, exists, self.weak_if_none_match) {
				return if read_only {
					Outcome::NotModified
				} else {
					Outcome::PreconditionFailed
				};
			}
		} else if read_only
			&& let (Some(since), Some(modified)) = (headers.if_modified_since, last_modified)
			&& modified <= since.timestamp()
		{
			return Outcome::NotModified;
		}

		Outcome::Proceed
	}
}

/// Evaluate with the default (strong comparison) evaluator.
pub fn evaluate(state: &ValidatorState, headers: &ConditionalHeaders, method: &Method) -> Outcome {
	PreconditionEvaluator::new().evaluate(state, headers, method)
}
