//! Validator state of a resource, captured once per request.

use chrono::{DateTime, Utc};
use folio_http::Request;

use crate::entity_tag::EntityTag;
use crate::resource::ConditionalResource;

/// Entity tag, modification time and existence of a resource before the
/// request mutates it.
///
/// Built once and passed by value to the evaluator and the synthesizer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidatorState {
	pub entity_tag: Option<EntityTag>,
	pub last_modified: Option<DateTime<Utc>>,
	pub exists: Option<bool>,
}

impl ValidatorState {
	pub fn new() -> Self {
		Self::default()
	}

	/// Query each validator hook of `resource` exactly once.
	///
	/// # Examples
	///
	/// ```
	/// use async_trait::async_trait;
	/// use folio_conditional::{ConditionalResource, EntityTag, ValidatorState};
	/// use folio_http::{Request, Response, Result};
	///
	/// struct Revision;
	///
	/// #[async_trait]
	/// impl ConditionalResource for Revision {
	///     async fn etag(&self, _request: &Request) -> Option<EntityTag> {
	///         Some(EntityTag::strong("r7"))
	///     }
	///     async fn execute(&self, _request: Request) -> Result<Response> {
	///         Ok(Response::ok())
	///     }
	/// }
	///
	/// # tokio_test::block_on(async {
	/// let request = Request::builder().build().unwrap();
	/// let state = ValidatorState::capture(&Revision, &request).await;
	/// assert_eq!(state.entity_tag, Some(EntityTag::strong("r7")));
	/// assert_eq!(state.last_modified, None);
	/// assert!(state.has_representation());
	/// # });
	/// ```
	pub async fn capture<R>(resource: &R, request: &Request) -> Self
	where
		R: ConditionalResource + ?Sized,
	{
		Self {
			entity_tag: resource.etag(request).await,
			last_modified: resource.last_modified(request).await,
			exists: resource.has_representation(request).await,
		}
	}

	pub fn with_entity_tag(mut self, tag: impl Into<EntityTag>) -> Self {
		self.entity_tag = Some(tag.into());
		self
	}

	pub fn with_last_modified(mut self, last_modified: DateTime<Utc>) -> Self {
		self.last_modified = Some(last_modified);
		self
	}

	pub fn with_exists(mut self, exists: bool) -> Self {
		self.exists = Some(exists);
		self
	}

	/// Whether the resource currently has a representation.
	///
	/// An explicit `exists` wins; otherwise the resource exists iff it has an
	/// entity tag or a modification time.
	pub fn has_representation(&self) -> bool {
		self.exists
			.unwrap_or(self.entity_tag.is_some() || self.last_modified.is_some())
	}

	/// Whether the resource declared no validator at all.
	///
	/// Such a resource opts out of conditional handling: its preconditions
	/// are never evaluated.
	pub fn is_empty(&self) -> bool {
		self.entity_tag.is_none() && self.last_modified.is_none() && self.exists.is_none()
	}

	/// Modification time as whole seconds since the epoch.
	pub(crate) fn last_modified_secs(&self) -> Option<i64> {
		self.last_modified.map(|lm| lm.timestamp())
	}
}
