//! The contract concrete resource handlers implement.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use folio_http::{Request, Response, Result};

use crate::entity_tag::EntityTag;

/// A REST resource that can take part in conditional request handling.
///
/// The validator hooks default to `None`: a resource opts in by overriding
/// the ones it can answer. They are awaited once per request, before
/// [`ConditionalResource::execute`] runs, and must describe the resource as it
/// is before any mutation.
///
/// # Examples
///
/// ```
/// use async_trait::async_trait;
/// use folio_conditional::{ConditionalResource, EntityTag};
/// use folio_http::{Request, Response, Result};
///
/// struct PageSource {
///     revision: u64,
///     text: &'static str,
/// }
///
/// #[async_trait]
/// impl ConditionalResource for PageSource {
///     async fn etag(&self, _request: &Request) -> Option<EntityTag> {
///         Some(EntityTag::strong(&self.revision.to_string()))
///     }
///
///     async fn execute(&self, _request: Request) -> Result<Response> {
///         Ok(Response::ok().with_body(self.text))
///     }
/// }
/// ```
#[async_trait]
pub trait ConditionalResource: Send + Sync {
	/// Entity tag of the current representation.
	async fn etag(&self, _request: &Request) -> Option<EntityTag> {
		None
	}

	/// Last modification time of the current representation.
	async fn last_modified(&self, _request: &Request) -> Option<DateTime<Utc>> {
		None
	}

	/// Whether a current representation exists.
	///
	/// `None` lets existence be inferred from the other validators.
	async fn has_representation(&self, _request: &Request) -> Option<bool> {
		None
	}

	/// Business logic, run only when every precondition passed.
	async fn execute(&self, request: Request) -> Result<Response>;
}
