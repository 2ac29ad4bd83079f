//! Entity tags and the `If-Match` / `If-None-Match` field values built from them.

use std::fmt;

/// An entity tag exactly as it appears on the wire, e.g. `"r1024"` or `W/"r1024"`.
///
/// Strong comparison is byte equality of the full value. Weak comparison
/// ignores a leading `W/` on either side.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EntityTag(String);

impl EntityTag {
	/// Wrap a full entity-tag value without altering it.
	pub fn new(value: impl Into<String>) -> Self {
		Self(value.into())
	}

	/// Build a quoted strong tag from an opaque value.
	///
	/// # Examples
	///
	/// ```
	/// use folio_conditional::EntityTag;
	///
	/// assert_eq!(EntityTag::strong("r42").as_str(), "\"r42\"");
	/// ```
	pub fn strong(opaque: &str) -> Self {
		Self(format!("\"{}\"", opaque))
	}

	/// Build a quoted weak tag from an opaque value.
	///
	/// # Examples
	///
	/// ```
	/// use folio_conditional::EntityTag;
	///
	/// let tag = EntityTag::weak("r42");
	/// assert_eq!(tag.as_str(), "W/\"r42\"");
	/// assert!(tag.is_weak());
	/// ```
	pub fn weak(opaque: &str) -> Self {
		Self(format!("W/\"{}\"", opaque))
	}

	pub fn as_str(&self) -> &str {
		&self.0
	}

	pub fn is_weak(&self) -> bool {
		self.0.starts_with("W/")
	}

	/// The value without its weakness indicator.
	pub fn without_weakness(&self) -> &str {
		self.0.strip_prefix("W/").unwrap_or(&self.0)
	}

	/// Exact comparison of the full values.
	pub fn strong_eq(&self, other: &EntityTag) -> bool {
		self.0 == other.0
	}

	/// Comparison that ignores `W/` on both sides.
	///
	/// # Examples
	///
	/// ```
	/// use folio_conditional::EntityTag;
	///
	/// let weak = EntityTag::weak("r1");
	/// let strong = EntityTag::strong("r1");
	/// assert!(weak.weak_eq(&strong));
	/// assert!(!weak.strong_eq(&strong));
	/// ```
	pub fn weak_eq(&self, other: &EntityTag) -> bool {
		self.without_weakness() == other.without_weakness()
	}

	/// Parse one list member. Quoted tags must be closed and may not contain
	/// a second quote; bare tokens are accepted as-is.
	fn parse_member(raw: &str) -> Option<Self> {
		let value = raw.trim();
		if value.is_empty() || value == "*" || value.chars().any(char::is_whitespace) {
			return None;
		}
		let body = value.strip_prefix("W/").unwrap_or(value);
		if body.starts_with('"') || body.ends_with('"') {
			let inner = body.strip_prefix('"')?.strip_suffix('"')?;
			if inner.contains('"') {
				return None;
			}
		}
		Some(Self(value.to_string()))
	}
}

impl fmt::Display for EntityTag {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

impl From<&str> for EntityTag {
	fn from(value: &str) -> Self {
		Self::new(value)
	}
}

impl From<String> for EntityTag {
	fn from(value: String) -> Self {
		Self(value)
	}
}

/// Parsed value of an `If-Match` or `If-None-Match` header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EtagCondition {
	/// `*`: any current representation.
	Any,
	/// An explicit list of entity tags.
	Tags(Vec<EntityTag>),
}

impl EtagCondition {
	/// Parse a field value. Returns `None` for anything malformed, including
	/// an empty list or `*` mixed with tags.
	///
	/// # Examples
	///
	/// ```
	/// use folio_conditional::{EntityTag, EtagCondition};
	///
	/// assert_eq!(EtagCondition::parse("*"), Some(EtagCondition::Any));
	/// assert_eq!(
	///     EtagCondition::parse(r#""a", W/"b""#),
	///     Some(EtagCondition::Tags(vec![EntityTag::new(r#""a""#), EntityTag::new(r#"W/"b""#)])),
	/// );
	/// assert_eq!(EtagCondition::parse(r#""unterminated"#), None);
	/// ```
	pub fn parse(value: &str) -> Option<Self> {
		let value = value.trim();
		if value == "*" {
			return Some(Self::Any);
		}

		let tags = split_list(value)?
			.into_iter()
			.filter(|member| !member.trim().is_empty())
			.map(EntityTag::parse_member)
			.collect::<Option<Vec<_>>>()?;

		if tags.is_empty() {
			None
		} else {
			Some(Self::Tags(tags))
		}
	}

	/// Whether the condition holds for a resource.
	///
	/// `Any` holds when the resource exists. A tag list holds when `current`
	/// equals one of the tags, strongly or weakly as requested.
	pub fn matches(&self, current: Option<&EntityTag>, exists: bool, weak: bool) -> bool {
		match self {
			Self::Any => exists,
			Self::Tags(tags) => current.is_some_and(|current| {
				tags.iter().any(|tag| {
					if weak {
						tag.weak_eq(current)
					} else {
						tag.strong_eq(current)
					}
				})
			}),
		}
	}
}

/// Split a comma-separated list, keeping commas inside quotes.
/// Returns `None` when a quote is left open.
fn split_list(value: &str) -> Option<Vec<&str>> {
	let mut members = Vec::new();
	let mut in_quotes = false;
	let mut start = 0;
	for (idx, ch) in value.char_indices() {
		match ch {
			'"' => in_quotes = !in_quotes,
			',' if !in_quotes => {
				members.push(&value[start..idx]);
				start = idx + 1;
			}
			_ => {}
		}
	}
	if in_quotes {
		return None;
	}
	members.push(&value[start..]);
	Some(members)
}
