use serde::Deserialize;
use serde::Serialize;

/// Options controlling how a decoded metadata block is published.
///
/// ```rust
/// use mdmeta::MetaOptions;
///
/// let options = MetaOptions::new().with_store_in_document(true);
/// assert!(options.store_in_document);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetaOptions {
	/// When set, every key/value pair of a successfully decoded block is
	/// additionally copied into the document-wide metadata slot
	/// ([`Document::meta`](crate::Document::meta)). The copy is additive:
	/// pre-existing entries are kept, and a later key overwrites an earlier
	/// one of the same name.
	#[serde(default)]
	pub store_in_document: bool,
}

impl MetaOptions {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn with_store_in_document(mut self, value: bool) -> Self {
		self.store_in_document = value;
		self
	}
}
