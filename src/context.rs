use crate::MetaError;
use crate::MetaResult;
use crate::document::NodeId;
use crate::value::Mapping;

/// The outcome of decoding one metadata block: either a mapping or the
/// decoder's error, never both, plus the id of the placeholder node that
/// stood in for the raw payload.
///
/// The node id is only meaningful on the error path; on success the
/// placeholder has already been removed from the tree.
#[derive(Debug, Clone)]
pub(crate) struct MetaEntry {
	pub(crate) mapping: Option<Mapping>,
	pub(crate) error: Option<MetaError>,
	pub(crate) node: NodeId,
}

/// Per-conversion parse scope.
///
/// Holds at most one [`MetaEntry`], written exactly once when the block
/// closes and read by any later consumer. A context belongs to a single
/// document conversion; concurrent conversions must each use their own.
#[derive(Debug, Clone, Default)]
pub struct ParseContext {
	entry: Option<MetaEntry>,
}

impl ParseContext {
	pub fn new() -> Self {
		Self::default()
	}

	/// The decoded mapping, or `None` when the document had no metadata
	/// block or decoding failed.
	pub fn metadata(&self) -> Option<&Mapping> {
		self.entry.as_ref().and_then(|entry| entry.mapping.as_ref())
	}

	/// Like [`ParseContext::metadata`], but surfaces the decode error when
	/// one occurred. The mapping is never returned alongside an error.
	pub fn try_metadata(&self) -> MetaResult<Option<&Mapping>> {
		let Some(entry) = &self.entry else {
			return Ok(None);
		};

		if let Some(error) = &entry.error {
			return Err(error.clone());
		}

		Ok(entry.mapping.as_ref())
	}

	pub(crate) fn entry(&self) -> Option<&MetaEntry> {
		self.entry.as_ref()
	}

	pub(crate) fn set_entry(&mut self, entry: MetaEntry) {
		// A second block per document is impossible given the line-0 rule;
		// overwrite defensively if it ever happens.
		if self.entry.is_some() {
			tracing::debug!("replacing existing metadata entry");
		}
		self.entry = Some(entry);
	}
}
