use tracing::debug;

use crate::context::MetaEntry;
use crate::context::ParseContext;
use crate::document::Document;
use crate::document::LineCursor;
use crate::document::Node;
use crate::document::NodeId;
use crate::format::Format;
use crate::format::OPEN_TOKEN;
use crate::matcher::close_offset;
use crate::matcher::open_signal;

/// Progress of a block scan, strictly forward: once accumulation starts
/// there is no way back to `Scanning`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockState {
	/// No opening marker seen yet.
	Scanning,
	/// Inside an open block, buffering lines.
	Accumulating,
	/// Terminal; the buffer is finalized.
	Closed,
}

/// What the accumulator decided about the line it just consumed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Continuation {
	/// The line was buffered; keep feeding lines.
	Continue,
	/// The close marker was found; the block is finalized.
	Close,
}

/// The open/continue/close protocol a host pipeline drives a block stage
/// through, one call per line in document order.
pub trait BlockStage {
	/// Attempt to open a block at the cursor's current line. On success the
	/// stage consumes its opening marker and pushes a placeholder node.
	fn open(&mut self, cursor: &mut LineCursor<'_>, document: &mut Document) -> bool;

	/// Feed the current line to an open block.
	fn continue_block(&mut self, cursor: &mut LineCursor<'_>) -> Continuation;

	/// Finalize a closed block, reconciling the outcome into the tree and
	/// the parse context.
	fn close(&mut self, document: &mut Document, context: &mut ParseContext);
}

/// The concrete metadata block scanner.
#[derive(Debug, Default)]
pub struct MetaScanner {
	state: Option<ScanState>,
}

/// State carried between protocol calls while a block is in progress.
#[derive(Debug)]
struct ScanState {
	block: BlockState,
	format: Format,
	buffer: String,
	node: NodeId,
}

impl MetaScanner {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn state(&self) -> BlockState {
		self.state
			.as_ref()
			.map_or(BlockState::Scanning, |state| state.block)
	}

	/// Drop an unterminated block: remove the placeholder and discard the
	/// buffered content without producing an entry. The caller re-reads the
	/// abandoned lines as ordinary content.
	pub fn abandon(&mut self, document: &mut Document) {
		if let Some(state) = self.state.take() {
			debug!(format = %state.format, "metadata block never closed, dropping");
			document.remove(state.node);
		}
	}
}

impl BlockStage for MetaScanner {
	fn open(&mut self, cursor: &mut LineCursor<'_>, document: &mut Document) -> bool {
		// The opening marker is only recognized on the document's first
		// line; a metadata-like marker anywhere else is ordinary content.
		if cursor.line_index() != 0 || self.state.is_some() {
			return false;
		}

		let Some(line) = cursor.peek_line() else {
			return false;
		};

		let Some((offset, format)) = open_signal(line.as_bytes()) else {
			return false;
		};

		// Consume through the open token and the signal byte. For JSON the
		// signal is the payload's own opening brace, so it stays unconsumed.
		let mut consumed = offset + OPEN_TOKEN.len();
		if format != Format::Json {
			consumed += 1;
		}
		cursor.advance(consumed);

		debug!(%format, "metadata block opened");

		self.state = Some(ScanState {
			block: BlockState::Accumulating,
			format,
			buffer: String::new(),
			node: document.push(Node::meta_placeholder()),
		});

		true
	}

	fn continue_block(&mut self, cursor: &mut LineCursor<'_>) -> Continuation {
		let Some(state) = &mut self.state else {
			return Continuation::Continue;
		};
		let Some(line) = cursor.peek_line() else {
			return Continuation::Continue;
		};

		match close_offset(line.as_bytes(), state.format.close_signal()) {
			Some(stop) => {
				// Content before the marker is kept; the marker and any
				// trailing bytes on the line are consumed and dropped.
				state.buffer.push_str(&line[..stop]);
				state.block = BlockState::Closed;
				cursor.advance_line();
				Continuation::Close
			}
			None => {
				// The segment of line 0 that follows the consumed opening
				// marker is only buffered when non-empty.
				if !(line.is_empty() && state.buffer.is_empty()) {
					state.buffer.push_str(line);
					state.buffer.push('\n');
				}
				cursor.advance_line();
				Continuation::Continue
			}
		}
	}

	fn close(&mut self, document: &mut Document, context: &mut ParseContext) {
		let Some(state) = self.state.take() else {
			return;
		};

		if let Some(Node::MetaBlock { raw, .. }) = document.node_mut(state.node) {
			raw.clone_from(&state.buffer);
		}

		match state.format.decode(state.buffer.as_bytes()) {
			Ok(mapping) => {
				debug!(format = %state.format, keys = mapping.len(), "metadata block decoded");
				// A valid block produces no visible output.
				document.remove(state.node);
				context.set_entry(MetaEntry {
					mapping: Some(mapping),
					error: None,
					node: state.node,
				});
			}
			Err(error) => {
				debug!(format = %state.format, %error, "metadata block failed to decode");
				context.set_entry(MetaEntry {
					mapping: None,
					error: Some(error),
					node: state.node,
				});
			}
		}
	}
}
