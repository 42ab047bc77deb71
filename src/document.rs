//! The minimal host document tree the scanner protocol runs against.
//!
//! The metadata stages only ever touch three node shapes: plain paragraphs,
//! the placeholder block that stands in for the raw metadata payload, and the
//! inline code span the error annotator appends to it. Rendering produces the
//! plain-text view used to verify that a valid block leaves no residue in the
//! output.

use crate::value::Mapping;
use crate::value::Value;

/// Identifier of a top-level node inside a [`Document`].
///
/// Ids are positional: removing a node invalidates ids issued after it. The
/// only node the pipeline ever removes is the metadata placeholder, which is
/// always pushed before any other node, so ids held elsewhere stay valid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeId(usize);

/// A node in the output tree.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum Node {
	/// A run of contiguous non-blank lines.
	Paragraph(String),
	/// The placeholder holding the raw bytes of a metadata block. Removed
	/// from the tree when decoding succeeds; annotated with children when it
	/// fails.
	MetaBlock { raw: String, children: Vec<Node> },
	/// An inline code span, rendered between backticks.
	CodeSpan(String),
}

impl Node {
	pub(crate) fn meta_placeholder() -> Self {
		Self::MetaBlock {
			raw: String::new(),
			children: vec![],
		}
	}

	fn render_into(&self, out: &mut String) {
		match self {
			Node::Paragraph(text) => out.push_str(text),
			Node::MetaBlock { raw, children } => {
				out.push_str(raw.trim_end_matches('\n'));
				for child in children {
					out.push('\n');
					child.render_into(out);
				}
			}
			Node::CodeSpan(text) => {
				out.push('`');
				out.push_str(text);
				out.push('`');
			}
		}
	}
}

/// The output tree for one converted document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
	children: Vec<Node>,
	meta: Mapping,
}

impl Document {
	pub fn new() -> Self {
		Self::default()
	}

	pub(crate) fn push(&mut self, node: Node) -> NodeId {
		self.children.push(node);
		NodeId(self.children.len() - 1)
	}

	pub(crate) fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
		self.children.get_mut(id.0)
	}

	pub(crate) fn remove(&mut self, id: NodeId) {
		if id.0 < self.children.len() {
			self.children.remove(id.0);
		}
	}

	pub fn children(&self) -> &[Node] {
		&self.children
	}

	/// The document-wide metadata slot. Populated from a decoded block only
	/// when [`MetaOptions::store_in_document`](crate::MetaOptions) is set.
	pub fn meta(&self) -> &Mapping {
		&self.meta
	}

	/// Additive copy into the document-wide slot; an existing key is
	/// overwritten in place.
	pub fn add_meta(&mut self, key: impl Into<String>, value: Value) {
		self.meta.insert(key, value);
	}

	/// Render the tree as plain text: top-level nodes separated by a blank
	/// line, with a trailing newline when the document is non-empty.
	pub fn render(&self) -> String {
		let mut out = String::new();

		for node in &self.children {
			if !out.is_empty() {
				out.push_str("\n\n");
			}
			node.render_into(&mut out);
		}

		if !out.is_empty() {
			out.push('\n');
		}

		out
	}
}

/// A cursor over the lines of a source document, shared by every stage of the
/// block protocol.
///
/// Lines are yielded without their terminators. [`LineCursor::advance`]
/// consumes bytes within the current line (used when the opening marker is
/// stripped from line 0); [`LineCursor::advance_line`] consumes through the
/// end of the current line including its terminator.
#[derive(Debug, Clone)]
pub struct LineCursor<'a> {
	source: &'a str,
	offset: usize,
	line_index: usize,
}

impl<'a> LineCursor<'a> {
	pub fn new(source: &'a str) -> Self {
		Self {
			source,
			offset: 0,
			line_index: 0,
		}
	}

	/// The unconsumed remainder of the current line, or `None` at end of
	/// input.
	pub fn peek_line(&self) -> Option<&'a str> {
		if self.is_eof() {
			return None;
		}

		let rest = &self.source[self.offset..];
		let line = match rest.find('\n') {
			Some(end) => &rest[..end],
			None => rest,
		};

		Some(line.strip_suffix('\r').unwrap_or(line))
	}

	/// Zero-based index of the current line. The opening marker is only ever
	/// matched while this is `0`.
	pub fn line_index(&self) -> usize {
		self.line_index
	}

	pub fn is_eof(&self) -> bool {
		self.offset >= self.source.len()
	}

	/// Consume `count` bytes within the current line.
	pub fn advance(&mut self, count: usize) {
		self.offset = (self.offset + count).min(self.source.len());
	}

	/// Consume the rest of the current line and its terminator.
	pub fn advance_line(&mut self) {
		let rest = &self.source[self.offset..];
		match rest.find('\n') {
			Some(end) => self.offset += end + 1,
			None => self.offset = self.source.len(),
		}
		self.line_index += 1;
	}
}
