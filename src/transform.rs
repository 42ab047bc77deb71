use crate::config::MetaOptions;
use crate::context::ParseContext;
use crate::document::Document;
use crate::document::Node;

/// Post-pass reconciling the parse outcome into the finished tree. Runs once
/// per conversion, after every node has been built.
///
/// A stored decode error becomes a visible marker: an inline code span
/// carrying the decoder's message, appended as a child of the placeholder
/// node so the raw payload stays visible alongside it. A successful decode
/// is optionally published into the document-wide metadata slot.
pub(crate) fn transform(document: &mut Document, context: &ParseContext, options: &MetaOptions) {
	let Some(entry) = context.entry() else {
		return;
	};

	if let Some(error) = &entry.error {
		if let Some(Node::MetaBlock { children, .. }) = document.node_mut(entry.node) {
			children.push(Node::CodeSpan(format!("<!-- meta error, {error} -->")));
		}
		return;
	}

	if options.store_in_document {
		if let Some(mapping) = &entry.mapping {
			for (key, value) in mapping.iter() {
				document.add_meta(key.clone(), value.clone());
			}
		}
	}
}
