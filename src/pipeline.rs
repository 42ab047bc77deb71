use tracing::instrument;

use crate::config::MetaOptions;
use crate::context::ParseContext;
use crate::document::Document;
use crate::document::LineCursor;
use crate::document::Node;
use crate::scanner::BlockStage;
use crate::scanner::BlockState;
use crate::scanner::Continuation;
use crate::scanner::MetaScanner;
use crate::transform::transform;

/// The result of converting one document: the output tree and the parse
/// context holding the metadata outcome.
#[derive(Debug, Clone)]
pub struct Conversion {
	pub document: Document,
	pub context: ParseContext,
}

/// Convert a source document, extracting a leading metadata block when one
/// is present.
///
/// The scanner is driven through its open/continue/close protocol one line
/// at a time in document order. A block that reaches end of input without a
/// close marker is abandoned: no entry is produced and the cursor rewinds to
/// the start so the raw text reads as ordinary content. The remaining lines
/// are split into paragraphs on blank lines, then the error annotator runs
/// once over the finished tree.
#[instrument(level = "trace", skip_all)]
pub fn convert(source: &str, options: &MetaOptions) -> Conversion {
	let mut document = Document::new();
	let mut context = ParseContext::new();
	let mut cursor = LineCursor::new(source);
	let mut scanner = MetaScanner::new();

	if scanner.open(&mut cursor, &mut document) {
		while !cursor.is_eof() {
			if scanner.continue_block(&mut cursor) == Continuation::Close {
				break;
			}
		}

		if scanner.state() == BlockState::Closed {
			scanner.close(&mut document, &mut context);
		} else {
			scanner.abandon(&mut document);
			cursor = LineCursor::new(source);
		}
	}

	append_content(&mut document, &mut cursor);
	transform(&mut document, &context, options);

	Conversion { document, context }
}

/// Split the cursor's remaining lines into paragraphs on blank lines.
fn append_content(document: &mut Document, cursor: &mut LineCursor<'_>) {
	let mut paragraph = String::new();

	while let Some(line) = cursor.peek_line() {
		if line.trim().is_empty() {
			flush_paragraph(document, &mut paragraph);
		} else {
			if !paragraph.is_empty() {
				paragraph.push('\n');
			}
			paragraph.push_str(line);
		}
		cursor.advance_line();
	}

	flush_paragraph(document, &mut paragraph);
}

fn flush_paragraph(document: &mut Document, paragraph: &mut String) {
	if !paragraph.is_empty() {
		document.push(Node::Paragraph(std::mem::take(paragraph)));
	}
}
