//! Pure, stateless tests for the opening and closing metadata block markers.
//!
//! The open marker is the 4-byte HTML comment token `<!--` immediately
//! followed by one recognized signal byte; whitespace between the two
//! disqualifies the match. The close marker is the format's close signal
//! immediately followed by `-->`.

use crate::format::CLOSE_TOKEN;
use crate::format::Format;
use crate::format::OPEN_TOKEN;

/// Scan `line` for an opening marker. Returns the byte offset at which the
/// open token starts, together with the format mapped from the signal byte
/// that immediately follows it.
pub(crate) fn open_signal(line: &[u8]) -> Option<(usize, Format)> {
	let token_len = OPEN_TOKEN.len();

	for (offset, window) in line.windows(token_len + 1).enumerate() {
		if &window[..token_len] == OPEN_TOKEN {
			if let Some(format) = Format::from_signal(window[token_len]) {
				return Some((offset, format));
			}
		}
	}

	None
}

/// Whether `line` contains an opening marker for any recognized format.
pub fn is_open(line: &[u8]) -> bool {
	open_signal(line.trim_ascii()).is_some()
}

/// Scan `line` for the close marker of a block opened with `signal`.
///
/// Returns the offset at which buffered content must stop. For YAML and TOML
/// that is the signal's own offset (the signal belongs to the marker); for
/// JSON it is one byte later, because the closing brace overlaps the marker
/// and belongs to the payload.
///
/// A line consisting entirely of whitespace never closes a block. This guards
/// against accumulation ending on blank separator lines inside the payload.
pub fn close_offset(line: &[u8], signal: u8) -> Option<usize> {
	if is_blank(line) {
		return None;
	}

	let token_len = CLOSE_TOKEN.len();

	for (offset, byte) in line.iter().enumerate() {
		if *byte == signal
			&& line.len() - offset > token_len
			&& &line[offset + 1..=offset + token_len] == CLOSE_TOKEN
		{
			return if signal == b'}' {
				Some(offset + 1)
			} else {
				Some(offset)
			};
		}
	}

	None
}

pub(crate) fn is_blank(line: &[u8]) -> bool {
	line.iter().all(u8::is_ascii_whitespace)
}
