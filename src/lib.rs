//! `mdmeta` recognizes a leading metadata block in a markdown-like document.
//! The block is wrapped in an HTML comment so renderers unaware of it never
//! show it, and the byte immediately after `<!--` selects the data format:
//! `:` for YAML, `#` for TOML, and `{` for JSON (closed by `}-->`).
//!
//! ## Processing Pipeline
//!
//! ```text
//! Source document
//!   → Token matcher (tests line 0 for `<!--` + signal byte, later lines for signal + `-->`)
//!   → Block accumulator (open/continue/close protocol over a line cursor, buffers the payload)
//!   → Format dispatcher (signal byte → YAML / TOML / JSON decoder)
//!   → Parse context (stores the decoded mapping or the decode error)
//!   → Error annotator (marks failed blocks in the tree, optionally publishes document metadata)
//! ```
//!
//! A valid block disappears from the rendered output entirely. An invalid
//! block stays visible, with the decoder's diagnostic appended as an inline
//! code span. A block is only ever recognized on the document's first line;
//! the same marker anywhere else is ordinary content.
//!
//! ## Quick Start
//!
//! ```rust
//! use mdmeta::MetaOptions;
//! use mdmeta::convert;
//!
//! let source = "<!--:\nTitle: mmd\n:-->\n\nbody\n";
//! let conversion = convert(source, &MetaOptions::default());
//!
//! let metadata = conversion.context.metadata().unwrap();
//! assert_eq!(metadata["Title"].as_str(), Some("mmd"));
//! assert_eq!(conversion.document.render(), "body\n");
//! ```

pub use config::*;
pub use context::*;
pub use document::*;
pub use error::*;
pub use format::*;
pub use pipeline::*;
pub use scanner::*;
pub use value::*;

pub mod config;
mod context;
mod document;
mod error;
mod format;
pub mod matcher;
mod pipeline;
mod scanner;
mod transform;
mod value;

#[cfg(test)]
mod __fixtures;
#[cfg(test)]
mod __tests;
