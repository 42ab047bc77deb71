use miette::Diagnostic;
use thiserror::Error;

use crate::Format;

#[derive(Debug, Clone, Diagnostic, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum MetaError {
	#[error("unsupported metadata format signal: `{0}`")]
	#[diagnostic(
		code(mdmeta::unsupported_format),
		help("recognized signal bytes are `:` (YAML), `#` (TOML) and `{{` (JSON)")
	)]
	UnsupportedFormat(char),

	#[error("failed to decode {format} metadata: {message}")]
	#[diagnostic(code(mdmeta::decode))]
	Decode { format: Format, message: String },
}

pub type MetaResult<T> = Result<T, MetaError>;
