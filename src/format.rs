use crate::MetaError;
use crate::MetaResult;
use crate::value::Mapping;

/// The HTML comment open token that introduces a metadata block.
pub const OPEN_TOKEN: &[u8] = b"<!--";
/// The HTML comment close token that terminates a metadata block.
pub const CLOSE_TOKEN: &[u8] = b"-->";

/// The structured-data format of a metadata block, selected by the single
/// signal byte that follows the comment open token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum Format {
	/// Signalled by `:`. The payload is a YAML mapping.
	Yaml,
	/// Signalled by `#`. The payload is a TOML table.
	Toml,
	/// Signalled by `{`. The payload is a JSON object; both braces are part
	/// of the payload, and the close marker is `}-->` rather than `{-->`.
	Json,
}

impl Format {
	/// Maps a signal byte to its format. Returns `None` for unrecognized
	/// bytes; the token matcher only ever accepts bytes that map here.
	pub fn from_signal(signal: u8) -> Option<Self> {
		match signal {
			b':' => Some(Self::Yaml),
			b'#' => Some(Self::Toml),
			b'{' => Some(Self::Json),
			_ => None,
		}
	}

	/// The byte searched for when matching this format's close marker. For
	/// JSON this is the closing brace, not the opening one.
	pub fn close_signal(self) -> u8 {
		match self {
			Self::Yaml => b':',
			Self::Toml => b'#',
			Self::Json => b'}',
		}
	}

	/// Decode a raw metadata payload into a [`Mapping`].
	///
	/// The payload is passed to the format's decoder verbatim. An empty or
	/// null YAML payload decodes to an empty mapping rather than an error,
	/// matching how an empty block behaves in the other two formats.
	pub fn decode(self, payload: &[u8]) -> MetaResult<Mapping> {
		match self {
			Self::Yaml => serde_yaml_ng::from_slice::<Option<Mapping>>(payload)
				.map(Option::unwrap_or_default)
				.map_err(|error| self.decode_error(error)),
			Self::Toml => std::str::from_utf8(payload)
				.map_err(|error| self.decode_error(error))
				.and_then(|payload| {
					toml::from_str::<Mapping>(payload).map_err(|error| self.decode_error(error))
				}),
			Self::Json => {
				serde_json::from_slice::<Mapping>(payload).map_err(|error| self.decode_error(error))
			}
		}
	}

	fn decode_error(self, error: impl std::fmt::Display) -> MetaError {
		MetaError::Decode {
			format: self,
			message: error.to_string(),
		}
	}
}

impl TryFrom<u8> for Format {
	type Error = MetaError;

	fn try_from(signal: u8) -> Result<Self, Self::Error> {
		Self::from_signal(signal).ok_or(MetaError::UnsupportedFormat(signal as char))
	}
}

impl std::fmt::Display for Format {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::Yaml => write!(f, "YAML"),
			Self::Toml => write!(f, "TOML"),
			Self::Json => write!(f, "JSON"),
		}
	}
}
