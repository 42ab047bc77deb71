use crate::Conversion;
use crate::MetaOptions;
use crate::convert;

/// The same `Title: mmd` document in all three formats, each followed by a
/// single `body` paragraph.
pub(crate) const YAML_DOCUMENT: &str = "<!--:\nTitle: mmd\n:-->\n\nbody\n";
pub(crate) const TOML_DOCUMENT: &str = "<!--#\nTitle = \"mmd\"\n#-->\n\nbody\n";
pub(crate) const JSON_DOCUMENT: &str = "<!--{ \"Title\": \"mmd\" }-->\n\nbody\n";

pub(crate) fn convert_default(source: &str) -> Conversion {
	convert(source, &MetaOptions::default())
}

pub(crate) fn convert_stored(source: &str) -> Conversion {
	convert(source, &MetaOptions::new().with_store_in_document(true))
}
