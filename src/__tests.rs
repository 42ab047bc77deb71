use rstest::rstest;
use similar_asserts::assert_eq;

use super::__fixtures::*;
use super::*;
use crate::matcher::close_offset;
use crate::matcher::is_open;
use crate::matcher::open_signal;

#[rstest]
#[case::yaml(b"<!--:", true)]
#[case::toml(b"<!--#", true)]
#[case::json(b"<!--{", true)]
#[case::leading_text(b"text <!--: more", true)]
#[case::leading_whitespace(b"  <!--:", true)]
#[case::whitespace_before_signal(b"<!-- :", false)]
#[case::no_signal(b"<!--", false)]
#[case::unknown_signal(b"<!--%", false)]
#[case::plain_text(b"just a paragraph", false)]
#[case::close_token_only(b":-->", false)]
fn matches_open_marker(#[case] line: &[u8], #[case] expected: bool) {
	assert_eq!(is_open(line), expected);
}

#[test]
fn open_signal_reports_offset_and_format() {
	assert_eq!(open_signal(b"<!--:"), Some((0, Format::Yaml)));
	assert_eq!(open_signal(b"ab<!--{"), Some((2, Format::Json)));
	assert_eq!(open_signal(b"<!--!"), None);
}

#[rstest]
#[case::yaml(b":-->", b':', Some(0))]
#[case::toml(b"#-->", b'#', Some(0))]
#[case::json_keeps_brace(b"}-->", b'}', Some(1))]
#[case::mid_line(b"text:-->", b':', Some(4))]
#[case::payload_colon_not_marker(b"Title: mmd", b':', None)]
#[case::wrong_signal(b"#-->", b':', None)]
#[case::blank_line(b"   \t", b':', None)]
#[case::empty_line(b"", b':', None)]
fn matches_close_marker(#[case] line: &[u8], #[case] signal: u8, #[case] expected: Option<usize>) {
	assert_eq!(close_offset(line, signal), expected);
}

#[test]
fn close_marker_offset_includes_json_brace() {
	let line = br#"{ "Title": "mmd" }-->"#;
	assert_eq!(close_offset(line, b'}'), Some(line.len() - 3));
}

#[rstest]
#[case::yaml(b':', Format::Yaml)]
#[case::toml(b'#', Format::Toml)]
#[case::json(b'{', Format::Json)]
fn signal_dispatch(#[case] signal: u8, #[case] expected: Format) {
	assert_eq!(Format::from_signal(signal), Some(expected));
	assert_eq!(Format::try_from(signal), Ok(expected));
}

#[test]
fn unmapped_signal_is_an_unsupported_format_error() {
	assert_eq!(Format::from_signal(b'%'), None);
	assert_eq!(Format::try_from(b'%'), Err(MetaError::UnsupportedFormat('%')));
}

#[test]
fn json_close_signal_is_the_closing_brace() {
	assert_eq!(Format::Yaml.close_signal(), b':');
	assert_eq!(Format::Toml.close_signal(), b'#');
	assert_eq!(Format::Json.close_signal(), b'}');
}

#[rstest]
#[case::yaml(Format::Yaml, b"Title: mmd\nCount: 3\nDraft: true\n")]
#[case::toml(Format::Toml, b"Title = \"mmd\"\nCount = 3\nDraft = true\n")]
#[case::json(Format::Json, b"{\"Title\": \"mmd\", \"Count\": 3, \"Draft\": true}")]
fn equivalent_payloads_decode_to_equal_mappings(#[case] format: Format, #[case] payload: &[u8]) {
	let expected: Mapping = [
		("Title".to_string(), Value::String("mmd".to_string())),
		("Count".to_string(), Value::Int(3)),
		("Draft".to_string(), Value::Bool(true)),
	]
	.into_iter()
	.collect();

	let mapping = format.decode(payload).unwrap();
	assert_eq!(mapping, expected);
}

#[test]
fn empty_yaml_payload_decodes_to_an_empty_mapping() {
	assert!(Format::Yaml.decode(b"").unwrap().is_empty());
	assert!(Format::Yaml.decode(b"\n").unwrap().is_empty());
}

#[rstest]
#[case::yaml(YAML_DOCUMENT)]
#[case::toml(TOML_DOCUMENT)]
#[case::json(JSON_DOCUMENT)]
fn valid_block_yields_metadata_and_clean_render(#[case] source: &str) {
	let conversion = convert_default(source);

	let metadata = conversion.context.metadata().unwrap();
	assert_eq!(metadata["Title"].as_str(), Some("mmd"));
	assert_eq!(conversion.document.render(), "body\n");
}

#[test]
fn single_line_block_closes_on_the_opening_line() {
	let conversion = convert_default("<!--{ \"Title\": \"mmd\" }-->\nbody");

	let metadata = conversion.context.metadata().unwrap();
	assert_eq!(metadata["Title"].as_str(), Some("mmd"));
	assert_eq!(conversion.document.render(), "body\n");
}

#[test]
fn block_only_document_renders_empty() {
	let conversion = convert_default("<!--:\nTitle: mmd\n:-->\n");

	assert!(conversion.context.metadata().is_some());
	assert_eq!(conversion.document.render(), "");
}

#[test]
fn windows_line_endings_are_tolerated() {
	let conversion = convert_default("<!--:\r\nTitle: mmd\r\n:-->\r\n\r\nbody\r\n");

	let metadata = conversion.context.metadata().unwrap();
	assert_eq!(metadata["Title"].as_str(), Some("mmd"));
	assert_eq!(conversion.document.render(), "body\n");
}

#[test]
fn blank_line_inside_payload_does_not_close_the_block() {
	let conversion = convert_default("<!--:\nFirst: 1\n\nSecond: 2\n:-->\n\nbody\n");

	let metadata = conversion.context.metadata().unwrap();
	assert_eq!(metadata["First"].as_int(), Some(1));
	assert_eq!(metadata["Second"].as_int(), Some(2));
	assert_eq!(conversion.document.render(), "body\n");
}

#[rstest]
#[case::yaml("<!--:\nTitle: [unclosed\n:-->\n\nbody\n", Format::Yaml, "Title: [unclosed")]
#[case::toml("<!--#\nnot toml at all\n#-->\n\nbody\n", Format::Toml, "not toml at all")]
#[case::json("<!--{ not json }-->\n\nbody\n", Format::Json, "{ not json }")]
fn invalid_block_surfaces_error_and_keeps_raw_text(
	#[case] source: &str,
	#[case] format: Format,
	#[case] raw: &str,
) {
	let conversion = convert_default(source);

	assert!(conversion.context.metadata().is_none());
	let error = conversion.context.try_metadata().unwrap_err();
	assert!(matches!(&error, MetaError::Decode { format: f, .. } if *f == format));

	let rendered = conversion.document.render();
	assert!(rendered.contains(raw));
	assert!(rendered.contains("<!-- meta error,"));
	assert!(rendered.contains("body"));
}

#[test]
fn error_marker_is_an_inline_code_span_child_of_the_placeholder() {
	let conversion = convert_default("<!--{ not json }-->\nbody\n");

	let [Node::MetaBlock { raw, children }, Node::Paragraph(body)] =
		conversion.document.children()
	else {
		panic!("unexpected tree shape: {:?}", conversion.document.children());
	};

	assert_eq!(raw, "{ not json }");
	assert_eq!(body, "body");
	let [Node::CodeSpan(marker)] = children.as_slice() else {
		panic!("unexpected placeholder children: {children:?}");
	};
	assert!(marker.starts_with("<!-- meta error,"));
	assert!(marker.ends_with("-->"));
}

#[test]
fn marker_after_the_first_line_is_ordinary_content() {
	let source = "intro\n\n<!--:\nTitle: mmd\n:-->\n";
	let conversion = convert_default(source);

	assert_eq!(conversion.context.try_metadata(), Ok(None));
	let rendered = conversion.document.render();
	assert!(rendered.contains("<!--:"));
	assert!(rendered.contains("Title: mmd"));
}

#[test]
fn unterminated_block_is_dropped_without_an_entry() {
	let source = "<!--:\nTitle: mmd\nbody\n";
	let conversion = convert_default(source);

	assert_eq!(conversion.context.try_metadata(), Ok(None));
	assert!(conversion.context.metadata().is_none());

	// The abandoned block reads back as literal content.
	let rendered = conversion.document.render();
	assert!(rendered.contains("<!--:"));
	assert!(rendered.contains("Title: mmd"));
	assert!(rendered.contains("body"));
}

#[test]
fn document_without_a_block_renders_unchanged() {
	let conversion = convert_default("first paragraph\n\nsecond\nparagraph\n");

	assert_eq!(conversion.context.try_metadata(), Ok(None));
	assert_eq!(
		conversion.document.render(),
		"first paragraph\n\nsecond\nparagraph\n"
	);
}

#[test]
fn scanner_ignores_markers_when_not_on_the_first_line() {
	let mut cursor = LineCursor::new("padding\n<!--:\nTitle: x\n:-->\n");
	let mut document = Document::new();
	let mut scanner = MetaScanner::new();

	cursor.advance_line();
	assert!(!scanner.open(&mut cursor, &mut document));
	assert_eq!(scanner.state(), BlockState::Scanning);
}

#[test]
fn store_in_document_publishes_decoded_keys() {
	let conversion = convert_stored(YAML_DOCUMENT);

	assert_eq!(
		conversion.document.meta().get("Title"),
		Some(&Value::String("mmd".to_string()))
	);
}

#[test]
fn store_in_document_defaults_off() {
	let conversion = convert_default(YAML_DOCUMENT);
	assert!(conversion.document.meta().is_empty());
}

#[test]
fn store_in_document_skips_failed_decodes() {
	let conversion = convert_stored("<!--{ not json }-->\nbody\n");
	assert!(conversion.document.meta().is_empty());
}

#[test]
fn mapping_preserves_insertion_order_and_overwrites_in_place() {
	let mut mapping = Mapping::new();
	mapping.insert("a", Value::Int(1));
	mapping.insert("b", Value::Int(2));
	mapping.insert("c", Value::Int(3));

	let previous = mapping.insert("a", Value::Int(10));
	assert_eq!(previous, Some(Value::Int(1)));
	assert_eq!(mapping.len(), 3);
	assert_eq!(
		mapping.keys().collect::<Vec<_>>(),
		vec!["a", "b", "c"],
	);
	assert_eq!(mapping["a"], Value::Int(10));
}

#[test]
fn nested_values_decode_into_the_closed_variant() {
	let payload = br#"{"seq": [1, "two", true, null], "map": {"k": 1.5}}"#;
	let mapping = Format::Json.decode(payload).unwrap();

	let sequence = mapping["seq"].as_sequence().unwrap();
	assert_eq!(sequence[0].as_int(), Some(1));
	assert_eq!(sequence[1].as_str(), Some("two"));
	assert_eq!(sequence[2].as_bool(), Some(true));
	assert!(sequence[3].is_null());

	let nested = mapping["map"].as_mapping().unwrap();
	assert_eq!(nested["k"].as_float(), Some(1.5));
}

#[test]
fn float_values_compare_approximately() {
	assert_eq!(Value::Float(0.1 + 0.2), Value::Float(0.3));
	assert_ne!(Value::Float(0.3), Value::Float(0.4));
}

#[test]
fn duplicate_keys_in_a_payload_keep_the_last_value() {
	let mapping = Format::Json
		.decode(br#"{"Title": "first", "Title": "last"}"#)
		.unwrap();

	assert_eq!(mapping.len(), 1);
	assert_eq!(mapping["Title"].as_str(), Some("last"));
}
