//! Integration tests exercising the §8 testable properties and concrete
//! scenarios against the public parser/serializer surface.

use tdf::{parse_str, to_string, CollectionKind, Node, Number, Temporal, Value};

fn tag_str<'d>(doc: &'d tdf::Document, id: tdf::ResourceId) -> Option<&'d str> {
	doc.get(id).as_compound().and_then(|c| c.tag.as_ref()).map(|t| t.as_str())
}

#[test]
fn scenario_1_namespaced_object() {
	let input = "===>urf:dc=<http://purl.org/dc/terms/>;<|<https://ex.com/x>|*:dc/creator=\"J\";";
	let doc = parse_str(input).unwrap();
	assert_eq!(doc.roots.len(), 1);
	let root = doc.get(doc.roots[0]).as_compound().unwrap();
	assert_eq!(root.tag.as_ref().unwrap().as_str(), "https://ex.com/x");
	assert_eq!(root.edges.len(), 1);
	let (prop, value) = root.edges[0];
	assert_eq!(tag_str(&doc, prop), Some("http://purl.org/dc/terms/creator"));
	assert_eq!(doc.get(value).as_literal(), Some(&Value::String("J".to_string())));
}

#[test]
fn scenario_2_n_ary_property() {
	let input = "*:many+=\"a\", many+=\"b\", many+=@1999;";
	let doc = parse_str(input).unwrap();
	let root = doc.get(doc.roots[0]).as_compound().unwrap();
	assert_eq!(root.edges.len(), 3);
	let prop_tag = tag_str(&doc, root.edges[0].0).unwrap().to_string();
	for (prop, _) in &root.edges {
		assert_eq!(tag_str(&doc, *prop).unwrap(), prop_tag);
	}
	assert_eq!(doc.get(root.edges[0].1).as_literal(), Some(&Value::String("a".to_string())));
	assert_eq!(doc.get(root.edges[1].1).as_literal(), Some(&Value::String("b".to_string())));
	assert_eq!(
		doc.get(root.edges[2].1).as_literal(),
		Some(&Value::Temporal(Temporal::Year(1999)))
	);
}

#[test]
fn scenario_3_alias_and_back_reference() {
	let input = "[|x|*Stuff:foo=1;, |x|]";
	let doc = parse_str(input).unwrap();
	let list = doc.get(doc.roots[0]).as_compound().unwrap();
	assert_eq!(list.shape, Some(CollectionKind::List));
	assert_eq!(list.edges.len(), 2);
	let first = list.edges[0].1;
	let second = list.edges[1].1;
	assert_eq!(first, second, "both list elements must be the same resource identity");
	let obj = doc.get(first).as_compound().unwrap();
	assert_eq!(obj.edges.len(), 1);
}

#[test]
fn scenario_4_id_and_type() {
	let input = "Ex#bar*Ex:test=\"first\";";
	let doc = parse_str(input).unwrap();
	let root = doc.get(doc.roots[0]).as_compound().unwrap();
	assert_eq!(root.tag.as_ref().unwrap().as_str(), "https://urf.name/Ex#bar");
	assert_eq!(root.type_tag.as_ref().unwrap().as_str(), "https://urf.name/Ex");
	assert_eq!(root.edges.len(), 1);
	let (prop, value) = root.edges[0];
	assert_eq!(tag_str(&doc, prop), Some("https://urf.name/test"));
	assert_eq!(doc.get(value).as_literal(), Some(&Value::String("first".to_string())));
}

#[test]
fn scenario_5_map_with_described_object_key() {
	let input = "{\\ *K:a=1;\\:\"v\"}";
	let doc = parse_str(input).unwrap();
	let map = doc.get(doc.roots[0]).as_compound().unwrap();
	assert_eq!(map.shape, Some(CollectionKind::Map));
	assert_eq!(map.edges.len(), 1);
	let entry = doc.get(map.edges[0].1).as_compound().unwrap();
	assert_eq!(entry.edges.len(), 2);
	let key_tag = "https://urf.name/rdf/key";
	let value_tag = "https://urf.name/rdf/value";
	let mut key = None;
	let mut value = None;
	for &(p, v) in &entry.edges {
		match tag_str(&doc, p) {
			Some(t) if t == key_tag => key = Some(v),
			Some(t) if t == value_tag => value = Some(v),
			_ => panic!("unexpected entry property"),
		}
	}
	let key_obj = doc.get(key.unwrap()).as_compound().unwrap();
	assert_eq!(key_obj.edges.len(), 1);
	assert_eq!(doc.get(value.unwrap()).as_literal(), Some(&Value::String("v".to_string())));
}

#[test]
fn scenario_6_boolean_handle_ambiguity() {
	let input = "|<https://urf.name/false>|*Bar";
	let doc = parse_str(input).unwrap();
	let root = doc.get(doc.roots[0]).as_compound().unwrap();
	assert_eq!(root.tag.as_ref().unwrap().as_str(), "https://urf.name/false");

	let text = to_string(&doc).unwrap();
	assert!(
		!text.contains("*false") && !text.starts_with("false"),
		"the tag must never be emitted as the bare handle `false`: {:?}",
		text
	);
	let doc2 = parse_str(&text).unwrap();
	let root2 = doc2.get(doc2.roots[0]).as_compound().unwrap();
	assert_eq!(root2.tag.as_ref().unwrap().as_str(), "https://urf.name/false");
}

#[test]
fn numeric_typing_long_vs_bigint() {
	let doc = parse_str("9223372036854775807").unwrap();
	match doc.get(doc.roots[0]).as_literal().unwrap() {
		Value::Number(Number::Long(n)) => assert_eq!(*n, i64::MAX),
		other => panic!("expected Long, got {:?}", other),
	}

	let doc = parse_str("99999999999999999999999999999").unwrap();
	match doc.get(doc.roots[0]).as_literal().unwrap() {
		Value::Number(Number::BigInt(_)) => {}
		other => panic!("expected BigInt for an out-of-range integer, got {:?}", other),
	}

	let doc = parse_str("$5").unwrap();
	match doc.get(doc.roots[0]).as_literal().unwrap() {
		Value::Number(Number::BigInt(n)) => assert_eq!(n.to_string(), "5"),
		other => panic!("expected a `$`-forced BigInt, got {:?}", other),
	}

	let doc = parse_str("$5.5").unwrap();
	match doc.get(doc.roots[0]).as_literal().unwrap() {
		Value::Number(Number::BigDecimal(_)) => {}
		other => panic!("expected a `$`-forced BigDecimal, got {:?}", other),
	}
}

#[test]
fn temporal_subtype_fidelity() {
	let cases = [
		("@1999", "Year"),
		("@1999-03", "YearMonth"),
		("@--03-04", "MonthDay"),
		("@1999-03-04", "LocalDate"),
		("@10:30", "LocalTime"),
		("@10:30+02:00", "OffsetTime"),
		("@1999-03-04T10:30", "LocalDateTime"),
		("@1999-03-04T10:30Z", "Instant"),
		("@1999-03-04T10:30+02:00", "OffsetDateTime"),
		("@1999-03-04T10:30+02:00[Europe/Berlin]", "ZonedDateTime"),
	];
	for (input, expected_subtype) in cases {
		let doc = parse_str(input).unwrap_or_else(|e| panic!("failed to parse {:?}: {}", input, e));
		let value = doc.get(doc.roots[0]).as_literal().unwrap();
		let Value::Temporal(t) = value else {
			panic!("{:?} did not parse to a temporal value", input);
		};
		assert_eq!(t.subtype_name(), expected_subtype, "input was {:?}", input);

		let text = to_string(&doc).unwrap();
		let doc2 = parse_str(&text).unwrap_or_else(|e| panic!("failed to re-parse {:?} (from {:?}): {}", text, input, e));
		let value2 = doc2.get(doc2.roots[0]).as_literal().unwrap();
		assert_eq!(value, value2, "round-trip mismatch for {:?} -> {:?}", input, text);
	}
}

#[test]
fn parse_safe_string_escaping() {
	let cases = ["hello", "with \"quotes\"", "with\nnewline", "with\ttab", "emoji \u{1F600}", "back\\slash"];
	for s in cases {
		let mut escaped = String::from("\"");
		for c in s.chars() {
			match c {
				'"' => escaped.push_str("\\\""),
				'\\' => escaped.push_str("\\\\"),
				'\n' => escaped.push_str("\\n"),
				'\t' => escaped.push_str("\\t"),
				c => escaped.push(c),
			}
		}
		escaped.push('"');
		let doc = parse_str(&escaped).unwrap_or_else(|e| panic!("failed to parse {:?}: {}", escaped, e));
		assert_eq!(doc.get(doc.roots[0]).as_literal(), Some(&Value::String(s.to_string())));
	}
}

#[test]
fn round_trip_through_serializer_preserves_graph_shape() {
	let input = "===>urf:dc=<http://purl.org/dc/terms/>;<[|<https://ex.com/a>|*:dc/creator=\"Jane\";, 42, @2024-01-01]";
	let doc = parse_str(input).unwrap();
	let text = to_string(&doc).unwrap();
	let doc2 = parse_str(&text).unwrap_or_else(|e| panic!("failed to re-parse {:?}: {}", text, e));

	assert_eq!(doc.roots.len(), doc2.roots.len());
	let list1 = doc.get(doc.roots[0]).as_compound().unwrap();
	let list2 = doc2.get(doc2.roots[0]).as_compound().unwrap();
	assert_eq!(list1.edges.len(), list2.edges.len());

	fn first_tag(doc: &tdf::Document, list: &tdf::CompoundNode) -> String {
		let first_value = list.edges[0].1;
		doc.get(first_value).as_compound().unwrap().tag.as_ref().unwrap().as_str().to_string()
	}
	assert_eq!(first_tag(&doc, list1), first_tag(&doc2, list2));
	assert_eq!(first_tag(&doc, list1), "https://ex.com/a");
}

#[test]
fn reference_single_emission_does_not_duplicate_bodies() {
	let input = "[|x|*Stuff:foo=1, bar=2;, |x|, |x|]";
	let doc = parse_str(input).unwrap();
	let text = to_string(&doc).unwrap();
	// The described body (with both `foo` and `bar` properties) appears
	// exactly once; the other two occurrences are bare alias references.
	assert_eq!(text.matches("foo").count(), 1);
	assert_eq!(text.matches("bar").count(), 1);
}

#[test]
fn properties_only_variant_applies_to_one_implicit_root() {
	use tdf::{DocumentVariant, GraphBuilder, Parser, ParserOptions};

	let mut options = ParserOptions::default();
	options.expected_variant = DocumentVariant::PropertiesOnly;
	let parser = Parser::new("dc-creator=\"Jane\", dc-year=2024", GraphBuilder::new(), options);
	let doc = parser.parse_document().unwrap();
	assert_eq!(doc.roots.len(), 1);
	let root = doc.get(doc.roots[0]).as_compound().unwrap();
	assert_eq!(root.edges.len(), 2);
}

#[test]
fn unregistered_namespace_alias_is_a_parse_error() {
	let err = parse_str("*:unknownalias/thing=1;").unwrap_err();
	assert!(matches!(err.kind, tdf::ParseErrorKind::UnregisteredAlias(_)));
}

#[test]
fn id_label_with_conflicting_fragment_is_rejected() {
	// §9 open question, resolved "reject": an explicit type-tag fragment
	// disagreeing with the `|"id"|` label's id is an error.
	let err = parse_str("|\"bar\"|*|<https://urf.name/Ex#other>|:test=1;").unwrap_err();
	assert!(matches!(err.kind, tdf::ParseErrorKind::IdTagConflict));
}

#[test]
fn document_description_block_applies_to_a_non_root_resource() {
	let input = "# dc-creator=\"doc author\"; # \"body\"";
	let doc = parse_str(input).unwrap();
	// The document-description resource is never reported as a root; only
	// the body's single string literal is.
	assert_eq!(doc.roots.len(), 1);
	assert_eq!(doc.get(doc.roots[0]).as_literal(), Some(&Value::String("body".to_string())));
}

#[test]
fn anonymous_nested_object_uses_short_property_form() {
	use tdf::{Serializer, SerializerOptions};

	let input = "*:part:name=\"widget\";;";
	let doc = parse_str(input).unwrap();

	let text = tdf::writer::to_string(&doc, SerializerOptions::default()).unwrap();
	assert!(
		text.contains("part:name="),
		"expected the short `propertyRef:…;` form, got {:?}",
		text
	);
	assert!(!text.contains("part=*:"), "short form should not fall back to `=*:`: {:?}", text);

	let mut options = SerializerOptions::default();
	options.use_short_property_form = false;
	let full_text = Serializer::new(&doc, String::new(), options).serialize().unwrap();
	assert!(
		full_text.contains("part=*:name="),
		"expected the full `propertyRef=*:…;` form when disabled, got {:?}",
		full_text
	);

	let doc2 = parse_str(&text).unwrap_or_else(|e| panic!("failed to re-parse short form {:?}: {}", text, e));
	let root = doc2.get(doc2.roots[0]).as_compound().unwrap();
	assert_eq!(root.edges.len(), 1);
	let nested = doc2.get(root.edges[0].1).as_compound().unwrap();
	assert_eq!(nested.edges.len(), 1);
}

#[test]
fn list_items_preserve_document_order_via_index() {
	let doc = parse_str("[\"a\", \"b\", \"c\"]").unwrap();
	let list = doc.get(doc.roots[0]).as_compound().unwrap();
	assert!(matches!(doc.get(doc.roots[0]), Node::Compound(c) if c.shape == Some(CollectionKind::List)));
	let values: Vec<_> = list
		.edges
		.iter()
		.map(|&(_, v)| doc.get(v).as_literal().cloned())
		.collect();
	assert_eq!(
		values,
		vec![
			Some(Value::String("a".to_string())),
			Some(Value::String("b".to_string())),
			Some(Value::String("c".to_string())),
		]
	);
}

#[test]
fn formatted_mode_indents_and_round_trips() {
	use tdf::writer::to_string as to_string_with;
	use tdf::{Format, SerializerOptions};

	let input = "*:dc-creator=\"Jane\",dc-subject=[\"a\",\"b\"];";
	let doc = parse_str(input).unwrap();

	let mut options = SerializerOptions::default();
	options.format = Format::Formatted;
	let formatted = to_string_with(&doc, options).unwrap();
	assert!(formatted.contains('\n'), "formatted output should contain newlines: {:?}", formatted);
	assert!(formatted.contains("\n\t"), "nested items should be indented one level: {:?}", formatted);
	assert!(!formatted.contains(','), "formatted mode should use newlines instead of commas: {:?}", formatted);

	let compact = to_string(&doc).unwrap();
	assert!(!compact.contains('\n'), "compact output should contain no newlines: {:?}", compact);

	let doc2 = parse_str(&formatted).unwrap_or_else(|e| panic!("failed to re-parse formatted output {:?}: {}", formatted, e));
	let root = doc2.get(doc2.roots[0]).as_compound().unwrap();
	assert_eq!(root.edges.len(), 2);
}
