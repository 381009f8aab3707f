use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::Value;

use crate::config::CodecConfig;
use crate::error::ParseError;
use crate::model::Document;

/// Decode JSON5 text into an untyped value. Schema checks happen later, in
/// [`crate::schema::validate`].
pub fn decode(text: &str) -> Result<Value, ParseError> {
    json5::from_str::<Value>(text).map_err(parse_error)
}

fn parse_error(err: json5::Error) -> ParseError {
    match err {
        json5::Error::Message { mut msg, location } => ParseError {
            message: {
                // json5 reads every integer literal as i64.
                if msg == "error parsing integer" {
                    msg.push_str(": integer literal is out of the 64-bit range");
                }
                msg
            },
            line: location.as_ref().map(|loc| loc.line),
            column: location.as_ref().map(|loc| loc.column),
        },
    }
}

/// Canonical text with the default two-space indent.
pub fn encode(document: &Document) -> String {
    encode_with(document, &CodecConfig::default())
}

pub fn encode_with(document: &Document, config: &CodecConfig) -> String {
    let indent = " ".repeat(config.indent);
    let formatter = PrettyFormatter::with_indent(indent.as_bytes());
    let mut buf = Vec::new();
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    // Strings, finite floats and fixed keys only; writing into a Vec cannot fail.
    document
        .serialize(&mut ser)
        .expect("document serialization into memory");
    let mut text = String::from_utf8(buf).expect("serde_json emits utf-8");
    text.push('\n');
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Ref, Table};

    #[test]
    fn decodes_json5_syntax() {
        let text = r#"
// tables of the shop
{
  tables: [
    { name: 'order', columns: [{ name: "id" },], },
  ],
}
"#;
        let value = decode(text).unwrap();
        assert_eq!(value["tables"][0]["name"], "order");
        assert_eq!(value["tables"][0]["columns"][0]["name"], "id");
    }

    #[test]
    fn malformed_text_is_a_parse_error_with_location() {
        let err = decode("{\n  tables: [\n    { name: }\n  ]\n}").unwrap_err();
        assert!(!err.message.is_empty());
        assert_eq!(err.line, Some(3));
        assert!(err.column.is_some());
    }

    #[test]
    fn oversized_integer_literal_reports_range() {
        let err = decode("{ x: 123456789012345678901234567890 }").unwrap_err();
        assert!(err.message.contains("out of the 64-bit range"), "{}", err.message);
        assert!(decode("{ x: 9223372036854775807, y: 1.5e300 }").is_ok());
    }

    #[test]
    fn well_formed_but_wrong_shape_still_decodes() {
        let value = decode("[1, 2, 3]").unwrap();
        assert!(value.is_array());
    }

    #[test]
    fn encode_uses_fixed_key_order_and_omits_empty_fields() {
        let doc = Document {
            tables: vec![
                Table::new("order").with_columns(["id"]).at(50.0, 60.0),
                Table::new("address"),
            ],
            refs: vec![Ref::new("order", "address")],
        };
        let expected = r#"{
  "tables": [
    {
      "name": "order",
      "columns": [
        {
          "name": "id"
        }
      ],
      "position": {
        "x": 50.0,
        "y": 60.0
      }
    },
    {
      "name": "address"
    }
  ],
  "refs": [
    {
      "source": {
        "table": "order"
      },
      "target": {
        "table": "address"
      }
    }
  ]
}
"#;
        assert_eq!(encode(&doc), expected);
    }

    #[test]
    fn encode_is_stable_across_calls() {
        let mut table = Table::new("order");
        table.background_color = Some("#fed7aa".to_string());
        table.text_color = Some("#000000".to_string());
        let doc = Document {
            tables: vec![table],
            refs: Vec::new(),
        };
        let first = encode(&doc);
        assert_eq!(first, encode(&doc));
        assert!(!first.contains("refs"));
        let bg = first.find("background_color").unwrap();
        let fg = first.find("text_color").unwrap();
        assert!(bg < fg);
    }

    #[test]
    fn indent_is_configurable() {
        let doc = Document {
            tables: vec![Table::new("t")],
            refs: Vec::new(),
        };
        let text = encode_with(&doc, &CodecConfig { indent: 4 });
        assert!(text.starts_with("{\n    \"tables\""));
    }
}
