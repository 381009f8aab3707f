//! Closed-schema validation of a decoded document.
//!
//! Every node of the tree is checked explicitly; nothing is coerced. All
//! violations are collected in document order and each carries a JSON pointer
//! (RFC 6901) to the offending node. Unknown keys are reported at their own
//! path, missing required keys at the path of the object that lacks them.

use serde_json::{Map, Value};

use crate::error::{ValidationErrors, ValidationIssue};
use crate::model::{Column, Document, Position, Ref, Table, TableRef};

const DOCUMENT_KEYS: &[&str] = &["tables", "refs"];
const TABLE_KEYS: &[&str] = &[
    "name",
    "columns",
    "position",
    "background_color",
    "text_color",
];
const COLUMN_KEYS: &[&str] = &["name"];
const POSITION_KEYS: &[&str] = &["x", "y"];
const REF_KEYS: &[&str] = &["source", "target"];
const TABLE_REF_KEYS: &[&str] = &["table"];

pub fn validate(value: &Value) -> Result<Document, ValidationErrors> {
    let mut validator = Validator::default();
    let document = validator.document(value);
    match document {
        Some(document) if validator.issues.is_empty() => Ok(document),
        _ => Err(ValidationErrors(validator.issues)),
    }
}

fn child(path: &str, key: &str) -> String {
    let escaped = key.replace('~', "~0").replace('/', "~1");
    format!("{path}/{escaped}")
}

fn index(path: &str, idx: usize) -> String {
    format!("{path}/{idx}")
}

#[derive(Default)]
struct Validator {
    issues: Vec<ValidationIssue>,
}

impl Validator {
    fn push(&mut self, path: &str, message: impl Into<String>) {
        self.issues.push(ValidationIssue::new(path, message));
    }

    fn document(&mut self, value: &Value) -> Option<Document> {
        let map = self.object(value, "", DOCUMENT_KEYS, &["tables"])?;
        let tables = map
            .get("tables")
            .and_then(|v| self.array(v, "/tables", Self::table));
        let refs = match map.get("refs") {
            None | Some(Value::Null) => Some(Vec::new()),
            Some(v) => self.array(v, "/refs", Self::reference),
        };
        Some(Document {
            tables: tables?,
            refs: refs?,
        })
    }

    fn table(&mut self, value: &Value, path: &str) -> Option<Table> {
        let map = self.object(value, path, TABLE_KEYS, &["name"])?;
        let name = map
            .get("name")
            .and_then(|v| self.name(v, &child(path, "name")));
        let columns = match map.get("columns") {
            None | Some(Value::Null) => Some(Vec::new()),
            Some(v) => self.array(v, &child(path, "columns"), Self::column),
        };
        let position = match map.get("position") {
            None | Some(Value::Null) => Some(None),
            Some(v) => self.position(v, &child(path, "position")).map(Some),
        };
        let background_color = self.optional_string(map, path, "background_color");
        let text_color = self.optional_string(map, path, "text_color");
        Some(Table {
            name: name?,
            columns: columns?,
            position: position?,
            background_color: background_color?,
            text_color: text_color?,
        })
    }

    fn column(&mut self, value: &Value, path: &str) -> Option<Column> {
        let map = self.object(value, path, COLUMN_KEYS, &["name"])?;
        let name = map.get("name")?;
        let name = self.name(name, &child(path, "name"))?;
        Some(Column { name })
    }

    fn position(&mut self, value: &Value, path: &str) -> Option<Position> {
        let map = self.object(value, path, POSITION_KEYS, POSITION_KEYS)?;
        let x = map.get("x").and_then(|v| self.number(v, &child(path, "x")));
        let y = map.get("y").and_then(|v| self.number(v, &child(path, "y")));
        Some(Position { x: x?, y: y? })
    }

    fn reference(&mut self, value: &Value, path: &str) -> Option<Ref> {
        let map = self.object(value, path, REF_KEYS, REF_KEYS)?;
        let source = map
            .get("source")
            .and_then(|v| self.table_ref(v, &child(path, "source")));
        let target = map
            .get("target")
            .and_then(|v| self.table_ref(v, &child(path, "target")));
        Some(Ref {
            source: source?,
            target: target?,
        })
    }

    fn table_ref(&mut self, value: &Value, path: &str) -> Option<TableRef> {
        let map = self.object(value, path, TABLE_REF_KEYS, TABLE_REF_KEYS)?;
        let table = map.get("table")?;
        let table = self.string(table, &child(path, "table"))?;
        Some(TableRef { table })
    }

    /// Checks the value is an object, reports keys outside `allowed` and
    /// missing `required` keys. The map is returned even when keys are wrong so
    /// that nested values are still checked.
    fn object<'a>(
        &mut self,
        value: &'a Value,
        path: &str,
        allowed: &[&str],
        required: &[&str],
    ) -> Option<&'a Map<String, Value>> {
        let Some(map) = value.as_object() else {
            self.push(path, "must be object");
            return None;
        };
        for key in required {
            if !map.contains_key(*key) {
                self.push(path, format!("missing required property '{key}'"));
            }
        }
        for key in map.keys() {
            if !allowed.contains(&key.as_str()) {
                self.push(
                    &child(path, key),
                    format!("additional property '{key}' not allowed"),
                );
            }
        }
        Some(map)
    }

    fn array<T>(
        &mut self,
        value: &Value,
        path: &str,
        mut item: impl FnMut(&mut Self, &Value, &str) -> Option<T>,
    ) -> Option<Vec<T>> {
        let Some(values) = value.as_array() else {
            self.push(path, "must be array");
            return None;
        };
        let mut out = Vec::with_capacity(values.len());
        let mut complete = true;
        for (idx, v) in values.iter().enumerate() {
            match item(self, v, &index(path, idx)) {
                Some(parsed) => out.push(parsed),
                None => complete = false,
            }
        }
        complete.then_some(out)
    }

    fn string(&mut self, value: &Value, path: &str) -> Option<String> {
        match value.as_str() {
            Some(s) => Some(s.to_string()),
            None => {
                self.push(path, "must be string");
                None
            }
        }
    }

    fn name(&mut self, value: &Value, path: &str) -> Option<String> {
        let name = self.string(value, path)?;
        if name.is_empty() {
            self.push(path, "must not be empty");
            return None;
        }
        Some(name)
    }

    fn number(&mut self, value: &Value, path: &str) -> Option<f64> {
        match value.as_f64() {
            Some(n) => Some(n),
            None => {
                self.push(path, "must be number");
                None
            }
        }
    }

    fn optional_string(
        &mut self,
        map: &Map<String, Value>,
        path: &str,
        key: &str,
    ) -> Option<Option<String>> {
        match map.get(key) {
            None | Some(Value::Null) => Some(None),
            Some(v) => self.string(v, &child(path, key)).map(Some),
        }
    }
}
