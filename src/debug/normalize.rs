use crate::debug::{DebugResult, DocumentationEntry};
use serde_json::Value;
use std::fmt;

/// A field that was present in the service response but had the wrong shape.
/// Absent fields are not issues.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldIssue {
    pub field: String,
    pub expected: &'static str,
    pub found: &'static str,
}

impl fmt::Display for FieldIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "field `{}` expected {}, found {}",
            self.field, self.expected, self.found
        )
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NormalizedResponse {
    pub result: DebugResult,
    pub issues: Vec<FieldIssue>,
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

struct Reader<'a> {
    raw: &'a Value,
    issues: Vec<FieldIssue>,
}

impl<'a> Reader<'a> {
    fn field(&self, name: &str) -> Option<&'a Value> {
        self.raw.get(name)
    }

    fn report(&mut self, field: impl Into<String>, expected: &'static str, found: &Value) {
        self.issues.push(FieldIssue {
            field: field.into(),
            expected,
            found: kind_of(found),
        });
    }

    fn string(&mut self, name: &str) -> Option<String> {
        match self.field(name)? {
            Value::String(text) => Some(text.clone()),
            other => {
                self.report(name, "string", other);
                None
            }
        }
    }

    fn boolean(&mut self, name: &str) -> Option<bool> {
        match self.field(name)? {
            Value::Bool(flag) => Some(*flag),
            other => {
                self.report(name, "boolean", other);
                None
            }
        }
    }

    fn documents(&mut self) -> Vec<DocumentationEntry> {
        let Some(value) = self.field("retrieved_documents") else {
            return Vec::new();
        };
        let Value::Array(items) = value else {
            self.report("retrieved_documents", "array", value);
            return Vec::new();
        };

        let mut entries = Vec::with_capacity(items.len());
        for (index, item) in items.iter().enumerate() {
            let content = match item {
                Value::String(url) => url.clone(),
                other => {
                    self.report(format!("retrieved_documents[{index}]"), "string", other);
                    other.to_string()
                }
            };
            entries.push(DocumentationEntry {
                title: format!("Documentation Link {}", index + 1),
                content,
            });
        }
        entries
    }

    fn string_list(&mut self, name: &str) -> Option<Vec<String>> {
        let value = self.field(name)?;
        let Value::Array(items) = value else {
            self.report(name, "array", value);
            return None;
        };

        let mut out = Vec::with_capacity(items.len());
        for (index, item) in items.iter().enumerate() {
            match item {
                Value::String(text) => out.push(text.clone()),
                other => self.report(format!("{name}[{index}]"), "string", other),
            }
        }
        Some(out)
    }
}

/// Maps a `submit_documents` payload onto [`DebugResult`].
///
/// Never fails: wrong-typed fields fall back to empty values and are listed
/// in [`NormalizedResponse::issues`]. `requires_documentation` is derived
/// from whether any document links came back, never read from the payload.
pub fn normalize_debug_response(raw: &Value) -> NormalizedResponse {
    let mut reader = Reader {
        raw,
        issues: Vec::new(),
    };

    if !raw.is_object() {
        reader.report("<root>", "object", raw);
    }

    let documentation_results = reader.documents();
    let search_phrase = Some(reader.string("search_phrase").unwrap_or_default());
    let raw_updated_response = reader.string("updated_response");
    let alternative_solutions = reader.string_list("alternative_solutions");
    let documentation_was_useful = reader.boolean("documentation_was_useful");

    let result = DebugResult {
        requires_documentation: !documentation_results.is_empty(),
        search_phrase,
        documentation_results,
        explanation: String::new(),
        fixed_code: String::new(),
        alternative_solutions,
        documentation_was_useful,
        raw_updated_response,
    };

    NormalizedResponse {
        result,
        issues: reader.issues,
    }
}
