use serde_json::{Map, Value, json};

use crate::core::error::{EngineError, EngineResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    String,
    Number,
    Object,
    Enum(&'static [&'static str]),
}

impl FieldKind {
    fn schema(&self) -> Value {
        match self {
            FieldKind::String => json!({ "type": "string" }),
            FieldKind::Number => json!({ "type": "number" }),
            FieldKind::Object => json!({ "type": "object" }),
            FieldKind::Enum(values) => json!({ "type": "string", "enum": values }),
        }
    }

    fn accepts(&self, value: &Value) -> bool {
        match self {
            FieldKind::String => value.is_string(),
            FieldKind::Number => value.is_number(),
            FieldKind::Object => value.is_object(),
            FieldKind::Enum(values) => value.as_str().is_some_and(|s| values.contains(&s)),
        }
    }

    fn describe(&self) -> String {
        match self {
            FieldKind::String => "a string".to_string(),
            FieldKind::Number => "a number".to_string(),
            FieldKind::Object => "an object".to_string(),
            FieldKind::Enum(values) => format!("one of [{}]", values.join(", ")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub kind: FieldKind,
    pub required: bool,
}

/// Declared input shape of a tool. Serialized for discovery as a small
/// JSON-schema object and enforced before a call is dispatched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputContract {
    fields: Vec<FieldSpec>,
}

impl InputContract {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn optional(mut self, name: &'static str, kind: FieldKind) -> Self {
        self.fields.push(FieldSpec {
            name,
            kind,
            required: false,
        });
        self
    }

    pub fn required(mut self, name: &'static str, kind: FieldKind) -> Self {
        self.fields.push(FieldSpec {
            name,
            kind,
            required: true,
        });
        self
    }

    pub fn to_schema(&self) -> Value {
        let mut properties = Map::new();
        for field in &self.fields {
            properties.insert(field.name.to_string(), field.kind.schema());
        }
        let mut schema = json!({ "type": "object", "properties": properties });
        let required: Vec<&str> = self
            .fields
            .iter()
            .filter(|f| f.required)
            .map(|f| f.name)
            .collect();
        if !required.is_empty() {
            schema["required"] = json!(required);
        }
        schema
    }

    /// Check `input` against the contract. A null body counts as an empty
    /// object; null fields count as absent.
    pub fn validate(&self, input: &Value) -> EngineResult<()> {
        let empty = Map::new();
        let object = match input {
            Value::Null => &empty,
            Value::Object(map) => map,
            _ => {
                return Err(EngineError::Validation(
                    "Tool input must be a JSON object".to_string(),
                ));
            }
        };

        for field in &self.fields {
            match object.get(field.name) {
                None | Some(Value::Null) => {
                    if field.required {
                        return Err(EngineError::Validation(format!(
                            "Missing required field '{}'",
                            field.name
                        )));
                    }
                }
                Some(value) if !field.kind.accepts(value) => {
                    return Err(EngineError::Validation(format!(
                        "Field '{}' must be {}",
                        field.name,
                        field.kind.describe()
                    )));
                }
                Some(_) => {}
            }
        }
        Ok(())
    }
}
