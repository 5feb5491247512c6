//! Structured-output schemas.
//!
//! The service is told the exact JSON shape to return. Schemas serialize to
//! the OpenAPI subset the generateContent endpoint accepts, with upper-case
//! type names:
//!
//! ```
//! use riyada_ai::schema::ResponseSchema;
//!
//! let schema = ResponseSchema::object([
//!     ("refined", ResponseSchema::string()),
//!     ("advice", ResponseSchema::string()),
//! ]);
//!
//! let json = schema.to_value();
//! assert_eq!(json["type"], "OBJECT");
//! assert_eq!(json["properties"]["refined"]["type"], "STRING");
//! ```

use serde::{Serialize, Serializer};
use serde_json::{Map, Value, json};

#[derive(Debug, Clone, PartialEq)]
pub enum ResponseSchema {
    String { allowed: Vec<&'static str> },
    Number,
    Integer,
    Boolean,
    Array(Box<ResponseSchema>),
    Object {
        properties: Vec<(&'static str, ResponseSchema)>,
        required: Vec<&'static str>,
    },
}

impl ResponseSchema {
    pub fn string() -> Self {
        Self::String {
            allowed: Vec::new(),
        }
    }

    pub fn string_enum(allowed: &[&'static str]) -> Self {
        Self::String {
            allowed: allowed.to_vec(),
        }
    }

    pub fn number() -> Self {
        Self::Number
    }

    pub fn integer() -> Self {
        Self::Integer
    }

    pub fn array(items: ResponseSchema) -> Self {
        Self::Array(Box::new(items))
    }

    /// An object whose properties are all optional.
    pub fn object<I>(properties: I) -> Self
    where
        I: IntoIterator<Item = (&'static str, ResponseSchema)>,
    {
        Self::Object {
            properties: properties.into_iter().collect(),
            required: Vec::new(),
        }
    }

    /// An object of plain string properties.
    pub fn strings(keys: &[&'static str]) -> Self {
        Self::object(keys.iter().map(|k| (*k, Self::string())))
    }

    /// Marks properties as required. Only meaningful on objects.
    pub fn require(
        mut self,
        keys: &[&'static str],
    ) -> Self {
        if let Self::Object { required, .. } = &mut self {
            required.extend_from_slice(keys);
        }
        self
    }

    pub fn to_value(&self) -> Value {
        match self {
            Self::String { allowed } if allowed.is_empty() => json!({ "type": "STRING" }),
            Self::String { allowed } => json!({ "type": "STRING", "enum": allowed }),
            Self::Number => json!({ "type": "NUMBER" }),
            Self::Integer => json!({ "type": "INTEGER" }),
            Self::Boolean => json!({ "type": "BOOLEAN" }),
            Self::Array(items) => json!({ "type": "ARRAY", "items": items.to_value() }),
            Self::Object {
                properties,
                required,
            } => {
                let props: Map<String, Value> = properties
                    .iter()
                    .map(|(name, schema)| ((*name).to_string(), schema.to_value()))
                    .collect();
                let mut object = json!({ "type": "OBJECT", "properties": props });
                if !required.is_empty() {
                    object["required"] = json!(required);
                }
                object
            }
        }
    }
}

impl Serialize for ResponseSchema {
    fn serialize<S>(
        &self,
        serializer: S,
    ) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.to_value().serialize(serializer)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn array_of_objects_with_enum() {
        let schema = ResponseSchema::array(ResponseSchema::object([
            ("id", ResponseSchema::integer()),
            ("type", ResponseSchema::string_enum(&["mcq", "tf"])),
        ]));

        assert_eq!(
            schema.to_value(),
            json!({
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "id": { "type": "INTEGER" },
                        "type": { "type": "STRING", "enum": ["mcq", "tf"] }
                    }
                }
            })
        );
    }

    #[test]
    fn required_keys_are_emitted() {
        let schema = ResponseSchema::strings(&["a", "b"]).require(&["a"]);

        assert_eq!(schema.to_value()["required"], json!(["a"]));
    }

    #[test]
    fn required_is_omitted_when_empty() {
        let schema = ResponseSchema::strings(&["a"]);

        assert!(schema.to_value().get("required").is_none());
    }
}
