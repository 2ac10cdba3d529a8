//! Declarative input schemas for MCP tools.
//!
//! A tool declares its arguments as a list of [`ToolArgument`]s. The same
//! declaration renders the JSON Schema advertised by `tools/list` and
//! validates the raw `arguments` of a `tools/call` before the handler runs.

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use thiserror::Error;

use toolbox_types::{ArgType, StringFormat, ToolArgument};

/// Schema validation errors.
#[derive(Debug, Error, PartialEq)]
pub enum SchemaError {
    /// The arguments payload is not a JSON object.
    #[error("arguments must be an object")]
    NotAnObject,
    /// A required argument is absent.
    #[error("missing required field: {field}")]
    MissingField { field: String },
    /// An argument has the wrong JSON type.
    #[error("field '{field}' must be of type {expected}")]
    WrongType { field: String, expected: ArgType },
    /// A string argument is not one of the allowed values.
    #[error("field '{field}' must be one of: {allowed}")]
    NotAllowed { field: String, allowed: String },
    /// A numeric argument is outside its bounds.
    #[error("field '{field}' must be {bound}")]
    OutOfRange { field: String, bound: String },
    /// A string argument does not match its declared format.
    #[error("field '{field}' must be a valid {format}")]
    BadFormat { field: String, format: &'static str },
}

/// The declared argument list of a tool.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InputSchema {
    arguments: Vec<ToolArgument>,
}

impl InputSchema {
    /// Creates a schema from argument declarations.
    pub fn new(arguments: Vec<ToolArgument>) -> Self {
        Self { arguments }
    }

    /// A schema accepting no arguments.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Returns the declared arguments.
    pub fn arguments(&self) -> &[ToolArgument] {
        &self.arguments
    }

    /// Renders the schema as a JSON Schema `object` for `tools/list`.
    pub fn to_json_schema(&self) -> Value {
        let mut properties = Map::new();
        let mut required = Vec::new();

        for arg in &self.arguments {
            let mut prop = Map::new();
            prop.insert("type".to_string(), Value::String(arg.arg_type.to_string()));
            prop.insert(
                "description".to_string(),
                Value::String(arg.description.clone()),
            );
            if !arg.choices.is_empty() {
                let choices = arg.choices.iter().cloned().map(Value::String).collect();
                prop.insert("enum".to_string(), Value::Array(choices));
            }
            if let Some(default) = &arg.default {
                prop.insert("default".to_string(), default.clone());
            }
            if let Some(min) = arg.minimum {
                prop.insert("minimum".to_string(), Value::from(min));
            }
            if let Some(max) = arg.maximum {
                prop.insert("maximum".to_string(), Value::from(max));
            }
            if let Some(StringFormat::Url) = arg.format {
                prop.insert("format".to_string(), Value::String("uri".to_string()));
            }
            properties.insert(arg.name.clone(), Value::Object(prop));
            if arg.required {
                required.push(Value::String(arg.name.clone()));
            }
        }

        let mut schema = Map::new();
        schema.insert("type".to_string(), Value::String("object".to_string()));
        schema.insert("properties".to_string(), Value::Object(properties));
        if !required.is_empty() {
            schema.insert("required".to_string(), Value::Array(required));
        }

        Value::Object(schema)
    }

    /// Validates raw arguments and applies defaults.
    ///
    /// `null` is treated as an empty object. Undeclared keys are dropped.
    ///
    /// # Errors
    ///
    /// Returns the first violated constraint.
    pub fn validate(&self, input: &Value) -> Result<ValidatedArgs, SchemaError> {
        let empty = Map::new();
        let input_obj = match input {
            Value::Null => &empty,
            Value::Object(obj) => obj,
            _ => return Err(SchemaError::NotAnObject),
        };

        let mut validated = Map::new();
        for arg in &self.arguments {
            let value = match input_obj.get(&arg.name) {
                Some(v) if !v.is_null() => v,
                _ => {
                    if let Some(default) = &arg.default {
                        validated.insert(arg.name.clone(), default.clone());
                    } else if arg.required {
                        return Err(SchemaError::MissingField {
                            field: arg.name.clone(),
                        });
                    }
                    continue;
                }
            };
            check_argument(arg, value)?;
            validated.insert(arg.name.clone(), normalize(arg, value));
        }

        Ok(ValidatedArgs(validated))
    }
}

fn check_argument(arg: &ToolArgument, value: &Value) -> Result<(), SchemaError> {
    let type_ok = match arg.arg_type {
        ArgType::String => value.is_string(),
        ArgType::Number => value.is_number(),
        ArgType::Integer => {
            value.is_i64() || value.is_u64() || value.as_f64().is_some_and(|f| f.fract() == 0.0)
        }
        ArgType::Boolean => value.is_boolean(),
    };
    if !type_ok {
        return Err(SchemaError::WrongType {
            field: arg.name.clone(),
            expected: arg.arg_type,
        });
    }

    if let Some(s) = value.as_str() {
        if !arg.choices.is_empty() && !arg.choices.iter().any(|c| c == s) {
            return Err(SchemaError::NotAllowed {
                field: arg.name.clone(),
                allowed: arg.choices.join(", "),
            });
        }
        if let Some(StringFormat::Url) = arg.format {
            if !is_http_url(s) {
                return Err(SchemaError::BadFormat {
                    field: arg.name.clone(),
                    format: "URL",
                });
            }
        }
    }

    if let Some(n) = value.as_f64() {
        if let Some(min) = arg.minimum {
            if n < min {
                return Err(SchemaError::OutOfRange {
                    field: arg.name.clone(),
                    bound: format!(">= {min}"),
                });
            }
        }
        if let Some(max) = arg.maximum {
            if n > max {
                return Err(SchemaError::OutOfRange {
                    field: arg.name.clone(),
                    bound: format!("<= {max}"),
                });
            }
        }
    }

    Ok(())
}

/// Integer arguments sent as whole floats (`8.0`) are stored as integers.
fn normalize(arg: &ToolArgument, value: &Value) -> Value {
    if arg.arg_type != ArgType::Integer || value.is_i64() || value.is_u64() {
        return value.clone();
    }
    match value.as_f64() {
        Some(f) if f >= i64::MIN as f64 && f < i64::MAX as f64 => Value::from(f as i64),
        _ => value.clone(),
    }
}

fn is_http_url(s: &str) -> bool {
    url::Url::parse(s)
        .map(|u| matches!(u.scheme(), "http" | "https") && u.has_host())
        .unwrap_or(false)
}

/// Arguments that passed schema validation, with defaults applied.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidatedArgs(Map<String, Value>);

impl ValidatedArgs {
    /// Returns the raw value of an argument.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    /// Returns a string argument.
    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.0.get(name).and_then(Value::as_str)
    }

    /// Returns a numeric argument.
    pub fn get_f64(&self, name: &str) -> Option<f64> {
        self.0.get(name).and_then(Value::as_f64)
    }

    /// Deserializes the arguments into a typed struct.
    ///
    /// # Errors
    ///
    /// Returns the serde error if the struct does not match.
    pub fn parse<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_value(Value::Object(self.0.clone()))
    }

    /// Returns the arguments as a JSON object.
    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn encoder_schema() -> InputSchema {
        InputSchema::new(vec![
            ToolArgument::string("text", "The string to encode.").required(),
            ToolArgument::string("format", "The encoding format to use.")
                .one_of(&["base64", "url"])
                .required(),
        ])
    }

    #[test]
    fn json_schema_lists_required_and_enum() {
        let schema = encoder_schema().to_json_schema();
        assert_eq!(schema["type"], "object");
        assert_eq!(schema["properties"]["text"]["type"], "string");
        assert_eq!(schema["properties"]["format"]["enum"], json!(["base64", "url"]));
        assert_eq!(schema["required"], json!(["text", "format"]));
    }

    #[test]
    fn empty_schema_has_no_required_key() {
        let schema = InputSchema::empty().to_json_schema();
        assert!(schema["properties"].as_object().expect("obj").is_empty());
        assert!(schema.get("required").is_none());
    }

    #[test]
    fn valid_input_passes() {
        let args = encoder_schema()
            .validate(&json!({"text": "hi", "format": "url"}))
            .expect("valid");
        assert_eq!(args.get_str("text"), Some("hi"));
    }

    #[test]
    fn missing_required_field_rejected() {
        let err = encoder_schema()
            .validate(&json!({"format": "url"}))
            .expect_err("invalid");
        assert_eq!(
            err,
            SchemaError::MissingField {
                field: "text".into()
            }
        );
        assert_eq!(err.to_string(), "missing required field: text");
    }

    #[test]
    fn wrong_type_rejected() {
        let err = encoder_schema()
            .validate(&json!({"text": 5, "format": "url"}))
            .expect_err("invalid");
        assert_eq!(err.to_string(), "field 'text' must be of type string");
    }

    #[test]
    fn value_outside_enum_rejected() {
        let err = encoder_schema()
            .validate(&json!({"text": "x", "format": "rot13"}))
            .expect_err("invalid");
        assert_eq!(err.to_string(), "field 'format' must be one of: base64, url");
    }

    #[test]
    fn defaults_are_applied() {
        let schema = InputSchema::new(vec![
            ToolArgument::string("type", "kind").with_default("uuid"),
            ToolArgument::number("length", "len").with_default(16),
        ]);
        let args = schema.validate(&Value::Null).expect("valid");
        assert_eq!(args.get_str("type"), Some("uuid"));
        assert_eq!(args.get_f64("length"), Some(16.0));
    }

    #[test]
    fn explicit_null_falls_back_to_default() {
        let schema =
            InputSchema::new(vec![ToolArgument::string("timezone", "tz").with_default("UTC")]);
        let args = schema.validate(&json!({"timezone": null})).expect("valid");
        assert_eq!(args.get_str("timezone"), Some("UTC"));
    }

    #[test]
    fn non_object_rejected() {
        let err = encoder_schema().validate(&json!(42)).expect_err("invalid");
        assert_eq!(err, SchemaError::NotAnObject);
    }

    #[test]
    fn undeclared_keys_are_dropped() {
        let schema = InputSchema::new(vec![ToolArgument::string("text", "t").required()]);
        let args = schema
            .validate(&json!({"text": "a", "extra": true}))
            .expect("valid");
        assert!(args.get("extra").is_none());
    }

    #[test]
    fn whole_floats_become_integers() {
        let schema = InputSchema::new(vec![
            ToolArgument::new("count", ArgType::Integer, "c"),
            ToolArgument::number("ratio", "r"),
        ]);
        let args = schema
            .validate(&json!({"count": 8.0, "ratio": 2.0}))
            .expect("valid");
        assert_eq!(args.get("count"), Some(&json!(8)));
        assert!(args.get("count").is_some_and(Value::is_i64));
        assert_eq!(args.get("ratio"), Some(&json!(2.0)));
    }

    #[test]
    fn numeric_bounds_enforced() {
        let schema = InputSchema::new(vec![
            ToolArgument::number("length", "len").range(Some(1.0), Some(1024.0))
        ]);
        assert!(schema.validate(&json!({"length": 0})).is_err());
        assert!(schema.validate(&json!({"length": 2048})).is_err());
        assert!(schema.validate(&json!({"length": 32})).is_ok());
    }

    #[test]
    fn integer_type_rejects_fractions() {
        let schema = InputSchema::new(vec![ToolArgument::new(
            "n",
            ArgType::Integer,
            "count",
        )]);
        assert!(schema.validate(&json!({"n": 3})).is_ok());
        assert!(schema.validate(&json!({"n": 3.5})).is_err());
    }

    #[test]
    fn url_format_enforced() {
        let schema = InputSchema::new(vec![ToolArgument::string("url", "u").url().required()]);
        assert!(schema.validate(&json!({"url": "https://example.com"})).is_ok());
        let err = schema
            .validate(&json!({"url": "example.com"}))
            .expect_err("invalid");
        assert_eq!(err.to_string(), "field 'url' must be a valid URL");
        assert!(schema.validate(&json!({"url": "ftp://example.com"})).is_err());
    }

    #[test]
    fn parse_into_typed_struct() {
        #[derive(serde::Deserialize)]
        struct Args {
            text: String,
        }
        let schema = InputSchema::new(vec![ToolArgument::string("text", "t").required()]);
        let args = schema.validate(&json!({"text": "hello"})).expect("valid");
        let typed: Args = args.parse().expect("parse");
        assert_eq!(typed.text, "hello");
    }
}
