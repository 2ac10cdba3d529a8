//! Declarative tool argument specs.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// JSON Schema primitive type of a tool argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArgType {
    /// UTF-8 string.
    String,
    /// Any JSON number.
    Number,
    /// A number without a fractional part.
    Integer,
    /// `true` or `false`.
    Boolean,
}

impl ArgType {
    /// Returns the JSON Schema type name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Number => "number",
            Self::Integer => "integer",
            Self::Boolean => "boolean",
        }
    }
}

impl fmt::Display for ArgType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Extra format constraint on a string argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StringFormat {
    /// Absolute `http`/`https` URL.
    Url,
}

/// MCP argument definition for a tool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolArgument {
    /// Argument name.
    pub name: String,
    /// JSON Schema type.
    #[serde(rename = "type")]
    pub arg_type: ArgType,
    /// Human-readable description.
    pub description: String,
    /// Whether this argument is required.
    #[serde(default)]
    pub required: bool,
    /// Value used when the argument is omitted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    /// Allowed values for string arguments (empty = unrestricted).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub choices: Vec<String>,
    /// Inclusive lower bound for numeric arguments.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minimum: Option<f64>,
    /// Inclusive upper bound for numeric arguments.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maximum: Option<f64>,
    /// String format constraint.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<StringFormat>,
}

impl ToolArgument {
    /// Creates an optional argument of the given type.
    pub fn new(name: impl Into<String>, arg_type: ArgType, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            arg_type,
            description: description.into(),
            required: false,
            default: None,
            choices: Vec::new(),
            minimum: None,
            maximum: None,
            format: None,
        }
    }

    /// Shorthand for an optional string argument.
    pub fn string(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(name, ArgType::String, description)
    }

    /// Shorthand for an optional number argument.
    pub fn number(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(name, ArgType::Number, description)
    }

    /// Marks the argument as required.
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Sets the value used when the argument is omitted.
    pub fn with_default(mut self, default: impl Into<Value>) -> Self {
        self.default = Some(default.into());
        self
    }

    /// Restricts a string argument to a fixed set of values.
    pub fn one_of(mut self, choices: &[&str]) -> Self {
        self.choices = choices.iter().map(|c| (*c).to_string()).collect();
        self
    }

    /// Sets inclusive numeric bounds.
    pub fn range(mut self, minimum: Option<f64>, maximum: Option<f64>) -> Self {
        self.minimum = minimum;
        self.maximum = maximum;
        self
    }

    /// Requires a string argument to be an absolute URL.
    pub fn url(mut self) -> Self {
        self.format = Some(StringFormat::Url);
        self
    }
}
