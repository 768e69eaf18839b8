//! Template parameter model

use std::fmt;

use serde::{Deserialize, Serialize};

/// Type descriptor carried by every template parameter
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParameterType {
    String,
    Integer,
    Float,
    Boolean,
    DateTime,
    List,
    Object,
    /// Application-defined type, identified by name
    Custom(String),
}

impl ParameterType {
    /// Infer the descriptor of a concrete value.
    ///
    /// Returns `None` for `null`, which carries no type information.
    pub fn of(value: &serde_json::Value) -> Option<Self> {
        match value {
            serde_json::Value::Null => None,
            serde_json::Value::Bool(_) => Some(Self::Boolean),
            serde_json::Value::Number(n) if n.is_f64() => Some(Self::Float),
            serde_json::Value::Number(_) => Some(Self::Integer),
            serde_json::Value::String(_) => Some(Self::String),
            serde_json::Value::Array(_) => Some(Self::List),
            serde_json::Value::Object(_) => Some(Self::Object),
        }
    }
}

impl fmt::Display for ParameterType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String => write!(f, "string"),
            Self::Integer => write!(f, "integer"),
            Self::Float => write!(f, "float"),
            Self::Boolean => write!(f, "boolean"),
            Self::DateTime => write!(f, "datetime"),
            Self::List => write!(f, "list"),
            Self::Object => write!(f, "object"),
            Self::Custom(name) => write!(f, "{}", name),
        }
    }
}

/// A named, typed value bound into template fields
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateParameter {
    #[serde(rename = "type")]
    pub ty: ParameterType,
    pub name: String,
    pub value: serde_json::Value,
}

impl TemplateParameter {
    pub fn new(ty: ParameterType, name: impl Into<String>, value: serde_json::Value) -> Self {
        Self {
            ty,
            name: name.into(),
            value,
        }
    }

    /// Build a parameter whose type is taken from its value.
    ///
    /// Returns `None` when the value is `null`.
    pub fn infer(name: impl Into<String>, value: serde_json::Value) -> Option<Self> {
        let ty = ParameterType::of(&value)?;
        Some(Self::new(ty, name, value))
    }
}

/// One entry of a handler's declared parameter schema
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeclaredParameter {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: ParameterType,
}

impl DeclaredParameter {
    pub fn new(name: impl Into<String>, ty: ParameterType) -> Self {
        Self {
            name: name.into(),
            ty,
        }
    }
}
