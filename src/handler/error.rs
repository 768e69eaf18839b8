//! Handler resolution and validation errors

use std::fmt;

use thiserror::Error;

/// A single mismatch between declared and supplied parameters
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParameterViolation {
    /// Declared by the handler but not supplied
    Missing(String),
    /// Supplied but not declared by the handler
    Unexpected(String),
}

impl ParameterViolation {
    pub fn name(&self) -> &str {
        match self {
            Self::Missing(name) | Self::Unexpected(name) => name,
        }
    }
}

impl fmt::Display for ParameterViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missing(name) => write!(f, "{} must be passed into template generation", name),
            Self::Unexpected(name) => write!(
                f,
                "{} passed into template generation, but does not appear in the handler parameters",
                name
            ),
        }
    }
}

#[derive(Debug, Error)]
pub enum HandlerError {
    #[error("No handler marker found for {0}")]
    MissingHandlerContext(String),

    #[error("{type_name} must implement EmailHandler to generate templated mail")]
    CapabilityMismatch { type_name: String },

    #[error("Parameter contract violated for {handler}: {}", join_violations(.violations))]
    ParameterContractViolation {
        handler: String,
        violations: Vec<ParameterViolation>,
    },

    #[error(
        "Template parameter {0} is null and no declared handler parameter has that name to infer its type"
    )]
    UnresolvableParameterType(String),
}

pub type HandlerResult<T> = Result<T, HandlerError>;

fn join_violations(violations: &[ParameterViolation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contract_violation_lists_every_parameter() {
        let err = HandlerError::ParameterContractViolation {
            handler: "Welcome".to_string(),
            violations: vec![
                ParameterViolation::Missing("name".to_string()),
                ParameterViolation::Unexpected("age".to_string()),
            ],
        };

        let message = err.to_string();
        assert!(message.contains("Welcome"));
        assert!(message.contains("name must be passed"));
        assert!(message.contains("age passed into template generation"));
    }
}
