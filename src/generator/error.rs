use thiserror::Error;

use crate::delivery::DeliveryError;
use crate::handler::HandlerError;
use crate::template::{RenderError, TemplateError};

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Unknown handler: {0}")]
    UnknownHandler(String),

    #[error(transparent)]
    Handler(#[from] HandlerError),

    #[error("Template store error: {0}")]
    Store(#[from] TemplateError),

    #[error("Render failed: {0}")]
    Render(#[from] RenderError),

    #[error("Delivery failed: {0}")]
    Delivery(#[from] DeliveryError),
}

impl GenerationError {
    /// Stable label for metrics and API error codes
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidArgument(_) => "invalid_argument",
            Self::UnknownHandler(_) => "unknown_handler",
            Self::Handler(HandlerError::MissingHandlerContext(_)) => "missing_handler_context",
            Self::Handler(HandlerError::CapabilityMismatch { .. }) => "capability_mismatch",
            Self::Handler(HandlerError::ParameterContractViolation { .. }) => {
                "parameter_contract_violation"
            }
            Self::Handler(HandlerError::UnresolvableParameterType(_)) => {
                "unresolvable_parameter_type"
            }
            Self::Store(_) => "store",
            Self::Render(_) => "render",
            Self::Delivery(_) => "delivery",
        }
    }
}

pub type GenerationResult<T> = Result<T, GenerationError>;
