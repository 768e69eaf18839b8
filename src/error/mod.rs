use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::generator::GenerationError;
use crate::handler::RegistryError;
use crate::template::TemplateError;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Handler registry error: {0}")]
    Registry(#[from] RegistryError),

    #[error(transparent)]
    Template(#[from] TemplateError),

    #[error(transparent)]
    Generation(#[from] GenerationError),
}

#[derive(Serialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Serialize)]
struct ErrorBody {
    code: String,
    message: String,
}

/// Check if running in production mode (based on RUN_MODE env var)
fn is_production() -> bool {
    std::env::var("RUN_MODE")
        .map(|m| m == "production" || m == "prod")
        .unwrap_or(false)
}

/// Hide backend details from clients in production
fn redacted(log_msg: &str, public: &str) -> String {
    if is_production() {
        public.to_string()
    } else {
        log_msg.to_string()
    }
}

impl AppError {
    fn parts(&self) -> (StatusCode, String, String) {
        let message = self.to_string();
        match self {
            AppError::Config(_) | AppError::Registry(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "CONFIG_ERROR".to_string(),
                redacted(&message, "Configuration error"),
            ),
            AppError::Template(e) => {
                let (status, code) = match e {
                    TemplateError::NotFound(_) => (StatusCode::NOT_FOUND, "TEMPLATE_NOT_FOUND"),
                    TemplateError::AlreadyExists(_) => (StatusCode::CONFLICT, "TEMPLATE_EXISTS"),
                    TemplateError::InvalidTemplate(_) => {
                        (StatusCode::BAD_REQUEST, "INVALID_TEMPLATE")
                    }
                    TemplateError::Unavailable(_) => {
                        (StatusCode::SERVICE_UNAVAILABLE, "STORE_UNAVAILABLE")
                    }
                };
                (status, code.to_string(), message)
            }
            AppError::Generation(e) => {
                let status = match e {
                    GenerationError::InvalidArgument(_) => StatusCode::BAD_REQUEST,
                    GenerationError::UnknownHandler(_) => StatusCode::NOT_FOUND,
                    GenerationError::Handler(_) | GenerationError::Render(_) => {
                        StatusCode::UNPROCESSABLE_ENTITY
                    }
                    GenerationError::Store(_) | GenerationError::Delivery(_) => {
                        StatusCode::SERVICE_UNAVAILABLE
                    }
                };
                let message = if status == StatusCode::SERVICE_UNAVAILABLE {
                    redacted(&message, "Service temporarily unavailable")
                } else {
                    message
                };
                (status, e.kind().to_uppercase(), message)
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, client_message) = self.parts();

        // Always log the detailed error server-side
        tracing::error!(
            code = %code,
            status = %status.as_u16(),
            message = %self,
            "API error"
        );

        let body = ErrorResponse {
            error: ErrorBody {
                code,
                message: client_message,
            },
        };

        (status, Json(body)).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handler::{HandlerError, ParameterViolation};

    #[test]
    fn test_contract_violation_maps_to_unprocessable() {
        let err = AppError::from(GenerationError::from(
            HandlerError::ParameterContractViolation {
                handler: "Welcome".to_string(),
                violations: vec![ParameterViolation::Unexpected("age".to_string())],
            },
        ));

        let (status, code, message) = err.parts();
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(code, "PARAMETER_CONTRACT_VIOLATION");
        assert!(message.contains("age"));
    }

    #[test]
    fn test_template_not_found_maps_to_404() {
        let (status, code, _) = AppError::from(TemplateError::NotFound(3)).parts();
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(code, "TEMPLATE_NOT_FOUND");
    }
}
