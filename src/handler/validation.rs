//! Parameter contract validation between a handler and its request

use super::context::StackInformation;
use super::error::{HandlerError, HandlerResult, ParameterViolation};
use super::parameter::TemplateParameter;

impl StackInformation {
    /// Check that the supplied parameters match the calling handler's
    /// declared parameters exactly, by name and regardless of order.
    pub fn validate_parameters(&self, parameters: &[TemplateParameter]) -> HandlerResult<()> {
        let frame = match (&self.handler, &self.calling_frame) {
            (Some(_), Some(frame)) => frame,
            _ => {
                return Err(HandlerError::MissingHandlerContext(
                    self.handler_name.clone(),
                ))
            }
        };

        if !frame.implements_handler {
            return Err(HandlerError::CapabilityMismatch {
                type_name: frame.declaring_type.clone(),
            });
        }

        let missing = frame
            .parameters
            .iter()
            .filter(|declared| !parameters.iter().any(|p| p.name == declared.name))
            .map(|declared| ParameterViolation::Missing(declared.name.clone()));

        let unexpected = parameters
            .iter()
            .filter(|p| !frame.parameters.iter().any(|declared| declared.name == p.name))
            .map(|p| ParameterViolation::Unexpected(p.name.clone()));

        let violations: Vec<_> = missing.chain(unexpected).collect();

        if violations.is_empty() {
            Ok(())
        } else {
            Err(HandlerError::ParameterContractViolation {
                handler: self.handler_name.clone(),
                violations,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::handler::context::{CallChain, CallFrame, EmailHandler};
    use crate::handler::parameter::ParameterType;

    struct OrderMailer;

    impl EmailHandler for OrderMailer {
        const TYPE_NAME: &'static str = "OrderMailer";
    }

    fn shipped_info() -> StackInformation {
        let frame = CallFrame::for_handler::<OrderMailer>("shipped")
            .parameter("order_id", ParameterType::String)
            .parameter("carrier", ParameterType::String)
            .marked_as("OrderShipped");
        StackInformation::resolve(&CallChain::from(frame), None).unwrap()
    }

    fn param(name: &str) -> TemplateParameter {
        TemplateParameter::new(ParameterType::String, name, json!("x"))
    }

    #[test]
    fn test_exact_match_in_any_order_passes() {
        let info = shipped_info();
        assert!(info
            .validate_parameters(&[param("carrier"), param("order_id")])
            .is_ok());
    }

    #[test]
    fn test_missing_and_unexpected_are_reported_together() {
        let info = shipped_info();
        let err = info
            .validate_parameters(&[param("order_id"), param("tracking")])
            .unwrap_err();

        match err {
            HandlerError::ParameterContractViolation { handler, violations } => {
                assert_eq!(handler, "OrderShipped");
                assert_eq!(
                    violations,
                    vec![
                        ParameterViolation::Missing("carrier".to_string()),
                        ParameterViolation::Unexpected("tracking".to_string()),
                    ]
                );
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_unmarked_caller_is_rejected() {
        let chain = CallChain::from(CallFrame::new("Jobs", "nightly"));
        let info = StackInformation::resolve(&chain, None).unwrap();

        assert!(matches!(
            info.validate_parameters(&[]),
            Err(HandlerError::MissingHandlerContext(_))
        ));
    }

    #[test]
    fn test_marked_frame_without_capability_is_rejected() {
        let frame = CallFrame::new("Controller", "signup").marked();
        let info = StackInformation::resolve(&CallChain::from(frame), None).unwrap();

        match info.validate_parameters(&[]) {
            Err(HandlerError::CapabilityMismatch { type_name }) => {
                assert_eq!(type_name, "Controller")
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }
}
