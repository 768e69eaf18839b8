//! Mail handler identity, parameter model and validation.
//!
//! A handler is a named operation allowed to trigger templated mail. It
//! declares the parameters it supplies; every generation request is checked
//! against that declaration before any template is rendered.
//!
//! - `parameter`: typed template parameters and declared schemas
//! - `context`: call chains and handler resolution
//! - `validation`: declared/supplied parameter contract
//! - `registry`: startup-time handler registry issuing handler tokens

mod context;
mod error;
mod parameter;
mod registry;
mod validation;

pub use context::{CallChain, CallFrame, EmailHandler, HandlerMarker, StackInformation};
pub use error::{HandlerError, HandlerResult, ParameterViolation};
pub use parameter::{DeclaredParameter, ParameterType, TemplateParameter};
pub use registry::{HandlerRegistry, HandlerToken, RegistryError};
