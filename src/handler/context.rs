//! Caller context and handler resolution
//!
//! A generation request carries an explicit [`CallChain`] describing the
//! handler methods it passed through, innermost first. Resolution walks that
//! chain outward until it finds a frame carrying a [`HandlerMarker`].

use serde::{Deserialize, Serialize};

use super::error::{HandlerError, HandlerResult};
use super::parameter::{DeclaredParameter, ParameterType};

/// Capability a declaring type must expose to generate templated mail
pub trait EmailHandler {
    /// Name used when synthesizing `<Type>.<method>` handler names
    const TYPE_NAME: &'static str;
}

/// Marks a frame as a mail handler, optionally naming it
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HandlerMarker {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub handler_name: Option<String>,
}

impl HandlerMarker {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            handler_name: Some(name.into()),
        }
    }
}

/// One method on the call chain leading to a generation request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallFrame {
    pub declaring_type: String,
    pub method: String,
    #[serde(default)]
    pub parameters: Vec<DeclaredParameter>,
    #[serde(default)]
    pub marker: Option<HandlerMarker>,
    #[serde(default)]
    pub implements_handler: bool,
}

impl CallFrame {
    /// A frame on a type without the handler capability
    pub fn new(declaring_type: impl Into<String>, method: impl Into<String>) -> Self {
        Self {
            declaring_type: declaring_type.into(),
            method: method.into(),
            parameters: Vec::new(),
            marker: None,
            implements_handler: false,
        }
    }

    /// A frame on a type implementing [`EmailHandler`]
    pub fn for_handler<T: EmailHandler>(method: impl Into<String>) -> Self {
        Self {
            implements_handler: true,
            ..Self::new(T::TYPE_NAME, method)
        }
    }

    pub fn parameter(mut self, name: impl Into<String>, ty: ParameterType) -> Self {
        self.parameters.push(DeclaredParameter::new(name, ty));
        self
    }

    pub fn marker(mut self, marker: HandlerMarker) -> Self {
        self.marker = Some(marker);
        self
    }

    /// Mark the frame as a handler named after its type and method
    pub fn marked(self) -> Self {
        self.marker(HandlerMarker::default())
    }

    /// Mark the frame as a handler with an explicit name
    pub fn marked_as(self, name: impl Into<String>) -> Self {
        self.marker(HandlerMarker::named(name))
    }

    /// `<DeclaringType>.<method>`
    pub fn qualified_name(&self) -> String {
        format!("{}.{}", self.declaring_type, self.method)
    }

    /// Handler name this frame resolves to when it carries a marker
    pub fn handler_name(&self) -> Option<String> {
        self.marker.as_ref().map(|marker| {
            marker
                .handler_name
                .clone()
                .unwrap_or_else(|| self.qualified_name())
        })
    }
}

/// Frames leading to a generation request; index 0 is the immediate caller
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CallChain {
    frames: Vec<CallFrame>,
}

impl CallChain {
    pub fn new(frames: Vec<CallFrame>) -> Self {
        Self { frames }
    }

    /// A chain without any frames, for callers that always name their handler
    pub fn empty() -> Self {
        Self::default()
    }

    /// Push a new innermost frame
    pub fn enter(mut self, frame: CallFrame) -> Self {
        self.frames.insert(0, frame);
        self
    }

    pub fn frames(&self) -> &[CallFrame] {
        &self.frames
    }

    pub fn immediate(&self) -> Option<&CallFrame> {
        self.frames.first()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

impl From<CallFrame> for CallChain {
    fn from(frame: CallFrame) -> Self {
        Self::new(vec![frame])
    }
}

/// Resolved caller context for one generation request
#[derive(Debug, Clone)]
pub struct StackInformation {
    pub calling_frame: Option<CallFrame>,
    pub handler: Option<HandlerMarker>,
    pub handler_name: String,
}

impl StackInformation {
    /// Resolve the handler behind a call chain.
    ///
    /// With an explicit name only the immediate frame is consulted, for its
    /// declared parameters. Without one, frames are walked outward until a
    /// marked frame is found; if none is marked the immediate frame is kept
    /// unmarked and named `<Type>.<method>`.
    pub fn resolve(chain: &CallChain, explicit_name: Option<&str>) -> HandlerResult<Self> {
        if let Some(name) = explicit_name {
            let calling_frame = chain.immediate().cloned();
            let handler = calling_frame.as_ref().and_then(|f| f.marker.clone());

            return Ok(Self {
                calling_frame,
                handler,
                handler_name: name.to_string(),
            });
        }

        if let Some(frame) = chain.frames().iter().find(|f| f.marker.is_some()) {
            let handler_name = frame.handler_name().unwrap_or_else(|| frame.qualified_name());
            return Ok(Self {
                calling_frame: Some(frame.clone()),
                handler: frame.marker.clone(),
                handler_name,
            });
        }

        match chain.immediate() {
            Some(frame) => {
                tracing::debug!(
                    frame = %frame.qualified_name(),
                    depth = chain.frames().len(),
                    "No marked handler frame on call chain"
                );
                Ok(Self {
                    calling_frame: Some(frame.clone()),
                    handler: None,
                    handler_name: frame.qualified_name(),
                })
            }
            None => Err(HandlerError::MissingHandlerContext(
                "empty call chain".to_string(),
            )),
        }
    }

    /// Parameters declared by the calling frame
    pub fn calling_parameters(&self) -> &[DeclaredParameter] {
        self.calling_frame
            .as_ref()
            .map(|f| f.parameters.as_slice())
            .unwrap_or(&[])
    }

    /// Declared type of a calling-frame parameter, used to type null values
    pub fn declared_type(&self, name: &str) -> Option<&ParameterType> {
        self.calling_parameters()
            .iter()
            .find(|p| p.name == name)
            .map(|p| &p.ty)
    }
}
