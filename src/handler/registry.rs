//! Startup-time registry of mail handlers and their parameter schemas

use std::sync::Arc;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use thiserror::Error;
use uuid::Uuid;

use crate::config::HandlerConfig;

use super::context::{CallChain, CallFrame, HandlerMarker};

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("Frame {0} carries no handler marker")]
    Unmarked(String),

    #[error("Handler already registered: {0}")]
    AlreadyRegistered(String),
}

/// Opaque capability handed out when a handler is registered
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct HandlerToken {
    id: Uuid,
    name: Arc<str>,
}

impl HandlerToken {
    pub fn handler_name(&self) -> &str {
        &self.name
    }
}

struct RegisteredHandler {
    id: Uuid,
    frame: CallFrame,
}

/// Registry mapping handler names to their declaring frames
#[derive(Default)]
pub struct HandlerRegistry {
    handlers: DashMap<String, RegisteredHandler>,
}

impl HandlerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry from configured handler entries
    pub fn from_config(handlers: &[HandlerConfig]) -> Result<Self, RegistryError> {
        let registry = Self::new();
        for handler in handlers {
            let mut frame = CallFrame::new(&handler.declaring_type, &handler.method)
                .marker(HandlerMarker {
                    handler_name: handler.name.clone(),
                });
            frame.implements_handler = true;
            frame.parameters = handler.parameters.clone();
            registry.register(frame)?;
        }
        Ok(registry)
    }

    /// Register a marked frame, returning the token its callers present
    pub fn register(&self, frame: CallFrame) -> Result<HandlerToken, RegistryError> {
        let name = frame
            .handler_name()
            .ok_or_else(|| RegistryError::Unmarked(frame.qualified_name()))?;

        let id = Uuid::new_v4();
        match self.handlers.entry(name.clone()) {
            Entry::Occupied(_) => return Err(RegistryError::AlreadyRegistered(name)),
            Entry::Vacant(slot) => {
                slot.insert(RegisteredHandler { id, frame });
            }
        }

        tracing::info!(handler = %name, "Registered mail handler");

        Ok(HandlerToken {
            id,
            name: name.into(),
        })
    }

    /// Call chain for a token issued by this registry
    pub fn chain_for(&self, token: &HandlerToken) -> Option<CallChain> {
        self.handlers
            .get(token.handler_name())
            .filter(|entry| entry.id == token.id)
            .map(|entry| CallChain::from(entry.frame.clone()))
    }

    /// Call chain for a handler looked up by name
    pub fn chain_for_name(&self, name: &str) -> Option<CallChain> {
        self.handlers
            .get(name)
            .map(|entry| CallChain::from(entry.frame.clone()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.handlers.contains_key(name)
    }

    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<_> = self.handlers.iter().map(|e| e.key().clone()).collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handler::parameter::{DeclaredParameter, ParameterType};

    #[test]
    fn test_register_and_lookup_by_token() {
        let registry = HandlerRegistry::new();
        let token = registry
            .register(CallFrame::new("AccountMailer", "welcome").marked_as("Welcome"))
            .unwrap();

        assert_eq!(token.handler_name(), "Welcome");
        let chain = registry.chain_for(&token).unwrap();
        assert_eq!(chain.immediate().unwrap().method, "welcome");
    }

    #[test]
    fn test_register_rejects_unmarked_frame() {
        let registry = HandlerRegistry::new();
        assert!(matches!(
            registry.register(CallFrame::new("Jobs", "nightly")),
            Err(RegistryError::Unmarked(_))
        ));
    }

    #[test]
    fn test_register_rejects_duplicate_name() {
        let registry = HandlerRegistry::new();
        registry
            .register(CallFrame::new("A", "one").marked_as("Shared"))
            .unwrap();

        assert!(matches!(
            registry.register(CallFrame::new("B", "two").marked_as("Shared")),
            Err(RegistryError::AlreadyRegistered(name)) if name == "Shared"
        ));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_token_from_other_registry_is_not_honoured() {
        let first = HandlerRegistry::new();
        let second = HandlerRegistry::new();
        let frame = CallFrame::new("AccountMailer", "welcome").marked_as("Welcome");

        let foreign = first.register(frame.clone()).unwrap();
        second.register(frame).unwrap();

        assert!(second.chain_for(&foreign).is_none());
        assert!(second.chain_for_name("Welcome").is_some());
    }

    #[test]
    fn test_from_config_marks_frames_as_handlers() {
        let registry = HandlerRegistry::from_config(&[HandlerConfig {
            name: None,
            declaring_type: "OrderMailer".to_string(),
            method: "shipped".to_string(),
            parameters: vec![DeclaredParameter::new("order_id", ParameterType::String)],
        }])
        .unwrap();

        let chain = registry.chain_for_name("OrderMailer.shipped").unwrap();
        let frame = chain.immediate().unwrap();
        assert!(frame.implements_handler);
        assert_eq!(frame.parameters.len(), 1);
        assert_eq!(registry.names(), vec!["OrderMailer.shipped".to_string()]);
    }
}
