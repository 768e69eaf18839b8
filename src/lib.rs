// Shared components
pub mod config;
pub mod error;
pub mod metrics;

// Domain layer (business logic)
pub mod delivery;
pub mod generator;
pub mod handler;
pub mod message;
pub mod template;

// Application layer
pub mod api;
pub mod server;
