mod settings;

pub use settings::{DeliveryConfig, HandlerConfig, RenderingConfig, ServerConfig, Settings};
