use chrono::{DateTime, Utc};

use crate::message::MessageOverrides;

/// Optional settings for one generation request
#[derive(Debug, Clone, Default)]
pub struct GenerateOptions {
    /// When the messages should go out; defaults to now
    pub send_date: Option<DateTime<Utc>>,
    /// Explicit handler name, bypassing marker lookup on the call chain
    pub handler_name: Option<String>,
    /// Skip the declared/supplied parameter check
    pub skip_validation: bool,
    /// Values that take precedence over rendered fields
    pub overrides: Option<MessageOverrides>,
}

impl GenerateOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn send_date(mut self, send_date: DateTime<Utc>) -> Self {
        self.send_date = Some(send_date);
        self
    }

    pub fn handler_name(mut self, handler_name: impl Into<String>) -> Self {
        self.handler_name = Some(handler_name.into());
        self
    }

    pub fn skip_validation(mut self) -> Self {
        self.skip_validation = true;
        self
    }

    pub fn overrides(mut self, overrides: MessageOverrides) -> Self {
        self.overrides = Some(overrides);
        self
    }
}
