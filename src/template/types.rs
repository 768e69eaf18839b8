//! Template types and error definitions

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Template-specific error type
#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("Template not found: {0}")]
    NotFound(i64),

    #[error("Template already exists: {0}")]
    AlreadyExists(i64),

    #[error("Invalid template: {0}")]
    InvalidTemplate(String),

    #[error("Template store unavailable: {0}")]
    Unavailable(String),
}

/// Result type for template operations
pub type TemplateResult<T> = Result<T, TemplateError>;

/// Textual template fields that pass through the renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TemplateField {
    Recipient,
    Cc,
    Bcc,
    From,
    ReplyTo,
    Subject,
    Body,
}

impl TemplateField {
    pub const ALL: [TemplateField; 7] = [
        Self::Recipient,
        Self::Cc,
        Self::Bcc,
        Self::From,
        Self::ReplyTo,
        Self::Subject,
        Self::Body,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Recipient => "recipient",
            Self::Cc => "cc",
            Self::Bcc => "bcc",
            Self::From => "from",
            Self::ReplyTo => "reply_to",
            Self::Subject => "subject",
            Self::Body => "body",
        }
    }
}

impl fmt::Display for TemplateField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A stored email template bound to one handler.
///
/// Empty text fields are unset. `Clone` is a full structural copy, so a
/// cloned template can be rendered in place without touching the original.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmailTemplate {
    /// Store-assigned identity (0 until stored)
    #[serde(default)]
    pub id: i64,

    #[serde(default = "Uuid::new_v4")]
    pub guid: Uuid,

    /// Human-readable template name
    pub name: String,

    /// Handler this template is registered to
    pub handler_name: String,

    #[serde(default = "default_enabled")]
    pub enabled: bool,

    #[serde(default)]
    pub recipient: String,

    #[serde(default)]
    pub cc: String,

    #[serde(default)]
    pub bcc: String,

    #[serde(default)]
    pub from: String,

    #[serde(default)]
    pub reply_to: String,

    #[serde(default)]
    pub subject: String,

    #[serde(default)]
    pub body: String,

    #[serde(default)]
    pub is_html: bool,

    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,

    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
}

fn default_enabled() -> bool {
    true
}

impl EmailTemplate {
    /// Create an enabled, unstored template for a handler
    pub fn new(name: impl Into<String>, handler_name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: 0,
            guid: Uuid::new_v4(),
            name: name.into(),
            handler_name: handler_name.into(),
            enabled: true,
            recipient: String::new(),
            cc: String::new(),
            bcc: String::new(),
            from: String::new(),
            reply_to: String::new(),
            subject: String::new(),
            body: String::new(),
            is_html: false,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn field(&self, field: TemplateField) -> &str {
        match field {
            TemplateField::Recipient => &self.recipient,
            TemplateField::Cc => &self.cc,
            TemplateField::Bcc => &self.bcc,
            TemplateField::From => &self.from,
            TemplateField::ReplyTo => &self.reply_to,
            TemplateField::Subject => &self.subject,
            TemplateField::Body => &self.body,
        }
    }

    pub fn set_field(&mut self, field: TemplateField, value: String) {
        let slot = match field {
            TemplateField::Recipient => &mut self.recipient,
            TemplateField::Cc => &mut self.cc,
            TemplateField::Bcc => &mut self.bcc,
            TemplateField::From => &mut self.from,
            TemplateField::ReplyTo => &mut self.reply_to,
            TemplateField::Subject => &mut self.subject,
            TemplateField::Body => &mut self.body,
        };
        *slot = value;
    }

    /// Builder-style field setter
    pub fn with_field(mut self, field: TemplateField, value: impl Into<String>) -> Self {
        self.set_field(field, value.into());
        self
    }

    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    /// Validate the template
    pub fn validate(&self) -> TemplateResult<()> {
        if self.name.is_empty() || self.name.len() > 256 {
            return Err(TemplateError::InvalidTemplate(
                "Name must be 1-256 characters".to_string(),
            ));
        }

        if self.handler_name.trim().is_empty() || self.handler_name.len() > 256 {
            return Err(TemplateError::InvalidTemplate(
                "Handler name must be 1-256 characters".to_string(),
            ));
        }

        Ok(())
    }
}

/// Request to create a new template
#[derive(Debug, Deserialize)]
pub struct CreateTemplateRequest {
    pub name: String,
    pub handler_name: String,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default)]
    pub recipient: String,
    #[serde(default)]
    pub cc: String,
    #[serde(default)]
    pub bcc: String,
    #[serde(default)]
    pub from: String,
    #[serde(default)]
    pub reply_to: String,
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub is_html: bool,
}

impl From<CreateTemplateRequest> for EmailTemplate {
    fn from(req: CreateTemplateRequest) -> Self {
        EmailTemplate {
            enabled: req.enabled,
            recipient: req.recipient,
            cc: req.cc,
            bcc: req.bcc,
            from: req.from,
            reply_to: req.reply_to,
            subject: req.subject,
            body: req.body,
            is_html: req.is_html,
            ..EmailTemplate::new(req.name, req.handler_name)
        }
    }
}

/// Response for listing templates
#[derive(Debug, Serialize)]
pub struct TemplateListResponse {
    pub templates: Vec<EmailTemplate>,
    pub total: usize,
}
