//! Sparse message overrides

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::types::EmailMessage;

/// Caller-supplied values that take precedence over rendered ones.
///
/// Only fields that are `Some` are applied. A `Some` holding an empty string
/// or `false` still overrides: unset and default are distinct.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MessageOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recipient: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cc: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bcc: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply_to: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_html: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub send_date: Option<DateTime<Utc>>,
}

impl MessageOverrides {
    pub fn recipient(mut self, recipient: impl Into<String>) -> Self {
        self.recipient = Some(recipient.into());
        self
    }

    pub fn cc(mut self, cc: impl Into<String>) -> Self {
        self.cc = Some(cc.into());
        self
    }

    pub fn bcc(mut self, bcc: impl Into<String>) -> Self {
        self.bcc = Some(bcc.into());
        self
    }

    pub fn from(mut self, from: impl Into<String>) -> Self {
        self.from = Some(from.into());
        self
    }

    pub fn reply_to(mut self, reply_to: impl Into<String>) -> Self {
        self.reply_to = Some(reply_to.into());
        self
    }

    pub fn subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    pub fn is_html(mut self, is_html: bool) -> Self {
        self.is_html = Some(is_html);
        self
    }

    pub fn send_date(mut self, send_date: DateTime<Utc>) -> Self {
        self.send_date = Some(send_date);
        self
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Overlay every set field onto the message
    pub fn apply_to(&self, message: &mut EmailMessage) {
        fn overlay<T: Clone>(slot: &mut T, value: &Option<T>) {
            if let Some(value) = value {
                *slot = value.clone();
            }
        }

        overlay(&mut message.recipient, &self.recipient);
        overlay(&mut message.cc, &self.cc);
        overlay(&mut message.bcc, &self.bcc);
        overlay(&mut message.from, &self.from);
        overlay(&mut message.reply_to, &self.reply_to);
        overlay(&mut message.subject, &self.subject);
        overlay(&mut message.body, &self.body);
        overlay(&mut message.is_html, &self.is_html);
        overlay(&mut message.send_date, &self.send_date);
    }
}
