use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::template::EmailTemplate;

/// A rendered message ready to be queued or sent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmailMessage {
    /// Persistence identity; `None` until the delivery side stores it
    pub id: Option<i64>,
    /// Correlation id
    pub guid: Uuid,
    pub external_id: String,
    /// Name of the handler that generated the message
    pub label: String,
    pub recipient: String,
    pub cc: String,
    pub bcc: String,
    pub from: String,
    pub reply_to: String,
    pub subject: String,
    pub body: String,
    pub is_html: bool,
    /// When the message should go out
    pub send_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl EmailMessage {
    /// Copy every field the message shares with a (rendered) template.
    ///
    /// Identity is copied as-is; call [`assign_identity`](Self::assign_identity)
    /// before handing the message on.
    pub fn from_template(template: &EmailTemplate, send_date: DateTime<Utc>) -> Self {
        Self {
            id: Some(template.id),
            guid: template.guid,
            external_id: template.guid.to_string(),
            label: String::new(),
            recipient: template.recipient.clone(),
            cc: template.cc.clone(),
            bcc: template.bcc.clone(),
            from: template.from.clone(),
            reply_to: template.reply_to.clone(),
            subject: template.subject.clone(),
            body: template.body.clone(),
            is_html: template.is_html,
            send_date,
            created_at: Utc::now(),
        }
    }

    /// Give the message a fresh identity so it is stored as a new entity
    pub fn assign_identity(&mut self, handler_name: &str) {
        self.id = None;
        self.guid = Uuid::new_v4();
        self.external_id = self.guid.to_string();
        self.label = handler_name.to_string();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::TemplateField;

    #[test]
    fn test_from_template_copies_text_fields() {
        let mut template = EmailTemplate::new("Welcome mail", "Welcome")
            .with_field(TemplateField::Subject, "Hi Ann")
            .with_field(TemplateField::Recipient, "ann@example.com")
            .with_field(TemplateField::ReplyTo, "support@example.com");
        template.id = 12;
        template.is_html = true;

        let send_date = Utc::now();
        let message = EmailMessage::from_template(&template, send_date);

        assert_eq!(message.subject, "Hi Ann");
        assert_eq!(message.recipient, "ann@example.com");
        assert_eq!(message.reply_to, "support@example.com");
        assert!(message.is_html);
        assert_eq!(message.send_date, send_date);
        assert_eq!(message.id, Some(12));
    }

    #[test]
    fn test_assign_identity_resets_ids() {
        let mut template = EmailTemplate::new("Welcome mail", "Welcome");
        template.id = 12;
        let mut message = EmailMessage::from_template(&template, Utc::now());

        message.assign_identity("Welcome");

        assert_eq!(message.id, None);
        assert_ne!(message.guid, template.guid);
        assert_eq!(message.external_id, message.guid.to_string());
        assert_eq!(message.label, "Welcome");
    }
}
