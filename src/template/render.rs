//! Field renderer collaborator and the default placeholder renderer

use std::collections::HashMap;

use thiserror::Error;

use crate::handler::TemplateParameter;

use super::types::{EmailTemplate, TemplateField};

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Unbound placeholder {{{{{placeholder}}}}} in template {template_id} field {field}")]
    UnboundPlaceholder {
        template_id: i64,
        field: TemplateField,
        placeholder: String,
    },

    #[error("Unterminated placeholder in template {template_id} field {field}")]
    Unterminated {
        template_id: i64,
        field: TemplateField,
    },

    #[error("Renderer failed: {0}")]
    Backend(String),
}

/// Binds parameters into one textual field of a template.
///
/// From the pipeline's point of view this is a pure function of its inputs;
/// any error is propagated unchanged.
pub trait TemplateRenderer: Send + Sync {
    fn render_field(
        &self,
        parameters: &[TemplateParameter],
        template: &EmailTemplate,
        field: TemplateField,
    ) -> Result<String, RenderError>;
}

/// Substitutes `{{name}}` placeholders with parameter values.
///
/// Strings are inserted raw, numbers and booleans via their display form,
/// null as the empty string and lists/objects as JSON. Unknown placeholders
/// are left in place unless the renderer is strict.
#[derive(Debug, Clone, Default)]
pub struct PlaceholderRenderer {
    strict: bool,
}

impl PlaceholderRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail on placeholders no parameter binds
    pub fn strict() -> Self {
        Self { strict: true }
    }

    pub fn with_strict(strict: bool) -> Self {
        Self { strict }
    }
}

impl TemplateRenderer for PlaceholderRenderer {
    fn render_field(
        &self,
        parameters: &[TemplateParameter],
        template: &EmailTemplate,
        field: TemplateField,
    ) -> Result<String, RenderError> {
        let source = template.field(field);
        if !source.contains("{{") {
            return Ok(source.to_string());
        }

        let variables: HashMap<&str, &serde_json::Value> = parameters
            .iter()
            .map(|p| (p.name.as_str(), &p.value))
            .collect();

        let mut output = String::with_capacity(source.len());
        let mut rest = source;

        while let Some(start) = rest.find("{{") {
            output.push_str(&rest[..start]);
            let after_open = &rest[start + 2..];

            let end = match after_open.find("}}") {
                Some(end) => end,
                None if self.strict => {
                    return Err(RenderError::Unterminated {
                        template_id: template.id,
                        field,
                    })
                }
                None => {
                    output.push_str(&rest[start..]);
                    return Ok(output);
                }
            };

            let name = after_open[..end].trim();
            match variables.get(name) {
                Some(value) => output.push_str(&display_value(value)),
                None if self.strict => {
                    return Err(RenderError::UnboundPlaceholder {
                        template_id: template.id,
                        field,
                        placeholder: name.to_string(),
                    })
                }
                None => output.push_str(&rest[start..start + 2 + end + 2]),
            }

            rest = &after_open[end + 2..];
        }

        output.push_str(rest);
        Ok(output)
    }
}

fn display_value(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Number(n) => n.to_string(),
        serde_json::Value::Bool(b) => b.to_string(),
        serde_json::Value::Null => String::new(),
        // For arrays and objects, use JSON representation
        _ => value.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handler::ParameterType;
    use serde_json::json;

    fn params(pairs: &[(&str, serde_json::Value)]) -> Vec<TemplateParameter> {
        pairs
            .iter()
            .map(|(name, value)| TemplateParameter::infer(*name, value.clone()).unwrap())
            .collect()
    }

    fn subject(text: &str) -> EmailTemplate {
        EmailTemplate::new("test", "Welcome").with_field(TemplateField::Subject, text)
    }

    #[test]
    fn test_substitute_simple() {
        let rendered = PlaceholderRenderer::new()
            .render_field(
                &params(&[("name", json!("Ann"))]),
                &subject("Hi {{name}}"),
                TemplateField::Subject,
            )
            .unwrap();

        assert_eq!(rendered, "Hi Ann");
    }

    #[test]
    fn test_substitute_multiple_with_whitespace() {
        let rendered = PlaceholderRenderer::new()
            .render_field(
                &params(&[("order_id", json!("ORD-123")), ("carrier", json!("FedEx"))]),
                &subject("Order {{ order_id }} via {{carrier}}, ref {{order_id}}"),
                TemplateField::Subject,
            )
            .unwrap();

        assert_eq!(rendered, "Order ORD-123 via FedEx, ref ORD-123");
    }

    #[test]
    fn test_substitute_value_kinds() {
        let mut parameters = params(&[
            ("count", json!(42)),
            ("vip", json!(true)),
            ("tags", json!(["a", "b"])),
        ]);
        parameters.push(TemplateParameter::new(
            ParameterType::String,
            "nickname",
            serde_json::Value::Null,
        ));

        let rendered = PlaceholderRenderer::new()
            .render_field(
                &parameters,
                &subject("{{count}}|{{vip}}|{{tags}}|{{nickname}}"),
                TemplateField::Subject,
            )
            .unwrap();

        assert_eq!(rendered, r#"42|true|["a","b"]|"#);
    }

    #[test]
    fn test_substituted_values_are_not_rescanned() {
        let rendered = PlaceholderRenderer::new()
            .render_field(
                &params(&[("a", json!("{{b}}")), ("b", json!("nope"))]),
                &subject("{{a}}"),
                TemplateField::Subject,
            )
            .unwrap();

        assert_eq!(rendered, "{{b}}");
    }

    #[test]
    fn test_lenient_leaves_unknown_placeholders() {
        let rendered = PlaceholderRenderer::new()
            .render_field(&[], &subject("Hi {{name}} {{"), TemplateField::Subject)
            .unwrap();

        assert_eq!(rendered, "Hi {{name}} {{");
    }

    #[test]
    fn test_strict_rejects_unknown_placeholders() {
        let err = PlaceholderRenderer::strict()
            .render_field(&[], &subject("Hi {{name}}"), TemplateField::Subject)
            .unwrap_err();

        match err {
            RenderError::UnboundPlaceholder {
                field, placeholder, ..
            } => {
                assert_eq!(field, TemplateField::Subject);
                assert_eq!(placeholder, "name");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_renders_requested_field_only() {
        let template = subject("Hi {{name}}").with_field(TemplateField::Body, "Body {{name}}");
        let rendered = PlaceholderRenderer::new()
            .render_field(
                &params(&[("name", json!("Ann"))]),
                &template,
                TemplateField::Body,
            )
            .unwrap();

        assert_eq!(rendered, "Body Ann");
    }
}
