//! Template mail generation pipeline

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Instant;

use chrono::{DateTime, Utc};

use crate::delivery::{MailQueue, WriteScopeProvider};
use crate::handler::{
    CallChain, HandlerError, HandlerRegistry, HandlerToken, ParameterType, StackInformation,
    TemplateParameter,
};
use crate::message::{EmailMessage, MessageOverrides};
use crate::metrics::GenerationMetrics;
use crate::template::{
    select_enabled, EmailTemplate, RenderError, TemplateField, TemplateRenderer, TemplateStore,
};

use super::error::{GenerationError, GenerationResult};
use super::options::GenerateOptions;

/// Generates and delivers messages from the templates registered to a handler
pub struct EmailGenerator {
    templates: Arc<dyn TemplateStore>,
    renderer: Arc<dyn TemplateRenderer>,
    queue: Arc<dyn MailQueue>,
    scopes: Arc<dyn WriteScopeProvider>,
    registry: Arc<HandlerRegistry>,
}

impl EmailGenerator {
    pub fn new(
        templates: Arc<dyn TemplateStore>,
        renderer: Arc<dyn TemplateRenderer>,
        queue: Arc<dyn MailQueue>,
        scopes: Arc<dyn WriteScopeProvider>,
    ) -> Self {
        Self {
            templates,
            renderer,
            queue,
            scopes,
            registry: Arc::new(HandlerRegistry::new()),
        }
    }

    /// Resolve tokens and handler names against this registry
    pub fn with_registry(mut self, registry: Arc<HandlerRegistry>) -> Self {
        self.registry = registry;
        self
    }

    pub fn registry(&self) -> &HandlerRegistry {
        &self.registry
    }

    /// Every enabled template registered to a handler
    pub async fn list_enabled_templates(
        &self,
        handler_name: &str,
    ) -> GenerationResult<Vec<EmailTemplate>> {
        Ok(select_enabled(self.templates.as_ref(), handler_name).await?)
    }

    /// Generate from named values.
    ///
    /// A `null` value takes its type from the calling handler's declared
    /// parameter of the same name; without one the request fails.
    pub async fn generate_from_values<I>(
        &self,
        chain: &CallChain,
        values: I,
        options: GenerateOptions,
    ) -> GenerationResult<()>
    where
        I: IntoIterator<Item = (String, serde_json::Value)>,
    {
        let result = match bind_values(chain, values, options) {
            Ok((parameters, options)) => self.run(chain, parameters, options).await,
            Err(e) => Err(e),
        };
        recorded(result)
    }

    /// Generate from fully typed parameters
    pub async fn generate(
        &self,
        chain: &CallChain,
        parameters: Vec<TemplateParameter>,
        options: GenerateOptions,
    ) -> GenerationResult<()> {
        recorded(self.run(chain, parameters, options).await)
    }

    /// Generate on behalf of a registered handler
    pub async fn generate_for<I>(
        &self,
        token: &HandlerToken,
        values: I,
        options: GenerateOptions,
    ) -> GenerationResult<()>
    where
        I: IntoIterator<Item = (String, serde_json::Value)>,
    {
        let Some(chain) = self.registry.chain_for(token) else {
            return recorded(Err(GenerationError::UnknownHandler(
                token.handler_name().to_string(),
            )));
        };

        self.generate_from_values(&chain, values, options).await
    }

    /// Generate on behalf of a handler looked up by name
    pub async fn generate_for_name<I>(
        &self,
        handler_name: &str,
        values: I,
        options: GenerateOptions,
    ) -> GenerationResult<()>
    where
        I: IntoIterator<Item = (String, serde_json::Value)>,
    {
        let Some(chain) = self.registry.chain_for_name(handler_name) else {
            return recorded(Err(GenerationError::UnknownHandler(
                handler_name.to_string(),
            )));
        };

        self.generate_from_values(&chain, values, options).await
    }

    #[tracing::instrument(
        name = "generator.generate",
        skip_all,
        fields(handler = tracing::field::Empty, parameters = parameters.len())
    )]
    async fn run(
        &self,
        chain: &CallChain,
        parameters: Vec<TemplateParameter>,
        options: GenerateOptions,
    ) -> GenerationResult<()> {
        ensure_unique_names(&parameters)?;

        if let Some(name) = &options.handler_name {
            if name.trim().is_empty() {
                return Err(GenerationError::InvalidArgument(
                    "handler name must not be empty".to_string(),
                ));
            }
        }

        let handler_name = match (&options.handler_name, options.skip_validation) {
            (Some(name), true) => name.clone(),
            _ => {
                let info = StackInformation::resolve(chain, options.handler_name.as_deref())?;
                if !options.skip_validation {
                    info.validate_parameters(&parameters)?;
                }
                info.handler_name
            }
        };
        tracing::Span::current().record("handler", handler_name.as_str());

        let send_date = options.send_date.unwrap_or_else(Utc::now);
        let templates = select_enabled(self.templates.as_ref(), &handler_name).await?;

        if templates.is_empty() {
            tracing::debug!(handler = %handler_name, "No enabled templates for handler");
            return Ok(());
        }

        for template in &templates {
            let message = self.render_message(
                template,
                &parameters,
                &handler_name,
                send_date,
                options.overrides.as_ref(),
            )?;

            tracing::debug!(
                template_id = template.id,
                guid = %message.guid,
                "Rendered template"
            );

            self.deliver(message).await?;
            GenerationMetrics::record_generated(&handler_name);
        }

        tracing::info!(
            handler = %handler_name,
            delivered = templates.len(),
            "Generated templated mail"
        );

        Ok(())
    }

    /// Render one template into a message with a fresh identity.
    ///
    /// The template is copied first; the caller's value is never modified.
    pub fn render_message(
        &self,
        template: &EmailTemplate,
        parameters: &[TemplateParameter],
        handler_name: &str,
        send_date: DateTime<Utc>,
        overrides: Option<&MessageOverrides>,
    ) -> Result<EmailMessage, RenderError> {
        let started = Instant::now();
        let mut rendered = template.clone();

        for field in TemplateField::ALL {
            let value = self.renderer.render_field(parameters, &rendered, field)?;
            rendered.set_field(field, value);
        }

        let mut message = EmailMessage::from_template(&rendered, send_date);
        if let Some(overrides) = overrides {
            overrides.apply_to(&mut message);
        }
        message.assign_identity(handler_name);

        GenerationMetrics::record_render(started.elapsed());
        Ok(message)
    }

    /// Hand a message to the queue inside its own write scope
    async fn deliver(&self, message: EmailMessage) -> GenerationResult<()> {
        let guid = message.guid;
        let scope = self.scopes.begin().await?;

        match self.queue.queue_or_send(message).await {
            Ok(()) => {
                scope.commit().await?;
                Ok(())
            }
            Err(e) => {
                if let Err(rollback_err) = scope.rollback().await {
                    tracing::error!(
                        guid = %guid,
                        error = %rollback_err,
                        "Write scope rollback failed"
                    );
                }
                tracing::warn!(guid = %guid, error = %e, "Message delivery failed");
                Err(e.into())
            }
        }
    }
}

/// Type named values against the caller context and validate them.
///
/// Returns the parameters with options carrying the resolved handler name,
/// validation marked as done.
fn bind_values<I>(
    chain: &CallChain,
    values: I,
    mut options: GenerateOptions,
) -> GenerationResult<(Vec<TemplateParameter>, GenerateOptions)>
where
    I: IntoIterator<Item = (String, serde_json::Value)>,
{
    let info = StackInformation::resolve(chain, options.handler_name.as_deref())?;

    let mut parameters = Vec::new();
    for (name, value) in values {
        let ty = match ParameterType::of(&value) {
            Some(ty) => ty,
            None => info
                .declared_type(&name)
                .cloned()
                .ok_or_else(|| HandlerError::UnresolvableParameterType(name.clone()))?,
        };
        parameters.push(TemplateParameter::new(ty, name, value));
    }

    if !options.skip_validation {
        info.validate_parameters(&parameters)?;
    }

    options.handler_name = Some(info.handler_name);
    options.skip_validation = true;
    Ok((parameters, options))
}

fn ensure_unique_names(parameters: &[TemplateParameter]) -> GenerationResult<()> {
    let mut seen = HashSet::with_capacity(parameters.len());
    for parameter in parameters {
        if !seen.insert(parameter.name.as_str()) {
            return Err(GenerationError::InvalidArgument(format!(
                "duplicate template parameter {}",
                parameter.name
            )));
        }
    }
    Ok(())
}

/// Count the request outcome and pass the result through
fn recorded(result: GenerationResult<()>) -> GenerationResult<()> {
    match &result {
        Ok(()) => GenerationMetrics::record_success(),
        Err(e) => {
            tracing::warn!(kind = e.kind(), error = %e, "Template generation failed");
            GenerationMetrics::record_failure(e.kind());
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::delivery::{MemoryMailQueue, MemoryWriteScopes};
    use crate::handler::{CallFrame, EmailHandler};
    use crate::template::{MemoryTemplateStore, PlaceholderRenderer};
    use serde_json::json;

    struct AccountMailer;

    impl EmailHandler for AccountMailer {
        const TYPE_NAME: &'static str = "AccountMailer";
    }

    struct Fixture {
        generator: EmailGenerator,
        store: Arc<MemoryTemplateStore>,
        queue: Arc<MemoryMailQueue>,
        scopes: MemoryWriteScopes,
    }

    fn fixture() -> Fixture {
        let store = Arc::new(MemoryTemplateStore::new());
        let queue = Arc::new(MemoryMailQueue::new());
        let scopes = MemoryWriteScopes::new();
        let generator = EmailGenerator::new(
            store.clone(),
            Arc::new(PlaceholderRenderer::new()),
            queue.clone(),
            Arc::new(scopes.clone()),
        );
        Fixture {
            generator,
            store,
            queue,
            scopes,
        }
    }

    fn welcome_chain() -> CallChain {
        CallChain::from(
            CallFrame::for_handler::<AccountMailer>("welcome")
                .parameter("name", ParameterType::String)
                .parameter("nickname", ParameterType::String)
                .marked_as("Welcome"),
        )
    }

    #[tokio::test]
    async fn test_null_value_takes_declared_type() {
        let (parameters, options) = bind_values(
            &welcome_chain(),
            vec![
                ("name".to_string(), json!("Ann")),
                ("nickname".to_string(), serde_json::Value::Null),
            ],
            GenerateOptions::new(),
        )
        .unwrap();

        let nickname = parameters.iter().find(|p| p.name == "nickname").unwrap();
        assert_eq!(nickname.ty, ParameterType::String);
        assert_eq!(options.handler_name.as_deref(), Some("Welcome"));
        assert!(options.skip_validation);
    }

    #[tokio::test]
    async fn test_null_value_without_declaration_fails() {
        let result = bind_values(
            &welcome_chain(),
            vec![("unknown".to_string(), serde_json::Value::Null)],
            GenerateOptions::new(),
        );

        assert!(matches!(
            result,
            Err(GenerationError::Handler(HandlerError::UnresolvableParameterType(name))) if name == "unknown"
        ));
    }

    #[tokio::test]
    async fn test_duplicate_parameter_names_rejected() {
        let f = fixture();
        let parameters = vec![
            TemplateParameter::new(ParameterType::String, "name", json!("Ann")),
            TemplateParameter::new(ParameterType::String, "name", json!("Bob")),
        ];

        let result = f
            .generator
            .generate(
                &CallChain::empty(),
                parameters,
                GenerateOptions::new().handler_name("Welcome").skip_validation(),
            )
            .await;

        assert!(matches!(result, Err(GenerationError::InvalidArgument(_))));
    }

    #[tokio::test]
    async fn test_render_message_leaves_template_untouched() {
        let f = fixture();
        let mut template = EmailTemplate::new("Welcome mail", "Welcome")
            .with_field(TemplateField::Subject, "Hi {{name}}");
        template.id = 5;
        let parameters = vec![TemplateParameter::new(
            ParameterType::String,
            "name",
            json!("Ann"),
        )];

        let message = f
            .generator
            .render_message(&template, &parameters, "Welcome", Utc::now(), None)
            .unwrap();

        assert_eq!(message.subject, "Hi Ann");
        assert_eq!(message.id, None);
        assert_ne!(message.guid, template.guid);
        assert_eq!(template.subject, "Hi {{name}}");
    }

    #[tokio::test]
    async fn test_render_error_propagates_without_delivery() {
        let store = Arc::new(MemoryTemplateStore::new());
        let queue = Arc::new(MemoryMailQueue::new());
        let scopes = MemoryWriteScopes::new();
        let generator = EmailGenerator::new(
            store.clone(),
            Arc::new(PlaceholderRenderer::strict()),
            queue.clone(),
            Arc::new(scopes.clone()),
        );
        store
            .insert(
                EmailTemplate::new("Welcome mail", "Welcome")
                    .with_field(TemplateField::Body, "{{missing}}"),
            )
            .await
            .unwrap();

        let result = generator
            .generate_from_values(
                &welcome_chain(),
                vec![
                    ("name".to_string(), json!("Ann")),
                    ("nickname".to_string(), json!("A")),
                ],
                GenerateOptions::new(),
            )
            .await;

        assert!(matches!(result, Err(GenerationError::Render(_))));
        assert!(queue.is_empty().await);
        assert_eq!(scopes.stats().begun, 0);
    }

    #[tokio::test]
    async fn test_send_date_defaults_and_overrides() {
        let f = fixture();
        f.store
            .insert(EmailTemplate::new("Welcome mail", "Welcome"))
            .await
            .unwrap();
        let scheduled = Utc::now() + chrono::Duration::days(1);

        f.generator
            .generate(
                &CallChain::empty(),
                vec![],
                GenerateOptions::new()
                    .handler_name("Welcome")
                    .skip_validation()
                    .send_date(scheduled),
            )
            .await
            .unwrap();

        let messages = f.queue.messages().await;
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].send_date, scheduled);
        assert_eq!(f.scopes.stats().committed, 1);
    }

    #[tokio::test]
    async fn test_unknown_token_handler() {
        let f = fixture();
        let other = HandlerRegistry::new();
        let token = other
            .register(CallFrame::for_handler::<AccountMailer>("welcome").marked_as("Welcome"))
            .unwrap();

        let result = f
            .generator
            .generate_for(&token, Vec::<(String, serde_json::Value)>::new(), GenerateOptions::new())
            .await;

        assert!(matches!(result, Err(GenerationError::UnknownHandler(name)) if name == "Welcome"));
    }

    #[tokio::test]
    async fn test_unknown_handler_is_counted() {
        let f = fixture();
        let failures = || {
            crate::metrics::GENERATION_ERRORS_TOTAL
                .with_label_values(&["unknown_handler"])
                .get()
        };
        let before = failures();

        let result = f
            .generator
            .generate_for_name(
                "NotRegistered",
                Vec::<(String, serde_json::Value)>::new(),
                GenerateOptions::new(),
            )
            .await;

        assert!(matches!(result, Err(GenerationError::UnknownHandler(_))));
        assert!(failures() > before);
    }
}
