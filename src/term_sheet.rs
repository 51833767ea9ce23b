use crate::error::GeneratorError;
use crate::llm::{GenerationParams, TextGenerator};
use crate::prompt::build_prompt;
use crate::template::Template;
use std::sync::Arc;

const MODEL_NAME_TIP: &str = "Tip: Common model names include 'gemini-2.5-pro', 'gemini-1.5-flash', 'gemini-1.5-pro', or 'gemini-pro'";

/// Result of one term sheet request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TermSheetOutcome {
    /// The service's completion
    Completed(String),
    /// Upstream failure, formatted for the user
    Failed { diagnostic: String },
}

impl TermSheetOutcome {
    /// Text to show the user: the term sheet or the diagnostic
    pub fn text(&self) -> &str {
        match self {
            TermSheetOutcome::Completed(text) => text,
            TermSheetOutcome::Failed { diagnostic } => diagnostic,
        }
    }

    pub fn is_completed(&self) -> bool {
        matches!(self, TermSheetOutcome::Completed(_))
    }
}

/// Fills a template from a lease through a text-generation service.
///
/// Each call makes exactly one generation request. Failures are not
/// retried; they are turned into a diagnostic for the caller.
pub struct TermSheetService {
    generator: Arc<dyn TextGenerator>,
    params: GenerationParams,
}

impl TermSheetService {
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self {
            generator,
            params: GenerationParams::default(),
        }
    }

    pub fn with_params(mut self, params: GenerationParams) -> Self {
        self.params = params;
        self
    }

    pub async fn generate(&self, template: &Template, lease_text: &str) -> TermSheetOutcome {
        let prompt = build_prompt(template.as_str(), lease_text);
        match self.generator.generate(&prompt, &self.params).await {
            Ok(text) => TermSheetOutcome::Completed(text),
            Err(err) => {
                tracing::warn!(error = %err, "Term sheet generation failed");
                TermSheetOutcome::Failed {
                    diagnostic: self.diagnose(&err).await,
                }
            }
        }
    }

    /// Format an upstream error for display.
    ///
    /// Unknown-model errors list the models the key can use, or a tip with
    /// common model names when none can be listed.
    pub async fn diagnose(&self, err: &GeneratorError) -> String {
        let error_msg = err.to_string();
        let lower = error_msg.to_lowercase();
        if !(lower.contains("not found") || lower.contains("not supported")) {
            return format!("Error generating term sheet: {}", error_msg);
        }

        let available = self.generator.list_models().await.unwrap_or_else(|e| {
            tracing::debug!(error = %e, "Failed to list models");
            Vec::new()
        });

        if available.is_empty() {
            format!(
                "Error generating term sheet: {}\n\n{}",
                error_msg, MODEL_NAME_TIP
            )
        } else {
            let models_str = available
                .iter()
                .map(|m| format!("  - {}", m))
                .collect::<Vec<_>>()
                .join("\n");
            format!(
                "Error: The specified model is not available.\n\n\
                 Available models that support content generation:\n{}\n\n\
                 Original error: {}",
                models_str, error_msg
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::MockGenerator;
    use crate::template::{load_default_template, TemplateSource, FALLBACK_TEMPLATE};

    fn fallback() -> Template {
        Template::new(FALLBACK_TEMPLATE, TemplateSource::Fallback)
    }

    #[tokio::test]
    async fn test_generate_completed() {
        let generator = Arc::new(MockGenerator::new("COMPLETED SHEET"));
        let service = TermSheetService::new(generator.clone());

        let outcome = service.generate(&fallback(), "LEASE TEXT").await;
        assert_eq!(outcome, TermSheetOutcome::Completed("COMPLETED SHEET".into()));

        let prompts = generator.prompts();
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].contains("LEASE TEXT"));
        assert!(prompts[0].contains("9. BROKER INFORMATION"));
    }

    #[tokio::test]
    async fn test_generic_failure_is_not_retried() {
        let generator = Arc::new(MockGenerator::failing("quota exceeded"));
        let service = TermSheetService::new(generator.clone());

        let outcome = service.generate(&fallback(), "lease").await;
        assert!(!outcome.is_completed());
        assert!(outcome.text().starts_with("Error generating term sheet: "));
        assert!(outcome.text().contains("quota exceeded"));
        assert_eq!(generator.prompts().len(), 1);
    }

    #[tokio::test]
    async fn test_unknown_model_lists_available() {
        let generator = Arc::new(
            MockGenerator::failing("models/gemini-x is not found").with_models(vec![
                "models/gemini-2.5-pro".into(),
                "models/gemini-1.5-flash".into(),
            ]),
        );
        let service = TermSheetService::new(generator);

        let outcome = service.generate(&fallback(), "lease").await;
        let text = outcome.text();
        assert!(text.starts_with("Error: The specified model is not available."));
        assert!(text.contains("\n  - models/gemini-2.5-pro\n  - models/gemini-1.5-flash\n"));
        assert!(text.contains("Original error: "));
        assert!(text.contains("is not found"));
    }

    #[tokio::test]
    async fn test_unknown_model_without_listing_gives_tip() {
        let generator = Arc::new(MockGenerator::failing("Model NOT SUPPORTED for generateContent"));
        let service = TermSheetService::new(generator);

        let outcome = service.generate(&fallback(), "lease").await;
        assert!(outcome.text().starts_with("Error generating term sheet: "));
        assert!(outcome.text().ends_with(MODEL_NAME_TIP));
    }

    #[tokio::test]
    async fn test_default_template_threaded_explicitly() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let template = load_default_template(temp_dir.path().join("absent.html"));
        let generator = Arc::new(MockGenerator::new("ok"));
        let service = TermSheetService::new(generator.clone()).with_params(GenerationParams {
            temperature: 0.0,
            max_output_tokens: 10,
        });

        service.generate(&template, "lease").await;
        assert!(generator.prompts()[0].contains(FALLBACK_TEMPLATE));
    }
}
