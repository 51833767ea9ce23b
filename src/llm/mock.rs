use crate::error::GeneratorError;
use crate::llm::{GenerationParams, TextGenerator};
use std::sync::Mutex;

/// Canned generator for tests and offline runs
pub struct MockGenerator {
    completion: Result<String, String>,
    models: Vec<String>,
    prompts: Mutex<Vec<String>>,
}

impl MockGenerator {
    /// Always answer with `completion`
    pub fn new(completion: impl Into<String>) -> Self {
        Self {
            completion: Ok(completion.into()),
            models: Vec::new(),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Always fail with an API error carrying `message`
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            completion: Err(message.into()),
            models: Vec::new(),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn with_models(mut self, models: Vec<String>) -> Self {
        self.models = models;
        self
    }

    /// Prompts received so far
    pub fn prompts(&self) -> Vec<String> {
        self.prompts
            .lock()
            .map(|prompts| prompts.clone())
            .unwrap_or_default()
    }
}

#[async_trait::async_trait]
impl TextGenerator for MockGenerator {
    async fn generate(
        &self,
        prompt: &str,
        _params: &GenerationParams,
    ) -> Result<String, GeneratorError> {
        if let Ok(mut prompts) = self.prompts.lock() {
            prompts.push(prompt.to_string());
        }
        self.completion.clone().map_err(|message| GeneratorError::Api {
            status: 404,
            message,
        })
    }

    async fn list_models(&self) -> Result<Vec<String>, GeneratorError> {
        Ok(self.models.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_generator_records_prompts() {
        let generator = MockGenerator::new("done");
        let text = generator
            .generate("prompt one", &GenerationParams::default())
            .await
            .unwrap();
        assert_eq!(text, "done");
        assert_eq!(generator.prompts(), vec!["prompt one".to_string()]);
    }

    #[tokio::test]
    async fn test_mock_generator_failing() {
        let generator = MockGenerator::failing("boom").with_models(vec!["models/a".into()]);
        let err = generator
            .generate("p", &GenerationParams::default())
            .await
            .unwrap_err();
        assert!(err.to_string().contains("boom"));
        assert_eq!(generator.list_models().await.unwrap(), vec!["models/a".to_string()]);
    }
}
