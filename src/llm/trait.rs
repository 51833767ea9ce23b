use crate::error::GeneratorError;
use serde::{Deserialize, Serialize};

/// Sampling parameters passed with every generation request
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GenerationParams {
    pub temperature: f32,
    pub max_output_tokens: u32,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            temperature: 0.3,
            max_output_tokens: 4000,
        }
    }
}

/// Trait for external text-generation services
#[async_trait::async_trait]
pub trait TextGenerator: Send + Sync {
    /// Send one prompt and return the completion text
    async fn generate(&self, prompt: &str, params: &GenerationParams)
        -> Result<String, GeneratorError>;

    /// Names of the models that can serve `generate`
    async fn list_models(&self) -> Result<Vec<String>, GeneratorError>;
}
