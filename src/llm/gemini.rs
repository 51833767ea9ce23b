use crate::error::GeneratorError;
use crate::llm::{GenerationParams, TextGenerator};
use serde::{Deserialize, Serialize};

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_MODEL: &str = "gemini-2.5-pro";

/// Google Generative Language (Gemini) REST client
pub struct GeminiClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl GeminiClient {
    /// Create a client for the default endpoint and model
    pub fn new(api_key: impl Into<String>) -> Result<Self, GeneratorError> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(GeneratorError::MissingApiKey);
        }
        Ok(Self {
            client: reqwest::Client::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key,
            model: DEFAULT_MODEL.to_string(),
        })
    }

    /// Override the API base URL (default: https://generativelanguage.googleapis.com)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Set the model name, with or without the `models/` prefix
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        let model = model.into();
        self.model = model
            .strip_prefix("models/")
            .map(str::to_string)
            .unwrap_or(model);
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn generate_url(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        )
    }

    fn models_url(&self) -> String {
        format!("{}/v1beta/models", self.base_url)
    }

    async fn error_from_response(response: reqwest::Response) -> GeneratorError {
        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        api_error(status, &body)
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct Content<'a> {
    role: &'a str,
    parts: Vec<RequestPart<'a>>,
}

#[derive(Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    max_output_tokens: u32,
}

impl<'a> GenerateContentRequest<'a> {
    fn new(prompt: &'a str, params: &GenerationParams) -> Self {
        Self {
            contents: vec![Content {
                role: "user",
                parts: vec![RequestPart { text: prompt }],
            }],
            generation_config: GenerationConfig {
                temperature: params.temperature,
                max_output_tokens: params.max_output_tokens,
            },
        }
    }
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default)]
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    #[serde(default)]
    block_reason: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListModelsResponse {
    #[serde(default)]
    models: Vec<ModelInfo>,
    #[serde(default)]
    next_page_token: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ModelInfo {
    name: String,
    #[serde(default)]
    supported_generation_methods: Vec<String>,
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: String,
}

/// Concatenate the text parts of the first candidate
fn completion_text(response: GenerateContentResponse) -> Result<String, GeneratorError> {
    let block_reason = response
        .prompt_feedback
        .and_then(|feedback| feedback.block_reason);

    let Some(candidate) = response.candidates.into_iter().next() else {
        return Err(GeneratorError::InvalidResponse(match block_reason {
            Some(reason) => format!("prompt was blocked: {}", reason),
            None => "response contained no candidates".to_string(),
        }));
    };

    let text: String = candidate
        .content
        .map(|content| content.parts)
        .unwrap_or_default()
        .into_iter()
        .filter_map(|part| part.text)
        .collect();

    if text.is_empty() {
        let reason = candidate.finish_reason.unwrap_or_else(|| "UNKNOWN".to_string());
        return Err(GeneratorError::InvalidResponse(format!(
            "candidate has no text (finish reason: {})",
            reason
        )));
    }
    Ok(text)
}

/// Build an API error, preferring the service's own message over the raw body
fn api_error(status: u16, body: &str) -> GeneratorError {
    let message = serde_json::from_str::<ErrorEnvelope>(body)
        .map(|envelope| envelope.error.message)
        .ok()
        .filter(|message| !message.is_empty())
        .unwrap_or_else(|| body.trim().to_string());
    GeneratorError::Api { status, message }
}

fn generate_content_models(models: Vec<ModelInfo>) -> impl Iterator<Item = String> {
    models.into_iter().filter_map(|model| {
        model
            .supported_generation_methods
            .iter()
            .any(|method| method == "generateContent")
            .then_some(model.name)
    })
}

#[async_trait::async_trait]
impl TextGenerator for GeminiClient {
    async fn generate(
        &self,
        prompt: &str,
        params: &GenerationParams,
    ) -> Result<String, GeneratorError> {
        let request = GenerateContentRequest::new(prompt, params);
        tracing::debug!(
            model = %self.model,
            prompt_chars = prompt.len(),
            temperature = params.temperature,
            max_output_tokens = params.max_output_tokens,
            "Sending generateContent request"
        );

        let response = self
            .client
            .post(self.generate_url())
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::error_from_response(response).await);
        }

        let body: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| GeneratorError::InvalidResponse(e.to_string()))?;
        completion_text(body)
    }

    async fn list_models(&self) -> Result<Vec<String>, GeneratorError> {
        let mut models = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut request = self
                .client
                .get(self.models_url())
                .header("x-goog-api-key", &self.api_key)
                .query(&[("pageSize", "1000")]);
            if let Some(token) = &page_token {
                request = request.query(&[("pageToken", token.as_str())]);
            }

            let response = request.send().await?;
            if !response.status().is_success() {
                return Err(Self::error_from_response(response).await);
            }

            let page: ListModelsResponse = response
                .json()
                .await
                .map_err(|e| GeneratorError::InvalidResponse(e.to_string()))?;
            models.extend(generate_content_models(page.models));

            match page.next_page_token.filter(|token| !token.is_empty()) {
                Some(token) => page_token = Some(token),
                None => break,
            }
        }

        Ok(models)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gemini_client_creation() {
        let client = GeminiClient::new("key").unwrap();
        assert_eq!(client.base_url, DEFAULT_BASE_URL);
        assert_eq!(client.model(), DEFAULT_MODEL);
    }

    #[test]
    fn test_gemini_client_rejects_blank_key() {
        assert!(matches!(
            GeminiClient::new("  "),
            Err(GeneratorError::MissingApiKey)
        ));
    }

    #[test]
    fn test_gemini_client_urls() {
        let client = GeminiClient::new("key")
            .unwrap()
            .with_base_url("http://localhost:8080/")
            .with_model("models/gemini-1.5-flash");
        assert_eq!(
            client.generate_url(),
            "http://localhost:8080/v1beta/models/gemini-1.5-flash:generateContent"
        );
        assert_eq!(client.models_url(), "http://localhost:8080/v1beta/models");
    }

    #[test]
    fn test_request_body_shape() {
        let params = GenerationParams::default();
        let request = GenerateContentRequest::new("hello", &params);
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["contents"][0]["parts"][0]["text"], "hello");
        assert_eq!(json["contents"][0]["role"], "user");
        assert_eq!(json["generationConfig"]["maxOutputTokens"], 4000);
        assert!((json["generationConfig"]["temperature"].as_f64().unwrap() - 0.3).abs() < 1e-6);
    }

    #[test]
    fn test_completion_text_joins_parts() {
        let body: GenerateContentResponse = serde_json::from_str(
            r#"{"candidates":[{"content":{"role":"model","parts":[{"text":"TERM "},{"text":"SHEET"}]},"finishReason":"STOP"}]}"#,
        )
        .unwrap();
        assert_eq!(completion_text(body).unwrap(), "TERM SHEET");
    }

    #[test]
    fn test_completion_text_blocked_prompt() {
        let body: GenerateContentResponse =
            serde_json::from_str(r#"{"promptFeedback":{"blockReason":"SAFETY"}}"#).unwrap();
        let err = completion_text(body).unwrap_err();
        assert!(err.to_string().contains("SAFETY"));
    }

    #[test]
    fn test_completion_text_empty_candidate() {
        let body: GenerateContentResponse =
            serde_json::from_str(r#"{"candidates":[{"finishReason":"MAX_TOKENS"}]}"#).unwrap();
        let err = completion_text(body).unwrap_err();
        assert!(err.to_string().contains("MAX_TOKENS"));
    }

    #[test]
    fn test_api_error_uses_service_message() {
        let err = api_error(
            404,
            r#"{"error":{"code":404,"message":"models/foo is not found for API version v1beta","status":"NOT_FOUND"}}"#,
        );
        match err {
            GeneratorError::Api { status, message } => {
                assert_eq!(status, 404);
                assert_eq!(message, "models/foo is not found for API version v1beta");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_api_error_falls_back_to_body() {
        let err = api_error(502, " Bad Gateway \n");
        assert_eq!(
            err.to_string(),
            "text-generation service returned 502: Bad Gateway"
        );
    }

    #[test]
    fn test_only_generate_content_models_listed() {
        let page: ListModelsResponse = serde_json::from_str(
            r#"{"models":[
                {"name":"models/gemini-2.5-pro","supportedGenerationMethods":["generateContent","countTokens"]},
                {"name":"models/text-embedding-004","supportedGenerationMethods":["embedContent"]}
            ]}"#,
        )
        .unwrap();
        let names: Vec<String> = generate_content_models(page.models).collect();
        assert_eq!(names, vec!["models/gemini-2.5-pro".to_string()]);
        assert!(page.next_page_token.is_none());
    }

    #[tokio::test]
    #[ignore] // Requires GEMINI_API_KEY and network access
    async fn test_gemini_list_models_live() {
        let key = std::env::var("GEMINI_API_KEY").unwrap();
        let client = GeminiClient::new(key).unwrap();
        let models = client.list_models().await.unwrap();
        assert!(!models.is_empty());
    }
}
