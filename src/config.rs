use crate::llm::gemini::{DEFAULT_BASE_URL, DEFAULT_MODEL};
use crate::llm::GenerationParams;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable holding the Gemini API key
pub const API_KEY_ENV: &str = "GEMINI_API_KEY";

/// Application configuration loaded from settings.toml
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub gemini: GeminiConfig,
    #[serde(default)]
    pub template: TemplateConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeminiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    #[serde(default = "default_max_output_tokens")]
    pub max_output_tokens: u32,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

fn default_temperature() -> f32 {
    GenerationParams::default().temperature
}

fn default_max_output_tokens() -> u32 {
    GenerationParams::default().max_output_tokens
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_key: None,
            model: default_model(),
            temperature: default_temperature(),
            max_output_tokens: default_max_output_tokens(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplateConfig {
    /// HTML resource holding the default term sheet template
    #[serde(default = "default_template_path")]
    pub path: String,
}

fn default_template_path() -> String {
    "Term Sheet Template_app.html".to_string()
}

impl Default for TemplateConfig {
    fn default() -> Self {
        Self {
            path: default_template_path(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Config = toml::from_str(&content).context("Failed to parse config file")?;

        Ok(config)
    }

    /// Load configuration from default location or return defaults
    pub fn load() -> Result<Self> {
        let default_paths = [
            PathBuf::from("config/settings.toml"),
            expand_path("~/.config/termsheet/settings.toml"),
        ];

        for path in &default_paths {
            if path.exists() {
                tracing::debug!(path = %path.display(), "Loading configuration");
                return Self::from_file(path);
            }
        }

        Ok(Self::default())
    }

    /// Get the API key from config or environment variable
    pub fn api_key(&self) -> Option<String> {
        self.gemini
            .api_key
            .clone()
            .filter(|key| !key.trim().is_empty())
            .or_else(|| std::env::var(API_KEY_ENV).ok())
            .filter(|key| !key.trim().is_empty())
    }

    pub fn generation_params(&self) -> GenerationParams {
        GenerationParams {
            temperature: self.gemini.temperature,
            max_output_tokens: self.gemini.max_output_tokens,
        }
    }

    /// Template resource path with `~` and environment variables expanded
    pub fn template_path(&self) -> PathBuf {
        expand_path(&self.template.path)
    }
}

fn expand_path(path: &str) -> PathBuf {
    match shellexpand::full(path) {
        Ok(expanded) => PathBuf::from(expanded.as_ref()),
        Err(_) => PathBuf::from(shellexpand::tilde(path).as_ref()),
    }
}
