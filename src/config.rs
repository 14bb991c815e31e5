use serde::{Deserialize, Serialize};
use anyhow::{Context, Result};

/// Prefix for environment overrides, e.g. `DOCTRANS__SERVER__PORT=8080`
pub const ENV_PREFIX: &str = "DOCTRANS";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub ocr: OcrConfig,
    #[serde(default)]
    pub translation: TranslationConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_upload_dir")]
    pub upload_dir: String,
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OcrConfig {
    #[serde(default = "default_tesseract_binary")]
    pub binary: String,
    #[serde(default = "default_page_seg_mode")]
    pub page_seg_mode: u32,
    /// Refuse to start when the OCR binary cannot be executed
    #[serde(default = "default_true")]
    pub require_binary: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslationConfig {
    #[serde(default = "default_provider")]
    pub provider: String,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default)]
    pub api_token: Option<String>,
    #[serde(default = "default_max_length")]
    pub max_length: usize,
    #[serde(default = "default_max_concurrent")]
    pub max_concurrent: usize,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_true")]
    pub warmup: bool,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5000
}

fn default_upload_dir() -> String {
    "uploads".to_string()
}

fn default_max_upload_bytes() -> usize {
    25 * 1024 * 1024
}

fn default_tesseract_binary() -> String {
    "tesseract".to_string()
}

fn default_page_seg_mode() -> u32 {
    3
}

fn default_provider() -> String {
    "huggingface".to_string()
}

fn default_base_url() -> String {
    "https://api-inference.huggingface.co".to_string()
}

fn default_model() -> String {
    "Helsinki-NLP/opus-mt-mul-en".to_string()
}

fn default_max_length() -> usize {
    512
}

fn default_max_concurrent() -> usize {
    1
}

fn default_timeout_secs() -> u64 {
    120
}

fn default_true() -> bool {
    true
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            upload_dir: default_upload_dir(),
            max_upload_bytes: default_max_upload_bytes(),
        }
    }
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            binary: default_tesseract_binary(),
            page_seg_mode: default_page_seg_mode(),
            require_binary: true,
        }
    }
}

impl Default for TranslationConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            base_url: default_base_url(),
            model: default_model(),
            api_token: None,
            max_length: default_max_length(),
            max_concurrent: default_max_concurrent(),
            timeout_secs: default_timeout_secs(),
            warmup: true,
        }
    }
}

impl Config {
    /// Layer the optional config file (YAML or JSON, chosen by extension)
    /// and `DOCTRANS__*` environment variables over the built-in defaults.
    pub fn load(path: &str) -> Result<Self> {
        let settings = ::config::Config::builder()
            .add_source(::config::File::with_name(path).required(false))
            .add_source(
                ::config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .with_context(|| format!("failed to read configuration from {}", path))?;

        let config: Config = settings
            .try_deserialize()
            .context("invalid configuration")?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.translation.max_concurrent == 0 {
            anyhow::bail!("translation.max_concurrent must be at least 1");
        }
        if self.translation.max_length == 0 {
            anyhow::bail!("translation.max_length must be at least 1");
        }
        if self.server.upload_dir.trim().is_empty() {
            anyhow::bail!("server.upload_dir cannot be empty");
        }
        Ok(())
    }
}
