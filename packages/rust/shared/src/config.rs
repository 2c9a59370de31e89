//! Application configuration for Nova-Infor.
//!
//! User config lives at `~/.novainfor/novainfor.toml`.
//! CLI flags override config file values, which override defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{NovaError, Result};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "novainfor.toml";

/// Default config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".novainfor";

// ---------------------------------------------------------------------------
// Config structs (matching novainfor.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Model service settings.
    #[serde(default)]
    pub openai: OpenAiConfig,

    /// Question matcher settings.
    #[serde(default)]
    pub matcher: MatcherConfig,

    /// Fixed assistant texts and transcript policy.
    #[serde(default)]
    pub assistant: AssistantConfig,

    /// Interview tables to load at startup.
    #[serde(default = "default_sources")]
    pub sources: Vec<SourceConfig>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            openai: OpenAiConfig::default(),
            matcher: MatcherConfig::default(),
            assistant: AssistantConfig::default(),
            sources: default_sources(),
        }
    }
}

/// `[openai]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenAiConfig {
    /// Name of the env var holding the API key (never store the key itself).
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,

    /// Base URL of the OpenAI-compatible API.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Chat completion model.
    #[serde(default = "default_model")]
    pub model: String,

    /// Sampling temperature.
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Upper bound on generated tokens.
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Run the moderation check before answering.
    #[serde(default = "default_true")]
    pub moderation: bool,

    /// Request timeout. Unset means the transport default.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            api_key_env: default_api_key_env(),
            base_url: default_base_url(),
            model: default_model(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            moderation: true,
            timeout_secs: None,
        }
    }
}

fn default_api_key_env() -> String {
    "OPENAI_API_KEY".into()
}
fn default_base_url() -> String {
    "https://api.openai.com/v1".into()
}
fn default_model() -> String {
    "gpt-4".into()
}
fn default_temperature() -> f32 {
    0.5
}
fn default_max_tokens() -> u32 {
    1000
}
fn default_true() -> bool {
    true
}

/// `[matcher]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatcherConfig {
    /// A cached answer is used only when its score is strictly above this.
    #[serde(default = "default_threshold")]
    pub threshold: u8,
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self {
            threshold: default_threshold(),
        }
    }
}

fn default_threshold() -> u8 {
    70
}

/// Whether answers found in the knowledge base are recorded in the transcript.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CacheHitPolicy {
    /// Append both the question and the matched answer.
    #[default]
    Append,
    /// Show the matched answer without recording the exchange.
    Ephemeral,
}

/// `[assistant]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssistantConfig {
    /// Greeting that seeds every transcript after the system prompt.
    #[serde(default = "default_greeting")]
    pub greeting: String,

    /// Shown when the model service fails.
    #[serde(default = "default_apology")]
    pub apology: String,

    /// Shown when moderation flags the input.
    #[serde(default = "default_refusal")]
    pub refusal: String,

    /// Transcript policy for knowledge-base answers.
    #[serde(default)]
    pub cache_hit_policy: CacheHitPolicy,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            greeting: default_greeting(),
            apology: default_apology(),
            refusal: default_refusal(),
            cache_hit_policy: CacheHitPolicy::default(),
        }
    }
}

fn default_greeting() -> String {
    "¡Bienvenido a Nova-Infor Plus! Soy tu asistente virtual especializado en \
     orientación académica dentro de Ingeniería Informática."
        .into()
}
fn default_apology() -> String {
    "Hubo un problema al generar la respuesta. Por favor, intenta nuevamente.".into()
}
fn default_refusal() -> String {
    "Lo siento, no puedo responder a ese mensaje porque infringe las normas de uso.".into()
}

/// `[[sources]]` entry — one interview table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Path to the CSV file (relative paths resolve against the working directory).
    pub path: String,
    /// What the table contains; quoted in the system prompt.
    pub description: String,
}

fn default_sources() -> Vec<SourceConfig> {
    vec![
        SourceConfig {
            path: "Entrevistas_maestros.csv".into(),
            description: "Incluye experiencias y especialidades de profesores.".into(),
        },
        SourceConfig {
            path: "Entrevistas_estudiantes.csv".into(),
            description: "Contiene testimonios y motivaciones de estudiantes.".into(),
        },
        SourceConfig {
            path: "Entrevistas_maestros_ver2.csv".into(),
            description: "Proporciona detalles adicionales sobre trayectoria profesional.".into(),
        },
    ]
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the config directory (`~/.novainfor/`).
pub fn config_dir() -> Result<PathBuf> {
    let home =
        dirs::home_dir().ok_or_else(|| NovaError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Get the path to the config file (`~/.novainfor/novainfor.toml`).
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Load the application config from disk. Returns defaults if the file does not exist.
pub fn load_config() -> Result<AppConfig> {
    let path = config_file_path()?;

    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    load_config_from(&path)
}

/// Load the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| NovaError::io(path, e))?;

    let config: AppConfig = toml::from_str(&content)
        .map_err(|e| NovaError::config(format!("failed to parse {}: {e}", path.display())))?;
    config.validate()?;

    tracing::debug!(?path, sources = config.sources.len(), "config loaded");
    Ok(config)
}

impl AppConfig {
    /// Reject values the rest of the application cannot work with.
    pub fn validate(&self) -> Result<()> {
        Url::parse(&self.openai.base_url).map_err(|e| {
            NovaError::config(format!("invalid openai.base_url '{}': {e}", self.openai.base_url))
        })?;

        if self.matcher.threshold > 100 {
            return Err(NovaError::config(format!(
                "matcher.threshold must be within 0..=100, got {}",
                self.matcher.threshold
            )));
        }

        if self.sources.is_empty() {
            return Err(NovaError::config("at least one [[sources]] entry is required"));
        }

        Ok(())
    }
}

/// Create the config directory and write a default config file.
/// Returns the path to the created file.
pub fn init_config() -> Result<PathBuf> {
    let dir = config_dir()?;
    std::fs::create_dir_all(&dir).map_err(|e| NovaError::io(&dir, e))?;

    let path = dir.join(CONFIG_FILE_NAME);
    let config = AppConfig::default();
    let content = toml::to_string_pretty(&config).map_err(|e| NovaError::config(e.to_string()))?;

    std::fs::write(&path, content).map_err(|e| NovaError::io(&path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(path)
}

/// Read the API key from the env var named in the config.
///
/// A missing or empty key is fatal at startup.
pub fn resolve_api_key(config: &AppConfig) -> Result<String> {
    let var_name = &config.openai.api_key_env;
    match std::env::var(var_name) {
        Ok(val) if !val.trim().is_empty() => Ok(val.trim().to_string()),
        _ => Err(NovaError::config(format!(
            "API key not found. Set the {var_name} environment variable."
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_serializes() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).expect("serialize default config");
        assert!(toml_str.contains("OPENAI_API_KEY"));
        assert!(toml_str.contains("Entrevistas_maestros.csv"));
        assert!(toml_str.contains("cache_hit_policy = \"append\""));
    }

    #[test]
    fn config_roundtrip() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).expect("serialize");
        let parsed: AppConfig = toml::from_str(&toml_str).expect("deserialize");
        assert_eq!(parsed.openai.model, "gpt-4");
        assert_eq!(parsed.openai.max_tokens, 1000);
        assert_eq!(parsed.matcher.threshold, 70);
        assert_eq!(parsed.sources.len(), 3);
        assert!(parsed.openai.timeout_secs.is_none());
    }

    #[test]
    fn partial_config_fills_defaults() {
        let toml_str = r#"
[openai]
model = "gpt-4o-mini"
temperature = 0.2

[assistant]
cache_hit_policy = "ephemeral"

[[sources]]
path = "data/profesores.csv"
description = "Entrevistas a profesores."
"#;
        let config: AppConfig = toml::from_str(toml_str).expect("parse");
        assert_eq!(config.openai.model, "gpt-4o-mini");
        assert_eq!(config.openai.max_tokens, 1000);
        assert_eq!(config.openai.api_key_env, "OPENAI_API_KEY");
        assert_eq!(config.assistant.cache_hit_policy, CacheHitPolicy::Ephemeral);
        assert_eq!(config.sources.len(), 1);
        assert_eq!(config.sources[0].path, "data/profesores.csv");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn validate_rejects_bad_values() {
        let mut config = AppConfig::default();
        config.openai.base_url = "not a url".into();
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.matcher.threshold = 101;
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.sources.clear();
        assert!(config.validate().is_err());
    }

    #[test]
    fn api_key_missing_is_an_error() {
        let mut config = AppConfig::default();
        // Use a unique env var name to avoid interfering with other tests
        config.openai.api_key_env = "NOVA_TEST_NONEXISTENT_KEY_12345".into();
        let result = resolve_api_key(&config);
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("API key not found"));
    }
}
