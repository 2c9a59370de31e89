//! Shared types, error model, and configuration for Nova-Infor.
//!
//! This crate is the foundation depended on by all other Nova-Infor crates.
//! It provides:
//! - [`NovaError`] — the unified error type
//! - Conversation types ([`Role`], [`ConversationMessage`])
//! - Configuration ([`AppConfig`], [`OpenAiConfig`], config loading)

pub mod config;
pub mod error;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, AssistantConfig, CacheHitPolicy, MatcherConfig, OpenAiConfig, SourceConfig,
    config_dir, config_file_path, init_config, load_config, load_config_from, resolve_api_key,
};
pub use error::{NovaError, Result};
pub use types::{ConversationMessage, Role};
