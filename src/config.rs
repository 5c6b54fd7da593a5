use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::{env, net::SocketAddr};

use crate::{error::AppError, explain::DEFAULT_TOP_K};

const DEFAULT_CONFIG_FILE: &str = "spam-engine.toml";

#[derive(Debug, Clone, Deserialize)]
pub struct EngineConfig {
    pub bind_addr: String,
    pub model_path: String,
    pub top_k: usize,
}

impl EngineConfig {
    /// Defaults, then the optional TOML file, then `SPAM_ENGINE_*` variables.
    pub fn load() -> Result<Self, AppError> {
        let file = env::var("SPAM_ENGINE_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_FILE.to_string());

        let config: EngineConfig = Config::builder()
            .set_default("bind_addr", "0.0.0.0:8080")?
            .set_default("model_path", "models/spam_model.json")?
            .set_default("top_k", DEFAULT_TOP_K as i64)?
            .add_source(File::with_name(&file).required(false))
            .add_source(Environment::with_prefix("SPAM_ENGINE").try_parsing(true))
            .build()?
            .try_deserialize()?;

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.top_k == 0 {
            return Err(ConfigError::Message("top_k must be at least 1".to_string()));
        }
        self.socket_addr()?;
        if self.model_path.trim().is_empty() {
            return Err(ConfigError::Message("model_path must not be empty".to_string()));
        }
        Ok(())
    }

    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        self.bind_addr
            .parse()
            .map_err(|e| ConfigError::Message(format!("invalid bind_addr {:?}: {}", self.bind_addr, e)))
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:8080".to_string(),
            model_path: "models/spam_model.json".to_string(),
            top_k: DEFAULT_TOP_K,
        }
    }
}
