//! Configuration loading for the inference pipeline
//!
//! Layered resolution via the `config` crate: defaults for non-critical
//! values, optional config files, then environment variables with the
//! `COMPASS_GATEWAY` prefix. Required keys (region, model, pool and client
//! ids, service credentials) have no fallback and fail fast with an error
//! naming the key, before any network call is attempted.
//!
//! Settings are immutable after load and safely shared across concurrent
//! invocations.

use crate::domain::{
    AppClientId, AwsRegion, IdentityPoolId, ModelFamily, ModelId, Password, UserPoolId, Username,
};
use crate::error::{Error, Result};
use crate::pipeline::constants::{generation_defaults, DEFAULT_TIMEOUT_SECS};
use config::builder::{ConfigBuilder, DefaultState};
use config::{Config, Environment, File};
use std::env;

#[derive(Debug, Clone)]
pub struct Settings {
    pub aws: AwsSettings,
    pub bedrock: BedrockSettings,
    pub cognito: CognitoSettings,
    pub generation: GenerationSettings,
    pub http: HttpSettings,
}

#[derive(Debug, Clone)]
pub struct AwsSettings {
    pub region: AwsRegion,
}

#[derive(Debug, Clone)]
pub struct BedrockSettings {
    pub model_id: ModelId,
    /// Resolved once here; requests never route on model-id substrings.
    pub family: ModelFamily,
}

#[derive(Debug, Clone)]
pub struct CognitoSettings {
    pub identity_pool_id: IdentityPoolId,
    pub user_pool_id: UserPoolId,
    pub app_client_id: AppClientId,
    pub username: Username,
    pub password: Password,
}

/// Generation parameters with documented fallbacks
#[derive(Debug, Clone, Copy)]
pub struct GenerationSettings {
    pub temperature: f64,
    pub top_p: f64,
    pub max_tokens: u32,
}

#[derive(Debug, Clone, Copy)]
pub struct HttpSettings {
    /// Per-remote-call timeout; an unbounded hang in any step would stall the
    /// whole user-facing request.
    pub timeout_secs: u64,
}

fn base_builder() -> Result<ConfigBuilder<DefaultState>> {
    let builder = Config::builder()
        .set_default("generation.temperature", generation_defaults::TEMPERATURE)?
        .set_default("generation.top_p", generation_defaults::TOP_P)?
        .set_default("generation.max_tokens", i64::from(generation_defaults::MAX_TOKENS))?
        .set_default("http.timeout_secs", i64::try_from(DEFAULT_TIMEOUT_SECS).unwrap_or(30))?;
    Ok(builder)
}

fn required(config: &Config, key: &str) -> Result<String> {
    config.get_string(key).map_err(|_| Error::missing_key(key))
}

impl Settings {
    /// Load from files and environment.
    pub fn load() -> Result<Self> {
        let environment = env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string());

        let config = base_builder()?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{environment}")).required(false))
            .add_source(File::with_name("config/local").required(false))
            .add_source(Environment::with_prefix("COMPASS_GATEWAY").separator("__"))
            .build()?;

        Self::from_config(&config)
    }

    /// Resolve and validate settings from an already-built [`Config`].
    pub fn from_config(config: &Config) -> Result<Self> {
        let region = AwsRegion::try_new(required(config, "aws.region")?)
            .map_err(|_| Error::invalid_key("aws.region"))?;

        let model_id = ModelId::try_new(required(config, "bedrock.model_id")?)
            .map_err(|_| Error::invalid_key("bedrock.model_id"))?;
        let family = ModelFamily::from_model_id(&model_id).ok_or_else(|| {
            Error::configuration(format!(
                "unsupported model family for bedrock.model_id \"{model_id}\""
            ))
        })?;

        let cognito = CognitoSettings {
            identity_pool_id: IdentityPoolId::try_new(required(
                config,
                "cognito.identity_pool_id",
            )?)
            .map_err(|_| Error::invalid_key("cognito.identity_pool_id"))?,
            user_pool_id: UserPoolId::try_new(required(config, "cognito.user_pool_id")?)
                .map_err(|_| Error::invalid_key("cognito.user_pool_id"))?,
            app_client_id: AppClientId::try_new(required(config, "cognito.app_client_id")?)
                .map_err(|_| Error::invalid_key("cognito.app_client_id"))?,
            username: Username::try_new(required(config, "cognito.username")?)
                .map_err(|_| Error::invalid_key("cognito.username"))?,
            password: Password::new(required(config, "cognito.password")?),
        };

        let generation = GenerationSettings {
            temperature: config
                .get_float("generation.temperature")
                .map_err(|_| Error::invalid_key("generation.temperature"))?,
            top_p: config
                .get_float("generation.top_p")
                .map_err(|_| Error::invalid_key("generation.top_p"))?,
            max_tokens: config
                .get_int("generation.max_tokens")
                .ok()
                .and_then(|tokens| u32::try_from(tokens).ok())
                .ok_or_else(|| Error::invalid_key("generation.max_tokens"))?,
        };

        let http = HttpSettings {
            timeout_secs: config
                .get_int("http.timeout_secs")
                .ok()
                .and_then(|secs| u64::try_from(secs).ok())
                .ok_or_else(|| Error::invalid_key("http.timeout_secs"))?,
        };

        Ok(Self {
            aws: AwsSettings { region },
            bedrock: BedrockSettings { model_id, family },
            cognito,
            generation,
            http,
        })
    }
}
