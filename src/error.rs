use http::StatusCode;
use thiserror::Error;

/// Compass Gateway error taxonomy
///
/// One variant per pipeline stage. Every stage fails closed: no variant is
/// ever substituted with a guessed or cached value, and none is retried
/// inside the pipeline. Upstream status and body are retained for operator
/// diagnosis; secret material never flows into any variant.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Authentication failed: upstream returned {status}: {body}")]
    Authentication { status: StatusCode, body: String },

    #[error("Identity resolution failed: upstream returned {status}: {body}")]
    IdentityResolution { status: StatusCode, body: String },

    #[error("Credential vending failed: upstream returned {status}: {body}")]
    CredentialVend { status: StatusCode, body: String },

    #[error("Signing error: {0}")]
    Signing(String),

    #[error("Model invocation failed: upstream returned {status}: {body}")]
    InferenceCall { status: StatusCode, body: String },

    #[error("Malformed model response: {0}")]
    MalformedResponse(String),

    #[error("HTTP transport error: {0}")]
    Http(#[from] reqwest::Error),
}

impl Error {
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// A required configuration key is absent.
    pub fn missing_key(key: &str) -> Self {
        Self::configuration(format!("missing required key \"{key}\""))
    }

    /// A configuration key is present but fails validation.
    pub fn invalid_key(key: &str) -> Self {
        Self::configuration(format!("invalid value for key \"{key}\""))
    }

    pub fn signing(message: impl Into<String>) -> Self {
        Self::Signing(message.into())
    }

    pub fn malformed_response(message: impl Into<String>) -> Self {
        Self::MalformedResponse(message.into())
    }
}

impl From<config::ConfigError> for Error {
    fn from(err: config::ConfigError) -> Self {
        Self::configuration(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
