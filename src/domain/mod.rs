//! Domain types for the inference pipeline
//!
//! Validated newtypes for configuration identifiers and pipeline values, plus
//! the secret-bearing credential types. Validation happens at the boundary so
//! the pipeline itself only ever handles well-formed values.

pub mod credentials;
pub mod types;

pub use credentials::{IdentityToken, Password, SecretAccessKey, TemporaryCredential};
pub use types::{
    AppClientId, AwsRegion, FederatedIdentity, IdentityPoolId, ModelFamily, ModelId, ModelReply,
    UserPoolId, Username,
};
