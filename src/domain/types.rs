//! Validated newtypes for pipeline identifiers and values
//!
//! Newtypes avoid primitive obsession and push validation to the
//! configuration boundary: once constructed, a value is known well-formed.

use nutype::nutype;
#[allow(unused_imports)] // These are used by nutype derive macros
use serde::{Deserialize, Serialize};

/// AWS region, e.g. `ap-southeast-2`
#[nutype(
    sanitize(trim, lowercase),
    validate(not_empty, regex = r"^[a-z]{2}-[a-z]+-\d{1}$"),
    derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, AsRef, Display)
)]
pub struct AwsRegion(String);

/// Bedrock model identifier, e.g. `anthropic.claude-3-haiku-20240307-v1:0`
#[nutype(
    sanitize(trim),
    validate(not_empty),
    derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, AsRef, Display)
)]
pub struct ModelId(String);

/// Cognito identity pool id, `{region}:{uuid}`
#[nutype(
    sanitize(trim),
    validate(not_empty, regex = r"^[a-z]{2}-[a-z]+-\d{1}:[0-9a-fA-F-]+$"),
    derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, AsRef, Display)
)]
pub struct IdentityPoolId(String);

/// Cognito user pool id, `{region}_{suffix}`
#[nutype(
    sanitize(trim),
    validate(not_empty, regex = r"^[a-z]{2}-[a-z]+-\d{1}_[a-zA-Z0-9]+$"),
    derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, AsRef, Display)
)]
pub struct UserPoolId(String);

/// Cognito app client id
#[nutype(
    sanitize(trim),
    validate(not_empty),
    derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, AsRef, Display)
)]
pub struct AppClientId(String);

/// Directory username for the pipeline's service identity
#[nutype(
    sanitize(trim),
    validate(not_empty),
    derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, AsRef, Display)
)]
pub struct Username(String);

/// Anonymous pool-scoped identity handle returned by the identity pool
///
/// Produced by the identity exchange and consumed exactly once by the
/// credential vendor. Not a secret; it carries no authority on its own.
#[nutype(
    sanitize(trim),
    validate(not_empty),
    derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, AsRef, Display)
)]
pub struct FederatedIdentity(String);

/// Final textual model answer
///
/// `not_empty` makes "invoke never silently returns an empty string" a type
/// invariant: an empty extraction fails construction and surfaces as a
/// malformed-response error instead.
#[nutype(
    validate(not_empty),
    derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, AsRef, Display)
)]
pub struct ModelReply(String);

/// Supported Bedrock model families
///
/// A closed set resolved once at configuration time. Requests never route on
/// model-id substrings; an id outside these families is rejected when
/// settings load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelFamily {
    /// Anthropic Claude models
    Claude,
    /// Amazon Nova models
    Nova,
}

impl ModelFamily {
    /// Resolve the family from a model id, ignoring any cross-region
    /// inference prefix (`us.`, `eu.`, `apac.`).
    pub fn from_model_id(model_id: &ModelId) -> Option<Self> {
        let id = model_id.as_ref();
        let vendor_id = id
            .strip_prefix("us.")
            .or_else(|| id.strip_prefix("eu."))
            .or_else(|| id.strip_prefix("apac."))
            .unwrap_or(id);

        if vendor_id.starts_with("anthropic.") {
            Some(Self::Claude)
        } else if vendor_id.starts_with("amazon.nova") {
            Some(Self::Nova)
        } else {
            None
        }
    }
}
