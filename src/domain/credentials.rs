//! Secret-bearing credential types
//!
//! These types carry material that must never reach logs or error output, so
//! their `Debug` impls redact the inner value. They are deliberately not
//! nutype newtypes: the derived `Debug` would print the secret.
//!
//! Single use is enforced by ownership. The pipeline moves each value into
//! the step that consumes it, so a token or credential cannot be reused or
//! cached across invocations without the compiler objecting.

use std::fmt;

const REDACTED: &str = "<redacted>";

/// Long-lived directory password
///
/// Supplied via configuration; consumed once by the authentication step.
/// Never serialized, never logged, never placed in an outbound header to the
/// model provider.
#[derive(Clone)]
pub struct Password(String);

impl Password {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Expose the secret for the one wire call that needs it.
    pub(crate) fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Password").field(&REDACTED).finish()
    }
}

/// Short-lived bearer token proving an authenticated directory identity
///
/// Produced by the authentication step and consumed exactly once to build the
/// identity-pool logins mapping. Dropped at the end of the invocation.
pub struct IdentityToken(String);

impl IdentityToken {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Consume the token, yielding the bearer string for the logins mapping.
    pub(crate) fn into_bearer(self) -> String {
        self.0
    }
}

impl fmt::Debug for IdentityToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("IdentityToken").field(&REDACTED).finish()
    }
}

/// Temporary secret access key from the credential vendor
pub struct SecretAccessKey(String);

impl SecretAccessKey {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub(crate) fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for SecretAccessKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("SecretAccessKey").field(&REDACTED).finish()
    }
}

/// Scoped, time-bounded access credential triple
///
/// Valid only for the identity it was vended to and only for the duration the
/// service granted. The pipeline assumes nothing about the expiry and never
/// persists the triple beyond the current invocation; the signer consumes it
/// by value.
#[derive(Debug)]
pub struct TemporaryCredential {
    pub access_key_id: String,
    pub secret_access_key: SecretAccessKey,
    pub session_token: String,
}

impl TemporaryCredential {
    pub fn new(
        access_key_id: impl Into<String>,
        secret_access_key: impl Into<String>,
        session_token: impl Into<String>,
    ) -> Self {
        Self {
            access_key_id: access_key_id.into(),
            secret_access_key: SecretAccessKey::new(secret_access_key),
            session_token: session_token.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_debug_is_redacted() {
        let password = Password::new("hunter2");
        let rendered = format!("{password:?}");
        assert!(!rendered.contains("hunter2"));
        assert!(rendered.contains("<redacted>"));
    }

    #[test]
    fn test_identity_token_debug_is_redacted() {
        let token = IdentityToken::new("eyJraWQiOiJleGFtcGxlIn0");
        let rendered = format!("{token:?}");
        assert!(!rendered.contains("eyJraWQ"));
        assert!(rendered.contains("<redacted>"));
    }

    #[test]
    fn test_temporary_credential_debug_redacts_secret_key() {
        let credential = TemporaryCredential::new("ASIAEXAMPLE", "secret-key-material", "token");
        let rendered = format!("{credential:?}");
        assert!(rendered.contains("ASIAEXAMPLE"));
        assert!(!rendered.contains("secret-key-material"));
    }

    #[test]
    fn test_identity_token_yields_bearer_string() {
        let token = IdentityToken::new("bearer-value");
        assert_eq!(token.into_bearer(), "bearer-value");
    }
}
