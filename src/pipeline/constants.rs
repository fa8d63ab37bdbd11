//! Wire-level constants for the credential exchange and inference calls
//!
//! Centralizes amz target values, header names, JSON field names, and
//! generation defaults so the protocol surface lives in one place.

/// `X-Amz-Target` values for the AWS JSON 1.1 protocol
pub mod amz_targets {
    pub const INITIATE_AUTH: &str = "AWSCognitoIdentityProviderService.InitiateAuth";
    pub const GET_ID: &str = "AWSCognitoIdentityService.GetId";
    pub const GET_CREDENTIALS: &str = "AWSCognitoIdentityService.GetCredentialsForIdentity";
}

/// HTTP header names and values
pub mod headers {
    pub const AMZ_TARGET: &str = "x-amz-target";
    pub const AMZ_DATE: &str = "x-amz-date";
    pub const AMZ_SECURITY_TOKEN: &str = "x-amz-security-token";
    pub const AUTHORIZATION: &str = "authorization";
    pub const HOST: &str = "host";
    pub const CONTENT_TYPE: &str = "content-type";

    pub const CONTENT_TYPE_AMZ_JSON: &str = "application/x-amz-json-1.1";
    pub const CONTENT_TYPE_JSON: &str = "application/json";
}

/// JSON field names in model responses
pub mod json_fields {
    /// Claude (Anthropic messages) response fields
    pub mod claude {
        pub const CONTENT: &str = "content";
        pub const TYPE: &str = "type";
        pub const TEXT: &str = "text";
    }

    /// Nova (messages-v1 schema) response fields
    pub mod nova {
        pub const OUTPUT: &str = "output";
        pub const MESSAGE: &str = "message";
        pub const CONTENT: &str = "content";
        pub const TEXT: &str = "text";
    }
}

/// SigV4 signing constants
pub mod sigv4 {
    pub const ALGORITHM: &str = "AWS4-HMAC-SHA256";
    pub const REQUEST_SUFFIX: &str = "aws4_request";
    pub const SECRET_PREFIX: &str = "AWS4";
    /// Service name Bedrock requests are signed for
    pub const SERVICE: &str = "bedrock";
}

/// Model invocation protocol versions
pub mod protocol {
    pub const ANTHROPIC_VERSION: &str = "bedrock-2023-05-31";
    pub const NOVA_SCHEMA_VERSION: &str = "messages-v1";
}

/// Generation parameter fallbacks (non-critical configuration keys)
pub mod generation_defaults {
    pub const TEMPERATURE: f64 = 0.3;
    pub const TOP_P: f64 = 0.9;
    pub const MAX_TOKENS: u32 = 4096;
}

/// Request timeout fallback, seconds per remote call
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_amz_targets_have_expected_values() {
        assert_eq!(
            amz_targets::INITIATE_AUTH,
            "AWSCognitoIdentityProviderService.InitiateAuth"
        );
        assert_eq!(amz_targets::GET_ID, "AWSCognitoIdentityService.GetId");
        assert_eq!(
            amz_targets::GET_CREDENTIALS,
            "AWSCognitoIdentityService.GetCredentialsForIdentity"
        );
    }

    #[test]
    fn test_header_constants_have_expected_values() {
        assert_eq!(headers::AMZ_DATE, "x-amz-date");
        assert_eq!(headers::AMZ_SECURITY_TOKEN, "x-amz-security-token");
        assert_eq!(headers::CONTENT_TYPE_AMZ_JSON, "application/x-amz-json-1.1");
    }

    #[test]
    fn test_generation_defaults_match_documented_fallbacks() {
        assert_eq!(generation_defaults::TEMPERATURE, 0.3);
        assert_eq!(generation_defaults::TOP_P, 0.9);
        assert_eq!(generation_defaults::MAX_TOKENS, 4096);
    }
}
