//! Cognito credential exchange: authentication, identity, temporary credentials
//!
//! Three wire clients for the ordered exchange that turns a username/password
//! pair into temporary scoped AWS credentials:
//!
//! 1. [`CognitoAuthenticator`] — `InitiateAuth` against the user pool
//!    (password grant), yielding a short-lived identity token.
//! 2. [`IdentityExchanger`] — `GetId` against the identity pool, mapping the
//!    token to an anonymous pool-scoped identity. The username/password never
//!    reach this step, severing linkage between pool identity and directory
//!    credentials beyond the token's validity window.
//! 3. [`CredentialVendor`] — `GetCredentialsForIdentity`, yielding the
//!    access-key triple the request signer consumes.
//!
//! All three speak the AWS JSON 1.1 protocol: POST to the service endpoint
//! with an `X-Amz-Target` header naming the operation. None of them retries;
//! every non-success response fails closed with upstream status and body.

use crate::domain::{
    AppClientId, AwsRegion, FederatedIdentity, IdentityPoolId, IdentityToken, Password,
    TemporaryCredential, UserPoolId, Username,
};
use crate::error::{Error, Result};
use crate::pipeline::constants::{amz_targets, headers};
use http::StatusCode;
use serde::{Deserialize, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;

/// Default user-pool (IdP) endpoint for a region.
pub fn user_pool_endpoint(region: &AwsRegion) -> String {
    format!("https://cognito-idp.{}.amazonaws.com/", region.as_ref())
}

/// Default identity-pool endpoint for a region.
pub fn identity_pool_endpoint(region: &AwsRegion) -> String {
    format!("https://cognito-identity.{}.amazonaws.com/", region.as_ref())
}

/// The login-provider mapping presented to the identity pool
///
/// Maps the issuing provider's key (`cognito-idp.{region}.amazonaws.com/{userPoolId}`)
/// to the bearer token. Built once per invocation by consuming the
/// [`IdentityToken`], then presented to both the identity exchange and the
/// credential vend, which must use the same mapping.
pub struct ProviderLogins {
    entries: BTreeMap<String, String>,
}

impl ProviderLogins {
    pub fn new(region: &AwsRegion, user_pool_id: &UserPoolId, token: IdentityToken) -> Self {
        let provider_key = format!(
            "cognito-idp.{}.amazonaws.com/{}",
            region.as_ref(),
            user_pool_id.as_ref()
        );
        let mut entries = BTreeMap::new();
        entries.insert(provider_key, token.into_bearer());
        Self { entries }
    }
}

impl Serialize for ProviderLogins {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.entries.serialize(serializer)
    }
}

// The mapping holds the bearer token; keep it out of debug output.
impl fmt::Debug for ProviderLogins {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderLogins")
            .field("providers", &self.entries.keys().collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}

/// Issue an AWS JSON 1.1 call and return upstream status plus raw body.
async fn post_amz_json<T: Serialize>(
    http: &reqwest::Client,
    endpoint: &str,
    target: &str,
    request: &T,
) -> Result<(StatusCode, String)> {
    let response = http
        .post(endpoint)
        .header(headers::CONTENT_TYPE, headers::CONTENT_TYPE_AMZ_JSON)
        .header(headers::AMZ_TARGET, target)
        .json(request)
        .send()
        .await?;
    let status = response.status();
    let body = response.text().await?;
    Ok((status, body))
}

/// Exchanges a username/password pair for a short-lived identity token
pub struct CognitoAuthenticator {
    http: reqwest::Client,
    endpoint: String,
    client_id: AppClientId,
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct InitiateAuthRequest<'a> {
    auth_flow: &'a str,
    client_id: &'a str,
    auth_parameters: AuthParameters<'a>,
}

#[derive(Serialize)]
struct AuthParameters<'a> {
    #[serde(rename = "USERNAME")]
    username: &'a str,
    #[serde(rename = "PASSWORD")]
    password: &'a str,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct InitiateAuthResponse {
    authentication_result: AuthenticationResult,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct AuthenticationResult {
    id_token: String,
}

impl CognitoAuthenticator {
    pub fn new(http: reqwest::Client, region: &AwsRegion, client_id: AppClientId) -> Self {
        Self::with_endpoint(http, user_pool_endpoint(region), client_id)
    }

    /// Construct against a custom endpoint (for testing).
    pub fn with_endpoint(http: reqwest::Client, endpoint: String, client_id: AppClientId) -> Self {
        Self {
            http,
            endpoint,
            client_id,
        }
    }

    /// Password-grant authentication against the user pool.
    ///
    /// Any non-success status or malformed success envelope fails with
    /// `Error::Authentication`; no retry is attempted.
    pub async fn authenticate(
        &self,
        username: &Username,
        password: &Password,
    ) -> Result<IdentityToken> {
        let request = InitiateAuthRequest {
            auth_flow: "USER_PASSWORD_AUTH",
            client_id: self.client_id.as_ref(),
            auth_parameters: AuthParameters {
                username: username.as_ref(),
                password: password.expose(),
            },
        };

        let (status, body) =
            post_amz_json(&self.http, &self.endpoint, amz_targets::INITIATE_AUTH, &request)
                .await?;
        if !status.is_success() {
            return Err(Error::Authentication { status, body });
        }

        let envelope: InitiateAuthResponse = serde_json::from_str(&body)
            .map_err(|e| Error::Authentication {
                status,
                body: format!("malformed authentication envelope: {e}"),
            })?;
        Ok(IdentityToken::new(
            envelope.authentication_result.id_token,
        ))
    }
}

/// Exchanges an identity token for an anonymous pool-scoped identity
pub struct IdentityExchanger {
    http: reqwest::Client,
    endpoint: String,
    identity_pool_id: IdentityPoolId,
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct GetIdRequest<'a> {
    identity_pool_id: &'a str,
    logins: &'a ProviderLogins,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct GetIdResponse {
    identity_id: String,
}

impl IdentityExchanger {
    pub fn new(
        http: reqwest::Client,
        region: &AwsRegion,
        identity_pool_id: IdentityPoolId,
    ) -> Self {
        Self::with_endpoint(http, identity_pool_endpoint(region), identity_pool_id)
    }

    /// Construct against a custom endpoint (for testing).
    pub fn with_endpoint(
        http: reqwest::Client,
        endpoint: String,
        identity_pool_id: IdentityPoolId,
    ) -> Self {
        Self {
            http,
            endpoint,
            identity_pool_id,
        }
    }

    /// Map the bearer token to a pool-scoped identity id.
    ///
    /// The upstream body is preserved in the error so an expired/invalid
    /// token is distinguishable from a misconfigured pool.
    pub async fn exchange_for_identity(
        &self,
        logins: &ProviderLogins,
    ) -> Result<FederatedIdentity> {
        let request = GetIdRequest {
            identity_pool_id: self.identity_pool_id.as_ref(),
            logins,
        };

        let (status, body) =
            post_amz_json(&self.http, &self.endpoint, amz_targets::GET_ID, &request).await?;
        if !status.is_success() {
            return Err(Error::IdentityResolution { status, body });
        }

        let envelope: GetIdResponse =
            serde_json::from_str(&body).map_err(|e| Error::IdentityResolution {
                status,
                body: format!("malformed identity envelope: {e}"),
            })?;
        FederatedIdentity::try_new(envelope.identity_id).map_err(|_| Error::IdentityResolution {
            status,
            body: "identity envelope contained an empty identity id".to_string(),
        })
    }
}

/// Vends temporary scoped credentials for a federated identity
pub struct CredentialVendor {
    http: reqwest::Client,
    endpoint: String,
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct GetCredentialsRequest<'a> {
    identity_id: &'a str,
    logins: &'a ProviderLogins,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct GetCredentialsResponse {
    credentials: VendedCredentials,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct VendedCredentials {
    access_key_id: String,
    secret_key: String,
    session_token: String,
}

impl CredentialVendor {
    pub fn new(http: reqwest::Client, region: &AwsRegion) -> Self {
        Self::with_endpoint(http, identity_pool_endpoint(region))
    }

    /// Construct against a custom endpoint (for testing).
    pub fn with_endpoint(http: reqwest::Client, endpoint: String) -> Self {
        Self { http, endpoint }
    }

    /// Obtain the temporary access-key triple for `identity`.
    ///
    /// The identity is consumed: credentials are minted per invocation and
    /// the handle has no further use. The caller must not assume any expiry
    /// value for the vended triple.
    pub async fn vend_credentials(
        &self,
        identity: FederatedIdentity,
        logins: &ProviderLogins,
    ) -> Result<TemporaryCredential> {
        let request = GetCredentialsRequest {
            identity_id: identity.as_ref(),
            logins,
        };

        let (status, body) = post_amz_json(
            &self.http,
            &self.endpoint,
            amz_targets::GET_CREDENTIALS,
            &request,
        )
        .await?;
        if !status.is_success() {
            return Err(Error::CredentialVend { status, body });
        }

        let envelope: GetCredentialsResponse =
            serde_json::from_str(&body).map_err(|e| Error::CredentialVend {
                status,
                body: format!("malformed credentials envelope: {e}"),
            })?;
        Ok(TemporaryCredential::new(
            envelope.credentials.access_key_id,
            envelope.credentials.secret_key,
            envelope.credentials.session_token,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn region() -> AwsRegion {
        AwsRegion::try_new("ap-southeast-2").unwrap()
    }

    fn logins() -> ProviderLogins {
        ProviderLogins::new(
            &region(),
            &UserPoolId::try_new("ap-southeast-2_TestPool1").unwrap(),
            IdentityToken::new("test-id-token"),
        )
    }

    #[test]
    fn test_provider_logins_serializes_as_single_entry_map() {
        let value = serde_json::to_value(logins()).unwrap();
        assert_eq!(
            value,
            json!({
                "cognito-idp.ap-southeast-2.amazonaws.com/ap-southeast-2_TestPool1": "test-id-token"
            })
        );
    }

    #[test]
    fn test_provider_logins_debug_hides_token() {
        let rendered = format!("{:?}", logins());
        assert!(!rendered.contains("test-id-token"));
    }

    #[tokio::test]
    async fn test_authenticate_success() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/")
            .match_header("x-amz-target", amz_targets::INITIATE_AUTH)
            .with_status(200)
            .with_body(
                json!({"AuthenticationResult": {"IdToken": "a-token"}}).to_string(),
            )
            .expect(1)
            .create_async()
            .await;

        let authenticator = CognitoAuthenticator::with_endpoint(
            reqwest::Client::new(),
            format!("{}/", server.url()),
            AppClientId::try_new("client-id").unwrap(),
        );
        let token = authenticator
            .authenticate(
                &Username::try_new("svc-user").unwrap(),
                &Password::new("secret"),
            )
            .await
            .unwrap();

        assert_eq!(token.into_bearer(), "a-token");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_authenticate_rejection_is_authentication_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/")
            .with_status(400)
            .with_body(json!({"__type": "NotAuthorizedException"}).to_string())
            .create_async()
            .await;

        let authenticator = CognitoAuthenticator::with_endpoint(
            reqwest::Client::new(),
            format!("{}/", server.url()),
            AppClientId::try_new("client-id").unwrap(),
        );
        let err = authenticator
            .authenticate(
                &Username::try_new("svc-user").unwrap(),
                &Password::new("wrong"),
            )
            .await
            .unwrap_err();

        match err {
            Error::Authentication { status, body } => {
                assert_eq!(status, StatusCode::BAD_REQUEST);
                assert!(body.contains("NotAuthorizedException"));
            }
            other => panic!("expected Authentication error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_authenticate_malformed_envelope_is_authentication_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/")
            .with_status(200)
            .with_body(json!({"ChallengeName": "SMS_MFA"}).to_string())
            .create_async()
            .await;

        let authenticator = CognitoAuthenticator::with_endpoint(
            reqwest::Client::new(),
            format!("{}/", server.url()),
            AppClientId::try_new("client-id").unwrap(),
        );
        let err = authenticator
            .authenticate(
                &Username::try_new("svc-user").unwrap(),
                &Password::new("secret"),
            )
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Authentication { .. }));
    }

    #[tokio::test]
    async fn test_exchange_for_identity_success() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/")
            .match_header("x-amz-target", amz_targets::GET_ID)
            .with_status(200)
            .with_body(json!({"IdentityId": "ap-southeast-2:identity-1"}).to_string())
            .create_async()
            .await;

        let exchanger = IdentityExchanger::with_endpoint(
            reqwest::Client::new(),
            format!("{}/", server.url()),
            IdentityPoolId::try_new("ap-southeast-2:12345678-abcd-ef00-1234-56789abcdef0")
                .unwrap(),
        );
        let identity = exchanger.exchange_for_identity(&logins()).await.unwrap();
        assert_eq!(identity.as_ref(), "ap-southeast-2:identity-1");
    }

    #[tokio::test]
    async fn test_exchange_failure_preserves_upstream_detail() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/")
            .with_status(400)
            .with_body(json!({"__type": "NotAuthorizedException", "message": "Token expired"}).to_string())
            .create_async()
            .await;

        let exchanger = IdentityExchanger::with_endpoint(
            reqwest::Client::new(),
            format!("{}/", server.url()),
            IdentityPoolId::try_new("ap-southeast-2:12345678-abcd-ef00-1234-56789abcdef0")
                .unwrap(),
        );
        let err = exchanger.exchange_for_identity(&logins()).await.unwrap_err();

        match err {
            Error::IdentityResolution { body, .. } => assert!(body.contains("Token expired")),
            other => panic!("expected IdentityResolution error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_vend_credentials_success() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/")
            .match_header("x-amz-target", amz_targets::GET_CREDENTIALS)
            .with_status(200)
            .with_body(
                json!({
                    "Credentials": {
                        "AccessKeyId": "ASIATEST",
                        "SecretKey": "secret",
                        "SessionToken": "session"
                    }
                })
                .to_string(),
            )
            .create_async()
            .await;

        let vendor =
            CredentialVendor::with_endpoint(reqwest::Client::new(), format!("{}/", server.url()));
        let credential = vendor
            .vend_credentials(
                FederatedIdentity::try_new("ap-southeast-2:identity-1").unwrap(),
                &logins(),
            )
            .await
            .unwrap();

        assert_eq!(credential.access_key_id, "ASIATEST");
        assert_eq!(credential.session_token, "session");
    }

    #[tokio::test]
    async fn test_vend_failure_is_credential_vend_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/")
            .with_status(400)
            .with_body(json!({"__type": "ResourceNotFoundException"}).to_string())
            .create_async()
            .await;

        let vendor =
            CredentialVendor::with_endpoint(reqwest::Client::new(), format!("{}/", server.url()));
        let err = vendor
            .vend_credentials(
                FederatedIdentity::try_new("ap-southeast-2:identity-1").unwrap(),
                &logins(),
            )
            .await
            .unwrap_err();

        assert!(matches!(err, Error::CredentialVend { .. }));
    }
}
