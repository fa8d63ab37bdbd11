//! The inference pipeline: credential exchange, signing, model invocation
//!
//! [`InferencePipeline::invoke`] runs a strict linear sequence — authenticate,
//! exchange for a federated identity, vend temporary credentials, build the
//! payload, sign, invoke, extract — with no internal parallelism, retries, or
//! caching. Each step's output is the next step's required input and is moved
//! into it, so the ordering and single-use contracts are enforced by the
//! borrow checker rather than by convention: an invocation is a linear state
//! machine whose transitions are function calls.
//!
//! Concurrency exists only across invocations. The pipeline holds no mutable
//! state; a single instance can serve simultaneous calls, each minting its
//! own token, identity, and credentials. Dropping the returned future
//! abandons the in-flight HTTP call; anything already vended simply expires.

pub mod cognito;
pub mod constants;
pub mod payload;
pub mod sigv4;

use crate::config::Settings;
use crate::domain::{AwsRegion, ModelId, ModelReply};
use crate::error::{Error, Result};
use crate::log_messages::pipeline as log;
use bytes::Bytes;
use chrono::Utc;
use cognito::{CognitoAuthenticator, CredentialVendor, IdentityExchanger, ProviderLogins};
use constants::headers;
use http::Method;
use sigv4::Sigv4Signer;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

/// Remote service endpoints, overridable for testing
#[derive(Debug, Clone)]
pub struct Endpoints {
    pub user_pool: String,
    pub identity_pool: String,
    pub bedrock: String,
}

impl Endpoints {
    /// Production endpoints for `region`.
    pub fn for_region(region: &AwsRegion) -> Self {
        Self {
            user_pool: cognito::user_pool_endpoint(region),
            identity_pool: cognito::identity_pool_endpoint(region),
            bedrock: format!("https://bedrock-runtime.{}.amazonaws.com", region.as_ref()),
        }
    }
}

/// Model-invoke URL with the model id percent-encoded into the path.
fn invoke_url(bedrock_base: &str, model_id: &ModelId) -> String {
    format!(
        "{}/model/{}/invoke",
        bedrock_base.trim_end_matches('/'),
        urlencoding::encode(model_id.as_ref())
    )
}

/// Orchestrates one signed model invocation per call
pub struct InferencePipeline {
    settings: Arc<Settings>,
    authenticator: CognitoAuthenticator,
    exchanger: IdentityExchanger,
    vendor: CredentialVendor,
    signer: Sigv4Signer,
    http: reqwest::Client,
    invoke_url: String,
}

impl InferencePipeline {
    /// Build a pipeline against the production endpoints for the configured
    /// region.
    pub fn new(settings: Arc<Settings>) -> Result<Self> {
        let endpoints = Endpoints::for_region(&settings.aws.region);
        Self::with_endpoints(settings, endpoints)
    }

    /// Build a pipeline against explicit endpoints (for testing).
    pub fn with_endpoints(settings: Arc<Settings>, endpoints: Endpoints) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.http.timeout_secs))
            .build()?;

        let authenticator = CognitoAuthenticator::with_endpoint(
            http.clone(),
            endpoints.user_pool,
            settings.cognito.app_client_id.clone(),
        );
        let exchanger = IdentityExchanger::with_endpoint(
            http.clone(),
            endpoints.identity_pool.clone(),
            settings.cognito.identity_pool_id.clone(),
        );
        let vendor = CredentialVendor::with_endpoint(http.clone(), endpoints.identity_pool);
        let signer = Sigv4Signer::new(settings.aws.region.clone());
        let invoke_url = invoke_url(&endpoints.bedrock, &settings.bedrock.model_id);

        Ok(Self {
            settings,
            authenticator,
            exchanger,
            vendor,
            signer,
            http,
            invoke_url,
        })
    }

    /// Run the full pipeline for one user message.
    ///
    /// Fails closed at the first unsuccessful step; the typed error
    /// propagates to the caller unchanged. The caller is responsible for
    /// mapping it to a generic user-facing message.
    pub async fn invoke(&self, message: &str, context: &str) -> Result<ModelReply> {
        let cognito = &self.settings.cognito;

        info!("{}", log::AUTHENTICATING);
        let token = self
            .authenticator
            .authenticate(&cognito.username, &cognito.password)
            .await?;
        debug!("{}", log::AUTHENTICATED);

        // One logins mapping per invocation; the token is consumed here and
        // the same mapping is presented to both identity-pool calls.
        let logins = ProviderLogins::new(&self.settings.aws.region, &cognito.user_pool_id, token);

        info!("{}", log::EXCHANGING_IDENTITY);
        let identity = self.exchanger.exchange_for_identity(&logins).await?;
        debug!("{}", log::IDENTITY_OBTAINED);

        info!("{}", log::VENDING_CREDENTIALS);
        let credential = self.vendor.vend_credentials(identity, &logins).await?;
        debug!("{}", log::CREDENTIALS_OBTAINED);

        let body = payload::build_payload(
            self.settings.bedrock.family,
            &self.settings.generation,
            message,
            context,
        )?;
        let signed = self.signer.sign(
            Method::POST,
            &self.invoke_url,
            &[(headers::CONTENT_TYPE, headers::CONTENT_TYPE_JSON)],
            Bytes::from(body),
            credential,
            Utc::now(),
        )?;

        info!(model_id = %self.settings.bedrock.model_id, "{}", log::INVOKING_MODEL);
        let (method, url, request_headers, body) = signed.into_parts();
        let response = self
            .http
            .request(method, url)
            .headers(request_headers)
            .body(body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;
        if !status.is_success() {
            return Err(Error::InferenceCall { status, body: text });
        }

        let reply = payload::parse_reply(self.settings.bedrock.family, text.as_bytes())?;
        debug!("{}", log::REPLY_EXTRACTED);
        Ok(reply)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoints_for_region() {
        let endpoints = Endpoints::for_region(&AwsRegion::try_new("ap-southeast-2").unwrap());
        assert_eq!(
            endpoints.user_pool,
            "https://cognito-idp.ap-southeast-2.amazonaws.com/"
        );
        assert_eq!(
            endpoints.identity_pool,
            "https://cognito-identity.ap-southeast-2.amazonaws.com/"
        );
        assert_eq!(
            endpoints.bedrock,
            "https://bedrock-runtime.ap-southeast-2.amazonaws.com"
        );
    }

    #[test]
    fn test_invoke_url_percent_encodes_model_id() {
        let model_id = ModelId::try_new("anthropic.claude-3-haiku-20240307-v1:0").unwrap();
        assert_eq!(
            invoke_url("https://bedrock-runtime.us-east-1.amazonaws.com", &model_id),
            "https://bedrock-runtime.us-east-1.amazonaws.com/model/anthropic.claude-3-haiku-20240307-v1%3A0/invoke"
        );
    }
}
