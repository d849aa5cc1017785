//! OAuth 身份提供方
//!
//! 目前只有 Google (OpenID Connect)。授权码换 token、再取 userinfo，
//! 两步都在 spawn_blocking 中用 ureq 完成。

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;
use ureq::Agent;

use crate::config::AuthConfig;
use crate::errors::{BlogError, Result};

const OAUTH_TIMEOUT_SECS: u64 = 10;
const OAUTH_SCOPES: &str = "openid email profile";

/// 提供方返回的用户信息
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct IdentityUser {
    pub email: String,
    #[serde(default)]
    pub email_verified: bool,
    #[serde(default)]
    pub name: Option<String>,
}

#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// 浏览器跳转用的授权地址
    fn authorize_url(&self, state: &str) -> Result<String>;

    /// 用授权码换取用户信息
    async fn exchange(&self, code: &str) -> Result<IdentityUser>;
}

pub fn identity_from_config(config: &AuthConfig) -> Arc<dyn IdentityProvider> {
    Arc::new(GoogleProvider::new(config))
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
}

pub struct GoogleProvider {
    agent: Agent,
    client_id: String,
    client_secret: String,
    redirect_url: String,
    authorize_endpoint: String,
    token_endpoint: String,
    userinfo_endpoint: String,
}

impl GoogleProvider {
    pub fn new(config: &AuthConfig) -> Self {
        let agent: Agent = Agent::config_builder()
            .timeout_global(Some(Duration::from_secs(OAUTH_TIMEOUT_SECS)))
            .build()
            .into();

        Self {
            agent,
            client_id: config.google_client_id.clone(),
            client_secret: config.google_client_secret.clone(),
            redirect_url: config.redirect_url.clone(),
            authorize_endpoint: config.authorize_url.clone(),
            token_endpoint: config.token_url.clone(),
            userinfo_endpoint: config.userinfo_url.clone(),
        }
    }

    fn ensure_configured(&self) -> Result<()> {
        if self.client_id.is_empty() || self.client_secret.is_empty() {
            return Err(BlogError::service_unavailable(
                "OAuth client is not configured.",
            ));
        }
        Ok(())
    }

    fn exchange_sync(
        agent: Agent,
        token_endpoint: String,
        userinfo_endpoint: String,
        form: [(&'static str, String); 5],
    ) -> Result<IdentityUser> {
        let token: TokenResponse = agent
            .post(&token_endpoint)
            .send_form(form.iter().map(|(k, v)| (*k, v.as_str())))
            .map_err(|e| BlogError::external_service(format!("Token exchange failed: {}", e)))?
            .into_body()
            .read_json()
            .map_err(|e| BlogError::external_service(format!("Invalid token response: {}", e)))?;

        agent
            .get(&userinfo_endpoint)
            .header("Authorization", &format!("Bearer {}", token.access_token))
            .call()
            .map_err(|e| BlogError::external_service(format!("Userinfo request failed: {}", e)))?
            .into_body()
            .read_json::<IdentityUser>()
            .map_err(|e| BlogError::external_service(format!("Invalid userinfo response: {}", e)))
    }
}

#[async_trait]
impl IdentityProvider for GoogleProvider {
    fn authorize_url(&self, state: &str) -> Result<String> {
        self.ensure_configured()?;
        let url = url::Url::parse_with_params(
            &self.authorize_endpoint,
            &[
                ("client_id", self.client_id.as_str()),
                ("redirect_uri", self.redirect_url.as_str()),
                ("response_type", "code"),
                ("scope", OAUTH_SCOPES),
                ("state", state),
                ("prompt", "select_account"),
            ],
        )
        .map_err(|e| BlogError::validation(format!("Invalid authorize URL: {}", e)))?;
        Ok(url.into())
    }

    async fn exchange(&self, code: &str) -> Result<IdentityUser> {
        self.ensure_configured()?;

        let agent = self.agent.clone();
        let token_endpoint = self.token_endpoint.clone();
        let userinfo_endpoint = self.userinfo_endpoint.clone();
        let form = [
            ("code", code.to_string()),
            ("client_id", self.client_id.clone()),
            ("client_secret", self.client_secret.clone()),
            ("redirect_uri", self.redirect_url.clone()),
            ("grant_type", "authorization_code".to_string()),
        ];

        let user = tokio::task::spawn_blocking(move || {
            Self::exchange_sync(agent, token_endpoint, userinfo_endpoint, form)
        })
        .await
        .map_err(|e| BlogError::external_service(format!("OAuth task failed: {}", e)))??;

        debug!("OAuth exchange returned {}", user.email);
        Ok(user)
    }
}
