//! Google OpenID Connect: consent URL, code exchange and profile fetch

use arena_common::OAuthConfig;
use arena_core::traits::{ExternalIdentity, IdentityProvider, PortResult};
use arena_core::DomainError;
use async_trait::async_trait;
use reqwest::Url;
use serde::Deserialize;
use tracing::{debug, instrument};

const AUTHORIZE_URL: &str = "https://accounts.google.com/o/oauth2/v2/auth";
const TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
const USERINFO_URL: &str = "https://openidconnect.googleapis.com/v1/userinfo";
const SCOPES: &str = "openid email profile";

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Deserialize)]
struct UserInfo {
    sub: String,
    email: Option<String>,
    name: Option<String>,
}

/// Google-backed [`IdentityProvider`]
pub struct GoogleIdentityProvider {
    client: reqwest::Client,
    config: OAuthConfig,
}

impl GoogleIdentityProvider {
    pub fn new(config: OAuthConfig) -> reqwest::Result<Self> {
        Ok(Self {
            client: super::http_client()?,
            config,
        })
    }
}

fn upstream(context: &str, err: impl std::fmt::Display) -> DomainError {
    DomainError::UpstreamError(format!("{context}: {err}"))
}

#[async_trait]
impl IdentityProvider for GoogleIdentityProvider {
    fn authorization_url(&self, state: &str) -> String {
        let params = [
            ("client_id", self.config.client_id.as_str()),
            ("redirect_uri", self.config.redirect_url.as_str()),
            ("response_type", "code"),
            ("scope", SCOPES),
            ("state", state),
            ("access_type", "online"),
            ("prompt", "select_account"),
        ];
        Url::parse_with_params(AUTHORIZE_URL, &params)
            .map(String::from)
            .unwrap_or_else(|_| AUTHORIZE_URL.to_string())
    }

    #[instrument(skip(self, code))]
    async fn exchange_code(&self, code: &str) -> PortResult<ExternalIdentity> {
        let form = [
            ("code", code),
            ("client_id", self.config.client_id.as_str()),
            ("client_secret", self.config.client_secret.as_str()),
            ("redirect_uri", self.config.redirect_url.as_str()),
            ("grant_type", "authorization_code"),
        ];

        let token: TokenResponse = self
            .client
            .post(TOKEN_URL)
            .form(&form)
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(|e| upstream("token exchange", e))?
            .json()
            .await
            .map_err(|e| upstream("token response", e))?;

        let info: UserInfo = self
            .client
            .get(USERINFO_URL)
            .bearer_auth(&token.access_token)
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(|e| upstream("userinfo", e))?
            .json()
            .await
            .map_err(|e| upstream("userinfo response", e))?;

        debug!(subject = %info.sub, "Fetched Google profile");
        Ok(ExternalIdentity {
            subject: info.sub,
            email: info.email,
            name: info.name,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_authorization_url_carries_state_and_scopes() {
        let provider = GoogleIdentityProvider::new(OAuthConfig {
            client_id: "client-1".into(),
            client_secret: "secret".into(),
            redirect_url: "http://localhost:8080/api/v1/auth/google/callback".into(),
        })
        .unwrap();

        let url = Url::parse(&provider.authorization_url("abc123")).unwrap();
        assert_eq!(url.host_str(), Some("accounts.google.com"));
        let query: std::collections::HashMap<_, _> = url.query_pairs().into_owned().collect();
        assert_eq!(query["state"], "abc123");
        assert_eq!(query["scope"], "openid email profile");
        assert_eq!(query["client_id"], "client-1");
        assert_eq!(query["response_type"], "code");
        assert!(!provider.authorization_url("x").contains("secret"));
    }
}
