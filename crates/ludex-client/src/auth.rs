use reqwest::{Client, Url};
use serde::Deserialize;

use ludex_core::config::HttpConfig;
use ludex_core::error::AppError;
use ludex_core::traits::TokenProvider;

/// Default Twitch OAuth2 token endpoint.
pub const DEFAULT_TOKEN_URL: &str = "https://id.twitch.tv/oauth2/token";

/// Response body of the token endpoint.
#[derive(Deserialize, Debug)]
struct TokenResponse {
    access_token: String,
}

/// Token supplier using the Twitch OAuth2 client-credentials grant.
///
/// IGDB authenticates through Twitch: an application exchanges its client
/// id and secret for a short-lived app access token, which is then sent as
/// a bearer token alongside the `Client-ID` header.
///
/// Every failure here is an [`AppError::Auth`]: token acquisition is fatal
/// and aborts the harvest before any fetch.
#[derive(Clone)]
pub struct TwitchAuth {
    client: Client,
    token_url: Url,
    client_id: String,
    client_secret: String,
}

impl TwitchAuth {
    /// Creates a token supplier against the production Twitch endpoint.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Client` if the HTTP client cannot be built.
    pub fn new(client_id: String, client_secret: String) -> Result<Self, AppError> {
        Self::with_token_url(client_id, client_secret, DEFAULT_TOKEN_URL)
    }

    /// Creates a token supplier against a custom token endpoint.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Generic` if the URL is invalid or malformed.
    /// Returns `AppError::Client` if the HTTP client cannot be built.
    pub fn with_token_url(
        client_id: String,
        client_secret: String,
        token_url_str: &str,
    ) -> Result<Self, AppError> {
        let token_url = Url::parse(token_url_str)
            .map_err(|_| AppError::Generic(format!("Invalid token URL: {}", token_url_str)))?;

        let http_config = HttpConfig::default();
        let client = Client::builder()
            .user_agent(http_config.user_agent)
            .timeout(http_config.timeout)
            .build()?;

        Ok(Self {
            client,
            token_url,
            client_id,
            client_secret,
        })
    }
}

impl TokenProvider for TwitchAuth {
    async fn token(&self) -> Result<String, AppError> {
        let resp = self
            .client
            .post(self.token_url.clone())
            .query(&[
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
                ("grant_type", "client_credentials"),
            ])
            .send()
            .await
            .map_err(|e| AppError::Auth(format!("token endpoint unreachable: {e}")))?;

        if !resp.status().is_success() {
            return Err(AppError::Auth(format!(
                "token request rejected: HTTP {}",
                resp.status()
            )));
        }

        let body: TokenResponse = resp
            .json()
            .await
            .map_err(|e| AppError::Auth(format!("malformed token response: {e}")))?;

        Ok(body.access_token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_with_valid_endpoint() {
        let auth = TwitchAuth::new("id".to_string(), "secret".to_string());
        assert!(auth.is_ok());
    }

    #[test]
    fn test_new_with_invalid_endpoint() {
        let result =
            TwitchAuth::with_token_url("id".to_string(), "secret".to_string(), "not a url");
        assert!(result.is_err());
    }

    #[test]
    fn test_token_response_deserialization() {
        let json = r#"{
            "access_token": "abc123",
            "expires_in": 5184000,
            "token_type": "bearer"
        }"#;

        let body: TokenResponse = serde_json::from_str(json).unwrap();
        assert_eq!(body.access_token, "abc123");
    }
}
