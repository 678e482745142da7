// src/services/auth.rs

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde_json::json;
use thiserror::Error;

use crate::models::auth::{AuthSession, AuthUser};

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Invalid or expired session")]
    Unauthorized,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Could not reach the auth provider: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Unexpected auth provider response: {0}")]
    Unexpected(StatusCode),
}

/// Operações que o site consome do provedor de autenticação hospedado.
/// Uma tentativa por chamada, sem retry.
#[async_trait]
pub trait AuthProvider: Send + Sync + 'static {
    async fn get_user(&self, access_token: &str) -> Result<AuthUser, AuthError>;

    async fn refresh_session(&self, refresh_token: &str) -> Result<AuthSession, AuthError>;

    async fn sign_in_with_password(&self, email: &str, password: &str) -> Result<AuthSession, AuthError>;

    async fn sign_out(&self, access_token: &str) -> Result<(), AuthError>;
}

// Cliente REST para um provedor compatível com GoTrue (`/auth/v1/...`).
#[derive(Clone)]
pub struct HostedAuthClient {
    http: reqwest::Client,
    base_url: String,
    anon_key: String,
}

impl HostedAuthClient {
    pub fn new(base_url: &str, anon_key: &str) -> Result<Self, AuthError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(5))
            .build()?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            anon_key: anon_key.to_string(),
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/auth/v1/{}", self.base_url, path)
    }

    async fn token_grant(&self, grant_type: &str, body: serde_json::Value) -> Result<AuthSession, AuthError> {
        let response = self
            .http
            .post(self.endpoint("token"))
            .query(&[("grant_type", grant_type)])
            .header("apikey", &self.anon_key)
            .json(&body)
            .send()
            .await?;

        match response.status() {
            status if status.is_success() => Ok(response.json::<AuthSession>().await?),
            // O provedor responde 400 para refresh token revogado e senha errada
            StatusCode::BAD_REQUEST | StatusCode::UNAUTHORIZED if grant_type == "password" => {
                Err(AuthError::InvalidCredentials)
            }
            StatusCode::BAD_REQUEST | StatusCode::UNAUTHORIZED => Err(AuthError::Unauthorized),
            status => Err(AuthError::Unexpected(status)),
        }
    }
}

#[async_trait]
impl AuthProvider for HostedAuthClient {
    async fn get_user(&self, access_token: &str) -> Result<AuthUser, AuthError> {
        let response = self
            .http
            .get(self.endpoint("user"))
            .header("apikey", &self.anon_key)
            .bearer_auth(access_token)
            .send()
            .await?;

        match response.status() {
            status if status.is_success() => Ok(response.json::<AuthUser>().await?),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(AuthError::Unauthorized),
            status => Err(AuthError::Unexpected(status)),
        }
    }

    async fn refresh_session(&self, refresh_token: &str) -> Result<AuthSession, AuthError> {
        self.token_grant("refresh_token", json!({ "refresh_token": refresh_token }))
            .await
    }

    async fn sign_in_with_password(&self, email: &str, password: &str) -> Result<AuthSession, AuthError> {
        self.token_grant("password", json!({ "email": email, "password": password }))
            .await
    }

    async fn sign_out(&self, access_token: &str) -> Result<(), AuthError> {
        let response = self
            .http
            .post(self.endpoint("logout"))
            .header("apikey", &self.anon_key)
            .bearer_auth(access_token)
            .send()
            .await?;

        match response.status() {
            // Token já expirado também conta como sessão encerrada
            status if status.is_success() => Ok(()),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Ok(()),
            status => Err(AuthError::Unexpected(status)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_ignores_trailing_slash_in_base_url() {
        let client = HostedAuthClient::new("https://auth.example.com/", "anon").unwrap();
        assert_eq!(client.endpoint("user"), "https://auth.example.com/auth/v1/user");
    }

    #[tokio::test]
    async fn unreachable_provider_is_a_transport_error() {
        let client = HostedAuthClient::new("http://127.0.0.1:1", "anon").unwrap();
        let err = client.get_user("token").await.unwrap_err();
        assert!(matches!(err, AuthError::Transport(_)));
    }
}
