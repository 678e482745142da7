// src/services/session.rs

use std::sync::Arc;

use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};

use crate::{
    models::auth::{AuthSession, AuthUser},
    services::auth::{AuthError, AuthProvider},
};

// Nomes dos cookies da sessão, derivados de um prefixo configurável.
#[derive(Debug, Clone)]
pub struct CookieSettings {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_at: String,
    pub secure: bool,
}

impl CookieSettings {
    pub fn new(prefix: &str, secure: bool) -> Self {
        Self {
            access_token: format!("{prefix}-access-token"),
            refresh_token: format!("{prefix}-refresh-token"),
            expires_at: format!("{prefix}-expires-at"),
            secure,
        }
    }

    fn all_names(&self) -> [&str; 3] {
        [&self.access_token, &self.refresh_token, &self.expires_at]
    }
}

/// Alteração de cookie que precisa chegar na requisição repassada e na resposta.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CookieMutation {
    Set { name: String, value: String },
    Remove { name: String },
}

impl CookieMutation {
    pub fn name(&self) -> &str {
        match self {
            CookieMutation::Set { name, .. } | CookieMutation::Remove { name } => name,
        }
    }

    pub fn to_cookie(&self, settings: &CookieSettings) -> Cookie<'static> {
        match self {
            CookieMutation::Set { name, value } => Cookie::build((name.clone(), value.clone()))
                .path("/")
                .http_only(true)
                .same_site(SameSite::Lax)
                .secure(settings.secure)
                .build(),
            CookieMutation::Remove { name } => {
                let mut cookie = Cookie::build((name.clone(), "")).path("/").build();
                cookie.make_removal();
                cookie
            }
        }
    }
}

// O que os cookies da requisição dizem sobre a sessão. Não interpretamos os tokens.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoredSession {
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
    pub expires_at: Option<i64>,
}

impl StoredSession {
    pub fn from_jar(jar: &CookieJar, settings: &CookieSettings) -> Option<Self> {
        let value = |name: &str| jar.get(name).map(|c| c.value().to_string()).filter(|v| !v.is_empty());

        let session = Self {
            access_token: value(&settings.access_token),
            refresh_token: value(&settings.refresh_token),
            expires_at: value(&settings.expires_at).and_then(|v| v.parse().ok()),
        };

        if session.access_token.is_none() && session.refresh_token.is_none() {
            return None;
        }
        Some(session)
    }

    /// Só dá pra renovar com refresh token; sem `expires_at` assumimos expirado.
    pub fn needs_refresh(&self, now: i64, margin: i64) -> bool {
        self.refresh_token.is_some()
            && (self.access_token.is_none() || self.expires_at.is_none_or(|exp| exp - now <= margin))
    }
}

/// Resultado de "quem é o usuário atual?": o usuário e as escritas de cookie
/// que a consulta gerou (refresh de token ou limpeza da sessão).
#[derive(Debug, Default)]
pub struct UserLookup {
    pub user: Option<AuthUser>,
    pub mutations: Vec<CookieMutation>,
}

impl UserLookup {
    fn anonymous() -> Self {
        Self::default()
    }
}

#[derive(Clone)]
pub struct SessionClient {
    provider: Arc<dyn AuthProvider>,
    settings: CookieSettings,
    refresh_margin: i64,
}

impl SessionClient {
    pub fn new(provider: Arc<dyn AuthProvider>, settings: CookieSettings, refresh_margin: i64) -> Self {
        Self { provider, settings, refresh_margin }
    }

    pub fn settings(&self) -> &CookieSettings {
        &self.settings
    }

    // Qualquer falha do provedor vira "sem usuário": rotas protegidas negam acesso.
    pub async fn current_user(&self, jar: &CookieJar, now: i64) -> UserLookup {
        let Some(stored) = StoredSession::from_jar(jar, &self.settings) else {
            return UserLookup::anonymous();
        };

        let mut mutations = Vec::new();
        let mut access_token = stored.access_token.clone();

        if stored.needs_refresh(now, self.refresh_margin) {
            let refresh_token = stored.refresh_token.as_deref().unwrap_or_default();
            match self.provider.refresh_session(refresh_token).await {
                Ok(session) => {
                    tracing::debug!("Sessão renovada pelo provedor");
                    mutations = self.session_cookies(&session, now);
                    // A resposta do refresh normalmente já traz o usuário
                    if let Some(user) = session.user {
                        return UserLookup { user: Some(user), mutations };
                    }
                    access_token = Some(session.access_token);
                }
                Err(AuthError::Unauthorized) => {
                    tracing::debug!("Refresh token rejeitado, limpando cookies da sessão");
                    return UserLookup { user: None, mutations: self.clear_cookies() };
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Falha ao renovar a sessão; tratando como anônimo");
                    return UserLookup::anonymous();
                }
            }
        }

        let Some(access_token) = access_token else {
            return UserLookup { user: None, mutations };
        };

        match self.provider.get_user(&access_token).await {
            Ok(user) => UserLookup { user: Some(user), mutations },
            Err(AuthError::Unauthorized) => UserLookup { user: None, mutations },
            Err(e) => {
                tracing::warn!(error = %e, "Falha ao consultar o usuário atual; tratando como anônimo");
                UserLookup { user: None, mutations }
            }
        }
    }

    pub async fn sign_in(&self, email: &str, password: &str, now: i64) -> Result<Vec<CookieMutation>, AuthError> {
        let session = self.provider.sign_in_with_password(email, password).await?;
        Ok(self.session_cookies(&session, now))
    }

    // Encerramento best-effort: os cookies são limpos mesmo se o provedor falhar.
    pub async fn sign_out(&self, jar: &CookieJar) -> Vec<CookieMutation> {
        if let Some(access_token) = StoredSession::from_jar(jar, &self.settings).and_then(|s| s.access_token) {
            if let Err(e) = self.provider.sign_out(&access_token).await {
                tracing::warn!(error = %e, "Falha ao encerrar a sessão no provedor");
            }
        }
        self.clear_cookies()
    }

    pub fn session_cookies(&self, session: &AuthSession, now: i64) -> Vec<CookieMutation> {
        vec![
            CookieMutation::Set {
                name: self.settings.access_token.clone(),
                value: session.access_token.clone(),
            },
            CookieMutation::Set {
                name: self.settings.refresh_token.clone(),
                value: session.refresh_token.clone(),
            },
            CookieMutation::Set {
                name: self.settings.expires_at.clone(),
                value: session.expires_at_or(now).to_string(),
            },
        ]
    }

    pub fn clear_cookies(&self) -> Vec<CookieMutation> {
        self.settings
            .all_names()
            .into_iter()
            .map(|name| CookieMutation::Remove { name: name.to_string() })
            .collect()
    }
}
