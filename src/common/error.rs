// src/common/error.rs

use axum::{
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::{common::locale::Locale, middleware::session::login_path, services::auth::AuthError};

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error")]
    ValidationError(#[from] validator::ValidationErrors),

    // Entidade pedida no portal não existe
    #[error("Not found")]
    NotFound(Locale),

    // Sem sessão: volta para o login
    #[error("Authentication required")]
    AuthFailure(Locale),

    #[error("Invalid credentials")]
    InvalidCredentials(Locale),

    #[error("Auth provider error: {0}")]
    Auth(#[from] AuthError),

    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),

    #[error("Internal server error: {0}")]
    InternalServerError(#[from] anyhow::Error),
}

pub fn not_found_path(locale: Locale) -> String {
    format!("/{locale}/not-found")
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            // Retorna todos os detalhes da validação
            AppError::ValidationError(errors) => {
                let mut details = std::collections::HashMap::new();
                for (field, field_errors) in errors.field_errors() {
                    let messages: Vec<String> = field_errors
                        .iter()
                        .filter_map(|e| e.message.as_ref().map(|m| m.to_string()))
                        .collect();
                    details.insert(field.to_string(), messages);
                }
                let body = Json(json!({
                    "error": "One or more fields are invalid.",
                    "details": details,
                }));
                return (StatusCode::BAD_REQUEST, body).into_response();
            }
            AppError::NotFound(locale) => return Redirect::to(&not_found_path(locale)).into_response(),
            AppError::AuthFailure(locale) => return Redirect::to(&login_path(locale.as_str())).into_response(),
            AppError::InvalidCredentials(locale) => {
                let to = format!("{}?error=invalid_credentials", login_path(locale.as_str()));
                return Redirect::to(&to).into_response();
            }
            AppError::Auth(AuthError::Transport(ref e)) => {
                tracing::warn!(error = %e, "Provedor de autenticação indisponível");
                (StatusCode::BAD_GATEWAY, "The authentication service is unavailable.")
            }

            // Todos os outros erros viram 500; o detalhe fica só no log.
            ref e => {
                tracing::error!("Internal server error: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "An unexpected error occurred.")
            }
        };

        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}
