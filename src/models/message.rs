// src/models/message.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::models::content::blank_as_none;

// Mensagem enviada pelo formulário de contato do site
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ContactMessage {
    pub id: Uuid,
    pub full_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub subject: Option<String>,
    pub body: String,
    // Idioma da página em que a mensagem foi escrita
    pub locale: String,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewContactMessage {
    #[validate(length(min = 2, max = 120, message = "Please tell us your name."))]
    #[schema(example = "Layla Haddad")]
    pub full_name: String,
    #[validate(email(message = "The e-mail address is invalid."))]
    #[schema(example = "layla@example.com")]
    pub email: String,
    #[validate(length(max = 30, message = "The phone number is too long."))]
    #[serde(default, deserialize_with = "blank_as_none")]
    pub phone: Option<String>,
    #[validate(length(max = 200, message = "The subject is too long."))]
    #[serde(default, deserialize_with = "blank_as_none")]
    pub subject: Option<String>,
    #[validate(length(min = 5, max = 5000, message = "The message must have between 5 and 5000 characters."))]
    pub body: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct ContactPageQuery {
    pub sent: Option<bool>,
}
