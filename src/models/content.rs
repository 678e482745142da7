// src/models/content.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// Campo opcional de formulário HTML: enviado vazio chega como `Some("")`.
/// Vazio (ou só espaços) vira `None` antes da validação.
pub fn blank_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.trim().is_empty()))
}

// --- SERVIÇOS (cards da home e da página de turismo médico) ---

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Service {
    pub id: Uuid,
    #[schema(example = "Dental implants")]
    pub title: String,
    pub description: Option<String>,
    #[schema(example = "tooth")]
    pub icon: Option<String>,
    pub image_url: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ServicePayload {
    #[validate(length(min = 2, max = 120, message = "The title must have between 2 and 120 characters."))]
    pub title: String,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub icon: Option<String>,
    #[validate(url(message = "The image URL is invalid."))]
    #[serde(default, deserialize_with = "blank_as_none")]
    pub image_url: Option<String>,
    #[serde(default)]
    pub is_active: bool,
}

// --- VIAGENS (página de destinos) ---

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Trip {
    pub id: Uuid,
    pub title: String,
    #[schema(example = "Cappadocia")]
    pub destination: String,
    pub description: Option<String>,
    #[schema(example = 5)]
    pub duration_days: i32,
    #[schema(example = 890.0)]
    pub price: Decimal,
    pub image_url: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TripPayload {
    #[validate(length(min = 2, max = 120, message = "The title must have between 2 and 120 characters."))]
    pub title: String,
    #[validate(length(min = 2, message = "The destination is required."))]
    pub destination: String,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub description: Option<String>,
    #[validate(range(min = 1, max = 365, message = "The duration must be between 1 and 365 days."))]
    pub duration_days: i32,
    pub price: Decimal,
    #[validate(url(message = "The image URL is invalid."))]
    #[serde(default, deserialize_with = "blank_as_none")]
    pub image_url: Option<String>,
    #[serde(default)]
    pub is_active: bool,
}

// --- PACOTES (página de programas) ---

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TravelPackage {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
    #[schema(example = "USD")]
    pub currency: String,
    // Um destaque por linha
    pub highlights: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TravelPackagePayload {
    #[validate(length(min = 2, max = 120, message = "The name must have between 2 and 120 characters."))]
    pub name: String,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub description: Option<String>,
    pub price: Decimal,
    #[validate(length(equal = 3, message = "The currency must be a 3-letter ISO code."))]
    pub currency: String,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub highlights: Option<String>,
    #[serde(default)]
    pub is_active: bool,
}

// --- AÇÕES RÁPIDAS (atalhos da home) ---

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct QuickAction {
    pub id: Uuid,
    #[schema(example = "Book a consultation")]
    pub label: String,
    #[schema(example = "/contact")]
    pub href: String,
    pub icon: Option<String>,
    pub sort_order: i32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct QuickActionPayload {
    #[validate(length(min = 1, max = 60, message = "The label must have between 1 and 60 characters."))]
    pub label: String,
    #[validate(length(min = 1, message = "The link is required."))]
    pub href: String,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub icon: Option<String>,
    #[serde(default)]
    pub sort_order: i32,
    #[serde(default)]
    pub is_active: bool,
}

// Filtro `?active=true|false` das listagens
#[derive(Debug, Default, Deserialize)]
pub struct ActiveFilter {
    pub active: Option<bool>,
}
