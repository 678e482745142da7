// src/db/content_repo.rs

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use sqlx::{postgres::PgRow, FromRow, PgPool};
use uuid::Uuid;
use validator::Validate;

use crate::models::content::{
    QuickAction, QuickActionPayload, Service, ServicePayload, TravelPackage, TravelPackagePayload, Trip,
    TripPayload,
};

/// 1. O Trait que define uma tabela de conteúdo gerenciada pelo portal.
/// Toda tabela tem `id`, `is_active` e `created_at`; só o insert/update
/// conhece as colunas específicas.
#[async_trait]
pub trait ContentRecord: for<'r> FromRow<'r, PgRow> + Serialize + Send + Sync + Unpin + 'static {
    type Payload: DeserializeOwned + Validate + Send + Sync + 'static;

    fn table() -> &'static str;

    fn order_by() -> &'static str {
        "created_at DESC"
    }

    async fn insert(pool: &PgPool, payload: &Self::Payload) -> Result<Self, sqlx::Error>;

    async fn update(pool: &PgPool, id: Uuid, payload: &Self::Payload) -> Result<Option<Self>, sqlx::Error>;
}

/// 2. O repositório genérico: leitura, toggle e exclusão valem para todas.
#[derive(Clone)]
pub struct ContentRepository {
    pool: PgPool,
}

impl ContentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // `table()` e `order_by()` são constantes do código, nunca entrada do usuário.
    pub async fn list<T: ContentRecord>(&self, active: Option<bool>) -> Result<Vec<T>, sqlx::Error> {
        let sql = format!(
            "SELECT * FROM {} WHERE ($1::bool IS NULL OR is_active = $1) ORDER BY {}",
            T::table(),
            T::order_by()
        );
        sqlx::query_as::<_, T>(&sql).bind(active).fetch_all(&self.pool).await
    }

    pub async fn find<T: ContentRecord>(&self, id: Uuid) -> Result<Option<T>, sqlx::Error> {
        let sql = format!("SELECT * FROM {} WHERE id = $1", T::table());
        sqlx::query_as::<_, T>(&sql).bind(id).fetch_optional(&self.pool).await
    }

    pub async fn create<T: ContentRecord>(&self, payload: &T::Payload) -> Result<T, sqlx::Error> {
        T::insert(&self.pool, payload).await
    }

    pub async fn update<T: ContentRecord>(&self, id: Uuid, payload: &T::Payload) -> Result<Option<T>, sqlx::Error> {
        T::update(&self.pool, id, payload).await
    }

    pub async fn toggle_active<T: ContentRecord>(&self, id: Uuid) -> Result<Option<T>, sqlx::Error> {
        let sql = format!(
            "UPDATE {} SET is_active = NOT is_active WHERE id = $1 RETURNING *",
            T::table()
        );
        sqlx::query_as::<_, T>(&sql).bind(id).fetch_optional(&self.pool).await
    }

    pub async fn delete<T: ContentRecord>(&self, id: Uuid) -> Result<bool, sqlx::Error> {
        let sql = format!("DELETE FROM {} WHERE id = $1", T::table());
        let result = sqlx::query(&sql).bind(id).execute(&self.pool).await?;
        Ok(result.rows_affected() > 0)
    }
}

// ---
// IMPLEMENTAÇÕES POR TABELA
// ---

#[async_trait]
impl ContentRecord for Service {
    type Payload = ServicePayload;

    fn table() -> &'static str {
        "services"
    }

    async fn insert(pool: &PgPool, p: &ServicePayload) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Service>(
            r#"
            INSERT INTO services (title, description, icon, image_url, is_active)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(&p.title)
        .bind(&p.description)
        .bind(&p.icon)
        .bind(&p.image_url)
        .bind(p.is_active)
        .fetch_one(pool)
        .await
    }

    async fn update(pool: &PgPool, id: Uuid, p: &ServicePayload) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Service>(
            r#"
            UPDATE services
            SET title = $2, description = $3, icon = $4, image_url = $5, is_active = $6
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&p.title)
        .bind(&p.description)
        .bind(&p.icon)
        .bind(&p.image_url)
        .bind(p.is_active)
        .fetch_optional(pool)
        .await
    }
}

#[async_trait]
impl ContentRecord for Trip {
    type Payload = TripPayload;

    fn table() -> &'static str {
        "trips"
    }

    async fn insert(pool: &PgPool, p: &TripPayload) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Trip>(
            r#"
            INSERT INTO trips (title, destination, description, duration_days, price, image_url, is_active)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(&p.title)
        .bind(&p.destination)
        .bind(&p.description)
        .bind(p.duration_days)
        .bind(p.price)
        .bind(&p.image_url)
        .bind(p.is_active)
        .fetch_one(pool)
        .await
    }

    async fn update(pool: &PgPool, id: Uuid, p: &TripPayload) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Trip>(
            r#"
            UPDATE trips
            SET title = $2, destination = $3, description = $4, duration_days = $5,
                price = $6, image_url = $7, is_active = $8
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&p.title)
        .bind(&p.destination)
        .bind(&p.description)
        .bind(p.duration_days)
        .bind(p.price)
        .bind(&p.image_url)
        .bind(p.is_active)
        .fetch_optional(pool)
        .await
    }
}

#[async_trait]
impl ContentRecord for TravelPackage {
    type Payload = TravelPackagePayload;

    fn table() -> &'static str {
        "packages"
    }

    async fn insert(pool: &PgPool, p: &TravelPackagePayload) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, TravelPackage>(
            r#"
            INSERT INTO packages (name, description, price, currency, highlights, is_active)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(&p.name)
        .bind(&p.description)
        .bind(p.price)
        .bind(p.currency.to_uppercase())
        .bind(&p.highlights)
        .bind(p.is_active)
        .fetch_one(pool)
        .await
    }

    async fn update(pool: &PgPool, id: Uuid, p: &TravelPackagePayload) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, TravelPackage>(
            r#"
            UPDATE packages
            SET name = $2, description = $3, price = $4, currency = $5, highlights = $6, is_active = $7
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&p.name)
        .bind(&p.description)
        .bind(p.price)
        .bind(p.currency.to_uppercase())
        .bind(&p.highlights)
        .bind(p.is_active)
        .fetch_optional(pool)
        .await
    }
}

#[async_trait]
impl ContentRecord for QuickAction {
    type Payload = QuickActionPayload;

    fn table() -> &'static str {
        "quick_actions"
    }

    fn order_by() -> &'static str {
        "sort_order ASC, created_at DESC"
    }

    async fn insert(pool: &PgPool, p: &QuickActionPayload) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, QuickAction>(
            r#"
            INSERT INTO quick_actions (label, href, icon, sort_order, is_active)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(&p.label)
        .bind(&p.href)
        .bind(&p.icon)
        .bind(p.sort_order)
        .bind(p.is_active)
        .fetch_one(pool)
        .await
    }

    async fn update(pool: &PgPool, id: Uuid, p: &QuickActionPayload) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, QuickAction>(
            r#"
            UPDATE quick_actions
            SET label = $2, href = $3, icon = $4, sort_order = $5, is_active = $6
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&p.label)
        .bind(&p.href)
        .bind(&p.icon)
        .bind(p.sort_order)
        .bind(p.is_active)
        .fetch_optional(pool)
        .await
    }
}
