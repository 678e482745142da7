// src/db/message_repo.rs

use sqlx::PgPool;
use uuid::Uuid;

use crate::models::message::{ContactMessage, NewContactMessage};

// Caixa de entrada do formulário de contato
#[derive(Clone)]
pub struct MessageRepository {
    pool: PgPool,
}

impl MessageRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, input: &NewContactMessage, locale: &str) -> Result<ContactMessage, sqlx::Error> {
        sqlx::query_as::<_, ContactMessage>(
            r#"
            INSERT INTO contact_messages (full_name, email, phone, subject, body, locale)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(input.full_name.trim())
        .bind(input.email.trim())
        .bind(&input.phone)
        .bind(&input.subject)
        .bind(&input.body)
        .bind(locale)
        .fetch_one(&self.pool)
        .await
    }

    // Não lidas primeiro, depois as mais recentes
    pub async fn list(&self, unread_only: bool) -> Result<Vec<ContactMessage>, sqlx::Error> {
        sqlx::query_as::<_, ContactMessage>(
            r#"
            SELECT * FROM contact_messages
            WHERE ($1 = false OR is_read = false)
            ORDER BY is_read ASC, created_at DESC
            "#,
        )
        .bind(unread_only)
        .fetch_all(&self.pool)
        .await
    }

    pub async fn find(&self, id: Uuid) -> Result<Option<ContactMessage>, sqlx::Error> {
        sqlx::query_as::<_, ContactMessage>("SELECT * FROM contact_messages WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
    }

    pub async fn mark_read(&self, id: Uuid) -> Result<Option<ContactMessage>, sqlx::Error> {
        sqlx::query_as::<_, ContactMessage>(
            "UPDATE contact_messages SET is_read = true WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
    }

    pub async fn delete(&self, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM contact_messages WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
