// src/services/message_service.rs

use uuid::Uuid;

use crate::{
    common::{error::AppError, locale::Locale},
    db::MessageRepository,
    models::message::{ContactMessage, NewContactMessage},
};

#[derive(Clone)]
pub struct MessageService {
    repo: MessageRepository,
}

impl MessageService {
    pub fn new(repo: MessageRepository) -> Self {
        Self { repo }
    }

    pub async fn submit(&self, input: &NewContactMessage, locale: Locale) -> Result<ContactMessage, AppError> {
        let message = self.repo.create(input, locale.as_str()).await?;
        tracing::info!(id = %message.id, %locale, "Nova mensagem de contato");
        Ok(message)
    }

    pub async fn list_or_empty(&self, unread_only: bool) -> Vec<ContactMessage> {
        self.repo.list(unread_only).await.unwrap_or_else(|e| {
            tracing::error!(error = %e, "Falha ao listar mensagens; devolvendo lista vazia");
            Vec::new()
        })
    }

    pub async fn find_or_none(&self, id: Uuid) -> Option<ContactMessage> {
        self.repo.find(id).await.unwrap_or_else(|e| {
            tracing::error!(%id, error = %e, "Falha ao buscar mensagem");
            None
        })
    }

    pub async fn mark_read(&self, id: Uuid) -> Result<Option<ContactMessage>, AppError> {
        Ok(self.repo.mark_read(id).await?)
    }

    pub async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        Ok(self.repo.delete(id).await?)
    }
}
