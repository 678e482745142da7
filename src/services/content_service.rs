// src/services/content_service.rs

use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{ContentRecord, ContentRepository},
};

// Leituras são "fail soft": erro do banco é logado e vira lista vazia / None,
// a página pública nunca quebra por causa do banco. Escritas propagam o erro.
#[derive(Clone)]
pub struct ContentService {
    repo: ContentRepository,
}

impl ContentService {
    pub fn new(repo: ContentRepository) -> Self {
        Self { repo }
    }

    pub async fn list_or_empty<T: ContentRecord>(&self, active: Option<bool>) -> Vec<T> {
        match self.repo.list::<T>(active).await {
            Ok(rows) => rows,
            Err(e) => {
                tracing::error!(table = T::table(), error = %e, "Falha ao buscar conteúdo; devolvendo lista vazia");
                Vec::new()
            }
        }
    }

    pub async fn find_or_none<T: ContentRecord>(&self, id: Uuid) -> Option<T> {
        match self.repo.find::<T>(id).await {
            Ok(row) => row,
            Err(e) => {
                tracing::error!(table = T::table(), %id, error = %e, "Falha ao buscar registro");
                None
            }
        }
    }

    pub async fn create<T: ContentRecord>(&self, payload: &T::Payload) -> Result<T, AppError> {
        let created = self.repo.create::<T>(payload).await?;
        tracing::info!(table = T::table(), "Registro criado");
        Ok(created)
    }

    pub async fn update<T: ContentRecord>(&self, id: Uuid, payload: &T::Payload) -> Result<Option<T>, AppError> {
        Ok(self.repo.update::<T>(id, payload).await?)
    }

    pub async fn toggle_active<T: ContentRecord>(&self, id: Uuid) -> Result<Option<T>, AppError> {
        Ok(self.repo.toggle_active::<T>(id).await?)
    }

    pub async fn delete<T: ContentRecord>(&self, id: Uuid) -> Result<bool, AppError> {
        let deleted = self.repo.delete::<T>(id).await?;
        if deleted {
            tracing::info!(table = T::table(), %id, "Registro excluído");
        }
        Ok(deleted)
    }
}
