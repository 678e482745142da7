// src/db.rs

pub mod content_repo;
pub use content_repo::{ContentRecord, ContentRepository};
pub mod message_repo;
pub use message_repo::MessageRepository;
