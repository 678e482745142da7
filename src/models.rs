// src/models.rs

pub mod auth;
pub mod content;
pub mod message;
pub mod page;
