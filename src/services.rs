// src/services.rs

pub mod auth;
pub mod content_service;
pub mod message_service;
pub mod session;
