// src/middleware.rs

pub mod i18n;
pub mod session;
