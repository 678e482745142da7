// src/handlers.rs

pub mod pages;
pub mod portal;
