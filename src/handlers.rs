// src/handlers.rs
pub mod auth;
pub mod legal;
pub mod submit;
