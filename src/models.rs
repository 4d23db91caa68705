// src/models.rs
pub mod auth;
pub mod intake;
pub mod legal;
