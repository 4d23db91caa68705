// src/common.rs
pub mod error;
