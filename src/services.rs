// src/services.rs
pub mod auth;
pub mod intake_service;
pub mod legal_service;

pub use auth::AuthService;
pub use intake_service::IntakeService;
pub use legal_service::LegalDocumentService;
