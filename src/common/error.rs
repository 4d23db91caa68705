use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

// Nosso tipo de erro, com `thiserror` para melhor ergonomia.
// A taxonomia segue o pipeline de submissão: erros de validação e de
// autenticação acontecem ANTES de qualquer escrita; erros de persistência
// acontecem no meio da transação e nomeiam qual sub-registro falhou.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation failed")]
    ValidationError(#[from] validator::ValidationErrors),

    // O corpo JSON não tem o formato esperado (tipo errado em algum campo).
    #[error("Invalid payload: {0}")]
    InvalidPayload(String),

    #[error("Authentication required")]
    Unauthenticated,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Invalid token")]
    InvalidToken,

    #[error("E-mail already registered")]
    EmailAlreadyExists,

    #[error("User not found")]
    UserNotFound,

    #[error("Legal document not found")]
    DocumentNotFound,

    // Condição de desqualificação imediata (isSexOffender = true).
    // Não é erro de validação: reenviar não passa sem mudar o flag.
    #[error("Interview must be terminated immediately")]
    Disqualified,

    // Falha no meio da escrita multi-tabela; `section` nomeia o sub-registro.
    #[error("Failed to persist {section} record")]
    Persistence {
        section: &'static str,
        #[source]
        source: sqlx::Error,
    },

    #[error("Database error")]
    DatabaseError(#[from] sqlx::Error),

    #[error("Internal server error")]
    InternalServerError(#[from] anyhow::Error),

    #[error("Bcrypt error: {0}")]
    BcryptError(#[from] bcrypt::BcryptError),

    #[error("JWT error: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            // Retorna todos os detalhes da validação, campo por campo.
            AppError::ValidationError(errors) => {
                let mut details = std::collections::HashMap::new();
                for (field, field_errors) in errors.field_errors() {
                    let messages: Vec<String> = field_errors
                        .iter()
                        .filter_map(|e| e.message.as_ref().map(|m| m.to_string()))
                        .collect();
                    details.insert(field.to_string(), messages);
                }
                let body = Json(json!({
                    "success": false,
                    "message": "One or more fields are invalid",
                    "error": "validation_error",
                    "details": details,
                }));
                return (StatusCode::BAD_REQUEST, body).into_response();
            }
            AppError::InvalidPayload(ref detail) => {
                let body = Json(json!({
                    "success": false,
                    "message": "Request body does not match the expected shape",
                    "error": detail,
                }));
                return (StatusCode::BAD_REQUEST, body).into_response();
            }
            AppError::Unauthenticated => {
                (StatusCode::UNAUTHORIZED, "Authentication required.")
            }
            AppError::InvalidCredentials => {
                (StatusCode::UNAUTHORIZED, "Invalid e-mail or password.")
            }
            AppError::InvalidToken => (
                StatusCode::UNAUTHORIZED,
                "Authentication token missing or invalid.",
            ),
            AppError::EmailAlreadyExists => {
                (StatusCode::CONFLICT, "This e-mail is already in use.")
            }
            AppError::UserNotFound => (StatusCode::NOT_FOUND, "User not found."),
            AppError::DocumentNotFound => {
                (StatusCode::NOT_FOUND, "Legal document not found.")
            }
            AppError::Disqualified => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "Interview must be terminated immediately.",
            ),
            AppError::Persistence { section, ref source } => {
                tracing::error!("Persistence failure on '{}': {}", section, source);
                let body = Json(json!({
                    "success": false,
                    "message": "Failed to process resident data",
                    "error": format!("Failed to persist {section} record"),
                }));
                return (StatusCode::INTERNAL_SERVER_ERROR, body).into_response();
            }

            // Todos os outros erros (DatabaseError, InternalServerError) viram 500.
            // O `tracing` loga a mensagem detalhada que `thiserror` nos deu.
            ref e => {
                tracing::error!("Internal server error: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "An unexpected error occurred.")
            }
        };

        // Resposta padrão para erros simples que só têm uma mensagem.
        let body = Json(json!({
            "success": false,
            "message": message,
            "error": message,
        }));
        (status, body).into_response()
    }
}
