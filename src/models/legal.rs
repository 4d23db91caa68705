// src/models/legal.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

// Uma versão de um documento legal/termo de consentimento. Linhas nunca são
// editadas: cada edição insere uma versão nova e a ativa.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LegalDocument {
    pub id: Uuid,
    pub document_type: String,
    pub title: String,
    pub content: String,
    pub description: String,
    pub version: i32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub created_by: Uuid,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateLegalDocumentPayload {
    #[validate(length(min = 1, message = "Document type is required."))]
    #[schema(example = "house_rules")]
    pub document_type: String,

    #[validate(length(min = 1, message = "Title is required."))]
    #[schema(example = "House Rules")]
    pub title: String,

    #[validate(length(min = 1, message = "Content is required."))]
    pub content: String,

    #[serde(default)]
    pub description: String,
}

// Entrada do catálogo de tipos gerenciáveis, exibida no painel administrativo
// ao lado das versões já existentes.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ManagedDocumentType {
    pub key: &'static str,
    pub title: &'static str,
    pub description: &'static str,
}
