// src/handlers/legal.rs
//
// Painel administrativo dos documentos legais + endpoint público que o fluxo
// de assinatura usa para exibir a versão ativa.

use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::AuthenticatedUser,
    models::legal::{CreateLegalDocumentPayload, LegalDocument, ManagedDocumentType},
    services::legal_service::MANAGED_DOCUMENT_TYPES,
};

// POST /api/admin/legal-documents — publica uma versão nova (e a ativa)
#[utoipa::path(
    post,
    path = "/api/admin/legal-documents",
    tag = "Legal Documents",
    security(("api_jwt" = [])),
    request_body = CreateLegalDocumentPayload,
    responses(
        (status = 200, description = "Versão publicada", body = LegalDocument),
        (status = 400, description = "Tipo de documento desconhecido ou payload inválido"),
        (status = 401, description = "Token ausente ou inválido")
    )
)]
pub async fn create_document_version(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Json(payload): Json<CreateLegalDocumentPayload>,
) -> Result<Json<LegalDocument>, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let document = app_state
        .legal_service
        .create_version(&payload, user.id)
        .await?;
    Ok(Json(document))
}

// GET /api/admin/legal-documents/types — catálogo dos tipos gerenciáveis
#[utoipa::path(
    get,
    path = "/api/admin/legal-documents/types",
    tag = "Legal Documents",
    security(("api_jwt" = [])),
    responses(
        (status = 200, description = "Catálogo de tipos", body = [ManagedDocumentType])
    )
)]
pub async fn list_document_types(
    AuthenticatedUser(_user): AuthenticatedUser,
) -> Json<Vec<ManagedDocumentType>> {
    Json(MANAGED_DOCUMENT_TYPES.to_vec())
}

// GET /api/admin/legal-documents — versão ativa de cada tipo já publicado
#[utoipa::path(
    get,
    path = "/api/admin/legal-documents",
    tag = "Legal Documents",
    security(("api_jwt" = [])),
    responses(
        (status = 200, description = "Documentos ativos", body = [LegalDocument])
    )
)]
pub async fn list_active_documents(
    State(app_state): State<AppState>,
    AuthenticatedUser(_user): AuthenticatedUser,
) -> Result<Json<Vec<LegalDocument>>, AppError> {
    Ok(Json(app_state.legal_service.list_active().await?))
}

// GET /api/admin/legal-documents/{document_type}/versions — histórico completo
#[utoipa::path(
    get,
    path = "/api/admin/legal-documents/{document_type}/versions",
    tag = "Legal Documents",
    security(("api_jwt" = [])),
    params(("document_type" = String, Path, description = "Chave do tipo de documento")),
    responses(
        (status = 200, description = "Histórico de versões", body = [LegalDocument]),
        (status = 404, description = "Tipo de documento desconhecido")
    )
)]
pub async fn list_document_versions(
    State(app_state): State<AppState>,
    AuthenticatedUser(_user): AuthenticatedUser,
    Path(document_type): Path<String>,
) -> Result<Json<Vec<LegalDocument>>, AppError> {
    Ok(Json(app_state.legal_service.list_versions(&document_type).await?))
}

// POST /api/admin/legal-documents/{id}/activate — rollback para versão antiga
#[utoipa::path(
    post,
    path = "/api/admin/legal-documents/versions/{id}/activate",
    tag = "Legal Documents",
    security(("api_jwt" = [])),
    params(("id" = Uuid, Path, description = "Id da versão a reativar")),
    responses(
        (status = 200, description = "Versão reativada", body = LegalDocument),
        (status = 404, description = "Versão não encontrada")
    )
)]
pub async fn activate_document_version(
    State(app_state): State<AppState>,
    AuthenticatedUser(_user): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<Json<LegalDocument>, AppError> {
    Ok(Json(app_state.legal_service.activate_version(id).await?))
}

// GET /api/legal-documents/{document_type} — endpoint público do formulário:
// devolve a versão ativa que a página de assinatura exibe.
#[utoipa::path(
    get,
    path = "/api/legal-documents/{document_type}",
    tag = "Legal Documents",
    params(("document_type" = String, Path, description = "Chave do tipo de documento")),
    responses(
        (status = 200, description = "Versão ativa", body = LegalDocument),
        (status = 404, description = "Nenhuma versão ativa para o tipo")
    )
)]
pub async fn get_active_document(
    State(app_state): State<AppState>,
    Path(document_type): Path<String>,
) -> Result<Json<LegalDocument>, AppError> {
    Ok(Json(app_state.legal_service.get_active(&document_type).await?))
}
