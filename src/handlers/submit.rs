// src/handlers/submit.rs

use axum::{extract::State, Json};
use serde_json::Value;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::AuthenticatedUser,
    models::intake::{SubmitResponse, SubmissionReceipt},
};

// POST /api/submit — submissão final do onboarding completo.
// O corpo é recebido como Value cru: o serviço normaliza camelCase/snake_case
// antes de qualquer desserialização tipada.
#[utoipa::path(
    post,
    path = "/api/submit",
    tag = "Onboarding",
    security(("api_jwt" = [])),
    request_body = crate::models::intake::IntakeRecord,
    responses(
        (status = 200, description = "Dados do residente persistidos", body = SubmitResponse),
        (status = 400, description = "Payload malformado ou campos inválidos"),
        (status = 401, description = "Token ausente ou inválido"),
        (status = 422, description = "Condição de desqualificação declarada")
    )
)]
pub async fn submit_onboarding(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Json(raw_payload): Json<Value>,
) -> Result<Json<SubmitResponse>, AppError> {
    let receipt: SubmissionReceipt =
        app_state.intake_service.submit(raw_payload, user.id).await?;

    Ok(Json(SubmitResponse {
        success: true,
        message: "Resident data saved successfully".to_string(),
        data: receipt,
    }))
}
