// src/docs.rs

use utoipa::OpenApi;
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Auth ---
        handlers::auth::register,
        handlers::auth::login,

        // --- Users ---
        handlers::auth::get_me,

        // --- Onboarding ---
        handlers::submit::submit_onboarding,

        // --- Legal Documents ---
        handlers::legal::create_document_version,
        handlers::legal::list_document_types,
        handlers::legal::list_active_documents,
        handlers::legal::list_document_versions,
        handlers::legal::activate_document_version,
        handlers::legal::get_active_document,
    ),
    components(
        schemas(
            // --- Auth ---
            models::auth::User,
            models::auth::RegisterUserPayload,
            models::auth::LoginUserPayload,
            models::auth::AuthResponse,

            // --- Onboarding ---
            models::intake::IntakeRecord,
            models::intake::HealthStatus,
            models::intake::Vehicle,
            models::intake::EmergencyContact,
            models::intake::MedicalInformation,
            models::intake::AuthorizedPerson,
            models::intake::LegalStatus,
            models::intake::Jurisdiction,
            models::intake::PendingCharge,
            models::intake::Conviction,
            models::intake::MentalHealth,
            models::intake::MentalHealthEntry,
            models::intake::DrugHistoryEntry,
            models::intake::RecoveryResidence,
            models::intake::TreatmentEntry,
            models::intake::IncarcerationEntry,
            models::intake::ProbationEntry,
            models::intake::SignatureRecord,
            models::intake::SubmissionReceipt,
            models::intake::SubmitResponse,

            // --- Legal Documents ---
            models::legal::LegalDocument,
            models::legal::CreateLegalDocumentPayload,
            models::legal::ManagedDocumentType,
        )
    ),
    tags(
        (name = "Auth", description = "Autenticação e Registro"),
        (name = "Users", description = "Dados do Usuário e Perfil"),
        (name = "Onboarding", description = "Submissão final do formulário de intake"),
        (name = "Legal Documents", description = "Documentos legais versionados")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "api_jwt",
            SecurityScheme::Http(
                Http::new(HttpAuthScheme::Bearer)
            ),
        );
    }
}
