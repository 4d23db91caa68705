// src/services/legal_service.rs
//
// Gestão dos documentos legais versionados: o catálogo dos tipos
// gerenciáveis, criação de versões novas e ativação de versões antigas.

use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::LegalDocumentRepository,
    models::legal::{CreateLegalDocumentPayload, LegalDocument, ManagedDocumentType},
};

// Catálogo fixo dos documentos que o painel administrativo gerencia; as
// chaves coincidem com os signature_type usados no onboarding.
pub const MANAGED_DOCUMENT_TYPES: [ManagedDocumentType; 14] = [
    ManagedDocumentType {
        key: "emergency",
        title: "Emergency Care Consent",
        description: "Consent to emergency medical care and release of liability.",
    },
    ManagedDocumentType {
        key: "medication",
        title: "Medication Policy",
        description: "Rules for storing and self-administering medication.",
    },
    ManagedDocumentType {
        key: "disclosure",
        title: "Information Disclosure",
        description: "Authorization to disclose participant information.",
    },
    ManagedDocumentType {
        key: "treatment",
        title: "Consent for Treatment",
        description: "General consent to participate in the recovery program.",
    },
    ManagedDocumentType {
        key: "price_consent",
        title: "Fee Schedule Agreement",
        description: "Program fee schedule and payment responsibilities.",
    },
    ManagedDocumentType {
        key: "tenant_rights",
        title: "Tenant Rights Notice",
        description: "Notice of housing rights and responsibilities.",
    },
    ManagedDocumentType {
        key: "contract_terms",
        title: "Program Contract Terms",
        description: "Terms and conditions of program participation.",
    },
    ManagedDocumentType {
        key: "criminal_history",
        title: "Criminal History Disclosure",
        description: "Acknowledgment of the disclosed criminal history record.",
    },
    ManagedDocumentType {
        key: "ethics",
        title: "Code of Ethics",
        description: "Program code of ethics and conduct standards.",
    },
    ManagedDocumentType {
        key: "critical_rules",
        title: "Critical Rules",
        description: "Zero-tolerance rules whose violation ends participation.",
    },
    ManagedDocumentType {
        key: "house_rules",
        title: "House Rules",
        description: "Day-to-day residence rules and expectations.",
    },
    ManagedDocumentType {
        key: "asam_assessment",
        title: "ASAM Assessment Consent",
        description: "Consent to the ASAM level-of-care assessment.",
    },
    ManagedDocumentType {
        key: "digital_signature_consent",
        title: "Digital Signature Consent",
        description: "Agreement that typed signatures are legally binding.",
    },
    ManagedDocumentType {
        key: "drug_screening_consent",
        title: "Drug Screening Consent",
        description: "Consent to observed drug and alcohol screening.",
    },
];

pub fn is_managed_type(document_type: &str) -> bool {
    MANAGED_DOCUMENT_TYPES.iter().any(|t| t.key == document_type)
}

#[derive(Clone)]
pub struct LegalDocumentService {
    legal_repo: LegalDocumentRepository,
}

impl LegalDocumentService {
    pub fn new(legal_repo: LegalDocumentRepository) -> Self {
        Self { legal_repo }
    }

    // Cria (e ativa) uma versão nova do documento. Tipos fora do catálogo
    // são rejeitados: o formulário não saberia exibi-los.
    pub async fn create_version(
        &self,
        payload: &CreateLegalDocumentPayload,
        created_by: Uuid,
    ) -> Result<LegalDocument, AppError> {
        if !is_managed_type(&payload.document_type) {
            return Err(AppError::InvalidPayload(format!(
                "Unknown document type '{}'",
                payload.document_type
            )));
        }

        let mut tx = self.legal_repo.pool().begin().await?;
        let document = self
            .legal_repo
            .insert_version(
                &mut tx,
                &payload.document_type,
                &payload.title,
                &payload.content,
                &payload.description,
                created_by,
            )
            .await?;
        tx.commit().await?;

        tracing::info!(
            document_type = %document.document_type,
            version = document.version,
            "📄 Nova versão de documento legal publicada"
        );
        Ok(document)
    }

    pub async fn get_active(&self, document_type: &str) -> Result<LegalDocument, AppError> {
        self.legal_repo
            .find_active(self.legal_repo.pool(), document_type)
            .await?
            .ok_or(AppError::DocumentNotFound)
    }

    pub async fn list_versions(&self, document_type: &str) -> Result<Vec<LegalDocument>, AppError> {
        if !is_managed_type(document_type) {
            return Err(AppError::DocumentNotFound);
        }
        Ok(self
            .legal_repo
            .list_versions(self.legal_repo.pool(), document_type)
            .await?)
    }

    pub async fn list_active(&self) -> Result<Vec<LegalDocument>, AppError> {
        Ok(self.legal_repo.list_active(self.legal_repo.pool()).await?)
    }

    // Rollback: torna uma versão antiga a ativa de novo.
    pub async fn activate_version(&self, id: Uuid) -> Result<LegalDocument, AppError> {
        let mut tx = self.legal_repo.pool().begin().await?;
        let document = self
            .legal_repo
            .activate_version(&mut tx, id)
            .await?
            .ok_or(AppError::DocumentNotFound)?;
        tx.commit().await?;

        tracing::info!(
            document_type = %document.document_type,
            version = document.version,
            "♻️ Versão de documento legal reativada"
        );
        Ok(document)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalogue_keys_match_signature_types() {
        use crate::form::signatures::SignatureType;
        for entry in MANAGED_DOCUMENT_TYPES {
            assert!(
                SignatureType::parse(entry.key).is_some(),
                "tipo fora do vocabulário de assinaturas: {}",
                entry.key
            );
        }
    }

    #[test]
    fn unknown_type_is_not_managed() {
        assert!(is_managed_type("house_rules"));
        assert!(!is_managed_type("nonexistent_document"));
    }
}
