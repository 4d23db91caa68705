// src/services/intake_service.rs
//
// Orquestrador da submissão final: normaliza o payload bruto, valida o
// registro, checa desqualificação e grava o agregado inteiro em uma única
// transação. Ou tudo entra, ou nada entra.

use serde_json::Value;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    db::ParticipantRepository,
    form::{normalize, signatures},
    models::intake::{IntakeRecord, SignatureRecord, SubmissionReceipt, parse_iso_date},
};

// Normalização + passada frouxa nas assinaturas + desserialização tipada.
// As assinaturas são destacadas do payload ANTES da desserialização estrita:
// cada entrada é decodificada individualmente, e uma entrada ilegível ou
// incoerente é descartada com warning — nunca derruba a submissão inteira.
fn decode_record(raw_payload: Value) -> Result<IntakeRecord, AppError> {
    let mut normalized = normalize::normalize(raw_payload);

    let raw_signatures = match &mut normalized {
        Value::Object(obj) => match obj.remove("signatures") {
            Some(Value::Array(entries)) => entries,
            _ => Vec::new(),
        },
        _ => Vec::new(),
    };

    // Erro aqui é formato do registro em si, não campo faltando
    let mut record: IntakeRecord = serde_json::from_value(normalized)
        .map_err(|e| AppError::InvalidPayload(e.to_string()))?;

    record.signatures = raw_signatures
        .into_iter()
        .filter_map(|entry| match serde_json::from_value::<SignatureRecord>(entry) {
            Ok(signature) if signatures::passes_loose_check(&signature) => Some(signature),
            Ok(signature) => {
                tracing::warn!(
                    signature_type = %signature.signature_type,
                    "Descartando entrada de assinatura incoerente na submissão"
                );
                None
            }
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    "Descartando entrada de assinatura ilegível na submissão"
                );
                None
            }
        })
        .collect();

    Ok(record)
}

#[derive(Clone)]
pub struct IntakeService {
    participant_repo: ParticipantRepository,
}

impl IntakeService {
    pub fn new(participant_repo: ParticipantRepository) -> Self {
        Self { participant_repo }
    }

    pub async fn submit(
        &self,
        raw_payload: Value,
        submitted_by: Uuid,
    ) -> Result<SubmissionReceipt, AppError> {
        // 1. Normalização + passada frouxa nas assinaturas + desserialização
        let record = decode_record(raw_payload)?;

        // 2. Validação por campo (todas as violações coletadas de uma vez)
        record.validate()?;

        // 3. As datas já passaram pela validação, então sempre parseiam;
        //    o fallback cobre mutação concorrente do schema.
        let intake_date = parse_iso_date(&record.intake_date)
            .ok_or_else(|| AppError::InvalidPayload("intakeDate is not a valid date".into()))?;
        let date_of_birth = parse_iso_date(&record.date_of_birth)
            .ok_or_else(|| AppError::InvalidPayload("dateOfBirth is not a valid date".into()))?;

        // 4. Desqualificação imediata: nada é persistido.
        if record.legal_status.is_sex_offender {
            tracing::warn!("Submissão desqualificada: registro de ofensor sexual declarado");
            return Err(AppError::Disqualified);
        }

        // 5. Escrita atômica do agregado, na ordem fixa das dependências.
        let repo = &self.participant_repo;
        let mut tx = repo.pool().begin().await?;

        let participant_id = repo
            .insert_participant(&mut *tx, &record, intake_date, date_of_birth, submitted_by)
            .await
            .map_err(|source| AppError::Persistence { section: "participant", source })?;

        repo.insert_health_status(&mut *tx, participant_id, &record, submitted_by)
            .await
            .map_err(|source| AppError::Persistence { section: "health status", source })?;

        repo.insert_vehicle(&mut *tx, participant_id, &record, submitted_by)
            .await
            .map_err(|source| AppError::Persistence { section: "vehicle", source })?;

        repo.insert_emergency_contact(&mut *tx, participant_id, &record, submitted_by)
            .await
            .map_err(|source| AppError::Persistence { section: "emergency contact", source })?;

        repo.insert_medical_information(&mut *tx, participant_id, &record, submitted_by)
            .await
            .map_err(|source| AppError::Persistence { section: "medical information", source })?;

        repo.insert_medications(&mut tx, participant_id, &record, submitted_by)
            .await
            .map_err(|source| AppError::Persistence { section: "medications", source })?;

        repo.insert_authorized_people(&mut tx, participant_id, &record, submitted_by)
            .await
            .map_err(|source| AppError::Persistence { section: "authorized people", source })?;

        repo.insert_legal_status(&mut tx, participant_id, &record, submitted_by)
            .await
            .map_err(|source| AppError::Persistence { section: "legal status", source })?;

        repo.insert_pending_charges(&mut tx, participant_id, &record, submitted_by)
            .await
            .map_err(|source| AppError::Persistence { section: "pending charges", source })?;

        repo.insert_convictions(&mut tx, participant_id, &record, submitted_by)
            .await
            .map_err(|source| AppError::Persistence { section: "convictions", source })?;

        repo.insert_mental_health(&mut tx, participant_id, &record, submitted_by)
            .await
            .map_err(|source| AppError::Persistence { section: "mental health", source })?;

        repo.insert_drug_history(&mut tx, participant_id, &record, submitted_by)
            .await
            .map_err(|source| AppError::Persistence { section: "drug history", source })?;

        repo.insert_recovery_residences(&mut tx, participant_id, &record, submitted_by)
            .await
            .map_err(|source| AppError::Persistence { section: "recovery residences", source })?;

        repo.insert_treatment_history(&mut tx, participant_id, &record, submitted_by)
            .await
            .map_err(|source| AppError::Persistence { section: "treatment history", source })?;

        repo.insert_incarceration_history(&mut tx, participant_id, &record, submitted_by)
            .await
            .map_err(|source| {
                AppError::Persistence { section: "incarceration history", source }
            })?;

        repo.insert_probation_history(&mut tx, participant_id, &record, submitted_by)
            .await
            .map_err(|source| AppError::Persistence { section: "probation history", source })?;

        repo.insert_drug_test_results(&mut tx, participant_id, &record, submitted_by)
            .await
            .map_err(|source| AppError::Persistence { section: "drug test results", source })?;

        repo.insert_signatures(&mut tx, participant_id, &record.signatures, submitted_by)
            .await
            .map_err(|source| AppError::Persistence { section: "signatures", source })?;

        tx.commit().await?;

        tracing::info!(
            %participant_id,
            signatures = record.signatures.len(),
            "✅ Onboarding persistido com sucesso"
        );

        Ok(SubmissionReceipt {
            participant_id,
            name: record.display_name(),
            intake_date,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn minimal_payload() -> Value {
        json!({
            "firstName": "Jane",
            "lastName": "Doe",
            "email": "jane@x.com",
            "socialSecurityNumber": "123-45-6789",
            "dateOfBirth": "1990-01-01",
            "intakeDate": "2024-01-01",
            "emergencyContact": {
                "firstName": "A", "lastName": "B",
                "phone": "1234567890", "relationship": "parent"
            }
        })
    }

    #[test]
    fn wrong_typed_signature_entry_is_dropped_not_fatal() {
        let mut payload = minimal_payload();
        payload["signatures"] = json!([
            {
                "signatureType": "medication",
                "signature": "Jane Doe",
                "signatureTimestamp": "2024-01-01T10:00:00Z",
                "signatureId": "JH-MED-1-abc"
            },
            // `agreed` com tipo errado: a entrada cai, a submissão não.
            { "signatureType": "future_consent", "agreed": "yes" }
        ]);

        let record = decode_record(payload).unwrap();
        assert_eq!(record.signatures.len(), 1);
        assert_eq!(record.signatures[0].signature_type, "medication");
        assert!(record.validate().is_ok());
    }

    #[test]
    fn incoherent_signature_entry_is_dropped_not_fatal() {
        let mut payload = minimal_payload();
        // Aceite sem timestamp falha a checagem frouxa.
        payload["signatures"] = json!([{ "signatureType": "ethics", "agreed": true }]);

        let record = decode_record(payload).unwrap();
        assert!(record.signatures.is_empty());
    }

    #[test]
    fn record_level_shape_error_is_still_invalid_payload() {
        let mut payload = minimal_payload();
        payload["healthStatus"] = json!({ "pregnant": "maybe" });

        let err = decode_record(payload).unwrap_err();
        assert!(matches!(err, AppError::InvalidPayload(_)));
    }

    // Atomicidade do agregado contra um Postgres real: só roda quando
    // DATABASE_URL está definida (mesma variável usada pelo AppState).
    #[tokio::test]
    async fn persistence_failure_rolls_back_whole_aggregate() {
        let Ok(database_url) = std::env::var("DATABASE_URL") else {
            return;
        };
        let pool = sqlx::PgPool::connect(&database_url).await.unwrap();
        sqlx::migrate!().run(&pool).await.unwrap();

        let email = format!("staff-{}@example.org", Uuid::new_v4());
        let user = crate::db::UserRepository::new(pool.clone())
            .create_user(&pool, &email, "not-a-real-hash")
            .await
            .unwrap();

        let service = IntakeService::new(ParticipantRepository::new(pool.clone()));

        let ssn = "987-65-4321";
        let mut payload = minimal_payload();
        payload["socialSecurityNumber"] = json!(ssn);
        // test_type excede o VARCHAR(20) da tabela: o insert falha no meio
        // da sequência, depois do participante já ter sido gravado no tx.
        payload["drugTestResults"] =
            json!({ "extended_panel_confirmation_screen": true });

        let err = service.submit(payload, user.id).await.unwrap_err();
        assert!(matches!(
            err,
            AppError::Persistence { section: "drug test results", .. }
        ));

        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM participants WHERE social_security_number = $1",
        )
        .bind(ssn)
        .fetch_one(&pool)
        .await
        .unwrap();
        assert_eq!(count, 0);
    }
}
