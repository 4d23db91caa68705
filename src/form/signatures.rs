// src/form/signatures.rs
//
// Registro de assinaturas do rascunho: no máximo UMA assinatura por tipo de
// documento. Todas as operações são puras — recebem a lista atual e devolvem
// uma lista nova, para manter as transições de estado do acumulador
// previsíveis e testáveis.

use chrono::Utc;
use rand::Rng;

use crate::models::intake::SignatureRecord;

// =============================================================================
//  TIPOS DE DOCUMENTO
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SignatureType {
    Emergency,
    Medication,
    Disclosure,
    Treatment,
    PriceConsent,
    TenantRights,
    ContractTerms,
    CriminalHistory,
    Ethics,
    CriticalRules,
    HouseRules,
    AsamAssessment,
    DigitalSignatureConsent,
    DrugScreeningConsent,
}

/// O que acontece quando a pessoa desmarca o "concordo" de uma página.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevokePolicy {
    /// Limpa timestamp e signatureId, mas preserva o nome digitado.
    ClearStamps,
    /// Descarta o registro inteiro (fluxos que amarram o texto ao aceite).
    ClearAll,
}

impl SignatureType {
    pub const ALL: [SignatureType; 14] = [
        SignatureType::Emergency,
        SignatureType::Medication,
        SignatureType::Disclosure,
        SignatureType::Treatment,
        SignatureType::PriceConsent,
        SignatureType::TenantRights,
        SignatureType::ContractTerms,
        SignatureType::CriminalHistory,
        SignatureType::Ethics,
        SignatureType::CriticalRules,
        SignatureType::HouseRules,
        SignatureType::AsamAssessment,
        SignatureType::DigitalSignatureConsent,
        SignatureType::DrugScreeningConsent,
    ];

    /// Assinaturas exigidas no gate final do formulário.
    pub const REQUIRED_AT_SUBMISSION: [SignatureType; 8] = [
        SignatureType::Treatment,
        SignatureType::PriceConsent,
        SignatureType::Medication,
        SignatureType::CriticalRules,
        SignatureType::HouseRules,
        SignatureType::Ethics,
        SignatureType::CriminalHistory,
        SignatureType::AsamAssessment,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SignatureType::Emergency => "emergency",
            SignatureType::Medication => "medication",
            SignatureType::Disclosure => "disclosure",
            SignatureType::Treatment => "treatment",
            SignatureType::PriceConsent => "price_consent",
            SignatureType::TenantRights => "tenant_rights",
            SignatureType::ContractTerms => "contract_terms",
            SignatureType::CriminalHistory => "criminal_history",
            SignatureType::Ethics => "ethics",
            SignatureType::CriticalRules => "critical_rules",
            SignatureType::HouseRules => "house_rules",
            SignatureType::AsamAssessment => "asam_assessment",
            SignatureType::DigitalSignatureConsent => "digital_signature_consent",
            SignatureType::DrugScreeningConsent => "drug_screening_consent",
        }
    }

    pub fn parse(value: &str) -> Option<SignatureType> {
        SignatureType::ALL.iter().copied().find(|t| t.as_str() == value)
    }

    /// Prefixo usado no signatureId (`JH-<PREFIX>-...`).
    pub fn id_prefix(&self) -> &'static str {
        match self {
            SignatureType::Emergency => "EMER",
            SignatureType::Medication => "MED",
            SignatureType::Disclosure => "DISC",
            SignatureType::Treatment => "TREAT",
            SignatureType::PriceConsent => "PRICE",
            SignatureType::TenantRights => "TENANT",
            SignatureType::ContractTerms => "CONTRACT",
            SignatureType::CriminalHistory => "CRIM",
            SignatureType::Ethics => "ETHICS",
            SignatureType::CriticalRules => "CRIT",
            SignatureType::HouseRules => "HOUSE",
            SignatureType::AsamAssessment => "ASAM",
            SignatureType::DigitalSignatureConsent => "DIGSIG",
            SignatureType::DrugScreeningConsent => "DRUGSCR",
        }
    }

    // Política por tipo: as páginas de regras críticas e de preço amarram o
    // texto digitado ao aceite, então revogar descarta o registro inteiro.
    pub fn revoke_policy(&self) -> RevokePolicy {
        match self {
            SignatureType::CriticalRules | SignatureType::PriceConsent => RevokePolicy::ClearAll,
            _ => RevokePolicy::ClearStamps,
        }
    }
}

// =============================================================================
//  GERAÇÃO DE ID
// =============================================================================

const BASE36: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Formato `JH-<PREFIX>-<epochMillis>-<13 chars base36>`. Rastreabilidade
/// humana, não unicidade criptográfica — nunca usar para segurança.
pub fn generate_signature_id(prefix: &str) -> String {
    let mut rng = rand::thread_rng();
    let segment: String = (0..13)
        .map(|_| BASE36[rng.gen_range(0..BASE36.len())] as char)
        .collect();
    format!("JH-{}-{}-{}", prefix, Utc::now().timestamp_millis(), segment)
}

// =============================================================================
//  OPERAÇÕES SOBRE A LISTA
// =============================================================================

/// Atualização parcial aplicada por cima do registro existente (ou de um
/// registro vazio recém-sintetizado).
#[derive(Debug, Default, Clone)]
pub struct SignatureUpdate {
    pub signature: Option<String>,
    pub agreed: Option<bool>,
    pub witness_signature: Option<String>,
    pub updates: Option<serde_json::Value>,
}

pub fn find<'a>(
    signatures: &'a [SignatureRecord],
    signature_type: SignatureType,
) -> Option<&'a SignatureRecord> {
    signatures
        .iter()
        .find(|s| s.signature_type == signature_type.as_str())
}

/// Substitui-por-tipo: nunca duplica, sempre devolve lista nova.
pub fn upsert(
    signatures: &[SignatureRecord],
    signature_type: SignatureType,
    update: SignatureUpdate,
) -> Vec<SignatureRecord> {
    let mut record = find(signatures, signature_type).cloned().unwrap_or_else(|| {
        SignatureRecord {
            signature_type: signature_type.as_str().to_string(),
            signature_id: generate_signature_id(signature_type.id_prefix()),
            ..Default::default()
        }
    });

    if record.signature_id.is_empty() {
        record.signature_id = generate_signature_id(signature_type.id_prefix());
    }

    if let Some(signature) = update.signature {
        record.signature = signature;
    }
    if let Some(agreed) = update.agreed {
        record.agreed = agreed;
    }
    if let Some(snapshot) = update.updates {
        record.updates = Some(snapshot);
    }

    // Invariante: timestamp presente sempre que há aceite ou texto assinado.
    if (record.agreed || !record.signature.is_empty()) && record.signature_timestamp.is_none() {
        record.signature_timestamp = Some(Utc::now());
    }

    // Invariante: testemunha só depois da assinatura principal existir.
    if let Some(witness) = update.witness_signature {
        if record.signature.is_empty() {
            tracing::debug!(
                "witness update for '{}' ignored: primary signature still empty",
                record.signature_type
            );
        } else {
            record.witness_signature = witness;
            if record.witness_timestamp.is_none() {
                record.witness_timestamp = Some(Utc::now());
            }
            if record.witness_signature_id.is_empty() {
                record.witness_signature_id =
                    generate_signature_id(signature_type.id_prefix());
            }
        }
    }

    replace_by_type(signatures, record)
}

/// Desmarcar o "concordo": aplica a política do tipo de documento.
pub fn revoke(
    signatures: &[SignatureRecord],
    signature_type: SignatureType,
) -> Vec<SignatureRecord> {
    match signature_type.revoke_policy() {
        RevokePolicy::ClearAll => signatures
            .iter()
            .filter(|s| s.signature_type != signature_type.as_str())
            .cloned()
            .collect(),
        RevokePolicy::ClearStamps => {
            let Some(existing) = find(signatures, signature_type) else {
                return signatures.to_vec();
            };
            let mut record = existing.clone();
            record.agreed = false;
            record.signature_timestamp = None;
            record.signature_id = String::new();
            replace_by_type(signatures, record)
        }
    }
}

/// Checagem estrutural frouxa usada na fase permissiva da submissão.
/// Entradas que falham aqui são descartadas em silêncio (com warning),
/// nunca derrubam o lote.
pub fn passes_loose_check(record: &SignatureRecord) -> bool {
    if record.signature_type.trim().is_empty() {
        return false;
    }
    // Testemunha sem assinatura principal é um registro incoerente.
    if !record.witness_signature.is_empty() && record.signature.is_empty() {
        return false;
    }
    // Aceite ou texto assinado exigem timestamp.
    if (record.agreed || !record.signature.is_empty()) && record.signature_timestamp.is_none() {
        return false;
    }
    true
}

fn replace_by_type(signatures: &[SignatureRecord], record: SignatureRecord) -> Vec<SignatureRecord> {
    let mut next: Vec<SignatureRecord> = signatures
        .iter()
        .filter(|s| s.signature_type != record.signature_type)
        .cloned()
        .collect();
    next.push(record);
    next
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signed(signature_type: SignatureType) -> Vec<SignatureRecord> {
        upsert(
            &[],
            signature_type,
            SignatureUpdate {
                signature: Some("Jane Doe".into()),
                agreed: Some(true),
                ..Default::default()
            },
        )
    }

    #[test]
    fn upsert_is_idempotent_per_type() {
        let once = upsert(
            &[],
            SignatureType::Medication,
            SignatureUpdate {
                signature: Some("Jane Doe".into()),
                ..Default::default()
            },
        );
        let twice = upsert(
            &once,
            SignatureType::Medication,
            SignatureUpdate {
                signature: Some("Jane Doe".into()),
                ..Default::default()
            },
        );
        let count = twice
            .iter()
            .filter(|s| s.signature_type == "medication")
            .count();
        assert_eq!(count, 1);
        assert_eq!(twice.len(), 1);
    }

    #[test]
    fn upsert_preserves_signature_id_across_edits() {
        let first = signed(SignatureType::Treatment);
        let id = first[0].signature_id.clone();
        let second = upsert(
            &first,
            SignatureType::Treatment,
            SignatureUpdate {
                signature: Some("Jane Q. Doe".into()),
                ..Default::default()
            },
        );
        assert_eq!(second[0].signature_id, id);
        assert_eq!(second[0].signature, "Jane Q. Doe");
    }

    #[test]
    fn signature_id_has_expected_shape() {
        let id = generate_signature_id("MED");
        assert!(id.starts_with("JH-MED-"));
        let parts: Vec<&str> = id.split('-').collect();
        assert_eq!(parts.len(), 4);
        assert!(parts[2].parse::<i64>().is_ok());
        assert_eq!(parts[3].len(), 13);
        assert!(parts[3].chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit()));
    }

    #[test]
    fn agreeing_stamps_a_timestamp() {
        let list = upsert(
            &[],
            SignatureType::Ethics,
            SignatureUpdate {
                agreed: Some(true),
                ..Default::default()
            },
        );
        assert!(list[0].signature_timestamp.is_some());
    }

    #[test]
    fn witness_requires_primary_signature() {
        let list = upsert(
            &[],
            SignatureType::Emergency,
            SignatureUpdate {
                witness_signature: Some("Staff Member".into()),
                ..Default::default()
            },
        );
        assert!(list[0].witness_signature.is_empty());
        assert!(list[0].witness_timestamp.is_none());

        let signed = upsert(
            &list,
            SignatureType::Emergency,
            SignatureUpdate {
                signature: Some("Jane Doe".into()),
                ..Default::default()
            },
        );
        let witnessed = upsert(
            &signed,
            SignatureType::Emergency,
            SignatureUpdate {
                witness_signature: Some("Staff Member".into()),
                ..Default::default()
            },
        );
        assert_eq!(witnessed[0].witness_signature, "Staff Member");
        assert!(witnessed[0].witness_timestamp.is_some());
    }

    #[test]
    fn revoking_medication_keeps_typed_name() {
        let list = signed(SignatureType::Medication);
        let revoked = revoke(&list, SignatureType::Medication);
        assert_eq!(revoked.len(), 1);
        assert_eq!(revoked[0].signature, "Jane Doe");
        assert!(!revoked[0].agreed);
        assert!(revoked[0].signature_timestamp.is_none());
        assert!(revoked[0].signature_id.is_empty());
    }

    #[test]
    fn revoking_critical_rules_drops_whole_record() {
        let list = signed(SignatureType::CriticalRules);
        let revoked = revoke(&list, SignatureType::CriticalRules);
        assert!(revoked.is_empty());
    }

    #[test]
    fn revoking_price_consent_drops_whole_record() {
        let list = signed(SignatureType::PriceConsent);
        assert!(revoke(&list, SignatureType::PriceConsent).is_empty());
    }

    #[test]
    fn loose_check_drops_incoherent_records() {
        // tipo vazio
        assert!(!passes_loose_check(&SignatureRecord::default()));

        // testemunha órfã
        let orphan_witness = SignatureRecord {
            signature_type: "medication".into(),
            witness_signature: "Staff".into(),
            ..Default::default()
        };
        assert!(!passes_loose_check(&orphan_witness));

        // aceite sem timestamp
        let agreed_without_stamp = SignatureRecord {
            signature_type: "ethics".into(),
            agreed: true,
            ..Default::default()
        };
        assert!(!passes_loose_check(&agreed_without_stamp));

        // tipo desconhecido mas estruturalmente coerente: mantido
        let forward_compatible = SignatureRecord {
            signature_type: "future_consent".into(),
            signature: "Jane Doe".into(),
            signature_timestamp: Some(Utc::now()),
            signature_id: "JH-FUT-1-abc".into(),
            ..Default::default()
        };
        assert!(passes_loose_check(&forward_compatible));
    }
}
