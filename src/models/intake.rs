// src/models/intake.rs

use std::collections::BTreeMap;
use std::sync::LazyLock;

use chrono::{DateTime, NaiveDate, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

static SSN_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{3}-\d{2}-\d{4}$").expect("regex de SSN inválida"));

/// Aceita tanto data pura (`2024-01-01`) quanto timestamp ISO completo.
pub fn parse_iso_date(value: &str) -> Option<NaiveDate> {
    if let Ok(date) = value.parse::<NaiveDate>() {
        return Some(date);
    }
    DateTime::parse_from_rfc3339(value)
        .ok()
        .map(|dt| dt.date_naive())
}

// A mensagem é decidida por ramo: campo vazio reporta "required" com a
// mensagem do campo; data presente mas imparseável reporta "invalid_date".
fn validate_date_field(value: &str, required_message: &'static str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("required").with_message(required_message.into()));
    }
    if parse_iso_date(value).is_none() {
        return Err(
            ValidationError::new("invalid_date").with_message("A valid ISO date is required".into())
        );
    }
    Ok(())
}

fn validate_intake_date(value: &str) -> Result<(), ValidationError> {
    validate_date_field(value, "Intake date is required")
}

fn validate_date_of_birth(value: &str) -> Result<(), ValidationError> {
    validate_date_field(value, "Date of birth is required")
}

// =============================================================================
//  REGISTRO DE INTAKE (o "Draft Record" completo, acumulado página a página)
// =============================================================================

// Todos os campos têm default estrutural: um corpo parcial desserializa e as
// violações aparecem como erros de validação por campo, nunca como falha de
// desserialização por campo ausente.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct IntakeRecord {
    #[validate(length(min = 1, message = "First name is required"))]
    pub first_name: String,

    #[validate(length(min = 1, message = "Last name is required"))]
    pub last_name: String,

    #[validate(custom(function = validate_intake_date))]
    pub intake_date: String,

    pub housing_location: String,

    #[validate(custom(function = validate_date_of_birth))]
    pub date_of_birth: String,

    #[validate(regex(path = *SSN_REGEX, message = "Valid Social Security Number is required"))]
    pub social_security_number: String,

    pub sex: String,

    #[validate(email(message = "Valid email is required"))]
    pub email: String,

    pub drivers_license_number: String,
    pub phone_number: String,

    #[validate(nested)]
    pub health_status: HealthStatus,

    /// `None` significa "declarou não ter veículo" — diferente de um veículo
    /// com campos em branco. A camada de persistência depende da distinção.
    pub vehicle: Option<Vehicle>,

    #[validate(nested)]
    pub emergency_contact: EmergencyContact,

    pub medical_information: MedicalInformation,
    pub medications: Vec<String>,

    #[validate(nested)]
    pub authorized_people: Vec<AuthorizedPerson>,

    pub legal_status: LegalStatus,
    pub pending_charges: Vec<PendingCharge>,
    pub convictions: Vec<Conviction>,

    pub mental_health: MentalHealth,
    pub drug_history: Vec<DrugHistoryEntry>,
    pub recovery_residences: Vec<RecoveryResidence>,
    pub treatment_history: Vec<TreatmentEntry>,
    pub incarceration_history: Vec<IncarcerationEntry>,
    pub probation_history: Vec<ProbationEntry>,

    /// Mapa abreviação-do-teste -> resultado positivo.
    pub drug_test_results: BTreeMap<String, bool>,

    /// Flag de revisão do material do programa (setada por colaborador
    /// externo após scroll/dwell na página de informações).
    pub program_info_reviewed: bool,

    pub signatures: Vec<SignatureRecord>,
}

impl IntakeRecord {
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name.trim(), self.last_name.trim())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct HealthStatus {
    pub pregnant: bool,
    pub developmentally_disabled: bool,
    pub co_occurring_disorder: bool,
    pub doc_supervision: bool,
    pub felon: bool,
    pub physically_handicapped: bool,
    pub post_partum: bool,
    pub primary_female_caregiver: bool,
    pub recently_incarcerated: bool,
    pub sex_offender: bool,
    pub lgbtq: bool,
    pub veteran: bool,
    pub insulin_dependent: bool,
    pub history_of_seizures: bool,
    pub others: Vec<String>,
    pub race: String,
    pub ethnicity: String,
    pub household_income: String,
    pub employment_status: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct Vehicle {
    pub make: String,
    pub model: String,
    pub tag_number: String,
    pub insured: bool,
    pub insurance_type: String,
    pub policy_number: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct EmergencyContact {
    #[validate(length(min = 1, message = "Emergency contact first name is required"))]
    pub first_name: String,

    #[validate(length(min = 1, message = "Emergency contact last name is required"))]
    pub last_name: String,

    #[validate(length(min = 10, message = "Valid emergency contact phone is required"))]
    pub phone: String,

    #[validate(length(min = 1, message = "Emergency contact relationship is required"))]
    pub relationship: String,

    pub other_relationship: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct MedicalInformation {
    pub dual_diagnosis: bool,
    pub mat: bool,
    pub mat_medication: String,
    pub mat_medication_other: String,
    pub need_psych_medication: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct AuthorizedPerson {
    #[validate(length(min = 1, message = "First name is required"))]
    pub first_name: String,

    #[validate(length(min = 1, message = "Last name is required"))]
    pub last_name: String,

    #[validate(length(min = 1, message = "Relationship is required"))]
    pub relationship: String,

    #[validate(length(min = 10, message = "Valid phone number is required"))]
    pub phone: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct LegalStatus {
    pub has_probation_pretrial: bool,

    /// Lista estruturada; o normalizador converte o formato legado
    /// (string única separada por vírgulas) para cá.
    pub jurisdictions: Vec<Jurisdiction>,

    pub other_jurisdiction: String,
    pub has_pending_charges: bool,
    pub has_convictions: bool,
    pub is_wanted: bool,
    pub is_on_bond: bool,
    pub bondsman_name: String,
    pub is_sex_offender: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct Jurisdiction {
    pub name: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct PendingCharge {
    pub charge_description: String,
    pub location: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct Conviction {
    pub offense: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct MentalHealth {
    pub suicidal_ideation: bool,
    pub homicidal_ideation: bool,
    pub hallucinations: bool,
    pub entries: Vec<MentalHealthEntry>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct MentalHealthEntry {
    pub diagnosis: String,
    pub date_of_diagnosis: String,
    pub prescribed_medication: bool,
    pub medication_compliant: bool,
    pub current_symptoms: bool,
    pub describe_symptoms: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct DrugHistoryEntry {
    pub drug_type: String,
    pub ever_used: bool,
    pub date_last_use: String,
    pub frequency: String,
    pub intravenous: bool,
    pub total_years: String,
    pub amount: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct RecoveryResidence {
    pub name: String,
    pub start_date: String,
    pub end_date: String,
    pub location: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct TreatmentEntry {
    #[serde(rename = "type")]
    pub treatment_type: String,
    pub estimated_date: String,
    pub location: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct IncarcerationEntry {
    #[serde(rename = "type")]
    pub incarceration_type: String,
    pub estimated_date: String,
    pub location: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct ProbationEntry {
    #[serde(rename = "type")]
    pub probation_type: String,
    pub jurisdiction: String,
    pub start_date: String,
    pub end_date: String,
    pub officer_name: String,
    pub officer_email: String,
    pub officer_phone: String,
}

// =============================================================================
//  ASSINATURA (um evento de consentimento por tipo de documento)
// =============================================================================

// Schema deliberadamente frouxo: `signature_type` é string aberta para
// tolerar tipos de assinatura que este backend ainda não conhece. A validação
// estrita por tipo acontece no gate final do formulário, não aqui.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct SignatureRecord {
    pub signature_type: String,

    /// Nome legal completo digitado — esse texto É o artefato da assinatura.
    pub signature: String,

    pub signature_timestamp: Option<DateTime<Utc>>,
    pub signature_id: String,
    pub agreed: bool,

    pub witness_signature: String,
    pub witness_timestamp: Option<DateTime<Utc>>,
    pub witness_signature_id: String,

    /// Snapshot livre do dado que a assinatura atesta (ex.: o payload da
    /// divulgação de antecedentes criminais no momento do aceite).
    pub updates: Option<Value>,
}

/// Recibo devolvido ao chamador após uma submissão bem-sucedida.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SubmissionReceipt {
    pub participant_id: uuid::Uuid,
    pub name: String,
    pub intake_date: NaiveDate,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SubmitResponse {
    pub success: bool,
    pub message: String,
    pub data: SubmissionReceipt,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_valid_record_passes_validation() {
        let record = IntakeRecord {
            first_name: "Jane".into(),
            last_name: "Doe".into(),
            email: "jane@x.com".into(),
            social_security_number: "123-45-6789".into(),
            date_of_birth: "1990-01-01".into(),
            intake_date: "2024-01-01".into(),
            emergency_contact: EmergencyContact {
                first_name: "A".into(),
                last_name: "B".into(),
                phone: "1234567890".into(),
                relationship: "parent".into(),
                other_relationship: String::new(),
            },
            ..Default::default()
        };
        assert!(record.validate().is_ok());
    }

    #[test]
    fn ssn_without_dashes_is_rejected() {
        let record = IntakeRecord {
            first_name: "Jane".into(),
            last_name: "Doe".into(),
            email: "jane@x.com".into(),
            social_security_number: "123456789".into(),
            date_of_birth: "1990-01-01".into(),
            intake_date: "2024-01-01".into(),
            emergency_contact: EmergencyContact {
                first_name: "A".into(),
                last_name: "B".into(),
                phone: "1234567890".into(),
                relationship: "parent".into(),
                other_relationship: String::new(),
            },
            ..Default::default()
        };
        let errors = record.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("social_security_number"));
    }

    #[test]
    fn violations_are_collected_not_short_circuited() {
        let record = IntakeRecord::default();
        let errors = record.validate().unwrap_err();
        let fields = errors.field_errors();
        // Vários campos inválidos reportados de uma vez.
        assert!(fields.contains_key("first_name"));
        assert!(fields.contains_key("last_name"));
        assert!(fields.contains_key("email"));
        assert!(fields.contains_key("social_security_number"));
    }

    #[test]
    fn unparseable_date_reports_invalid_not_required() {
        let record = IntakeRecord {
            first_name: "Jane".into(),
            last_name: "Doe".into(),
            email: "jane@x.com".into(),
            social_security_number: "123-45-6789".into(),
            date_of_birth: "1990-01-01".into(),
            intake_date: "01/15/2024".into(),
            emergency_contact: EmergencyContact {
                first_name: "A".into(),
                last_name: "B".into(),
                phone: "1234567890".into(),
                relationship: "parent".into(),
                other_relationship: String::new(),
            },
            ..Default::default()
        };
        let errors = record.validate().unwrap_err();
        let fields = errors.field_errors();
        let intake_errors = &fields["intake_date"];
        assert_eq!(intake_errors[0].code, "invalid_date");
        assert_eq!(
            intake_errors[0].message.as_deref(),
            Some("A valid ISO date is required")
        );

        let empty = IntakeRecord::default();
        let errors = empty.validate().unwrap_err();
        let fields = errors.field_errors();
        let intake_errors = &fields["intake_date"];
        assert_eq!(intake_errors[0].code, "required");
        assert_eq!(
            intake_errors[0].message.as_deref(),
            Some("Intake date is required")
        );
    }

    #[test]
    fn iso_dates_accept_date_and_datetime() {
        assert_eq!(
            parse_iso_date("2024-01-01"),
            NaiveDate::from_ymd_opt(2024, 1, 1)
        );
        assert_eq!(
            parse_iso_date("2024-01-01T00:00:00Z"),
            NaiveDate::from_ymd_opt(2024, 1, 1)
        );
        assert_eq!(parse_iso_date("not-a-date"), None);
    }
}
