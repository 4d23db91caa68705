// src/form/draft.rs
//
// Acumulador de estado do formulário multi-página. As regras de limpeza de
// campos dependentes disparam de forma síncrona dentro do próprio `apply`:
// quem desmarca "tem veículo segurado" não pode carregar um número de apólice
// fantasma até a submissão.

use crate::form::paths::{
    EmergencyContactUpdate, FieldUpdate, HealthFlag, HealthStatusUpdate, LegalStatusUpdate,
    MedicalUpdate, MentalHealthFlagsUpdate, VehicleUpdate,
};
use crate::form::signatures::{self, SignatureType, SignatureUpdate};
use crate::models::intake::IntakeRecord;

pub fn apply(draft: &mut IntakeRecord, update: FieldUpdate) {
    match update {
        FieldUpdate::FirstName(v) => draft.first_name = v,
        FieldUpdate::LastName(v) => draft.last_name = v,
        FieldUpdate::IntakeDate(v) => draft.intake_date = v,
        FieldUpdate::HousingLocation(v) => draft.housing_location = v,
        FieldUpdate::DateOfBirth(v) => draft.date_of_birth = v,
        FieldUpdate::SocialSecurityNumber(v) => draft.social_security_number = v,
        FieldUpdate::Sex(v) => draft.sex = v,
        FieldUpdate::Email(v) => draft.email = v,
        FieldUpdate::DriversLicenseNumber(v) => draft.drivers_license_number = v,
        FieldUpdate::PhoneNumber(v) => draft.phone_number = v,

        FieldUpdate::HealthStatus(update) => apply_health_status(draft, update),

        FieldUpdate::HasVehicle(has_vehicle) => {
            // Ausente != presente-com-campos-vazios; a persistência depende disso.
            draft.vehicle = has_vehicle.then(Default::default);
        }
        FieldUpdate::Vehicle(update) => {
            let vehicle = draft.vehicle.get_or_insert_with(Default::default);
            match update {
                VehicleUpdate::Make(v) => vehicle.make = v,
                VehicleUpdate::Model(v) => vehicle.model = v,
                VehicleUpdate::TagNumber(v) => vehicle.tag_number = v,
                VehicleUpdate::Insured(insured) => {
                    vehicle.insured = insured;
                    if !insured {
                        vehicle.insurance_type.clear();
                        vehicle.policy_number.clear();
                    }
                }
                VehicleUpdate::InsuranceType(v) => vehicle.insurance_type = v,
                VehicleUpdate::PolicyNumber(v) => vehicle.policy_number = v,
            }
        }

        FieldUpdate::EmergencyContact(update) => match update {
            EmergencyContactUpdate::FirstName(v) => draft.emergency_contact.first_name = v,
            EmergencyContactUpdate::LastName(v) => draft.emergency_contact.last_name = v,
            EmergencyContactUpdate::Phone(v) => draft.emergency_contact.phone = v,
            EmergencyContactUpdate::Relationship(v) => draft.emergency_contact.relationship = v,
            EmergencyContactUpdate::OtherRelationship(v) => {
                draft.emergency_contact.other_relationship = v
            }
        },

        FieldUpdate::MedicalInformation(update) => match update {
            MedicalUpdate::DualDiagnosis(v) => draft.medical_information.dual_diagnosis = v,
            MedicalUpdate::Mat(mat) => {
                draft.medical_information.mat = mat;
                if !mat {
                    draft.medical_information.mat_medication.clear();
                    draft.medical_information.mat_medication_other.clear();
                }
            }
            MedicalUpdate::MatMedication(v) => draft.medical_information.mat_medication = v,
            MedicalUpdate::MatMedicationOther(v) => {
                draft.medical_information.mat_medication_other = v
            }
            MedicalUpdate::NeedPsychMedication(v) => {
                draft.medical_information.need_psych_medication = v
            }
        },

        FieldUpdate::LegalStatus(update) => match update {
            LegalStatusUpdate::HasProbationPretrial(value) => {
                draft.legal_status.has_probation_pretrial = value;
                if !value {
                    draft.legal_status.jurisdictions.clear();
                    draft.legal_status.other_jurisdiction.clear();
                    draft.probation_history.clear();
                }
            }
            LegalStatusUpdate::Jurisdictions(v) => draft.legal_status.jurisdictions = v,
            LegalStatusUpdate::OtherJurisdiction(v) => draft.legal_status.other_jurisdiction = v,
            LegalStatusUpdate::HasPendingCharges(value) => {
                draft.legal_status.has_pending_charges = value;
                if !value {
                    draft.pending_charges.clear();
                }
            }
            LegalStatusUpdate::HasConvictions(value) => {
                draft.legal_status.has_convictions = value;
                if !value {
                    draft.convictions.clear();
                }
            }
            LegalStatusUpdate::IsWanted(v) => draft.legal_status.is_wanted = v,
            LegalStatusUpdate::IsOnBond(value) => {
                draft.legal_status.is_on_bond = value;
                if !value {
                    draft.legal_status.bondsman_name.clear();
                }
            }
            LegalStatusUpdate::BondsmanName(v) => draft.legal_status.bondsman_name = v,
            LegalStatusUpdate::IsSexOffender(v) => draft.legal_status.is_sex_offender = v,
        },

        FieldUpdate::MentalHealthFlags(update) => match update {
            MentalHealthFlagsUpdate::SuicidalIdeation(v) => {
                draft.mental_health.suicidal_ideation = v
            }
            MentalHealthFlagsUpdate::HomicidalIdeation(v) => {
                draft.mental_health.homicidal_ideation = v
            }
            MentalHealthFlagsUpdate::Hallucinations(v) => draft.mental_health.hallucinations = v,
        },

        FieldUpdate::Medications(v) => draft.medications = v,
        FieldUpdate::AuthorizedPeople(v) => draft.authorized_people = v,
        FieldUpdate::PendingCharges(v) => draft.pending_charges = v,
        FieldUpdate::Convictions(v) => draft.convictions = v,
        FieldUpdate::MentalHealthEntries(v) => draft.mental_health.entries = v,
        FieldUpdate::DrugHistory(v) => draft.drug_history = v,
        FieldUpdate::RecoveryResidences(v) => draft.recovery_residences = v,
        FieldUpdate::TreatmentHistory(v) => draft.treatment_history = v,
        FieldUpdate::IncarcerationHistory(v) => draft.incarceration_history = v,
        FieldUpdate::ProbationHistory(v) => draft.probation_history = v,
        FieldUpdate::DrugTestResult { test_type, positive } => {
            draft.drug_test_results.insert(test_type, positive);
        }

        FieldUpdate::ProgramInfoReviewed(v) => draft.program_info_reviewed = v,
    }
}

fn apply_health_status(draft: &mut IntakeRecord, update: HealthStatusUpdate) {
    let hs = &mut draft.health_status;
    match update {
        HealthStatusUpdate::Flag(flag, value) => {
            let slot = match flag {
                HealthFlag::Pregnant => &mut hs.pregnant,
                HealthFlag::DevelopmentallyDisabled => &mut hs.developmentally_disabled,
                HealthFlag::CoOccurringDisorder => &mut hs.co_occurring_disorder,
                HealthFlag::DocSupervision => &mut hs.doc_supervision,
                HealthFlag::Felon => &mut hs.felon,
                HealthFlag::PhysicallyHandicapped => &mut hs.physically_handicapped,
                HealthFlag::PostPartum => &mut hs.post_partum,
                HealthFlag::PrimaryFemaleCaregiver => &mut hs.primary_female_caregiver,
                HealthFlag::RecentlyIncarcerated => &mut hs.recently_incarcerated,
                HealthFlag::SexOffender => &mut hs.sex_offender,
                HealthFlag::Lgbtq => &mut hs.lgbtq,
                HealthFlag::Veteran => &mut hs.veteran,
                HealthFlag::InsulinDependent => &mut hs.insulin_dependent,
                HealthFlag::HistoryOfSeizures => &mut hs.history_of_seizures,
            };
            *slot = value;
        }
        HealthStatusUpdate::Others(v) => hs.others = v,
        HealthStatusUpdate::Race(v) => hs.race = v,
        HealthStatusUpdate::Ethnicity(v) => hs.ethnicity = v,
        HealthStatusUpdate::HouseholdIncome(v) => hs.household_income = v,
        HealthStatusUpdate::EmploymentStatus(v) => hs.employment_status = v,
    }
}

/// Atalho para as páginas de assinatura: upsert no registro do tipo dado,
/// substituindo a lista do rascunho pela versão nova.
pub fn apply_signature(
    draft: &mut IntakeRecord,
    signature_type: SignatureType,
    update: SignatureUpdate,
) {
    draft.signatures = signatures::upsert(&draft.signatures, signature_type, update);
}

/// Revogação de consentimento, respeitando a política por tipo de documento.
pub fn revoke_signature(draft: &mut IntakeRecord, signature_type: SignatureType) {
    draft.signatures = signatures::revoke(&draft.signatures, signature_type);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::intake::Jurisdiction;

    #[test]
    fn uninsuring_vehicle_clears_policy_fields() {
        let mut draft = IntakeRecord::default();
        apply(&mut draft, FieldUpdate::HasVehicle(true));
        apply(&mut draft, FieldUpdate::Vehicle(VehicleUpdate::Insured(true)));
        apply(
            &mut draft,
            FieldUpdate::Vehicle(VehicleUpdate::InsuranceType("private".into())),
        );
        apply(
            &mut draft,
            FieldUpdate::Vehicle(VehicleUpdate::PolicyNumber("POL-123".into())),
        );

        apply(&mut draft, FieldUpdate::Vehicle(VehicleUpdate::Insured(false)));

        let vehicle = draft.vehicle.as_ref().unwrap();
        assert_eq!(vehicle.insurance_type, "");
        assert_eq!(vehicle.policy_number, "");
    }

    #[test]
    fn declaring_no_vehicle_clears_the_whole_subrecord() {
        let mut draft = IntakeRecord::default();
        apply(&mut draft, FieldUpdate::HasVehicle(true));
        apply(
            &mut draft,
            FieldUpdate::Vehicle(VehicleUpdate::Make("Toyota".into())),
        );
        assert!(draft.vehicle.is_some());

        apply(&mut draft, FieldUpdate::HasVehicle(false));
        // Ausente, não "presente com campos vazios".
        assert!(draft.vehicle.is_none());
    }

    #[test]
    fn dropping_probation_clears_jurisdictions_and_history() {
        let mut draft = IntakeRecord::default();
        apply(
            &mut draft,
            FieldUpdate::LegalStatus(LegalStatusUpdate::HasProbationPretrial(true)),
        );
        apply(
            &mut draft,
            FieldUpdate::LegalStatus(LegalStatusUpdate::Jurisdictions(vec![Jurisdiction {
                name: "Marion County".into(),
            }])),
        );
        apply(
            &mut draft,
            FieldUpdate::LegalStatus(LegalStatusUpdate::OtherJurisdiction("Other".into())),
        );
        apply(
            &mut draft,
            FieldUpdate::ProbationHistory(vec![Default::default()]),
        );

        apply(
            &mut draft,
            FieldUpdate::LegalStatus(LegalStatusUpdate::HasProbationPretrial(false)),
        );

        assert!(draft.legal_status.jurisdictions.is_empty());
        assert_eq!(draft.legal_status.other_jurisdiction, "");
        assert!(draft.probation_history.is_empty());
    }

    #[test]
    fn turning_off_mat_clears_medication_fields() {
        let mut draft = IntakeRecord::default();
        apply(&mut draft, FieldUpdate::MedicalInformation(MedicalUpdate::Mat(true)));
        apply(
            &mut draft,
            FieldUpdate::MedicalInformation(MedicalUpdate::MatMedication("suboxone".into())),
        );
        apply(
            &mut draft,
            FieldUpdate::MedicalInformation(MedicalUpdate::MatMedicationOther("x".into())),
        );

        apply(&mut draft, FieldUpdate::MedicalInformation(MedicalUpdate::Mat(false)));

        assert_eq!(draft.medical_information.mat_medication, "");
        assert_eq!(draft.medical_information.mat_medication_other, "");
    }

    #[test]
    fn nested_update_does_not_clobber_siblings() {
        let mut draft = IntakeRecord::default();
        apply(
            &mut draft,
            FieldUpdate::LegalStatus(LegalStatusUpdate::BondsmanName("Smith".into())),
        );
        apply(
            &mut draft,
            FieldUpdate::LegalStatus(LegalStatusUpdate::IsWanted(true)),
        );
        assert_eq!(draft.legal_status.bondsman_name, "Smith");
        assert!(draft.legal_status.is_wanted);
    }

    #[test]
    fn signature_shortcut_round_trips_through_ledger() {
        let mut draft = IntakeRecord::default();
        apply_signature(
            &mut draft,
            SignatureType::Medication,
            SignatureUpdate {
                signature: Some("Jane Doe".into()),
                agreed: Some(true),
                ..Default::default()
            },
        );
        assert_eq!(draft.signatures.len(), 1);

        revoke_signature(&mut draft, SignatureType::Medication);
        assert_eq!(draft.signatures[0].signature, "Jane Doe");
        assert!(draft.signatures[0].signature_id.is_empty());
    }
}
