// src/form/gating.rs
//
// Regras de travamento página-a-página do formulário. Cada página tem uma
// regra fixa (assinaturas exigidas, listas completas ou flag de revisão).
// A única regra de negócio que curto-circuita tudo: isSexOffender = true
// desqualifica imediatamente, em qualquer página.

use crate::form::signatures::{self, SignatureType};
use crate::models::intake::{IntakeRecord, SignatureRecord};

pub const DISQUALIFIED_MESSAGE: &str = "Interview must be terminated immediately";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OnboardingPage {
    Demographics,
    HealthStatus,
    VehicleInsurance,
    EmergencyContact,
    MedicalScreening,
    EmergencyCareConsent,
    MedicationPolicy,
    AuthorizedPeople,
    TreatmentConsent,
    FeeSchedule,
    HouseRules,
    CriminalHistory,
    AsamAssessment,
    ProgramOverview,
    Review,
}

impl OnboardingPage {
    pub const ALL: [OnboardingPage; 15] = [
        OnboardingPage::Demographics,
        OnboardingPage::HealthStatus,
        OnboardingPage::VehicleInsurance,
        OnboardingPage::EmergencyContact,
        OnboardingPage::MedicalScreening,
        OnboardingPage::EmergencyCareConsent,
        OnboardingPage::MedicationPolicy,
        OnboardingPage::AuthorizedPeople,
        OnboardingPage::TreatmentConsent,
        OnboardingPage::FeeSchedule,
        OnboardingPage::HouseRules,
        OnboardingPage::CriminalHistory,
        OnboardingPage::AsamAssessment,
        OnboardingPage::ProgramOverview,
        OnboardingPage::Review,
    ];
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageGate {
    /// O "Next" desta página está liberado.
    Ready,
    /// Falta algo; a razão é exibível ao usuário.
    Incomplete(&'static str),
    /// Condição terminal — não é campo faltando, é entrevista encerrada.
    Disqualified,
}

pub fn page_status(draft: &IntakeRecord, page: OnboardingPage) -> PageGate {
    // Desqualificação vence qualquer outra checagem, em qualquer página.
    if draft.legal_status.is_sex_offender {
        return PageGate::Disqualified;
    }

    match page {
        OnboardingPage::Demographics => {
            let filled = !draft.first_name.trim().is_empty()
                && !draft.last_name.trim().is_empty()
                && !draft.date_of_birth.trim().is_empty()
                && !draft.social_security_number.trim().is_empty()
                && !draft.email.trim().is_empty()
                && !draft.intake_date.trim().is_empty();
            gate(filled, "Complete the personal information fields")
        }
        OnboardingPage::HealthStatus => PageGate::Ready,
        OnboardingPage::VehicleInsurance => match &draft.vehicle {
            // Declarar "sem veículo" é uma resposta completa.
            None => PageGate::Ready,
            Some(vehicle) if vehicle.insured => gate(
                !vehicle.insurance_type.is_empty() && !vehicle.policy_number.is_empty(),
                "Insurance type and policy number are required for insured vehicles",
            ),
            Some(_) => PageGate::Ready,
        },
        OnboardingPage::EmergencyContact => {
            let contact = &draft.emergency_contact;
            let filled = !contact.first_name.trim().is_empty()
                && !contact.last_name.trim().is_empty()
                && contact.phone.trim().len() >= 10
                && !contact.relationship.trim().is_empty();
            gate(filled, "Complete the emergency contact information")
        }
        OnboardingPage::MedicalScreening => {
            if draft.medical_information.mat && draft.medical_information.mat_medication.is_empty()
            {
                PageGate::Incomplete("MAT medication is required while on MAT")
            } else {
                PageGate::Ready
            }
        }
        OnboardingPage::EmergencyCareConsent => {
            signed_with_witness(draft, SignatureType::Emergency)
        }
        OnboardingPage::MedicationPolicy => signed(draft, SignatureType::Medication),
        OnboardingPage::AuthorizedPeople => {
            let complete = !draft.authorized_people.is_empty()
                && draft.authorized_people.iter().all(|p| {
                    !p.first_name.is_empty()
                        && !p.last_name.is_empty()
                        && !p.relationship.is_empty()
                        && !p.phone.is_empty()
                });
            gate(complete, "All authorized people must have complete information")
        }
        OnboardingPage::TreatmentConsent => signed(draft, SignatureType::Treatment),
        OnboardingPage::FeeSchedule => signed_with_witness(draft, SignatureType::PriceConsent),
        OnboardingPage::HouseRules => {
            match signed(draft, SignatureType::HouseRules) {
                PageGate::Ready => signed(draft, SignatureType::CriticalRules),
                blocked => blocked,
            }
        }
        OnboardingPage::CriminalHistory => signed(draft, SignatureType::CriminalHistory),
        OnboardingPage::AsamAssessment => signed(draft, SignatureType::AsamAssessment),
        OnboardingPage::ProgramOverview => gate(
            draft.program_info_reviewed,
            "Review the program information before continuing",
        ),
        OnboardingPage::Review => ready_to_submit(draft),
    }
}

/// Gate terminal: todas as páginas prontas + passe estrito de completude
/// sobre a enumeração fixa de assinaturas obrigatórias.
pub fn ready_to_submit(draft: &IntakeRecord) -> PageGate {
    if draft.legal_status.is_sex_offender {
        return PageGate::Disqualified;
    }

    for page in OnboardingPage::ALL {
        if page == OnboardingPage::Review {
            continue;
        }
        match page_status(draft, page) {
            PageGate::Ready => {}
            blocked => return blocked,
        }
    }

    for required in SignatureType::REQUIRED_AT_SUBMISSION {
        match signatures::find(&draft.signatures, required) {
            Some(record) if is_complete(record) => {}
            _ => return PageGate::Incomplete("Missing required signature information"),
        }
    }

    PageGate::Ready
}

fn is_complete(record: &SignatureRecord) -> bool {
    !record.signature.is_empty()
        && record.signature_timestamp.is_some()
        && !record.signature_id.is_empty()
}

fn signed(draft: &IntakeRecord, signature_type: SignatureType) -> PageGate {
    match signatures::find(&draft.signatures, signature_type) {
        Some(record) if is_complete(record) => PageGate::Ready,
        _ => PageGate::Incomplete("Signature is required to continue"),
    }
}

fn signed_with_witness(draft: &IntakeRecord, signature_type: SignatureType) -> PageGate {
    match signatures::find(&draft.signatures, signature_type) {
        Some(record) if is_complete(record) && !record.witness_signature.is_empty() => {
            PageGate::Ready
        }
        _ => PageGate::Incomplete("Resident and witness signatures are required to continue"),
    }
}

fn gate(condition: bool, reason: &'static str) -> PageGate {
    if condition { PageGate::Ready } else { PageGate::Incomplete(reason) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::draft::apply_signature;
    use crate::form::signatures::SignatureUpdate;
    use crate::models::intake::{AuthorizedPerson, EmergencyContact};

    fn complete_draft() -> IntakeRecord {
        let mut draft = IntakeRecord {
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
            authorized_people: vec![AuthorizedPerson {
                first_name: "C".into(),
                last_name: "D".into(),
                relationship: "sibling".into(),
                phone: "0987654321".into(),
            }],
            program_info_reviewed: true,
            ..Default::default()
        };

        for signature_type in [
            SignatureType::Emergency,
            SignatureType::Medication,
            SignatureType::Treatment,
            SignatureType::PriceConsent,
            SignatureType::HouseRules,
            SignatureType::CriticalRules,
            SignatureType::Ethics,
            SignatureType::CriminalHistory,
            SignatureType::AsamAssessment,
        ] {
            apply_signature(
                &mut draft,
                signature_type,
                SignatureUpdate {
                    signature: Some("Jane Doe".into()),
                    agreed: Some(true),
                    ..Default::default()
                },
            );
            apply_signature(
                &mut draft,
                signature_type,
                SignatureUpdate {
                    witness_signature: Some("Staff Member".into()),
                    ..Default::default()
                },
            );
        }
        draft
    }

    #[test]
    fn complete_draft_is_ready_to_submit() {
        let draft = complete_draft();
        assert_eq!(ready_to_submit(&draft), PageGate::Ready);
    }

    #[test]
    fn sex_offender_flag_disqualifies_every_page() {
        let mut draft = complete_draft();
        draft.legal_status.is_sex_offender = true;

        for page in OnboardingPage::ALL {
            assert_eq!(page_status(&draft, page), PageGate::Disqualified);
        }
        assert_eq!(ready_to_submit(&draft), PageGate::Disqualified);
        assert_eq!(DISQUALIFIED_MESSAGE, "Interview must be terminated immediately");
    }

    #[test]
    fn missing_required_signature_blocks_submission() {
        let mut draft = complete_draft();
        draft
            .signatures
            .retain(|s| s.signature_type != SignatureType::Ethics.as_str());
        assert!(matches!(ready_to_submit(&draft), PageGate::Incomplete(_)));
    }

    #[test]
    fn unreviewed_program_info_blocks_its_page() {
        let mut draft = complete_draft();
        draft.program_info_reviewed = false;
        assert!(matches!(
            page_status(&draft, OnboardingPage::ProgramOverview),
            PageGate::Incomplete(_)
        ));
    }

    #[test]
    fn witness_pages_demand_witness_signature() {
        let mut draft = complete_draft();
        for signature in draft.signatures.iter_mut() {
            if signature.signature_type == SignatureType::PriceConsent.as_str() {
                signature.witness_signature.clear();
            }
        }
        assert!(matches!(
            page_status(&draft, OnboardingPage::FeeSchedule),
            PageGate::Incomplete(_)
        ));
    }

    #[test]
    fn no_vehicle_is_a_complete_answer() {
        let mut draft = complete_draft();
        draft.vehicle = None;
        assert_eq!(
            page_status(&draft, OnboardingPage::VehicleInsurance),
            PageGate::Ready
        );
    }

    #[test]
    fn incomplete_authorized_person_blocks_page() {
        let mut draft = complete_draft();
        draft.authorized_people[0].phone.clear();
        assert!(matches!(
            page_status(&draft, OnboardingPage::AuthorizedPeople),
            PageGate::Incomplete(_)
        ));
    }
}
