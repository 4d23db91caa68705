// src/form/paths.rs
//
// Caminhos de atualização do rascunho como tipo etiquetado, no lugar do
// esquema dinâmico "name.includes('.')" com split de string em runtime.
// Cada variante carrega o valor já com o tipo certo, então o `match` em
// `draft::apply` é exaustivo em tempo de compilação.

use crate::models::intake::{
    AuthorizedPerson, Conviction, DrugHistoryEntry, IncarcerationEntry, Jurisdiction,
    MentalHealthEntry, PendingCharge, ProbationEntry, RecoveryResidence, TreatmentEntry,
};

#[derive(Debug, Clone)]
pub enum FieldUpdate {
    // --- Identificação ---
    FirstName(String),
    LastName(String),
    IntakeDate(String),
    HousingLocation(String),
    DateOfBirth(String),
    SocialSecurityNumber(String),
    Sex(String),
    Email(String),
    DriversLicenseNumber(String),
    PhoneNumber(String),

    // --- Sub-registros aninhados ---
    HealthStatus(HealthStatusUpdate),
    /// `false` põe o sub-registro inteiro como ausente ("declara não ter
    /// veículo"); `true` materializa um veículo vazio para preenchimento.
    HasVehicle(bool),
    Vehicle(VehicleUpdate),
    EmergencyContact(EmergencyContactUpdate),
    MedicalInformation(MedicalUpdate),
    LegalStatus(LegalStatusUpdate),
    MentalHealthFlags(MentalHealthFlagsUpdate),

    // --- Coleções (substituição integral, como no formulário) ---
    Medications(Vec<String>),
    AuthorizedPeople(Vec<AuthorizedPerson>),
    PendingCharges(Vec<PendingCharge>),
    Convictions(Vec<Conviction>),
    MentalHealthEntries(Vec<MentalHealthEntry>),
    DrugHistory(Vec<DrugHistoryEntry>),
    RecoveryResidences(Vec<RecoveryResidence>),
    TreatmentHistory(Vec<TreatmentEntry>),
    IncarcerationHistory(Vec<IncarcerationEntry>),
    ProbationHistory(Vec<ProbationEntry>),
    DrugTestResult { test_type: String, positive: bool },

    // --- Flags de página ---
    ProgramInfoReviewed(bool),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HealthFlag {
    Pregnant,
    DevelopmentallyDisabled,
    CoOccurringDisorder,
    DocSupervision,
    Felon,
    PhysicallyHandicapped,
    PostPartum,
    PrimaryFemaleCaregiver,
    RecentlyIncarcerated,
    SexOffender,
    Lgbtq,
    Veteran,
    InsulinDependent,
    HistoryOfSeizures,
}

#[derive(Debug, Clone)]
pub enum HealthStatusUpdate {
    Flag(HealthFlag, bool),
    Others(Vec<String>),
    Race(String),
    Ethnicity(String),
    HouseholdIncome(String),
    EmploymentStatus(String),
}

#[derive(Debug, Clone)]
pub enum VehicleUpdate {
    Make(String),
    Model(String),
    TagNumber(String),
    Insured(bool),
    InsuranceType(String),
    PolicyNumber(String),
}

#[derive(Debug, Clone)]
pub enum EmergencyContactUpdate {
    FirstName(String),
    LastName(String),
    Phone(String),
    Relationship(String),
    OtherRelationship(String),
}

#[derive(Debug, Clone)]
pub enum MedicalUpdate {
    DualDiagnosis(bool),
    Mat(bool),
    MatMedication(String),
    MatMedicationOther(String),
    NeedPsychMedication(bool),
}

#[derive(Debug, Clone)]
pub enum LegalStatusUpdate {
    HasProbationPretrial(bool),
    Jurisdictions(Vec<Jurisdiction>),
    OtherJurisdiction(String),
    HasPendingCharges(bool),
    HasConvictions(bool),
    IsWanted(bool),
    IsOnBond(bool),
    BondsmanName(String),
    IsSexOffender(bool),
}

#[derive(Debug, Clone)]
pub enum MentalHealthFlagsUpdate {
    SuicidalIdeation(bool),
    HomicidalIdeation(bool),
    Hallucinations(bool),
}
