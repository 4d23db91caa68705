// src/db/participant_repo.rs
//
// Persistência do agregado de onboarding: um participante + registros filhos.
// Todas as escritas acontecem dentro da transação aberta pelo serviço; os
// métodos devolvem sqlx::Error cru para o serviço mapear para a seção que
// falhou.

use chrono::NaiveDate;
use sqlx::{Executor, PgConnection, PgPool, Postgres};
use uuid::Uuid;

use crate::models::intake::{IntakeRecord, SignatureRecord};

#[derive(Clone)]
pub struct ParticipantRepository {
    pool: PgPool,
}

impl ParticipantRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    // Insere a linha principal e devolve o id gerado.
    pub async fn insert_participant<'e, E>(
        &self,
        executor: E,
        record: &IntakeRecord,
        intake_date: NaiveDate,
        date_of_birth: NaiveDate,
        created_by: Uuid,
    ) -> Result<Uuid, sqlx::Error>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_scalar::<_, Uuid>(
            r#"
            INSERT INTO participants (
                first_name, last_name, intake_date, housing_location,
                date_of_birth, social_security_number, sex, email,
                drivers_license_number, phone_number, created_by
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING id
            "#,
        )
        .bind(record.first_name.trim())
        .bind(record.last_name.trim())
        .bind(intake_date)
        .bind(&record.housing_location)
        .bind(date_of_birth)
        .bind(&record.social_security_number)
        .bind(&record.sex)
        .bind(&record.email)
        .bind(&record.drivers_license_number)
        .bind(&record.phone_number)
        .bind(created_by)
        .fetch_one(executor)
        .await
    }

    pub async fn insert_health_status<'e, E>(
        &self,
        executor: E,
        participant_id: Uuid,
        record: &IntakeRecord,
        created_by: Uuid,
    ) -> Result<(), sqlx::Error>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let hs = &record.health_status;
        sqlx::query(
            r#"
            INSERT INTO health_status (
                participant_id, pregnant, developmentally_disabled,
                co_occurring_disorder, doc_supervision, felon,
                physically_handicapped, post_partum, primary_female_caregiver,
                recently_incarcerated, sex_offender, lgbtq, veteran,
                insulin_dependent, history_of_seizures, others,
                race, ethnicity, household_income, employment_status, created_by
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13,
                    $14, $15, $16, $17, $18, $19, $20, $21)
            "#,
        )
        .bind(participant_id)
        .bind(hs.pregnant)
        .bind(hs.developmentally_disabled)
        .bind(hs.co_occurring_disorder)
        .bind(hs.doc_supervision)
        .bind(hs.felon)
        .bind(hs.physically_handicapped)
        .bind(hs.post_partum)
        .bind(hs.primary_female_caregiver)
        .bind(hs.recently_incarcerated)
        .bind(hs.sex_offender)
        .bind(hs.lgbtq)
        .bind(hs.veteran)
        .bind(hs.insulin_dependent)
        .bind(hs.history_of_seizures)
        .bind(&hs.others)
        .bind(&hs.race)
        .bind(&hs.ethnicity)
        .bind(&hs.household_income)
        .bind(&hs.employment_status)
        .bind(created_by)
        .execute(executor)
        .await?;
        Ok(())
    }

    // Só é chamado quando o participante declarou ter veículo.
    pub async fn insert_vehicle<'e, E>(
        &self,
        executor: E,
        participant_id: Uuid,
        record: &IntakeRecord,
        created_by: Uuid,
    ) -> Result<(), sqlx::Error>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let Some(vehicle) = &record.vehicle else {
            return Ok(());
        };
        sqlx::query(
            r#"
            INSERT INTO vehicles (
                participant_id, make, model, tag_number,
                insured, insurance_type, policy_number, created_by
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(participant_id)
        .bind(&vehicle.make)
        .bind(&vehicle.model)
        .bind(&vehicle.tag_number)
        .bind(vehicle.insured)
        .bind(&vehicle.insurance_type)
        .bind(&vehicle.policy_number)
        .bind(created_by)
        .execute(executor)
        .await?;
        Ok(())
    }

    pub async fn insert_emergency_contact<'e, E>(
        &self,
        executor: E,
        participant_id: Uuid,
        record: &IntakeRecord,
        created_by: Uuid,
    ) -> Result<(), sqlx::Error>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let contact = &record.emergency_contact;
        sqlx::query(
            r#"
            INSERT INTO emergency_contacts (
                participant_id, first_name, last_name, phone,
                relationship, other_relationship, created_by
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(participant_id)
        .bind(&contact.first_name)
        .bind(&contact.last_name)
        .bind(&contact.phone)
        .bind(&contact.relationship)
        .bind(&contact.other_relationship)
        .bind(created_by)
        .execute(executor)
        .await?;
        Ok(())
    }

    pub async fn insert_medical_information<'e, E>(
        &self,
        executor: E,
        participant_id: Uuid,
        record: &IntakeRecord,
        created_by: Uuid,
    ) -> Result<(), sqlx::Error>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let medical = &record.medical_information;
        sqlx::query(
            r#"
            INSERT INTO medical_information (
                participant_id, dual_diagnosis, mat, mat_medication,
                mat_medication_other, need_psych_medication, created_by
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(participant_id)
        .bind(medical.dual_diagnosis)
        .bind(medical.mat)
        .bind(&medical.mat_medication)
        .bind(&medical.mat_medication_other)
        .bind(medical.need_psych_medication)
        .bind(created_by)
        .execute(executor)
        .await?;
        Ok(())
    }

    pub async fn insert_medications(
        &self,
        conn: &mut PgConnection,
        participant_id: Uuid,
        record: &IntakeRecord,
        created_by: Uuid,
    ) -> Result<(), sqlx::Error> {
        for medication in record.medications.iter().filter(|m| !m.trim().is_empty()) {
            sqlx::query(
                r#"
                INSERT INTO medications (participant_id, medication_name, created_by)
                VALUES ($1, $2, $3)
                "#,
            )
            .bind(participant_id)
            .bind(medication.trim())
            .bind(created_by)
            .execute(&mut *conn)
            .await?;
        }
        Ok(())
    }

    pub async fn insert_authorized_people(
        &self,
        conn: &mut PgConnection,
        participant_id: Uuid,
        record: &IntakeRecord,
        created_by: Uuid,
    ) -> Result<(), sqlx::Error> {
        for person in &record.authorized_people {
            sqlx::query(
                r#"
                INSERT INTO authorized_people (
                    participant_id, first_name, last_name, relationship, phone, created_by
                )
                VALUES ($1, $2, $3, $4, $5, $6)
                "#,
            )
            .bind(participant_id)
            .bind(&person.first_name)
            .bind(&person.last_name)
            .bind(&person.relationship)
            .bind(&person.phone)
            .bind(created_by)
            .execute(&mut *conn)
            .await?;
        }
        Ok(())
    }

    // Status legal + jurisdições estruturadas na mesma seção.
    pub async fn insert_legal_status(
        &self,
        conn: &mut PgConnection,
        participant_id: Uuid,
        record: &IntakeRecord,
        created_by: Uuid,
    ) -> Result<(), sqlx::Error> {
        let legal = &record.legal_status;
        sqlx::query(
            r#"
            INSERT INTO legal_status (
                participant_id, has_probation_pretrial, other_jurisdiction,
                has_pending_charges, has_convictions, is_wanted,
                is_on_bond, bondsman_name, is_sex_offender, created_by
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(participant_id)
        .bind(legal.has_probation_pretrial)
        .bind(&legal.other_jurisdiction)
        .bind(legal.has_pending_charges)
        .bind(legal.has_convictions)
        .bind(legal.is_wanted)
        .bind(legal.is_on_bond)
        .bind(&legal.bondsman_name)
        .bind(legal.is_sex_offender)
        .bind(created_by)
        .execute(&mut *conn)
        .await?;

        for jurisdiction in legal.jurisdictions.iter().filter(|j| !j.name.trim().is_empty()) {
            sqlx::query(
                r#"
                INSERT INTO jurisdictions (participant_id, name, created_by)
                VALUES ($1, $2, $3)
                "#,
            )
            .bind(participant_id)
            .bind(jurisdiction.name.trim())
            .bind(created_by)
            .execute(&mut *conn)
            .await?;
        }
        Ok(())
    }

    pub async fn insert_pending_charges(
        &self,
        conn: &mut PgConnection,
        participant_id: Uuid,
        record: &IntakeRecord,
        created_by: Uuid,
    ) -> Result<(), sqlx::Error> {
        for charge in &record.pending_charges {
            sqlx::query(
                r#"
                INSERT INTO pending_charges (
                    participant_id, charge_description, location, created_by
                )
                VALUES ($1, $2, $3, $4)
                "#,
            )
            .bind(participant_id)
            .bind(&charge.charge_description)
            .bind(&charge.location)
            .bind(created_by)
            .execute(&mut *conn)
            .await?;
        }
        Ok(())
    }

    pub async fn insert_convictions(
        &self,
        conn: &mut PgConnection,
        participant_id: Uuid,
        record: &IntakeRecord,
        created_by: Uuid,
    ) -> Result<(), sqlx::Error> {
        for conviction in &record.convictions {
            sqlx::query(
                r#"
                INSERT INTO convictions (participant_id, offense, created_by)
                VALUES ($1, $2, $3)
                "#,
            )
            .bind(participant_id)
            .bind(&conviction.offense)
            .bind(created_by)
            .execute(&mut *conn)
            .await?;
        }
        Ok(())
    }

    pub async fn insert_mental_health(
        &self,
        conn: &mut PgConnection,
        participant_id: Uuid,
        record: &IntakeRecord,
        created_by: Uuid,
    ) -> Result<(), sqlx::Error> {
        let mental = &record.mental_health;
        sqlx::query(
            r#"
            INSERT INTO mental_health (
                participant_id, suicidal_ideation, homicidal_ideation,
                hallucinations, created_by
            )
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(participant_id)
        .bind(mental.suicidal_ideation)
        .bind(mental.homicidal_ideation)
        .bind(mental.hallucinations)
        .bind(created_by)
        .execute(&mut *conn)
        .await?;

        for entry in mental.entries.iter().filter(|e| !e.diagnosis.trim().is_empty()) {
            sqlx::query(
                r#"
                INSERT INTO mental_health_entries (
                    participant_id, diagnosis, date_of_diagnosis,
                    prescribed_medication, medication_compliant,
                    current_symptoms, describe_symptoms, created_by
                )
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
                "#,
            )
            .bind(participant_id)
            .bind(&entry.diagnosis)
            .bind(&entry.date_of_diagnosis)
            .bind(entry.prescribed_medication)
            .bind(entry.medication_compliant)
            .bind(entry.current_symptoms)
            .bind(&entry.describe_symptoms)
            .bind(created_by)
            .execute(&mut *conn)
            .await?;
        }
        Ok(())
    }

    pub async fn insert_drug_history(
        &self,
        conn: &mut PgConnection,
        participant_id: Uuid,
        record: &IntakeRecord,
        created_by: Uuid,
    ) -> Result<(), sqlx::Error> {
        for entry in record.drug_history.iter().filter(|e| !e.drug_type.trim().is_empty()) {
            sqlx::query(
                r#"
                INSERT INTO drug_history (
                    participant_id, drug_type, ever_used, date_last_use,
                    frequency, intravenous, total_years, amount, created_by
                )
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
                "#,
            )
            .bind(participant_id)
            .bind(&entry.drug_type)
            .bind(entry.ever_used)
            .bind(&entry.date_last_use)
            .bind(&entry.frequency)
            .bind(entry.intravenous)
            .bind(&entry.total_years)
            .bind(&entry.amount)
            .bind(created_by)
            .execute(&mut *conn)
            .await?;
        }
        Ok(())
    }

    pub async fn insert_recovery_residences(
        &self,
        conn: &mut PgConnection,
        participant_id: Uuid,
        record: &IntakeRecord,
        created_by: Uuid,
    ) -> Result<(), sqlx::Error> {
        for residence in record.recovery_residences.iter().filter(|r| !r.name.trim().is_empty()) {
            sqlx::query(
                r#"
                INSERT INTO recovery_residences (
                    participant_id, name, start_date, end_date, location, created_by
                )
                VALUES ($1, $2, $3, $4, $5, $6)
                "#,
            )
            .bind(participant_id)
            .bind(&residence.name)
            .bind(&residence.start_date)
            .bind(&residence.end_date)
            .bind(&residence.location)
            .bind(created_by)
            .execute(&mut *conn)
            .await?;
        }
        Ok(())
    }

    pub async fn insert_treatment_history(
        &self,
        conn: &mut PgConnection,
        participant_id: Uuid,
        record: &IntakeRecord,
        created_by: Uuid,
    ) -> Result<(), sqlx::Error> {
        for entry in record.treatment_history.iter().filter(|e| !e.treatment_type.trim().is_empty()) {
            sqlx::query(
                r#"
                INSERT INTO treatment_history (
                    participant_id, treatment_type, estimated_date, location, created_by
                )
                VALUES ($1, $2, $3, $4, $5)
                "#,
            )
            .bind(participant_id)
            .bind(&entry.treatment_type)
            .bind(&entry.estimated_date)
            .bind(&entry.location)
            .bind(created_by)
            .execute(&mut *conn)
            .await?;
        }
        Ok(())
    }

    pub async fn insert_incarceration_history(
        &self,
        conn: &mut PgConnection,
        participant_id: Uuid,
        record: &IntakeRecord,
        created_by: Uuid,
    ) -> Result<(), sqlx::Error> {
        for entry in record
            .incarceration_history
            .iter()
            .filter(|e| !e.incarceration_type.trim().is_empty())
        {
            sqlx::query(
                r#"
                INSERT INTO incarceration_history (
                    participant_id, incarceration_type, estimated_date, location, created_by
                )
                VALUES ($1, $2, $3, $4, $5)
                "#,
            )
            .bind(participant_id)
            .bind(&entry.incarceration_type)
            .bind(&entry.estimated_date)
            .bind(&entry.location)
            .bind(created_by)
            .execute(&mut *conn)
            .await?;
        }
        Ok(())
    }

    pub async fn insert_probation_history(
        &self,
        conn: &mut PgConnection,
        participant_id: Uuid,
        record: &IntakeRecord,
        created_by: Uuid,
    ) -> Result<(), sqlx::Error> {
        for entry in record.probation_history.iter().filter(|e| !e.probation_type.trim().is_empty()) {
            sqlx::query(
                r#"
                INSERT INTO probation_history (
                    participant_id, probation_type, jurisdiction, start_date,
                    end_date, officer_name, officer_email, officer_phone, created_by
                )
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
                "#,
            )
            .bind(participant_id)
            .bind(&entry.probation_type)
            .bind(&entry.jurisdiction)
            .bind(&entry.start_date)
            .bind(&entry.end_date)
            .bind(&entry.officer_name)
            .bind(&entry.officer_email)
            .bind(&entry.officer_phone)
            .bind(created_by)
            .execute(&mut *conn)
            .await?;
        }
        Ok(())
    }

    pub async fn insert_drug_test_results(
        &self,
        conn: &mut PgConnection,
        participant_id: Uuid,
        record: &IntakeRecord,
        created_by: Uuid,
    ) -> Result<(), sqlx::Error> {
        for (test_type, positive) in &record.drug_test_results {
            sqlx::query(
                r#"
                INSERT INTO drug_test_results (participant_id, test_type, result, created_by)
                VALUES ($1, $2, $3, $4)
                "#,
            )
            .bind(participant_id)
            .bind(test_type)
            .bind(positive)
            .bind(created_by)
            .execute(&mut *conn)
            .await?;
        }
        Ok(())
    }

    pub async fn insert_signatures(
        &self,
        conn: &mut PgConnection,
        participant_id: Uuid,
        signatures: &[SignatureRecord],
        created_by: Uuid,
    ) -> Result<(), sqlx::Error> {
        for signature in signatures {
            sqlx::query(
                r#"
                INSERT INTO signatures (
                    participant_id, signature_type, signature, signature_timestamp,
                    signature_id, witness_signature, witness_timestamp,
                    witness_signature_id, agreed, updates, created_by
                )
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
                "#,
            )
            .bind(participant_id)
            .bind(&signature.signature_type)
            .bind(&signature.signature)
            .bind(signature.signature_timestamp)
            .bind(&signature.signature_id)
            .bind(&signature.witness_signature)
            .bind(signature.witness_timestamp)
            .bind(&signature.witness_signature_id)
            .bind(signature.agreed)
            .bind(&signature.updates)
            .bind(created_by)
            .execute(&mut *conn)
            .await?;
        }
        Ok(())
    }
}
