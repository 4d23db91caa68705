// src/form/normalize.rs
//
// Reconciliação de nomenclatura + defaults estruturais, ANTES da validação.
// O mesmo rascunho pode chegar do acumulador do cliente (camelCase) ou de um
// transformador intermediário (snake_case); para cada campo conhecido a
// regra é: prefere a chave camelCase, cai para a snake_case, cai para o
// default estrutural. Puro, idempotente e total — nunca falha.

use serde_json::{Map, Value};

#[derive(Clone, Copy)]
enum FieldKind {
    Str,
    Bool,
    List,
    Map,
    Object(&'static Shape),
    ObjectList(&'static Shape),
    /// Ausência é significativa (veículo): nunca materializa o default.
    OptionalObject(&'static Shape),
}

struct Shape {
    fields: &'static [(&'static str, FieldKind)],
}

static HEALTH_STATUS: Shape = Shape {
    fields: &[
        ("pregnant", FieldKind::Bool),
        ("developmentallyDisabled", FieldKind::Bool),
        ("coOccurringDisorder", FieldKind::Bool),
        ("docSupervision", FieldKind::Bool),
        ("felon", FieldKind::Bool),
        ("physicallyHandicapped", FieldKind::Bool),
        ("postPartum", FieldKind::Bool),
        ("primaryFemaleCaregiver", FieldKind::Bool),
        ("recentlyIncarcerated", FieldKind::Bool),
        ("sexOffender", FieldKind::Bool),
        ("lgbtq", FieldKind::Bool),
        ("veteran", FieldKind::Bool),
        ("insulinDependent", FieldKind::Bool),
        ("historyOfSeizures", FieldKind::Bool),
        ("others", FieldKind::List),
        ("race", FieldKind::Str),
        ("ethnicity", FieldKind::Str),
        ("householdIncome", FieldKind::Str),
        ("employmentStatus", FieldKind::Str),
    ],
};

static VEHICLE: Shape = Shape {
    fields: &[
        ("make", FieldKind::Str),
        ("model", FieldKind::Str),
        ("tagNumber", FieldKind::Str),
        ("insured", FieldKind::Bool),
        ("insuranceType", FieldKind::Str),
        ("policyNumber", FieldKind::Str),
    ],
};

static EMERGENCY_CONTACT: Shape = Shape {
    fields: &[
        ("firstName", FieldKind::Str),
        ("lastName", FieldKind::Str),
        ("phone", FieldKind::Str),
        ("relationship", FieldKind::Str),
        ("otherRelationship", FieldKind::Str),
    ],
};

static MEDICAL_INFORMATION: Shape = Shape {
    fields: &[
        ("dualDiagnosis", FieldKind::Bool),
        ("mat", FieldKind::Bool),
        ("matMedication", FieldKind::Str),
        ("matMedicationOther", FieldKind::Str),
        ("needPsychMedication", FieldKind::Bool),
    ],
};

static AUTHORIZED_PERSON: Shape = Shape {
    fields: &[
        ("firstName", FieldKind::Str),
        ("lastName", FieldKind::Str),
        ("relationship", FieldKind::Str),
        ("phone", FieldKind::Str),
    ],
};

static JURISDICTION: Shape = Shape {
    fields: &[("name", FieldKind::Str)],
};

static LEGAL_STATUS: Shape = Shape {
    fields: &[
        ("hasProbationPretrial", FieldKind::Bool),
        ("jurisdictions", FieldKind::ObjectList(&JURISDICTION)),
        ("otherJurisdiction", FieldKind::Str),
        ("hasPendingCharges", FieldKind::Bool),
        ("hasConvictions", FieldKind::Bool),
        ("isWanted", FieldKind::Bool),
        ("isOnBond", FieldKind::Bool),
        ("bondsmanName", FieldKind::Str),
        ("isSexOffender", FieldKind::Bool),
    ],
};

static PENDING_CHARGE: Shape = Shape {
    fields: &[
        ("chargeDescription", FieldKind::Str),
        ("location", FieldKind::Str),
    ],
};

static CONVICTION: Shape = Shape {
    fields: &[("offense", FieldKind::Str)],
};

static MENTAL_HEALTH_ENTRY: Shape = Shape {
    fields: &[
        ("diagnosis", FieldKind::Str),
        ("dateOfDiagnosis", FieldKind::Str),
        ("prescribedMedication", FieldKind::Bool),
        ("medicationCompliant", FieldKind::Bool),
        ("currentSymptoms", FieldKind::Bool),
        ("describeSymptoms", FieldKind::Str),
    ],
};

static MENTAL_HEALTH: Shape = Shape {
    fields: &[
        ("suicidalIdeation", FieldKind::Bool),
        ("homicidalIdeation", FieldKind::Bool),
        ("hallucinations", FieldKind::Bool),
        ("entries", FieldKind::ObjectList(&MENTAL_HEALTH_ENTRY)),
    ],
};

static DRUG_HISTORY_ENTRY: Shape = Shape {
    fields: &[
        ("drugType", FieldKind::Str),
        ("everUsed", FieldKind::Bool),
        ("dateLastUse", FieldKind::Str),
        ("frequency", FieldKind::Str),
        ("intravenous", FieldKind::Bool),
        ("totalYears", FieldKind::Str),
        ("amount", FieldKind::Str),
    ],
};

static RECOVERY_RESIDENCE: Shape = Shape {
    fields: &[
        ("name", FieldKind::Str),
        ("startDate", FieldKind::Str),
        ("endDate", FieldKind::Str),
        ("location", FieldKind::Str),
    ],
};

static DATED_HISTORY_ENTRY: Shape = Shape {
    fields: &[
        ("type", FieldKind::Str),
        ("estimatedDate", FieldKind::Str),
        ("location", FieldKind::Str),
    ],
};

static PROBATION_ENTRY: Shape = Shape {
    fields: &[
        ("type", FieldKind::Str),
        ("jurisdiction", FieldKind::Str),
        ("startDate", FieldKind::Str),
        ("endDate", FieldKind::Str),
        ("officerName", FieldKind::Str),
        ("officerEmail", FieldKind::Str),
        ("officerPhone", FieldKind::Str),
    ],
};

static SIGNATURE: Shape = Shape {
    fields: &[
        ("signatureType", FieldKind::Str),
        ("signature", FieldKind::Str),
        ("signatureId", FieldKind::Str),
        ("agreed", FieldKind::Bool),
        ("witnessSignature", FieldKind::Str),
        ("witnessSignatureId", FieldKind::Str),
        // timestamps ficam de fora: Option<DateTime> aceita null, e string
        // vazia é convertida para null no pós-processamento abaixo.
    ],
};

static RECORD: Shape = Shape {
    fields: &[
        ("firstName", FieldKind::Str),
        ("lastName", FieldKind::Str),
        ("intakeDate", FieldKind::Str),
        ("housingLocation", FieldKind::Str),
        ("dateOfBirth", FieldKind::Str),
        ("socialSecurityNumber", FieldKind::Str),
        ("sex", FieldKind::Str),
        ("email", FieldKind::Str),
        ("driversLicenseNumber", FieldKind::Str),
        ("phoneNumber", FieldKind::Str),
        ("healthStatus", FieldKind::Object(&HEALTH_STATUS)),
        ("vehicle", FieldKind::OptionalObject(&VEHICLE)),
        ("emergencyContact", FieldKind::Object(&EMERGENCY_CONTACT)),
        ("medicalInformation", FieldKind::Object(&MEDICAL_INFORMATION)),
        ("medications", FieldKind::List),
        ("authorizedPeople", FieldKind::ObjectList(&AUTHORIZED_PERSON)),
        ("legalStatus", FieldKind::Object(&LEGAL_STATUS)),
        ("pendingCharges", FieldKind::ObjectList(&PENDING_CHARGE)),
        ("convictions", FieldKind::ObjectList(&CONVICTION)),
        ("mentalHealth", FieldKind::Object(&MENTAL_HEALTH)),
        ("drugHistory", FieldKind::ObjectList(&DRUG_HISTORY_ENTRY)),
        ("recoveryResidences", FieldKind::ObjectList(&RECOVERY_RESIDENCE)),
        ("treatmentHistory", FieldKind::ObjectList(&DATED_HISTORY_ENTRY)),
        ("incarcerationHistory", FieldKind::ObjectList(&DATED_HISTORY_ENTRY)),
        ("probationHistory", FieldKind::ObjectList(&PROBATION_ENTRY)),
        ("drugTestResults", FieldKind::Map),
        ("programInfoReviewed", FieldKind::Bool),
        ("signatures", FieldKind::ObjectList(&SIGNATURE)),
    ],
};

/// Normaliza o payload bruto de um rascunho. Entradas que não são objetos
/// passam direto (a desserialização tipada reporta o problema depois).
pub fn normalize(mut value: Value) -> Value {
    if let Value::Object(ref mut obj) = value {
        normalize_object(obj, &RECORD);
        if let Some(Value::Object(legal)) = obj.get_mut("legalStatus") {
            upgrade_legacy_jurisdiction(legal);
        }
        if let Some(Value::Array(signatures)) = obj.get_mut("signatures") {
            for entry in signatures.iter_mut() {
                if let Value::Object(signature) = entry {
                    blank_timestamps_to_null(signature);
                }
            }
        }
    }
    value
}

fn normalize_object(obj: &mut Map<String, Value>, shape: &Shape) {
    for (camel, kind) in shape.fields {
        promote_snake_key(obj, camel);
        match kind {
            FieldKind::Str => {
                if obj.get(*camel).is_none_or(Value::is_null) {
                    obj.insert((*camel).to_string(), Value::String(String::new()));
                }
            }
            FieldKind::Bool => {
                if obj.get(*camel).is_none_or(Value::is_null) {
                    obj.insert((*camel).to_string(), Value::Bool(false));
                }
            }
            FieldKind::List => {
                if obj.get(*camel).is_none_or(Value::is_null) {
                    obj.insert((*camel).to_string(), Value::Array(Vec::new()));
                }
            }
            FieldKind::Map => {
                if obj.get(*camel).is_none_or(Value::is_null) {
                    obj.insert((*camel).to_string(), Value::Object(Map::new()));
                }
            }
            FieldKind::Object(inner) => {
                if obj.get(*camel).is_none_or(Value::is_null) {
                    obj.insert((*camel).to_string(), Value::Object(Map::new()));
                }
                if let Some(Value::Object(nested)) = obj.get_mut(*camel) {
                    normalize_object(nested, inner);
                }
            }
            FieldKind::ObjectList(inner) => {
                if obj.get(*camel).is_none_or(Value::is_null) {
                    obj.insert((*camel).to_string(), Value::Array(Vec::new()));
                }
                if let Some(Value::Array(items)) = obj.get_mut(*camel) {
                    for item in items.iter_mut() {
                        if let Value::Object(nested) = item {
                            normalize_object(nested, inner);
                        }
                    }
                }
            }
            FieldKind::OptionalObject(inner) => {
                // null explícito vira ausência; ausência permanece ausência.
                if obj.get(*camel).is_some_and(Value::is_null) {
                    obj.remove(*camel);
                }
                if let Some(Value::Object(nested)) = obj.get_mut(*camel) {
                    normalize_object(nested, inner);
                }
            }
        }
    }
}

/// Se a chave camelCase não existe mas a snake_case sim, renomeia.
fn promote_snake_key(obj: &mut Map<String, Value>, camel: &str) {
    if obj.contains_key(camel) {
        return;
    }
    let snake = to_snake_case(camel);
    if snake != camel {
        if let Some(value) = obj.remove(&snake) {
            obj.insert(camel.to_string(), value);
        }
    }
}

fn to_snake_case(camel: &str) -> String {
    let mut out = String::with_capacity(camel.len() + 4);
    for c in camel.chars() {
        if c.is_ascii_uppercase() {
            out.push('_');
            out.push(c.to_ascii_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

/// Upgrade do formato legado: `jurisdiction` como string única separada por
/// vírgulas vira a lista estruturada `jurisdictions: [{name}]`.
fn upgrade_legacy_jurisdiction(legal: &mut Map<String, Value>) {
    let legacy = match legal.remove("jurisdiction") {
        Some(Value::String(s)) => s,
        Some(other) => {
            legal.insert("jurisdiction".to_string(), other);
            return;
        }
        None => return,
    };

    let already_populated = matches!(
        legal.get("jurisdictions"),
        Some(Value::Array(items)) if !items.is_empty()
    );
    if already_populated || legacy.trim().is_empty() {
        return;
    }

    let entries: Vec<Value> = legacy
        .split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(|name| serde_json::json!({ "name": name }))
        .collect();
    legal.insert("jurisdictions".to_string(), Value::Array(entries));
}

/// `""` em campo de timestamp vira null para não derrubar a entrada inteira
/// na desserialização (a fase frouxa decide depois se descarta).
fn blank_timestamps_to_null(signature: &mut Map<String, Value>) {
    for key in ["signatureTimestamp", "witnessTimestamp"] {
        promote_snake_key(signature, key);
        if matches!(signature.get(key), Some(Value::String(s)) if s.is_empty()) {
            signature.insert(key.to_string(), Value::Null);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    use crate::models::intake::IntakeRecord;

    #[test]
    fn snake_case_payload_is_promoted_to_camel() {
        let raw = json!({
            "first_name": "Jane",
            "last_name": "Doe",
            "social_security_number": "123-45-6789",
            "emergency_contact": { "first_name": "A", "other_relationship": "aunt" },
            "legal_status": { "has_probation_pretrial": true }
        });
        let normalized = normalize(raw);
        assert_eq!(normalized["firstName"], "Jane");
        assert_eq!(normalized["socialSecurityNumber"], "123-45-6789");
        assert_eq!(normalized["emergencyContact"]["firstName"], "A");
        assert_eq!(normalized["emergencyContact"]["otherRelationship"], "aunt");
        assert_eq!(normalized["legalStatus"]["hasProbationPretrial"], true);
    }

    #[test]
    fn camel_key_wins_over_snake_duplicate() {
        let raw = json!({ "firstName": "Jane", "first_name": "Ignored" });
        let normalized = normalize(raw);
        assert_eq!(normalized["firstName"], "Jane");
    }

    #[test]
    fn structural_defaults_are_filled() {
        let normalized = normalize(json!({}));
        assert_eq!(normalized["firstName"], "");
        assert_eq!(normalized["healthStatus"]["pregnant"], false);
        assert_eq!(normalized["medications"], json!([]));
        assert_eq!(normalized["signatures"], json!([]));
        assert_eq!(normalized["drugTestResults"], json!({}));
        // Veículo continua ausente: não é um default estrutural.
        assert!(normalized.get("vehicle").is_none());
    }

    #[test]
    fn explicit_null_vehicle_means_absent() {
        let normalized = normalize(json!({ "vehicle": null }));
        assert!(normalized.get("vehicle").is_none());
    }

    #[test]
    fn normalize_is_idempotent() {
        let raw = json!({
            "first_name": "Jane",
            "legal_status": { "jurisdiction": "Marion County, Hamilton County" },
            "signatures": [{ "signature_type": "medication", "signature_timestamp": "" }]
        });
        let once = normalize(raw);
        let twice = normalize(once.clone());
        assert_eq!(once, twice);
    }

    #[test]
    fn normalize_is_total_on_non_objects() {
        assert_eq!(normalize(json!(null)), json!(null));
        assert_eq!(normalize(json!([1, 2])), json!([1, 2]));
        assert_eq!(normalize(json!("x")), json!("x"));
    }

    #[test]
    fn legacy_jurisdiction_string_becomes_structured_list() {
        let raw = json!({
            "legalStatus": { "jurisdiction": "Marion County, Hamilton County" }
        });
        let normalized = normalize(raw);
        assert_eq!(
            normalized["legalStatus"]["jurisdictions"],
            json!([{ "name": "Marion County" }, { "name": "Hamilton County" }])
        );
        assert!(normalized["legalStatus"].get("jurisdiction").is_none());
    }

    #[test]
    fn normalized_minimal_payload_deserializes_into_record() {
        let raw = json!({
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
        });
        let normalized = normalize(raw);
        let record: IntakeRecord = serde_json::from_value(normalized).unwrap();
        assert_eq!(record.display_name(), "Jane Doe");
        use validator::Validate;
        assert!(record.validate().is_ok());
    }

    #[test]
    fn blank_signature_timestamps_become_null() {
        let raw = json!({
            "signatures": [{
                "signatureType": "medication",
                "signatureTimestamp": "",
                "witness_timestamp": ""
            }]
        });
        let normalized = normalize(raw);
        assert_eq!(normalized["signatures"][0]["signatureTimestamp"], json!(null));
        assert_eq!(normalized["signatures"][0]["witnessTimestamp"], json!(null));
    }
}
