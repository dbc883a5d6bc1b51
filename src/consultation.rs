//! Consultation flows: analyze symptoms for a patient, then choose a
//! diagnosis and receive its care roadmap.
//!
//! Handlers open one connection per request and pass it in; nothing here
//! holds on to a connection.

use rusqlite::{Connection, TransactionBehavior};
use serde::{Deserialize, Serialize};

use crate::db::{self, DatabaseError};
use crate::knowledge::{CareRoadmap, KnowledgeBase};
use crate::models::NewPatient;
use crate::scoring::{self, DiagnosisCandidate};

// ═══════════════════════════════════════════
// Types
// ═══════════════════════════════════════════

/// Already-coerced analysis input.
#[derive(Debug, Clone, Default)]
pub struct IntakeForm {
    pub name: String,
    pub age: i64,
    pub sex: String,
    pub symptoms: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisOutcome {
    pub results: Vec<DiagnosisCandidate>,
    pub patient_id: i64,
    pub visit_id: i64,
}

/// Which visit a roadmap selection is recorded on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LockTarget {
    pub patient_id: Option<i64>,
    pub visit_id: Option<i64>,
}

/// Result of a roadmap selection.
#[derive(Debug, Clone)]
pub struct RoadmapSelection {
    pub roadmap: CareRoadmap,
    /// Visit that received the lock, if any.
    pub locked_visit_id: Option<i64>,
}

// ═══════════════════════════════════════════
// Flows
// ═══════════════════════════════════════════

/// Resolve the patient, score the symptoms, and record the visit.
///
/// Patient creation and visit insert commit together. The write lock is
/// taken up front so concurrent analyses queue on the busy handler instead
/// of failing on lock upgrade.
pub fn analyze(
    conn: &mut Connection,
    kb: &KnowledgeBase,
    form: &IntakeForm,
) -> Result<AnalysisOutcome, DatabaseError> {
    let symptoms = scoring::normalize_symptoms(&form.symptoms);
    let results = scoring::score_symptoms(kb, &symptoms, form.age, &form.sex);

    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
    let patient_id = db::resolve_patient(
        &tx,
        &NewPatient {
            name: form.name.clone(),
            age: form.age,
            sex: form.sex.clone(),
        },
    )?;
    let visit_id = db::insert_visit(&tx, patient_id, &symptoms, &results)?;
    tx.commit()?;

    tracing::info!(
        patient_id,
        visit_id,
        symptom_count = symptoms.len(),
        candidate_count = results.len(),
        "Analysis recorded"
    );

    Ok(AnalysisOutcome {
        results,
        patient_id,
        visit_id,
    })
}

/// Look up the roadmap for `disease` and record the choice on a visit.
///
/// Unknown diseases yield an empty roadmap. The lock goes to the explicit
/// visit when one is given (and it belongs to the patient, if a patient is
/// given), otherwise to the patient's latest visit. A blank disease name
/// is never recorded. Missing visits are skipped without error.
pub fn select_roadmap(
    conn: &Connection,
    kb: &KnowledgeBase,
    disease: &str,
    target: LockTarget,
) -> Result<RoadmapSelection, DatabaseError> {
    let roadmap = kb.roadmap(disease).cloned().unwrap_or_default();
    if roadmap.is_empty() {
        tracing::debug!(disease, "No roadmap for disease");
    }

    let locked_visit_id = if disease.is_empty() {
        None
    } else {
        match resolve_lock_visit(conn, target)? {
            Some(visit_id) if db::lock_disease(conn, visit_id, disease)? => {
                tracing::info!(visit_id, disease, "Diagnosis locked");
                Some(visit_id)
            }
            _ => None,
        }
    };

    Ok(RoadmapSelection {
        roadmap,
        locked_visit_id,
    })
}

fn resolve_lock_visit(conn: &Connection, target: LockTarget) -> Result<Option<i64>, DatabaseError> {
    match target {
        LockTarget {
            visit_id: Some(visit_id),
            patient_id,
        } => {
            let owner = db::visit_owner(conn, visit_id)?;
            match (owner, patient_id) {
                (Some(owner), Some(patient_id)) if owner != patient_id => {
                    tracing::warn!(visit_id, patient_id, owner, "Visit belongs to another patient");
                    Ok(None)
                }
                (Some(_), _) => Ok(Some(visit_id)),
                (None, _) => Ok(None),
            }
        }
        LockTarget {
            visit_id: None,
            patient_id: Some(patient_id),
        } => db::latest_visit_id(conn, patient_id),
        LockTarget {
            visit_id: None,
            patient_id: None,
        } => Ok(None),
    }
}
