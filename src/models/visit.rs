use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::scoring::DiagnosisCandidate;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Visit {
    pub id: i64,
    pub patient_id: i64,
    pub symptoms: Vec<String>,
    pub results: Vec<DiagnosisCandidate>,
    pub locked_disease: Option<String>,
    pub timestamp: NaiveDateTime,
}
