//! `GET /api/patients/:id/visits` — a patient's visit history.

use axum::extract::{Path, State};
use axum::Json;
use serde::Serialize;

use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::db;
use crate::models::{Patient, Visit};

#[derive(Debug, Serialize)]
pub struct VisitHistoryResponse {
    pub patient_id: i64,
    pub patient: Option<Patient>,
    pub visits: Vec<Visit>,
}

/// Unknown patients yield `patient: null` and an empty list.
pub async fn list(
    State(ctx): State<ApiContext>,
    Path(patient_id): Path<i64>,
) -> Result<Json<VisitHistoryResponse>, ApiError> {
    let conn = ctx.open_db()?;
    let patient = db::get_patient(&conn, patient_id)?;
    let visits = db::list_visits(&conn, patient_id)?;

    Ok(Json(VisitHistoryResponse {
        patient_id,
        patient,
        visits,
    }))
}
