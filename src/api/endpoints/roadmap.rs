//! `POST /api/roadmap` — care roadmap for a chosen diagnosis.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::api::error::ApiError;
use crate::api::types::{lenient_id, lenient_string, ApiContext};
use crate::consultation::{self, LockTarget};
use crate::knowledge::CareRoadmap;

#[derive(Debug, Default, Deserialize)]
pub struct RoadmapRequest {
    #[serde(default, deserialize_with = "lenient_string")]
    pub disease: String,
    #[serde(default, deserialize_with = "lenient_id")]
    pub patient_id: Option<i64>,
    /// Visit returned by `/api/analyze`. Without it, the patient's latest visit is locked.
    #[serde(default, deserialize_with = "lenient_id")]
    pub visit_id: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct RoadmapResponse {
    pub roadmap: CareRoadmap,
}

pub async fn roadmap(
    State(ctx): State<ApiContext>,
    payload: Result<Json<RoadmapRequest>, JsonRejection>,
) -> Result<Json<RoadmapResponse>, ApiError> {
    let Json(req) = payload?;
    let target = LockTarget {
        patient_id: req.patient_id,
        visit_id: req.visit_id,
    };

    let conn = ctx.open_db()?;
    let selection = consultation::select_roadmap(&conn, &ctx.knowledge, &req.disease, target)?;
    if selection.locked_visit_id.is_none() && (target.patient_id.is_some() || target.visit_id.is_some()) {
        tracing::debug!(?target, "Roadmap served without locking a visit");
    }

    Ok(Json(RoadmapResponse {
        roadmap: selection.roadmap,
    }))
}
