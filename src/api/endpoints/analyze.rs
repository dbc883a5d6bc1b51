//! `POST /api/analyze` — score symptoms and record a visit.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use serde::Deserialize;

use crate::api::error::ApiError;
use crate::api::types::{lenient_int, lenient_string, lenient_string_list, ApiContext};
use crate::consultation::{self, AnalysisOutcome, IntakeForm};

#[derive(Debug, Default, Deserialize)]
pub struct AnalyzeRequest {
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient_int")]
    pub age: i64,
    #[serde(default, deserialize_with = "lenient_string")]
    pub sex: String,
    #[serde(default, deserialize_with = "lenient_string_list")]
    pub symptoms: Vec<String>,
}

impl From<AnalyzeRequest> for IntakeForm {
    fn from(req: AnalyzeRequest) -> Self {
        IntakeForm {
            name: req.name,
            age: req.age,
            sex: req.sex,
            symptoms: req.symptoms,
        }
    }
}

pub async fn analyze(
    State(ctx): State<ApiContext>,
    payload: Result<Json<AnalyzeRequest>, JsonRejection>,
) -> Result<Json<AnalysisOutcome>, ApiError> {
    let Json(req) = payload?;
    let form = IntakeForm::from(req);

    let mut conn = ctx.open_db()?;
    let outcome = consultation::analyze(&mut conn, &ctx.knowledge, &form)?;

    Ok(Json(outcome))
}
