//! Grade calculator endpoint. Independent of conversations and the knowledge base.

use axum::Json;
use faqbot_core::evaluate_grades;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub(crate) struct GradesRequest {
    /// Five whitespace-separated scores, e.g. `"10 12 14 16 18"`.
    scores: String,
}

/// POST /v1/grades
pub(crate) async fn grades(Json(req): Json<GradesRequest>) -> Json<serde_json::Value> {
    match evaluate_grades(&req.scores) {
        Ok(report) => Json(serde_json::json!({
            "status": "ok",
            "scores": report.scores,
            "average": report.average,
            "approved": report.approved(),
            "verdict": report.verdict.to_string(),
            "message": report.to_string(),
        })),
        Err(e) => Json(serde_json::json!({
            "status": "rejected",
            "message": e.to_string(),
        })),
    }
}
