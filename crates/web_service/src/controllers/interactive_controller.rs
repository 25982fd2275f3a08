use actix_web::{get, post, web, HttpResponse};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AppError;
use crate::server::AppState;
use interactive_flow::INTAKE_QUESTIONS;

#[derive(Serialize)]
struct QuestionsResponse {
    questions: Vec<&'static str>,
}

#[derive(Deserialize)]
struct IntakeRequest {
    /// Omitted on first contact; the server mints one and the client echoes
    /// it back on the follow-up round.
    session_id: Option<String>,
    answers: Vec<String>,
}

#[derive(Serialize)]
struct IntakeResponse {
    session_id: String,
    followup_questions: Vec<String>,
}

#[derive(Deserialize)]
struct FollowupRequest {
    session_id: String,
    questions: Vec<String>,
    answers: Vec<String>,
}

#[derive(Serialize)]
struct FollowupResponse {
    analysis: String,
}

/// The fixed intake form, so clients render the same five questions the
/// server validates against.
#[get("/interactive/questions")]
pub async fn questions() -> HttpResponse {
    HttpResponse::Ok().json(QuestionsResponse {
        questions: INTAKE_QUESTIONS.to_vec(),
    })
}

#[post("/interactive/intake")]
pub async fn submit_intake(
    app_state: web::Data<AppState>,
    payload: web::Json<IntakeRequest>,
) -> Result<HttpResponse, AppError> {
    let request = payload.into_inner();
    let session_id = request
        .session_id
        .filter(|id| !id.is_empty())
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    let followup_questions = app_state
        .flow
        .submit_intake(&session_id, request.answers)
        .await?;

    Ok(HttpResponse::Ok().json(IntakeResponse {
        session_id,
        followup_questions,
    }))
}

#[post("/interactive/followup")]
pub async fn submit_followups(
    app_state: web::Data<AppState>,
    payload: web::Json<FollowupRequest>,
) -> Result<HttpResponse, AppError> {
    let request = payload.into_inner();

    let analysis = app_state
        .flow
        .submit_followups(&request.session_id, request.questions, request.answers)
        .await?;

    Ok(HttpResponse::Ok().json(FollowupResponse { analysis }))
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(questions)
        .service(submit_intake)
        .service(submit_followups);
}
