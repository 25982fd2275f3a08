use actix_web::{post, web, HttpResponse};
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::server::AppState;

#[derive(Deserialize)]
struct OptimizeRequest {
    prompt: Option<String>,
}

#[derive(Serialize)]
struct OptimizeResponse {
    optimized_prompt: String,
}

/// Quick flow: one prompt in, one optimized prompt out. Whether the answer
/// came from the tool catalog or the direct fallback is not visible here.
#[post("/optimize")]
pub async fn optimize(
    app_state: web::Data<AppState>,
    payload: web::Json<OptimizeRequest>,
) -> Result<HttpResponse, AppError> {
    let prompt = payload
        .into_inner()
        .prompt
        .map(|p| p.trim().to_string())
        .filter(|p| !p.is_empty())
        .ok_or(AppError::MissingField("prompt"))?;

    log::info!("quick optimization requested ({} chars)", prompt.len());

    let optimized = app_state
        .optimizer
        .optimize(&format!("Optimize the following prompt: {}", prompt))
        .await?;

    Ok(HttpResponse::Ok().json(OptimizeResponse {
        optimized_prompt: optimized,
    }))
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(optimize);
}
