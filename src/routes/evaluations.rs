use actix_web::{web, HttpResponse, Responder};
use std::sync::Arc;
use validator::Validate;

use crate::core::{evaluate_batch, summarize, BatchOptions, CandidateScorer};
use crate::models::{BatchEvaluateRequest, ErrorResponse, EvaluateRequest, HealthResponse};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub scorer: Arc<CandidateScorer>,
    pub batch: BatchOptions,
}

/// Configure all evaluation routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/health", web::get().to(health_check))
        .route("/baseline", web::get().to(get_baseline))
        .route("/requirements", web::get().to(get_requirements))
        .route("/evaluations", web::post().to(evaluate))
        .route("/evaluations/batch", web::post().to(evaluate_many));
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        similarity_backend: state.scorer.similarity_backend().to_string(),
        reference_profiles: state.scorer.baseline().total_profiles,
        timestamp: chrono::Utc::now(),
    })
}

/// GET /api/v1/baseline
async fn get_baseline(state: web::Data<AppState>) -> impl Responder {
    HttpResponse::Ok().json(state.scorer.baseline())
}

/// GET /api/v1/requirements
async fn get_requirements(state: web::Data<AppState>) -> impl Responder {
    HttpResponse::Ok().json(state.scorer.requirements())
}

/// Score one candidate
///
/// POST /api/v1/evaluations
///
/// Request body:
/// ```json
/// { "candidate": { "name": "string", "years_of_experience": 8, "skills": ["string"] } }
/// ```
async fn evaluate(state: web::Data<AppState>, req: web::Json<EvaluateRequest>) -> impl Responder {
    let evaluation = state.scorer.evaluate(&req.candidate).await;
    HttpResponse::Ok().json(evaluation)
}

/// Score a batch of candidates and return the comparative report
///
/// POST /api/v1/evaluations/batch
///
/// Request body:
/// ```json
/// {
///   "candidates": [{ "id": "string", "profile": {} }],
///   "minScore": 60
/// }
/// ```
async fn evaluate_many(
    state: web::Data<AppState>,
    req: web::Json<BatchEvaluateRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        tracing::info!("Validation failed for batch request: {:?}", errors);
        return HttpResponse::BadRequest().json(ErrorResponse {
            error: "Validation failed".to_string(),
            message: errors.to_string(),
            status_code: 400,
        });
    }

    let BatchEvaluateRequest {
        candidates,
        min_score,
    } = req.into_inner();

    let outcome = evaluate_batch(state.scorer.clone(), candidates, state.batch).await;
    HttpResponse::Ok().json(summarize(outcome, min_score))
}
