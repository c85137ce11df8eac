use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::domain::{CandidateEntry, CandidateProfile};

/// Request to score a single candidate
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluateRequest {
    pub candidate: CandidateProfile,
}

/// Request to score a batch of candidates
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct BatchEvaluateRequest {
    #[validate(length(min = 1, max = 500))]
    pub candidates: Vec<CandidateEntry>,
    #[serde(default)]
    #[serde(alias = "min_score", rename = "minScore")]
    #[validate(range(min = 0.0, max = 100.0))]
    pub min_score: f64,
}
