//! Candidate Scorer - explainable scoring of candidate profiles
//!
//! Scores a structured candidate profile against a job-requirements record and
//! against statistical patterns of a reference population of successful hires,
//! producing an overall score, a recommendation tier and tagged strengths and
//! weaknesses.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use core::{calculate_baseline, CandidateScorer, ResilientSimilarity, Rubric, ScoringError};
pub use models::{BaselinePatterns, CandidateProfile, Evaluation, JdRequirements, Recommendation};
