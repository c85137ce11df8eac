// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{
    BaselinePatterns, BaselineSnapshot, CandidateEntry, CandidateProfile, DetailedBreakdown,
    Evaluation, ExperienceRange, Explanation, ExplanationKind, JdRequirements, PreviousRole,
    Recommendation, RequiredExperience, RubricComponent, ScoreBreakdown, SkillFrequency,
    DEFAULT_REQUIRED_YEARS,
};
pub use requests::{BatchEvaluateRequest, EvaluateRequest};
pub use responses::{ErrorResponse, HealthResponse};
