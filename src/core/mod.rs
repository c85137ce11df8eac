// Core scoring exports
pub mod aggregator;
pub mod baseline;
pub mod batch;
pub mod pattern;
pub mod requirements;
pub mod rubric;
pub mod scorer;
pub mod similarity;
pub mod summary;

pub use aggregator::{aggregate, round1};
pub use baseline::{calculate_baseline, ScoringError};
pub use batch::{evaluate_batch, BatchError, BatchOptions, BatchOutcome};
pub use pattern::score_pattern;
pub use requirements::score_requirements;
pub use rubric::{
    BlendWeights, PatternWeights, RequirementWeights, Rubric, RubricOutcome, TierThresholds,
};
pub use scorer::CandidateScorer;
pub use similarity::{
    lexical_similarity, skills_overlap, LexicalSimilarity, ResilientSimilarity, SimilarityError,
    SkillSimilarity,
};
pub use summary::{summarize, BatchReport, RankedCandidate, ScoreDistribution, ScoreStatistics};
