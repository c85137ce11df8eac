use crate::core::{
    aggregator::aggregate,
    baseline::{calculate_baseline, ScoringError},
    pattern::score_pattern,
    requirements::score_requirements,
    rubric::Rubric,
    similarity::ResilientSimilarity,
};
use crate::models::{BaselinePatterns, CandidateProfile, Evaluation, JdRequirements};

/// Scoring session: one set of requirements, one baseline, one fixed rubric
///
/// # Pipeline
/// 1. Requirement match against the job requirements
/// 2. Pattern match against the reference-population baseline
/// 3. Aggregation into an overall score, tier and explanations
///
/// The session holds no mutable state, so a single instance can be shared
/// across tasks behind an `Arc` and score candidates in parallel.
#[derive(Debug, Clone)]
pub struct CandidateScorer {
    requirements: JdRequirements,
    baseline: BaselinePatterns,
    similarity: ResilientSimilarity,
    rubric: Rubric,
}

impl CandidateScorer {
    pub fn new(
        requirements: JdRequirements,
        baseline: BaselinePatterns,
        similarity: ResilientSimilarity,
        rubric: Rubric,
    ) -> Self {
        Self {
            requirements,
            baseline,
            similarity,
            rubric,
        }
    }

    /// Build a session by computing the baseline from reference profiles
    ///
    /// Fails when no valid reference profile remains.
    pub fn from_reference<'a, I>(
        requirements: JdRequirements,
        reference: I,
        similarity: ResilientSimilarity,
    ) -> Result<Self, ScoringError>
    where
        I: IntoIterator<Item = &'a CandidateProfile>,
    {
        let baseline = calculate_baseline(reference)?;
        Ok(Self::new(requirements, baseline, similarity, Rubric::default()))
    }

    pub fn baseline(&self) -> &BaselinePatterns {
        &self.baseline
    }

    pub fn requirements(&self) -> &JdRequirements {
        &self.requirements
    }

    pub fn rubric(&self) -> &Rubric {
        &self.rubric
    }

    pub fn similarity_backend(&self) -> &'static str {
        self.similarity.backend()
    }

    /// Score one candidate
    ///
    /// Profiles carrying an error marker are scored best-effort over whatever
    /// fields they hold.
    pub async fn evaluate(&self, candidate: &CandidateProfile) -> Evaluation {
        if let Some(reason) = &candidate.error {
            tracing::warn!(
                "Scoring profile {} despite error marker: {}",
                candidate.display_name(),
                reason
            );
        }

        let jd = score_requirements(
            candidate,
            &self.requirements,
            &self.rubric.requirements,
            &self.similarity,
        )
        .await;
        let pattern = score_pattern(candidate, &self.baseline, &self.rubric.pattern);

        let evaluation = aggregate(
            candidate.display_name(),
            jd,
            pattern,
            &self.baseline,
            &self.rubric,
        );

        tracing::info!(
            "Scored {}: {:.1} ({})",
            evaluation.candidate_name,
            evaluation.overall_score,
            evaluation.recommendation
        );

        evaluation
    }
}
