use crate::core::rubric::{Rubric, RubricOutcome};
use crate::models::{BaselinePatterns, BaselineSnapshot, DetailedBreakdown, Evaluation};

/// Round half away from zero to one decimal place
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Combine both rubric outcomes into the final evaluation
///
/// The overall score is blended from the already-rounded component scores so
/// that the reported figures reproduce it exactly.
pub fn aggregate(
    candidate_name: &str,
    jd: RubricOutcome,
    pattern: RubricOutcome,
    baseline: &BaselinePatterns,
    rubric: &Rubric,
) -> Evaluation {
    let jd_match_score = round1(jd.score);
    let pattern_match_score = round1(pattern.score);
    let overall_score =
        round1(jd_match_score * rubric.blend.jd + pattern_match_score * rubric.blend.pattern);
    let recommendation = rubric.tiers.classify(overall_score);

    let (strengths, weaknesses): (Vec<_>, Vec<_>) = jd
        .explanations
        .into_iter()
        .chain(pattern.explanations)
        .partition(|e| e.is_strength());

    Evaluation {
        candidate_name: candidate_name.to_string(),
        overall_score,
        recommendation,
        jd_match_score,
        pattern_match_score,
        detailed_breakdown: DetailedBreakdown {
            jd_components: jd.breakdown.map_values(round1),
            pattern_components: pattern.breakdown.map_values(round1),
        },
        strengths: strengths.into_iter().map(|e| e.text).collect(),
        weaknesses: weaknesses.into_iter().map(|e| e.text).collect(),
        comparison_to_baseline: recommendation.comparison().to_string(),
        baseline_stats: BaselineSnapshot {
            avg_experience: round1(baseline.avg_experience),
            pct_with_mba: round1(baseline.pct_with_mba),
            pct_with_engineering: round1(baseline.pct_with_engineering),
        },
    }
}
