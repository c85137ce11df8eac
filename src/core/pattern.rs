use crate::core::rubric::{
    PatternWeights, RubricOutcome, NEUTRAL_CREDIT, PATTERN_SKILL_SAMPLE, SENIORITY_MARKERS,
    SENIOR_YEARS_THRESHOLD, SKILL_MATCH_THRESHOLD,
};
use crate::core::similarity::lexical_similarity;
use crate::models::{
    BaselinePatterns, CandidateProfile, Explanation, RubricComponent, ScoreBreakdown,
};

/// Score a candidate against the traits of the reference population
///
/// Pure and synchronous: skill overlap against the baseline uses the lexical
/// rule directly, never the remote similarity backend.
pub fn score_pattern(
    candidate: &CandidateProfile,
    baseline: &BaselinePatterns,
    weights: &PatternWeights,
) -> RubricOutcome {
    let mut breakdown = ScoreBreakdown::new();
    let mut explanations = Vec::new();

    // Experience similarity
    let years = candidate.years_of_experience;
    let avg = baseline.avg_experience;
    let diff = (years - avg).abs();
    let experience = if diff <= 2.0 {
        explanations.push(Explanation::strength(format!(
            "Strong match: {years} years aligns with the reference-hire average of {avg:.1} years"
        )));
        1.0
    } else if diff <= 4.0 {
        explanations.push(Explanation::strength(format!(
            "Good match: {years} years is close to the reference-hire average of {avg:.1} years"
        )));
        0.75
    } else {
        explanations.push(Explanation::weakness(format!(
            "Different from pattern: {years} years vs {avg:.1} years average"
        )));
        0.5
    };
    breakdown.insert(
        RubricComponent::ExperienceSimilarity,
        experience * weights.experience_similarity,
    );

    // Skills overlap with the most common reference skills
    let sample: Vec<String> = baseline
        .top_skills(PATTERN_SKILL_SAMPLE)
        .map(str::to_string)
        .collect();
    let overlap = if sample.is_empty() {
        NEUTRAL_CREDIT
    } else {
        let overlap = lexical_similarity(&candidate.skills, &sample);
        let matched = (overlap * sample.len() as f64).round() as usize;
        let text = format!(
            "Skills overlap: {matched}/{} common skills from reference hires",
            sample.len()
        );
        explanations.push(if overlap >= SKILL_MATCH_THRESHOLD {
            Explanation::strength(text)
        } else {
            Explanation::weakness(text)
        });
        overlap
    };
    breakdown.insert(RubricComponent::SkillsOverlap, overlap * weights.skills_overlap);

    // Education
    let mut education = 0.0;
    if candidate.has_mba {
        education += 0.5;
        explanations.push(Explanation::strength(format!(
            "Has an MBA (found in {:.0}% of reference hires)",
            baseline.pct_with_mba
        )));
    }
    if candidate.has_engineering_degree {
        education += 0.5;
        explanations.push(Explanation::strength(format!(
            "Has an engineering degree (found in {:.0}% of reference hires)",
            baseline.pct_with_engineering
        )));
    }
    if education == 0.0 {
        explanations.push(Explanation::weakness(format!(
            "Neither an MBA ({:.0}% of reference hires) nor an engineering degree ({:.0}%)",
            baseline.pct_with_mba, baseline.pct_with_engineering
        )));
    }
    breakdown.insert(
        RubricComponent::EducationPattern,
        education * weights.education_pattern,
    );

    // Tech background
    let tech = if candidate.has_tech_background {
        explanations.push(Explanation::strength(format!(
            "Tech background matches {:.0}% of reference hires",
            baseline.pct_with_tech_background
        )));
        1.0
    } else {
        explanations.push(Explanation::weakness(format!(
            "No tech background (found in {:.0}% of reference hires)",
            baseline.pct_with_tech_background
        )));
        0.3
    };
    breakdown.insert(RubricComponent::TechBackground, tech * weights.tech_background);

    let (progression, explanation) = career_progression(&candidate.current_role, years);
    explanations.extend(explanation);
    breakdown.insert(
        RubricComponent::CareerProgression,
        progression * weights.career_progression,
    );

    let outcome = RubricOutcome::from_parts(breakdown, explanations);
    tracing::debug!(
        "Pattern match for {}: {:.1}",
        candidate.display_name(),
        outcome.score
    );
    outcome
}

/// Seniority heuristic on the current role title
fn career_progression(current_role: &str, years: f64) -> (f64, Option<Explanation>) {
    let role = current_role.to_lowercase();
    if !SENIORITY_MARKERS.iter().any(|marker| role.contains(marker)) {
        return (0.7, None);
    }

    if years >= SENIOR_YEARS_THRESHOLD {
        (
            1.0,
            Some(Explanation::strength(format!(
                "Senior role backed by {years} years of experience"
            ))),
        )
    } else {
        (
            0.6,
            Some(Explanation::weakness(format!(
                "Senior title with only {years} years of experience"
            ))),
        )
    }
}
