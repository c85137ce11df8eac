use crate::core::rubric::{RequirementWeights, RubricOutcome, NEUTRAL_CREDIT, SKILL_MATCH_THRESHOLD};
use crate::core::similarity::ResilientSimilarity;
use crate::models::{CandidateProfile, Explanation, JdRequirements, RubricComponent, ScoreBreakdown};

/// Score a candidate against the job requirements
///
/// Components, each a factor in [0, 1] scaled by its weight:
/// - qualifications: MBA and engineering degree 1.0, either 0.7, neither 0.3
/// - experience: within 1 year 1.0, within 3 years 0.8, more than required 0.7, else 0.4
/// - must-have, nice-to-have and domain coverage: similarity of the lists,
///   or neutral credit when the requirement list is empty
pub async fn score_requirements(
    candidate: &CandidateProfile,
    requirements: &JdRequirements,
    weights: &RequirementWeights,
    similarity: &ResilientSimilarity,
) -> RubricOutcome {
    let mut breakdown = ScoreBreakdown::new();
    let mut explanations = Vec::new();

    let (factor, explanation) = qualification_factor(candidate);
    breakdown.insert(RubricComponent::Qualifications, factor * weights.qualifications);
    explanations.push(explanation);

    let (factor, explanation) = experience_factor(
        candidate.years_of_experience,
        requirements.required_experience.years,
    );
    breakdown.insert(RubricComponent::Experience, factor * weights.experience);
    explanations.push(explanation);

    let must_have = &requirements.must_have_skills;
    if must_have.is_empty() {
        breakdown.insert(
            RubricComponent::MustHaveSkills,
            NEUTRAL_CREDIT * weights.must_have_skills,
        );
    } else {
        let coverage = similarity.score(&candidate.skills, must_have).await;
        breakdown.insert(RubricComponent::MustHaveSkills, coverage * weights.must_have_skills);
        explanations.push(must_have_explanation(coverage, must_have.len()));
    }

    let nice_to_have = &requirements.nice_to_have_skills;
    if nice_to_have.is_empty() {
        breakdown.insert(
            RubricComponent::NiceToHaveSkills,
            NEUTRAL_CREDIT * weights.nice_to_have_skills,
        );
    } else {
        let coverage = similarity.score(&candidate.skills, nice_to_have).await;
        breakdown.insert(
            RubricComponent::NiceToHaveSkills,
            coverage * weights.nice_to_have_skills,
        );
        explanations.push(if coverage >= SKILL_MATCH_THRESHOLD {
            Explanation::strength(format!(
                "Covers {:.0}% of the nice-to-have skills",
                coverage * 100.0
            ))
        } else {
            Explanation::weakness(format!(
                "Limited nice-to-have skill coverage ({:.0}%)",
                coverage * 100.0
            ))
        });
    }

    let domains = &requirements.required_experience.domains;
    if domains.is_empty() {
        breakdown.insert(
            RubricComponent::DomainExpertise,
            NEUTRAL_CREDIT * weights.domain_expertise,
        );
    } else {
        let coverage = similarity.score(&candidate.domain_expertise, domains).await;
        breakdown.insert(RubricComponent::DomainExpertise, coverage * weights.domain_expertise);
        explanations.push(if coverage >= SKILL_MATCH_THRESHOLD {
            Explanation::strength(format!(
                "Domain expertise aligns with {} ({:.0}%)",
                domains.join(", "),
                coverage * 100.0
            ))
        } else {
            Explanation::weakness(format!(
                "Little overlap with required domains: {}",
                domains.join(", ")
            ))
        });
    }

    let outcome = RubricOutcome::from_parts(breakdown, explanations);
    tracing::debug!(
        "Requirement match for {}: {:.1}",
        candidate.display_name(),
        outcome.score
    );
    outcome
}

fn qualification_factor(candidate: &CandidateProfile) -> (f64, Explanation) {
    match (candidate.has_mba, candidate.has_engineering_degree) {
        (true, true) => (
            1.0,
            Explanation::strength(
                "Excellent: holds both an MBA and an engineering degree (meets all qualifications)",
            ),
        ),
        (true, false) => (
            0.7,
            Explanation::strength("Good: holds an MBA (partial qualification match)"),
        ),
        (false, true) => (
            0.7,
            Explanation::strength("Good: holds an engineering degree (partial qualification match)"),
        ),
        (false, false) => (
            0.3,
            Explanation::weakness("Missing the MBA and engineering degree named in the requirements"),
        ),
    }
}

fn experience_factor(years: f64, required: f64) -> (f64, Explanation) {
    let diff = (years - required).abs();

    if diff <= 1.0 {
        (
            1.0,
            Explanation::strength(format!(
                "Excellent: {years} years of experience matches the {required}-year requirement"
            )),
        )
    } else if diff <= 3.0 {
        (
            0.8,
            Explanation::strength(format!(
                "Good: {years} years of experience is close to the {required}-year requirement"
            )),
        )
    } else if years >= required {
        (
            0.7,
            Explanation::strength(format!(
                "Acceptable: {years} years of experience exceeds the {required}-year minimum"
            )),
        )
    } else {
        (
            0.4,
            Explanation::weakness(format!(
                "Below requirement: {years} years of experience vs {required} years required"
            )),
        )
    }
}

fn must_have_explanation(coverage: f64, required: usize) -> Explanation {
    // truncate, allowing for float error on exact lexical fractions
    let matched = (coverage * required as f64 + 1e-9).floor() as usize;
    if coverage >= SKILL_MATCH_THRESHOLD {
        Explanation::strength(format!(
            "Skills: {matched}/{required} must-have skills matched ({:.0}%)",
            coverage * 100.0
        ))
    } else {
        Explanation::weakness(format!(
            "Skills: only {matched}/{required} must-have skills matched ({:.0}%)",
            coverage * 100.0
        ))
    }
}
