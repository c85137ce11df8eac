use crate::models::{Explanation, Recommendation, ScoreBreakdown};

/// Share of a component's weight granted when there is nothing to compare against
pub const NEUTRAL_CREDIT: f64 = 0.5;

/// Number of most-frequent reference skills kept in the baseline
pub const TOP_SKILLS_TRACKED: usize = 20;

/// Number of baseline skills the pattern scorer compares against
pub const PATTERN_SKILL_SAMPLE: usize = 10;

/// Skill or domain similarity at or above this counts as a strength
pub const SKILL_MATCH_THRESHOLD: f64 = 0.5;

/// Role-title fragments that mark a senior position
pub const SENIORITY_MARKERS: [&str; 3] = ["senior", "lead", "principal"];

/// Years of experience expected behind a senior title
pub const SENIOR_YEARS_THRESHOLD: f64 = 8.0;

/// Weights of the job-requirements rubric (sum to 100)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RequirementWeights {
    pub qualifications: f64,
    pub experience: f64,
    pub must_have_skills: f64,
    pub nice_to_have_skills: f64,
    pub domain_expertise: f64,
}

impl RequirementWeights {
    pub fn sum(&self) -> f64 {
        self.qualifications
            + self.experience
            + self.must_have_skills
            + self.nice_to_have_skills
            + self.domain_expertise
    }
}

impl Default for RequirementWeights {
    fn default() -> Self {
        Self {
            qualifications: 25.0,
            experience: 20.0,
            must_have_skills: 30.0,
            nice_to_have_skills: 15.0,
            domain_expertise: 10.0,
        }
    }
}

/// Weights of the reference-pattern rubric (sum to 100)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PatternWeights {
    pub experience_similarity: f64,
    pub skills_overlap: f64,
    pub education_pattern: f64,
    pub tech_background: f64,
    pub career_progression: f64,
}

impl PatternWeights {
    pub fn sum(&self) -> f64 {
        self.experience_similarity
            + self.skills_overlap
            + self.education_pattern
            + self.tech_background
            + self.career_progression
    }
}

impl Default for PatternWeights {
    fn default() -> Self {
        Self {
            experience_similarity: 25.0,
            skills_overlap: 30.0,
            education_pattern: 20.0,
            tech_background: 15.0,
            career_progression: 10.0,
        }
    }
}

/// How the two rubric scores blend into the overall score
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlendWeights {
    pub jd: f64,
    pub pattern: f64,
}

impl Default for BlendWeights {
    fn default() -> Self {
        Self {
            jd: 0.4,
            pattern: 0.6,
        }
    }
}

/// Lower bounds of the recommendation tiers
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TierThresholds {
    pub strong: f64,
    pub good: f64,
    pub moderate: f64,
}

impl TierThresholds {
    /// Map an overall score onto a tier, highest tier first
    pub fn classify(&self, overall_score: f64) -> Recommendation {
        if overall_score >= self.strong {
            Recommendation::Strong
        } else if overall_score >= self.good {
            Recommendation::Good
        } else if overall_score >= self.moderate {
            Recommendation::Moderate
        } else {
            Recommendation::Weak
        }
    }
}

impl Default for TierThresholds {
    fn default() -> Self {
        Self {
            strong: 75.0,
            good: 60.0,
            moderate: 45.0,
        }
    }
}

/// Complete, fixed rubric for a scoring session
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rubric {
    pub requirements: RequirementWeights,
    pub pattern: PatternWeights,
    pub blend: BlendWeights,
    pub tiers: TierThresholds,
}

/// Output of one rubric: total, weighted breakdown and findings in emission order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RubricOutcome {
    pub score: f64,
    pub breakdown: ScoreBreakdown,
    pub explanations: Vec<Explanation>,
}

impl RubricOutcome {
    pub(crate) fn from_parts(breakdown: ScoreBreakdown, explanations: Vec<Explanation>) -> Self {
        Self {
            score: breakdown.total(),
            breakdown,
            explanations,
        }
    }
}
