use serde::de::{DeserializeOwned, MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::fmt;

/// Required years of experience assumed when the requirements omit them
pub const DEFAULT_REQUIRED_YEARS: f64 = 5.0;

/// Structured candidate profile as produced by the profile-structuring service
///
/// Every field is optional on the wire. Missing numbers default to 0, missing
/// flags to false and missing or non-list collections to empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CandidateProfile {
    #[serde(deserialize_with = "lenient_string")]
    pub name: String,
    #[serde(deserialize_with = "lenient_string")]
    pub current_role: String,
    #[serde(deserialize_with = "lenient_string")]
    pub current_company: String,
    #[serde(deserialize_with = "lenient_years")]
    pub years_of_experience: f64,
    #[serde(deserialize_with = "lenient_values")]
    pub education: Vec<Value>,
    #[serde(deserialize_with = "lenient_bool")]
    pub has_mba: bool,
    #[serde(deserialize_with = "lenient_bool")]
    pub has_engineering_degree: bool,
    #[serde(deserialize_with = "lenient_bool")]
    pub has_tech_background: bool,
    #[serde(deserialize_with = "lenient_strings")]
    pub skills: Vec<String>,
    #[serde(deserialize_with = "lenient_roles")]
    pub previous_roles: Vec<PreviousRole>,
    #[serde(deserialize_with = "lenient_strings")]
    pub achievements: Vec<String>,
    #[serde(deserialize_with = "lenient_strings")]
    pub domain_expertise: Vec<String>,
    #[serde(deserialize_with = "lenient_marker", skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl CandidateProfile {
    /// Placeholder for a record that could not be parsed at all
    pub fn malformed(reason: impl Into<String>) -> Self {
        Self {
            error: Some(reason.into()),
            ..Self::default()
        }
    }

    /// A profile is valid when the structuring service did not flag it
    pub fn is_valid(&self) -> bool {
        self.error.is_none()
    }

    /// Name used in reports, falling back to "Unknown"
    pub fn display_name(&self) -> &str {
        let name = self.name.trim();
        if name.is_empty() {
            "Unknown"
        } else {
            name
        }
    }
}

/// One entry of a candidate's work history
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PreviousRole {
    #[serde(deserialize_with = "lenient_string")]
    pub title: String,
    #[serde(deserialize_with = "lenient_string")]
    pub company: String,
    #[serde(deserialize_with = "lenient_string")]
    pub duration: String,
}

/// A profile paired with the opaque id it was submitted under
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateEntry {
    pub id: String,
    pub profile: CandidateProfile,
}

/// Structured job requirements, fixed for the lifetime of a scoring session
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JdRequirements {
    #[serde(deserialize_with = "lenient_strings")]
    pub required_qualifications: Vec<String>,
    #[serde(deserialize_with = "lenient_object")]
    pub required_experience: RequiredExperience,
    #[serde(deserialize_with = "lenient_strings")]
    pub key_responsibilities: Vec<String>,
    #[serde(deserialize_with = "lenient_strings")]
    pub must_have_skills: Vec<String>,
    #[serde(deserialize_with = "lenient_strings")]
    pub nice_to_have_skills: Vec<String>,
    #[serde(deserialize_with = "lenient_strings")]
    pub key_competencies: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RequiredExperience {
    #[serde(deserialize_with = "lenient_required_years")]
    pub years: f64,
    #[serde(deserialize_with = "lenient_strings")]
    pub domains: Vec<String>,
}

impl Default for RequiredExperience {
    fn default() -> Self {
        Self {
            years: DEFAULT_REQUIRED_YEARS,
            domains: Vec::new(),
        }
    }
}

/// Aggregate statistics over the valid part of the reference population
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BaselinePatterns {
    pub total_profiles: usize,
    pub excluded_profiles: usize,
    pub avg_experience: f64,
    pub pct_with_mba: f64,
    pub pct_with_engineering: f64,
    pub pct_with_tech_background: f64,
    pub common_skills: Vec<SkillFrequency>,
    pub experience_range: ExperienceRange,
}

impl BaselinePatterns {
    /// The `n` most frequent reference skills, most frequent first
    pub fn top_skills(&self, n: usize) -> impl Iterator<Item = &str> {
        self.common_skills.iter().take(n).map(|s| s.skill.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillFrequency {
    pub skill: String,
    pub count: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExperienceRange {
    pub min: f64,
    pub max: f64,
}

/// Named rubric components across both scorers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RubricComponent {
    Qualifications,
    Experience,
    MustHaveSkills,
    NiceToHaveSkills,
    DomainExpertise,
    ExperienceSimilarity,
    SkillsOverlap,
    EducationPattern,
    TechBackground,
    CareerProgression,
}

impl RubricComponent {
    pub fn as_str(&self) -> &'static str {
        match self {
            RubricComponent::Qualifications => "qualifications",
            RubricComponent::Experience => "experience",
            RubricComponent::MustHaveSkills => "must_have_skills",
            RubricComponent::NiceToHaveSkills => "nice_to_have_skills",
            RubricComponent::DomainExpertise => "domain_expertise",
            RubricComponent::ExperienceSimilarity => "experience_similarity",
            RubricComponent::SkillsOverlap => "skills_overlap",
            RubricComponent::EducationPattern => "education_pattern",
            RubricComponent::TechBackground => "tech_background",
            RubricComponent::CareerProgression => "career_progression",
        }
    }
}

impl fmt::Display for RubricComponent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Weighted sub-scores of one rubric, kept in emission order
///
/// Each value is already multiplied by its component weight, so `total()`
/// is the rubric score.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScoreBreakdown {
    entries: Vec<(RubricComponent, f64)>,
}

impl ScoreBreakdown {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a component, replacing any earlier value for it
    pub fn insert(&mut self, component: RubricComponent, value: f64) {
        match self.entries.iter_mut().find(|(c, _)| *c == component) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((component, value)),
        }
    }

    pub fn get(&self, component: RubricComponent) -> Option<f64> {
        self.entries
            .iter()
            .find(|(c, _)| *c == component)
            .map(|(_, v)| *v)
    }

    pub fn total(&self) -> f64 {
        self.entries.iter().map(|(_, v)| v).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (RubricComponent, f64)> + '_ {
        self.entries.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Copy with every value passed through `f`
    pub fn map_values(&self, f: impl Fn(f64) -> f64) -> Self {
        Self {
            entries: self.entries.iter().map(|(c, v)| (*c, f(*v))).collect(),
        }
    }
}

impl Serialize for ScoreBreakdown {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (component, value) in &self.entries {
            map.serialize_entry(component.as_str(), value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for ScoreBreakdown {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct BreakdownVisitor;

        impl<'de> Visitor<'de> for BreakdownVisitor {
            type Value = ScoreBreakdown;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of rubric components to scores")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
                let mut breakdown = ScoreBreakdown::new();
                while let Some((component, value)) = map.next_entry::<RubricComponent, f64>()? {
                    breakdown.insert(component, value);
                }
                Ok(breakdown)
            }
        }

        deserializer.deserialize_map(BreakdownVisitor)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExplanationKind {
    Strength,
    Weakness,
}

/// A human-readable finding tagged as strength or weakness
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Explanation {
    pub kind: ExplanationKind,
    pub text: String,
}

impl Explanation {
    pub fn strength(text: impl Into<String>) -> Self {
        Self {
            kind: ExplanationKind::Strength,
            text: text.into(),
        }
    }

    pub fn weakness(text: impl Into<String>) -> Self {
        Self {
            kind: ExplanationKind::Weakness,
            text: text.into(),
        }
    }

    pub fn is_strength(&self) -> bool {
        self.kind == ExplanationKind::Strength
    }
}

/// Recommendation tier derived from the overall score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Recommendation {
    #[serde(rename = "Strong Candidate")]
    Strong,
    #[serde(rename = "Good Candidate")]
    Good,
    #[serde(rename = "Moderate Candidate")]
    Moderate,
    #[serde(rename = "Weak Candidate")]
    Weak,
}

impl Recommendation {
    pub fn label(&self) -> &'static str {
        match self {
            Recommendation::Strong => "Strong Candidate",
            Recommendation::Good => "Good Candidate",
            Recommendation::Moderate => "Moderate Candidate",
            Recommendation::Weak => "Weak Candidate",
        }
    }

    /// Fixed one-line comparison against the reference population
    pub fn comparison(&self) -> &'static str {
        match self {
            Recommendation::Strong => "Above average compared to reference hires",
            Recommendation::Good => "Comparable to reference hires",
            Recommendation::Moderate => "Below average compared to reference hires",
            Recommendation::Weak => "Significantly below the reference-hire pattern",
        }
    }
}

impl fmt::Display for Recommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Final, explainable result of scoring one candidate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    pub candidate_name: String,
    pub overall_score: f64,
    pub recommendation: Recommendation,
    pub jd_match_score: f64,
    pub pattern_match_score: f64,
    pub detailed_breakdown: DetailedBreakdown,
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
    pub comparison_to_baseline: String,
    pub baseline_stats: BaselineSnapshot,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetailedBreakdown {
    pub jd_components: ScoreBreakdown,
    pub pattern_components: ScoreBreakdown,
}

/// Key baseline figures copied into each evaluation for report context
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BaselineSnapshot {
    pub avg_experience: f64,
    pub pct_with_mba: f64,
    pub pct_with_engineering: f64,
}

fn lenient_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => s,
        Value::Number(n) => n.to_string(),
        _ => String::new(),
    })
}

fn number_from(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
    .filter(|v| v.is_finite())
}

fn lenient_years<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(number_from(&value).unwrap_or(0.0).max(0.0))
}

fn lenient_required_years<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(number_from(&value)
        .map(|v| v.max(0.0))
        .unwrap_or(DEFAULT_REQUIRED_YEARS))
}

fn lenient_bool<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::Bool(b) => b,
        Value::String(s) => matches!(s.trim().to_ascii_lowercase().as_str(), "true" | "yes"),
        _ => false,
    })
}

fn lenient_strings<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::Array(items) => items
            .into_iter()
            .filter_map(|item| match item {
                Value::String(s) => Some(s),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    })
}

fn lenient_values<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<Value>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::Array(items) => items,
        _ => Vec::new(),
    })
}

fn lenient_roles<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Vec<PreviousRole>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::Array(items) => items
            .into_iter()
            .filter_map(|item| serde_json::from_value(item).ok())
            .collect(),
        _ => Vec::new(),
    })
}

fn lenient_object<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    Ok(match Value::deserialize(deserializer)? {
        value @ Value::Object(_) => serde_json::from_value(value).unwrap_or_default(),
        _ => T::default(),
    })
}

fn lenient_marker<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<String>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::Null => None,
        Value::String(s) => Some(s),
        other => Some(other.to_string()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_profile_defaults_missing_fields() {
        let profile: CandidateProfile = serde_json::from_value(json!({ "name": "Ada" })).unwrap();

        assert_eq!(profile.name, "Ada");
        assert_eq!(profile.years_of_experience, 0.0);
        assert!(!profile.has_mba);
        assert!(profile.skills.is_empty());
        assert!(profile.is_valid());
    }

    #[test]
    fn test_non_list_skills_become_empty() {
        let profile: CandidateProfile = serde_json::from_value(json!({
            "skills": "Python, SQL",
            "domain_expertise": ["Fintech", 42, null],
        }))
        .unwrap();

        assert!(profile.skills.is_empty());
        assert_eq!(profile.domain_expertise, vec!["Fintech"]);
    }

    #[test]
    fn test_error_marker_detected() {
        let profile: CandidateProfile = serde_json::from_value(json!({
            "name": "Error",
            "error": "rate limited",
        }))
        .unwrap();

        assert!(!profile.is_valid());
        assert_eq!(profile.error.as_deref(), Some("rate limited"));
    }

    #[test]
    fn test_display_name_falls_back() {
        let profile = CandidateProfile::default();
        assert_eq!(profile.display_name(), "Unknown");
    }

    #[test]
    fn test_requirements_default_years() {
        let requirements: JdRequirements = serde_json::from_value(json!({
            "must_have_skills": ["Roadmapping"],
            "required_experience": { "domains": ["SaaS"] },
        }))
        .unwrap();

        assert_eq!(requirements.required_experience.years, DEFAULT_REQUIRED_YEARS);
        assert_eq!(requirements.required_experience.domains, vec!["SaaS"]);

        let empty: JdRequirements = serde_json::from_value(json!({
            "required_experience": null,
        }))
        .unwrap();
        assert_eq!(empty.required_experience.years, DEFAULT_REQUIRED_YEARS);
    }

    #[test]
    fn test_breakdown_serializes_in_emission_order() {
        let mut breakdown = ScoreBreakdown::new();
        breakdown.insert(RubricComponent::Qualifications, 25.0);
        breakdown.insert(RubricComponent::Experience, 16.0);
        breakdown.insert(RubricComponent::Qualifications, 17.5);

        let json = serde_json::to_string(&breakdown).unwrap();
        assert_eq!(json, r#"{"qualifications":17.5,"experience":16.0}"#);
        assert_eq!(breakdown.total(), 33.5);

        let parsed: ScoreBreakdown = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, breakdown);
    }

    #[test]
    fn test_recommendation_labels() {
        let json = serde_json::to_string(&Recommendation::Moderate).unwrap();
        assert_eq!(json, "\"Moderate Candidate\"");
        assert_eq!(Recommendation::Weak.to_string(), "Weak Candidate");
    }
}
