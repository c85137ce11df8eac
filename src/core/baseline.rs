use std::collections::HashMap;

use thiserror::Error;

use crate::core::rubric::TOP_SKILLS_TRACKED;
use crate::models::{BaselinePatterns, CandidateProfile, ExperienceRange, SkillFrequency};

/// Errors raised while preparing a scoring session
#[derive(Debug, Error)]
pub enum ScoringError {
    #[error("no valid reference profiles to build a baseline from ({excluded} excluded)")]
    EmptyBaseline { excluded: usize },
}

/// Derive baseline patterns from the reference population
///
/// Profiles carrying an error marker are excluded. The skill ranking keeps the
/// first-seen order among skills with equal counts, so identical input always
/// yields an identical baseline.
pub fn calculate_baseline<'a, I>(profiles: I) -> Result<BaselinePatterns, ScoringError>
where
    I: IntoIterator<Item = &'a CandidateProfile>,
{
    let (valid, excluded): (Vec<&CandidateProfile>, Vec<&CandidateProfile>) =
        profiles.into_iter().partition(|p| p.is_valid());

    if valid.is_empty() {
        return Err(ScoringError::EmptyBaseline {
            excluded: excluded.len(),
        });
    }

    let total = valid.len();
    let experiences: Vec<f64> = valid.iter().map(|p| p.years_of_experience).collect();
    let avg_experience = experiences.iter().sum::<f64>() / total as f64;

    let experience_range = ExperienceRange {
        min: experiences.iter().copied().fold(f64::INFINITY, f64::min),
        max: experiences.iter().copied().fold(f64::NEG_INFINITY, f64::max),
    };

    let baseline = BaselinePatterns {
        total_profiles: total,
        excluded_profiles: excluded.len(),
        avg_experience,
        pct_with_mba: percentage(&valid, |p| p.has_mba),
        pct_with_engineering: percentage(&valid, |p| p.has_engineering_degree),
        pct_with_tech_background: percentage(&valid, |p| p.has_tech_background),
        common_skills: most_common_skills(&valid, TOP_SKILLS_TRACKED),
        experience_range,
    };

    tracing::debug!(
        "Baseline computed from {} profiles ({} excluded), avg experience {:.1}",
        baseline.total_profiles,
        baseline.excluded_profiles,
        baseline.avg_experience
    );

    Ok(baseline)
}

fn percentage(valid: &[&CandidateProfile], flag: impl Fn(&CandidateProfile) -> bool) -> f64 {
    let count = valid.iter().copied().filter(|p| flag(p)).count();
    count as f64 / valid.len() as f64 * 100.0
}

fn most_common_skills(valid: &[&CandidateProfile], limit: usize) -> Vec<SkillFrequency> {
    let mut counts: Vec<SkillFrequency> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for skill in valid.iter().flat_map(|p| p.skills.iter()) {
        match index.get(skill.as_str()) {
            Some(&i) => counts[i].count += 1,
            None => {
                index.insert(skill.as_str(), counts.len());
                counts.push(SkillFrequency {
                    skill: skill.clone(),
                    count: 1,
                });
            }
        }
    }

    // stable sort keeps first-seen order among equal counts
    counts.sort_by(|a, b| b.count.cmp(&a.count));
    counts.truncate(limit);
    counts
}
