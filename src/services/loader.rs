use serde_json::Value;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::models::{CandidateEntry, CandidateProfile, JdRequirements};

/// Errors that can occur while loading session inputs
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("expected a JSON object of {0}")]
    NotAnObject(&'static str),
}

fn read(path: &Path) -> Result<String, LoadError> {
    std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Load the job requirements for a session
pub fn load_requirements(path: impl AsRef<Path>) -> Result<JdRequirements, LoadError> {
    let path = path.as_ref();
    let requirements = parse_requirements(&read(path)?)?;
    tracing::info!(
        "Loaded requirements from {} ({} must-have skills, {} years required)",
        path.display(),
        requirements.must_have_skills.len(),
        requirements.required_experience.years
    );
    Ok(requirements)
}

pub fn parse_requirements(json: &str) -> Result<JdRequirements, LoadError> {
    match serde_json::from_str::<Value>(json)? {
        value @ Value::Object(_) => Ok(serde_json::from_value(value)?),
        _ => Err(LoadError::NotAnObject("requirements")),
    }
}

/// Load the reference population, keeping the file's entry order
pub fn load_reference_profiles(path: impl AsRef<Path>) -> Result<Vec<CandidateEntry>, LoadError> {
    let path = path.as_ref();
    let entries = parse_reference_profiles(&read(path)?)?;
    tracing::info!(
        "Loaded {} reference profiles from {}",
        entries.len(),
        path.display()
    );
    Ok(entries)
}

/// Parse an `id -> profile` JSON object
///
/// An entry that is not a profile-shaped object becomes an error-marked
/// profile rather than failing the whole load.
pub fn parse_reference_profiles(json: &str) -> Result<Vec<CandidateEntry>, LoadError> {
    let Value::Object(map) = serde_json::from_str::<Value>(json)? else {
        return Err(LoadError::NotAnObject("reference profiles"));
    };

    Ok(map
        .into_iter()
        .map(|(id, value)| {
            let profile = serde_json::from_value::<CandidateProfile>(value).unwrap_or_else(|e| {
                tracing::warn!("Reference profile {} is malformed: {}", id, e);
                CandidateProfile::malformed(format!("unreadable profile: {e}"))
            });
            CandidateEntry { id, profile }
        })
        .collect())
}
