//! Skill-list similarity: a pluggable semantic backend with a lexical fallback.
//!
//! `ResilientSimilarity` is what the scorers call. It delegates to an optional
//! semantic backend under a bounded timeout and falls back to
//! `lexical_similarity` on any failure, so scoring never errors on it.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

/// Errors a similarity backend may report
#[derive(Debug, Error)]
pub enum SimilarityError {
    #[error("similarity request timed out after {0:?}")]
    Timeout(Duration),

    #[error("similarity request failed: {0}")]
    Transport(String),

    #[error("similarity service returned error status {0}")]
    Status(u16),

    #[error("malformed similarity response: {0}")]
    Malformed(String),
}

/// Scores how well `candidate` skills cover `target` skills, in [0, 1]
#[async_trait]
pub trait SkillSimilarity: Send + Sync {
    async fn similarity(
        &self,
        candidate: &[String],
        target: &[String],
    ) -> Result<f64, SimilarityError>;

    /// Short backend name for logs and health output
    fn backend(&self) -> &'static str;
}

/// Case-insensitive containment in either direction
///
/// Blank skills never match.
pub fn skills_overlap(a: &str, b: &str) -> bool {
    let a = a.trim().to_lowercase();
    let b = b.trim().to_lowercase();
    if a.is_empty() || b.is_empty() {
        return false;
    }
    a.contains(&b) || b.contains(&a)
}

/// Fraction of target skills matched by at least one candidate skill
pub fn lexical_similarity(candidate: &[String], target: &[String]) -> f64 {
    if candidate.is_empty() || target.is_empty() {
        return 0.0;
    }

    let matched = target
        .iter()
        .filter(|t| candidate.iter().any(|c| skills_overlap(c, t)))
        .count();

    matched as f64 / target.len() as f64
}

/// Deterministic substring-based backend
#[derive(Debug, Clone, Copy, Default)]
pub struct LexicalSimilarity;

#[async_trait]
impl SkillSimilarity for LexicalSimilarity {
    async fn similarity(
        &self,
        candidate: &[String],
        target: &[String],
    ) -> Result<f64, SimilarityError> {
        Ok(lexical_similarity(candidate, target))
    }

    fn backend(&self) -> &'static str {
        "lexical"
    }
}

/// Similarity port used by the scorers
///
/// A primary backend call is attempted once, bounded by `timeout`. Anything
/// other than a finite number falls through to the lexical score.
#[derive(Clone)]
pub struct ResilientSimilarity {
    primary: Option<Arc<dyn SkillSimilarity>>,
    timeout: Duration,
}

impl ResilientSimilarity {
    pub fn new(primary: Arc<dyn SkillSimilarity>, timeout: Duration) -> Self {
        Self {
            primary: Some(primary),
            timeout,
        }
    }

    /// Port that never leaves the process
    pub fn lexical_only() -> Self {
        Self {
            primary: None,
            timeout: Duration::ZERO,
        }
    }

    pub fn backend(&self) -> &'static str {
        self.primary
            .as_ref()
            .map(|p| p.backend())
            .unwrap_or(LexicalSimilarity.backend())
    }

    pub async fn score(&self, candidate: &[String], target: &[String]) -> f64 {
        if candidate.is_empty() || target.is_empty() {
            return 0.0;
        }

        let Some(primary) = &self.primary else {
            return lexical_similarity(candidate, target);
        };

        let outcome = match tokio::time::timeout(self.timeout, primary.similarity(candidate, target))
            .await
        {
            Ok(result) => result,
            Err(_) => Err(SimilarityError::Timeout(self.timeout)),
        };

        match outcome {
            Ok(score) if score.is_finite() => score.clamp(0.0, 1.0),
            Ok(score) => {
                tracing::warn!(
                    "Similarity backend {} returned non-finite score {}, using lexical fallback",
                    primary.backend(),
                    score
                );
                lexical_similarity(candidate, target)
            }
            Err(e) => {
                tracing::warn!(
                    "Similarity backend {} failed, using lexical fallback: {}",
                    primary.backend(),
                    e
                );
                lexical_similarity(candidate, target)
            }
        }
    }
}

impl Default for ResilientSimilarity {
    fn default() -> Self {
        Self::lexical_only()
    }
}

impl std::fmt::Debug for ResilientSimilarity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResilientSimilarity")
            .field("backend", &self.backend())
            .field("timeout", &self.timeout)
            .finish()
    }
}
