use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

use crate::core::similarity::{SimilarityError, SkillSimilarity};

/// In-memory cache of similarity results in front of another backend
///
/// Only successful results are stored, so a transient failure is retried on
/// the next call for the same pair of lists.
pub struct CachedSimilarity {
    inner: Arc<dyn SkillSimilarity>,
    cache: moka::future::Cache<String, f64>,
}

impl CachedSimilarity {
    pub fn new(inner: Arc<dyn SkillSimilarity>, capacity: u64, ttl_secs: u64) -> Self {
        let cache = moka::future::CacheBuilder::new(capacity)
            .time_to_live(Duration::from_secs(ttl_secs))
            .build();

        Self { inner, cache }
    }
}

#[async_trait]
impl SkillSimilarity for CachedSimilarity {
    async fn similarity(
        &self,
        candidate: &[String],
        target: &[String],
    ) -> Result<f64, SimilarityError> {
        let key = CacheKey::similarity(candidate, target);

        if let Some(score) = self.cache.get(&key).await {
            tracing::trace!("Similarity cache hit: {}", key);
            return Ok(score);
        }

        let score = self.inner.similarity(candidate, target).await?;
        self.cache.insert(key, score).await;
        Ok(score)
    }

    fn backend(&self) -> &'static str {
        self.inner.backend()
    }
}

/// Cache key builder
pub struct CacheKey;

impl CacheKey {
    /// Build a cache key for a pair of skill lists
    ///
    /// Skills are joined with the ASCII unit separator.
    pub fn similarity(candidate: &[String], target: &[String]) -> String {
        format!("similarity:{}|{}", candidate.join("\u{1f}"), target.join("\u{1f}"))
    }
}
