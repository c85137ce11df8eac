use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

use crate::core::scorer::CandidateScorer;
use crate::models::{CandidateEntry, Evaluation};

/// Worker-pool settings for batch scoring
#[derive(Debug, Clone, Copy)]
pub struct BatchOptions {
    /// Maximum candidates scored concurrently (at least 1)
    pub workers: usize,
    /// Delay between dispatching consecutive candidates
    pub pacing: Duration,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            workers: 4,
            pacing: Duration::ZERO,
        }
    }
}

/// A candidate that could not be scored
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchError {
    pub id: String,
    pub error: String,
}

#[derive(Debug, Clone)]
pub struct BatchOutcome {
    /// Evaluations keyed by candidate id, in input order
    pub evaluations: Vec<(String, Evaluation)>,
    pub errors: Vec<BatchError>,
    pub elapsed: Duration,
}

/// Score many candidates against one session with a bounded worker pool
///
/// Error-marked profiles are reported as batch errors instead of being scored.
pub async fn evaluate_batch(
    scorer: Arc<CandidateScorer>,
    candidates: Vec<CandidateEntry>,
    options: BatchOptions,
) -> BatchOutcome {
    let started = Instant::now();
    let total = candidates.len();
    let semaphore = Arc::new(Semaphore::new(options.workers.max(1)));
    let mut tasks = JoinSet::new();
    let mut errors = Vec::new();
    let mut dispatched = 0usize;

    tracing::info!(
        "Scoring batch of {} candidates with {} workers",
        total,
        options.workers.max(1)
    );

    for (index, entry) in candidates.into_iter().enumerate() {
        if let Some(reason) = &entry.profile.error {
            tracing::warn!("Skipping candidate {}: {}", entry.id, reason);
            errors.push(BatchError {
                id: entry.id,
                error: format!("Profile analysis failed: {reason}"),
            });
            continue;
        }

        if dispatched > 0 && !options.pacing.is_zero() {
            tokio::time::sleep(options.pacing).await;
        }
        dispatched += 1;

        let permit = match semaphore.clone().acquire_owned().await {
            Ok(permit) => permit,
            Err(e) => {
                errors.push(BatchError {
                    id: entry.id,
                    error: e.to_string(),
                });
                continue;
            }
        };
        let scorer = scorer.clone();
        let CandidateEntry { id, profile } = entry;
        tasks.spawn(async move {
            // scoring runs in its own task so a panic still reports the candidate id
            let scored = tokio::spawn(async move { scorer.evaluate(&profile).await }).await;
            drop(permit);
            (index, id, scored)
        });
    }

    let mut scored = Vec::with_capacity(dispatched);
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok((index, id, Ok(evaluation))) => scored.push((index, id, evaluation)),
            Ok((_, id, Err(e))) => {
                tracing::error!("Scoring task for {} failed: {}", id, e);
                errors.push(BatchError {
                    id,
                    error: e.to_string(),
                });
            }
            Err(e) => tracing::error!("Batch dispatch task failed: {}", e),
        }
    }
    scored.sort_by_key(|(index, _, _)| *index);

    let outcome = BatchOutcome {
        evaluations: scored
            .into_iter()
            .map(|(_, id, evaluation)| (id, evaluation))
            .collect(),
        errors,
        elapsed: started.elapsed(),
    };

    tracing::info!(
        "Batch finished: {} scored, {} errors in {:?}",
        outcome.evaluations.len(),
        outcome.errors.len(),
        outcome.elapsed
    );

    outcome
}
