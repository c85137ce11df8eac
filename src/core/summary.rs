use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::core::aggregator::round1;
use crate::core::batch::{BatchError, BatchOutcome};
use crate::models::{Evaluation, Recommendation};

const HIGHLIGHT_COUNT: usize = 5;

/// Comparative report over one scored batch
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchReport {
    pub batch_id: Uuid,
    pub processed_at: DateTime<Utc>,
    pub processing_time_ms: u64,
    pub total_candidates_processed: usize,
    pub total_errors: usize,
    pub min_score: f64,
    pub statistics: ScoreStatistics,
    pub distribution: ScoreDistribution,
    pub top_candidates: Vec<RankedCandidate>,
    pub bottom_candidates: Vec<RankedCandidate>,
    pub ranking: Vec<RankedCandidate>,
    pub qualified: Vec<RankedCandidate>,
    pub evaluations: Vec<Evaluation>,
    pub errors: Vec<BatchError>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedCandidate {
    pub rank: usize,
    pub id: String,
    pub name: String,
    pub overall_score: f64,
    pub recommendation: Recommendation,
    pub jd_match_score: f64,
    pub pattern_match_score: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoreStatistics {
    pub average_overall_score: f64,
    pub average_jd_match_score: f64,
    pub average_pattern_match_score: f64,
    pub highest_score: f64,
    pub lowest_score: f64,
    pub median_score: f64,
}

/// Candidate counts per score band
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreDistribution {
    /// 85 to 100
    pub excellent: usize,
    /// 75 to 84
    pub strong: usize,
    /// 60 to 74
    pub good: usize,
    /// 45 to 59
    pub moderate: usize,
    /// 0 to 44
    pub weak: usize,
}

impl ScoreDistribution {
    fn record(&mut self, score: f64) {
        match score {
            s if s >= 85.0 => self.excellent += 1,
            s if s >= 75.0 => self.strong += 1,
            s if s >= 60.0 => self.good += 1,
            s if s >= 45.0 => self.moderate += 1,
            _ => self.weak += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.excellent + self.strong + self.good + self.moderate + self.weak
    }
}

/// Build the comparative report for a finished batch
pub fn summarize(outcome: BatchOutcome, min_score: f64) -> BatchReport {
    let evaluations: Vec<Evaluation> = outcome
        .evaluations
        .iter()
        .map(|(_, evaluation)| evaluation.clone())
        .collect();

    let mut distribution = ScoreDistribution::default();
    for evaluation in &evaluations {
        distribution.record(evaluation.overall_score);
    }

    let mut sorted: Vec<&(String, Evaluation)> = outcome.evaluations.iter().collect();
    sorted.sort_by(|a, b| b.1.overall_score.total_cmp(&a.1.overall_score));

    let ranking: Vec<RankedCandidate> = sorted
        .iter()
        .enumerate()
        .map(|(i, (id, evaluation))| RankedCandidate {
            rank: i + 1,
            id: id.clone(),
            name: evaluation.candidate_name.clone(),
            overall_score: evaluation.overall_score,
            recommendation: evaluation.recommendation,
            jd_match_score: evaluation.jd_match_score,
            pattern_match_score: evaluation.pattern_match_score,
        })
        .collect();

    let top_candidates = ranking.iter().take(HIGHLIGHT_COUNT).cloned().collect();
    let bottom_candidates = if ranking.len() > HIGHLIGHT_COUNT {
        ranking.iter().rev().take(HIGHLIGHT_COUNT).cloned().collect()
    } else {
        Vec::new()
    };
    let qualified = ranking
        .iter()
        .filter(|c| c.overall_score >= min_score)
        .cloned()
        .collect();

    BatchReport {
        batch_id: Uuid::new_v4(),
        processed_at: Utc::now(),
        processing_time_ms: outcome.elapsed.as_millis() as u64,
        total_candidates_processed: evaluations.len(),
        total_errors: outcome.errors.len(),
        min_score,
        statistics: statistics(&evaluations),
        distribution,
        top_candidates,
        bottom_candidates,
        ranking,
        qualified,
        evaluations,
        errors: outcome.errors,
    }
}

fn statistics(evaluations: &[Evaluation]) -> ScoreStatistics {
    if evaluations.is_empty() {
        return ScoreStatistics::default();
    }

    let count = evaluations.len() as f64;
    let mean = |f: fn(&Evaluation) -> f64| {
        (evaluations.iter().map(f).sum::<f64>() / count * 100.0).round() / 100.0
    };

    let mut scores: Vec<f64> = evaluations.iter().map(|e| e.overall_score).collect();
    scores.sort_by(f64::total_cmp);

    ScoreStatistics {
        average_overall_score: mean(|e| e.overall_score),
        average_jd_match_score: mean(|e| e.jd_match_score),
        average_pattern_match_score: mean(|e| e.pattern_match_score),
        highest_score: round1(scores[scores.len() - 1]),
        lowest_score: round1(scores[0]),
        median_score: round1(scores[scores.len() / 2]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BaselineSnapshot, DetailedBreakdown, ScoreBreakdown};
    use std::time::Duration;

    fn evaluation(name: &str, score: f64) -> Evaluation {
        Evaluation {
            candidate_name: name.to_string(),
            overall_score: score,
            recommendation: crate::core::rubric::TierThresholds::default().classify(score),
            jd_match_score: score,
            pattern_match_score: score,
            detailed_breakdown: DetailedBreakdown {
                jd_components: ScoreBreakdown::new(),
                pattern_components: ScoreBreakdown::new(),
            },
            strengths: vec![],
            weaknesses: vec![],
            comparison_to_baseline: String::new(),
            baseline_stats: BaselineSnapshot {
                avg_experience: 0.0,
                pct_with_mba: 0.0,
                pct_with_engineering: 0.0,
            },
        }
    }

    fn outcome(scores: &[f64]) -> BatchOutcome {
        BatchOutcome {
            evaluations: scores
                .iter()
                .enumerate()
                .map(|(i, s)| (format!("c{i}"), evaluation(&format!("Candidate {i}"), *s)))
                .collect(),
            errors: vec![],
            elapsed: Duration::from_millis(1500),
        }
    }

    #[test]
    fn test_distribution_bands() {
        let report = summarize(outcome(&[90.0, 85.0, 84.9, 75.0, 60.0, 59.9, 45.0, 10.0]), 0.0);

        assert_eq!(
            report.distribution,
            ScoreDistribution {
                excellent: 2,
                strong: 2,
                good: 1,
                moderate: 2,
                weak: 1,
            }
        );
        assert_eq!(report.distribution.total(), 8);
        assert_eq!(report.processing_time_ms, 1500);
    }

    #[test]
    fn test_statistics_and_ranking() {
        let report = summarize(outcome(&[50.0, 80.0, 70.0, 40.0]), 60.0);

        assert_eq!(report.statistics.average_overall_score, 60.0);
        assert_eq!(report.statistics.highest_score, 80.0);
        assert_eq!(report.statistics.lowest_score, 40.0);
        // index len/2 of ascending scores
        assert_eq!(report.statistics.median_score, 70.0);

        let ranked: Vec<&str> = report.ranking.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ranked, vec!["c1", "c2", "c0", "c3"]);
        assert_eq!(report.qualified.len(), 2);
        assert!(report.bottom_candidates.is_empty());
    }

    #[test]
    fn test_bottom_five_only_for_larger_batches() {
        let report = summarize(outcome(&[10.0, 20.0, 30.0, 40.0, 50.0, 60.0, 70.0]), 0.0);

        assert_eq!(report.top_candidates.len(), 5);
        assert_eq!(report.top_candidates[0].overall_score, 70.0);
        assert_eq!(report.bottom_candidates.len(), 5);
        assert_eq!(report.bottom_candidates[0].overall_score, 10.0);
        assert_eq!(report.bottom_candidates[0].rank, 7);
    }

    #[test]
    fn test_empty_batch() {
        let report = summarize(outcome(&[]), 0.0);
        assert_eq!(report.total_candidates_processed, 0);
        assert_eq!(report.statistics, ScoreStatistics::default());
        assert!(report.ranking.is_empty());
    }
}
