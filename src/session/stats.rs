//! Usage accounting for one chat session.

use crate::types::QueryResult;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Running totals over every query of the process.
///
/// Tokens, cost and time only accumulate from successful queries, so the
/// averages are taken over those.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionStats {
    pub total_queries: u64,
    pub successful_queries: u64,
    pub failed_queries: u64,
    pub total_tokens: u64,
    pub total_cost: f64,
    pub total_time: Duration,
}

impl SessionStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, result: &QueryResult) {
        self.total_queries += 1;

        if result.is_success() {
            self.successful_queries += 1;
            self.total_tokens += result.tokens_used;
            self.total_cost += result.cost;
            self.total_time += result.total_time;
        } else {
            self.failed_queries += 1;
        }
    }

    pub fn has_queries(&self) -> bool {
        self.total_queries > 0
    }

    /// `None` before the first query.
    pub fn avg_time(&self) -> Option<Duration> {
        if !self.has_queries() {
            return None;
        }
        Some(match u32::try_from(self.successful_queries) {
            Ok(0) => Duration::ZERO,
            Ok(n) => self.total_time / n,
            Err(_) => Duration::from_secs_f64(
                self.total_time.as_secs_f64() / self.successful_queries as f64,
            ),
        })
    }

    /// `None` before the first query.
    pub fn avg_cost(&self) -> Option<f64> {
        if !self.has_queries() {
            return None;
        }
        if self.successful_queries == 0 {
            return Some(0.0);
        }
        Some(self.total_cost / self.successful_queries as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(tokens: u64, cost: f64, secs: u64, error: Option<&str>) -> QueryResult {
        QueryResult {
            query: "q".to_string(),
            answer: "a".to_string(),
            sources: vec![],
            model: "gpt-4o-mini".to_string(),
            tokens_used: tokens,
            cost,
            total_time: Duration::from_secs(secs),
            error: error.map(String::from),
        }
    }

    #[test]
    fn test_no_queries_no_averages() {
        let stats = SessionStats::new();
        assert_eq!(stats.avg_time(), None);
        assert_eq!(stats.avg_cost(), None);
        assert!(!stats.has_queries());
    }

    #[test]
    fn test_mixed_outcomes() {
        let mut stats = SessionStats::new();
        stats.record(&result(100, 0.001, 2, None));
        stats.record(&result(300, 0.003, 4, None));
        stats.record(&result(0, 0.0, 9, Some("timeout")));

        assert_eq!(stats.total_queries, 3);
        assert_eq!(stats.successful_queries, 2);
        assert_eq!(stats.failed_queries, 1);
        assert_eq!(stats.total_tokens, 400);
        assert!((stats.total_cost - 0.004).abs() < 1e-12);
        assert_eq!(stats.total_time, Duration::from_secs(6));
        assert_eq!(stats.avg_time(), Some(Duration::from_secs(3)));
        assert!((stats.avg_cost().unwrap() - 0.002).abs() < 1e-12);
    }

    #[test]
    fn test_only_failures() {
        let mut stats = SessionStats::new();
        stats.record(&result(0, 0.0, 1, Some("boom")));

        assert_eq!(stats.failed_queries, 1);
        assert_eq!(stats.total_time, Duration::ZERO);
        assert_eq!(stats.avg_time(), Some(Duration::ZERO));
        assert_eq!(stats.avg_cost(), Some(0.0));
    }
}
