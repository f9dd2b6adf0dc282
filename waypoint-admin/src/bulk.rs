use futures_util::stream::{self, StreamExt};
use serde::Serialize;
use std::fmt::Display;
use std::future::Future;
use tracing::warn;

/// Drive `tasks` with at most `limit` in flight. Every task runs to
/// completion; outcomes come back in input order.
pub async fn run_with_concurrency<I, F, T, E>(tasks: I, limit: usize) -> Vec<Result<T, E>>
where
    I: IntoIterator<Item = F>,
    F: Future<Output = Result<T, E>>,
{
    stream::iter(tasks)
        .buffered(limit.max(1))
        .collect()
        .await
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BulkFailure {
    pub id: String,
    pub error: String,
}

/// Per-item result of a bulk delete or update. Nothing is rolled back.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BulkReport {
    pub succeeded: Vec<String>,
    pub failed: Vec<BulkFailure>,
}

impl BulkReport {
    /// Pair ids with the outcomes `run_with_concurrency` returned for them.
    pub fn collect<T, E: Display>(ids: &[String], outcomes: Vec<Result<T, E>>) -> Self {
        let mut report = BulkReport::default();
        for (id, outcome) in ids.iter().zip(outcomes) {
            match outcome {
                Ok(_) => report.succeeded.push(id.clone()),
                Err(e) => {
                    warn!("Bulk item {} failed: {}", id, e);
                    report.failed.push(BulkFailure {
                        id: id.clone(),
                        error: e.to_string(),
                    });
                }
            }
        }
        report
    }

    pub fn total(&self) -> usize {
        self.succeeded.len() + self.failed.len()
    }

    pub fn is_complete_success(&self) -> bool {
        self.failed.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    #[tokio::test]
    async fn test_never_exceeds_limit() {
        let in_flight = Arc::new(AtomicUsize::new(0));
        let peak = Arc::new(AtomicUsize::new(0));

        let tasks = (0..10).map(|i| {
            let in_flight = in_flight.clone();
            let peak = peak.clone();
            async move {
                let now = in_flight.fetch_add(1, Ordering::SeqCst) + 1;
                peak.fetch_max(now, Ordering::SeqCst);
                tokio::time::sleep(Duration::from_millis(5)).await;
                in_flight.fetch_sub(1, Ordering::SeqCst);
                Ok::<_, String>(i)
            }
        });

        let outcomes = run_with_concurrency(tasks, 3).await;
        assert_eq!(outcomes.len(), 10);
        assert_eq!(peak.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_results_keep_input_order() {
        let tasks = [30u64, 1, 15, 5].into_iter().map(|delay| async move {
            tokio::time::sleep(Duration::from_millis(delay)).await;
            Ok::<_, String>(delay)
        });
        let outcomes: Vec<u64> = run_with_concurrency(tasks, 4)
            .await
            .into_iter()
            .map(Result::unwrap)
            .collect();
        assert_eq!(outcomes, vec![30, 1, 15, 5]);
    }

    #[tokio::test]
    async fn test_failure_does_not_abort_batch() {
        let tasks = (0..5).map(|i| async move {
            if i == 1 || i == 3 {
                Err(format!("item {} rejected", i))
            } else {
                Ok(())
            }
        });
        let outcomes = run_with_concurrency(tasks, 3).await;
        let ids: Vec<String> = (0..5).map(|i| format!("id-{}", i)).collect();
        let report = BulkReport::collect(&ids, outcomes);

        assert_eq!(report.total(), 5);
        assert_eq!(report.succeeded, vec!["id-0", "id-2", "id-4"]);
        assert_eq!(report.failed[1], BulkFailure { id: "id-3".into(), error: "item 3 rejected".into() });
        assert!(!report.is_complete_success());
    }

    #[tokio::test]
    async fn test_zero_limit_still_runs() {
        let outcomes = run_with_concurrency((0..3).map(|i| async move { Ok::<_, String>(i) }), 0).await;
        assert_eq!(outcomes.len(), 3);
    }
}
