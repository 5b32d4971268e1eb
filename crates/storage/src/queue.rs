//! Bounded-concurrency work queue.
//!
//! The queue accepts jobs one at a time and guarantees that at most N are
//! in flight simultaneously: `push()` awaits a completion first whenever
//! the cap is already reached, and `drain()` waits for everything still
//! outstanding.
//!
//! Error policy is fail-fast: the first job error surfaces immediately
//! from `push()` or `drain()`, and jobs still in flight are dropped with
//! the queue. Callers that need every job of a batch to finish before
//! submitting more (the reconciler drains between listing pages) call
//! `drain()` at the batch boundary.

use std::future::Future;

use futures::future::BoxFuture;
use futures::stream::{FuturesUnordered, StreamExt};

use crate::error::StorageError;

/// Fixed-capacity concurrent job runner.
///
/// Results complete out of submission order; `drain()` returns them in
/// completion order, so callers aggregate into sets rather than sequences.
pub struct WorkQueue<'a, T> {
    /// Maximum jobs in flight at once.
    limit: usize,
    /// Jobs currently in flight.
    in_flight: FuturesUnordered<BoxFuture<'a, Result<T, StorageError>>>,
    /// Results of jobs that completed while making room for new ones.
    completed: Vec<T>,
}

impl<'a, T> WorkQueue<'a, T> {
    /// Create a queue with the given concurrency cap.
    ///
    /// # Arguments
    /// * `limit` - Maximum jobs in flight, must be at least 1
    ///
    /// # Errors
    /// Returns `StorageError::InvalidConfig` if `limit` is 0.
    pub fn new(limit: usize) -> Result<Self, StorageError> {
        if limit < 1 {
            return Err(StorageError::InvalidConfig {
                message: format!("concurrency must be at least 1, got {limit}"),
            });
        }

        Ok(Self {
            limit,
            in_flight: FuturesUnordered::new(),
            completed: Vec::new(),
        })
    }

    /// Submit a job.
    ///
    /// Returns immediately while fewer than N jobs are in flight; otherwise
    /// awaits one completion before accepting the job, which is what bounds
    /// the concurrency.
    ///
    /// # Errors
    /// Returns the error of a job that completed while waiting for
    /// capacity. The submitted job is dropped in that case.
    pub async fn push<F>(&mut self, job: F) -> Result<(), StorageError>
    where
        F: Future<Output = Result<T, StorageError>> + Send + 'a,
    {
        if self.in_flight.len() >= self.limit {
            if let Some(result) = self.in_flight.next().await {
                self.completed.push(result?);
            }
        }

        self.in_flight.push(Box::pin(job));
        Ok(())
    }

    /// Wait for all submitted jobs to complete.
    ///
    /// # Returns
    /// Results of every job submitted since the last drain, in completion
    /// order.
    ///
    /// # Errors
    /// Returns the first job error; jobs still in flight are dropped with
    /// the queue.
    pub async fn drain(&mut self) -> Result<Vec<T>, StorageError> {
        while let Some(result) = self.in_flight.next().await {
            self.completed.push(result?);
        }

        Ok(std::mem::take(&mut self.completed))
    }

    /// Number of jobs currently in flight.
    pub fn in_flight(&self) -> usize {
        self.in_flight.len()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    use super::*;

    /// Tracks the number of concurrently running jobs and the peak.
    #[derive(Default)]
    struct ConcurrencyProbe {
        current: AtomicUsize,
        peak: AtomicUsize,
    }

    impl ConcurrencyProbe {
        async fn run(&self, value: usize) -> Result<usize, StorageError> {
            let now: usize = self.current.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(5)).await;
            self.current.fetch_sub(1, Ordering::SeqCst);
            Ok(value)
        }
    }

    #[tokio::test]
    async fn test_rejects_zero_limit() {
        let result: Result<WorkQueue<()>, StorageError> = WorkQueue::new(0);
        assert!(matches!(result, Err(StorageError::InvalidConfig { .. })));
    }

    #[tokio::test]
    async fn test_collects_all_results() {
        let mut queue: WorkQueue<usize> = WorkQueue::new(4).unwrap();
        for i in 0..20 {
            queue.push(async move { Ok(i) }).await.unwrap();
        }

        let mut results: Vec<usize> = queue.drain().await.unwrap();
        results.sort_unstable();
        assert_eq!(results, (0..20).collect::<Vec<usize>>());
    }

    #[tokio::test]
    async fn test_concurrency_never_exceeds_limit() {
        for limit in [1usize, 2, 3, 7] {
            let probe: Arc<ConcurrencyProbe> = Arc::new(ConcurrencyProbe::default());
            let mut queue: WorkQueue<usize> = WorkQueue::new(limit).unwrap();

            for i in 0..25 {
                let probe = Arc::clone(&probe);
                queue.push(async move { probe.run(i).await }).await.unwrap();
            }
            let results: Vec<usize> = queue.drain().await.unwrap();

            assert_eq!(results.len(), 25);
            assert!(
                probe.peak.load(Ordering::SeqCst) <= limit,
                "peak {} exceeded limit {limit}",
                probe.peak.load(Ordering::SeqCst)
            );
        }
    }

    #[tokio::test]
    async fn test_limit_is_actually_used() {
        let probe: Arc<ConcurrencyProbe> = Arc::new(ConcurrencyProbe::default());
        let mut queue: WorkQueue<usize> = WorkQueue::new(8).unwrap();

        for i in 0..16 {
            let probe = Arc::clone(&probe);
            queue.push(async move { probe.run(i).await }).await.unwrap();
        }
        queue.drain().await.unwrap();

        // With 16 sleeping jobs and a cap of 8 the pool should fill up
        assert!(probe.peak.load(Ordering::SeqCst) > 1);
    }

    #[tokio::test]
    async fn test_drain_surfaces_first_error() {
        let mut queue: WorkQueue<usize> = WorkQueue::new(2).unwrap();
        queue.push(async { Ok(1) }).await.unwrap();
        queue
            .push(async {
                Err(StorageError::Upload {
                    bucket: "b".to_string(),
                    key: "k".to_string(),
                    message: "boom".to_string(),
                })
            })
            .await
            .unwrap();

        let result: Result<Vec<usize>, StorageError> = queue.drain().await;
        assert!(matches!(result, Err(StorageError::Upload { .. })));
    }

    #[tokio::test]
    async fn test_push_surfaces_error_at_capacity() {
        let mut queue: WorkQueue<usize> = WorkQueue::new(1).unwrap();
        queue
            .push(async {
                Err(StorageError::Delete {
                    bucket: "b".to_string(),
                    key: "k".to_string(),
                    message: "boom".to_string(),
                })
            })
            .await
            .unwrap();

        // The queue is at capacity, so this push must first await the
        // failed job and report its error.
        let result: Result<(), StorageError> = queue.push(async { Ok(2) }).await;
        assert!(matches!(result, Err(StorageError::Delete { .. })));
    }

    #[tokio::test]
    async fn test_drain_then_reuse() {
        let mut queue: WorkQueue<usize> = WorkQueue::new(2).unwrap();
        queue.push(async { Ok(1) }).await.unwrap();
        assert_eq!(queue.drain().await.unwrap(), vec![1]);

        queue.push(async { Ok(2) }).await.unwrap();
        assert_eq!(queue.drain().await.unwrap(), vec![2]);
        assert_eq!(queue.in_flight(), 0);
    }

    #[tokio::test]
    async fn test_drain_empty_queue() {
        let mut queue: WorkQueue<usize> = WorkQueue::new(3).unwrap();
        assert!(queue.drain().await.unwrap().is_empty());
    }
}
