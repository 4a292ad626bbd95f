//! Bounded worker pool for concurrent index queries.
//!
//! A [`WorkerPool`] is created for one concurrent search and dropped when
//! it returns. Each job holds a semaphore permit for as long as it runs, so
//! at most `size` jobs are ever in flight. Permits are released on drop,
//! including when a job panics.

use std::future::Future;
use std::sync::Arc;

use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

use crate::error::SearchError;

/// Fixed-size pool of task slots.
#[derive(Debug)]
pub struct WorkerPool {
    permits: Arc<Semaphore>,
    size: usize,
}

impl WorkerPool {
    /// Create a pool allowing `size` concurrent jobs.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Config`] if `size` is 0.
    pub fn new(size: usize) -> Result<Self, SearchError> {
        if size == 0 {
            return Err(SearchError::Config(
                "worker pool size must be greater than 0".into(),
            ));
        }
        Ok(Self {
            permits: Arc::new(Semaphore::new(size)),
            size,
        })
    }

    /// Number of task slots.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Run `job` for every input, at most [`Self::size`] at a time.
    ///
    /// Outputs are returned in input order regardless of completion order.
    /// Once `cancel` fires no further jobs are started; jobs already running
    /// finish normally and the rest yield [`SearchError::Cancelled`]. A job
    /// that panics yields [`SearchError::Task`] without disturbing others.
    pub async fn run<I, O, F, Fut>(
        &self,
        inputs: Vec<I>,
        cancel: &CancellationToken,
        job: F,
    ) -> Vec<Result<O, SearchError>>
    where
        F: Fn(I) -> Fut,
        Fut: Future<Output = Result<O, SearchError>> + Send + 'static,
        O: Send + 'static,
    {
        let total = inputs.len();
        let mut outputs: Vec<Option<Result<O, SearchError>>> =
            std::iter::repeat_with(|| None).take(total).collect();
        let mut tasks = JoinSet::new();
        let mut submitted = 0;

        for (position, input) in inputs.into_iter().enumerate() {
            let permit = tokio::select! {
                biased;
                () = cancel.cancelled() => None,
                permit = Arc::clone(&self.permits).acquire_owned() => permit.ok(),
            };
            let Some(permit) = permit else {
                tracing::debug!(position, total, "worker pool stopped submitting");
                break;
            };

            let fut = job(input);
            tasks.spawn(async move {
                let _permit = permit;
                (position, fut.await)
            });
            submitted += 1;
        }

        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((position, output)) => outputs[position] = Some(output),
                Err(err) => tracing::warn!(error = %err, "worker task did not complete"),
            }
        }

        outputs
            .into_iter()
            .enumerate()
            .map(|(position, output)| match output {
                Some(output) => output,
                None if position < submitted => {
                    Err(SearchError::Task("task panicked or was aborted".into()))
                }
                None => Err(SearchError::Cancelled),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    #[test]
    fn zero_size_rejected() {
        let err = WorkerPool::new(0).unwrap_err();
        assert!(err.to_string().contains("greater than 0"));
    }

    #[tokio::test]
    async fn outputs_follow_input_order() {
        let pool = WorkerPool::new(4).expect("pool");
        let cancel = CancellationToken::new();
        let outputs = pool
            .run(vec![30u64, 10, 20, 0], &cancel, |delay| async move {
                tokio::time::sleep(Duration::from_millis(delay)).await;
                Ok(delay)
            })
            .await;
        let values: Vec<u64> = outputs.into_iter().map(|o| o.expect("ok")).collect();
        assert_eq!(values, vec![30, 10, 20, 0]);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn never_exceeds_pool_size() {
        let pool = WorkerPool::new(2).expect("pool");
        let cancel = CancellationToken::new();
        let in_flight = Arc::new(AtomicUsize::new(0));
        let peak = Arc::new(AtomicUsize::new(0));

        let outputs = pool
            .run((0..8).collect(), &cancel, |i: usize| {
                let in_flight = Arc::clone(&in_flight);
                let peak = Arc::clone(&peak);
                async move {
                    let now = in_flight.fetch_add(1, Ordering::SeqCst) + 1;
                    peak.fetch_max(now, Ordering::SeqCst);
                    tokio::time::sleep(Duration::from_millis(15)).await;
                    in_flight.fetch_sub(1, Ordering::SeqCst);
                    Ok(i)
                }
            })
            .await;

        assert_eq!(outputs.len(), 8);
        assert!(peak.load(Ordering::SeqCst) <= 2);
    }

    #[tokio::test]
    async fn failures_are_isolated() {
        let pool = WorkerPool::new(2).expect("pool");
        let cancel = CancellationToken::new();
        let outputs = pool
            .run(vec![1, 2, 3], &cancel, |i| async move {
                if i == 2 {
                    Err(SearchError::Http("boom".into()))
                } else {
                    Ok(i)
                }
            })
            .await;
        assert!(outputs[0].is_ok());
        assert!(outputs[1].is_err());
        assert!(outputs[2].is_ok());
    }

    #[tokio::test]
    async fn panicking_job_reports_task_error() {
        let pool = WorkerPool::new(2).expect("pool");
        let cancel = CancellationToken::new();
        let outputs = pool
            .run(vec![1, 2], &cancel, |i| async move {
                if i == 1 {
                    panic!("job exploded");
                }
                Ok(i)
            })
            .await;
        assert!(matches!(outputs[0], Err(SearchError::Task(_))));
        assert_eq!(outputs[1], Ok(2));
    }

    #[tokio::test]
    async fn cancelled_before_start_runs_nothing() {
        let pool = WorkerPool::new(2).expect("pool");
        let cancel = CancellationToken::new();
        cancel.cancel();
        let started = Arc::new(AtomicUsize::new(0));

        let outputs = pool
            .run(vec![1, 2, 3], &cancel, |i: i32| {
                let started = Arc::clone(&started);
                async move {
                    started.fetch_add(1, Ordering::SeqCst);
                    Ok(i)
                }
            })
            .await;

        assert_eq!(started.load(Ordering::SeqCst), 0);
        assert!(outputs.iter().all(|o| *o == Err(SearchError::Cancelled)));
    }
}
