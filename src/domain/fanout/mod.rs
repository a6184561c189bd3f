pub mod retry;

pub use retry::RetryPolicy;

use crate::domain::shared::RemoteError;
use futures::stream::{FuturesUnordered, StreamExt};
use std::collections::{btree_map, BTreeMap, BTreeSet};
use std::fmt::Display;
use std::future::Future;
use std::time::{Duration, Instant};

/// Runs one remote call per target concurrently and joins on all of them.
///
/// Each call goes through the retry policy on its own; a failing target never
/// cancels its siblings. When a deadline is set and expires, calls still in
/// flight are dropped and reported as timed out.
#[derive(Debug, Clone)]
pub struct Fanout {
    retry: RetryPolicy,
    deadline: Option<Duration>,
}

impl Fanout {
    pub fn new(retry: RetryPolicy, deadline: Option<Duration>) -> Self {
        Self { retry, deadline }
    }

    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.retry
    }

    pub async fn run<T, V, F, Fut>(
        &self,
        operation: &'static str,
        targets: impl IntoIterator<Item = T>,
        work: F,
    ) -> FanoutResults<T, V>
    where
        T: Ord + Copy + Display,
        F: Fn(T) -> Fut,
        Fut: Future<Output = Result<V, RemoteError>>,
    {
        let targets: BTreeSet<T> = targets.into_iter().collect();
        if targets.is_empty() {
            return FanoutResults::default();
        }

        let started = Instant::now();
        let work = &work;
        let mut in_flight: FuturesUnordered<_> = targets
            .iter()
            .copied()
            .map(|target| async move {
                let result = self.retry.run(operation, || work(target)).await;
                (target, result)
            })
            .collect();

        let mut settled = BTreeMap::new();
        let join_all = async {
            while let Some((target, result)) = in_flight.next().await {
                if let Err(e) = &result {
                    tracing::warn!(operation, key = %target, error = %e, "Fanout task failed");
                }
                settled.insert(target, result);
            }
        };

        match self.deadline {
            Some(deadline) => {
                if tokio::time::timeout(deadline, join_all).await.is_err() {
                    let abandoned: Vec<T> = targets
                        .iter()
                        .copied()
                        .filter(|target| !settled.contains_key(target))
                        .collect();
                    tracing::warn!(
                        operation,
                        abandoned = abandoned.len(),
                        deadline_ms = deadline.as_millis() as u64,
                        "Fanout deadline reached, abandoning in-flight calls"
                    );
                    for target in abandoned {
                        settled.insert(target, Err(RemoteError::Timeout(deadline)));
                    }
                }
            }
            None => join_all.await,
        }
        drop(in_flight);

        let results = FanoutResults { results: settled };
        tracing::debug!(
            operation,
            targets = results.len(),
            failed = results.failed().count(),
            latency_ms = started.elapsed().as_millis() as u64,
            "Fanout completed"
        );
        results
    }
}

/// Per-target outcome of a fanout, keyed and ordered by target
#[derive(Debug)]
pub struct FanoutResults<T, V> {
    results: BTreeMap<T, Result<V, RemoteError>>,
}

impl<T, V> Default for FanoutResults<T, V> {
    fn default() -> Self {
        Self {
            results: BTreeMap::new(),
        }
    }
}

impl<T: Ord, V> FanoutResults<T, V> {
    pub fn get(&self, target: &T) -> Option<&Result<V, RemoteError>> {
        self.results.get(target)
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn succeeded(&self) -> impl Iterator<Item = (&T, &V)> {
        self.results
            .iter()
            .filter_map(|(target, result)| result.as_ref().ok().map(|value| (target, value)))
    }

    pub fn failed(&self) -> impl Iterator<Item = (&T, &RemoteError)> {
        self.results
            .iter()
            .filter_map(|(target, result)| result.as_ref().err().map(|e| (target, e)))
    }

    /// True when there was at least one target and none succeeded
    pub fn is_total_failure(&self) -> bool {
        !self.results.is_empty() && self.results.values().all(|result| result.is_err())
    }
}

impl<T: Ord, V> FromIterator<(T, Result<V, RemoteError>)> for FanoutResults<T, V> {
    fn from_iter<I: IntoIterator<Item = (T, Result<V, RemoteError>)>>(iter: I) -> Self {
        Self {
            results: iter.into_iter().collect(),
        }
    }
}

impl<T, V> IntoIterator for FanoutResults<T, V> {
    type Item = (T, Result<V, RemoteError>);
    type IntoIter = btree_map::IntoIter<T, Result<V, RemoteError>>;

    fn into_iter(self) -> Self::IntoIter {
        self.results.into_iter()
    }
}
