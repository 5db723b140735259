// src/batch.rs
//! Settle-all helper for fan-out steps.
//!
//! Every sub-operation of a step is issued at once on the current task and
//! awaited as a set. The outcome keeps each item's result in issue order; the
//! call site decides whether a single failure sinks the whole step.

use std::future::Future;

use futures::future::join_all;

#[derive(Debug)]
pub struct BatchOutcome<T, E> {
    results: Vec<Result<T, E>>,
}

/// Await every future, never short-circuiting.
pub async fn settle_all<I, F, T, E>(futs: I) -> BatchOutcome<T, E>
where
    I: IntoIterator<Item = F>,
    F: Future<Output = Result<T, E>>,
{
    BatchOutcome {
        results: join_all(futs).await,
    }
}

impl<T, E> BatchOutcome<T, E> {
    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn succeeded(&self) -> usize {
        self.results.iter().filter(|r| r.is_ok()).count()
    }

    pub fn failed(&self) -> usize {
        self.len() - self.succeeded()
    }

    /// All values in issue order, or the first failure in issue order.
    /// Items that already succeeded are not undone.
    pub fn into_all_or_nothing(self) -> Result<Vec<T>, E> {
        self.results.into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn keeps_issue_order() {
        let out = settle_all((1..=3).map(|n| async move {
            tokio::time::sleep(std::time::Duration::from_millis(10 * (4 - n))).await;
            Ok::<_, String>(n)
        }))
        .await;
        assert_eq!(out.succeeded(), 3);
        assert_eq!(out.into_all_or_nothing().unwrap(), vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn one_failure_sinks_the_batch_but_all_settle() {
        let ran = std::sync::atomic::AtomicUsize::new(0);
        let out = settle_all((0..4).map(|n| {
            let ran = &ran;
            async move {
                ran.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
                if n == 1 || n == 3 {
                    Err(format!("item {n}"))
                } else {
                    Ok(n)
                }
            }
        }))
        .await;
        assert_eq!(ran.load(std::sync::atomic::Ordering::SeqCst), 4);
        assert_eq!(out.failed(), 2);
        assert_eq!(out.into_all_or_nothing().unwrap_err(), "item 1");
    }
}
