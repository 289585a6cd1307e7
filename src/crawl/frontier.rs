// src/crawl/frontier.rs
// =============================================================================
// The frontier: URLs waiting to be looked at, shared by every worker.
//
// The hard part of a concurrent crawl is knowing when it's over. An empty
// queue is not enough, because a worker that is halfway through fetching a
// page may be about to push more links. So the frontier also counts how many
// candidates are checked out ("in flight"):
//
//   queue empty AND in_flight == 0  =>  no more work can ever arrive
//
// Taking a URL hands out a `Ticket` and bumps in_flight. Dropping the ticket
// pushes whatever links were attached to it and decrements in_flight inside
// the same critical section, so nobody can observe "empty and idle" between
// the two. A worker that finds the queue empty while others are busy parks
// on a Notify instead of spinning.
//
// Rust concepts:
// - Drop: the ticket settles itself even if the worker panics
// - tokio::sync::Notify: async wake-ups without holding a lock across .await
// =============================================================================

use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard, PoisonError};

use tokio::sync::Notify;
use tokio_util::sync::CancellationToken;

#[derive(Debug, Default)]
struct FrontierState {
    queue: VecDeque<String>,
    in_flight: usize,
}

#[derive(Debug)]
pub(crate) struct Frontier {
    state: Mutex<FrontierState>,
    wake: Notify,
    cancel: CancellationToken,
}

impl Frontier {
    pub(crate) fn new(seed: Vec<String>, cancel: CancellationToken) -> Self {
        Self {
            state: Mutex::new(FrontierState {
                queue: seed.into(),
                in_flight: 0,
            }),
            wake: Notify::new(),
            cancel,
        }
    }

    // Critical sections never panic, so a poisoned lock still holds
    // consistent state
    fn lock(&self) -> MutexGuard<'_, FrontierState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Waits for the next candidate.
    ///
    /// Returns `None` once the frontier is drained and nothing is in flight,
    /// or as soon as the crawl is cancelled.
    pub(crate) async fn next(&self) -> Option<Ticket<'_>> {
        loop {
            // Register interest before looking, so a push that lands between
            // the check and the await still wakes us
            let notified = self.wake.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();

            if self.cancel.is_cancelled() {
                return None;
            }

            {
                let mut state = self.lock();
                if let Some(url) = state.queue.pop_front() {
                    state.in_flight += 1;
                    return Some(Ticket {
                        frontier: self,
                        url,
                        discovered: Vec::new(),
                    });
                }
                if state.in_flight == 0 {
                    return None;
                }
            }

            tokio::select! {
                _ = &mut notified => {}
                _ = self.cancel.cancelled() => return None,
            }
        }
    }

    fn settle(&self, discovered: Vec<String>) {
        {
            let mut state = self.lock();
            state.queue.extend(discovered);
            state.in_flight -= 1;
        }

        // Parked workers either have new links to take or, if this was the
        // last ticket, can see that the crawl is done
        self.wake.notify_waiters();
    }

    #[cfg(test)]
    fn snapshot(&self) -> (usize, usize) {
        let state = self.lock();
        (state.queue.len(), state.in_flight)
    }
}

/// A candidate checked out of the frontier. Counts as in-flight work until
/// dropped.
#[derive(Debug)]
pub(crate) struct Ticket<'a> {
    frontier: &'a Frontier,
    url: String,
    discovered: Vec<String>,
}

impl Ticket<'_> {
    pub(crate) fn url(&self) -> &str {
        &self.url
    }

    /// Queues `links` and releases the ticket.
    pub(crate) fn complete(mut self, links: Vec<String>) {
        self.discovered = links;
    }
}

impl Drop for Ticket<'_> {
    fn drop(&mut self) {
        let discovered = std::mem::take(&mut self.discovered);
        self.frontier.settle(discovered);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    fn frontier(seed: &[&str]) -> Frontier {
        Frontier::new(
            seed.iter().map(|url| url.to_string()).collect(),
            CancellationToken::new(),
        )
    }

    #[tokio::test]
    async fn test_empty_frontier_finishes_immediately() {
        let frontier = frontier(&[]);
        assert!(frontier.next().await.is_none());
    }

    #[tokio::test]
    async fn test_drains_in_order() {
        let frontier = frontier(&["a", "b"]);
        let first = frontier.next().await.unwrap();
        assert_eq!(first.url(), "a");
        drop(first);
        let second = frontier.next().await.unwrap();
        assert_eq!(second.url(), "b");
        drop(second);
        assert!(frontier.next().await.is_none());
    }

    #[tokio::test]
    async fn test_completed_links_are_queued() {
        let frontier = frontier(&["a"]);
        let ticket = frontier.next().await.unwrap();
        ticket.complete(vec!["b".to_string(), "c".to_string()]);
        assert_eq!(frontier.snapshot(), (2, 0));
    }

    #[tokio::test]
    async fn test_waits_for_in_flight_work() {
        let frontier = Arc::new(frontier(&["a"]));
        let ticket = frontier.next().await.unwrap();

        // The queue is empty but "a" may still produce links
        let waiter = {
            let frontier = Arc::clone(&frontier);
            tokio::spawn(async move { frontier.next().await.map(|t| t.url().to_string()) })
        };
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!waiter.is_finished());

        ticket.complete(vec!["b".to_string()]);
        assert_eq!(waiter.await.unwrap().as_deref(), Some("b"));
        assert_eq!(frontier.snapshot(), (0, 0));
    }

    #[tokio::test]
    async fn test_waiters_exit_when_last_ticket_drops() {
        let frontier = Arc::new(frontier(&["a"]));
        let ticket = frontier.next().await.unwrap();

        let waiters: Vec<_> = (0..4)
            .map(|_| {
                let frontier = Arc::clone(&frontier);
                tokio::spawn(async move { frontier.next().await.is_none() })
            })
            .collect();
        tokio::time::sleep(Duration::from_millis(20)).await;

        drop(ticket);
        for waiter in waiters {
            assert!(waiter.await.unwrap());
        }
    }

    #[tokio::test]
    async fn test_cancel_stops_handing_out_work() {
        let cancel = CancellationToken::new();
        let frontier = Frontier::new(vec!["a".to_string()], cancel.clone());
        cancel.cancel();
        assert!(frontier.next().await.is_none());
    }

    #[tokio::test]
    async fn test_cancel_wakes_waiters() {
        let cancel = CancellationToken::new();
        let frontier = Arc::new(Frontier::new(vec!["a".to_string()], cancel.clone()));
        let _ticket = frontier.next().await.unwrap();

        let waiter = {
            let frontier = Arc::clone(&frontier);
            tokio::spawn(async move { frontier.next().await.is_none() })
        };
        tokio::time::sleep(Duration::from_millis(20)).await;

        cancel.cancel();
        assert!(waiter.await.unwrap());
    }
}
