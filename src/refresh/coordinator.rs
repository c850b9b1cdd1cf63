use std::collections::VecDeque;
use std::future::Future;
use std::sync::{Mutex, MutexGuard, PoisonError};

use thiserror::Error;
use tokio::sync::oneshot;
use tracing::{debug, info, warn};

use crate::observability::metrics::get_metrics;
use crate::session::token::AccessToken;

/// Why a refresh produced no token. Cloned to every waiter of the same refresh.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RefreshError {
    #[error("refresh rejected by backend with status {status}")]
    Rejected { status: u16 },
    #[error("refresh request failed: {0}")]
    Transport(String),
    #[error("refresh response carried no access token")]
    MissingToken,
    #[error("refresh abandoned before completion")]
    Abandoned,
}

pub type RefreshOutcome = Result<AccessToken, RefreshError>;

type Waiter = oneshot::Sender<RefreshOutcome>;

enum State {
    Idle,
    Refreshing { waiters: VecDeque<Waiter> },
}

/// Result of the single decision point: either start the refresh or wait for it.
enum Ticket<'a> {
    Leader(LeaderGuard<'a>),
    Waiter(oneshot::Receiver<RefreshOutcome>),
}

/// Guarantees at most one refresh in flight.
///
/// `Idle -> Refreshing` happens under the lock in [`RefreshCoordinator::join`];
/// anyone arriving while `Refreshing` is queued FIFO and resumed with the
/// leader's outcome when it completes. The lock is never held across an await.
pub struct RefreshCoordinator {
    state: Mutex<State>,
}

impl Default for RefreshCoordinator {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for RefreshCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RefreshCoordinator")
            .field("refreshing", &self.is_refreshing())
            .field("waiting", &self.waiting())
            .finish()
    }
}

impl RefreshCoordinator {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(State::Idle),
        }
    }

    pub fn is_refreshing(&self) -> bool {
        matches!(*self.lock(), State::Refreshing { .. })
    }

    /// Number of callers currently queued behind the in-flight refresh.
    pub fn waiting(&self) -> usize {
        match &*self.lock() {
            State::Idle => 0,
            State::Refreshing { waiters } => waiters.len(),
        }
    }

    /// Runs `refresh` if no refresh is in flight, otherwise waits for the one that is.
    ///
    /// Every caller that joined the same refresh gets the same outcome.
    pub async fn run<F, Fut>(&self, refresh: F) -> RefreshOutcome
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = RefreshOutcome>,
    {
        match self.join() {
            Ticket::Leader(guard) => {
                info!("token refresh started");
                let outcome = refresh().await;
                guard.complete(outcome.clone());
                outcome
            }
            Ticket::Waiter(receiver) => {
                debug!("joined in-flight token refresh");
                get_metrics().await.refresh_waiters.inc();
                receiver.await.unwrap_or(Err(RefreshError::Abandoned))
            }
        }
    }

    fn join(&self) -> Ticket<'_> {
        let mut state = self.lock();
        if let State::Refreshing { waiters } = &mut *state {
            let (sender, receiver) = oneshot::channel();
            waiters.push_back(sender);
            return Ticket::Waiter(receiver);
        }
        *state = State::Refreshing {
            waiters: VecDeque::new(),
        };
        Ticket::Leader(LeaderGuard {
            coordinator: self,
            completed: false,
        })
    }

    fn finish(&self, outcome: RefreshOutcome) {
        let waiters = match std::mem::replace(&mut *self.lock(), State::Idle) {
            State::Idle => VecDeque::new(),
            State::Refreshing { waiters } => waiters,
        };
        debug!(waiters = waiters.len(), success = outcome.is_ok(), "token refresh finished");
        for waiter in waiters {
            // receiver gone means that caller stopped caring
            let _ = waiter.send(outcome.clone());
        }
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Held by the caller that performs the refresh. Dropping it without
/// completing (the leader's future was cancelled) fails all waiters.
struct LeaderGuard<'a> {
    coordinator: &'a RefreshCoordinator,
    completed: bool,
}

impl LeaderGuard<'_> {
    fn complete(mut self, outcome: RefreshOutcome) {
        self.completed = true;
        self.coordinator.finish(outcome);
    }
}

impl Drop for LeaderGuard<'_> {
    fn drop(&mut self) {
        if !self.completed {
            warn!("token refresh leader dropped before completion");
            self.coordinator.finish(Err(RefreshError::Abandoned));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::sync::Notify;

    #[tokio::test]
    async fn concurrent_callers_share_one_refresh() {
        let coordinator = Arc::new(RefreshCoordinator::new());
        let calls = Arc::new(AtomicUsize::new(0));

        let mut handles = Vec::new();
        for _ in 0..8 {
            let coordinator = coordinator.clone();
            let calls = calls.clone();
            handles.push(tokio::spawn(async move {
                coordinator
                    .run(|| async {
                        calls.fetch_add(1, Ordering::SeqCst);
                        tokio::time::sleep(Duration::from_millis(100)).await;
                        Ok(AccessToken::new("fresh"))
                    })
                    .await
            }));
        }

        for handle in handles {
            assert_eq!(handle.await.unwrap(), Ok(AccessToken::new("fresh")));
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1, "exactly one refresh expected");
        assert!(!coordinator.is_refreshing());
    }

    #[tokio::test]
    async fn queued_waiters_receive_the_leader_outcome() {
        let coordinator = Arc::new(RefreshCoordinator::new());
        let release = Arc::new(Notify::new());

        let leader = {
            let coordinator = coordinator.clone();
            let release = release.clone();
            tokio::spawn(async move {
                coordinator
                    .run(|| async move {
                        release.notified().await;
                        Ok(AccessToken::new("t"))
                    })
                    .await
            })
        };
        while !coordinator.is_refreshing() {
            tokio::task::yield_now().await;
        }

        let mut receivers = Vec::new();
        for _ in 0..3 {
            match coordinator.join() {
                Ticket::Waiter(receiver) => receivers.push(receiver),
                Ticket::Leader(_) => panic!("refresh already in flight"),
            }
        }
        assert_eq!(coordinator.waiting(), 3);

        release.notify_one();
        assert_eq!(leader.await.unwrap(), Ok(AccessToken::new("t")));
        for receiver in receivers {
            assert_eq!(receiver.await.unwrap(), Ok(AccessToken::new("t")));
        }
        assert_eq!(coordinator.waiting(), 0);
        assert!(!coordinator.is_refreshing());
    }

    #[tokio::test]
    async fn failure_is_broadcast_and_state_returns_to_idle() {
        let coordinator = Arc::new(RefreshCoordinator::new());

        let (first, second) = tokio::join!(
            coordinator.run(|| async {
                tokio::time::sleep(Duration::from_millis(50)).await;
                Err(RefreshError::Rejected { status: 401 })
            }),
            coordinator.run(|| async { Ok(AccessToken::new("never")) }),
        );

        assert_eq!(first, Err(RefreshError::Rejected { status: 401 }));
        assert_eq!(second, Err(RefreshError::Rejected { status: 401 }));
        assert!(!coordinator.is_refreshing());

        let next = coordinator.run(|| async { Ok(AccessToken::new("next")) }).await;
        assert_eq!(next, Ok(AccessToken::new("next")));
    }

    #[tokio::test]
    async fn dropped_leader_releases_waiters() {
        let coordinator = Arc::new(RefreshCoordinator::new());

        let leader = {
            let coordinator = coordinator.clone();
            tokio::spawn(async move {
                coordinator
                    .run(|| std::future::pending::<RefreshOutcome>())
                    .await
            })
        };
        while !coordinator.is_refreshing() {
            tokio::task::yield_now().await;
        }

        let waiter = {
            let coordinator = coordinator.clone();
            tokio::spawn(async move { coordinator.run(|| async { Ok(AccessToken::new("x")) }).await })
        };
        while coordinator.waiting() == 0 {
            tokio::task::yield_now().await;
        }

        leader.abort();
        assert_eq!(waiter.await.unwrap(), Err(RefreshError::Abandoned));
        assert!(!coordinator.is_refreshing());
    }
}
