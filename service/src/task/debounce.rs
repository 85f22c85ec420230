//! [`Debounce`] definitions.

use std::time::Duration;

use futures::future;
use tokio::time::{self, Instant};

/// Cancellable scheduled task, coalescing bursts of schedulings into a single
/// run after the quiescent `delay`.
///
/// [`Debounce`] holds no payload: when it fires, the caller evaluates its
/// current state rather than a copy captured at scheduling time.
#[derive(Clone, Copy, Debug)]
pub struct Debounce {
    /// Quiescent interval before firing.
    delay: Duration,

    /// [`Instant`] of the pending run, if any.
    deadline: Option<Instant>,
}

impl Debounce {
    /// Creates a new idle [`Debounce`] with the provided `delay`.
    #[must_use]
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            deadline: None,
        }
    }

    /// Returns the quiescent interval of this [`Debounce`].
    #[must_use]
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Schedules a run after the `delay` from now, superseding the pending
    /// one (if any).
    pub fn schedule(&mut self) {
        self.deadline = Some(Instant::now() + self.delay);
    }

    /// Cancels the pending run, returning whether there was one.
    pub fn cancel(&mut self) -> bool {
        self.deadline.take().is_some()
    }

    /// Indicates whether a run is pending.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// Returns [`Instant`] of the pending run, if any.
    #[must_use]
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Consumes the pending run if it's due at the provided [`Instant`].
    pub fn fire(&mut self, now: Instant) -> bool {
        let due = self.deadline.is_some_and(|d| d <= now);
        if due {
            self.deadline = None;
        }
        due
    }

    /// Resolves once the pending run is due, or never if there is none.
    ///
    /// Doesn't consume the run, so [`Debounce::fire()`] is still to be
    /// called.
    pub async fn elapsed(&self) {
        until(self.deadline).await;
    }
}

/// Resolves at the provided `deadline`, or never if there is none.
///
/// Unlike [`Debounce::elapsed()`], doesn't borrow the [`Debounce`], so the
/// owner remains mutable while waiting.
pub async fn until(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => time::sleep_until(deadline).await,
        None => future::pending().await,
    }
}

#[cfg(test)]
mod spec {
    use std::time::Duration;

    use tokio::time::{self, Instant};

    use super::{until, Debounce};

    const DELAY: Duration = Duration::from_millis(300);

    #[tokio::test(start_paused = true)]
    async fn fires_after_quiescence() {
        let mut d = Debounce::new(DELAY);
        d.schedule();

        time::advance(Duration::from_millis(299)).await;
        assert!(!d.fire(Instant::now()));

        time::advance(Duration::from_millis(1)).await;
        assert!(d.fire(Instant::now()));
        assert!(!d.is_pending());
        assert!(!d.fire(Instant::now()));
    }

    #[tokio::test(start_paused = true)]
    async fn coalesces_bursts() {
        let mut d = Debounce::new(DELAY);
        for _ in 0..5 {
            d.schedule();
            time::advance(Duration::from_millis(200)).await;
            assert!(!d.fire(Instant::now()));
        }

        time::advance(Duration::from_millis(100)).await;
        assert!(d.fire(Instant::now()));
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_supersedes_pending_run() {
        let mut d = Debounce::new(DELAY);
        d.schedule();

        assert!(d.cancel());
        assert!(!d.cancel());

        time::advance(DELAY).await;
        assert!(!d.fire(Instant::now()));
        assert_eq!(d.deadline(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn elapsed_waits_for_deadline() {
        let mut d = Debounce::new(DELAY);
        d.schedule();
        let started = Instant::now();

        d.elapsed().await;

        assert_eq!(started.elapsed(), DELAY);
        assert!(d.fire(Instant::now()));
    }

    #[tokio::test(start_paused = true)]
    async fn idle_never_elapses() {
        let d = Debounce::new(DELAY);

        let res = time::timeout(Duration::from_secs(60), d.elapsed()).await;

        assert!(res.is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn until_copied_deadline() {
        let mut d = Debounce::new(DELAY);
        d.schedule();
        let deadline = d.deadline();

        until(deadline).await;

        assert!(d.fire(Instant::now()));
    }
}
