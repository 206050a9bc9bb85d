//! A gate that holds calls in flight until released.

use std::sync::atomic::{AtomicUsize, Ordering};

use tokio::sync::watch;

/// Holds every [`pass`](Self::pass) while paused.
///
/// Nullables put one in front of their side effect so a test can start a
/// call, act while it is outstanding (log out, time out), then let it finish.
pub struct PauseGate {
    paused: watch::Sender<bool>,
    in_flight: AtomicUsize,
}

/// Decrements the in-flight count even when the waiting future is dropped.
struct InFlight<'a>(&'a AtomicUsize);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

impl PauseGate {
    pub fn new() -> Self {
        let (paused, _) = watch::channel(false);
        Self {
            paused,
            in_flight: AtomicUsize::new(0),
        }
    }

    pub fn pause(&self) {
        self.paused.send_replace(true);
    }

    pub fn resume(&self) {
        self.paused.send_replace(false);
    }

    /// Calls currently held at the gate.
    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::SeqCst)
    }

    /// Wait until the gate is open.
    pub async fn pass(&self) {
        self.in_flight.fetch_add(1, Ordering::SeqCst);
        let _held = InFlight(&self.in_flight);
        let mut rx = self.paused.subscribe();
        // The sender lives as long as `self`, so this cannot fail.
        let _ = rx.wait_for(|paused| !*paused).await;
    }

    /// Resolves once `n` calls are held at the gate.
    pub async fn wait_for_in_flight(&self, n: usize) {
        while self.in_flight() < n {
            tokio::task::yield_now().await;
        }
    }
}

impl Default for PauseGate {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    #[tokio::test]
    async fn open_gate_passes_immediately() {
        let gate = PauseGate::new();
        gate.pass().await;
        assert_eq!(gate.in_flight(), 0);
    }

    #[tokio::test]
    async fn paused_gate_holds_until_resumed() {
        let gate = Arc::new(PauseGate::new());
        gate.pause();
        let task = {
            let gate = Arc::clone(&gate);
            tokio::spawn(async move { gate.pass().await })
        };
        gate.wait_for_in_flight(1).await;
        gate.resume();
        task.await.unwrap();
        assert_eq!(gate.in_flight(), 0);
    }

    #[tokio::test]
    async fn dropped_waiter_leaves_the_count() {
        let gate = PauseGate::new();
        gate.pause();
        let timed_out = tokio::time::timeout(Duration::from_millis(10), gate.pass()).await;
        assert!(timed_out.is_err());
        assert_eq!(gate.in_flight(), 0);
    }
}
