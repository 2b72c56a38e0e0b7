use std::time::Duration;

use tokio::{sync::mpsc, task::JoinHandle};

use crate::service::DaemonEvent;

// Posts SettleFired back into the daemon mailbox. The event loop owns it, so
// arm and cancel never race with the handler. A fire can already be queued
// when its timer is cancelled; the generation stamp lets dispatch drop those.
#[derive(Debug, Default)]
pub struct SettleTimer {
    task: Option<JoinHandle<()>>,
    generation: u64,
}

impl SettleTimer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn arm(&mut self, delay: Duration, events: mpsc::Sender<DaemonEvent>) {
        self.cancel();
        self.generation += 1;
        let generation = self.generation;
        self.task = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = events.send(DaemonEvent::SettleFired(generation)).await;
        }));
    }

    pub fn cancel(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }

    pub fn is_pending(&self) -> bool {
        self.task.as_ref().map(|task| !task.is_finished()).unwrap_or(false)
    }

    // Stamp of the most recently armed timer; fires carrying an older stamp
    // are stale.
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn fires_after_delay() {
        let (tx, mut rx) = mpsc::channel(4);
        let mut timer = SettleTimer::new();
        timer.arm(Duration::from_millis(5), tx);
        assert!(timer.is_pending());

        let event = rx.recv().await;
        assert!(matches!(
            event,
            Some(DaemonEvent::SettleFired(generation)) if generation == timer.generation()
        ));

        // Reap the finished task the same way the event loop does.
        timer.cancel();
        assert!(!timer.is_pending());
        assert!(rx.recv().await.is_none());
    }

    #[tokio::test]
    async fn cancel_prevents_fire() {
        let (tx, mut rx) = mpsc::channel(4);
        let mut timer = SettleTimer::new();
        timer.arm(Duration::from_millis(10), tx);
        timer.cancel();
        assert!(!timer.is_pending());

        // The aborted task dropped its sender, so the channel closes.
        assert!(rx.recv().await.is_none());
    }

    #[tokio::test]
    async fn cancel_without_pending_timer_is_safe() {
        let (tx, mut rx) = mpsc::channel(4);
        let mut timer = SettleTimer::new();

        // Never armed: nothing to disarm.
        timer.cancel();
        assert!(!timer.is_pending());

        timer.arm(Duration::from_millis(10), tx);
        timer.cancel();
        timer.cancel();
        assert!(!timer.is_pending());
        assert!(rx.recv().await.is_none());
    }

    #[tokio::test]
    async fn rearm_replaces_previous_timer() {
        let (tx, mut rx) = mpsc::channel(4);
        let mut timer = SettleTimer::new();
        timer.arm(Duration::from_secs(60), tx.clone());
        timer.arm(Duration::from_millis(5), tx);

        // Only the second arm's stamp may come out of the mailbox.
        let event = rx.recv().await;
        assert!(matches!(event, Some(DaemonEvent::SettleFired(2))));
        assert!(rx.recv().await.is_none());
    }
}
