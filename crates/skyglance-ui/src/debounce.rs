//! Cancellable delayed tasks where only the latest scheduling counts.

use std::time::Duration;

use tokio::sync::mpsc::UnboundedSender;
use tokio_util::sync::CancellationToken;

/// Schedules a message to be sent after `delay`.
///
/// Scheduling again cancels the previous task. Each scheduling gets a
/// ticket; [`Debouncer::accept`] honours only the latest one, which covers
/// the window where a cancelled task had already sent its message.
#[derive(Debug)]
pub struct Debouncer {
    delay: Duration,
    ticket: u64,
    pending: Option<CancellationToken>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            ticket: 0,
            pending: None,
        }
    }

    /// Restart the timer. `make` builds the message from the new ticket.
    ///
    /// Must be called from within a tokio runtime.
    pub fn schedule<M, F>(&mut self, tx: &UnboundedSender<M>, make: F) -> u64
    where
        M: Send + 'static,
        F: FnOnce(u64) -> M + Send + 'static,
    {
        self.cancel();
        self.ticket += 1;

        let token = CancellationToken::new();
        self.pending = Some(token.clone());

        let tx = tx.clone();
        let delay = self.delay;
        let ticket = self.ticket;
        tokio::spawn(async move {
            tokio::select! {
                _ = token.cancelled() => {}
                _ = tokio::time::sleep(delay) => {
                    let _ = tx.send(make(ticket));
                }
            }
        });

        ticket
    }

    /// Cancel any pending elapse.
    pub fn cancel(&mut self) {
        if let Some(token) = self.pending.take() {
            token.cancel();
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// True when `ticket` is the latest, still-pending scheduling. Consumes it.
    pub fn accept(&mut self, ticket: u64) -> bool {
        if self.pending.is_some() && ticket == self.ticket {
            self.pending = None;
            true
        } else {
            false
        }
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    #[tokio::test(start_paused = true)]
    async fn only_last_schedule_fires() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut debouncer = Debouncer::new(Duration::from_millis(250));

        debouncer.schedule(&tx, |t| t);
        tokio::time::sleep(Duration::from_millis(100)).await;
        debouncer.schedule(&tx, |t| t);
        tokio::time::sleep(Duration::from_millis(100)).await;
        let last = debouncer.schedule(&tx, |t| t);

        let fired = rx.recv().await.unwrap();
        assert_eq!(fired, last);
        assert!(debouncer.accept(fired));
        assert!(!debouncer.is_pending());

        tokio::time::sleep(Duration::from_secs(1)).await;
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_suppresses_elapse() {
        let (tx, mut rx) = mpsc::unbounded_channel::<u64>();
        let mut debouncer = Debouncer::new(Duration::from_millis(120));

        debouncer.schedule(&tx, |t| t);
        debouncer.cancel();

        tokio::time::sleep(Duration::from_secs(1)).await;
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn superseded_ticket_is_rejected() {
        let (tx, _rx) = mpsc::unbounded_channel::<u64>();
        let mut debouncer = Debouncer::new(Duration::from_millis(250));

        let first = debouncer.schedule(&tx, |t| t);
        let second = debouncer.schedule(&tx, |t| t);

        assert!(!debouncer.accept(first));
        assert!(debouncer.accept(second));
        assert!(!debouncer.accept(second));
    }
}
