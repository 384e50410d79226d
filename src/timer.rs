use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crate::runtime::AppEvent;

/// Handle to a running countdown.
///
/// The worker posts [`AppEvent::Tick`] tagged with `epoch` once per interval
/// until the handle is cancelled or dropped.
#[derive(Debug)]
pub struct CountdownTimer {
    epoch: u64,
    cancel: Option<Sender<()>>,
    worker: Option<JoinHandle<()>>,
}

impl CountdownTimer {
    pub fn arm(interval: Duration, epoch: u64, events: Sender<AppEvent>) -> Self {
        let (cancel_tx, cancel_rx) = mpsc::channel::<()>();

        let worker = thread::spawn(move || loop {
            match cancel_rx.recv_timeout(interval) {
                Err(RecvTimeoutError::Timeout) => {
                    if events.send(AppEvent::Tick { epoch }).is_err() {
                        break;
                    }
                }
                // explicit cancel or handle dropped
                Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
            }
        });

        Self {
            epoch,
            cancel: Some(cancel_tx),
            worker: Some(worker),
        }
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Stop the worker and wait for it to exit; no tick is sent afterwards
    pub fn cancel(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            let _ = cancel.send(());
        }
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
    }
}

impl Drop for CountdownTimer {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    #[test]
    fn test_ticks_carry_epoch() {
        let (tx, rx) = mpsc::channel();
        let timer = CountdownTimer::arm(Duration::from_millis(5), 7, tx);

        let first = rx.recv_timeout(Duration::from_secs(2)).unwrap();
        let second = rx.recv_timeout(Duration::from_secs(2)).unwrap();
        assert_eq!(first, AppEvent::Tick { epoch: 7 });
        assert_eq!(second, AppEvent::Tick { epoch: 7 });
        assert_eq!(timer.epoch(), 7);
    }

    #[test]
    fn test_cancel_stops_ticks() {
        let (tx, rx) = mpsc::channel();
        let timer = CountdownTimer::arm(Duration::from_millis(5), 1, tx);
        rx.recv_timeout(Duration::from_secs(2)).unwrap();

        timer.cancel();
        // drain anything sent before cancellation, then the channel is closed
        while rx.try_recv().is_ok() {}
        assert_eq!(
            rx.recv_timeout(Duration::from_millis(50)),
            Err(RecvTimeoutError::Disconnected)
        );
    }

    #[test]
    fn test_drop_cancels_promptly() {
        let (tx, rx) = mpsc::channel();
        let timer = CountdownTimer::arm(Duration::from_secs(60), 1, tx);

        let started = Instant::now();
        drop(timer);
        assert!(started.elapsed() < Duration::from_secs(5));
        assert_eq!(rx.try_recv(), Err(mpsc::TryRecvError::Disconnected));
    }
}
