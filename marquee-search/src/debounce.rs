//! Trailing-edge debouncer running as an actor task.
//!
//! Values pushed through a [`DebounceHandle`] are coalesced: a value is only
//! forwarded once no newer value has arrived for the configured delay. Each
//! new value restarts the wait and replaces the pending one.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::{Instant, sleep_until};
use tracing::{debug, trace};

/// Returned when pushing into a debouncer whose actor has stopped.
#[derive(Debug, thiserror::Error)]
#[error("Debouncer has shut down")]
pub struct DebouncerClosed;

/// Handle for feeding raw values into a debouncer actor.
///
/// Cloneable; the actor stops once every handle is dropped.
#[derive(Debug)]
pub struct DebounceHandle<T> {
    sender: mpsc::Sender<T>,
}

impl<T> Clone for DebounceHandle<T> {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
        }
    }
}

impl<T: Send + 'static> DebounceHandle<T> {
    /// Pushes a raw value, superseding any value still waiting to settle.
    ///
    /// # Errors
    /// - `DebouncerClosed` - The actor task is no longer running
    pub async fn push(&self, value: T) -> Result<(), DebouncerClosed> {
        self.sender.send(value).await.map_err(|_| DebouncerClosed)
    }
}

/// Spawns a debouncer actor and returns its input handle and settled output.
///
/// When all handles are dropped, a value still waiting is forwarded at once
/// (it can no longer change) and the output channel then closes.
pub fn spawn_debouncer<T: Send + 'static>(
    delay: Duration,
) -> (DebounceHandle<T>, mpsc::Receiver<T>) {
    let (input_sender, input_receiver) = mpsc::channel(64);
    let (output_sender, output_receiver) = mpsc::channel(16);

    tokio::spawn(async move {
        run_debounce_loop(delay, input_receiver, output_sender).await;
    });

    (
        DebounceHandle {
            sender: input_sender,
        },
        output_receiver,
    )
}

async fn run_debounce_loop<T: Send>(
    delay: Duration,
    mut input: mpsc::Receiver<T>,
    output: mpsc::Sender<T>,
) {
    debug!(delay_ms = delay.as_millis() as u64, "Debouncer started");

    let mut pending: Option<T> = None;
    let deadline = sleep_until(Instant::now());
    tokio::pin!(deadline);

    loop {
        tokio::select! {
            received = input.recv() => match received {
                Some(value) => {
                    trace!("Debouncer input replaced pending value");
                    pending = Some(value);
                    deadline.as_mut().reset(Instant::now() + delay);
                }
                None => {
                    if let Some(value) = pending.take() {
                        let _ = output.send(value).await;
                    }
                    break;
                }
            },
            () = &mut deadline, if pending.is_some() => {
                if let Some(value) = pending.take()
                    && output.send(value).await.is_err()
                {
                    break;
                }
            }
        }
    }

    debug!("Debouncer stopped");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_rapid_changes_settle_once() {
        let (handle, mut settled) = spawn_debouncer(Duration::from_millis(500));

        for value in ["b", "ba", "bat", "batm", "batman"] {
            handle.push(value.to_string()).await.unwrap();
            tokio::time::sleep(Duration::from_millis(100)).await;
        }
        let last_push = Instant::now() - Duration::from_millis(100);

        assert_eq!(settled.recv().await.as_deref(), Some("batman"));
        assert!(Instant::now() - last_push >= Duration::from_millis(500));

        drop(handle);
        assert_eq!(settled.recv().await, None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_separated_changes_settle_separately() {
        let (handle, mut settled) = spawn_debouncer(Duration::from_millis(500));

        handle.push("heat").await.unwrap();
        tokio::time::sleep(Duration::from_millis(600)).await;
        handle.push("").await.unwrap();

        assert_eq!(settled.recv().await, Some("heat"));
        assert_eq!(settled.recv().await, Some(""));
    }

    #[tokio::test(start_paused = true)]
    async fn test_nothing_settles_before_delay() {
        let (handle, mut settled) = spawn_debouncer(Duration::from_millis(500));

        handle.push(1u32).await.unwrap();
        tokio::time::sleep(Duration::from_millis(499)).await;
        assert!(settled.try_recv().is_err());

        tokio::time::sleep(Duration::from_millis(2)).await;
        assert_eq!(settled.recv().await, Some(1));
    }

    #[tokio::test(start_paused = true)]
    async fn test_close_flushes_pending_value() {
        let (handle, mut settled) = spawn_debouncer(Duration::from_secs(60));

        handle.push("matrix").await.unwrap();
        drop(handle);

        assert_eq!(settled.recv().await, Some("matrix"));
        assert_eq!(settled.recv().await, None);
    }

    #[tokio::test]
    async fn test_push_after_shutdown_fails() {
        let (handle, settled) = spawn_debouncer::<u8>(Duration::from_millis(10));
        drop(settled);

        handle.push(1).await.unwrap();
        // The actor exits once the settled value cannot be delivered.
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(handle.push(2).await.is_err());
    }
}
