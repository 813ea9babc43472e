// ── Bounded polling ──
//
// Time-boxed retry for eventually-consistent operations (provider
// registration). Elapsed time is the sum of intervals slept, not wall-clock,
// so a test `Sleeper` makes the loop fully deterministic.

use std::future::Future;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::error::CoreError;

/// Polling budget and cadence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    /// Give up once this much time has been spent waiting.
    pub max_duration: Duration,
    /// Wait between attempts; also the minimum spacing between calls.
    pub interval: Duration,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            max_duration: Duration::from_secs(120),
            interval: Duration::from_secs(10),
        }
    }
}

impl PollPolicy {
    pub fn new(max_duration: Duration, interval: Duration) -> Result<Self, CoreError> {
        if interval.is_zero() {
            return Err(CoreError::validation(
                "sleep_duration",
                "sleep duration must be greater than zero",
            ));
        }
        Ok(Self {
            max_duration,
            interval,
        })
    }

    pub fn from_secs(max_secs: u64, interval_secs: u64) -> Result<Self, CoreError> {
        Self::new(
            Duration::from_secs(max_secs),
            Duration::from_secs(interval_secs),
        )
    }
}

/// Source of delays between attempts.
pub trait Sleeper: Send + Sync {
    fn sleep(&self, duration: Duration) -> impl Future<Output = ()> + Send;
}

/// Real delays on the tokio timer.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Result of one attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollStep<T> {
    /// Done; stop polling.
    Ready(T),
    /// Not there yet; `state` is what the service last reported.
    Pending { state: Option<String> },
}

/// Why polling stopped without a `Ready` value.
#[derive(Debug, PartialEq, Eq)]
pub enum PollError<E> {
    TimedOut {
        waited: Duration,
        last_state: Option<String>,
    },
    /// An attempt failed outright; never retried.
    Failed(E),
    Cancelled,
}

/// Call `attempt` until it is ready, fails, the budget is spent, or `cancel` fires.
///
/// The budget is checked before each attempt, so with a 25s budget and a
/// 10s interval a never-ready operation is attempted at 0s, 10s and 20s.
pub async fn poll_until<T, E, F, Fut, S>(
    policy: PollPolicy,
    sleeper: &S,
    cancel: &CancellationToken,
    mut attempt: F,
) -> Result<T, PollError<E>>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<PollStep<T>, E>>,
    S: Sleeper,
{
    let mut elapsed = Duration::ZERO;
    let mut last_state = None;

    loop {
        if elapsed > policy.max_duration {
            return Err(PollError::TimedOut {
                waited: elapsed,
                last_state,
            });
        }
        if cancel.is_cancelled() {
            return Err(PollError::Cancelled);
        }

        match attempt().await.map_err(PollError::Failed)? {
            PollStep::Ready(value) => return Ok(value),
            PollStep::Pending { state } => {
                debug!(?state, elapsed_secs = elapsed.as_secs(), "not ready; waiting");
                last_state = state;
            }
        }

        elapsed += policy.interval;
        tokio::select! {
            biased;
            () = cancel.cancelled() => return Err(PollError::Cancelled),
            () = sleeper.sleep(policy.interval) => {}
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::Mutex;

    use super::*;

    /// Records requested delays and returns immediately.
    #[derive(Default)]
    struct RecordingSleeper {
        slept: Mutex<Vec<Duration>>,
    }

    impl Sleeper for RecordingSleeper {
        async fn sleep(&self, duration: Duration) {
            self.slept.lock().unwrap().push(duration);
        }
    }

    fn scripted(steps: &[&str]) -> Mutex<VecDeque<String>> {
        Mutex::new(steps.iter().map(|s| (*s).to_owned()).collect())
    }

    async fn attempt(script: &Mutex<VecDeque<String>>) -> Result<PollStep<String>, String> {
        let next = script.lock().unwrap().pop_front();
        match next.as_deref() {
            Some("Registered") => Ok(PollStep::Ready("Registered".into())),
            Some("boom") => Err("boom".into()),
            state => Ok(PollStep::Pending {
                state: state.map(str::to_owned),
            }),
        }
    }

    #[tokio::test]
    async fn becomes_ready_after_two_waits() {
        let sleeper = RecordingSleeper::default();
        let script = scripted(&["Registering", "Registering", "Registered"]);
        let policy = PollPolicy::from_secs(25, 10).unwrap();

        let result = poll_until(policy, &sleeper, &CancellationToken::new(), || attempt(&script)).await;

        assert_eq!(result, Ok("Registered".to_owned()));
        assert!(script.lock().unwrap().is_empty());
        assert_eq!(
            *sleeper.slept.lock().unwrap(),
            vec![Duration::from_secs(10), Duration::from_secs(10)]
        );
    }

    #[tokio::test]
    async fn times_out_once_elapsed_exceeds_budget() {
        let sleeper = RecordingSleeper::default();
        let script = scripted(&["Registering"; 10]);
        let policy = PollPolicy::from_secs(25, 10).unwrap();

        let result = poll_until(policy, &sleeper, &CancellationToken::new(), || attempt(&script)).await;

        assert_eq!(
            result,
            Err(PollError::TimedOut {
                waited: Duration::from_secs(30),
                last_state: Some("Registering".into()),
            })
        );
        assert_eq!(script.lock().unwrap().len(), 7, "three attempts made");
    }

    #[tokio::test]
    async fn failure_is_not_retried() {
        let sleeper = RecordingSleeper::default();
        let script = scripted(&["Registering", "boom", "Registered"]);

        let result = poll_until(
            PollPolicy::default(),
            &sleeper,
            &CancellationToken::new(),
            || attempt(&script),
        )
        .await;

        assert_eq!(result, Err(PollError::Failed("boom".to_owned())));
        assert_eq!(sleeper.slept.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn cancelled_before_first_attempt() {
        let cancel = CancellationToken::new();
        cancel.cancel();
        let script = scripted(&["Registered"]);

        let result = poll_until(PollPolicy::default(), &TokioSleeper, &cancel, || attempt(&script)).await;

        assert_eq!(result, Err(PollError::Cancelled));
        assert_eq!(script.lock().unwrap().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn cancellation_interrupts_a_real_sleep() {
        let cancel = CancellationToken::new();
        let script = scripted(&["Registering"; 5]);
        let trigger = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_secs(3)).await;
            trigger.cancel();
        });

        let started = tokio::time::Instant::now();
        let result = poll_until(PollPolicy::default(), &TokioSleeper, &cancel, || attempt(&script)).await;

        assert_eq!(result, Err(PollError::Cancelled));
        assert!(started.elapsed() < Duration::from_secs(10));
    }

    #[test]
    fn zero_interval_is_rejected() {
        assert!(matches!(
            PollPolicy::from_secs(120, 0),
            Err(CoreError::Validation { .. })
        ));
    }
}
