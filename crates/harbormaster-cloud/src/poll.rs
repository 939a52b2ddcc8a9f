//! Polling driver for asynchronous provider operations
//!
//! A poll waits one interval, probes the provider, and repeats until the probe
//! reports the target condition or the attempt budget runs out. Waiting goes
//! through [`Sleeper`] so callers can substitute virtual time.

use crate::error::Result;
use crate::observer::{Event, Observer};
use async_trait::async_trait;
use std::future::Future;
use std::time::Duration;

/// Suspends the current task between polls
#[async_trait]
pub trait Sleeper: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

/// Real wall-clock waiting
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Interval and attempt budget for one wait
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    pub interval: Duration,
    /// `None` waits until the condition holds
    pub max_attempts: Option<u32>,
}

impl PollPolicy {
    pub fn bounded(interval: Duration, max_attempts: u32) -> Self {
        Self {
            interval,
            max_attempts: Some(max_attempts),
        }
    }

    pub fn unbounded(interval: Duration) -> Self {
        Self {
            interval,
            max_attempts: None,
        }
    }
}

/// Progress of a single wait
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollState {
    pub target: String,
    pub attempt: u32,
    pub max_attempts: Option<u32>,
    pub interval: Duration,
}

impl PollState {
    pub fn new(target: impl Into<String>, policy: PollPolicy) -> Self {
        Self {
            target: target.into(),
            attempt: 0,
            max_attempts: policy.max_attempts,
            interval: policy.interval,
        }
    }

    pub fn is_exhausted(&self) -> bool {
        self.max_attempts
            .is_some_and(|max_attempts| self.attempt >= max_attempts)
    }
}

/// How a wait ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollOutcome {
    Reached { attempts: u32 },
    Exhausted { attempts: u32 },
}

impl PollOutcome {
    pub fn is_reached(self) -> bool {
        matches!(self, PollOutcome::Reached { .. })
    }
}

/// Drives one wait to completion
pub struct Poller<'a> {
    sleeper: &'a dyn Sleeper,
    observer: &'a dyn Observer,
}

impl<'a> Poller<'a> {
    pub fn new(sleeper: &'a dyn Sleeper, observer: &'a dyn Observer) -> Self {
        Self { sleeper, observer }
    }

    /// Poll `probe` until it returns `true` or the budget is spent
    ///
    /// Probe errors end the wait immediately and are returned as-is.
    pub async fn until<F, Fut>(
        &self,
        target: &str,
        policy: PollPolicy,
        mut probe: F,
    ) -> Result<PollOutcome>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<bool>>,
    {
        let mut state = PollState::new(target, policy);

        loop {
            if state.is_exhausted() {
                self.observer.on_event(&Event::PollExhausted {
                    target: &state.target,
                    attempts: state.attempt,
                });
                return Ok(PollOutcome::Exhausted {
                    attempts: state.attempt,
                });
            }

            self.sleeper.sleep(state.interval).await;
            state.attempt += 1;

            let reached = probe().await?;
            self.observer.on_event(&Event::Polled {
                target: &state.target,
                attempt: state.attempt,
                max_attempts: state.max_attempts,
                reached,
            });

            if reached {
                return Ok(PollOutcome::Reached {
                    attempts: state.attempt,
                });
            }
        }
    }
}
