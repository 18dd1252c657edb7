use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::classifier::Lookup;
use crate::error::SupportError;
use crate::identifier::Identifier;
use crate::status::{LookupKind, Status};

pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// How to pause between two attempts.
pub trait RetryWait: Send + Sync {
    fn wait(&self, attempt: u32);
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NoWait;

impl RetryWait for NoWait {
    fn wait(&self, _attempt: u32) {}
}

/// Blocks the calling thread for a fixed delay.
///
/// Async callers should run turns on a blocking pool
/// (`tokio::task::spawn_blocking` or `actix_web::web::block`).
#[derive(Debug, Clone, Copy)]
pub struct SleepWait {
    delay: Duration,
}

impl SleepWait {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    pub fn from_millis(millis: u64) -> Self {
        Self::new(Duration::from_millis(millis))
    }
}

impl RetryWait for SleepWait {
    fn wait(&self, _attempt: u32) {
        if !self.delay.is_zero() {
            std::thread::sleep(self.delay);
        }
    }
}

/// Result of a single attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptResult {
    Success(Status),
    TransientFailure,
}

/// Result of the whole bounded retry loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryOutcome {
    Success { status: Status, attempts: u32 },
    ExhaustedRetries { attempts: u32 },
}

impl RetryOutcome {
    pub fn attempts(&self) -> u32 {
        match self {
            Self::Success { attempts, .. } | Self::ExhaustedRetries { attempts } => *attempts,
        }
    }
}

/// Final `(status, attempts)` pair for one identifier lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resolution {
    pub kind: LookupKind,
    pub status: Status,
    pub attempts: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: u32,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ATTEMPTS)
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: u32) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
        }
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Call `attempt` until it succeeds or the attempt budget is spent.
    ///
    /// `attempt` receives the 1-based attempt number. `wait` runs between
    /// attempts, never after the last one.
    pub fn run<F>(&self, mut attempt: F, wait: &dyn RetryWait) -> RetryOutcome
    where
        F: FnMut(u32) -> AttemptResult,
    {
        let mut attempts = 0;
        loop {
            attempts += 1;
            match attempt(attempts) {
                AttemptResult::Success(status) => {
                    return RetryOutcome::Success { status, attempts };
                }
                AttemptResult::TransientFailure if attempts >= self.max_attempts => {
                    return RetryOutcome::ExhaustedRetries { attempts };
                }
                AttemptResult::TransientFailure => wait.wait(attempts),
            }
        }
    }

    /// Look `id` up with retries and fold the outcome into a status.
    ///
    /// Exhausted retries become `on-hold` for users and `failed` for
    /// listings. Non-transient lookup errors are reported as `unknown`.
    pub fn resolve(
        &self,
        lookup: &dyn Lookup,
        kind: LookupKind,
        id: &Identifier,
        wait: &dyn RetryWait,
    ) -> Resolution {
        let outcome = self.run(
            |attempt| match lookup.lookup(kind, id) {
                Ok(status) => {
                    log::debug!(
                        "[{} {}] attempt {}/{} -> {}",
                        kind,
                        id,
                        attempt,
                        self.max_attempts,
                        status
                    );
                    AttemptResult::Success(status)
                }
                Err(err) if err.is_transient() => {
                    log::debug!(
                        "[{} {}] attempt {}/{} failed: {}",
                        kind,
                        id,
                        attempt,
                        self.max_attempts,
                        err
                    );
                    AttemptResult::TransientFailure
                }
                Err(err) => {
                    log::info!("[{} {}] {}", kind, id, err);
                    AttemptResult::Success(Status::Unknown)
                }
            },
            wait,
        );

        match outcome {
            RetryOutcome::Success { status, attempts } => Resolution {
                kind,
                status,
                attempts,
            },
            RetryOutcome::ExhaustedRetries { attempts } => {
                let err = SupportError::ExhaustedRetries {
                    kind,
                    identifier: id.to_string(),
                    attempts,
                };
                log::info!("{}", err);
                Resolution {
                    kind,
                    status: kind.exhausted_status(),
                    attempts,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::SyntheticLookup;
    use crate::error::Result;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Mutex;

    fn id(raw: &str) -> Identifier {
        Identifier::parse(raw).unwrap()
    }

    struct CountingLookup {
        calls: AtomicU32,
        fail_first: u32,
    }

    impl CountingLookup {
        fn new(fail_first: u32) -> Self {
            Self {
                calls: AtomicU32::new(0),
                fail_first,
            }
        }
    }

    impl Lookup for CountingLookup {
        fn lookup(&self, kind: LookupKind, id: &Identifier) -> Result<Status> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
            if call <= self.fail_first {
                Err(SupportError::TransientLookupFailure {
                    kind,
                    identifier: id.to_string(),
                })
            } else {
                Ok(Status::Active)
            }
        }
    }

    #[derive(Default)]
    struct RecordingWait {
        waits: Mutex<Vec<u32>>,
    }

    impl RetryWait for RecordingWait {
        fn wait(&self, attempt: u32) {
            self.waits.lock().unwrap().push(attempt);
        }
    }

    #[test]
    fn prefix_five_user_exhausts_after_three_attempts() {
        let policy = RetryPolicy::default();
        let lookup = CountingLookup::new(u32::MAX);
        let resolution = policy.resolve(&lookup, LookupKind::User, &id("5005"), &NoWait);

        assert_eq!(resolution.status, Status::OnHold);
        assert_eq!(resolution.attempts, 3);
        assert_eq!(lookup.calls.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn prefix_five_listing_exhausts_to_failed() {
        let resolution =
            RetryPolicy::default().resolve(&SyntheticLookup, LookupKind::Listing, &id("5002"), &NoWait);
        assert_eq!(resolution.status, Status::Failed);
        assert_eq!(resolution.attempts, 3);
    }

    #[test]
    fn every_prefix_five_id_takes_exactly_three_attempts() {
        for raw in ["500", "5005", "5123", "59999"] {
            for kind in [LookupKind::User, LookupKind::Listing] {
                let resolution =
                    RetryPolicy::default().resolve(&SyntheticLookup, kind, &id(raw), &NoWait);
                assert_eq!(resolution.attempts, 3, "{kind} {raw}");
                assert!(resolution.status.is_exhausted(), "{kind} {raw}");
            }
        }
    }

    #[test]
    fn transient_failure_then_success_recovers() {
        let lookup = CountingLookup::new(2);
        let resolution =
            RetryPolicy::default().resolve(&lookup, LookupKind::User, &id("1001"), &NoWait);
        assert_eq!(resolution.status, Status::Active);
        assert_eq!(resolution.attempts, 3);
    }

    #[test]
    fn non_transient_status_is_never_retried() {
        let lookup = CountingLookup::new(0);
        let resolution =
            RetryPolicy::default().resolve(&lookup, LookupKind::User, &id("1001"), &NoWait);
        assert_eq!(resolution.attempts, 1);
        assert_eq!(lookup.calls.load(Ordering::SeqCst), 1);

        let unknown =
            RetryPolicy::default().resolve(&SyntheticLookup, LookupKind::User, &id("3001"), &NoWait);
        assert_eq!(unknown.status, Status::Unknown);
        assert_eq!(unknown.attempts, 1);
    }

    #[test]
    fn wait_runs_between_attempts_only() {
        let wait = RecordingWait::default();
        let outcome = RetryPolicy::new(3).run(|_| AttemptResult::TransientFailure, &wait);
        assert_eq!(outcome, RetryOutcome::ExhaustedRetries { attempts: 3 });
        assert_eq!(*wait.waits.lock().unwrap(), vec![1, 2]);
    }

    #[test]
    fn zero_budget_still_attempts_once() {
        let policy = RetryPolicy::new(0);
        assert_eq!(policy.max_attempts(), 1);
        let outcome = policy.run(|_| AttemptResult::TransientFailure, &NoWait);
        assert_eq!(outcome.attempts(), 1);
    }
}
