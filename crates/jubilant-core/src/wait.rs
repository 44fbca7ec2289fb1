// ── Wait state machine ──
//
// Polls status until a readiness predicate holds for N consecutive polls,
// an error predicate fires, or the timeout expires. Time is read through a
// `Clock` so tests can run the loop without sleeping.

use std::fmt;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use tracing::info;

use crate::diff::status_diff;
use crate::error::CoreError;
use crate::model::Status;

// ── Clock ────────────────────────────────────────────────────────────

/// Monotonic time source for the wait loop.
pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
    fn sleep(&self, duration: Duration);
}

/// Real time: `Instant::now` and `std::thread::sleep`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }

    fn sleep(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

/// Clock that only moves when slept on. For tests.
#[derive(Debug)]
pub struct ManualClock {
    start: Instant,
    elapsed: Mutex<Duration>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
            elapsed: Mutex::new(Duration::ZERO),
        }
    }

    pub fn elapsed(&self) -> Duration {
        *self
            .elapsed
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.start + self.elapsed()
    }

    fn sleep(&self, duration: Duration) {
        *self
            .elapsed
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner) += duration;
    }
}

// ── Predicates / options ─────────────────────────────────────────────

/// A named status check. The name identifies it in `CoreError::Wait`.
pub struct Predicate<'a> {
    name: String,
    check: Box<dyn Fn(&Status) -> bool + 'a>,
}

impl<'a> Predicate<'a> {
    /// Wrap a closure or function, naming it by its type.
    pub fn new<F>(check: F) -> Self
    where
        F: Fn(&Status) -> bool + 'a,
    {
        Self {
            name: std::any::type_name::<F>().to_owned(),
            check: Box::new(check),
        }
    }

    pub fn named<F>(name: impl Into<String>, check: F) -> Self
    where
        F: Fn(&Status) -> bool + 'a,
    {
        Self {
            name: name.into(),
            check: Box::new(check),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn check(&self, status: &Status) -> bool {
        (self.check)(status)
    }
}

impl fmt::Debug for Predicate<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Predicate").field(&self.name).finish()
    }
}

/// Tuning for [`crate::Juju::wait`].
#[derive(Debug)]
pub struct WaitOptions<'a> {
    /// Abort with `CoreError::Wait` as soon as this returns true.
    pub error: Option<Predicate<'a>>,
    /// Pause between polls.
    pub delay: Duration,
    /// Overall limit; `None` uses the client's default wait timeout.
    pub timeout: Option<Duration>,
    /// Consecutive ready polls required.
    pub successes: u32,
}

impl Default for WaitOptions<'_> {
    fn default() -> Self {
        Self {
            error: None,
            delay: Duration::from_secs(1),
            timeout: None,
            successes: 3,
        }
    }
}

// ── Loop ─────────────────────────────────────────────────────────────

/// Run the wait loop over any status source.
///
/// The error predicate is checked before readiness on every poll. A changed
/// snapshot is logged as a diff against the previous one.
pub fn poll<F, R>(
    mut fetch: F,
    ready: R,
    opts: &WaitOptions<'_>,
    timeout: Duration,
    clock: &dyn Clock,
) -> Result<Status, CoreError>
where
    F: FnMut() -> Result<Status, CoreError>,
    R: Fn(&Status) -> bool,
{
    let start = clock.now();
    let mut last: Option<Status> = None;
    let mut successes = 0;

    while clock.now().duration_since(start) < timeout {
        let status = fetch()?;

        if last.as_ref() != Some(&status) {
            let diff = status_diff(last.as_ref(), &status);
            if !diff.is_empty() {
                info!(target: "jubilant::wait", "wait: status changed:\n{diff}");
            }
        }

        if let Some(error) = &opts.error {
            if error.check(&status) {
                return Err(CoreError::Wait {
                    predicate: error.name().to_owned(),
                    status: Box::new(status),
                });
            }
        }

        if ready(&status) {
            successes += 1;
            if successes >= opts.successes {
                return Ok(status);
            }
        } else {
            successes = 0;
        }

        last = Some(status);
        clock.sleep(opts.delay);
    }

    Err(CoreError::Timeout {
        message: format!("wait timed out after {}s", timeout.as_secs_f64()),
        last_status: last.map(Box::new),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::cell::Cell;

    use super::*;

    fn named(name: &str) -> Status {
        let mut status = Status::default();
        status.model.name = name.into();
        status
    }

    #[test]
    fn ready_from_third_tick_returns_on_fifth() {
        let clock = ManualClock::new();
        let tick = Cell::new(0);

        let status = poll(
            || {
                tick.set(tick.get() + 1);
                Ok(named(&format!("tick-{}", tick.get())))
            },
            |_| tick.get() >= 3,
            &WaitOptions::default(),
            Duration::from_secs(60),
            &clock,
        )
        .unwrap();

        assert_eq!(tick.get(), 5);
        assert_eq!(status.model.name, "tick-5");
        assert_eq!(clock.elapsed(), Duration::from_secs(4));
    }

    #[test]
    fn flapping_readiness_resets_the_count() {
        let clock = ManualClock::new();
        let tick = Cell::new(0);
        let pattern = [true, true, false, true, true, true];

        poll(
            || {
                tick.set(tick.get() + 1);
                Ok(Status::default())
            },
            |_| pattern[tick.get() - 1],
            &WaitOptions::default(),
            Duration::from_secs(60),
            &clock,
        )
        .unwrap();

        assert_eq!(tick.get(), 6);
    }

    #[test]
    fn error_predicate_wins_over_ready() {
        let clock = ManualClock::new();
        let opts = WaitOptions {
            error: Some(Predicate::named("any_error", |_| true)),
            ..WaitOptions::default()
        };

        let err = poll(|| Ok(named("m")), |_| true, &opts, Duration::from_secs(60), &clock)
            .unwrap_err();

        match err {
            CoreError::Wait { predicate, status } => {
                assert_eq!(predicate, "any_error");
                assert_eq!(status.model.name, "m");
            }
            other => panic!("expected Wait, got {other:?}"),
        }
    }

    #[test]
    fn timeout_carries_last_status() {
        let clock = ManualClock::new();
        let opts = WaitOptions {
            delay: Duration::from_secs(2),
            ..WaitOptions::default()
        };

        let err = poll(|| Ok(named("m")), |_| false, &opts, Duration::from_secs(5), &clock)
            .unwrap_err();

        let CoreError::Timeout {
            message,
            last_status,
        } = &err
        else {
            panic!("expected Timeout, got {err:?}");
        };
        assert_eq!(message, "wait timed out after 5s");
        assert_eq!(last_status.as_ref().unwrap().model.name, "m");
        assert!(err.to_string().starts_with("wait timed out after 5s\n"));
    }

    #[test]
    fn zero_timeout_never_polls() {
        let clock = ManualClock::new();
        let err = poll(
            || panic!("should not poll"),
            |_| true,
            &WaitOptions::default(),
            Duration::ZERO,
            &clock,
        )
        .unwrap_err();
        assert_eq!(err.to_string(), "wait timed out after 0s");
    }

    #[test]
    fn predicate_names_default_to_type() {
        fn ready(_: &Status) -> bool {
            true
        }
        assert!(Predicate::new(ready).name().ends_with("ready"));
    }
}
