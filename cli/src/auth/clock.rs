//! Time source for the polling loop.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Wall clock plus the ability to wait on it.
#[async_trait]
pub trait Clock: Send + Sync {
    /// Current wall-clock time.
    fn now(&self) -> DateTime<Utc>;

    /// Suspends the caller for `duration`.
    async fn sleep(&self, duration: Duration);
}

/// The real clock, backed by the system time and the tokio timer.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

#[async_trait]
impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

#[cfg(test)]
pub mod testing {
    use std::sync::Mutex;

    use super::*;

    /// Virtual clock: sleeping advances time instantly and is recorded.
    pub struct ManualClock {
        now: Mutex<DateTime<Utc>>,
        drift: chrono::Duration,
        sleeps: Mutex<Vec<Duration>>,
    }

    impl ManualClock {
        pub fn new(start: DateTime<Utc>) -> Self {
            Self::with_drift(start, chrono::Duration::zero())
        }

        /// Each call to `now` also moves time forward by `drift`.
        pub fn with_drift(start: DateTime<Utc>, drift: chrono::Duration) -> Self {
            Self {
                now: Mutex::new(start),
                drift,
                sleeps: Mutex::new(Vec::new()),
            }
        }

        pub fn sleeps(&self) -> Vec<Duration> {
            self.sleeps.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Clock for ManualClock {
        fn now(&self) -> DateTime<Utc> {
            let mut now = self.now.lock().unwrap();
            let current = *now;
            *now = current + self.drift;
            current
        }

        async fn sleep(&self, duration: Duration) {
            self.sleeps.lock().unwrap().push(duration);
            let mut now = self.now.lock().unwrap();
            *now = *now + chrono::Duration::from_std(duration).unwrap();
        }
    }
}
