use std::collections::HashMap;

use tokio::sync::Mutex;
use tokio::time::{Duration, Instant};

#[derive(Debug)]
struct Attempts {
    failures: u32,
    first_failure: Instant,
    locked_until: Option<Instant>,
}

impl Attempts {
    /// A record is dropped once its lockout ends, or, when never locked,
    /// `lockout` after its first failure.
    fn expires_at(&self, lockout: Duration) -> Instant {
        self.locked_until.unwrap_or(self.first_failure + lockout)
    }
}

/// Per-email failed-login counter with a timed lockout.
///
/// After `max_attempts` failures within `lockout` of the first one, the email
/// is locked for `lockout`. A successful login clears the record, and expired
/// records are pruned whenever a failure is recorded so unknown emails cannot
/// grow the table without bound.
#[derive(Debug)]
pub struct LoginThrottle {
    max_attempts: u32,
    lockout: Duration,
    entries: Mutex<HashMap<String, Attempts>>,
}

impl LoginThrottle {
    pub fn new(max_attempts: u32, lockout: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            lockout,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Remaining lockout, if the email is currently locked.
    pub async fn locked_for(&self, email: &str) -> Option<Duration> {
        let key = email.to_lowercase();
        let mut entries = self.entries.lock().await;
        let attempts = entries.get(&key)?;

        let now = Instant::now();
        if attempts.expires_at(self.lockout) <= now {
            entries.remove(&key);
            return None;
        }
        attempts.locked_until.map(|until| until - now)
    }

    /// Records a failure; returns `true` when this failure triggered a lockout.
    pub async fn record_failure(&self, email: &str) -> bool {
        let now = Instant::now();
        let lockout = self.lockout;
        let mut entries = self.entries.lock().await;
        entries.retain(|_, attempts| attempts.expires_at(lockout) > now);

        let attempts = entries.entry(email.to_lowercase()).or_insert(Attempts {
            failures: 0,
            first_failure: now,
            locked_until: None,
        });
        attempts.failures += 1;

        if attempts.locked_until.is_none() && attempts.failures >= self.max_attempts {
            attempts.locked_until = Some(now + lockout);
            true
        } else {
            false
        }
    }

    pub async fn record_success(&self, email: &str) {
        self.entries.lock().await.remove(&email.to_lowercase());
    }

    #[cfg(test)]
    async fn tracked(&self) -> usize {
        self.entries.lock().await.len()
    }
}
