use chrono::{DateTime, SubsecRound, Utc};

/// Source of timestamps for created/updated stamps.
///
/// The service cuts readings to milliseconds, the precision the
/// persisted encoding keeps.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock, truncated to milliseconds.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now().trunc_subsecs(3)
    }
}
