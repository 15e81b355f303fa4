use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};
use todo_store::Clock;

/// Deterministic clock: every reading is one second after the previous.
#[derive(Clone)]
pub struct StepClock {
    next_millis: Arc<AtomicI64>,
}

impl StepClock {
    pub fn new() -> Self {
        let start = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        Self::starting_at(start)
    }

    pub fn starting_at(start: DateTime<Utc>) -> Self {
        Self {
            next_millis: Arc::new(AtomicI64::new(start.timestamp_millis())),
        }
    }
}

impl Clock for StepClock {
    fn now(&self) -> DateTime<Utc> {
        let millis = self.next_millis.fetch_add(1_000, Ordering::SeqCst);
        Utc.timestamp_millis_opt(millis).unwrap()
    }
}
