use std::fmt;

/// Lifecycle of a [`TodoAdapter`](super::TodoAdapter).
///
/// ```text
/// Idle --start--> Loading --ok--> Ready
///                    |              |
///                    +---err--> Error
/// Ready/Error --mutation or refresh--> Loading
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum AdapterState {
    /// Constructed, initial load not started.
    #[default]
    Idle,
    /// A load or an operation is in flight.
    Loading,
    /// The cache reflects the last successful load.
    Ready,
    /// The last operation failed; see the adapter's error slot.
    Error,
}

impl AdapterState {
    pub fn as_str(&self) -> &'static str {
        match self {
            AdapterState::Idle => "idle",
            AdapterState::Loading => "loading",
            AdapterState::Ready => "ready",
            AdapterState::Error => "error",
        }
    }
}

impl fmt::Display for AdapterState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
