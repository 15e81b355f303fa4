//! Change notifications for adapter consumers.
//!
//! Listeners run on the emitter's own threads, so delivery is
//! asynchronous and not ordered across events.

use event_emitter_rs::EventEmitter;

use super::AdapterState;

const STATE_CHANGED: &str = "StateChanged";
const ERROR_RECORDED: &str = "ErrorRecorded";

pub(crate) struct AdapterEvents {
    emitter: EventEmitter,
}

impl AdapterEvents {
    pub(crate) fn new() -> Self {
        Self {
            emitter: EventEmitter::new(),
        }
    }

    pub(crate) fn on_state_change<F>(&mut self, listener: F) -> String
    where
        F: Fn(String) + Send + Sync + 'static,
    {
        self.emitter.on(STATE_CHANGED, listener)
    }

    pub(crate) fn on_error<F>(&mut self, listener: F) -> String
    where
        F: Fn(String) + Send + Sync + 'static,
    {
        self.emitter.on(ERROR_RECORDED, listener)
    }

    pub(crate) fn remove_listener(&mut self, id: &str) -> bool {
        self.emitter.remove_listener(id).is_some()
    }

    pub(crate) fn state_changed(&mut self, state: AdapterState) {
        self.emitter.emit(STATE_CHANGED, state.as_str().to_string());
    }

    pub(crate) fn error_recorded(&mut self, message: &str) {
        self.emitter.emit(ERROR_RECORDED, message.to_string());
    }
}
