use crate::{DetailValue, Details, Signal};

/// Append-only accumulator threaded through the checks in execution order.
#[derive(Clone, Debug, Default)]
pub struct AuditState {
    signals: Vec<Signal>,
    details: Details,
}

impl AuditState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn flag(&mut self, signal: Signal) {
        self.signals.push(signal);
    }

    pub fn note(&mut self, key: impl Into<String>, value: impl Into<DetailValue>) {
        self.details.insert(key, value);
    }

    pub fn has(&self, signal: Signal) -> bool {
        self.signals.contains(&signal)
    }

    pub fn signals(&self) -> &[Signal] {
        &self.signals
    }

    pub fn details(&self) -> &Details {
        &self.details
    }

    pub fn into_parts(self) -> (Vec<Signal>, Details) {
        (self.signals, self.details)
    }
}
