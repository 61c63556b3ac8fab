//! Contact form lifecycle as the browser sees it.
//!
//! `idle -> submitting -> (success | error)`, and back to `idle` once the
//! reset delay has elapsed. The embedded `script.js` drives the same machine.

use std::time::{Duration, Instant};

use crate::constants::FORM_RESET_DELAY_SECS;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormStatus {
    Idle,
    Submitting,
    Success { settled_at: Instant },
    Error { message: String, settled_at: Instant },
}

impl FormStatus {
    pub fn name(&self) -> &'static str {
        match self {
            FormStatus::Idle => "idle",
            FormStatus::Submitting => "submitting",
            FormStatus::Success { .. } => "success",
            FormStatus::Error { .. } => "error",
        }
    }
}

#[derive(Debug)]
pub struct ContactForm {
    status: FormStatus,
    reset_delay: Duration,
}

impl Default for ContactForm {
    fn default() -> Self {
        Self::new()
    }
}

impl ContactForm {
    pub fn new() -> Self {
        Self {
            status: FormStatus::Idle,
            reset_delay: Duration::from_secs(FORM_RESET_DELAY_SECS),
        }
    }

    pub fn status(&self) -> &FormStatus {
        &self.status
    }

    /// Inputs and the submit control are disabled while a send is in flight.
    pub fn inputs_disabled(&self) -> bool {
        matches!(self.status, FormStatus::Submitting)
    }

    /// Starts a submission. Returns `false` if one is already in flight.
    pub fn submit(&mut self) -> bool {
        if self.inputs_disabled() {
            return false;
        }
        self.status = FormStatus::Submitting;
        true
    }

    /// Records the outcome of the request started by [`ContactForm::submit`].
    pub fn settle(&mut self, outcome: Result<(), String>, now: Instant) {
        if !self.inputs_disabled() {
            return;
        }
        self.status = match outcome {
            Ok(()) => FormStatus::Success { settled_at: now },
            Err(message) => FormStatus::Error {
                message,
                settled_at: now,
            },
        };
    }

    /// Returns to idle once the reset delay has passed since settling.
    pub fn tick(&mut self, now: Instant) {
        let settled_at = match &self.status {
            FormStatus::Success { settled_at } | FormStatus::Error { settled_at, .. } => *settled_at,
            _ => return,
        };
        if now.saturating_duration_since(settled_at) >= self.reset_delay {
            self.status = FormStatus::Idle;
        }
    }
}
