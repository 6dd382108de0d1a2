//! Edit orchestration: one full validate→encode pass per field edit.
//!
//! The session plays the collaborator's role of owning the raw edit state.
//! Every mutation merges a single field and reruns the whole pipeline —
//! no caching, no partial success, no retry. The displayed payload exists
//! exactly when the entire configuration is currently valid.

use tracing::{debug, warn};

use codec::{EncodedPayload, DEFAULT_EXECUTOR};
use schema::{validate, RawEdits, RawValue, ValidationFailure};

pub struct EditSession {
    edits: RawEdits,
    executor: String,
    output: Option<EncodedPayload>,
    last_failure: Option<ValidationFailure>,
}

impl EditSession {
    /// Fresh session targeting the default executor. The empty edit state
    /// validates to the documented defaults, so a new session already
    /// carries a payload.
    pub fn new() -> Self {
        Self::with_executor(DEFAULT_EXECUTOR)
    }

    pub fn with_executor(executor: impl Into<String>) -> Self {
        let mut session = Self {
            edits: RawEdits::new(),
            executor: executor.into(),
            output: None,
            last_failure: None,
        };
        session.refresh();
        session
    }

    /// Merge one field edit and rerun the full pipeline.
    pub fn apply(&mut self, field: impl Into<String>, value: impl Into<RawValue>) {
        self.edits.insert(field.into(), value.into());
        self.refresh();
    }

    /// Drop one field edit, reverting it to its default, and rerun.
    pub fn clear(&mut self, field: &str) {
        self.edits.remove(field);
        self.refresh();
    }

    /// Current outputs, present only while the whole configuration is valid.
    pub fn output(&self) -> Option<&EncodedPayload> {
        self.output.as_ref()
    }

    /// Violations from the most recent failed pass, if the session is
    /// currently invalid.
    pub fn last_failure(&self) -> Option<&ValidationFailure> {
        self.last_failure.as_ref()
    }

    pub fn is_valid(&self) -> bool {
        self.output.is_some()
    }

    /// Read-only view of the raw edit state.
    pub fn edits(&self) -> &RawEdits {
        &self.edits
    }

    fn refresh(&mut self) {
        match validate(&self.edits) {
            Ok(config) => match codec::encode_for(&config, &self.executor) {
                Ok(encoded) => {
                    debug!(
                        payload_len = encoded.payload.len(),
                        live = %config.live_trading,
                        "Config valid — payload refreshed"
                    );
                    self.output = Some(encoded);
                    self.last_failure = None;
                }
                Err(e) => {
                    warn!(error = %e, "Encoding failed — payload cleared");
                    self.output = None;
                    self.last_failure = None;
                }
            },
            Err(failure) => {
                warn!(
                    violations = failure.violations.len(),
                    "Config invalid — payload cleared"
                );
                self.output = None;
                self.last_failure = Some(failure);
            }
        }
    }
}

impl Default for EditSession {
    fn default() -> Self {
        Self::new()
    }
}
