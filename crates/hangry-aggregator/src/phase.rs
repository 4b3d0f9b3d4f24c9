//! Per-request lifecycle:
//! `Started → ProvidersDispatched → (PartialResults | AllFailed) → Merged → Formatted`.
//!
//! `PartialResults` means the mandatory listing call succeeded; any number of
//! entries (including none) may be degraded. `AllFailed` is terminal.

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestPhase {
    Started,
    ProvidersDispatched,
    PartialResults,
    AllFailed,
    Merged,
    Formatted,
}

impl RequestPhase {
    #[must_use]
    pub fn can_transition_to(self, next: RequestPhase) -> bool {
        use RequestPhase::{
            AllFailed, Formatted, Merged, PartialResults, ProvidersDispatched, Started,
        };
        matches!(
            (self, next),
            (Started, ProvidersDispatched)
                | (ProvidersDispatched, PartialResults | AllFailed)
                | (PartialResults, Merged)
                | (Merged, Formatted)
        )
    }

    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, RequestPhase::AllFailed | RequestPhase::Formatted)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid request phase transition for {request}: {from:?} -> {to:?}")]
pub struct PhaseError {
    pub request: &'static str,
    pub from: RequestPhase,
    pub to: RequestPhase,
}

/// Tracks and logs the phase of one aggregation request.
#[derive(Debug)]
pub struct PhaseTracker {
    request: &'static str,
    phase: RequestPhase,
}

impl PhaseTracker {
    #[must_use]
    pub fn start(request: &'static str) -> Self {
        tracing::debug!(request, phase = ?RequestPhase::Started, "request phase");
        Self {
            request,
            phase: RequestPhase::Started,
        }
    }

    #[must_use]
    pub fn phase(&self) -> RequestPhase {
        self.phase
    }

    /// Moves to `next`.
    ///
    /// # Errors
    ///
    /// Returns [`PhaseError`] and leaves the phase unchanged if the
    /// transition is not allowed.
    pub fn advance(&mut self, next: RequestPhase) -> Result<(), PhaseError> {
        if !self.phase.can_transition_to(next) {
            return Err(PhaseError {
                request: self.request,
                from: self.phase,
                to: next,
            });
        }
        tracing::debug!(request = self.request, from = ?self.phase, phase = ?next, "request phase");
        self.phase = next;
        Ok(())
    }
}
