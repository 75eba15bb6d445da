//! Re-entrancy guard for user flows.

use std::collections::HashSet;
use std::sync::Mutex;

use qrscan_core::error::{Result, ScanError};
use qrscan_core::session::FlowKind;

/// Tracks which flow kinds are currently running.
///
/// At most one flow of each kind runs at a time. Different kinds may overlap.
#[derive(Debug, Default)]
pub struct FlowGuard {
    active: Mutex<HashSet<FlowKind>>,
}

impl FlowGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks `kind` as running, or fails with `Busy` if it already is.
    pub fn try_acquire(&self, kind: FlowKind) -> Result<FlowPermit<'_>> {
        let mut active = self.active.lock().unwrap_or_else(|e| e.into_inner());
        if !active.insert(kind) {
            tracing::debug!("[Guard] Rejected concurrent {}", kind);
            return Err(ScanError::Busy(kind));
        }
        Ok(FlowPermit { guard: self, kind })
    }

    pub fn is_active(&self, kind: FlowKind) -> bool {
        self.active
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .contains(&kind)
    }
}

/// Releases its flow kind on drop.
#[derive(Debug)]
pub struct FlowPermit<'a> {
    guard: &'a FlowGuard,
    kind: FlowKind,
}

impl Drop for FlowPermit<'_> {
    fn drop(&mut self) {
        self.guard
            .active
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .remove(&self.kind);
    }
}
