//! Application layer for QRSCAN.
//!
//! Hosts the [`ScanWorkflowController`], which coordinates the platform
//! capabilities, the in-memory scan session and the record repository.

pub mod guard;
pub mod task;
pub mod workflow;

pub use guard::{FlowGuard, FlowPermit};
pub use task::ActionTask;
pub use workflow::{ActionOutcome, ScanOutcome, ScanWorkflowController};
