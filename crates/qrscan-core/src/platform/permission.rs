use serde::{Deserialize, Serialize};

/// Camera permission state as reported by the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PermissionState {
    Granted,
    /// Partial access (e.g. limited photo library); good enough to scan.
    Limited,
    Denied,
    /// The user has not decided yet.
    Prompt,
    PromptWithRationale,
}

impl PermissionState {
    /// Only `Granted` and `Limited` allow camera or image operations.
    pub fn allows_scanning(&self) -> bool {
        matches!(self, PermissionState::Granted | PermissionState::Limited)
    }
}
