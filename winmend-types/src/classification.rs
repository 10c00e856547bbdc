use serde::{Deserialize, Serialize};

/// Diagnostic category derived from RestoreHealth output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    KnownSourceMissing,
    UpdateServiceUnavailable,
    GenericSourceMissing,
    Undetected,
}

impl ErrorCategory {
    /// Categories where fresh install media would help.
    pub fn needs_source(self) -> bool {
        !matches!(self, ErrorCategory::Undetected)
    }
}

/// A category paired with its fixed technician-facing message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    pub category: ErrorCategory,
    pub message: &'static str,
}
