use crate::classification::ErrorCategory;
use crate::descriptor::OsDescriptor;
use crate::invocation::ToolInvocationResult;
use crate::mode::RepairMode;
use crate::source::RepairSource;
use camino::Utf8PathBuf;
use serde::{Deserialize, Serialize};

/// Result text recorded when local-media mode finds no image.
pub const NO_MEDIA_ERROR_TEXT: &str = "No install media found";

/// Aggregated state of one run. Built once at the end and never mutated after write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskReport {
    pub schema: String,
    pub generated_at: String,
    pub mode: RepairMode,
    pub os: OsDescriptor,
    pub source: RepairSource,

    /// `None` when orchestration was skipped.
    #[serde(default)]
    pub stages: Option<Vec<ToolInvocationResult>>,

    pub error_text: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_category: Option<ErrorCategory>,

    pub reboot_pending: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guidance_url: Option<String>,

    pub log_path: Utf8PathBuf,

    /// Revision of the failure-pattern table that produced `error_category`.
    #[serde(default)]
    pub classifier_rules_version: u32,

    /// Revision of the OS labeling rules that produced `os`.
    #[serde(default)]
    pub profile_rules_version: u32,
}

impl TaskReport {
    pub fn orchestration_skipped(&self) -> bool {
        self.stages.is_none()
    }
}
