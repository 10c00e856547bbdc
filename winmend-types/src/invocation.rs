use serde::{Deserialize, Serialize};

/// Orchestration stages, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    CheckHealth,
    ScanHealth,
    RestoreHealth,
    FileCheck,
}

impl Stage {
    pub const ALL: [Stage; 4] = [
        Stage::CheckHealth,
        Stage::ScanHealth,
        Stage::RestoreHealth,
        Stage::FileCheck,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Stage::CheckHealth => "DISM /CheckHealth",
            Stage::ScanHealth => "DISM /ScanHealth",
            Stage::RestoreHealth => "DISM /RestoreHealth",
            Stage::FileCheck => "SFC /scannow",
        }
    }
}

/// Captured result of one stage's tool invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolInvocationResult {
    pub stage: Stage,
    pub command_line: String,

    /// Raw output lines, stdout and stderr interleaved in write order.
    #[serde(default)]
    pub lines: Vec<String>,

    /// `None` when the tool could not be launched or was killed by a signal.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exit_code: Option<i32>,
}

impl ToolInvocationResult {
    pub fn output_text(&self) -> String {
        self.lines.join("\n")
    }
}
