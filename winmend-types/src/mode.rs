use serde::{Deserialize, Serialize};

/// Operator-selected repair mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RepairMode {
    /// Menu option 1: repair using the current component store.
    CurrentStore,
    /// Menu option 2: repair using a local install image.
    LocalMedia,
}

impl RepairMode {
    pub fn label(self) -> &'static str {
        match self {
            RepairMode::CurrentStore => "Repair using current component store",
            RepairMode::LocalMedia => "Repair using local install media",
        }
    }
}
