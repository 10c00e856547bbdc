use camino::Utf8PathBuf;
use serde::{Deserialize, Serialize};

/// Where RestoreHealth gets known-good payloads from.
///
/// Chosen before orchestration starts and never changed during a run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "path", rename_all = "snake_case")]
pub enum RepairSource {
    /// Let the repair tool resolve its own source (local store or Windows Update).
    #[default]
    None,
    /// An install image found on local media.
    LocalImage(Utf8PathBuf),
}

impl RepairSource {
    pub fn image_path(&self) -> Option<&Utf8PathBuf> {
        match self {
            RepairSource::None => None,
            RepairSource::LocalImage(path) => Some(path),
        }
    }
}
