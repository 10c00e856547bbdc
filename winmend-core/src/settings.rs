//! Clap-free settings for a repair run.

use camino::Utf8PathBuf;
use chrono::{DateTime, Local};
use winmend_domain::{DEFAULT_IMAGE_EXTENSION, DEFAULT_MEDIA_DIRS, REBOOT_MARKERS};

/// Executables for the external tools.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolPaths {
    pub dism: String,
    pub sfc: String,
    /// Registry CLI used for identity reads and reboot markers.
    pub reg: String,
}

impl Default for ToolPaths {
    fn default() -> Self {
        Self {
            dism: "DISM.exe".to_string(),
            sfc: "sfc.exe".to_string(),
            reg: "reg.exe".to_string(),
        }
    }
}

/// Immutable run configuration, built once at startup and passed to every
/// component explicitly.
#[derive(Debug, Clone)]
pub struct RunSettings {
    pub log_dir: Utf8PathBuf,

    /// File-name stamp shared by the log and the report (`%Y%m%d_%H%M%S`).
    pub run_stamp: String,
    /// Human-readable start time written into the report.
    pub generated_at: String,

    // Media
    pub media_dirs: Vec<Utf8PathBuf>,
    pub image_extension: String,

    pub reboot_markers: Vec<String>,
    pub tools: ToolPaths,

    // Guidance
    pub open_browser: bool,
}

impl RunSettings {
    /// Settings with default media, markers and tools, stamped with `started`.
    pub fn new(log_dir: Utf8PathBuf, started: DateTime<Local>) -> Self {
        Self {
            log_dir,
            run_stamp: started.format("%Y%m%d_%H%M%S").to_string(),
            generated_at: started.format("%Y-%m-%d %H:%M:%S").to_string(),
            media_dirs: DEFAULT_MEDIA_DIRS.iter().map(Utf8PathBuf::from).collect(),
            image_extension: DEFAULT_IMAGE_EXTENSION.to_string(),
            reboot_markers: REBOOT_MARKERS.iter().map(|m| m.to_string()).collect(),
            tools: ToolPaths::default(),
            open_browser: true,
        }
    }

    pub fn log_path(&self) -> Utf8PathBuf {
        self.log_dir.join(format!("repair_{}.log", self.run_stamp))
    }

    pub fn report_path(&self) -> Utf8PathBuf {
        self.log_dir.join(format!("report_{}.txt", self.run_stamp))
    }

    pub fn report_json_path(&self) -> Utf8PathBuf {
        self.log_dir.join(format!("report_{}.json", self.run_stamp))
    }
}

/// Platform default for the log/report directory.
pub fn default_log_dir() -> Utf8PathBuf {
    if cfg!(windows) {
        Utf8PathBuf::from(r"C:\ProgramData\winmend\logs")
    } else {
        Utf8PathBuf::from("logs")
    }
}
