//! Port traits abstracting process, browser and write I/O away from the pipeline.

use camino::Utf8Path;

/// Decoded output of one finished process.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessOutput {
    /// Non-empty output lines, stdout and stderr interleaved in write order.
    pub lines: Vec<String>,
    pub exit_code: Option<i32>,
}

/// Blocking execution of an external tool.
///
/// An `Err` means the tool could not be launched at all; a tool that ran and
/// reported failure is an `Ok` with its output.
pub trait ToolRunner {
    fn run(&self, program: &str, args: &[String]) -> anyhow::Result<ProcessOutput>;
}

/// Best-effort opening of a URL in the interactive browser.
pub trait UrlLauncher {
    fn open(&self, url: &str) -> anyhow::Result<()>;
}

/// File-system write operations.
pub trait WritePort {
    fn write_file(&self, path: &Utf8Path, contents: &[u8]) -> anyhow::Result<()>;
    fn create_dir_all(&self, path: &Utf8Path) -> anyhow::Result<()>;
}
