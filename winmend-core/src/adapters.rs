//! Default Windows-backed port implementations.
//!
//! Registry access goes through `reg.exe`, so every adapter here is process
//! I/O and builds on any host.

use crate::ports::{ProcessOutput, ToolRunner, UrlLauncher, WritePort};
use anyhow::{Context, bail};
use camino::Utf8Path;
use std::collections::BTreeMap;
use std::io::{self, Read};
use std::process::{Command, Stdio};
use tracing::debug;
use winmend_domain::{IdentitySource, MarkerProbe};

/// Registry key holding the OS identity values.
pub const IDENTITY_KEY: &str = r"HKLM\SOFTWARE\Microsoft\Windows NT\CurrentVersion";

/// Reads identity values with `reg query <key> /v <name>`.
#[derive(Debug, Clone)]
pub struct RegQueryIdentitySource {
    pub reg_exe: String,
    pub key: String,
}

impl RegQueryIdentitySource {
    pub fn new(reg_exe: impl Into<String>) -> Self {
        Self {
            reg_exe: reg_exe.into(),
            key: IDENTITY_KEY.to_string(),
        }
    }
}

impl IdentitySource for RegQueryIdentitySource {
    fn read_value(&self, name: &str) -> anyhow::Result<String> {
        let output = Command::new(&self.reg_exe)
            .args(["query", self.key.as_str(), "/v", name])
            .output()
            .with_context(|| format!("run {} query {}", self.reg_exe, self.key))?;

        if !output.status.success() {
            bail!(
                "{} query exited with {}: {}",
                self.reg_exe,
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            );
        }

        let text = decode_console_output(&output.stdout);
        parse_reg_query_value(&text, name)
            .with_context(|| format!("value {} not present under {}", name, self.key))
    }
}

/// Extract the data column for `name` from `reg query` output.
///
/// Value lines look like `    ProductName    REG_SZ    Windows 10 Pro`; the
/// data may itself contain spaces.
pub fn parse_reg_query_value(output: &str, name: &str) -> Option<String> {
    output.lines().find_map(|line| {
        let rest = line.trim_start().strip_prefix(name)?;
        // Guard against `UBR` matching a longer value name such as `UBRx`.
        if !rest.starts_with(char::is_whitespace) {
            return None;
        }
        let rest = rest.trim_start();
        let (kind, data) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));
        kind.starts_with("REG_").then(|| data.trim().to_string())
    })
}

/// Treats a marker as present when `reg query <marker>` succeeds.
#[derive(Debug, Clone)]
pub struct RegKeyProbe {
    pub reg_exe: String,
}

impl RegKeyProbe {
    pub fn new(reg_exe: impl Into<String>) -> Self {
        Self {
            reg_exe: reg_exe.into(),
        }
    }
}

impl MarkerProbe for RegKeyProbe {
    fn exists(&self, marker: &str) -> bool {
        match Command::new(&self.reg_exe).args(["query", marker]).output() {
            Ok(output) => output.status.success(),
            Err(e) => {
                debug!(marker = %marker, error = %e, "marker probe could not run");
                false
            }
        }
    }
}

/// Runs tools to completion, blocking until exit.
///
/// stdout and stderr share one pipe, so lines keep the order the tool wrote
/// them in.
#[derive(Debug, Clone, Default)]
pub struct ProcessToolRunner;

impl ToolRunner for ProcessToolRunner {
    fn run(&self, program: &str, args: &[String]) -> anyhow::Result<ProcessOutput> {
        let (mut reader, writer) = io::pipe().context("create output pipe")?;

        // The Command holds the parent's writer handles; it must be dropped
        // before reading or the pipe never reaches EOF.
        let mut child = {
            let mut cmd = Command::new(program);
            cmd.args(args)
                .stdin(Stdio::null())
                .stdout(writer.try_clone().context("clone output pipe")?)
                .stderr(writer);
            cmd.spawn().with_context(|| format!("spawn {}", program))?
        };

        let mut bytes = Vec::new();
        reader
            .read_to_end(&mut bytes)
            .with_context(|| format!("read output of {}", program))?;
        let status = child
            .wait()
            .with_context(|| format!("wait for {}", program))?;

        Ok(ProcessOutput {
            lines: split_lines(&decode_console_output(&bytes)),
            exit_code: status.code(),
        })
    }
}

/// Decode console bytes, detecting the UTF-16LE output `sfc.exe` produces.
pub fn decode_console_output(bytes: &[u8]) -> String {
    if let Some(rest) = bytes.strip_prefix(&[0xFF, 0xFE]) {
        return decode_utf16le(rest);
    }
    if looks_like_utf16le(bytes) {
        return decode_utf16le(bytes);
    }
    String::from_utf8_lossy(bytes).into_owned()
}

// ASCII text encoded as UTF-16LE has a zero in most odd positions.
fn looks_like_utf16le(bytes: &[u8]) -> bool {
    if bytes.len() < 4 {
        return false;
    }
    let odd = bytes.iter().skip(1).step_by(2);
    let total = bytes.len() / 2;
    let zeros = odd.filter(|b| **b == 0).count();
    zeros * 2 > total
}

fn decode_utf16le(bytes: &[u8]) -> String {
    let units: Vec<u16> = bytes
        .chunks_exact(2)
        .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
        .collect();
    String::from_utf16_lossy(&units)
}

/// Split decoded output into trimmed, non-empty lines.
///
/// `\r` on its own counts as a separator: DISM redraws its progress bar with
/// bare carriage returns.
pub fn split_lines(text: &str) -> Vec<String> {
    text.split(['\r', '\n'])
        .map(|line| line.replace('\0', ""))
        .map(|line| line.trim().to_string())
        .filter(|line| !line.is_empty())
        .collect()
}

/// Opens URLs with the platform's default handler.
#[derive(Debug, Clone, Default)]
pub struct SystemUrlLauncher;

impl UrlLauncher for SystemUrlLauncher {
    fn open(&self, url: &str) -> anyhow::Result<()> {
        let launched = if cfg!(windows) {
            Command::new("cmd").args(["/C", "start", "", url]).status()
        } else if cfg!(target_os = "macos") {
            Command::new("open").arg(url).status()
        } else {
            Command::new("xdg-open").arg(url).status()
        };
        let status = launched.with_context(|| format!("launch browser for {}", url))?;

        if !status.success() {
            bail!("browser launcher exited with {}", status);
        }
        Ok(())
    }
}

/// Filesystem write operations.
#[derive(Debug, Clone, Default)]
pub struct FsWritePort;

impl WritePort for FsWritePort {
    fn write_file(&self, path: &Utf8Path, contents: &[u8]) -> anyhow::Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_str().is_empty()) {
            fs_err::create_dir_all(parent)
                .with_context(|| format!("create parent dir for {}", path))?;
        }
        fs_err::write(path, contents).with_context(|| format!("write {}", path))
    }

    fn create_dir_all(&self, path: &Utf8Path) -> anyhow::Result<()> {
        fs_err::create_dir_all(path).with_context(|| format!("create_dir_all {}", path))
    }
}

/// In-memory identity source for embedding and testing.
#[derive(Debug, Clone, Default)]
pub struct InMemoryIdentitySource {
    values: BTreeMap<String, String>,
}

impl InMemoryIdentitySource {
    pub fn new<K, V>(values: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            values: values
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl IdentitySource for InMemoryIdentitySource {
    fn read_value(&self, name: &str) -> anyhow::Result<String> {
        self.values
            .get(name)
            .cloned()
            .with_context(|| format!("value {} not present", name))
    }
}
