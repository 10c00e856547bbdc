//! Configuration file loading for winmend.
//!
//! Discovers and loads `winmend.toml` from the working directory, or from an
//! explicit `--config` path. Merges file settings with CLI arguments (CLI takes
//! precedence).

use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use chrono::{DateTime, Local};
use fs_err as fs;
use serde::Deserialize;
use tracing::debug;
use winmend_core::settings::{RunSettings, ToolPaths, default_log_dir};

/// The config file name to search for.
pub const CONFIG_FILE_NAME: &str = "winmend.toml";

/// Top-level configuration from winmend.toml.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct WinmendConfig {
    pub logs: LogsConfig,
    pub media: MediaConfig,
    pub tools: ToolsConfig,
    pub guidance: GuidanceConfig,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LogsConfig {
    /// Directory for the run log and the reports.
    pub dir: Option<Utf8PathBuf>,
}

/// Media section of the config.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct MediaConfig {
    /// Replaces the built-in search directories when non-empty.
    pub search_dirs: Vec<Utf8PathBuf>,

    /// Install image extension, without the dot.
    pub extension: Option<String>,
}

/// Overrides for the external tool executables.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ToolsConfig {
    pub dism: Option<String>,
    pub sfc: Option<String>,
    pub reg: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GuidanceConfig {
    /// Open the download page in the default browser.
    pub open_browser: bool,
}

impl Default for GuidanceConfig {
    fn default() -> Self {
        Self { open_browser: true }
    }
}

/// Discover the winmend.toml config file in `dir`.
pub fn discover_config(dir: &Utf8Path) -> Option<Utf8PathBuf> {
    let config_path = dir.join(CONFIG_FILE_NAME);
    if config_path.exists() {
        debug!("found config file at {}", config_path);
        Some(config_path)
    } else {
        debug!("no config file found at {}", config_path);
        None
    }
}

/// Load and parse a winmend.toml config file.
pub fn load_config(path: &Utf8Path) -> anyhow::Result<WinmendConfig> {
    let contents =
        fs::read_to_string(path).with_context(|| format!("read config file {}", path))?;
    parse_config(&contents).with_context(|| format!("parse config file {}", path))
}

/// Parse a config file from a string.
pub fn parse_config(contents: &str) -> anyhow::Result<WinmendConfig> {
    let config: WinmendConfig = toml::from_str(contents).context("invalid TOML")?;
    Ok(config)
}

/// Load the explicit config if given, else discover one in `dir`, else defaults.
pub fn load_or_default(
    explicit: Option<&Utf8Path>,
    dir: &Utf8Path,
) -> anyhow::Result<WinmendConfig> {
    if let Some(path) = explicit {
        return load_config(path);
    }
    match discover_config(dir) {
        Some(path) => load_config(&path),
        None => Ok(WinmendConfig::default()),
    }
}

/// Config file and CLI arguments, merged.
#[derive(Debug, Clone)]
pub struct MergedConfig {
    pub log_dir: Utf8PathBuf,
    /// `None` keeps the built-in search directories.
    pub media_dirs: Option<Vec<Utf8PathBuf>>,
    pub image_extension: Option<String>,
    pub tools: ToolPaths,
    pub open_browser: bool,
}

impl MergedConfig {
    /// Stamp the merged values into immutable run settings.
    pub fn into_settings(self, started: DateTime<Local>) -> RunSettings {
        let mut settings = RunSettings::new(self.log_dir, started);
        if let Some(dirs) = self.media_dirs {
            settings.media_dirs = dirs;
        }
        if let Some(ext) = self.image_extension {
            settings.image_extension = ext;
        }
        settings.tools = self.tools;
        settings.open_browser = self.open_browser;
        settings
    }
}

/// Builder for merging config file with CLI arguments.
pub struct ConfigMerger {
    config: WinmendConfig,
}

impl ConfigMerger {
    pub fn new(config: WinmendConfig) -> Self {
        Self { config }
    }

    /// Merge with CLI arguments.
    ///
    /// CLI media directories replace the configured ones rather than extending
    /// them; `--no-browser` wins over `open_browser = true`.
    pub fn merge_run_args(
        self,
        cli_log_dir: Option<&Utf8Path>,
        cli_media_dirs: &[Utf8PathBuf],
        no_browser: bool,
    ) -> MergedConfig {
        let log_dir = cli_log_dir
            .map(Utf8Path::to_path_buf)
            .or(self.config.logs.dir)
            .unwrap_or_else(default_log_dir);

        let media_dirs = if !cli_media_dirs.is_empty() {
            Some(cli_media_dirs.to_vec())
        } else if !self.config.media.search_dirs.is_empty() {
            Some(self.config.media.search_dirs)
        } else {
            None
        };

        let defaults = ToolPaths::default();
        let tools = ToolPaths {
            dism: self.config.tools.dism.unwrap_or(defaults.dism),
            sfc: self.config.tools.sfc.unwrap_or(defaults.sfc),
            reg: self.config.tools.reg.unwrap_or(defaults.reg),
        };

        MergedConfig {
            log_dir,
            media_dirs,
            image_extension: self.config.media.extension,
            tools,
            open_browser: self.config.guidance.open_browser && !no_browser,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use tempfile::TempDir;

    fn started() -> DateTime<Local> {
        Local
            .with_ymd_and_hms(2026, 10, 16, 9, 30, 5)
            .single()
            .expect("unambiguous local time")
    }

    #[test]
    fn test_parse_full_config() {
        let contents = r#"
[logs]
dir = 'C:\Temp\winmend'

[media]
search_dirs = ['F:\sources', 'C:\ISO']
extension = "esd"

[tools]
dism = 'C:\Windows\System32\Dism.exe'

[guidance]
open_browser = false
"#;

        let config = parse_config(contents).unwrap();
        assert_eq!(config.logs.dir, Some(Utf8PathBuf::from(r"C:\Temp\winmend")));
        assert_eq!(config.media.search_dirs.len(), 2);
        assert_eq!(config.media.extension.as_deref(), Some("esd"));
        assert_eq!(
            config.tools.dism.as_deref(),
            Some(r"C:\Windows\System32\Dism.exe")
        );
        assert!(config.tools.sfc.is_none());
        assert!(!config.guidance.open_browser);
    }

    #[test]
    fn test_parse_empty_config() {
        let config = parse_config("").unwrap();
        assert!(config.logs.dir.is_none());
        assert!(config.media.search_dirs.is_empty());
        assert!(config.guidance.open_browser);
    }

    #[test]
    fn test_parse_invalid_config() {
        let err = parse_config("[media]\nsearch_dirs = 3\n").expect_err("invalid");
        assert!(format!("{err:#}").contains("invalid TOML"));
    }

    #[test]
    fn test_merge_defaults() {
        let merged = ConfigMerger::new(WinmendConfig::default()).merge_run_args(None, &[], false);
        assert_eq!(merged.log_dir, default_log_dir());
        assert!(merged.media_dirs.is_none());
        assert_eq!(merged.tools, ToolPaths::default());
        assert!(merged.open_browser);

        let settings = merged.into_settings(started());
        assert_eq!(settings.media_dirs.len(), 3);
        assert_eq!(settings.image_extension, "wim");
    }

    #[test]
    fn test_merge_cli_overrides_config() {
        let config = WinmendConfig {
            logs: LogsConfig {
                dir: Some(Utf8PathBuf::from("from-config")),
            },
            media: MediaConfig {
                search_dirs: vec![Utf8PathBuf::from("config-media")],
                extension: Some("esd".to_string()),
            },
            ..Default::default()
        };

        let cli_dirs = vec![Utf8PathBuf::from("cli-media")];
        let merged = ConfigMerger::new(config).merge_run_args(
            Some(Utf8Path::new("from-cli")),
            &cli_dirs,
            true,
        );

        assert_eq!(merged.log_dir, Utf8PathBuf::from("from-cli"));
        assert_eq!(merged.media_dirs, Some(cli_dirs));
        assert_eq!(merged.image_extension.as_deref(), Some("esd"));
        assert!(!merged.open_browser);
    }

    #[test]
    fn test_merge_config_used_when_cli_silent() {
        let config = WinmendConfig {
            logs: LogsConfig {
                dir: Some(Utf8PathBuf::from("from-config")),
            },
            media: MediaConfig {
                search_dirs: vec![Utf8PathBuf::from("config-media")],
                extension: None,
            },
            tools: ToolsConfig {
                reg: Some("reg-override.exe".to_string()),
                ..Default::default()
            },
            guidance: GuidanceConfig {
                open_browser: false,
            },
        };

        let settings = ConfigMerger::new(config)
            .merge_run_args(None, &[], false)
            .into_settings(started());

        assert_eq!(settings.log_dir, Utf8PathBuf::from("from-config"));
        assert_eq!(settings.media_dirs, vec![Utf8PathBuf::from("config-media")]);
        assert_eq!(settings.tools.reg, "reg-override.exe");
        assert_eq!(settings.tools.dism, "DISM.exe");
        assert!(!settings.open_browser);
    }

    #[test]
    fn test_discover_config_some_and_none() {
        let temp = TempDir::new().expect("temp dir");
        let root = Utf8PathBuf::from_path_buf(temp.path().to_path_buf()).expect("utf8");
        assert!(discover_config(&root).is_none());

        std::fs::write(root.join(CONFIG_FILE_NAME), "").expect("write config");
        assert!(discover_config(&root).is_some());
    }

    #[test]
    fn test_explicit_config_must_exist() {
        let temp = TempDir::new().expect("temp dir");
        let root = Utf8PathBuf::from_path_buf(temp.path().to_path_buf()).expect("utf8");
        let missing = root.join("missing.toml");

        let err = load_or_default(Some(&missing), &root).expect_err("missing config");
        assert!(format!("{err:#}").contains("read config file"));
        assert!(load_or_default(None, &root).is_ok());
    }
}
