//! The repair pipeline, extracted from the CLI.
//!
//! These entry points are I/O-agnostic: registry reads, tool runs, browser
//! launches and file writes all go through the port traits.

use crate::orchestrator::RepairOrchestrator;
use crate::ports::{ToolRunner, UrlLauncher, WritePort};
use crate::settings::RunSettings;
use anyhow::Context;
use tracing::{info, warn};
use winmend_domain::{
    CLASSIFIER_RULES_VERSION, IdentitySource, MarkerProbe, PROFILE_RULES_VERSION, ProfileError,
    guidance_url, locate_install_image, profile_os, reboot_pending,
};
use winmend_render::render_report_txt;
use winmend_types::report::NO_MEDIA_ERROR_TEXT;
use winmend_types::{OsDescriptor, RepairMode, RepairSource, TaskReport, schema};

/// Error type for pipeline results. Exit code 1 for every fatal error.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error(transparent)]
    Profile(#[from] ProfileError),
    #[error("{0:#}")]
    Internal(#[from] anyhow::Error),
}

impl PipelineError {
    pub fn exit_code(&self) -> u8 {
        match self {
            PipelineError::Profile(_) => 1,
            PipelineError::Internal(_) => 1,
        }
    }
}

/// Ports consumed by [`run_repair`].
pub struct RunPorts<'a> {
    pub identity: &'a dyn IdentitySource,
    pub runner: &'a dyn ToolRunner,
    pub markers: &'a dyn MarkerProbe,
    pub launcher: &'a dyn UrlLauncher,
}

/// Outcome of `run_repair`.
#[derive(Debug, Clone)]
pub struct RunOutcome {
    pub report: TaskReport,
    /// Local-media mode found no image; no stage ran.
    pub media_missing: bool,
}

/// Run one repair and aggregate everything into a [`TaskReport`].
///
/// Only a profiling failure aborts; repair failures surface as report content.
/// The caller persists the report with [`write_report_artifacts`].
pub fn run_repair(
    settings: &RunSettings,
    mode: RepairMode,
    ports: &RunPorts<'_>,
) -> Result<RunOutcome, PipelineError> {
    let os = profile_os(ports.identity)?;
    info!(
        product = %os.product_name,
        edition = %os.edition_id,
        build = %os.full_build,
        mode = mode.label(),
        "profiled operating system"
    );

    let source = match mode {
        RepairMode::CurrentStore => Some(RepairSource::None),
        RepairMode::LocalMedia => {
            match locate_install_image(&settings.media_dirs, &settings.image_extension) {
                Some(path) => {
                    info!(image = %path, "using local install image");
                    Some(RepairSource::LocalImage(path))
                }
                None => {
                    warn!(
                        dirs = ?settings.media_dirs,
                        extension = %settings.image_extension,
                        "no install media found"
                    );
                    None
                }
            }
        }
    };
    let media_missing = source.is_none();

    let (stages, error_text, error_category) = match &source {
        Some(source) => {
            let outcome = RepairOrchestrator::new(ports.runner, &settings.tools).run(source);
            let category = outcome.classification.category;
            (
                Some(outcome.stages),
                outcome.classification.message.to_string(),
                Some(category),
            )
        }
        None => (None, NO_MEDIA_ERROR_TEXT.to_string(), None),
    };

    let reboot = reboot_pending(ports.markers, &settings.reboot_markers);
    info!(reboot_pending = reboot, "checked pending reboot");

    let needs_guidance = media_missing || error_category.is_some_and(|c| c.needs_source());
    let guidance = needs_guidance
        .then(|| provide_guidance(&os, ports.launcher, settings.open_browser));

    let report = TaskReport {
        schema: schema::WINMEND_REPORT_V1.to_string(),
        generated_at: settings.generated_at.clone(),
        mode,
        os,
        source: source.unwrap_or_default(),
        stages,
        error_text,
        error_category,
        reboot_pending: reboot,
        guidance_url: guidance,
        log_path: settings.log_path(),
        classifier_rules_version: CLASSIFIER_RULES_VERSION,
        profile_rules_version: PROFILE_RULES_VERSION,
    };

    Ok(RunOutcome {
        report,
        media_missing,
    })
}

/// Resolve the download page for `os` and, if `open` is set, try to show it.
///
/// Launch failures are logged and swallowed; the URL is returned regardless.
pub fn provide_guidance(os: &OsDescriptor, launcher: &dyn UrlLauncher, open: bool) -> String {
    let url = guidance_url(os);
    info!(url = %url, "install media guidance");

    if open
        && let Err(e) = launcher.open(url)
    {
        warn!(url = %url, error = %e, "could not open browser");
    }

    url.to_string()
}

/// Write the text report and its JSON sidecar, overwriting earlier files.
pub fn write_report_artifacts(
    report: &TaskReport,
    settings: &RunSettings,
    writer: &dyn WritePort,
) -> anyhow::Result<()> {
    writer.create_dir_all(&settings.log_dir)?;

    let txt_path = settings.report_path();
    let txt = render_report_txt(report);
    writer
        .write_file(&txt_path, txt.as_bytes())
        .with_context(|| format!("write report {}", txt_path))?;

    let json_path = settings.report_json_path();
    let json = serde_json::to_string_pretty(report).context("serialize report")?;
    writer
        .write_file(&json_path, json.as_bytes())
        .with_context(|| format!("write report {}", json_path))?;

    info!(report = %txt_path, "report written");
    Ok(())
}
