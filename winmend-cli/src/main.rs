use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use chrono::Local;
use clap::{Parser, Subcommand};
use std::io::{self, Write};
use std::process::ExitCode;
use tracing::{error, info};
use winmend_cli::config::{self, ConfigMerger, MergedConfig};
use winmend_cli::logging::{self, RunLog};
use winmend_cli::menu;
use winmend_core::adapters::{
    FsWritePort, ProcessToolRunner, RegKeyProbe, RegQueryIdentitySource, SystemUrlLauncher,
    decode_console_output,
};
use winmend_core::pipeline::{RunPorts, run_repair, write_report_artifacts};
use winmend_domain::{
    CLASSIFIER_RULES_VERSION, PROFILE_RULES_VERSION, classify_restore_output, guidance_url,
    locate_install_image, profile_os,
};
use winmend_types::RepairMode;
use winmend_types::report::NO_MEDIA_ERROR_TEXT;

/// Exit code when local-media mode (or `find-media`) finds no install image.
const EXIT_MEDIA_MISSING: u8 = 2;

#[derive(Debug, Parser)]
#[command(
    name = "winmend",
    version,
    about = "Staged DISM / SFC repair with failure classification and a technician report."
)]
struct Cli {
    /// Config file (default: ./winmend.toml if present).
    #[arg(long, global = true)]
    config: Option<Utf8PathBuf>,

    /// Directory for the run log and reports.
    #[arg(long, global = true)]
    log_dir: Option<Utf8PathBuf>,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the full repair sequence and write a report.
    Repair(RepairArgs),
    /// Profile the OS and print its descriptor and download page.
    Detect,
    /// Classify a saved RestoreHealth output file.
    Classify(ClassifyArgs),
    /// Search for a local install image.
    FindMedia(FindMediaArgs),
}

#[derive(Debug, Parser)]
struct RepairArgs {
    /// Repair mode. Without it, the interactive menu is shown.
    #[arg(long, value_enum)]
    mode: Option<ModeArg>,

    /// Do not open the download page in a browser.
    #[arg(long, default_value_t = false)]
    no_browser: bool,

    /// Media search directory, in priority order (replaces the defaults).
    #[arg(long = "media-dir")]
    media_dirs: Vec<Utf8PathBuf>,
}

#[derive(Debug, Parser)]
struct ClassifyArgs {
    /// File holding RestoreHealth output (UTF-8 or UTF-16LE).
    file: Utf8PathBuf,
}

#[derive(Debug, Parser)]
struct FindMediaArgs {
    /// Media search directory, in priority order (replaces the defaults).
    #[arg(long = "media-dir")]
    media_dirs: Vec<Utf8PathBuf>,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum ModeArg {
    CurrentStore,
    LocalMedia,
}

impl From<ModeArg> for RepairMode {
    fn from(arg: ModeArg) -> Self {
        match arg {
            ModeArg::CurrentStore => RepairMode::CurrentStore,
            ModeArg::LocalMedia => RepairMode::LocalMedia,
        }
    }
}

fn main() -> ExitCode {
    match real_main() {
        Ok(code) => code,
        Err(e) => {
            error!("{:?}", e);
            ExitCode::from(1)
        }
    }
}

fn real_main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    let run_log = RunLog::default();
    logging::init(run_log.clone());

    let cwd = std::env::current_dir().context("determine current directory")?;
    let cwd = Utf8PathBuf::from_path_buf(cwd)
        .map_err(|p| anyhow::anyhow!("current directory is not UTF-8: {}", p.display()))?;
    let file_config =
        config::load_or_default(cli.config.as_deref(), &cwd).context("load winmend.toml config")?;
    let merger = ConfigMerger::new(file_config);
    let log_dir = cli.log_dir.as_deref();

    match cli.cmd {
        Command::Repair(args) => {
            let merged = merger.merge_run_args(log_dir, &args.media_dirs, args.no_browser);
            cmd_repair(args, merged, &run_log)
        }
        Command::Detect => cmd_detect(merger.merge_run_args(log_dir, &[], true)),
        Command::Classify(args) => cmd_classify(&args.file),
        Command::FindMedia(args) => {
            cmd_find_media(merger.merge_run_args(log_dir, &args.media_dirs, true))
        }
    }
}

fn cmd_repair(
    args: RepairArgs,
    merged: MergedConfig,
    run_log: &RunLog,
) -> anyhow::Result<ExitCode> {
    let mode = match args.mode {
        Some(mode) => Some(RepairMode::from(mode)),
        None => menu::prompt_mode(io::stdin().lock(), io::stdout().lock())
            .context("read menu choice")?,
    };
    let Some(mode) = mode else {
        println!("No action taken.");
        return Ok(ExitCode::SUCCESS);
    };

    let settings = merged.into_settings(Local::now());
    run_log.attach(&settings.log_path())?;
    info!(log = %settings.log_path(), mode = mode.label(), "repair run started");

    let identity = RegQueryIdentitySource::new(settings.tools.reg.as_str());
    let markers = RegKeyProbe::new(settings.tools.reg.as_str());
    let runner = ProcessToolRunner;
    let launcher = SystemUrlLauncher;
    let ports = RunPorts {
        identity: &identity,
        runner: &runner,
        markers: &markers,
        launcher: &launcher,
    };

    let outcome = match run_repair(&settings, mode, &ports) {
        Ok(outcome) => outcome,
        Err(e) => {
            error!("{}", e);
            return Ok(ExitCode::from(e.exit_code()));
        }
    };

    write_report_artifacts(&outcome.report, &settings, &FsWritePort)
        .context("write report")?;

    let report = &outcome.report;
    let mut out = io::stdout().lock();
    writeln!(out, "Result: {}", report.error_text)?;
    writeln!(
        out,
        "Reboot required: {}",
        if report.reboot_pending { "Yes" } else { "No" }
    )?;
    if let Some(url) = &report.guidance_url {
        writeln!(out, "Install media: {}", url)?;
    }
    writeln!(out, "Report: {}", settings.report_path())?;
    writeln!(out, "Log: {}", settings.log_path())?;

    if outcome.media_missing {
        return Ok(ExitCode::from(EXIT_MEDIA_MISSING));
    }
    Ok(ExitCode::SUCCESS)
}

fn cmd_detect(merged: MergedConfig) -> anyhow::Result<ExitCode> {
    let identity = RegQueryIdentitySource::new(merged.tools.reg.as_str());
    let os = profile_os(&identity)?;

    println!("Product: {}", os.product_name);
    println!("Edition: {}", os.edition_id);
    println!("Build: {}", os.full_build);
    println!("Install media: {}", guidance_url(&os));
    println!("Rules version: {}", PROFILE_RULES_VERSION);
    Ok(ExitCode::SUCCESS)
}

fn cmd_classify(file: &Utf8Path) -> anyhow::Result<ExitCode> {
    let bytes = fs_err::read(file).with_context(|| format!("read {}", file))?;
    let classification = classify_restore_output(&decode_console_output(&bytes));

    println!("Category: {:?}", classification.category);
    println!("{}", classification.message);
    println!("Rules version: {}", CLASSIFIER_RULES_VERSION);
    Ok(ExitCode::SUCCESS)
}

fn cmd_find_media(merged: MergedConfig) -> anyhow::Result<ExitCode> {
    let settings = merged.into_settings(Local::now());
    match locate_install_image(&settings.media_dirs, &settings.image_extension) {
        Some(path) => {
            println!("{}", path);
            Ok(ExitCode::SUCCESS)
        }
        None => {
            println!("{}", NO_MEDIA_ERROR_TEXT);
            Ok(ExitCode::from(EXIT_MEDIA_MISSING))
        }
    }
}
