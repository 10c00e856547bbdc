//! Rendering helpers (plain text) for the technician-facing report.

use winmend_types::{RepairSource, TaskReport, ToolInvocationResult};

pub fn render_report_txt(report: &TaskReport) -> String {
    let mut out = String::new();
    out.push_str("winmend repair report\n");
    out.push_str("=====================\n");
    out.push_str(&format!("Generated: {}\n", report.generated_at));

    section(&mut out, "System");
    out.push_str(&format!("Product: {}\n", report.os.product_name));
    out.push_str(&format!("Edition: {}\n", report.os.edition_id));
    out.push_str(&format!("Build:   {}\n", report.os.full_build));

    section(&mut out, "Actions");
    out.push_str(&format!("Mode: {}\n", report.mode.label()));
    match &report.stages {
        None => out.push_str("No repair stages were run.\n"),
        Some(stages) if stages.is_empty() => out.push_str("No repair stages were run.\n"),
        Some(stages) => {
            for (i, stage) in stages.iter().enumerate() {
                render_stage(&mut out, i + 1, stage);
            }
        }
    }

    section(&mut out, "Repair Source");
    out.push_str(&source_label(report));
    out.push('\n');

    section(&mut out, "DISM-equivalent Result");
    out.push_str(&report.error_text);
    out.push('\n');

    section(&mut out, "Reboot Required");
    out.push_str(if report.reboot_pending { "Yes\n" } else { "No\n" });

    section(&mut out, "Guidance Provided");
    out.push_str(report.guidance_url.as_deref().unwrap_or("Not required"));
    out.push('\n');

    section(&mut out, "Logs");
    out.push_str(report.log_path.as_str());
    out.push('\n');

    section(&mut out, "Notes");
    out.push_str(&format!(
        "- Repair media must match the installed build ({}) and edition ({}).\n",
        report.os.full_build, report.os.edition_id
    ));
    out.push_str("- If a reboot is pending, restart before running the repair again.\n");
    out.push_str("- Raw DISM and SFC output is recorded in the log file above.\n");

    out
}

fn section(out: &mut String, title: &str) {
    out.push('\n');
    out.push_str(title);
    out.push('\n');
    out.push_str(&"-".repeat(title.len()));
    out.push('\n');
}

fn render_stage(out: &mut String, n: usize, stage: &ToolInvocationResult) {
    out.push_str(&format!("{}. {}\n", n, stage.stage.label()));
    out.push_str(&format!("   Command:   {}\n", stage.command_line));
    let exit = stage
        .exit_code
        .map(|c| c.to_string())
        .unwrap_or_else(|| "-".to_string());
    out.push_str(&format!("   Exit code: {}\n", exit));
    out.push_str(&format!("   Output:    {} line(s)\n", stage.lines.len()));
}

fn source_label(report: &TaskReport) -> String {
    match &report.source {
        RepairSource::None if report.stages.is_none() => {
            "None (no install media found; repair not run)".to_string()
        }
        RepairSource::None => {
            "None (DISM resolves its own source: component store or Windows Update)".to_string()
        }
        RepairSource::LocalImage(path) => format!("Local image: {}", path),
    }
}
