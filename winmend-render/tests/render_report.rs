//! Golden tests for the plain-text report layout.

use pretty_assertions::assert_eq;
use winmend_render::render_report_txt;
use winmend_types::report::NO_MEDIA_ERROR_TEXT;
use winmend_types::{
    ErrorCategory, OsDescriptor, RepairMode, RepairSource, Stage, TaskReport, ToolInvocationResult,
};

fn stage(stage: Stage, command_line: &str, lines: &[&str], exit_code: Option<i32>) -> ToolInvocationResult {
    ToolInvocationResult {
        stage,
        command_line: command_line.to_string(),
        lines: lines.iter().map(|l| l.to_string()).collect(),
        exit_code,
    }
}

fn full_report() -> TaskReport {
    TaskReport {
        schema: winmend_types::schema::WINMEND_REPORT_V1.to_string(),
        generated_at: "2026-10-16 09:30:00".to_string(),
        mode: RepairMode::LocalMedia,
        os: OsDescriptor::new("Windows 11 Pro", "Professional", 22631, 3447),
        source: RepairSource::LocalImage("D:/sources/install.wim".into()),
        stages: Some(vec![
            stage(
                Stage::CheckHealth,
                "DISM.exe /Online /Cleanup-Image /CheckHealth",
                &["No component store corruption detected."],
                Some(0),
            ),
            stage(
                Stage::ScanHealth,
                "DISM.exe /Online /Cleanup-Image /ScanHealth",
                &["The component store is repairable.", "The operation completed successfully."],
                Some(0),
            ),
            stage(
                Stage::RestoreHealth,
                "DISM.exe /Online /Cleanup-Image /RestoreHealth /Source:WIM:D:/sources/install.wim:1 /LimitAccess",
                &["Error: 0x800f081f"],
                Some(-2146498529),
            ),
            stage(Stage::FileCheck, "sfc.exe /scannow", &[], None),
        ]),
        error_text: "Error 0x800f081f: source missing.".to_string(),
        error_category: Some(ErrorCategory::KnownSourceMissing),
        reboot_pending: true,
        guidance_url: Some("https://www.microsoft.com/software-download/windows11".to_string()),
        log_path: "C:/ProgramData/winmend/logs/repair_20261016_093000.log".into(),
        classifier_rules_version: 1,
        profile_rules_version: 1,
    }
}

#[test]
fn renders_full_run() {
    let expected = "\
winmend repair report
=====================
Generated: 2026-10-16 09:30:00

System
------
Product: Windows 11 Pro
Edition: Professional
Build:   22631.3447

Actions
-------
Mode: Repair using local install media
1. DISM /CheckHealth
   Command:   DISM.exe /Online /Cleanup-Image /CheckHealth
   Exit code: 0
   Output:    1 line(s)
2. DISM /ScanHealth
   Command:   DISM.exe /Online /Cleanup-Image /ScanHealth
   Exit code: 0
   Output:    2 line(s)
3. DISM /RestoreHealth
   Command:   DISM.exe /Online /Cleanup-Image /RestoreHealth /Source:WIM:D:/sources/install.wim:1 /LimitAccess
   Exit code: -2146498529
   Output:    1 line(s)
4. SFC /scannow
   Command:   sfc.exe /scannow
   Exit code: -
   Output:    0 line(s)

Repair Source
-------------
Local image: D:/sources/install.wim

DISM-equivalent Result
----------------------
Error 0x800f081f: source missing.

Reboot Required
---------------
Yes

Guidance Provided
-----------------
https://www.microsoft.com/software-download/windows11

Logs
----
C:/ProgramData/winmend/logs/repair_20261016_093000.log

Notes
-----
- Repair media must match the installed build (22631.3447) and edition (Professional).
- If a reboot is pending, restart before running the repair again.
- Raw DISM and SFC output is recorded in the log file above.
";
    assert_eq!(render_report_txt(&full_report()), expected);
}

#[test]
fn skipped_orchestration_uses_placeholder() {
    let mut report = full_report();
    report.source = RepairSource::None;
    report.stages = None;
    report.error_text = NO_MEDIA_ERROR_TEXT.to_string();
    report.error_category = None;
    report.reboot_pending = false;

    let text = render_report_txt(&report);
    assert!(text.contains("Actions\n-------\nMode: Repair using local install media\nNo repair stages were run.\n"));
    assert!(text.contains("DISM-equivalent Result\n----------------------\nNo install media found\n"));
    assert!(text.contains("Reboot Required\n---------------\nNo\n"));
    assert!(text.contains(
        "Repair Source\n-------------\nNone (no install media found; repair not run)\n"
    ));
    assert!(!text.contains("DISM resolves its own source"));
}

#[test]
fn missing_guidance_reads_not_required() {
    let mut report = full_report();
    report.guidance_url = None;
    let text = render_report_txt(&report);
    assert!(text.contains("Guidance Provided\n-----------------\nNot required\n"));
}

#[test]
fn rendering_is_idempotent() {
    let report = full_report();
    assert_eq!(render_report_txt(&report), render_report_txt(&report.clone()));
}

#[test]
fn sections_appear_in_fixed_order() {
    let text = render_report_txt(&full_report());
    let titles = [
        "\nSystem\n",
        "\nActions\n",
        "\nRepair Source\n",
        "\nDISM-equivalent Result\n",
        "\nReboot Required\n",
        "\nGuidance Provided\n",
        "\nLogs\n",
        "\nNotes\n",
    ];
    let positions: Vec<usize> = titles
        .iter()
        .map(|t| text.find(t).unwrap_or_else(|| panic!("missing section {:?}", t)))
        .collect();
    let mut sorted = positions.clone();
    sorted.sort();
    assert_eq!(positions, sorted);
}
