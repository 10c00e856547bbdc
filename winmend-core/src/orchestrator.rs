//! Staged DISM / SFC invocation.
//!
//! Stages run strictly in order, `CheckHealth → ScanHealth → RestoreHealth →
//! FileCheck`, and every stage runs regardless of how the previous one went.
//! Only the RestoreHealth output is classified.

use crate::ports::ToolRunner;
use crate::settings::ToolPaths;
use tracing::{info, warn};
use winmend_domain::classify_restore_output;
use winmend_types::{Classification, RepairSource, Stage, ToolInvocationResult};

/// Argument that points RestoreHealth at an explicit source.
pub const SOURCE_ARG_PREFIX: &str = "/Source:";
/// Flag that stops RestoreHealth from falling back to Windows Update.
pub const LIMIT_ACCESS_FLAG: &str = "/LimitAccess";

/// Result bundle of a full orchestration.
#[derive(Debug, Clone)]
pub struct RepairOutcome {
    pub stages: Vec<ToolInvocationResult>,
    pub classification: Classification,
}

pub struct RepairOrchestrator<'a> {
    runner: &'a dyn ToolRunner,
    tools: &'a ToolPaths,
}

impl<'a> RepairOrchestrator<'a> {
    pub fn new(runner: &'a dyn ToolRunner, tools: &'a ToolPaths) -> Self {
        Self { runner, tools }
    }

    /// Program and arguments for one stage.
    pub fn stage_command(&self, stage: Stage, source: &RepairSource) -> (String, Vec<String>) {
        let dism = |verb: &str| {
            ["/Online", "/Cleanup-Image", verb]
                .iter()
                .map(|s| s.to_string())
                .collect::<Vec<_>>()
        };

        match stage {
            Stage::CheckHealth => (self.tools.dism.clone(), dism("/CheckHealth")),
            Stage::ScanHealth => (self.tools.dism.clone(), dism("/ScanHealth")),
            Stage::RestoreHealth => {
                let mut args = dism("/RestoreHealth");
                if let RepairSource::LocalImage(path) = source {
                    args.push(format!("{}WIM:{}:1", SOURCE_ARG_PREFIX, path));
                    args.push(LIMIT_ACCESS_FLAG.to_string());
                }
                (self.tools.dism.clone(), args)
            }
            Stage::FileCheck => (self.tools.sfc.clone(), vec!["/scannow".to_string()]),
        }
    }

    /// Run every stage in order and classify the RestoreHealth output.
    pub fn run(&self, source: &RepairSource) -> RepairOutcome {
        let stages: Vec<ToolInvocationResult> = Stage::ALL
            .iter()
            .map(|stage| self.run_stage(*stage, source))
            .collect();

        let restore_text = stages
            .iter()
            .find(|r| r.stage == Stage::RestoreHealth)
            .map(ToolInvocationResult::output_text)
            .unwrap_or_default();
        let classification = classify_restore_output(&restore_text);
        info!(category = ?classification.category, "classified RestoreHealth output");

        RepairOutcome {
            stages,
            classification,
        }
    }

    fn run_stage(&self, stage: Stage, source: &RepairSource) -> ToolInvocationResult {
        let (program, args) = self.stage_command(stage, source);
        let command_line = format_command_line(&program, &args);
        info!(stage = stage.label(), command = %command_line, "starting stage");

        let (lines, exit_code) = match self.runner.run(&program, &args) {
            Ok(output) => (output.lines, output.exit_code),
            Err(e) => {
                warn!(stage = stage.label(), error = %e, "tool could not be launched");
                (vec![format!("failed to launch {}: {:#}", program, e)], None)
            }
        };

        for line in &lines {
            info!(stage = stage.label(), "{}", line);
        }
        info!(stage = stage.label(), exit_code = ?exit_code, lines = lines.len(), "stage finished");

        ToolInvocationResult {
            stage,
            command_line,
            lines,
            exit_code,
        }
    }
}

/// Render a command line for logs and reports, quoting arguments with spaces.
pub fn format_command_line(program: &str, args: &[String]) -> String {
    std::iter::once(program)
        .chain(args.iter().map(String::as_str))
        .map(|part| {
            if part.contains(char::is_whitespace) {
                format!("\"{}\"", part)
            } else {
                part.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::ProcessOutput;
    use std::cell::RefCell;
    use winmend_types::ErrorCategory;

    /// Records every invocation and answers from a per-program script.
    #[derive(Default)]
    struct ScriptedRunner {
        calls: RefCell<Vec<(String, Vec<String>)>>,
        restore_output: Vec<String>,
        fail_program: Option<String>,
    }

    impl ToolRunner for ScriptedRunner {
        fn run(&self, program: &str, args: &[String]) -> anyhow::Result<ProcessOutput> {
            self.calls
                .borrow_mut()
                .push((program.to_string(), args.to_vec()));
            if self.fail_program.as_deref() == Some(program) {
                anyhow::bail!("program not found");
            }
            let lines = if args.iter().any(|a| a == "/RestoreHealth") {
                self.restore_output.clone()
            } else {
                vec![format!("{} ok", program)]
            };
            Ok(ProcessOutput {
                lines,
                exit_code: Some(0),
            })
        }
    }

    fn restore_args(runner: &ScriptedRunner) -> Vec<String> {
        runner
            .calls
            .borrow()
            .iter()
            .find(|(_, args)| args.iter().any(|a| a == "/RestoreHealth"))
            .map(|(_, args)| args.clone())
            .expect("restore invocation")
    }

    #[test]
    fn runs_all_stages_in_order() {
        let runner = ScriptedRunner::default();
        let tools = ToolPaths::default();
        let outcome = RepairOrchestrator::new(&runner, &tools).run(&RepairSource::None);

        let stages: Vec<Stage> = outcome.stages.iter().map(|s| s.stage).collect();
        assert_eq!(stages, Stage::ALL.to_vec());

        let calls = runner.calls.borrow();
        assert_eq!(calls.len(), 4);
        assert_eq!(calls[0].1.last().map(String::as_str), Some("/CheckHealth"));
        assert_eq!(calls[1].1.last().map(String::as_str), Some("/ScanHealth"));
        assert_eq!(calls[3].0, "sfc.exe");
        assert_eq!(calls[3].1, vec!["/scannow".to_string()]);
    }

    #[test]
    fn no_source_never_passes_source_or_limit_access() {
        let runner = ScriptedRunner::default();
        let tools = ToolPaths::default();
        RepairOrchestrator::new(&runner, &tools).run(&RepairSource::None);

        let args = restore_args(&runner);
        assert!(!args.iter().any(|a| a.starts_with(SOURCE_ARG_PREFIX)));
        assert!(!args.iter().any(|a| a == LIMIT_ACCESS_FLAG));
    }

    #[test]
    fn local_image_passes_source_and_limit_access() {
        let runner = ScriptedRunner::default();
        let tools = ToolPaths::default();
        let source = RepairSource::LocalImage("D:/sources/install.wim".into());
        RepairOrchestrator::new(&runner, &tools).run(&source);

        let args = restore_args(&runner);
        assert!(args.contains(&"/Source:WIM:D:/sources/install.wim:1".to_string()));
        assert!(args.contains(&LIMIT_ACCESS_FLAG.to_string()));
    }

    #[test]
    fn classification_uses_restore_output_only() {
        let runner = ScriptedRunner {
            restore_output: vec!["Error: 0x800f0906".to_string()],
            ..Default::default()
        };
        let tools = ToolPaths::default();
        let outcome = RepairOrchestrator::new(&runner, &tools).run(&RepairSource::None);
        assert_eq!(
            outcome.classification.category,
            ErrorCategory::UpdateServiceUnavailable
        );
    }

    #[test]
    fn file_check_failure_text_is_not_classified() {
        // SFC failing to launch must not influence the category.
        let runner = ScriptedRunner {
            restore_output: vec!["The restore operation completed successfully.".to_string()],
            fail_program: Some("sfc.exe".to_string()),
            ..Default::default()
        };
        let tools = ToolPaths::default();
        let outcome = RepairOrchestrator::new(&runner, &tools).run(&RepairSource::None);
        assert_eq!(outcome.classification.category, ErrorCategory::Undetected);
    }

    #[test]
    fn launch_failure_is_recorded_and_sequence_continues() {
        let runner = ScriptedRunner {
            fail_program: Some("DISM.exe".to_string()),
            ..Default::default()
        };
        let tools = ToolPaths::default();
        let outcome = RepairOrchestrator::new(&runner, &tools).run(&RepairSource::None);

        assert_eq!(outcome.stages.len(), 4);
        let check = &outcome.stages[0];
        assert_eq!(check.exit_code, None);
        assert!(check.lines[0].starts_with("failed to launch DISM.exe"));
        assert_eq!(outcome.stages[3].lines, vec!["sfc.exe ok".to_string()]);
    }

    #[test]
    fn command_line_quotes_arguments_with_spaces() {
        let args = vec![
            "/RestoreHealth".to_string(),
            "/Source:WIM:C:\\My ISO\\install.wim:1".to_string(),
        ];
        assert_eq!(
            format_command_line("DISM.exe", &args),
            "DISM.exe /RestoreHealth \"/Source:WIM:C:\\My ISO\\install.wim:1\""
        );
    }
}
