//! Classification of RestoreHealth output into a diagnostic category.

use winmend_types::{Classification, ErrorCategory};

/// Bumped whenever a rule is added, removed or reordered.
pub const CLASSIFIER_RULES_VERSION: u32 = 1;

/// One ordered classifier rule: a case-insensitive needle and its outcome.
#[derive(Debug, Clone, Copy)]
pub struct ClassifierRule {
    pub needle: &'static str,
    pub category: ErrorCategory,
    pub message: &'static str,
}

impl ClassifierRule {
    pub fn classification(&self) -> Classification {
        Classification {
            category: self.category,
            message: self.message,
        }
    }
}

/// Ordered rules; the first needle found in the output wins.
pub static CLASSIFIER_RULES: &[ClassifierRule] = &[
    ClassifierRule {
        needle: "0x800f081f",
        category: ErrorCategory::KnownSourceMissing,
        message: "Error 0x800f081f: the repair source files could not be found. \
                  Use installation media that matches the installed Windows version, \
                  edition and build exactly.",
    },
    ClassifierRule {
        needle: "0x800f0906",
        category: ErrorCategory::UpdateServiceUnavailable,
        message: "Error 0x800f0906: the source files could not be downloaded. \
                  Windows Update is unreachable; check connectivity or repair from local media.",
    },
    ClassifierRule {
        needle: "source files could not be found",
        category: ErrorCategory::GenericSourceMissing,
        message: "The source files could not be found. \
                  Repair again using local installation media.",
    },
];

/// Fallback when no rule matches.
pub const UNDETECTED: Classification = Classification {
    category: ErrorCategory::Undetected,
    message: "No known failure pattern detected - review the raw tool output in the log file.",
};

/// Classify the combined RestoreHealth output text.
pub fn classify_restore_output(text: &str) -> Classification {
    let haystack = text.to_ascii_lowercase();
    CLASSIFIER_RULES
        .iter()
        .find(|rule| haystack.contains(rule.needle))
        .map(ClassifierRule::classification)
        .unwrap_or(UNDETECTED)
}
