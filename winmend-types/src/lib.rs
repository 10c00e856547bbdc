//! Shared run-state types for the winmend workspace.
//!
//! # Design constraints
//! - Every value here is produced once by one component and read by the rest.
//! - The report types are serialized to disk; prefer adding optional fields
//!   over changing semantics.

pub mod classification;
pub mod descriptor;
pub mod invocation;
pub mod mode;
pub mod report;
pub mod source;

pub use classification::{Classification, ErrorCategory};
pub use descriptor::OsDescriptor;
pub use invocation::{Stage, ToolInvocationResult};
pub use mode::RepairMode;
pub use report::TaskReport;
pub use source::RepairSource;

/// Schema identifiers.
pub mod schema {
    pub const WINMEND_REPORT_V1: &str = "winmend.report.v1";
}
