//! Embeddable core library for winmend.
//!
//! Provides a clap-free, I/O-abstracted entry point suitable for linking
//! into a technician toolkit or other host process.
//!
//! # Port traits
//!
//! All I/O is abstracted behind port traits in [`ports`] and in
//! `winmend-domain`:
//! - [`IdentitySource`]: read OS identity fields
//! - [`MarkerProbe`]: check reboot-pending markers
//! - [`ToolRunner`](ports::ToolRunner): run DISM / SFC and capture output
//! - [`UrlLauncher`](ports::UrlLauncher): open a URL in the default browser
//! - [`WritePort`](ports::WritePort): write files and create directories
//!
//! The [`adapters`] module provides default Windows-backed implementations.
//!
//! # Entry points
//!
//! - [`run_repair`](pipeline::run_repair): profile, repair, classify, aggregate
//! - [`write_report_artifacts`](pipeline::write_report_artifacts): persist the report

pub mod adapters;
pub mod orchestrator;
pub mod pipeline;
pub mod ports;
pub mod settings;

// Re-export the domain ports so callers don't need winmend-domain directly.
pub use winmend_domain::{IdentitySource, MarkerProbe, ProfileError};
