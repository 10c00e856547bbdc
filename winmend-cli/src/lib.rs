//! Library half of the `winmend` binary: config loading, the interactive
//! menu and logging setup.

pub mod config;
pub mod logging;
pub mod menu;
