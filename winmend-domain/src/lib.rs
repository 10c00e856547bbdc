//! Domain logic: turn raw platform facts and tool output into decisions.
//!
//! This crate owns *what* the run should conclude (OS label, repair source,
//! error category, guidance URL). It does not own *how* tools are launched;
//! that's the `winmend-core` crate.

mod classify;
mod guidance;
mod media;
mod ports;
mod profile;
mod reboot;

pub use classify::{
    CLASSIFIER_RULES, CLASSIFIER_RULES_VERSION, ClassifierRule, UNDETECTED, classify_restore_output,
};
pub use guidance::{DEFAULT_GUIDANCE_URL, GUIDANCE_RULES, GuidanceRule, guidance_url};
pub use media::{DEFAULT_IMAGE_EXTENSION, DEFAULT_MEDIA_DIRS, locate_install_image};
pub use ports::{IdentitySource, MarkerProbe};
pub use profile::{
    PROFILE_RULES_VERSION, ProfileError, SERVER_LABELS, ServerLabel, WINDOWS_11_MIN_BUILD,
    identity_fields, normalize_product_name, profile_os,
};
pub use reboot::{REBOOT_MARKERS, reboot_pending};
