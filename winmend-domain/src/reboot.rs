use crate::ports::MarkerProbe;
use tracing::debug;

/// Registry keys whose presence means a restart is pending.
pub const REBOOT_MARKERS: [&str; 2] = [
    r"HKLM\SOFTWARE\Microsoft\Windows\CurrentVersion\Component Based Servicing\RebootPending",
    r"HKLM\SOFTWARE\Microsoft\Windows\CurrentVersion\WindowsUpdate\Auto Update\RebootRequired",
];

/// True if any marker exists; false only if none does.
pub fn reboot_pending(probe: &dyn MarkerProbe, markers: &[String]) -> bool {
    markers.iter().any(|marker| {
        let present = probe.exists(marker);
        debug!(marker = %marker, present, "checked reboot marker");
        present
    })
}
