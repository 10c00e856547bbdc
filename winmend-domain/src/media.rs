//! Local install-media discovery.

use camino::{Utf8Path, Utf8PathBuf};
use glob::{MatchOptions, Pattern, glob_with};
use tracing::debug;

/// Directories searched for an install image, in priority order.
pub const DEFAULT_MEDIA_DIRS: [&str; 3] = [r"C:\ISO", r"D:\sources", r"E:\sources"];

pub const DEFAULT_IMAGE_EXTENSION: &str = "wim";

/// Return the first install image found under the candidate directories.
///
/// Directories are tried in order; within a directory the first match in
/// glob enumeration order wins. Missing or unreadable directories and entries
/// count as "not found".
pub fn locate_install_image(dirs: &[Utf8PathBuf], extension: &str) -> Option<Utf8PathBuf> {
    dirs.iter().find_map(|dir| first_image_in(dir, extension))
}

fn first_image_in(dir: &Utf8Path, extension: &str) -> Option<Utf8PathBuf> {
    if !dir.is_dir() {
        debug!(dir = %dir, "media directory not present");
        return None;
    }

    let pattern = format!("{}/**/*.{}", Pattern::escape(dir.as_str()), extension);
    let opts = MatchOptions {
        case_sensitive: false,
        require_literal_separator: false,
        require_literal_leading_dot: false,
    };

    let entries = match glob_with(&pattern, opts) {
        Ok(entries) => entries,
        Err(e) => {
            debug!(pattern = %pattern, error = %e, "invalid media search pattern");
            return None;
        }
    };

    for entry in entries {
        match entry {
            Ok(path) if path.is_file() => match Utf8PathBuf::from_path_buf(path) {
                Ok(found) => {
                    debug!(image = %found, "found install image");
                    return Some(found);
                }
                Err(path) => debug!(path = %path.display(), "skipping non-UTF-8 path"),
            },
            Ok(_) => {}
            Err(e) => debug!(error = %e, "skipping unreadable media entry"),
        }
    }

    debug!(dir = %dir, "no install image in directory");
    None
}
