//! Path helpers for the Zellij plugin sandbox.
//!
//! Zellij mounts the host filesystem under `/host` (the cwd of the last focused
//! terminal, usually the user's home). Paths from configuration are written in
//! host terms and must be translated before use.

use std::path::PathBuf;

/// Returns the directory notepane writes its trace files to.
///
/// Resolves to `~/.local/share/zellij/notepane` on the host when Zellij was
/// started from the home directory.
///
/// ```
/// use notepane::infrastructure::get_data_dir;
///
/// assert_eq!(get_data_dir().to_str(), Some("/host/.local/share/zellij/notepane"));
/// ```
#[must_use]
pub fn get_data_dir() -> PathBuf {
    PathBuf::from("/host/.local/share/zellij").join("notepane")
}

/// Rewrites a `~`-relative host path into its sandbox location.
///
/// ```
/// use notepane::infrastructure::expand_tilde;
///
/// assert_eq!(expand_tilde("~/themes/dark.toml"), "/host/themes/dark.toml");
/// assert_eq!(expand_tilde("~"), "/host");
/// assert_eq!(expand_tilde("/etc/theme.toml"), "/etc/theme.toml");
/// ```
#[must_use]
pub fn expand_tilde(path: &str) -> String {
    if path.starts_with("~/") {
        path.replacen('~', "/host", 1)
    } else if path == "~" {
        "/host".to_string()
    } else {
        path.to_string()
    }
}
