//! Platform directories and user-supplied path handling.
//!
//! Directory lookup goes through `dirs`, so the usual platform conventions
//! apply (`$XDG_DATA_HOME`, `~/Library/Application Support`, `%APPDATA%`).
//! When the platform has no such directory the current directory stands in.

use std::path::PathBuf;

/// Directory name used under the platform data and config roots.
pub const APP_DIR: &str = "nestview";

/// Directory for trace files: `<data_dir>/nestview`.
#[must_use]
pub fn data_dir() -> PathBuf {
    dirs::data_dir().unwrap_or_else(|| PathBuf::from(".")).join(APP_DIR)
}

/// Directory holding `config.toml`: `<config_dir>/nestview`.
#[must_use]
pub fn config_dir() -> PathBuf {
    dirs::config_dir().unwrap_or_else(|| PathBuf::from(".")).join(APP_DIR)
}

/// Default location of the configuration file.
#[must_use]
pub fn config_file() -> PathBuf {
    config_dir().join("config.toml")
}

/// Expands a leading `~` to the home directory.
///
/// Paths without a leading tilde, and all paths when the home directory is
/// unknown, are returned unchanged.
///
/// # Examples
///
/// ```
/// use nestview::infrastructure::expand_tilde;
///
/// assert!(expand_tilde("~/data.json").ends_with("data.json"));
/// assert_eq!(expand_tilde("/abs/data.json"), std::path::PathBuf::from("/abs/data.json"));
/// ```
#[must_use]
pub fn expand_tilde(path: &str) -> PathBuf {
    let home = dirs::home_dir();
    match (path, home) {
        ("~", Some(home)) => home,
        (p, Some(home)) if p.starts_with("~/") => home.join(&p[2..]),
        (p, _) => PathBuf::from(p),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dirs_end_in_app_name() {
        assert!(data_dir().ends_with(APP_DIR));
        assert!(config_file().ends_with("nestview/config.toml"));
    }

    #[test]
    fn only_leading_tilde_expands() {
        assert_eq!(expand_tilde("a/~/b"), PathBuf::from("a/~/b"));
        assert_eq!(expand_tilde("~user/x"), PathBuf::from("~user/x"));
    }
}
