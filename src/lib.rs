//! nestview: an interactive terminal browser for nested structured data.
//!
//! nestview loads a JSON or TOML document and lets you walk it node by node:
//! - KEY / VALUE table of the focused node with vim, emacs or function-key bindings
//! - Path expression bar with context- and type-aware completion
//! - Schema-driven custom views: item lists, detail pages and a status screen
//!   that follows an external long-running operation
//! - Themes, color-free output and file-based OpenTelemetry tracing

#![allow(clippy::multiple_crate_versions)]

//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │  Terminal host (main.rs)                            │  ← crossterm loop
//! └─────────────────────────────────────────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Application Layer (app/)                           │  ← State machine
//! │  - Event handling and key routing                   │
//! │  - Action requests for the host                     │
//! │  - View model computation                           │
//! └─────────────────────────────────────────────────────┘
//!         │                    │                    │
//! ┌───────────────┐   ┌───────────────┐   ┌───────────────┐
//! │ UI Layer      │   │ Views         │   │ Worker Layer  │
//! │ (ui/)         │   │ (views/)      │   │ (worker/)     │
//! │ - Rendering   │   │ - List        │   │ - Completion  │
//! │ - Theming     │   │ - Detail      │   │   channel     │
//! │ - Components  │   │ - Status      │   │ - Timers      │
//! └───────────────┘   └───────────────┘   └───────────────┘
//!         │                    │                    │
//! ┌─────────────────────────────────────────────────────┐
//! │  Addressing, Completion, Schema & Domain            │
//! │  - Path forms (path/)                               │
//! │  - Suggestions and cycling (completion/)            │
//! │  - View schema models (schema/)                     │
//! │  - Keys, key modes, nodes, errors (domain/)         │
//! └─────────────────────────────────────────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Infrastructure & Observability                     │
//! │  - Platform directories (infrastructure/)           │
//! │  - OpenTelemetry file export (observability/)       │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! # Configuration
//!
//! Settings come from `<config_dir>/nestview/config.toml`, overridden by
//! command-line flags:
//!
//! ```toml
//! key_mode = "emacs"
//! theme = "catppuccin-latte"
//! catalog = "~/.config/nestview/functions.toml"
//! trace_level = "debug"
//! ```
//!
//! Setting the `NO_COLOR` environment variable disables color output.
//!
//! # Example
//!
//! ```
//! use nestview::{handle_event, initialize, Config, Event};
//! use nestview::domain::Key;
//! use serde_json::json;
//!
//! let mut state = initialize(&Config::default(), json!({"items": [{"name": "a"}]}))?;
//! for key in [Key::Char('l'), Key::Char('l')] {
//!     let (_rerender, _actions) = handle_event(&mut state, &Event::Key(key))?;
//! }
//! assert_eq!(state.current_path, "_.items[0]");
//! # Ok::<(), nestview::NestviewError>(())
//! ```

pub mod app;
pub mod completion;
pub mod domain;
pub mod infrastructure;
pub mod path;
pub mod schema;
pub mod ui;
pub mod views;
pub mod worker;

pub mod observability;

pub use app::{handle_event, Action, AppState, Event, InputMode};
pub use domain::{KeyMode, NestviewError, Result};
pub use ui::Theme;

use completion::FunctionCatalog;
use schema::ViewSchema;
use serde::Deserialize;
use serde_json::Value;
use std::path::{Path, PathBuf};

/// User configuration.
///
/// Every field is optional in the file; command-line flags override what the
/// file sets.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub key_mode: KeyMode,

    /// Built-in theme name. Ignored if `theme_file` is set.
    pub theme: Option<String>,

    /// Path to a TOML theme file. See [`ui::theme`] for the format.
    pub theme_file: Option<String>,

    /// Function catalog replacing the built-in one.
    pub catalog: Option<String>,

    /// View schema applied to every document.
    pub schema: Option<String>,

    pub no_color: bool,

    /// `trace`, `debug`, `info`, `warn` or `error`. Default: `"info"`
    pub trace_level: Option<String>,
}

impl Config {
    /// # Errors
    ///
    /// Returns a TOML error for malformed text or unknown keys.
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Loads the configuration file.
    ///
    /// An explicit `path` must exist. Without one, the default location is
    /// tried and a missing file yields the defaults.
    ///
    /// # Errors
    ///
    /// Returns [`NestviewError::Config`] naming the file if it cannot be
    /// read or parsed.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let (path, required) = match path {
            Some(p) => (p.to_path_buf(), true),
            None => (infrastructure::config_file(), false),
        };
        let _span = tracing::debug_span!("load_config", path = %path.display()).entered();

        let contents = match std::fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(e) if !required && e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!("no config file, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(NestviewError::Config(format!("{}: {e}", path.display()))),
        };
        Self::from_toml_str(&contents).map_err(|e| NestviewError::Config(format!("{}: {e}", path.display())))
    }

    /// Applies the `NO_COLOR` convention: any non-empty value disables color.
    #[must_use]
    pub fn with_env(mut self) -> Self {
        if std::env::var_os("NO_COLOR").is_some_and(|v| !v.is_empty()) {
            self.no_color = true;
        }
        self
    }

    #[must_use]
    pub fn trace_level(&self) -> &str {
        self.trace_level.as_deref().unwrap_or("info")
    }

    /// Theme from `theme_file`, else `theme`, else the default.
    ///
    /// A theme that fails to load is logged and replaced by the default so a
    /// broken theme never prevents browsing.
    #[must_use]
    pub fn load_theme(&self) -> Theme {
        if let Some(file) = &self.theme_file {
            return Theme::from_file(infrastructure::expand_tilde(file)).unwrap_or_else(|e| {
                tracing::warn!(theme_file = %file, error = %e, "failed to load theme file, using default");
                Theme::default()
            });
        }
        self.theme.as_ref().map_or_else(Theme::default, |name| {
            Theme::from_name(name).unwrap_or_else(|| {
                tracing::warn!(theme = %name, "unknown theme, using default");
                Theme::default()
            })
        })
    }

    /// # Errors
    ///
    /// Returns the error from reading or parsing the catalog file.
    pub fn load_catalog(&self) -> Result<FunctionCatalog> {
        match &self.catalog {
            Some(file) => FunctionCatalog::from_file(expand(file)),
            None => FunctionCatalog::builtin(),
        }
    }

    /// # Errors
    ///
    /// Returns the error from reading, parsing or validating the schema file.
    pub fn load_schema(&self) -> Result<Option<ViewSchema>> {
        self.schema.as_deref().map(|file| ViewSchema::from_file(expand(file))).transpose()
    }
}

fn expand(path: &str) -> PathBuf {
    infrastructure::expand_tilde(path)
}

/// Builds the application state for browsing `root` under `config`.
///
/// # Errors
///
/// Returns an error if the configured catalog or schema cannot be loaded.
pub fn initialize(config: &Config, root: Value) -> Result<AppState> {
    let _span = tracing::debug_span!("initialize").entered();

    let state = AppState::new(root, config.load_theme())
        .with_schema(config.load_schema()?)
        .with_catalog(config.load_catalog()?)
        .with_key_mode(config.key_mode)
        .with_color(!config.no_color);

    tracing::debug!(key_mode = %config.key_mode, color = !config.no_color, "nestview initialized");
    Ok(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn parses_partial_config() {
        let config = Config::from_toml_str("key_mode = \"function\"\nno_color = true").unwrap();
        assert_eq!(config.key_mode, KeyMode::Function);
        assert!(config.no_color);
        assert_eq!(config.trace_level(), "info");
        assert!(Config::from_toml_str("colour = true").is_err());
    }

    #[test]
    fn explicit_missing_config_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::load(Some(&dir.path().join("absent.toml"))).unwrap_err();
        assert!(matches!(err, NestviewError::Config(_)));
    }

    #[test]
    fn loads_config_file_and_schema() {
        let dir = tempfile::tempdir().unwrap();
        let schema_path = dir.path().join("schema.toml");
        std::fs::write(&schema_path, "[list]\ntitle_field = \"name\"\n").unwrap();

        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "theme = \"plain\"\nschema = \"{}\"", schema_path.display()).unwrap();
        let config = Config::load(Some(file.path())).unwrap();

        assert_eq!(config.load_theme().name, "plain");
        assert!(config.load_schema().unwrap().unwrap().list.is_some());
    }

    #[test]
    fn unknown_theme_falls_back() {
        let config = Config {
            theme: Some("neon".into()),
            ..Config::default()
        };
        assert_eq!(config.load_theme(), Theme::default());
    }
}
