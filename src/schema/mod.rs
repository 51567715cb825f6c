//! View schema: how nodes are presented beyond the default KEY/VALUE table.
//!
//! Schemas are JSON or TOML documents:
//!
//! ```toml
//! version = 1
//! title = "Repositories"
//!
//! [list]
//! title_field = "name"
//! subtitle_field = "description"
//! badge_fields = ["language"]
//!
//! [status]
//! title_field = "service"
//! wait_message = "Waiting for authorization"
//! done_behavior = "wait-for-key"
//! timeout = "2m"
//!
//! [[status.fields]]
//! label = "Code"
//! field = "user_code"
//!
//! [[status.actions]]
//! label = "Copy code"
//! type = "copy-value"
//! field = "user_code"
//! keys = { vim = "y", emacs = "alt+w", function = "f11" }
//! ```

pub mod duration;
pub mod models;

pub use models::{
    ActionKeys, ActionType, DetailConfig, DetailSection, DisplayField, DoneBehavior, ListConfig, SectionLayout,
    StatusAction, StatusConfig, VersionTag, ViewSchema,
};

use crate::domain::{Key, KeyMode, NestviewError, Result};
use std::path::Path;

impl ViewSchema {
    /// Loads a schema file, choosing TOML for a `.toml` extension and JSON otherwise.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or if
    /// [`validate`](Self::validate) rejects it.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let _span = tracing::debug_span!("load_schema", path = %path.display()).entered();

        let contents = std::fs::read_to_string(path)?;
        let is_toml = path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("toml"));
        let schema = if is_toml {
            Self::from_toml_str(&contents)?
        } else {
            Self::from_json_str(&contents)?
        };
        tracing::debug!(
            list = schema.list.is_some(),
            detail = schema.detail.is_some(),
            status = schema.status.is_some(),
            "schema loaded"
        );
        Ok(schema)
    }

    /// # Errors
    ///
    /// Returns a JSON error or a [`NestviewError::Schema`] validation error.
    pub fn from_json_str(contents: &str) -> Result<Self> {
        let schema: Self = serde_json::from_str(contents)?;
        schema.validate()?;
        Ok(schema)
    }

    /// # Errors
    ///
    /// Returns a TOML error or a [`NestviewError::Schema`] validation error.
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let schema: Self = toml::from_str(contents)?;
        schema.validate()?;
        Ok(schema)
    }

    /// Checks the constraints serde cannot express.
    ///
    /// # Errors
    ///
    /// Returns [`NestviewError::Schema`] naming the first offending entry.
    pub fn validate(&self) -> Result<()> {
        if let Some(list) = &self.list {
            if list.title_field.trim().is_empty() {
                return Err(NestviewError::Schema("list.title_field must not be empty".into()));
            }
        }
        if let Some(detail) = &self.detail {
            for section in &detail.sections {
                if section.title.trim().is_empty() {
                    return Err(NestviewError::Schema("detail section without a title".into()));
                }
            }
        }
        if let Some(status) = &self.status {
            for action in &status.actions {
                for mode in KeyMode::ALL {
                    if let Some(raw) = action.keys.for_mode(mode) {
                        raw.parse::<Key>().map_err(|e| {
                            NestviewError::Schema(format!("action '{}' {mode} key: {e}", action.label))
                        })?;
                    }
                }
            }
        }
        Ok(())
    }
}

impl ActionKeys {
    /// Raw key identifier for `mode`, if one is configured.
    #[must_use]
    pub fn for_mode(&self, mode: KeyMode) -> Option<&str> {
        match mode {
            KeyMode::Vim => self.vim.as_deref(),
            KeyMode::Emacs => self.emacs.as_deref(),
            KeyMode::Function => self.function.as_deref(),
        }
    }

    /// Parsed key for `mode`; unparseable identifiers yield `None`.
    #[must_use]
    pub fn key_for(&self, mode: KeyMode) -> Option<Key> {
        self.for_mode(mode).and_then(|raw| raw.parse().ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    const STATUS_JSON: &str = r#"{
        "version": "1",
        "status": {
            "title_field": "service",
            "wait_message": "Waiting for authorization",
            "done_behavior": "wait-for-key",
            "timeout": 30,
            "fields": [{"label": "Code", "field": "user_code"}],
            "actions": [{
                "label": "Copy code", "type": "copy-value", "field": "user_code",
                "keys": {"vim": "y", "emacs": "alt+w", "function": "f11"}
            }]
        }
    }"#;

    #[test]
    fn parses_status_schema_from_json() {
        let schema = ViewSchema::from_json_str(STATUS_JSON).unwrap();
        let status = schema.status.unwrap();
        assert_eq!(status.done_behavior, DoneBehavior::WaitForKey);
        assert_eq!(status.timeout, Some(Duration::from_secs(30)));
        assert_eq!(status.delay, Duration::from_millis(1500));
        assert_eq!(status.actions[0].kind, ActionType::CopyValue);
        assert_eq!(status.actions[0].keys.key_for(KeyMode::Emacs), Some(Key::Alt('w')));
    }

    #[test]
    fn parses_list_and_detail_from_toml() {
        let schema = ViewSchema::from_toml_str(
            r#"
            version = 2
            [list]
            title_field = "name"
            badge_fields = ["lang"]

            [detail]
            title_field = "name"
            hidden_fields = ["id"]
            [[detail.sections]]
            title = "Summary"
            fields = ["description"]
            layout = "paragraph"
            "#,
        )
        .unwrap();
        assert_eq!(schema.version, Some(VersionTag::Number(2)));
        assert_eq!(schema.list.unwrap().max_subtitle_lines, 2);
        assert_eq!(schema.detail.unwrap().sections[0].layout, SectionLayout::Paragraph);
    }

    #[test]
    fn rejects_bad_action_keys() {
        let bad = STATUS_JSON.replace("alt+w", "hyper+w");
        assert!(matches!(ViewSchema::from_json_str(&bad), Err(NestviewError::Schema(_))));
    }

    #[test]
    fn rejects_empty_list_title_field() {
        let err = ViewSchema::from_toml_str("[list]\ntitle_field = \"\"").unwrap_err();
        assert!(err.to_string().contains("title_field"));
    }
}
