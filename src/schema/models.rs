//! Serde models for the view schema.
//!
//! A schema tells the browser how to present a node beyond the default
//! KEY/VALUE table: as a list of records, as a sectioned detail page, or as a
//! status screen tracking an external operation. Field names are paths
//! relative to the presented node (`name`, `owner.login`, `tags[0]`).

use super::duration;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Schema version tag; written as a number or a string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum VersionTag {
    Number(u64),
    Text(String),
}

/// Root of a view schema document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewSchema {
    #[serde(default)]
    pub version: Option<VersionTag>,

    /// Icon shown before list collection titles.
    #[serde(default)]
    pub icon: Option<String>,

    /// Title for list collections.
    #[serde(default)]
    pub title: Option<String>,

    #[serde(default)]
    pub list: Option<ListConfig>,

    #[serde(default)]
    pub detail: Option<DetailConfig>,

    #[serde(default)]
    pub status: Option<StatusConfig>,
}

/// Presentation of an array of records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListConfig {
    pub title_field: String,

    #[serde(default)]
    pub subtitle_field: Option<String>,

    /// Subtitles are wrapped and cut after this many lines.
    #[serde(default = "default_subtitle_lines")]
    pub max_subtitle_lines: usize,

    /// Short values packed as `[badge]` markers after the title.
    #[serde(default)]
    pub badge_fields: Vec<String>,

    /// `field: value` pairs shown dimmed under each item.
    #[serde(default)]
    pub secondary_fields: Vec<String>,
}

const fn default_subtitle_lines() -> usize {
    2
}

/// How the fields of a detail section are laid out.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SectionLayout {
    /// `label: value` pairs.
    #[default]
    Inline,
    /// Label on its own line, value wrapped below it.
    Paragraph,
    /// Values (arrays flattened) shown as `[tag]` markers.
    Tags,
    /// Aligned two-column table.
    Table,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetailSection {
    pub title: String,

    #[serde(default)]
    pub fields: Vec<String>,

    #[serde(default)]
    pub layout: SectionLayout,
}

/// Presentation of a single record as a sectioned page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetailConfig {
    #[serde(default)]
    pub title_field: Option<String>,

    #[serde(default)]
    pub sections: Vec<DetailSection>,

    /// Fields never shown, not even under "Other".
    #[serde(default)]
    pub hidden_fields: Vec<String>,
}

/// What the status view does once the operation has finished.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DoneBehavior {
    /// Quit automatically after `delay`.
    #[default]
    #[serde(alias = "exit_after_delay")]
    ExitAfterDelay,
    /// Show "press any key" and quit on the next key press.
    #[serde(alias = "wait_for_key")]
    WaitForKey,
}

/// A labelled value shown on the status screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayField {
    pub label: String,
    pub field: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ActionType {
    #[serde(alias = "copy_value", alias = "copy")]
    CopyValue,
    #[serde(alias = "open_url", alias = "open")]
    OpenUrl,
}

/// Per-key-mode key identifiers for an action (`"y"`, `"alt+w"`, `"f11"`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionKeys {
    #[serde(default)]
    pub vim: Option<String>,
    #[serde(default)]
    pub emacs: Option<String>,
    #[serde(default)]
    pub function: Option<String>,
}

/// A side effect offered on the status screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusAction {
    pub label: String,

    #[serde(rename = "type")]
    pub kind: ActionType,

    /// Field whose value is copied or opened.
    pub field: String,

    #[serde(default)]
    pub keys: ActionKeys,
}

/// Presentation of an external long-running operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusConfig {
    #[serde(default)]
    pub title_field: Option<String>,

    /// Field holding an instruction shown while waiting.
    #[serde(default)]
    pub message_field: Option<String>,

    #[serde(default)]
    pub wait_message: Option<String>,

    /// Shown on success when the operation returns no message of its own,
    /// and on timeout.
    #[serde(default)]
    pub success_message: Option<String>,

    #[serde(default)]
    pub done_behavior: DoneBehavior,

    /// Delay before quitting with [`DoneBehavior::ExitAfterDelay`].
    #[serde(default = "default_delay", with = "duration")]
    pub delay: Duration,

    /// Deadline after which the operation is treated as finished.
    #[serde(default, with = "duration::option")]
    pub timeout: Option<Duration>,

    #[serde(default)]
    pub fields: Vec<DisplayField>,

    #[serde(default)]
    pub actions: Vec<StatusAction>,
}

const fn default_delay() -> Duration {
    Duration::from_millis(1500)
}

impl Default for StatusConfig {
    fn default() -> Self {
        Self {
            title_field: None,
            message_field: None,
            wait_message: None,
            success_message: None,
            done_behavior: DoneBehavior::default(),
            delay: default_delay(),
            timeout: None,
            fields: vec![],
            actions: vec![],
        }
    }
}
