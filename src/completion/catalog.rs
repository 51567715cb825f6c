//! Function catalog consumed by the completion engine.
//!
//! The catalog's content is data: an embedded default list (see
//! `catalog/functions.toml`) that a user file can replace. The engine only
//! needs three things from each entry: its name, which structural kinds it
//! applies to, and whether it is called globally (`fn(expr)`) or as a method
//! (`expr.fn(...)`).
//!
//! # TOML Format
//!
//! ```toml
//! [[function]]
//! name = "exists"
//! usage = "list.exists(x, predicate) -> bool"
//! description = "True when any element satisfies the predicate"
//! applies_to = ["array", "map"]
//! ```

use crate::domain::{NestviewError, Result, StructuralKind};
use regex::Regex;
use serde::Deserialize;
use std::path::Path;
use std::sync::OnceLock;

const BUILTIN_CATALOG: &str = include_str!("../../catalog/functions.toml");

/// How a function is inserted into the expression bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CallStyle {
    /// Wraps the base expression: `fn(expr)`.
    Global,
    /// Called on the base expression: `expr.fn()`.
    Method,
}

/// One catalog entry.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct FunctionEntry {
    pub name: String,

    /// Usage hint, e.g. `size(value) -> int` or `list.exists(x, p) -> bool`.
    #[serde(default)]
    pub usage: String,

    #[serde(default)]
    pub description: String,

    /// Structural kinds this function applies to; empty or `any` means all.
    #[serde(default)]
    pub applies_to: Vec<String>,
}

fn receiver_call_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^\s*[A-Za-z_][A-Za-z0-9_<>]*\s*\.\s*[A-Za-z_][A-Za-z0-9_]*\s*\(")
            .expect("receiver call pattern should always compile")
    })
}

impl FunctionEntry {
    /// Classifies the entry from its usage hint, falling back to the description.
    ///
    /// Only a receiver-dot call pattern (`receiver.fn(`) makes a method.
    #[must_use]
    pub fn call_style(&self) -> CallStyle {
        let hint = if self.usage.trim().is_empty() {
            &self.description
        } else {
            &self.usage
        };
        if receiver_call_pattern().is_match(hint) {
            CallStyle::Method
        } else {
            CallStyle::Global
        }
    }

    /// Returns `true` if the entry is offered for nodes of `kind`.
    #[must_use]
    pub fn applies_to_kind(&self, kind: StructuralKind) -> bool {
        if self.applies_to.is_empty() {
            return true;
        }
        self.applies_to.iter().any(|declared| {
            match declared.trim().to_ascii_lowercase().as_str() {
                "any" | "*" => true,
                "map" | "object" => kind == StructuralKind::Map,
                "array" | "list" => kind == StructuralKind::Array,
                "scalar" | "string" | "number" | "int" | "double" | "bool" | "null" => {
                    kind == StructuralKind::Scalar
                }
                _ => false,
            }
        })
    }
}

#[derive(Debug, Deserialize)]
struct CatalogFile {
    #[serde(default, rename = "function")]
    functions: Vec<FunctionEntry>,
}

/// Ordered set of completable functions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FunctionCatalog {
    entries: Vec<FunctionEntry>,
}

impl FunctionCatalog {
    /// Catalog with no functions; completion offers keys and indices only.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// The catalog compiled into the binary.
    ///
    /// # Errors
    ///
    /// Returns [`NestviewError::Catalog`] if the embedded TOML is malformed.
    pub fn builtin() -> Result<Self> {
        Self::from_toml_str(BUILTIN_CATALOG)
    }

    /// Parses a catalog from TOML text.
    ///
    /// Entries with an empty name are dropped.
    ///
    /// # Errors
    ///
    /// Returns [`NestviewError::Catalog`] when the text is not a valid catalog.
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let file: CatalogFile =
            toml::from_str(contents).map_err(|e| NestviewError::Catalog(format!("invalid catalog: {e}")))?;
        let entries: Vec<FunctionEntry> = file
            .functions
            .into_iter()
            .filter(|entry| !entry.name.trim().is_empty())
            .collect();
        tracing::debug!(count = entries.len(), "function catalog parsed");
        Ok(Self { entries })
    }

    /// Loads a user catalog file.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the file cannot be read, or
    /// [`NestviewError::Catalog`] if it cannot be parsed.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    #[must_use]
    pub fn from_entries(entries: Vec<FunctionEntry>) -> Self {
        Self { entries }
    }

    #[must_use]
    pub fn entries(&self) -> &[FunctionEntry] {
        &self.entries
    }

    /// Entries applicable to a node of `kind`, in catalog order.
    pub fn for_kind(&self, kind: StructuralKind) -> impl Iterator<Item = &FunctionEntry> {
        self.entries.iter().filter(move |entry| entry.applies_to_kind(kind))
    }
}
