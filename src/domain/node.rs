//! Data tree nodes, their structural kinds and path resolution.
//!
//! The browsed document is held as a [`serde_json::Value`] tree regardless of
//! its on-disk format. A focus node is addressed by a path expression and
//! classified by [`NodeKind`], whose coarser [`StructuralKind`] drives function
//! catalog filtering.

use crate::domain::error::{NestviewError, Result};
use crate::path::{self, Segment};
use serde_json::Value;
use std::io::Read;
use std::path::Path;

/// Concrete kind of a data node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Map,
    Array,
    String,
    Number,
    Bool,
    Null,
}

/// Structural kind used to decide which catalog functions apply to a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StructuralKind {
    Map,
    Array,
    Scalar,
}

impl NodeKind {
    /// Classifies a value.
    #[must_use]
    pub const fn of(value: &Value) -> Self {
        match value {
            Value::Object(_) => Self::Map,
            Value::Array(_) => Self::Array,
            Value::String(_) => Self::String,
            Value::Number(_) => Self::Number,
            Value::Bool(_) => Self::Bool,
            Value::Null => Self::Null,
        }
    }

    #[must_use]
    pub const fn structural(self) -> StructuralKind {
        match self {
            Self::Map => StructuralKind::Map,
            Self::Array => StructuralKind::Array,
            Self::String | Self::Number | Self::Bool | Self::Null => StructuralKind::Scalar,
        }
    }

    /// Short lowercase name, as used in catalog `applies_to` lists.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Map => "map",
            Self::Array => "array",
            Self::String => "string",
            Self::Number => "number",
            Self::Bool => "bool",
            Self::Null => "null",
        }
    }
}

/// Walks `root` along an addressing expression.
///
/// The expression is normalized first, so raw input such as `items.0.name`
/// resolves the same node as `_.items[0].name`. A key segment made of digits
/// also addresses an array element. Returns `None` when any step is missing.
#[must_use]
pub fn resolve<'a>(root: &'a Value, expr: &str) -> Option<&'a Value> {
    let normalized = path::normalized_form(expr);
    let mut node = root;
    for segment in path::parse_segments(&normalized) {
        node = match (&segment, node) {
            (Segment::Index(i), Value::Array(items)) => items.get(*i)?,
            (Segment::Key(k) | Segment::Quoted(k), Value::Object(map)) => map.get(k)?,
            (Segment::Index(i), Value::Object(map)) => map.get(&i.to_string())?,
            (Segment::Key(k) | Segment::Quoted(k), Value::Array(items)) => {
                items.get(k.parse::<usize>().ok()?)?
            }
            _ => return None,
        };
    }
    Some(node)
}

/// Evaluates complete expressions that are not plain paths.
///
/// Expression evaluation belongs to an external engine; the browser only
/// addresses and navigates. Implementations receive the document root and the
/// raw expression text.
pub trait Evaluator: std::fmt::Debug {
    /// Evaluates `expr` against `root`.
    ///
    /// # Errors
    ///
    /// Returns [`NestviewError::Evaluation`] when the expression is unsupported
    /// or fails.
    fn evaluate(&self, root: &Value, expr: &str) -> Result<Value>;
}

/// Evaluator that only understands pure addressing expressions.
#[derive(Debug, Default, Clone, Copy)]
pub struct PathEvaluator;

impl Evaluator for PathEvaluator {
    fn evaluate(&self, root: &Value, expr: &str) -> Result<Value> {
        if path::is_expression(expr) {
            return Err(NestviewError::Evaluation(format!(
                "no evaluator available for expression: {expr}"
            )));
        }
        resolve(root, expr)
            .cloned()
            .ok_or_else(|| NestviewError::Evaluation(format!("no such path: {}", path::display_form(expr))))
    }
}

/// Loads a data document from a file, or from stdin when `path` is `None` or `-`.
///
/// Files ending in `.toml` are parsed as TOML, everything else as JSON. Map key
/// order from the source document is preserved.
///
/// # Errors
///
/// Returns an error if the input cannot be read or parsed.
pub fn load_document(path: Option<&Path>) -> Result<Value> {
    let _span = tracing::debug_span!("load_document", path = ?path).entered();

    let (contents, is_toml) = match path {
        Some(p) if p.as_os_str() != "-" => {
            let contents = std::fs::read_to_string(p)?;
            let is_toml = p.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("toml"));
            (contents, is_toml)
        }
        _ => {
            let mut contents = String::new();
            std::io::stdin().read_to_string(&mut contents)?;
            (contents, false)
        }
    };

    parse_document(&contents, is_toml)
}

/// Parses document text as JSON or TOML.
///
/// # Errors
///
/// Returns a parse error from the selected format.
pub fn parse_document(contents: &str, is_toml: bool) -> Result<Value> {
    let value = if is_toml {
        let table: toml::Table = toml::from_str(contents)?;
        serde_json::to_value(table)?
    } else {
        serde_json::from_str(contents)?
    };
    tracing::debug!(kind = NodeKind::of(&value).name(), "document parsed");
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> Value {
        json!({
            "tasks": {
                "build-windows": { "status": "ok" },
                "items": [ { "name": "a" }, { "name": "b" } ]
            },
            "_internal": { "x": 1 },
            "0": "zero key"
        })
    }

    #[test]
    fn resolves_raw_and_canonical_paths() {
        let root = sample();
        assert_eq!(resolve(&root, "tasks.items.1.name"), Some(&json!("b")));
        assert_eq!(resolve(&root, "_.tasks.items[0].name"), Some(&json!("a")));
        assert_eq!(resolve(&root, "_.tasks[\"build-windows\"].status"), Some(&json!("ok")));
        assert_eq!(resolve(&root, "tasks.build-windows.status"), Some(&json!("ok")));
    }

    #[test]
    fn underscore_identifiers_are_not_the_root() {
        let root = sample();
        assert_eq!(resolve(&root, "_internal.x"), Some(&json!(1)));
        assert_eq!(resolve(&root, "_._internal.x"), Some(&json!(1)));
    }

    #[test]
    fn numeric_map_keys_resolve() {
        let root = sample();
        assert_eq!(resolve(&root, "_[\"0\"]"), Some(&json!("zero key")));
        assert_eq!(resolve(&root, "_[0]"), Some(&json!("zero key")));
    }

    #[test]
    fn root_and_missing_paths() {
        let root = sample();
        assert_eq!(resolve(&root, "_"), Some(&root));
        assert_eq!(resolve(&root, ""), Some(&root));
        assert_eq!(resolve(&root, "tasks.missing"), None);
        assert_eq!(resolve(&root, "tasks.items[9]"), None);
    }

    #[test]
    fn structural_kinds() {
        assert_eq!(NodeKind::of(&json!({})).structural(), StructuralKind::Map);
        assert_eq!(NodeKind::of(&json!([])).structural(), StructuralKind::Array);
        assert_eq!(NodeKind::of(&json!("s")).structural(), StructuralKind::Scalar);
        assert_eq!(NodeKind::of(&json!(null)).structural(), StructuralKind::Scalar);
    }

    #[test]
    fn path_evaluator_rejects_expressions() {
        let root = sample();
        let evaluator = PathEvaluator;
        assert!(evaluator.evaluate(&root, "has(_.tasks)").is_err());
        assert_eq!(evaluator.evaluate(&root, "tasks.items.0.name").ok(), Some(json!("a")));
    }

    #[test]
    fn parses_toml_documents() {
        let value = parse_document("[server]\nport = 8080\n", true).unwrap();
        assert_eq!(resolve(&value, "server.port"), Some(&json!(8080)));
    }
}
