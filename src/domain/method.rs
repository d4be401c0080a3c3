// Method node types for calldrawer.
// A Method is a node in the displayed graph; a MethodListItem is an index
// entry used only for selection and search.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A formal argument of a method.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodArgument {
    pub name: String,
    #[serde(rename = "type")]
    pub type_name: String,
}

/// A node in the method graph. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Method {
    /// Unique, stable across the whole graph.
    pub id: String,
    pub name: String,
    pub declaring_class: String,
    pub arguments: Vec<MethodArgument>,
}

/// A lightweight index entry for method selection. Not a graph node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MethodListItem {
    pub method_id: String,
    pub group_name: String,
    pub sub_group_name: String,
    pub name: String,
    #[serde(default)]
    pub deprecated: bool,
}

/// Structured form of a method id: `class#method(paramType,paramType)`.
///
/// Graph payloads carry ids as opaque strings; this type exists to derive
/// short display labels. Ids that do not match the format stay opaque.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodId {
    pub class_name: String,
    pub method_name: String,
    pub param_types: Vec<String>,
}

impl MethodId {
    pub fn parse(method_id: &str) -> Option<MethodId> {
        let hash = method_id.find('#')?;
        let open = method_id[hash..].find('(')? + hash;
        if !method_id.ends_with(')') || method_id.len() < open + 2 {
            return None;
        }
        let class_name = method_id[..hash].to_string();
        let method_name = method_id[hash + 1..open].to_string();
        if class_name.is_empty() || method_name.is_empty() {
            return None;
        }
        let param_types = method_id[open + 1..method_id.len() - 1]
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();
        Some(MethodId {
            class_name,
            method_name,
            param_types,
        })
    }

    /// `Class#method(...)` with the package path stripped from the class name.
    pub fn short_label(&self) -> String {
        let simple_class = simple_name(&self.class_name);
        let params = self
            .param_types
            .iter()
            .map(|t| simple_name(t))
            .collect::<Vec<_>>()
            .join(",");
        format!("{}#{}({})", simple_class, self.method_name, params)
    }
}

impl fmt::Display for MethodId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}#{}({})",
            self.class_name,
            self.method_name,
            self.param_types.join(",")
        )
    }
}

/// Last segment of a dot-separated type name.
fn simple_name(name: &str) -> &str {
    name.rsplit('.').next().unwrap_or(name)
}

/// Short label for an arbitrary method id; falls back to the raw id when it
/// does not follow the `class#method(...)` format.
pub fn short_method_label(method_id: &str) -> String {
    match MethodId::parse(method_id) {
        Some(id) => id.short_label(),
        None => method_id.to_string(),
    }
}
