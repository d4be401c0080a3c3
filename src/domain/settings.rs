/// Graph View Settings Module
///
/// Process-wide configuration consumed by the rendering layer: dependency
/// label visibility, layout direction, and render backend. The record is
/// persisted on every mutation and rehydrated at startup with field-level
/// defaulting, so records written by older versions keep loading.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Rejected configuration mutation. The store is left unchanged.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unsupported {setting} value {value:?}")]
pub struct InvalidSettingError {
    pub setting: &'static str,
    pub value: String,
}

/// Layout direction handed to the graph-layout engine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Rankdir {
    /// Top to bottom, the layout engine's default.
    #[default]
    #[serde(rename = "TB")]
    Tb,
    #[serde(rename = "BT")]
    Bt,
    #[serde(rename = "LR")]
    Lr,
    #[serde(rename = "RL")]
    Rl,
}

impl Rankdir {
    pub fn parse(s: &str) -> Option<Rankdir> {
        match s.to_uppercase().as_str() {
            "TB" => Some(Rankdir::Tb),
            "BT" => Some(Rankdir::Bt),
            "LR" => Some(Rankdir::Lr),
            "RL" => Some(Rankdir::Rl),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Rankdir::Tb => "TB",
            Rankdir::Bt => "BT",
            Rankdir::Lr => "LR",
            Rankdir::Rl => "RL",
        }
    }
}

impl fmt::Display for Rankdir {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Backend the external renderer paints with.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RenderType {
    #[default]
    Canvas,
    Svg,
}

impl RenderType {
    pub fn parse(s: &str) -> Option<RenderType> {
        match s.to_lowercase().as_str() {
            "canvas" => Some(RenderType::Canvas),
            "svg" => Some(RenderType::Svg),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RenderType::Canvas => "canvas",
            RenderType::Svg => "svg",
        }
    }
}

impl fmt::Display for RenderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The persisted settings snapshot. Shared by every graph view in a session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphViewSettings {
    pub show_dependency_type: bool,
    pub rankdir: Rankdir,
    pub render_type: RenderType,
}

/// Intermediate shape for rehydration: every field optional, merged
/// field-by-field over the defaults so records missing newer fields load
/// without data loss.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartialGraphViewSettings {
    #[serde(default)]
    pub show_dependency_type: Option<bool>,
    #[serde(default)]
    pub rankdir: Option<Rankdir>,
    #[serde(default)]
    pub render_type: Option<RenderType>,
}

impl PartialGraphViewSettings {
    pub fn merge_with_defaults(self) -> GraphViewSettings {
        let defaults = GraphViewSettings::default();
        GraphViewSettings {
            show_dependency_type: self
                .show_dependency_type
                .unwrap_or(defaults.show_dependency_type),
            rankdir: self.rankdir.unwrap_or(defaults.rankdir),
            render_type: self.render_type.unwrap_or(defaults.render_type),
        }
    }
}
