//! DOT Graph Exporter
//!
//! Renders a MethodGraph as a Graphviz digraph styled by the current view
//! settings. Stands in for the interactive renderer in headless use.

use crate::domain::calling::CallingType;
use crate::domain::graph::MethodGraph;
use crate::domain::method::short_method_label;
use crate::domain::settings::GraphViewSettings;
use crate::ports::GraphExporter;

pub struct DotExporter;

impl GraphExporter for DotExporter {
    fn render(&self, graph: &MethodGraph, settings: &GraphViewSettings) -> String {
        Self::to_dot(graph, settings)
    }
}

impl DotExporter {
    /// Convert a MethodGraph to DOT text.
    pub fn to_dot(graph: &MethodGraph, settings: &GraphViewSettings) -> String {
        let mut lines = Vec::new();

        lines.push("digraph MethodGraph {".to_string());
        lines.push(format!("    rankdir={};", settings.rankdir));
        lines.push("    node [fontname=\"Helvetica\", fontsize=12, shape=box];".to_string());
        lines.push("    edge [fontname=\"Helvetica\", fontsize=10];".to_string());
        lines.push("".to_string());

        // Node definitions in sorted order for stable output
        let mut method_ids: Vec<&str> = graph.methods.keys().map(String::as_str).collect();
        method_ids.sort_unstable();
        for method_id in method_ids {
            let label = Self::node_label(graph, method_id);
            if method_id == graph.root_method_id {
                lines.push(format!(
                    "    \"{}\" [label=\"{}\", style=\"filled,rounded\", fillcolor=\"#a6e3a1\"];",
                    Self::escape_label(method_id),
                    label
                ));
            } else {
                lines.push(format!(
                    "    \"{}\" [label=\"{}\"];",
                    Self::escape_label(method_id),
                    label
                ));
            }
        }

        lines.push("".to_string());

        for calling in &graph.callings {
            let mut attrs = format!("color=\"{}\"", Self::edge_color(calling.calling_type));
            if settings.show_dependency_type {
                attrs.push_str(&format!(", label=\"{}\"", calling.calling_type.label()));
            }
            lines.push(format!(
                "    \"{}\" -> \"{}\" [{}];",
                Self::escape_label(&calling.from),
                Self::escape_label(&calling.to),
                attrs
            ));
        }

        // Recursions close a cycle and render dashed, whatever their kind
        for recursion in &graph.recursions {
            let label = if settings.show_dependency_type {
                format!("recursive ({})", recursion.calling_type.label())
            } else {
                "recursive".to_string()
            };
            lines.push(format!(
                "    \"{}\" -> \"{}\" [style=dashed, color=\"{}\", label=\"{}\"];",
                Self::escape_label(&recursion.from),
                Self::escape_label(&recursion.to),
                Self::edge_color(recursion.calling_type),
                label
            ));
        }

        // Override groups are inheritance links, not call edges
        let mut bases: Vec<&str> = graph.overrides.keys().map(String::as_str).collect();
        bases.sort_unstable();
        for base in bases {
            for overriding in &graph.overrides[base] {
                lines.push(format!(
                    "    \"{}\" -> \"{}\" [style=dotted, arrowhead=odot, label=\"overrides\"];",
                    Self::escape_label(base),
                    Self::escape_label(overriding)
                ));
            }
        }

        // Group call depths for layered layout
        for layer in graph.depth_layers() {
            if layer.len() > 1 {
                let ids: Vec<String> = layer
                    .iter()
                    .map(|id| format!("\"{}\"", Self::escape_label(id)))
                    .collect();
                lines.push(format!("    {{ rank=same; {} }}", ids.join("; ")));
            }
        }

        lines.push("}".to_string());

        lines.join("\n")
    }

    fn node_label(graph: &MethodGraph, method_id: &str) -> String {
        let label = graph
            .method(method_id)
            .filter(|method| !method.name.is_empty())
            .map(|method| method.name.clone())
            .unwrap_or_else(|| short_method_label(method_id));
        Self::escape_label(&label)
    }

    fn edge_color(calling_type: CallingType) -> &'static str {
        match calling_type {
            CallingType::SelfCall => "#89b4fa", // Blue
            CallingType::Super => "#cba6f7",    // Purple
            CallingType::Brother => "#a6e3a1",  // Green
            CallingType::Out => "#f9e2af",      // Yellow
            CallingType::Jdk => "#6c7086",      // Gray
            CallingType::Library => "#f38ba8",  // Red
        }
    }

    fn escape_label(label: &str) -> String {
        label
            .replace('\\', "\\\\")
            .replace('"', "\\\"")
            .replace('\n', "\\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::dto::{MethodCallingDto, MethodLinkDto};
    use crate::domain::method::Method;
    use crate::domain::settings::Rankdir;
    use std::collections::HashMap;

    fn sample_graph() -> MethodGraph {
        let mut methods = HashMap::new();
        for id in ["a.A#root()", "b.B#leaf()"] {
            methods.insert(
                id.to_string(),
                Method {
                    id: id.to_string(),
                    name: String::new(),
                    declaring_class: id.split('#').next().unwrap().to_string(),
                    arguments: vec![],
                },
            );
        }
        MethodGraph::build(MethodLinkDto {
            root_method_id: "a.A#root()".to_string(),
            methods,
            callings: vec![MethodCallingDto {
                from: "a.A#root()".to_string(),
                to: "b.B#leaf()".to_string(),
                type_: "OUT".to_string(),
            }],
            recursions: vec![MethodCallingDto {
                from: "b.B#leaf()".to_string(),
                to: "a.A#root()".to_string(),
                type_: "SUPER".to_string(),
            }],
            overrides: {
                let mut overrides = HashMap::new();
                overrides.insert("a.A#root()".to_string(), vec!["b.B#leaf()".to_string()]);
                overrides
            },
        })
        .unwrap()
    }

    #[test]
    fn test_to_dot_basics() {
        let graph = sample_graph();
        let dot = DotExporter::to_dot(&graph, &GraphViewSettings::default());
        assert!(dot.contains("digraph MethodGraph"));
        assert!(dot.contains("rankdir=TB"));
        assert!(dot.contains("A#root()"));
        assert!(dot.contains("->"));
        assert!(dot.contains("style=dashed"));
        assert!(dot.contains("arrowhead=odot"));
        // Root node is highlighted
        assert!(dot.contains("fillcolor=\"#a6e3a1\""));
    }

    #[test]
    fn test_rankdir_follows_settings() {
        let graph = sample_graph();
        let settings = GraphViewSettings {
            rankdir: Rankdir::Lr,
            ..Default::default()
        };
        let dot = DotExporter::to_dot(&graph, &settings);
        assert!(dot.contains("rankdir=LR"));
    }

    #[test]
    fn test_dependency_labels_follow_toggle() {
        let graph = sample_graph();
        let hidden = DotExporter::to_dot(&graph, &GraphViewSettings::default());
        assert!(!hidden.contains("label=\"cross-module\""));

        let settings = GraphViewSettings {
            show_dependency_type: true,
            ..Default::default()
        };
        let shown = DotExporter::to_dot(&graph, &settings);
        assert!(shown.contains("label=\"cross-module\""));
        assert!(shown.contains("recursive (inherited)"));
    }
}
