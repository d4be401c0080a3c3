//! Mermaid Flowchart Exporter
//!
//! Renders a MethodGraph as a mermaid flowchart: numbered nodes in
//! first-seen order, solid arrows for callings, dotted links for recursions,
//! circle-ended links for override groups. Repeated edge lines collapse.

use crate::domain::graph::MethodGraph;
use crate::domain::method::short_method_label;
use crate::domain::settings::{GraphViewSettings, Rankdir};
use crate::ports::GraphExporter;
use std::collections::{HashMap, HashSet};

pub struct MermaidExporter;

impl GraphExporter for MermaidExporter {
    fn render(&self, graph: &MethodGraph, settings: &GraphViewSettings) -> String {
        Self::to_mermaid(graph, settings)
    }
}

impl MermaidExporter {
    pub fn to_mermaid(graph: &MethodGraph, settings: &GraphViewSettings) -> String {
        let mut chart = FlowchartBuilder::default();

        // Root first so it becomes N0, like the interactive view centers it
        chart.node(&graph.root_method_id);

        for calling in &graph.callings {
            let arrow = if settings.show_dependency_type {
                format!("-->|{}|", calling.calling_type.label())
            } else {
                "-->".to_string()
            };
            chart.edge(&calling.from, &arrow, &calling.to);
        }

        for recursion in &graph.recursions {
            chart.edge(&recursion.from, "-. recursive .->", &recursion.to);
        }

        let mut bases: Vec<&str> = graph.overrides.keys().map(String::as_str).collect();
        bases.sort_unstable();
        for base in bases {
            for overriding in &graph.overrides[base] {
                chart.edge(base, "o-- overrides --o", overriding);
            }
        }

        chart.build(settings.rankdir)
    }
}

/// Accumulates numbered nodes and deduplicated edge lines, in insertion
/// order.
#[derive(Default)]
struct FlowchartBuilder {
    node_ids: HashMap<String, usize>,
    node_order: Vec<String>,
    edges: Vec<String>,
    seen_edges: HashSet<String>,
}

impl FlowchartBuilder {
    fn node(&mut self, name: &str) -> String {
        let next = self.node_ids.len();
        let id = *self.node_ids.entry(name.to_string()).or_insert(next);
        if id == next {
            self.node_order.push(name.to_string());
        }
        format!("N{}", id)
    }

    fn edge(&mut self, from: &str, arrow: &str, to: &str) {
        let line = format!("{} {} {}", self.node(from), arrow, self.node(to));
        if self.seen_edges.insert(line.clone()) {
            self.edges.push(line);
        }
    }

    fn build(&self, rankdir: Rankdir) -> String {
        let mut out = format!("flowchart {}", direction(rankdir));
        for (index, name) in self.node_order.iter().enumerate() {
            out.push_str(&format!("\n    N{}[\"{}\"]", index, node_text(name)));
        }
        for edge in &self.edges {
            out.push_str("\n    ");
            out.push_str(edge);
        }
        out
    }
}

fn direction(rankdir: Rankdir) -> &'static str {
    match rankdir {
        Rankdir::Tb => "TD",
        Rankdir::Bt => "BT",
        Rankdir::Lr => "LR",
        Rankdir::Rl => "RL",
    }
}

fn node_text(method_id: &str) -> String {
    // Mermaid node text sits inside double quotes
    short_method_label(method_id).replace('"', "'")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::dto::{MethodCallingDto, MethodLinkDto};
    use crate::domain::method::Method;

    fn graph_with(
        callings: Vec<(&str, &str, &str)>,
        recursions: Vec<(&str, &str, &str)>,
        overrides: Vec<(&str, &str)>,
    ) -> MethodGraph {
        let mut methods = HashMap::new();
        let mut add = |id: &str| {
            methods.entry(id.to_string()).or_insert_with(|| Method {
                id: id.to_string(),
                name: id.to_string(),
                declaring_class: "T".to_string(),
                arguments: vec![],
            });
        };
        add("root");
        for &(from, to, _) in callings.iter().chain(recursions.iter()) {
            add(from);
            add(to);
        }
        for (base, sub) in &overrides {
            add(base);
            add(sub);
        }
        let to_dto = |edges: Vec<(&str, &str, &str)>| {
            edges
                .into_iter()
                .map(|(from, to, type_)| MethodCallingDto {
                    from: from.to_string(),
                    to: to.to_string(),
                    type_: type_.to_string(),
                })
                .collect()
        };
        let mut override_map: HashMap<String, Vec<String>> = HashMap::new();
        for (base, sub) in overrides {
            override_map
                .entry(base.to_string())
                .or_default()
                .push(sub.to_string());
        }
        MethodGraph::build(MethodLinkDto {
            root_method_id: "root".to_string(),
            methods,
            callings: to_dto(callings),
            recursions: to_dto(recursions),
            overrides: override_map,
        })
        .unwrap()
    }

    #[test]
    fn test_to_mermaid_basics() {
        let graph = graph_with(
            vec![("root", "a", "BROTHER")],
            vec![("a", "root", "SELF")],
            vec![("root", "a")],
        );
        let chart = MermaidExporter::to_mermaid(&graph, &GraphViewSettings::default());
        assert!(chart.starts_with("flowchart TD"));
        assert!(chart.contains("N0[\"root\"]"));
        assert!(chart.contains("N0 --> N1"));
        assert!(chart.contains("N1 -. recursive .-> N0"));
        assert!(chart.contains("N0 o-- overrides --o N1"));
    }

    #[test]
    fn test_direction_follows_rankdir() {
        let graph = graph_with(vec![], vec![], vec![]);
        let settings = GraphViewSettings {
            rankdir: Rankdir::Lr,
            ..Default::default()
        };
        let chart = MermaidExporter::to_mermaid(&graph, &settings);
        assert!(chart.starts_with("flowchart LR"));
    }

    #[test]
    fn test_duplicate_edges_collapse() {
        let graph = graph_with(
            vec![("root", "a", "OUT"), ("root", "a", "OUT")],
            vec![],
            vec![],
        );
        let chart = MermaidExporter::to_mermaid(&graph, &GraphViewSettings::default());
        assert_eq!(chart.matches("N0 --> N1").count(), 1);
    }

    #[test]
    fn test_dependency_labels_follow_toggle() {
        let graph = graph_with(vec![("root", "a", "JDK")], vec![], vec![]);
        let settings = GraphViewSettings {
            show_dependency_type: true,
            ..Default::default()
        };
        let chart = MermaidExporter::to_mermaid(&graph, &settings);
        assert!(chart.contains("-->|platform|"));
    }
}
