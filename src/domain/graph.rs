//! Method Graph Aggregate
//!
//! The validated representation of one fetched call graph, centered on a
//! root method. Built wholesale from a wire payload, immutable afterwards,
//! and replaced (never patched) when a different root is selected.

use crate::api::dto::{MethodCallingDto, MethodLinkDto};
use crate::domain::calling::{CallingType, MethodCalling};
use crate::domain::method::Method;
use std::collections::{HashMap, HashSet, VecDeque};
use thiserror::Error;

/// Validation failure while building a graph from a wire payload.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MalformedGraphError {
    #[error("root method {0} is not present in the method map")]
    MissingRoot(String),

    #[error("{kind} edge {from} -> {to} references unknown method {missing}")]
    DanglingEdge {
        kind: &'static str,
        from: String,
        to: String,
        missing: String,
    },

    #[error("override group {base} references unknown method {missing}")]
    DanglingOverride { base: String, missing: String },

    #[error("{kind} edge {from} -> {to} has unrecognized calling type {value:?}")]
    UnknownCallingType {
        kind: &'static str,
        from: String,
        to: String,
        value: String,
    },
}

/// One fetched call graph.
///
/// `callings` is the plain edge set; `recursions` holds edges that close a
/// cycle back to an already-visited method and are rendered distinctly. The
/// two are independently reported and never deduplicated against each other.
/// `overrides` maps a base method id to the ids overriding it via
/// inheritance, independent of the calling edges.
#[derive(Debug, Clone)]
pub struct MethodGraph {
    pub root_method_id: String,
    pub methods: HashMap<String, Method>,
    pub callings: Vec<MethodCalling>,
    pub recursions: Vec<MethodCalling>,
    pub overrides: HashMap<String, Vec<String>>,
}

impl MethodGraph {
    /// Validate a wire payload into a graph.
    ///
    /// Every edge endpoint and every override key/value must resolve in the
    /// method map, and every edge type must be a known calling kind.
    /// Duplicate (from, to, type) tuples are preserved as-is.
    pub fn build(dto: MethodLinkDto) -> Result<MethodGraph, MalformedGraphError> {
        let MethodLinkDto {
            root_method_id,
            methods,
            callings,
            recursions,
            overrides,
        } = dto;

        if !methods.contains_key(&root_method_id) {
            return Err(MalformedGraphError::MissingRoot(root_method_id));
        }

        let callings = validate_edges("calling", callings, &methods)?;
        let recursions = validate_edges("recursion", recursions, &methods)?;

        for (base, overriding) in &overrides {
            if !methods.contains_key(base) {
                return Err(MalformedGraphError::DanglingOverride {
                    base: base.clone(),
                    missing: base.clone(),
                });
            }
            for method_id in overriding {
                if !methods.contains_key(method_id) {
                    return Err(MalformedGraphError::DanglingOverride {
                        base: base.clone(),
                        missing: method_id.clone(),
                    });
                }
            }
        }

        Ok(MethodGraph {
            root_method_id,
            methods,
            callings,
            recursions,
            overrides,
        })
    }

    pub fn method(&self, method_id: &str) -> Option<&Method> {
        self.methods.get(method_id)
    }

    /// Method ids grouped by BFS depth from the root, following `callings`
    /// only. Methods unreachable from the root (override targets, recursion
    /// endpoints with no plain edge) are not part of any layer.
    pub fn depth_layers(&self) -> Vec<Vec<&str>> {
        let mut adjacency: HashMap<&str, Vec<&str>> = HashMap::new();
        for calling in &self.callings {
            adjacency
                .entry(calling.from.as_str())
                .or_default()
                .push(calling.to.as_str());
        }

        let mut layers: Vec<Vec<&str>> = Vec::new();
        let mut visited: HashSet<&str> = HashSet::new();
        let mut queue: VecDeque<(&str, usize)> = VecDeque::new();

        visited.insert(self.root_method_id.as_str());
        queue.push_back((self.root_method_id.as_str(), 0));

        while let Some((method_id, depth)) = queue.pop_front() {
            if layers.len() <= depth {
                layers.resize_with(depth + 1, Vec::new);
            }
            layers[depth].push(method_id);

            if let Some(callees) = adjacency.get(method_id) {
                for &callee in callees {
                    if visited.insert(callee) {
                        queue.push_back((callee, depth + 1));
                    }
                }
            }
        }

        layers
    }
}

fn validate_edges(
    kind: &'static str,
    edges: Vec<MethodCallingDto>,
    methods: &HashMap<String, Method>,
) -> Result<Vec<MethodCalling>, MalformedGraphError> {
    let mut validated = Vec::with_capacity(edges.len());
    for edge in edges {
        let missing = if !methods.contains_key(&edge.from) {
            Some(edge.from.clone())
        } else if !methods.contains_key(&edge.to) {
            Some(edge.to.clone())
        } else {
            None
        };
        if let Some(missing) = missing {
            return Err(MalformedGraphError::DanglingEdge {
                kind,
                from: edge.from,
                to: edge.to,
                missing,
            });
        }
        let calling_type = match CallingType::parse(&edge.type_) {
            Some(calling_type) => calling_type,
            None => {
                return Err(MalformedGraphError::UnknownCallingType {
                    kind,
                    from: edge.from,
                    to: edge.to,
                    value: edge.type_,
                })
            }
        };
        validated.push(MethodCalling {
            from: edge.from,
            to: edge.to,
            calling_type,
        });
    }
    Ok(validated)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_method(id: &str) -> Method {
        Method {
            id: id.to_string(),
            name: id.to_string(),
            declaring_class: id.split('#').next().unwrap_or(id).to_string(),
            arguments: vec![],
        }
    }

    fn edge(from: &str, to: &str, type_: &str) -> MethodCallingDto {
        MethodCallingDto {
            from: from.to_string(),
            to: to.to_string(),
            type_: type_.to_string(),
        }
    }

    fn two_method_dto() -> MethodLinkDto {
        let mut methods = HashMap::new();
        methods.insert("m1".to_string(), sample_method("m1"));
        methods.insert("m2".to_string(), sample_method("m2"));
        MethodLinkDto {
            root_method_id: "m1".to_string(),
            methods,
            callings: vec![edge("m1", "m2", "OUT")],
            recursions: vec![],
            overrides: HashMap::new(),
        }
    }

    #[test]
    fn test_build_valid_payload() {
        let graph = MethodGraph::build(two_method_dto()).unwrap();
        assert_eq!(graph.root_method_id, "m1");
        assert_eq!(graph.callings.len(), 1);
        assert_eq!(graph.callings[0].calling_type, CallingType::Out);
        assert!(graph.method("m2").is_some());
    }

    #[test]
    fn test_build_rejects_dangling_calling() {
        let mut dto = two_method_dto();
        dto.methods.remove("m2");
        let err = MethodGraph::build(dto).unwrap_err();
        assert_eq!(
            err,
            MalformedGraphError::DanglingEdge {
                kind: "calling",
                from: "m1".to_string(),
                to: "m2".to_string(),
                missing: "m2".to_string(),
            }
        );
    }

    #[test]
    fn test_build_rejects_dangling_recursion() {
        let mut dto = two_method_dto();
        dto.recursions.push(edge("m2", "m3", "SELF"));
        let err = MethodGraph::build(dto).unwrap_err();
        assert!(matches!(
            err,
            MalformedGraphError::DanglingEdge { kind: "recursion", .. }
        ));
    }

    #[test]
    fn test_build_rejects_missing_root() {
        let mut dto = two_method_dto();
        dto.root_method_id = "m9".to_string();
        let err = MethodGraph::build(dto).unwrap_err();
        assert_eq!(err, MalformedGraphError::MissingRoot("m9".to_string()));
    }

    #[test]
    fn test_build_rejects_unknown_calling_type() {
        let mut dto = two_method_dto();
        dto.callings.push(edge("m2", "m1", "STATIC"));
        let err = MethodGraph::build(dto).unwrap_err();
        assert_eq!(
            err,
            MalformedGraphError::UnknownCallingType {
                kind: "calling",
                from: "m2".to_string(),
                to: "m1".to_string(),
                value: "STATIC".to_string(),
            }
        );
    }

    #[test]
    fn test_build_rejects_dangling_override_value() {
        let mut dto = two_method_dto();
        dto.overrides
            .insert("m1".to_string(), vec!["m2".to_string(), "m7".to_string()]);
        let err = MethodGraph::build(dto).unwrap_err();
        assert_eq!(
            err,
            MalformedGraphError::DanglingOverride {
                base: "m1".to_string(),
                missing: "m7".to_string(),
            }
        );
    }

    #[test]
    fn test_build_rejects_dangling_override_key() {
        let mut dto = two_method_dto();
        dto.overrides.insert("m8".to_string(), vec!["m2".to_string()]);
        let err = MethodGraph::build(dto).unwrap_err();
        assert_eq!(
            err,
            MalformedGraphError::DanglingOverride {
                base: "m8".to_string(),
                missing: "m8".to_string(),
            }
        );
    }

    #[test]
    fn test_build_rejects_edges_without_methods() {
        let dto = MethodLinkDto {
            root_method_id: "m1".to_string(),
            methods: HashMap::new(),
            callings: vec![edge("m1", "m2", "OUT")],
            recursions: vec![],
            overrides: HashMap::new(),
        };
        // An empty method map cannot satisfy the root invariant, let alone
        // the edge endpoints.
        assert!(MethodGraph::build(dto).is_err());
    }

    #[test]
    fn test_build_preserves_duplicate_edges() {
        let mut dto = two_method_dto();
        dto.callings.push(edge("m1", "m2", "OUT"));
        let graph = MethodGraph::build(dto).unwrap();
        assert_eq!(graph.callings.len(), 2);
        assert_eq!(graph.callings[0], graph.callings[1]);
    }

    #[test]
    fn test_recursions_not_deduplicated_against_callings() {
        let mut dto = two_method_dto();
        dto.recursions.push(edge("m1", "m2", "OUT"));
        let graph = MethodGraph::build(dto).unwrap();
        assert_eq!(graph.callings.len(), 1);
        assert_eq!(graph.recursions.len(), 1);
    }

    #[test]
    fn test_depth_layers() {
        let mut methods = HashMap::new();
        for id in ["root", "a", "b", "c"] {
            methods.insert(id.to_string(), sample_method(id));
        }
        let dto = MethodLinkDto {
            root_method_id: "root".to_string(),
            methods,
            callings: vec![
                edge("root", "a", "BROTHER"),
                edge("root", "b", "OUT"),
                edge("a", "c", "LIBRARY"),
            ],
            recursions: vec![],
            overrides: HashMap::new(),
        };
        let graph = MethodGraph::build(dto).unwrap();
        let layers = graph.depth_layers();
        assert_eq!(layers.len(), 3);
        assert_eq!(layers[0], vec!["root"]);
        assert_eq!(layers[1].len(), 2);
        assert_eq!(layers[2], vec!["c"]);
    }
}
