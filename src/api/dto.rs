// Wire payloads consumed from the static-analysis service.
// Edge types travel as raw strings here; validation into the closed
// CallingType set happens in MethodGraph::build.

use crate::domain::method::{Method, MethodListItem};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One directed edge as reported by the service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MethodCallingDto {
    pub from: String,
    pub to: String,
    #[serde(rename = "type")]
    pub type_: String,
}

/// A full call graph rooted at one method, as fetched for a single query.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MethodLinkDto {
    pub root_method_id: String,
    pub methods: HashMap<String, Method>,
    pub callings: Vec<MethodCallingDto>,
    pub recursions: Vec<MethodCallingDto>,
    pub overrides: HashMap<String, Vec<String>>,
}

/// Payload of the method index endpoint.
pub type MethodListDto = Vec<MethodListItem>;
