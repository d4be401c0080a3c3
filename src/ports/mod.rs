use crate::api::dto::{MethodLinkDto, MethodListDto};
use crate::domain::graph::MethodGraph;
use crate::domain::settings::GraphViewSettings;
use crate::infrastructure::fetcher::FetchError;
use async_trait::async_trait;

pub mod dot_exporter;
pub mod mermaid_exporter;

/// Inbound port toward the static-analysis service.
#[async_trait]
pub trait GraphSource: Send + Sync {
    /// Fetch the method index used for selection/search.
    async fn method_list(&self) -> Result<MethodListDto, FetchError>;

    /// Fetch the raw call graph rooted at the given method id.
    async fn method_link(&self, method_id: &str) -> Result<MethodLinkDto, FetchError>;
}

/// Outbound port for user-visible notifications (e.g. a toast in a UI shell).
pub trait Notifier: Send + Sync {
    fn warn(&self, message: &str);
}

pub trait GraphExporter {
    fn render(&self, graph: &MethodGraph, settings: &GraphViewSettings) -> String;

    fn export(
        &self,
        graph: &MethodGraph,
        settings: &GraphViewSettings,
        path: &str,
    ) -> std::io::Result<()> {
        std::fs::write(path, self.render(graph, settings))
    }
}
