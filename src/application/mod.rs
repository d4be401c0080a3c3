//! Graph Viewing Session
//!
//! Orchestrates fetches against the analysis service and owns the published
//! graph. While a fetch is outstanding the previous graph stays visible; if
//! several fetches race, only the last-issued one may publish its result.
//! Stale responses are discarded, not aborted.

use crate::domain::graph::{MalformedGraphError, MethodGraph};
use crate::domain::method::MethodListItem;
use crate::ports::{GraphSource, Notifier};
use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

pub struct GraphSession {
    source: Arc<dyn GraphSource>,
    notifier: Arc<dyn Notifier>,
    current: Mutex<Option<Arc<MethodGraph>>>,
    /// Graphs are immutable per root, so cached entries never go stale
    /// within a session.
    cache: DashMap<String, Arc<MethodGraph>>,
    /// Ticket of the most recently issued graph fetch.
    issued: AtomicU64,
    in_flight: AtomicU64,
}

impl GraphSession {
    pub fn new(source: Arc<dyn GraphSource>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            source,
            notifier,
            current: Mutex::new(None),
            cache: DashMap::new(),
            issued: AtomicU64::new(0),
            in_flight: AtomicU64::new(0),
        }
    }

    /// Fetch and publish the graph rooted at `method_id`.
    ///
    /// Returns the newly published graph, or `None` for "no update": a fetch
    /// failure (after a user-visible warning) or a response superseded by a
    /// later `select_root` call. A payload that fails validation surfaces as
    /// `MalformedGraphError` and leaves the published graph unchanged.
    pub async fn select_root(
        &self,
        method_id: &str,
    ) -> Result<Option<Arc<MethodGraph>>, MalformedGraphError> {
        let ticket = self.issued.fetch_add(1, Ordering::SeqCst) + 1;

        if let Some(graph) = self.cache.get(method_id).map(|entry| entry.value().clone()) {
            return Ok(self.publish(ticket, graph));
        }

        self.in_flight.fetch_add(1, Ordering::SeqCst);
        let fetched = self.source.method_link(method_id).await;
        // The loading indicator drops exactly once, success or failure.
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        let dto = match fetched {
            Ok(dto) => dto,
            Err(err) => {
                self.notifier.warn(&format!(
                    "failed to load call graph for {}: {}",
                    method_id, err
                ));
                return Ok(None);
            }
        };

        let graph = Arc::new(MethodGraph::build(dto)?);
        self.cache.insert(method_id.to_string(), graph.clone());
        Ok(self.publish(ticket, graph))
    }

    /// Fetch the method index, sorted by group, sub-group, then name.
    /// Failure degrades to `None` after a user-visible warning.
    pub async fn method_list(&self) -> Option<Vec<MethodListItem>> {
        self.in_flight.fetch_add(1, Ordering::SeqCst);
        let fetched = self.source.method_list().await;
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        match fetched {
            Ok(mut items) => {
                items.sort_by(|a, b| {
                    a.group_name
                        .cmp(&b.group_name)
                        .then_with(|| a.sub_group_name.cmp(&b.sub_group_name))
                        .then_with(|| a.name.cmp(&b.name))
                });
                Some(items)
            }
            Err(err) => {
                self.notifier
                    .warn(&format!("failed to load method list: {}", err));
                None
            }
        }
    }

    pub fn current_graph(&self) -> Option<Arc<MethodGraph>> {
        self.current.lock().unwrap().clone()
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst) > 0
    }

    /// Drop all memoized graphs, forcing refetches (e.g. after the service
    /// re-analyzed the codebase).
    pub fn invalidate_cache(&self) {
        self.cache.clear();
    }

    fn publish(&self, ticket: u64, graph: Arc<MethodGraph>) -> Option<Arc<MethodGraph>> {
        if ticket != self.issued.load(Ordering::SeqCst) {
            // A later fetch was issued while this one was outstanding.
            return None;
        }
        *self.current.lock().unwrap() = Some(graph.clone());
        Some(graph)
    }
}
