//! The in-memory search index and its query entry point.

use super::query::Query;
use super::rank::{SearchResult, rank, simple_search};
use crate::config::SearchConfig;
use crate::document::{ContentItem, IndexedDocument};
use ahash::AHashSet;

/// An immutable snapshot of indexed documents.
///
/// Queries only read the snapshot. [`rebuild`](Self::rebuild) takes `&mut self`, so the
/// borrow checker guarantees no query is in flight while documents are replaced; callers
/// sharing an index across threads swap whole `Arc<SearchIndex>` values instead.
#[derive(Debug, Clone, Default)]
pub struct SearchIndex {
    documents: Vec<IndexedDocument>,
    config: SearchConfig,
}

impl SearchIndex {
    /// An empty index with the given configuration.
    pub const fn new(config: SearchConfig) -> Self {
        Self {
            documents: Vec::new(),
            config,
        }
    }

    /// Build an index with the default configuration.
    pub fn build(items: &[ContentItem]) -> Self {
        Self::build_with_config(items, SearchConfig::default())
    }

    pub fn build_with_config(items: &[ContentItem], config: SearchConfig) -> Self {
        let mut index = Self::new(config);
        index.rebuild(items);
        index
    }

    /// Replace every document with a fresh build from `items`.
    ///
    /// Ids are positions in `items`. Items with malformed metadata are still indexed.
    pub fn rebuild(&mut self, items: &[ContentItem]) {
        let start = std::time::Instant::now();

        self.documents = items
            .iter()
            .enumerate()
            .map(|(id, item)| IndexedDocument::from_item(id, item))
            .collect();

        tracing::info!(
            "Built search index: {} documents in {:?}",
            self.documents.len(),
            start.elapsed()
        );
    }

    pub fn documents(&self) -> &[IndexedDocument] {
        &self.documents
    }

    pub fn get(&self, id: usize) -> Option<&IndexedDocument> {
        self.documents.get(id)
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    pub const fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Search with the configured default limit.
    pub fn search(&self, query: &str) -> Vec<SearchResult> {
        self.search_with_limit(query, self.config.default_limit)
    }

    /// Run `query` and return at most `limit` results, best first.
    ///
    /// Never fails: an empty query yields nothing, and a query with a syntax
    /// error is answered by a plain substring search over its words.
    pub fn search_with_limit(&self, query: &str, limit: usize) -> Vec<SearchResult> {
        if query.trim().is_empty() {
            return vec![];
        }

        match Query::parse(query) {
            Ok(ast) => {
                tracing::debug!("Parsed query {:?} as {}", query, ast);
                rank(&self.documents, &ast, &self.config, limit)
            }
            Err(e) => {
                tracing::warn!(
                    "Search query parse error, falling back to simple search: {}",
                    e
                );
                simple_search(&self.documents, query, limit)
            }
        }
    }

    /// Distinct titles and tags containing `input` (case-insensitive), in index order.
    pub fn suggest(&self, input: &str, limit: usize) -> Vec<String> {
        let needle = input.trim().to_lowercase();
        if needle.is_empty() {
            return vec![];
        }

        let mut seen = AHashSet::new();
        self.documents
            .iter()
            .flat_map(|doc| std::iter::once(&doc.title).chain(&doc.tags))
            .filter(|candidate| candidate.to_lowercase().contains(&needle))
            .filter(|candidate| seen.insert(candidate.to_lowercase()))
            .take(limit)
            .cloned()
            .collect()
    }
}
