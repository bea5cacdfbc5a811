//! Result ranking, the fallback substring search, and result grouping.

use super::evaluate::{Evaluation, Evaluator};
use super::highlight::Highlight;
use super::query::Query;
use super::scoring::{
    SIMPLE_CONTENT_SCORE, SIMPLE_PATH_SCORE, SIMPLE_TAGS_SCORE, SIMPLE_TITLE_SCORE,
};
use crate::config::SearchConfig;
use crate::document::{DocKind, Field, IndexedDocument};
use crate::metadata::{Metadata, reading_time};
use serde::Serialize;

/// A ranked search hit, detached from the index that produced it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchResult {
    pub id: usize,
    pub name: String,
    pub title: String,
    pub path: String,
    #[serde(rename = "type")]
    pub kind: DocKind,
    pub content: String,
    pub tags: Vec<String>,
    pub metadata: Metadata,
    pub score: f64,
    pub highlights: Vec<Highlight>,
}

impl SearchResult {
    fn from_document(doc: &IndexedDocument, score: f64, highlights: Vec<Highlight>) -> Self {
        Self {
            id: doc.id,
            name: doc.name.clone(),
            title: doc.title.clone(),
            path: doc.path.clone(),
            kind: doc.kind,
            content: doc.content.clone(),
            tags: doc.tags.clone(),
            metadata: doc.metadata.clone(),
            score,
            highlights,
        }
    }

    /// Reading time in minutes from the document's metadata, if declared.
    pub fn reading_time(&self) -> Option<f64> {
        reading_time(&self.metadata)
    }
}

/// Evaluate `query` against every document and keep the best `limit` matches.
///
/// Ordering is by score, highest first; ties keep index order.
pub(crate) fn rank(
    documents: &[IndexedDocument],
    query: &Query,
    config: &SearchConfig,
    limit: usize,
) -> Vec<SearchResult> {
    let evaluator = Evaluator::for_query(config, query);

    let mut hits: Vec<(&IndexedDocument, Evaluation)> = documents
        .iter()
        .filter_map(|doc| {
            let evaluation = evaluator.evaluate(query, doc);
            evaluation.matches.then_some((doc, evaluation))
        })
        .collect();

    tracing::debug!(
        "Query '{}' matched {} of {} documents",
        query,
        hits.len(),
        documents.len()
    );

    // Stable sort, so equal scores stay in index order
    hits.sort_by(|(_, a), (_, b)| b.score.total_cmp(&a.score));

    hits.into_iter()
        .take(limit)
        .map(|(doc, evaluation)| {
            SearchResult::from_document(doc, evaluation.score, evaluation.highlights)
        })
        .collect()
}

/// Plain substring search used when a query does not parse.
///
/// Every salvageable term adds a flat score per field it appears in: title 3,
/// path 2, any tag 2, content 1. No highlights are produced.
pub(crate) fn simple_search(
    documents: &[IndexedDocument],
    query: &str,
    limit: usize,
) -> Vec<SearchResult> {
    let terms = salvage_terms(query);
    if terms.is_empty() {
        return vec![];
    }
    tracing::debug!("Simple search over salvaged terms {:?}", terms);

    let mut hits: Vec<(&IndexedDocument, f64)> = documents
        .iter()
        .filter_map(|doc| {
            let score: f64 = terms.iter().map(|term| simple_score(doc, term)).sum();
            (score > 0.0).then_some((doc, score))
        })
        .collect();

    hits.sort_by(|(_, a), (_, b)| b.total_cmp(a));

    hits.into_iter()
        .take(limit)
        .map(|(doc, score)| SearchResult::from_document(doc, score, vec![]))
        .collect()
}

fn simple_score(doc: &IndexedDocument, term: &str) -> f64 {
    let mut score = 0.0;
    if doc.field_text(Field::Title).contains(term) {
        score += SIMPLE_TITLE_SCORE;
    }
    if doc.field_text(Field::Path).contains(term) {
        score += SIMPLE_PATH_SCORE;
    }
    if doc.field_text(Field::Content).contains(term) {
        score += SIMPLE_CONTENT_SCORE;
    }
    if doc.tags.iter().any(|tag| tag.to_lowercase().contains(term)) {
        score += SIMPLE_TAGS_SCORE;
    }
    score
}

/// Lower-cased plain words left in a query once its syntax is stripped.
///
/// Quotes, parentheses, keywords, `field:` prefixes, fuzzy suffixes and
/// wildcard characters are removed; duplicates are dropped.
pub(crate) fn salvage_terms(query: &str) -> Vec<String> {
    let mut terms: Vec<String> = vec![];

    for word in query.split_whitespace() {
        if matches!(word, "AND" | "OR" | "NOT") {
            continue;
        }
        let word: String = word
            .chars()
            .filter(|c| !matches!(c, '"' | '(' | ')' | '*' | '?'))
            .collect();
        let word = match word.split_once(':') {
            Some((name, value)) if name.to_ascii_lowercase().parse::<Field>().is_ok() => value,
            _ => word.as_str(),
        };
        let word = match word.rsplit_once('~') {
            Some((term, distance)) if distance.bytes().all(|b| b.is_ascii_digit()) => term,
            _ => word,
        };
        let word = word.to_lowercase();
        if !word.is_empty() && !terms.contains(&word) {
            terms.push(word);
        }
    }

    terms
}

/// Results of one document kind, in rank order.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultGroup<'a> {
    pub kind: DocKind,
    /// `(rank, result)` pairs, where rank is the position in the full result list.
    pub entries: Vec<(usize, &'a SearchResult)>,
}

/// Group ranked results by kind, with groups in order of first appearance.
pub fn group_by_kind(results: &[SearchResult]) -> Vec<ResultGroup<'_>> {
    let mut groups: Vec<ResultGroup<'_>> = vec![];

    for (rank, result) in results.iter().enumerate() {
        match groups.iter_mut().find(|group| group.kind == result.kind) {
            Some(group) => group.entries.push((rank, result)),
            None => groups.push(ResultGroup {
                kind: result.kind,
                entries: vec![(rank, result)],
            }),
        }
    }

    groups
}
