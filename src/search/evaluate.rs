//! Structural evaluation of a [`Query`] against one document.

use super::highlight::{Highlight, Highlighter};
use super::query::{BooleanOp, Query};
use super::scoring::{
    FIELD_TERM_BOOST, FUZZY_FACTOR, PHRASE_BOOST, WILDCARD_FACTOR, count_occurrences,
    edit_distance, wildcard_regex,
};
use crate::config::SearchConfig;
use crate::document::{Field, IndexedDocument};
use ahash::AHashMap;
use regex::Regex;
use std::borrow::Cow;

/// Outcome of evaluating a query node against a document.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Evaluation {
    pub matches: bool,
    pub score: f64,
    pub highlights: Vec<Highlight>,
}

impl Evaluation {
    /// A non-matching outcome.
    pub fn miss() -> Self {
        Self::default()
    }

    fn hit(score: f64, highlights: Vec<Highlight>) -> Self {
        Self {
            matches: true,
            score,
            highlights,
        }
    }

    /// Matches exactly when some field contributed a positive score.
    fn scored(score: f64, highlights: Vec<Highlight>) -> Self {
        Self {
            matches: score > 0.0,
            score,
            highlights,
        }
    }
}

/// Evaluates queries against documents with a fixed configuration.
///
/// Holds no per-document state, so one evaluator can be shared across documents
/// (and threads).
#[derive(Debug)]
pub struct Evaluator<'a> {
    config: &'a SearchConfig,
    highlighter: Highlighter<'a>,
    /// Wildcard patterns compiled ahead of time; `None` marks a pattern that failed.
    wildcards: AHashMap<String, Option<Regex>>,
}

impl<'a> Evaluator<'a> {
    pub fn new(config: &'a SearchConfig) -> Self {
        Self {
            config,
            highlighter: Highlighter::new(&config.highlight),
            wildcards: AHashMap::new(),
        }
    }

    /// An evaluator with every wildcard in `query` compiled once up front.
    pub fn for_query(config: &'a SearchConfig, query: &Query) -> Self {
        let mut evaluator = Self::new(config);
        let mut patterns = vec![];
        collect_wildcards(query, &mut patterns);
        for pattern in patterns {
            evaluator
                .wildcards
                .entry(pattern.to_string())
                .or_insert_with(|| compile_wildcard(pattern));
        }
        evaluator
    }

    fn pattern(&self, pattern: &str) -> Option<Cow<'_, Regex>> {
        match self.wildcards.get(pattern) {
            Some(compiled) => compiled.as_ref().map(Cow::Borrowed),
            None => compile_wildcard(pattern).map(Cow::Owned),
        }
    }

    fn weight(&self, field: Field) -> f64 {
        self.config.weights.weight(field)
    }

    pub fn evaluate(&self, query: &Query, doc: &IndexedDocument) -> Evaluation {
        match query {
            Query::Term(value) => self.term(value, doc),
            Query::Phrase(text) => self.phrase(text, doc),
            Query::Wildcard(pattern) => self.wildcard(pattern, doc),
            Query::Fuzzy { term, distance } => self.fuzzy(term, *distance, doc),
            Query::Field { name, inner } => self.field(name, inner, doc),
            Query::Boolean { left, op, right } => self.boolean(left, *op, right.as_deref(), doc),
            Query::Group(inner) => self.evaluate(inner, doc),
        }
    }

    /// Occurrence-weighted match over every field; tags never produce highlights.
    fn term(&self, value: &str, doc: &IndexedDocument) -> Evaluation {
        let term = value.to_lowercase();
        let mut score = 0.0;
        let mut highlights = vec![];

        for field in Field::ALL {
            let text = doc.field_text(field);
            let occurrences = count_occurrences(text, &term);
            if occurrences == 0 {
                continue;
            }
            score += occurrences as f64 * self.weight(field);
            if field != Field::Tags {
                highlights.extend(self.highlighter.highlight(field, text, &term));
            }
        }

        Evaluation::scored(score, highlights)
    }

    /// Contiguous substring match over title, content and description.
    fn phrase(&self, text: &str, doc: &IndexedDocument) -> Evaluation {
        let phrase = text.to_lowercase();
        if phrase.is_empty() {
            return Evaluation::miss();
        }
        let mut score = 0.0;
        let mut highlights = vec![];

        for field in Field::PHRASE {
            let value = doc.field_text(field);
            if !value.contains(&phrase) {
                continue;
            }
            score += self.weight(field) * PHRASE_BOOST;
            highlights.extend(self.highlighter.highlight(field, value, &phrase));
        }

        Evaluation::scored(score, highlights)
    }

    /// First field matching the pattern wins; no highlights.
    fn wildcard(&self, pattern: &str, doc: &IndexedDocument) -> Evaluation {
        let Some(regex) = self.pattern(pattern) else {
            return Evaluation::miss();
        };

        Field::ALL
            .into_iter()
            .find(|&field| regex.is_match(doc.field_text(field)))
            .map_or_else(Evaluation::miss, |field| {
                Evaluation::hit(self.weight(field) * WILDCARD_FACTOR, vec![])
            })
    }

    /// First field with a whitespace-separated word within `distance` edits wins.
    fn fuzzy(&self, term: &str, distance: usize, doc: &IndexedDocument) -> Evaluation {
        let term = term.to_lowercase();

        Field::FUZZY
            .into_iter()
            .find(|&field| {
                doc.field_text(field)
                    .split_whitespace()
                    .any(|word| edit_distance(&term, word) <= distance)
            })
            .map_or_else(Evaluation::miss, |field| {
                Evaluation::hit(self.weight(field) * FUZZY_FACTOR, vec![])
            })
    }

    /// A term, phrase or wildcard restricted to one field.
    fn field(&self, name: &str, inner: &Query, doc: &IndexedDocument) -> Evaluation {
        let Ok(field) = name.to_ascii_lowercase().parse::<Field>() else {
            tracing::trace!("Field query on unknown field '{}' never matches", name);
            return Evaluation::miss();
        };
        let text = doc.field_text(field);
        let weight = self.weight(field);

        let highlight = |needle: &str| {
            if field == Field::Tags {
                vec![]
            } else {
                self.highlighter.highlight(field, text, needle).into_iter().collect()
            }
        };

        match inner {
            Query::Term(value) => {
                let term = value.to_lowercase();
                let occurrences = count_occurrences(text, &term);
                if occurrences == 0 {
                    return Evaluation::miss();
                }
                Evaluation::hit(
                    occurrences as f64 * weight * FIELD_TERM_BOOST,
                    highlight(&term),
                )
            }
            Query::Phrase(value) => {
                let phrase = value.to_lowercase();
                if phrase.is_empty() || !text.contains(&phrase) {
                    return Evaluation::miss();
                }
                Evaluation::hit(weight * PHRASE_BOOST, highlight(&phrase))
            }
            Query::Wildcard(pattern) => match self.pattern(pattern) {
                Some(regex) if regex.is_match(text) => Evaluation::hit(weight, vec![]),
                _ => Evaluation::miss(),
            },
            other => {
                tracing::trace!("Unsupported value inside field '{}': {}", name, other);
                Evaluation::miss()
            }
        }
    }

    fn boolean(
        &self,
        left: &Query,
        op: BooleanOp,
        right: Option<&Query>,
        doc: &IndexedDocument,
    ) -> Evaluation {
        let left = self.evaluate(left, doc);
        let right = match (op, right) {
            (BooleanOp::Not, _) => {
                return Evaluation {
                    matches: !left.matches,
                    score: if left.matches { 0.0 } else { 1.0 },
                    highlights: vec![],
                };
            }
            (_, None) => return left,
            (_, Some(right)) => self.evaluate(right, doc),
        };

        if op == BooleanOp::And {
            let matches = left.matches && right.matches;
            let mut highlights = left.highlights;
            highlights.extend(right.highlights);
            return Evaluation {
                matches,
                score: if matches { left.score + right.score } else { 0.0 },
                highlights,
            };
        }

        // TODO: merge both sides' highlights once the result view can show them together.
        Evaluation {
            matches: left.matches || right.matches,
            score: left.score.max(right.score),
            highlights: if left.matches {
                left.highlights
            } else {
                right.highlights
            },
        }
    }
}

fn collect_wildcards<'q>(query: &'q Query, patterns: &mut Vec<&'q str>) {
    match query {
        Query::Wildcard(pattern) => patterns.push(pattern),
        Query::Field { inner, .. } | Query::Group(inner) => collect_wildcards(inner, patterns),
        Query::Boolean { left, right, .. } => {
            collect_wildcards(left, patterns);
            if let Some(right) = right {
                collect_wildcards(right, patterns);
            }
        }
        Query::Term(_) | Query::Phrase(_) | Query::Fuzzy { .. } => {}
    }
}

fn compile_wildcard(pattern: &str) -> Option<Regex> {
    match wildcard_regex(pattern) {
        Ok(regex) => Some(regex),
        Err(e) => {
            tracing::debug!("Wildcard pattern '{}' failed to compile: {}", pattern, e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::ContentItem;
    use assert2::check;
    use rstest::{fixture, rstest};

    #[fixture]
    fn docs() -> Vec<IndexedDocument> {
        let items = [
            ContentItem::new("hooks/guide")
                .with_tags(["hooks", "react"])
                .with_markdown("---\ntitle: React Hooks Guide\nauthor: Dan\n---\nusestate and useeffect basics"),
            ContentItem::new("vue/basics")
                .with_tags(["vue"])
                .with_markdown("---\ntitle: Vue Basics\n---\nvue fundamentals"),
        ];
        items
            .iter()
            .enumerate()
            .map(|(id, item)| IndexedDocument::from_item(id, item))
            .collect()
    }

    fn eval(query: &str, doc: &IndexedDocument) -> Evaluation {
        let config = SearchConfig::default();
        Evaluator::new(&config).evaluate(&Query::parse(query).unwrap(), doc)
    }

    #[rstest]
    fn test_term_scores_every_field(docs: Vec<IndexedDocument>) {
        // title 3.0 + path 2.0 + tags 2.5
        let result = eval("hooks", &docs[0]);
        check!(result.matches);
        check!(result.score == 7.5);
        let fields: Vec<Field> = result.highlights.iter().map(|h| h.field).collect();
        check!(fields == vec![Field::Title, Field::Path]);
    }

    #[rstest]
    fn test_term_counts_occurrences(docs: Vec<IndexedDocument>) {
        // title 3.0 + content 1.0 + path 2.0 + tags 2.5
        check!(eval("VUE", &docs[1]).score == 8.5);
    }

    #[rstest]
    fn test_phrase(docs: Vec<IndexedDocument>) {
        let result = eval("\"hooks guide\"", &docs[0]);
        check!(result.matches);
        check!(result.score == 4.5);
        check!(!eval("\"guide hooks\"", &docs[0]).matches);
        // phrases skip path and tags
        check!(!eval("\"hooks/guide\"", &docs[0]).matches);
    }

    #[rstest]
    #[case("title:hooks", 0, true, 6.0)]
    #[case("tags:vue", 1, true, 5.0)]
    #[case("tags:vue", 0, false, 0.0)]
    #[case("title:\"react hooks\"", 0, true, 4.5)]
    #[case("path:vue*", 1, true, 2.0)]
    #[case("author:dan", 0, true, 2.0)]
    #[case("title:usestate", 0, false, 0.0)]
    #[case("bogus:hooks", 0, false, 0.0)]
    fn test_field_scoping(
        docs: Vec<IndexedDocument>,
        #[case] query: &str,
        #[case] doc: usize,
        #[case] matches: bool,
        #[case] score: f64,
    ) {
        let result = eval(query, &docs[doc]);
        check!(result.matches == matches);
        check!(result.score == score);
    }

    #[rstest]
    fn test_tags_field_has_no_highlights(docs: Vec<IndexedDocument>) {
        check!(eval("tags:react", &docs[0]).highlights.is_empty());
        check!(eval("title:react", &docs[0]).highlights.len() == 1);
    }

    #[rstest]
    fn test_wildcard_first_field_wins(docs: Vec<IndexedDocument>) {
        let result = eval("re*", &docs[0]);
        check!(result.matches);
        check!(result.score == 3.0 * 0.8);
        check!(result.highlights.is_empty());
        check!(!eval("re*", &docs[1]).matches);
    }

    #[rstest]
    #[case("raect~", false)]
    #[case("raect~2", true)]
    #[case("reakt~", true)]
    #[case("fundamental~", false)]
    fn test_fuzzy_distance(docs: Vec<IndexedDocument>, #[case] query: &str, #[case] expected: bool) {
        check!(eval(query, &docs[0]).matches == expected);
    }

    #[rstest]
    fn test_fuzzy_scores_first_matching_field(docs: Vec<IndexedDocument>) {
        check!(eval("vua~", &docs[1]).score == 3.0 * 0.7);
        check!(eval("fundamentalz~", &docs[1]).score == 0.7);
    }

    #[rstest]
    fn test_boolean_semantics(docs: Vec<IndexedDocument>) {
        let and = eval("react AND hooks", &docs[0]);
        check!(and.matches);
        check!(and.score == eval("react", &docs[0]).score + eval("hooks", &docs[0]).score);

        let failed_and = eval("react AND vue", &docs[0]);
        check!(!failed_and.matches);
        check!(failed_and.score == 0.0);

        let or = eval("vue OR react", &docs[0]);
        check!(or.matches);
        check!(or.score == eval("react", &docs[0]).score);
        check!(!or.highlights.is_empty());

        let not = eval("NOT vue", &docs[0]);
        check!(not.matches);
        check!(not.score == 1.0);
        check!(not.highlights.is_empty());
        check!(!eval("NOT vue", &docs[1]).matches);
    }

    #[rstest]
    fn test_or_keeps_left_highlights_only(docs: Vec<IndexedDocument>) {
        let result = eval("react OR usestate", &docs[0]);
        check!(result.highlights.len() == 1);
        check!(result.highlights[0].field == Field::Title);
    }

    #[rstest]
    fn test_group_is_transparent(docs: Vec<IndexedDocument>) {
        check!(eval("(hooks)", &docs[0]) == eval("hooks", &docs[0]));
    }

    #[rstest]
    fn test_precompiled_wildcards_agree(docs: Vec<IndexedDocument>) {
        let config = SearchConfig::default();
        let query = Query::parse("(re* OR title:vu?) AND NOT path:x*").unwrap();
        let prepared = Evaluator::for_query(&config, &query);
        check!(prepared.wildcards.len() == 3);
        for doc in &docs {
            check!(prepared.evaluate(&query, doc) == Evaluator::new(&config).evaluate(&query, doc));
        }
    }

    #[rstest]
    fn test_unsupported_field_value(docs: Vec<IndexedDocument>) {
        let config = SearchConfig::default();
        let query = Query::Field {
            name: "title".to_string(),
            inner: Box::new(Query::Fuzzy {
                term: "hooks".to_string(),
                distance: 1,
            }),
        };
        check!(!Evaluator::new(&config).evaluate(&query, &docs[0]).matches);
    }
}
