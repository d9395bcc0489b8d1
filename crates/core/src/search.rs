//! Case-insensitive substring search over the flattened catalog.

use std::collections::HashMap;
use std::ops::Range;

use crate::catalog::Catalog;
use crate::model::{Question, TopicId};

//
// ─── ENTRIES ───────────────────────────────────────────────────────────────────
//

/// One question of the flattened index, carrying its topic's display fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchEntry {
    topic_id: TopicId,
    topic_name: String,
    topic_icon: String,
    question: Question,
    // Lower-cased question, answer, example, topic name.
    haystacks: [String; 4],
}

impl SearchEntry {
    fn new(topic_id: TopicId, topic_name: &str, topic_icon: &str, question: Question) -> Self {
        let haystacks = [
            question.question().to_lowercase(),
            question.answer().to_lowercase(),
            question.example().to_lowercase(),
            topic_name.to_lowercase(),
        ];
        Self {
            topic_id,
            topic_name: topic_name.to_owned(),
            topic_icon: topic_icon.to_owned(),
            question,
            haystacks,
        }
    }

    #[must_use]
    pub fn topic_id(&self) -> &TopicId {
        &self.topic_id
    }

    #[must_use]
    pub fn topic_name(&self) -> &str {
        &self.topic_name
    }

    #[must_use]
    pub fn topic_icon(&self) -> &str {
        &self.topic_icon
    }

    #[must_use]
    pub fn question(&self) -> &Question {
        &self.question
    }

    fn matches(&self, needle: &str) -> bool {
        self.haystacks.iter().any(|field| field.contains(needle))
    }
}

//
// ─── INDEX ─────────────────────────────────────────────────────────────────────
//

/// Every question of the catalog in topic order, then per-topic order.
#[derive(Debug, Clone, Default)]
pub struct SearchIndex {
    entries: Vec<SearchEntry>,
}

impl SearchIndex {
    #[must_use]
    pub fn build(catalog: &Catalog) -> Self {
        let entries = catalog
            .topics()
            .iter()
            .flat_map(|topic| {
                topic.questions().iter().map(move |question| {
                    SearchEntry::new(
                        topic.id().clone(),
                        topic.name(),
                        topic.icon(),
                        question.clone(),
                    )
                })
            })
            .collect();
        Self { entries }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn entries(&self) -> &[SearchEntry] {
        &self.entries
    }

    /// Entries whose question, answer, example or topic name contains `term`,
    /// ignoring case. The term is trimmed first; an empty term matches all.
    #[must_use]
    pub fn search(&self, term: &str) -> Vec<&SearchEntry> {
        let needle = term.trim().to_lowercase();
        self.entries
            .iter()
            .filter(|entry| entry.matches(&needle))
            .collect()
    }

    /// Run [`SearchIndex::search`] and keep the term alongside the matches.
    #[must_use]
    pub fn query(&self, term: &str) -> SearchResults<'_> {
        SearchResults {
            term: term.trim().to_owned(),
            matches: self.search(term),
        }
    }
}

//
// ─── GROUPING ──────────────────────────────────────────────────────────────────
//

/// Matches that share a topic, in match order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicGroup<'a> {
    pub topic_id: &'a TopicId,
    pub topic_name: &'a str,
    pub topic_icon: &'a str,
    pub entries: Vec<&'a SearchEntry>,
}

/// Group matches by topic. Topics appear in the order they are first met in
/// `matches`, not in catalog or alphabetical order.
#[must_use]
pub fn group_by_topic<'a>(matches: &[&'a SearchEntry]) -> Vec<TopicGroup<'a>> {
    let mut groups: Vec<TopicGroup<'a>> = Vec::new();
    let mut slots: HashMap<&'a TopicId, usize> = HashMap::new();

    for &entry in matches {
        let slot = *slots.entry(&entry.topic_id).or_insert_with(|| {
            groups.push(TopicGroup {
                topic_id: &entry.topic_id,
                topic_name: &entry.topic_name,
                topic_icon: &entry.topic_icon,
                entries: Vec::new(),
            });
            groups.len() - 1
        });
        groups[slot].entries.push(entry);
    }

    groups
}

/// Outcome of one query. Zero matches is a normal result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchResults<'a> {
    term: String,
    matches: Vec<&'a SearchEntry>,
}

impl<'a> SearchResults<'a> {
    #[must_use]
    pub fn term(&self) -> &str {
        &self.term
    }

    #[must_use]
    pub fn matches(&self) -> &[&'a SearchEntry] {
        &self.matches
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.matches.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }

    #[must_use]
    pub fn group_by_topic(&self) -> Vec<TopicGroup<'a>> {
        group_by_topic(&self.matches)
    }

    /// Distinct topic names in first-encounter order.
    #[must_use]
    pub fn topic_names(&self) -> Vec<&'a str> {
        let mut names: Vec<&'a str> = Vec::new();
        for entry in &self.matches {
            if !names.contains(&entry.topic_name()) {
                names.push(entry.topic_name());
            }
        }
        names
    }
}

//
// ─── HIGHLIGHTING ──────────────────────────────────────────────────────────────
//

/// Byte ranges of `text` where `term` occurs, ignoring case.
///
/// Ranges always fall on char boundaries of `text` and never overlap. A blank
/// term yields no ranges.
#[must_use]
pub fn highlight_ranges(text: &str, term: &str) -> Vec<Range<usize>> {
    let needle = term.trim().to_lowercase();
    if needle.is_empty() {
        return Vec::new();
    }

    // Lower-casing can change byte lengths, so remember where every lowered
    // byte came from in the original text.
    let mut lowered = String::with_capacity(text.len());
    let mut origin = Vec::with_capacity(text.len() + 1);
    for (offset, ch) in text.char_indices() {
        for lower in ch.to_lowercase() {
            let before = lowered.len();
            lowered.push(lower);
            origin.extend(std::iter::repeat_n(offset, lowered.len() - before));
        }
    }
    origin.push(text.len());

    let mut ranges: Vec<Range<usize>> = Vec::new();
    let mut from = 0;
    while let Some(found) = lowered[from..].find(&needle) {
        let start = from + found;
        let end = start + needle.len();
        let orig_start = origin[start];
        let orig_end = next_char_start(text, &origin, end);
        if ranges.last().is_none_or(|last| last.end <= orig_start) {
            ranges.push(orig_start..orig_end);
        }
        from = end;
    }
    ranges
}

// Original offset of the first char that is not part of the match ending at
// lowered byte `end`.
fn next_char_start(text: &str, origin: &[usize], end: usize) -> usize {
    let last = origin[end - 1];
    let ch_len = text[last..].chars().next().map_or(0, char::len_utf8);
    (last + ch_len).max(origin[end])
}
