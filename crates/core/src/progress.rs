//! Sparse record of which questions have been marked read.
//!
//! Presence of an id means "read"; absence means "unread". Entries are
//! removed rather than flagged false, and a topic whose last id is removed
//! disappears from the map entirely.

use std::collections::{BTreeMap, BTreeSet};

use serde::de::{Deserializer, Error as _};
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::model::{QuestionId, TopicId};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProgressMap {
    topics: BTreeMap<TopicId, BTreeSet<QuestionId>>,
}

impl ProgressMap {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_read(&self, topic: &str, question: QuestionId) -> bool {
        self.topics
            .get(topic)
            .is_some_and(|read| read.contains(&question))
    }

    /// Flip the read state of one question and return the new state.
    pub fn toggle(&mut self, topic: &TopicId, question: QuestionId) -> bool {
        if self.remove(topic.as_str(), question) {
            return false;
        }
        self.topics
            .entry(topic.clone())
            .or_default()
            .insert(question);
        true
    }

    /// Mark every given id as read. Returns how many were newly inserted.
    pub fn mark_all<I>(&mut self, topic: &TopicId, questions: I) -> usize
    where
        I: IntoIterator<Item = QuestionId>,
    {
        let mut inserted = 0;
        let mut pending = questions.into_iter().peekable();
        if pending.peek().is_none() {
            return 0;
        }

        let read = self.topics.entry(topic.clone()).or_default();
        for question in pending {
            if read.insert(question) {
                inserted += 1;
            }
        }
        inserted
    }

    /// Drop every read entry of a topic. Returns how many were removed.
    pub fn clear_topic(&mut self, topic: &str) -> usize {
        self.topics.remove(topic).map_or(0, |read| read.len())
    }

    /// Number of read entries stored for a topic, stale ids included.
    #[must_use]
    pub fn read_count(&self, topic: &str) -> usize {
        self.topics.get(topic).map_or(0, BTreeSet::len)
    }

    /// Read ids of a topic in ascending order.
    pub fn read_ids<'a>(&'a self, topic: &str) -> impl Iterator<Item = QuestionId> + use<'a> {
        self.topics
            .get(topic)
            .into_iter()
            .flat_map(|read| read.iter().copied())
    }

    /// Topics with at least one read entry.
    pub fn topics(&self) -> impl Iterator<Item = &TopicId> {
        self.topics.keys()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.topics.is_empty()
    }

    /// Encode as `{ "<topic>": { "<question>": true } }`.
    ///
    /// # Errors
    ///
    /// Returns the serializer error; with in-memory maps this does not happen
    /// in practice.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Decode a persisted slot value.
    ///
    /// # Errors
    ///
    /// Returns `serde_json::Error` when the text is not JSON or the top level
    /// is neither an object nor `null`.
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }

    /// Decode an exported document, rejecting anything that is not exactly
    /// `{ "<topic>": { "<question>": <bool> } }`.
    ///
    /// Unlike [`ProgressMap::from_json`] nothing is silently dropped.
    ///
    /// # Errors
    ///
    /// Returns `serde_json::Error` for a non-object or `null` top level, topic
    /// values that are not objects, non-numeric question keys and non-boolean
    /// flags.
    pub fn from_export(raw: &str) -> Result<Self, serde_json::Error> {
        let Value::Object(document) = serde_json::from_str::<Value>(raw)? else {
            return Err(serde_json::Error::custom("progress document must be an object"));
        };

        let mut topics = BTreeMap::new();
        for (topic, entries) in document {
            let Value::Object(entries) = entries else {
                return Err(serde_json::Error::custom(format!(
                    "topic `{topic}` must map question ids to flags"
                )));
            };
            let mut read = BTreeSet::new();
            for (id, flag) in entries {
                let question = id.parse::<QuestionId>().map_err(|_| {
                    serde_json::Error::custom(format!("`{id}` in `{topic}` is not a question id"))
                })?;
                match flag {
                    Value::Bool(true) => {
                        read.insert(question);
                    }
                    Value::Bool(false) => {}
                    _ => {
                        return Err(serde_json::Error::custom(format!(
                            "flag of `{topic}`/{id} must be a boolean"
                        )));
                    }
                }
            }
            if !read.is_empty() {
                topics.insert(TopicId::new(topic), read);
            }
        }
        Ok(Self { topics })
    }

    fn remove(&mut self, topic: &str, question: QuestionId) -> bool {
        let Some(read) = self.topics.get_mut(topic) else {
            return false;
        };
        let removed = read.remove(&question);
        if read.is_empty() {
            self.topics.remove(topic);
        }
        removed
    }

    fn from_raw(raw: BTreeMap<String, Value>) -> Self {
        let mut topics = BTreeMap::new();
        for (topic, entries) in raw {
            let Value::Object(entries) = entries else {
                continue;
            };
            let read: BTreeSet<QuestionId> = entries
                .iter()
                .filter(|(_, flag)| is_truthy(flag))
                .filter_map(|(id, _)| id.parse::<QuestionId>().ok())
                .collect();
            if !read.is_empty() {
                topics.insert(TopicId::new(topic), read);
            }
        }
        Self { topics }
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(n) => n.as_f64().is_some_and(|v| v != 0.0 && !v.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

impl Serialize for ProgressMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.topics.len()))?;
        for (topic, read) in &self.topics {
            let flags: BTreeMap<String, bool> =
                read.iter().map(|id| (id.to_string(), true)).collect();
            map.serialize_entry(topic, &flags)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for ProgressMap {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Option::<BTreeMap<String, Value>>::deserialize(deserializer)?;
        Ok(Self::from_raw(raw.unwrap_or_default()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn js() -> TopicId {
        TopicId::new("javascript")
    }

    fn q(id: u32) -> QuestionId {
        QuestionId::new(id)
    }

    #[test]
    fn toggle_is_its_own_inverse() {
        let mut map = ProgressMap::new();
        assert!(map.toggle(&js(), q(1)));
        assert!(map.is_read("javascript", q(1)));
        assert!(!map.toggle(&js(), q(1)));
        assert!(!map.is_read("javascript", q(1)));
        assert_eq!(map, ProgressMap::new());
    }

    #[test]
    fn removing_last_entry_drops_topic() {
        let mut map = ProgressMap::new();
        map.toggle(&js(), q(1));
        map.toggle(&js(), q(2));
        map.toggle(&js(), q(1));
        assert_eq!(map.topics().count(), 1);
        map.toggle(&js(), q(2));
        assert!(map.is_empty());
    }

    #[test]
    fn mark_all_is_idempotent() {
        let mut map = ProgressMap::new();
        map.toggle(&js(), q(2));
        let inserted = map.mark_all(&js(), [q(1), q(2), q(3)]);
        assert_eq!(inserted, 2);
        assert_eq!(map.read_count("javascript"), 3);
        assert_eq!(map.mark_all(&js(), [q(1), q(2), q(3)]), 0);
    }

    #[test]
    fn mark_all_with_no_ids_leaves_map_sparse() {
        let mut map = ProgressMap::new();
        assert_eq!(map.mark_all(&js(), std::iter::empty()), 0);
        assert!(map.is_empty());
    }

    #[test]
    fn clear_topic_reports_removed() {
        let mut map = ProgressMap::new();
        map.mark_all(&js(), [q(1), q(2)]);
        assert_eq!(map.clear_topic("javascript"), 2);
        assert_eq!(map.clear_topic("javascript"), 0);
        assert_eq!(map.read_count("javascript"), 0);
    }

    #[test]
    fn encodes_browser_compatible_shape() {
        let mut map = ProgressMap::new();
        map.mark_all(&js(), [q(2), q(1)]);
        map.toggle(&TopicId::new("css"), q(10));
        assert_eq!(
            map.to_json().unwrap(),
            r#"{"css":{"10":true},"javascript":{"1":true,"2":true}}"#
        );
    }

    #[test]
    fn json_round_trip_preserves_read_state() {
        let mut map = ProgressMap::new();
        map.mark_all(&js(), [q(1), q(3)]);
        map.toggle(&TopicId::new("css"), q(2));

        let restored = ProgressMap::from_json(&map.to_json().unwrap()).unwrap();
        assert_eq!(restored, map);
        assert!(restored.is_read("css", q(2)));
        assert!(!restored.is_read("css", q(1)));
    }

    #[test]
    fn decoding_drops_falsy_and_non_numeric_entries() {
        let raw = r#"{
            "javascript": { "1": true, "2": false, "3": 1, "4": null, "x": true },
            "css": "not-an-object",
            "html": { "1": false }
        }"#;

        let map = ProgressMap::from_json(raw).unwrap();
        assert_eq!(map.read_ids("javascript").collect::<Vec<_>>(), vec![q(1), q(3)]);
        assert_eq!(map.read_count("css"), 0);
        assert_eq!(map.topics().count(), 1);
    }

    #[test]
    fn null_decodes_as_empty() {
        assert!(ProgressMap::from_json("null").unwrap().is_empty());
    }

    #[test]
    fn export_decoding_rejects_anything_but_the_exact_shape() {
        assert!(ProgressMap::from_export("null").is_err());
        assert!(ProgressMap::from_export("[]").is_err());
        assert!(ProgressMap::from_export(r#"{"topics":[{"id":"css"}]}"#).is_err());
        assert!(ProgressMap::from_export(r#"{"css":{"x":true}}"#).is_err());
        assert!(ProgressMap::from_export(r#"{"css":{"1":1}}"#).is_err());
    }

    #[test]
    fn export_decoding_accepts_own_output() {
        let mut map = ProgressMap::new();
        map.mark_all(&js(), [q(1), q(3)]);
        assert_eq!(ProgressMap::from_export(&map.to_json().unwrap()).unwrap(), map);

        let map = ProgressMap::from_export(r#"{"css":{"1":false,"2":true}}"#).unwrap();
        assert_eq!(map.read_ids("css").collect::<Vec<_>>(), vec![q(2)]);
        assert!(ProgressMap::from_export("{}").unwrap().is_empty());
    }

    #[test]
    fn non_object_top_level_is_an_error() {
        assert!(ProgressMap::from_json("[1,2]").is_err());
        assert!(ProgressMap::from_json("{not json").is_err());
    }
}
