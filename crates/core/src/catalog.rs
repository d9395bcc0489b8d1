use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::{QuestionId, Topic, TopicId};

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

/// Failure to obtain a usable catalog. Always fatal for the session.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CatalogError {
    #[error("catalog source unavailable: {0}")]
    Unavailable(String),

    #[error("catalog is malformed: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("topic #{index} has an empty id")]
    EmptyTopicId { index: usize },

    #[error("duplicate topic id: {0}")]
    DuplicateTopic(TopicId),

    #[error("duplicate question id {question} in topic {topic}")]
    DuplicateQuestion { topic: TopicId, question: QuestionId },
}

//
// ─── DOCUMENT ──────────────────────────────────────────────────────────────────
//

/// Raw shape of the question bank document: `{ "topics": [...] }`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogDocument {
    pub topics: Vec<Topic>,
}

//
// ─── CATALOG ───────────────────────────────────────────────────────────────────
//

/// Immutable, validated set of topics in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    topics: Vec<Topic>,
}

impl Catalog {
    /// Validate a decoded document into a catalog.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` when a topic id is empty or repeated, or when a
    /// question id repeats inside one topic.
    pub fn from_document(document: CatalogDocument) -> Result<Self, CatalogError> {
        let mut seen_topics = HashSet::with_capacity(document.topics.len());
        for (index, topic) in document.topics.iter().enumerate() {
            if topic.id().as_str().trim().is_empty() {
                return Err(CatalogError::EmptyTopicId { index });
            }
            if !seen_topics.insert(topic.id().clone()) {
                return Err(CatalogError::DuplicateTopic(topic.id().clone()));
            }

            let mut seen_questions = HashSet::with_capacity(topic.question_count());
            for id in topic.question_ids() {
                if !seen_questions.insert(id) {
                    return Err(CatalogError::DuplicateQuestion {
                        topic: topic.id().clone(),
                        question: id,
                    });
                }
            }
        }

        Ok(Self {
            topics: document.topics,
        })
    }

    /// Decode and validate a JSON question bank.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Malformed` for invalid JSON and the validation
    /// errors of [`Catalog::from_document`].
    pub fn from_json(raw: &str) -> Result<Self, CatalogError> {
        let document: CatalogDocument = serde_json::from_str(raw)?;
        Self::from_document(document)
    }

    /// Build a catalog from topics without going through a document.
    ///
    /// # Errors
    ///
    /// Same validation as [`Catalog::from_document`].
    pub fn from_topics(topics: Vec<Topic>) -> Result<Self, CatalogError> {
        Self::from_document(CatalogDocument { topics })
    }

    #[must_use]
    pub fn topics(&self) -> &[Topic] {
        &self.topics
    }

    #[must_use]
    pub fn topic(&self, id: &str) -> Option<&Topic> {
        self.topics.iter().find(|t| t.id().as_str() == id)
    }

    #[must_use]
    pub fn topic_count(&self) -> usize {
        self.topics.len()
    }

    /// Number of questions across all topics.
    #[must_use]
    pub fn question_count(&self) -> usize {
        self.topics.iter().map(Topic::question_count).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.topics.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Question;

    fn topic(id: &str, question_ids: &[u32]) -> Topic {
        Topic::new(
            TopicId::new(id),
            id.to_uppercase(),
            "*",
            question_ids
                .iter()
                .map(|q| Question::new(QuestionId::new(*q), format!("Q{q}"), "A", ""))
                .collect(),
        )
    }

    #[test]
    fn parses_question_bank_json() {
        let raw = r#"{
            "topics": [
                { "id": "javascript", "name": "JavaScript", "icon": "JS", "questions": [
                    { "id": 1, "question": "What is a closure?", "answer": "A function with its scope.", "example": "() => x" },
                    { "id": 2, "question": "What is hoisting?", "answer": "Declarations move up.", "example": "var a;" }
                ]},
                { "id": "css", "name": "CSS", "icon": "CSS", "questions": [] }
            ]
        }"#;

        let catalog = Catalog::from_json(raw).unwrap();
        assert_eq!(catalog.topic_count(), 2);
        assert_eq!(catalog.question_count(), 2);
        assert_eq!(catalog.topic("css").map(Topic::name), Some("CSS"));
        assert!(catalog.topic("nope").is_none());
    }

    #[test]
    fn malformed_json_is_rejected() {
        let err = Catalog::from_json("{ \"topics\": [ { \"id\": 3 } ]").unwrap_err();
        assert!(matches!(err, CatalogError::Malformed(_)));
    }

    #[test]
    fn missing_topics_key_is_rejected() {
        let err = Catalog::from_json("{}").unwrap_err();
        assert!(matches!(err, CatalogError::Malformed(_)));
    }

    #[test]
    fn duplicate_topic_is_rejected() {
        let err = Catalog::from_topics(vec![topic("css", &[1]), topic("css", &[2])]).unwrap_err();
        assert!(matches!(err, CatalogError::DuplicateTopic(id) if id.as_str() == "css"));
    }

    #[test]
    fn duplicate_question_within_topic_is_rejected() {
        let err = Catalog::from_topics(vec![topic("css", &[1, 2, 1])]).unwrap_err();
        assert!(matches!(
            err,
            CatalogError::DuplicateQuestion { question, .. } if question == QuestionId::new(1)
        ));
    }

    #[test]
    fn same_question_id_in_different_topics_is_fine() {
        let catalog = Catalog::from_topics(vec![topic("css", &[1]), topic("html", &[1])]).unwrap();
        assert_eq!(catalog.question_count(), 2);
    }

    #[test]
    fn blank_topic_id_is_rejected() {
        let err = Catalog::from_topics(vec![topic(" ", &[])]).unwrap_err();
        assert!(matches!(err, CatalogError::EmptyTopicId { index: 0 }));
    }
}
