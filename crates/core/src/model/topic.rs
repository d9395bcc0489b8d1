use serde::{Deserialize, Serialize};

use crate::model::ids::{QuestionId, TopicId};

//
// ─── QUESTION ──────────────────────────────────────────────────────────────────
//

/// A single interview question with its answer and a code example.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    id: QuestionId,
    question: String,
    answer: String,
    #[serde(default)]
    example: String,
}

impl Question {
    #[must_use]
    pub fn new(
        id: QuestionId,
        question: impl Into<String>,
        answer: impl Into<String>,
        example: impl Into<String>,
    ) -> Self {
        Self {
            id,
            question: question.into(),
            answer: answer.into(),
            example: example.into(),
        }
    }

    #[must_use]
    pub fn id(&self) -> QuestionId {
        self.id
    }

    #[must_use]
    pub fn question(&self) -> &str {
        &self.question
    }

    #[must_use]
    pub fn answer(&self) -> &str {
        &self.answer
    }

    #[must_use]
    pub fn example(&self) -> &str {
        &self.example
    }
}

//
// ─── TOPIC ─────────────────────────────────────────────────────────────────────
//

/// A named group of questions, e.g. one subject area.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Topic {
    id: TopicId,
    name: String,
    #[serde(default)]
    icon: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    #[serde(default)]
    questions: Vec<Question>,
}

impl Topic {
    #[must_use]
    pub fn new(
        id: TopicId,
        name: impl Into<String>,
        icon: impl Into<String>,
        questions: Vec<Question>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            icon: icon.into(),
            description: None,
            questions,
        }
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn id(&self) -> &TopicId {
        &self.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn icon(&self) -> &str {
        &self.icon
    }

    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Questions in catalog order.
    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    #[must_use]
    pub fn question_count(&self) -> usize {
        self.questions.len()
    }

    #[must_use]
    pub fn question(&self, id: QuestionId) -> Option<&Question> {
        self.questions.iter().find(|q| q.id() == id)
    }

    /// Question ids in catalog order.
    pub fn question_ids(&self) -> impl Iterator<Item = QuestionId> + '_ {
        self.questions.iter().map(Question::id)
    }
}
