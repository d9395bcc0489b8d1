mod ids;
mod topic;

pub use ids::{ParseIdError, QuestionId, TopicId};
pub use topic::{Question, Topic};
