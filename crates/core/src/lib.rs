#![forbid(unsafe_code)]

pub mod catalog;
pub mod model;
pub mod progress;
pub mod search;
pub mod stats;

pub use catalog::{Catalog, CatalogDocument, CatalogError};
pub use model::{ParseIdError, Question, QuestionId, Topic, TopicId};
pub use progress::ProgressMap;
pub use search::{
    SearchEntry, SearchIndex, SearchResults, TopicGroup, group_by_topic, highlight_ranges,
};
pub use stats::{CatalogOverview, ProgressAggregator, ProgressStats, percent};
