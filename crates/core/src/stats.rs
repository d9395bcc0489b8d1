use serde::Serialize;

use crate::catalog::Catalog;
use crate::progress::ProgressMap;

/// Completion figures for a topic or the whole catalog.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ProgressStats {
    pub read: usize,
    pub total: usize,
    pub pct: u32,
}

impl ProgressStats {
    #[must_use]
    pub fn new(read: usize, total: usize) -> Self {
        Self {
            read,
            total,
            pct: percent(read, total),
        }
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.total > 0 && self.read >= self.total
    }
}

/// Whole-catalog figures for a summary line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CatalogOverview {
    pub topics: usize,
    pub questions: usize,
    pub completed: usize,
    pub pct: u32,
}

/// `read / total * 100`, rounded half up. Zero when `total` is zero.
#[must_use]
pub fn percent(read: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    let read = read as u128;
    let total = total as u128;
    let rounded = (200 * read + total) / (2 * total);
    u32::try_from(rounded).unwrap_or(u32::MAX)
}

/// Derives completion statistics from the catalog and the progress map.
///
/// Nothing is cached; every call recomputes from the current inputs.
#[derive(Debug, Clone, Copy)]
pub struct ProgressAggregator<'a> {
    catalog: &'a Catalog,
    progress: &'a ProgressMap,
}

impl<'a> ProgressAggregator<'a> {
    #[must_use]
    pub fn new(catalog: &'a Catalog, progress: &'a ProgressMap) -> Self {
        Self { catalog, progress }
    }

    /// Progress of one topic. Unknown topics yield all zeros.
    ///
    /// Read entries are counted as stored, without checking them against the
    /// catalog, then capped at the topic's question count.
    #[must_use]
    pub fn topic_progress(&self, topic_id: &str) -> ProgressStats {
        let Some(topic) = self.catalog.topic(topic_id) else {
            return ProgressStats::default();
        };
        let total = topic.question_count();
        let read = self.progress.read_count(topic_id).min(total);
        ProgressStats::new(read, total)
    }

    /// Sum of every catalog topic's progress.
    #[must_use]
    pub fn total_progress(&self) -> ProgressStats {
        let (read, total) = self
            .catalog
            .topics()
            .iter()
            .map(|topic| self.topic_progress(topic.id().as_str()))
            .fold((0, 0), |(read, total), p| (read + p.read, total + p.total));
        ProgressStats::new(read, total)
    }

    #[must_use]
    pub fn overview(&self) -> CatalogOverview {
        let total = self.total_progress();
        CatalogOverview {
            topics: self.catalog.topic_count(),
            questions: self.catalog.question_count(),
            completed: total.read,
            pct: total.pct,
        }
    }
}
