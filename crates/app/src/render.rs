//! Plain-text views over session queries.

use prep_core::{CatalogOverview, ProgressStats, Question, SearchResults, Topic, highlight_ranges};
use services::StudySession;

const BAR_WIDTH: usize = 20;

#[must_use]
pub fn progress_bar(pct: u32, width: usize) -> String {
    let pct = pct.min(100) as usize;
    let filled = (pct * width + 50) / 100;
    format!("[{}{}]", "#".repeat(filled), "-".repeat(width - filled))
}

/// Wrap every case-insensitive occurrence of `term` in `**`.
#[must_use]
pub fn highlight(text: &str, term: &str) -> String {
    let mut out = String::with_capacity(text.len() + 8);
    let mut cursor = 0;
    for range in highlight_ranges(text, term) {
        out.push_str(&text[cursor..range.start]);
        out.push_str("**");
        out.push_str(&text[range.clone()]);
        out.push_str("**");
        cursor = range.end;
    }
    out.push_str(&text[cursor..]);
    out
}

#[must_use]
pub fn overview_line(overview: &CatalogOverview) -> String {
    format!(
        "{} total questions | {} completed | {}% overall progress | {} topics covered",
        overview.questions, overview.completed, overview.pct, overview.topics
    )
}

#[must_use]
pub fn topic_list(session: &StudySession) -> String {
    let mut out = format!(
        "{}\n{}\n\n",
        overview_line(&session.overview()),
        progress_bar(session.total_progress().pct, BAR_WIDTH * 2)
    );

    for topic in session.topics() {
        let stats = session.topic_progress(topic.id().as_str());
        out.push_str(&format!(
            "{} {:<24} {} {:>3}%  {}/{} done  ({})\n",
            topic.icon(),
            topic.name(),
            progress_bar(stats.pct, BAR_WIDTH),
            stats.pct,
            stats.read,
            stats.total,
            topic.id()
        ));
        if let Some(description) = session.topic_description(topic.id().as_str()) {
            out.push_str(&format!("    {description}\n"));
        }
    }
    out
}

#[must_use]
pub fn topic_header(topic: &Topic, stats: &ProgressStats) -> String {
    format!(
        "{} {}\n{} interview questions - {} completed",
        topic.icon(),
        topic.name(),
        topic.question_count(),
        stats.read
    )
}

#[must_use]
pub fn question_card(question: &Question, number: usize, read: bool, term: &str) -> String {
    let mark = if read { "[x]" } else { "[ ]" };
    let text = if term.is_empty() {
        question.question().to_owned()
    } else {
        highlight(question.question(), term)
    };

    let mut out = format!("{number:>3}. {mark} {text}  (#{})\n", question.id());
    out.push_str(&format!("     Answer: {}\n", question.answer()));
    if !question.example().trim().is_empty() {
        out.push_str("     Example:\n");
        for line in question.example().lines() {
            out.push_str(&format!("       {line}\n"));
        }
    }
    out
}

#[must_use]
pub fn topic_view(session: &StudySession, topic: &Topic) -> String {
    let stats = session.topic_progress(topic.id().as_str());
    let mut out = topic_header(topic, &stats);
    out.push_str("\n\n");
    if topic.questions().is_empty() {
        out.push_str("No questions found.\n");
        return out;
    }
    for (idx, question) in topic.questions().iter().enumerate() {
        let read = session.is_read(topic.id().as_str(), question.id());
        out.push_str(&question_card(question, idx + 1, read, ""));
    }
    out
}

#[must_use]
pub fn search_view(session: &StudySession, results: &SearchResults<'_>) -> String {
    let term = results.term();
    if results.is_empty() {
        return format!("No questions found for \"{term}\"\nNo results found. Try different keywords.\n");
    }

    let mut out = format!(
        "Found {} questions matching \"{term}\" across: {}\n",
        results.len(),
        results.topic_names().join(", ")
    );

    let mut number = 1;
    for group in results.group_by_topic() {
        out.push_str(&format!(
            "\n{} {} ({})\n",
            group.topic_icon,
            group.topic_name.to_uppercase(),
            group.entries.len()
        ));
        for entry in &group.entries {
            let read = session.is_read(group.topic_id.as_str(), entry.question().id());
            out.push_str(&question_card(entry.question(), number, read, term));
            number += 1;
        }
    }
    out
}
