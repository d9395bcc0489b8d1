/// Blurbs for the stock topics, used when the catalog carries none.
const BUILT_IN: &[(&str, &str)] = &[
    (
        "javascript",
        "Core JS concepts every developer must know: closures, async/await, the event loop, and ES6+ features.",
    ),
    (
        "css",
        "Layouts, animations, specificity, responsive design, and modern CSS features for production UIs.",
    ),
    (
        "html",
        "Semantic markup, accessibility, forms, performance, and the HTML5 APIs used in real projects.",
    ),
    (
        "nodejs",
        "Server-side JavaScript: the event loop, streams, modules, the file system, and the Node.js runtime.",
    ),
    (
        "expressjs",
        "REST API development, middleware, authentication, error handling, and production-ready patterns.",
    ),
    (
        "angular",
        "Angular components, state management, RxJS, routing, performance, and enterprise patterns.",
    ),
    (
        "oracle",
        "Oracle SQL, PL/SQL, indexing, partitioning, analytic functions, and query optimization.",
    ),
    (
        "project",
        "Your project experience: architecture decisions, challenges, and hands-on expertise.",
    ),
];

#[must_use]
pub fn built_in(topic_id: &str) -> Option<&'static str> {
    BUILT_IN
        .iter()
        .find(|(id, _)| *id == topic_id)
        .map(|(_, text)| *text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_and_unknown_topics() {
        assert!(built_in("css").is_some_and(|d| d.contains("specificity")));
        assert!(built_in("rust").is_none());
    }
}
