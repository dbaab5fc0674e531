use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    Rag,
    Image,
    Weather,
    Sql,
    Recommend,
    Chat,
}

// Checked in order; the first matching group wins.
const HINTS: &[(Intent, &[&str])] = &[
    (Intent::Rag, &["from the document", "according to", "cite", "source"]),
    (Intent::Image, &["draw", "image", "generate a picture", "logo", "icon"]),
    (Intent::Weather, &["weather", "temperature", "forecast"]),
    (Intent::Sql, &["sql", "query", "table", "database"]),
    (Intent::Recommend, &["recommend", "suggest", "similar"]),
];

/// Case-insensitive substring routing. Any mention of `select` is SQL.
pub fn detect_intent(text: &str) -> Intent {
    let t = text.to_lowercase();
    if t.contains("select") {
        return Intent::Sql;
    }
    HINTS
        .iter()
        .find(|(_, keys)| keys.iter().any(|k| t.contains(k)))
        .map_or(Intent::Chat, |(intent, _)| *intent)
}

/// Trim and collapse runs of whitespace to single spaces.
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
