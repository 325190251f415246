use thiserror::Error;

// ── Upload errors ─────────────────────────────────────────────────────────────

/// Failures that abort an upload before any project can be listed.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Invalid file type `{0}`. Please upload a JSON file.")]
    UnsupportedMediaType(String),
    #[error("File is empty or could not be read.")]
    Empty,
    #[error("Failed to read the file.")]
    Unreadable(#[source] std::io::Error),
    #[error("The file is not valid UTF-8 text.")]
    Encoding,
    #[error("Failed to parse JSON: {0}")]
    Syntax(#[source] serde_json::Error),
    #[error("Invalid JSON structure. The root element must be an array of projects.")]
    NotAnArray,
}

// ── Per-project outline errors ────────────────────────────────────────────────

/// Failures confined to a single project's study materials. These never
/// reach the banner; the detail view shows a placeholder instead.
#[derive(Debug, Error)]
pub enum OutlineError {
    #[error("project has no study materials")]
    Missing,
    #[error("study materials are not valid JSON: {0}")]
    Syntax(#[from] serde_json::Error),
    #[error("study materials must be a JSON object")]
    NotAnObject,
}
