use std::collections::HashSet;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::OutlineError;

// ── Lenient field decoding ────────────────────────────────────────────────────

/// Field decoders that never reject a value of the wrong JSON type. A bad
/// field falls back to its default; a bad element of a child sequence is
/// dropped. Only syntax errors abort a parse.
mod lenient {
    use serde::de::DeserializeOwned;
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    pub fn string<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
        Ok(match Value::deserialize(d)? {
            Value::String(s) => s,
            Value::Number(n) => n.to_string(),
            _ => String::new(),
        })
    }

    pub fn opt_string<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
        Ok(match Value::deserialize(d)? {
            Value::String(s) => Some(s),
            _ => None,
        })
    }

    pub fn opt_u8<'de, D: Deserializer<'de>>(d: D) -> Result<Option<u8>, D::Error> {
        Ok(Value::deserialize(d)?
            .as_u64()
            .and_then(|n| u8::try_from(n).ok()))
    }

    pub fn opt_usize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<usize>, D::Error> {
        Ok(Value::deserialize(d)?
            .as_u64()
            .and_then(|n| usize::try_from(n).ok()))
    }

    pub fn boolean<'de, D: Deserializer<'de>>(d: D) -> Result<bool, D::Error> {
        Ok(Value::deserialize(d)?.as_bool().unwrap_or(false))
    }

    pub fn seq<'de, D, T>(d: D) -> Result<Vec<T>, D::Error>
    where
        D: Deserializer<'de>,
        T: DeserializeOwned,
    {
        let Value::Array(items) = Value::deserialize(d)? else {
            return Ok(vec![]);
        };
        Ok(items
            .into_iter()
            .enumerate()
            .filter_map(|(i, item)| match serde_json::from_value(item) {
                Ok(v) => Some(v),
                Err(e) => {
                    log::warn!("dropping malformed element #{i}: {e}");
                    None
                }
            })
            .collect())
    }
}

// ── Study aids (parsed, not rendered) ─────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Flashcard {
    #[serde(default, deserialize_with = "lenient::string")]
    pub front: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub back: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct QuizQuestion {
    #[serde(default, deserialize_with = "lenient::string")]
    pub question: String,
    #[serde(default, deserialize_with = "lenient::seq")]
    pub options: Vec<String>,
    #[serde(
        rename = "correctAnswerIndex",
        default,
        deserialize_with = "lenient::opt_usize",
        skip_serializing_if = "Option::is_none"
    )]
    pub correct_answer_index: Option<usize>,
}

// ── Outline tree ──────────────────────────────────────────────────────────────

/// Depth-3 leaf of the outline.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct NestedSubIdea {
    #[serde(default, deserialize_with = "lenient::string")]
    pub id: String,
    #[serde(default, deserialize_with = "lenient::opt_u8", skip_serializing_if = "Option::is_none")]
    pub level: Option<u8>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub title: String,
    #[serde(default, deserialize_with = "lenient::opt_string", skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, deserialize_with = "lenient::seq", skip_serializing_if = "Vec::is_empty")]
    pub flashcards: Vec<Flashcard>,
    #[serde(
        rename = "quizQuestions",
        default,
        deserialize_with = "lenient::seq",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub quiz_questions: Vec<QuizQuestion>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SubIdea {
    #[serde(default, deserialize_with = "lenient::string")]
    pub id: String,
    #[serde(default, deserialize_with = "lenient::opt_u8", skip_serializing_if = "Option::is_none")]
    pub level: Option<u8>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub title: String,
    #[serde(default, deserialize_with = "lenient::opt_string", skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, deserialize_with = "lenient::seq", skip_serializing_if = "Vec::is_empty")]
    pub flashcards: Vec<Flashcard>,
    #[serde(
        rename = "quizQuestions",
        default,
        deserialize_with = "lenient::seq",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub quiz_questions: Vec<QuizQuestion>,
    #[serde(default, deserialize_with = "lenient::seq", skip_serializing_if = "Vec::is_empty")]
    pub nested_sub_ideas: Vec<NestedSubIdea>,
}

/// A top-level idea. Each one is a tab in the summary reader.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct MainIdea {
    #[serde(default, deserialize_with = "lenient::string")]
    pub id: String,
    #[serde(default, deserialize_with = "lenient::opt_u8", skip_serializing_if = "Option::is_none")]
    pub level: Option<u8>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub title: String,
    #[serde(default, deserialize_with = "lenient::opt_string", skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, deserialize_with = "lenient::seq", skip_serializing_if = "Vec::is_empty")]
    pub flashcards: Vec<Flashcard>,
    #[serde(
        rename = "quizQuestions",
        default,
        deserialize_with = "lenient::seq",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub quiz_questions: Vec<QuizQuestion>,
    #[serde(default, deserialize_with = "lenient::seq", skip_serializing_if = "Vec::is_empty")]
    pub sub_ideas: Vec<SubIdea>,
}

/// Parsed study material of one project. Never mutated after parsing; all
/// view state lives beside it, keyed by node id.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Outline {
    #[serde(default, deserialize_with = "lenient::string")]
    pub subject: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub description: String,
    #[serde(default, deserialize_with = "lenient::seq")]
    pub ideas: Vec<MainIdea>,
}

/// A borrowed view of any node, regardless of depth.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NodeRef<'a> {
    pub id: &'a str,
    pub title: &'a str,
    pub content: Option<&'a str>,
    /// Structural depth: 1, 2 or 3.
    pub depth: u8,
    /// Index of the top-level idea this node lives under.
    pub tab: usize,
}

impl<'a> NodeRef<'a> {
    fn new(id: &'a str, title: &'a str, content: Option<&'a str>, depth: u8, tab: usize) -> Self {
        NodeRef { id, title, content, depth, tab }
    }
}

impl Outline {
    pub fn parse(raw: &str) -> Result<Self, OutlineError> {
        let value: Value = serde_json::from_str(raw)?;
        if !value.is_object() {
            return Err(OutlineError::NotAnObject);
        }
        let outline: Outline = serde_json::from_value(value)?;
        let dups = outline.duplicate_ids();
        if !dups.is_empty() {
            log::warn!(
                "outline `{}` repeats node ids ({}); the first occurrence wins",
                outline.subject,
                dups.join(", ")
            );
        }
        Ok(outline)
    }

    /// Id of the first tab's root. Empty ids (absent in the file) are not ids.
    pub fn first_idea_id(&self) -> Option<&str> {
        self.ideas.first().map(|i| i.id.as_str()).filter(|id| !id.is_empty())
    }

    /// Every node in document order (depth-first, parents before children).
    pub fn nodes(&self) -> impl Iterator<Item = NodeRef<'_>> + '_ {
        self.ideas.iter().enumerate().flat_map(|(tab, idea)| {
            let subs = idea.sub_ideas.iter().flat_map(move |sub| {
                let nested = sub.nested_sub_ideas.iter().map(move |n| {
                    NodeRef::new(&n.id, &n.title, n.content.as_deref(), 3, tab)
                });
                std::iter::once(NodeRef::new(&sub.id, &sub.title, sub.content.as_deref(), 2, tab))
                    .chain(nested)
            });
            std::iter::once(NodeRef::new(&idea.id, &idea.title, idea.content.as_deref(), 1, tab))
                .chain(subs)
        })
    }

    /// Flat lookup by id; the first match in document order wins. Stops at
    /// the match, and never matches the empty id.
    pub fn node(&self, id: &str) -> Option<NodeRef<'_>> {
        if id.is_empty() {
            return None;
        }
        self.nodes().find(|n| n.id == id)
    }

    /// Ids that occur more than once, each reported once, in first-seen order.
    /// Nodes without an id are not counted.
    pub fn duplicate_ids(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        let mut dups: Vec<String> = Vec::new();
        for n in self.nodes().filter(|n| !n.id.is_empty()) {
            if !seen.insert(n.id) && !dups.iter().any(|d| d == n.id) {
                dups.push(n.id.to_owned());
            }
        }
        dups
    }
}

impl MainIdea {
    pub fn has_children(&self) -> bool {
        !self.sub_ideas.is_empty()
    }
}

impl SubIdea {
    pub fn has_children(&self) -> bool {
        !self.nested_sub_ideas.is_empty()
    }
}

// ── Project ───────────────────────────────────────────────────────────────────

/// A source document the project was generated from.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SourceFile {
    #[serde(default, deserialize_with = "lenient::string")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub content: String,
    #[serde(default, deserialize_with = "lenient::boolean")]
    pub selected: bool,
}

/// One entry of an uploaded projects file. Only `subject`, `createdAt` and
/// `studyMaterialsJson` drive the viewer; the rest is carried along as-is.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Project {
    #[serde(default, deserialize_with = "lenient::string")]
    pub subject: String,
    #[serde(rename = "createdAt", default, deserialize_with = "lenient::string")]
    pub created_at: String,
    #[serde(rename = "uploadedFiles", default, deserialize_with = "lenient::seq")]
    pub uploaded_files: Vec<SourceFile>,
    #[serde(rename = "outlineJson", default, deserialize_with = "lenient::opt_string")]
    pub outline_json: Option<String>,
    #[serde(rename = "outlineWithSummariesJson", default, deserialize_with = "lenient::opt_string")]
    pub outline_with_summaries_json: Option<String>,
    #[serde(rename = "finalContentJson", default, deserialize_with = "lenient::opt_string")]
    pub final_content_json: Option<String>,
    #[serde(rename = "studyMaterialsJson", default, deserialize_with = "lenient::opt_string")]
    pub study_materials_json: Option<String>,
    #[serde(rename = "fullScript", default, deserialize_with = "lenient::opt_string")]
    pub full_script: Option<String>,
    #[serde(rename = "audioSegments", default, deserialize_with = "lenient::seq")]
    pub audio_segments: Vec<String>,
    /// Fields this viewer does not know about.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Project {
    /// Parse this project's study materials.
    pub fn outline(&self) -> Result<Outline, OutlineError> {
        match &self.study_materials_json {
            Some(raw) => Outline::parse(raw),
            None => Err(OutlineError::Missing),
        }
    }

    pub fn display_subject(&self) -> &str {
        if self.subject.trim().is_empty() {
            "Untitled project"
        } else {
            &self.subject
        }
    }

    pub fn created_on(&self) -> String {
        format_created_at(&self.created_at)
    }
}

/// Render an ISO-8601 timestamp or date as e.g. "January 5, 2024".
pub fn format_created_at(raw: &str) -> String {
    const FMT: &str = "%B %-d, %Y";
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return dt.format(FMT).to_string();
    }
    for pattern in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, pattern) {
            return dt.format(FMT).to_string();
        }
    }
    match NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        Ok(d) => d.format(FMT).to_string(),
        Err(_) => "Invalid Date".to_owned(),
    }
}

// ── Viewer settings ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScrollAlign {
    Center,
    Top,
}

impl ScrollAlign {
    pub fn label(self) -> &'static str {
        match self {
            ScrollAlign::Center => "Center",
            ScrollAlign::Top    => "Top",
        }
    }
    pub fn to_egui(self) -> egui::Align {
        match self {
            ScrollAlign::Center => egui::Align::Center,
            ScrollAlign::Top    => egui::Align::Min,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ViewerSettings {
    /// Base font size of the summary reader; headings scale from it.
    pub document_font_size: f32,
    /// Where a newly selected node lands inside the reader.
    pub scroll_align: ScrollAlign,
    /// Open every branch of the mind map when it is first shown.
    pub mind_map_expanded: bool,
}

impl Default for ViewerSettings {
    fn default() -> Self {
        ViewerSettings {
            document_font_size: 15.0,
            scroll_align: ScrollAlign::Center,
            mind_map_expanded: true,
        }
    }
}

// ── View modes ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ViewMode {
    Summary,
    MindMap,
    Flashcards,
    Quiz,
}

impl ViewMode {
    pub fn all() -> [ViewMode; 4] {
        [ViewMode::Summary, ViewMode::MindMap, ViewMode::Flashcards, ViewMode::Quiz]
    }
    pub fn icon(self) -> &'static str {
        match self {
            ViewMode::Summary    => "📄",
            ViewMode::MindMap    => "🔗",
            ViewMode::Flashcards => "✨",
            ViewMode::Quiz       => "🧩",
        }
    }
    pub fn label(self) -> &'static str {
        match self {
            ViewMode::Summary    => "Summary",
            ViewMode::MindMap    => "Mind Map",
            ViewMode::Flashcards => "Flashcards",
            ViewMode::Quiz       => "Quiz",
        }
    }
    /// Flashcards and quiz are shown in the view bar but cannot be opened yet.
    pub fn is_available(self) -> bool {
        matches!(self, ViewMode::Summary | ViewMode::MindMap)
    }
}
