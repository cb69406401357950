use crate::{HistoryEntry, RegionContent};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RegionView {
    pub content: RegionContent,
    pub loading: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppViewModel {
    pub url_input: String,
    pub question_input: String,
    /// Question staged by the background context, surfaced but not auto-filled.
    pub staged_question: Option<String>,
    pub summary: RegionView,
    pub answer: RegionView,
    /// Newest first.
    pub history: Vec<HistoryEntry>,
    pub dirty: bool,
}
