use std::collections::VecDeque;

use crate::view_model::{AppViewModel, RegionView};

pub type RequestId = u64;

/// Which output region a request feeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResultKind {
    Summary,
    Answer,
}

/// What a region currently displays.
///
/// `Text` is shown verbatim (prompts, status and error lines); `Html` is the
/// rendered output of a successful request.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum RegionContent {
    #[default]
    Empty,
    Text(String),
    Html(String),
}

impl RegionContent {
    pub fn as_str(&self) -> &str {
        match self {
            RegionContent::Empty => "",
            RegionContent::Text(text) | RegionContent::Html(text) => text,
        }
    }
}

/// Validated input for one outbound call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestContext {
    pub url: String,
    pub question: Option<String>,
}

/// Values handed between the background and popup contexts through the relay.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StagedInput {
    pub last_url: Option<String>,
    pub last_q: Option<String>,
}

/// One answered question, newest entries first in the history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    pub question: String,
    pub answer_html: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PopupOptions {
    /// Fill an empty question field from the staged question on startup.
    pub autofill_staged_question: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct InFlight {
    request_id: RequestId,
    context: RequestContext,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
struct Region {
    content: RegionContent,
    in_flight: Option<InFlight>,
}

impl Region {
    fn view(&self) -> RegionView {
        RegionView {
            content: self.content.clone(),
            loading: self.in_flight.is_some(),
        }
    }
}

/// State of one popup surface. Constructed when the surface opens and dropped
/// with it; nothing here outlives the surface except what is written to the relay.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppState {
    options: PopupOptions,
    url_input: String,
    question_input: String,
    staged_question: Option<String>,
    summary: Region,
    answer: Region,
    history: VecDeque<HistoryEntry>,
    next_request_id: RequestId,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: PopupOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    pub fn view(&self) -> AppViewModel {
        AppViewModel {
            url_input: self.url_input.clone(),
            question_input: self.question_input.clone(),
            staged_question: self.staged_question.clone(),
            summary: self.summary.view(),
            answer: self.answer.view(),
            history: self.history.iter().cloned().collect(),
            dirty: self.dirty,
        }
    }

    /// Returns whether anything visible changed since the last call, and resets the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub fn is_loading(&self, kind: ResultKind) -> bool {
        self.region(kind).in_flight.is_some()
    }

    pub(crate) fn options(&self) -> PopupOptions {
        self.options
    }

    pub(crate) fn url_input(&self) -> &str {
        &self.url_input
    }

    pub(crate) fn question_input(&self) -> &str {
        &self.question_input
    }

    pub(crate) fn set_url_input(&mut self, text: String) {
        if self.url_input != text {
            self.url_input = text;
            self.dirty = true;
        }
    }

    pub(crate) fn set_question_input(&mut self, text: String) {
        if self.question_input != text {
            self.question_input = text;
            self.dirty = true;
        }
    }

    pub(crate) fn set_staged_question(&mut self, question: String) {
        self.staged_question = Some(question);
        self.dirty = true;
    }

    pub(crate) fn show_text(&mut self, kind: ResultKind, text: &str) {
        self.region_mut(kind).content = RegionContent::Text(text.to_string());
        self.dirty = true;
    }

    /// Marks the region as loading with an interim status and returns the id
    /// for the outbound call.
    pub(crate) fn begin_request(
        &mut self,
        kind: ResultKind,
        context: RequestContext,
        status: &str,
    ) -> RequestId {
        self.next_request_id += 1;
        let request_id = self.next_request_id;
        let region = self.region_mut(kind);
        region.content = RegionContent::Text(status.to_string());
        region.in_flight = Some(InFlight {
            request_id,
            context,
        });
        self.dirty = true;
        request_id
    }

    /// Clears the loading flag for `request_id` and hands back its context.
    /// Returns `None` when the region is not waiting on that request.
    pub(crate) fn finish_request(
        &mut self,
        kind: ResultKind,
        request_id: RequestId,
    ) -> Option<RequestContext> {
        let region = self.region_mut(kind);
        match &region.in_flight {
            Some(in_flight) if in_flight.request_id == request_id => {}
            _ => return None,
        }
        let in_flight = region.in_flight.take()?;
        self.dirty = true;
        Some(in_flight.context)
    }

    pub(crate) fn show_html(&mut self, kind: ResultKind, html: String) {
        self.region_mut(kind).content = RegionContent::Html(html);
        self.dirty = true;
    }

    pub(crate) fn prepend_history(&mut self, entry: HistoryEntry) {
        self.history.push_front(entry);
        self.dirty = true;
    }

    fn region(&self, kind: ResultKind) -> &Region {
        match kind {
            ResultKind::Summary => &self.summary,
            ResultKind::Answer => &self.answer,
        }
    }

    fn region_mut(&mut self, kind: ResultKind) -> &mut Region {
        match kind {
            ResultKind::Summary => &mut self.summary,
            ResultKind::Answer => &mut self.answer,
        }
    }
}
