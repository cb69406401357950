use crate::{
    AppState, Effect, HistoryEntry, Msg, RequestContext, RequestId, RequestOutcome, ResultKind,
    StagedInput,
};

pub const PROMPT_ENTER_URL: &str = "Please enter a URL.";
pub const PROMPT_ENTER_QUESTION: &str = "Please enter a question.";
pub const STATUS_SUMMARIZING: &str = "Scraping and summarizing...";
pub const STATUS_THINKING: &str = "Thinking...";

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::UrlChanged(text) => {
            state.set_url_input(text);
            Vec::new()
        }
        Msg::QuestionChanged(text) => {
            state.set_question_input(text);
            Vec::new()
        }
        Msg::ActiveTabResolved(url) => {
            if let Some(url) = url.filter(|url| !url.is_empty()) {
                if state.url_input().is_empty() {
                    state.set_url_input(url);
                }
            }
            Vec::new()
        }
        Msg::StagedInputLoaded(staged) => {
            apply_staged(&mut state, staged);
            Vec::new()
        }
        Msg::SummarizeClicked => summarize(&mut state),
        Msg::AskClicked => ask(&mut state),
        Msg::RequestResolved {
            request_id,
            kind,
            outcome,
        } => resolve(&mut state, request_id, kind, outcome),
    };

    (state, effects)
}

fn apply_staged(state: &mut AppState, staged: StagedInput) {
    if let Some(url) = staged.last_url.filter(|url| !url.is_empty()) {
        if state.url_input().is_empty() {
            state.set_url_input(url);
        }
    }
    if let Some(question) = staged.last_q.filter(|q| !q.is_empty()) {
        // Never overwrite a question the user already started typing.
        if state.options().autofill_staged_question && state.question_input().is_empty() {
            state.set_question_input(question.clone());
        }
        state.set_staged_question(question);
    }
}

fn summarize(state: &mut AppState) -> Vec<Effect> {
    // One call per region at a time; a second click while loading is ignored.
    if state.is_loading(ResultKind::Summary) {
        return Vec::new();
    }
    let url = state.url_input().trim().to_string();
    if url.is_empty() {
        state.show_text(ResultKind::Summary, PROMPT_ENTER_URL);
        return Vec::new();
    }

    let context = RequestContext {
        url,
        question: None,
    };
    let request_id = state.begin_request(ResultKind::Summary, context.clone(), STATUS_SUMMARIZING);
    vec![Effect::Submit {
        request_id,
        kind: ResultKind::Summary,
        context,
    }]
}

fn ask(state: &mut AppState) -> Vec<Effect> {
    if state.is_loading(ResultKind::Answer) {
        return Vec::new();
    }
    let url = state.url_input().trim().to_string();
    let question = state.question_input().trim().to_string();
    if url.is_empty() {
        state.show_text(ResultKind::Answer, PROMPT_ENTER_URL);
        return Vec::new();
    }
    if question.is_empty() {
        state.show_text(ResultKind::Answer, PROMPT_ENTER_QUESTION);
        return Vec::new();
    }

    let context = RequestContext {
        url,
        question: Some(question),
    };
    let request_id = state.begin_request(ResultKind::Answer, context.clone(), STATUS_THINKING);
    vec![Effect::Submit {
        request_id,
        kind: ResultKind::Answer,
        context,
    }]
}

fn resolve(
    state: &mut AppState,
    request_id: RequestId,
    kind: ResultKind,
    outcome: RequestOutcome,
) -> Vec<Effect> {
    let Some(context) = state.finish_request(kind, request_id) else {
        return Vec::new();
    };

    let html = match outcome {
        RequestOutcome::Rendered(html) => html,
        RequestOutcome::Failed(message) => {
            state.show_text(kind, &format!("Error: {message}"));
            return Vec::new();
        }
    };

    match kind {
        ResultKind::Summary => {
            state.show_html(kind, html);
            vec![Effect::PersistStaged(StagedInput {
                last_url: Some(context.url),
                last_q: None,
            })]
        }
        ResultKind::Answer => {
            let question = context.question.unwrap_or_default();
            state.show_html(kind, html.clone());
            state.prepend_history(HistoryEntry {
                question: question.clone(),
                answer_html: html,
            });
            state.set_question_input(String::new());
            vec![Effect::PersistStaged(StagedInput {
                last_url: Some(context.url),
                last_q: Some(question),
            })]
        }
    }
}
