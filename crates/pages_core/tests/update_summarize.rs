use std::sync::Once;

use pages_core::{
    update, AppState, Effect, Msg, RegionContent, RequestContext, RequestOutcome, ResultKind,
    StagedInput, PROMPT_ENTER_URL, STATUS_SUMMARIZING,
};
use pretty_assertions::assert_eq;

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(pages_logging::initialize_for_tests);
}

fn summarize(state: AppState, url: &str) -> (AppState, Vec<Effect>) {
    let (state, _) = update(state, Msg::UrlChanged(url.to_string()));
    update(state, Msg::SummarizeClicked)
}

fn submitted_id(effects: &[Effect]) -> u64 {
    effects
        .iter()
        .find_map(|effect| match effect {
            Effect::Submit { request_id, .. } => Some(*request_id),
            _ => None,
        })
        .expect("submit effect")
}

#[test]
fn summarize_issues_one_call_with_trimmed_url() {
    init_logging();
    let (state, effects) = summarize(AppState::new(), "  https://example.com  ");

    assert_eq!(
        effects,
        vec![Effect::Submit {
            request_id: 1,
            kind: ResultKind::Summary,
            context: RequestContext {
                url: "https://example.com".to_string(),
                question: None,
            },
        }]
    );
    let view = state.view();
    assert!(view.summary.loading);
    assert!(!view.answer.loading);
    assert_eq!(
        view.summary.content,
        RegionContent::Text(STATUS_SUMMARIZING.to_string())
    );
}

#[test]
fn blank_url_prompts_without_calling() {
    init_logging();
    for input in ["", "   ", "\t\n"] {
        let (state, effects) = summarize(AppState::new(), input);

        assert!(effects.is_empty(), "input {input:?} produced effects");
        let view = state.view();
        assert!(!view.summary.loading);
        assert_eq!(
            view.summary.content,
            RegionContent::Text(PROMPT_ENTER_URL.to_string())
        );
    }
}

#[test]
fn success_renders_html_and_persists_url_only() {
    init_logging();
    let (state, effects) = summarize(AppState::new(), "https://example.com");
    let request_id = submitted_id(&effects);

    let (state, effects) = update(
        state,
        Msg::RequestResolved {
            request_id,
            kind: ResultKind::Summary,
            outcome: RequestOutcome::Rendered("<p><strong>Hi</strong></p>\n".to_string()),
        },
    );

    let view = state.view();
    assert!(!view.summary.loading);
    assert_eq!(
        view.summary.content,
        RegionContent::Html("<p><strong>Hi</strong></p>\n".to_string())
    );
    assert!(view.history.is_empty());
    assert_eq!(
        effects,
        vec![Effect::PersistStaged(StagedInput {
            last_url: Some("https://example.com".to_string()),
            last_q: None,
        })]
    );
}

#[test]
fn failure_shows_error_and_clears_loading() {
    init_logging();
    let (state, effects) = summarize(AppState::new(), "https://example.com");
    let request_id = submitted_id(&effects);

    let (state, effects) = update(
        state,
        Msg::RequestResolved {
            request_id,
            kind: ResultKind::Summary,
            outcome: RequestOutcome::Failed("HTTP 500: boom".to_string()),
        },
    );

    let view = state.view();
    assert!(!view.summary.loading);
    assert_eq!(
        view.summary.content,
        RegionContent::Text("Error: HTTP 500: boom".to_string())
    );
    assert!(view.history.is_empty());
    assert!(effects.is_empty());
}

#[test]
fn second_click_while_loading_is_rejected() {
    init_logging();
    let (state, effects) = summarize(AppState::new(), "https://example.com");
    let first = submitted_id(&effects);

    let (state, effects) = summarize(state, "https://other.example.com");
    assert!(effects.is_empty());
    assert!(state.is_loading(ResultKind::Summary));

    let (state, _) = update(
        state,
        Msg::RequestResolved {
            request_id: first,
            kind: ResultKind::Summary,
            outcome: RequestOutcome::Rendered("<p>done</p>".to_string()),
        },
    );
    assert!(!state.is_loading(ResultKind::Summary));

    let (_state, effects) = update(state, Msg::SummarizeClicked);
    assert_eq!(effects.len(), 1);
}

#[test]
fn stale_completion_does_not_touch_region() {
    init_logging();
    let (state, effects) = summarize(AppState::new(), "https://example.com");
    let request_id = submitted_id(&effects);

    let (state, effects) = update(
        state,
        Msg::RequestResolved {
            request_id: request_id + 10,
            kind: ResultKind::Summary,
            outcome: RequestOutcome::Rendered("<p>stale</p>".to_string()),
        },
    );

    assert!(effects.is_empty());
    assert!(state.is_loading(ResultKind::Summary));
    assert_eq!(
        state.view().summary.content,
        RegionContent::Text(STATUS_SUMMARIZING.to_string())
    );
}

#[test]
fn summary_and_answer_load_independently() {
    init_logging();
    let (state, effects) = summarize(AppState::new(), "https://example.com");
    let summary_id = submitted_id(&effects);
    let (state, _) = update(state, Msg::QuestionChanged("why?".to_string()));
    let (state, effects) = update(state, Msg::AskClicked);
    let answer_id = submitted_id(&effects);
    assert_ne!(summary_id, answer_id);

    let view = state.view();
    assert!(view.summary.loading);
    assert!(view.answer.loading);

    let (state, _) = update(
        state,
        Msg::RequestResolved {
            request_id: answer_id,
            kind: ResultKind::Answer,
            outcome: RequestOutcome::Failed("network error".to_string()),
        },
    );
    let view = state.view();
    assert!(view.summary.loading);
    assert!(!view.answer.loading);
}

#[test]
fn dirty_flag_tracks_visible_changes() {
    init_logging();
    let (mut state, _) = summarize(AppState::new(), "https://example.com");
    assert!(state.consume_dirty());
    assert!(!state.consume_dirty());

    let (mut state, _) = update(state, Msg::UrlChanged("https://example.com".to_string()));
    assert!(!state.consume_dirty());
}
