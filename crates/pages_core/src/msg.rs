#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// User edited the URL input box.
    UrlChanged(String),
    /// User edited the question input box.
    QuestionChanged(String),
    /// Best-effort address of the active tab, read once when the surface opens.
    ActiveTabResolved(Option<String>),
    /// Previously staged values read from the relay when the surface opens.
    StagedInputLoaded(crate::StagedInput),
    /// User clicked Summarize.
    SummarizeClicked,
    /// User clicked Ask.
    AskClicked,
    /// Engine finished an outbound call.
    RequestResolved {
        request_id: crate::RequestId,
        kind: crate::ResultKind,
        outcome: RequestOutcome,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestOutcome {
    /// Response text already rendered to HTML.
    Rendered(String),
    /// Failure message, without the `Error: ` prefix.
    Failed(String),
}
