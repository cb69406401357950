//! Prompt Pages core: pure popup controller state machine and view-model helpers.
mod effect;
mod msg;
mod state;
mod update;
mod view_model;

pub use effect::Effect;
pub use msg::{Msg, RequestOutcome};
pub use state::{
    AppState, HistoryEntry, PopupOptions, RegionContent, RequestContext, RequestId, ResultKind,
    StagedInput,
};
pub use update::{
    update, PROMPT_ENTER_QUESTION, PROMPT_ENTER_URL, STATUS_SUMMARIZING, STATUS_THINKING,
};
pub use view_model::{AppViewModel, RegionView};
