//! Prompt Pages engine: HTTP calls, the shared state relay, rendering and the
//! background trigger dispatcher.
mod api;
mod dispatcher;
mod engine;
mod host;
mod persist;
mod relay;
mod render;
mod service;
mod staged;
mod types;

pub use api::{ApiClient, ApiSettings, ReqwestApiClient};
pub use dispatcher::{BackgroundEvent, MenuClick, TriggerDispatcher};
pub use engine::{EngineHandle, EngineServices, PERSIST_DRAIN_TIMEOUT};
pub use host::{
    ExtensionHost, HostError, MenuContext, MenuEntry, WindowId, ASK_MENU_ID, ASK_MENU_TITLE,
};
pub use persist::{ensure_store_dir, AtomicFileWriter, PersistError};
pub use relay::{FileRelay, MemoryRelay, Record, RelayError, StateRelay, RELAY_FILENAME};
pub use render::{CommonMarkRenderer, MarkdownRenderer};
pub use service::{fetch_answer, fetch_summary, Answer, NO_ANSWER, NO_SUMMARY};
pub use staged::{StagedInput, LAST_Q_KEY, LAST_URL_KEY};
pub use types::{ApiError, EngineEvent, Endpoint, FailureKind, RequestId};
