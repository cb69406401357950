use thiserror::Error;

pub type WindowId = u32;

pub const ASK_MENU_ID: &str = "prompt-pages-ask";
pub const ASK_MENU_TITLE: &str = "Ask Prompt Pages about “%s”";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuContext {
    Selection,
}

/// Declarative context-menu entry. Registering an entry whose id already
/// exists replaces it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuEntry {
    pub id: String,
    /// `%s` is substituted by the host with the selected text.
    pub title: String,
    pub contexts: Vec<MenuContext>,
}

impl MenuEntry {
    pub fn ask_about_selection() -> Self {
        Self {
            id: ASK_MENU_ID.to_string(),
            title: ASK_MENU_TITLE.to_string(),
            contexts: vec![MenuContext::Selection],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HostError {
    #[error("menu registration failed: {0}")]
    Menu(String),
    #[error("could not open surface: {0}")]
    Surface(String),
}

/// The browser-side services the dispatcher and popup rely on.
#[async_trait::async_trait]
pub trait ExtensionHost: Send + Sync {
    async fn register_menu(&self, entry: &MenuEntry) -> Result<(), HostError>;

    /// Opens the transient popup surface.
    async fn open_popup(&self) -> Result<(), HostError>;

    /// Opens the persistent side surface for one window.
    async fn open_side_panel(&self, window_id: WindowId) -> Result<(), HostError>;

    /// Address of the active tab in the current window, if the host can tell.
    async fn active_tab_url(&self) -> Option<String>;
}
