use std::sync::Arc;

use pages_logging::{pages_debug, pages_info, pages_warn};

use crate::host::{ExtensionHost, HostError, MenuEntry, WindowId, ASK_MENU_ID};
use crate::relay::StateRelay;
use crate::staged::StagedInput;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuClick {
    pub menu_item_id: String,
    pub selection_text: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackgroundEvent {
    /// Extension installed or updated.
    Installed,
    MenuClicked(MenuClick),
    /// Toolbar icon clicked in a window.
    IconActivated { window_id: WindowId },
}

/// Background-context handler: turns host events into staged input or
/// surface-open requests. Holds no state of its own between events.
pub struct TriggerDispatcher {
    relay: Arc<dyn StateRelay>,
    host: Arc<dyn ExtensionHost>,
}

impl TriggerDispatcher {
    pub fn new(relay: Arc<dyn StateRelay>, host: Arc<dyn ExtensionHost>) -> Self {
        Self { relay, host }
    }

    pub async fn handle(&self, event: BackgroundEvent) -> Result<(), HostError> {
        match event {
            BackgroundEvent::Installed => self.on_install().await,
            BackgroundEvent::MenuClicked(click) => self.on_menu_clicked(click).await,
            BackgroundEvent::IconActivated { window_id } => {
                self.on_surface_icon_activated(window_id).await
            }
        }
    }

    /// Safe to call on every install or update.
    pub async fn on_install(&self) -> Result<(), HostError> {
        let entry = MenuEntry::ask_about_selection();
        self.host.register_menu(&entry).await?;
        pages_info!("registered menu entry {}", entry.id);
        Ok(())
    }

    pub async fn on_menu_clicked(&self, click: MenuClick) -> Result<(), HostError> {
        if click.menu_item_id != ASK_MENU_ID {
            pages_debug!("ignoring click on menu entry {}", click.menu_item_id);
            return Ok(());
        }
        match click.selection_text {
            Some(text) if !text.is_empty() => self.on_selection_triggered(&text).await,
            _ => {
                pages_debug!("menu click without selected text");
                Ok(())
            }
        }
    }

    /// Stages the selection as the last question, then opens the popup. The
    /// open request is only issued after the relay acknowledged the write.
    pub async fn on_selection_triggered(&self, selected_text: &str) -> Result<(), HostError> {
        if selected_text.is_empty() {
            return Ok(());
        }
        let staged = StagedInput::question(selected_text);
        if let Err(err) = staged.store(self.relay.as_ref()).await {
            // Staging is best effort; the popup still opens.
            pages_warn!("failed to stage selected text: {}", err);
        }
        self.host.open_popup().await
    }

    pub async fn on_surface_icon_activated(&self, window_id: WindowId) -> Result<(), HostError> {
        pages_debug!("opening side panel for window {}", window_id);
        self.host.open_side_panel(window_id).await
    }
}
