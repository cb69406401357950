use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use pages_engine::{AtomicFileWriter, ExtensionHost, HostError, MenuContext, MenuEntry, WindowId};
use pages_logging::{pages_info, pages_warn};
use serde::{Deserialize, Serialize};

const MENUS_FILENAME: &str = "menus.ron";

/// Surface the background context asked the host to show.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SurfaceRequest {
    Popup,
    SidePanel(WindowId),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct PersistedMenu {
    id: String,
    title: String,
    selection_only: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct PersistedMenus {
    entries: Vec<PersistedMenu>,
}

/// Terminal stand-in for the browser: menus are kept in the store directory
/// and surface-open requests are recorded for the caller to act on.
pub(crate) struct CliHost {
    store_dir: PathBuf,
    active_tab: Option<String>,
    surface_request: Mutex<Option<SurfaceRequest>>,
}

impl CliHost {
    pub(crate) fn new(store_dir: PathBuf, active_tab: Option<String>) -> Self {
        Self {
            store_dir,
            active_tab,
            surface_request: Mutex::new(None),
        }
    }

    pub(crate) fn take_surface_request(&self) -> Option<SurfaceRequest> {
        self.surface_request
            .lock()
            .ok()
            .and_then(|mut request| request.take())
    }

    fn request_surface(&self, request: SurfaceRequest) -> Result<(), HostError> {
        let mut slot = self
            .surface_request
            .lock()
            .map_err(|err| HostError::Surface(err.to_string()))?;
        *slot = Some(request);
        Ok(())
    }
}

fn load_menus(dir: &Path) -> PersistedMenus {
    let path = dir.join(MENUS_FILENAME);
    let content = match fs::read_to_string(&path) {
        Ok(text) => text,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            return PersistedMenus::default();
        }
        Err(err) => {
            pages_warn!("Failed to read menus from {:?}: {}", path, err);
            return PersistedMenus::default();
        }
    };
    match ron::from_str(&content) {
        Ok(menus) => menus,
        Err(err) => {
            pages_warn!("Failed to parse menus from {:?}: {}", path, err);
            PersistedMenus::default()
        }
    }
}

fn save_menus(dir: &Path, menus: &PersistedMenus) -> Result<(), HostError> {
    let pretty = ron::ser::PrettyConfig::new();
    let content = ron::ser::to_string_pretty(menus, pretty)
        .map_err(|err| HostError::Menu(err.to_string()))?;
    AtomicFileWriter::new(dir.to_path_buf())
        .write(MENUS_FILENAME, &content)
        .map_err(|err| HostError::Menu(err.to_string()))?;
    Ok(())
}

#[async_trait::async_trait]
impl ExtensionHost for CliHost {
    async fn register_menu(&self, entry: &MenuEntry) -> Result<(), HostError> {
        let mut menus = load_menus(&self.store_dir);
        menus.entries.retain(|menu| menu.id != entry.id);
        menus.entries.push(PersistedMenu {
            id: entry.id.clone(),
            title: entry.title.clone(),
            selection_only: entry.contexts == [MenuContext::Selection],
        });
        save_menus(&self.store_dir, &menus)
    }

    async fn open_popup(&self) -> Result<(), HostError> {
        pages_info!("popup requested");
        self.request_surface(SurfaceRequest::Popup)
    }

    async fn open_side_panel(&self, window_id: WindowId) -> Result<(), HostError> {
        pages_info!("side panel requested for window {}", window_id);
        self.request_surface(SurfaceRequest::SidePanel(window_id))
    }

    async fn active_tab_url(&self) -> Option<String> {
        self.active_tab.clone()
    }
}
