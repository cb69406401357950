use std::io;
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use pages_logging::{pages_debug, pages_info, pages_warn};
use tokio::runtime::Runtime;
use tokio::task::JoinSet;

use crate::api::ApiClient;
use crate::host::ExtensionHost;
use crate::relay::StateRelay;
use crate::render::MarkdownRenderer;
use crate::service::{fetch_answer, fetch_summary};
use crate::staged::StagedInput;
use crate::{ApiError, Endpoint, EngineEvent, RequestId};

/// Collaborators the engine drives on behalf of one popup surface.
#[derive(Clone)]
pub struct EngineServices {
    pub api: Arc<dyn ApiClient>,
    pub relay: Arc<dyn StateRelay>,
    pub host: Arc<dyn ExtensionHost>,
    pub renderer: Arc<dyn MarkdownRenderer>,
}

enum EngineCommand {
    LoadInitial,
    Submit {
        request_id: RequestId,
        endpoint: Endpoint,
        url: String,
        question: Option<String>,
    },
    Persist(StagedInput),
}

/// Upper bound on how long shutdown waits for pending relay writes.
pub const PERSIST_DRAIN_TIMEOUT: Duration = Duration::from_secs(5);

/// Runs IO for the popup on a background runtime. Every command becomes its
/// own task, so a slow summary never holds up an answer.
///
/// Dropping the handle (or calling [`EngineHandle::shutdown`]) stops taking
/// commands and waits for pending relay writes before the runtime goes away.
/// Outstanding API calls are abandoned; their results have nowhere to go.
pub struct EngineHandle {
    cmd_tx: Option<mpsc::Sender<EngineCommand>>,
    event_rx: mpsc::Receiver<EngineEvent>,
    worker: Option<thread::JoinHandle<()>>,
}

impl EngineHandle {
    pub fn new(services: EngineServices) -> io::Result<Self> {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();
        let runtime = tokio::runtime::Runtime::new()?;

        let worker = thread::Builder::new()
            .name("pages-engine".to_string())
            .spawn(move || {
                let mut persists = JoinSet::new();
                while let Ok(command) = cmd_rx.recv() {
                    let is_persist = matches!(command, EngineCommand::Persist(_));
                    let services = services.clone();
                    let event_tx = event_tx.clone();
                    let task = async move {
                        handle_command(&services, command, event_tx).await;
                    };
                    if is_persist {
                        persists.spawn_on(task, runtime.handle());
                    } else {
                        runtime.spawn(task);
                    }
                    while persists.try_join_next().is_some() {}
                }
                drain_persists(&runtime, persists);
                runtime.shutdown_timeout(PERSIST_DRAIN_TIMEOUT);
            })?;

        Ok(Self {
            cmd_tx: Some(cmd_tx),
            event_rx,
            worker: Some(worker),
        })
    }

    /// Reads the active tab, then the staged input, emitting one event for each.
    pub fn load_initial(&self) {
        self.send(EngineCommand::LoadInitial);
    }

    pub fn submit(
        &self,
        request_id: RequestId,
        endpoint: Endpoint,
        url: impl Into<String>,
        question: Option<String>,
    ) {
        self.send(EngineCommand::Submit {
            request_id,
            endpoint,
            url: url.into(),
            question,
        });
    }

    pub fn persist(&self, staged: StagedInput) {
        self.send(EngineCommand::Persist(staged));
    }

    /// Stops the engine once every relay write sent so far has landed, or
    /// [`PERSIST_DRAIN_TIMEOUT`] has passed.
    pub fn shutdown(mut self) {
        self.stop();
    }

    pub fn try_recv(&self) -> Option<EngineEvent> {
        self.event_rx.try_recv().ok()
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Option<EngineEvent> {
        self.event_rx.recv_timeout(timeout).ok()
    }

    fn send(&self, command: EngineCommand) {
        if let Some(cmd_tx) = &self.cmd_tx {
            let _ = cmd_tx.send(command);
        }
    }

    fn stop(&mut self) {
        // Closing the channel ends the worker's command loop.
        self.cmd_tx.take();
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                pages_warn!("engine thread panicked during shutdown");
            }
        }
    }
}

impl Drop for EngineHandle {
    fn drop(&mut self) {
        self.stop();
    }
}

fn drain_persists(runtime: &Runtime, mut persists: JoinSet<()>) {
    let pending = persists.len();
    if pending == 0 {
        return;
    }
    pages_debug!("waiting for {} relay write(s) before shutdown", pending);
    let drained = runtime.block_on(async {
        tokio::time::timeout(PERSIST_DRAIN_TIMEOUT, async {
            while persists.join_next().await.is_some() {}
        })
        .await
    });
    if drained.is_err() {
        pages_warn!(
            "{} relay write(s) still pending after {:?}; giving up",
            persists.len(),
            PERSIST_DRAIN_TIMEOUT
        );
    }
}

async fn handle_command(
    services: &EngineServices,
    command: EngineCommand,
    event_tx: mpsc::Sender<EngineEvent>,
) {
    match command {
        EngineCommand::LoadInitial => {
            let active = services.host.active_tab_url().await;
            let _ = event_tx.send(EngineEvent::ActiveTabResolved(active));

            let staged = StagedInput::load(services.relay.as_ref())
                .await
                .unwrap_or_else(|err| {
                    pages_warn!("could not read staged input: {}", err);
                    StagedInput::default()
                });
            let _ = event_tx.send(EngineEvent::StagedLoaded(staged));
        }
        EngineCommand::Submit {
            request_id,
            endpoint,
            url,
            question,
        } => {
            let result = run_request(services, endpoint, &url, question.as_deref()).await;
            match &result {
                Ok(_) => pages_info!("request {} to {} succeeded", request_id, endpoint.path()),
                Err(err) => pages_warn!(
                    "request {} to {} failed ({}): {}",
                    request_id,
                    endpoint.path(),
                    err.kind,
                    err
                ),
            }
            let _ = event_tx.send(EngineEvent::RequestCompleted {
                request_id,
                endpoint,
                result,
            });
        }
        EngineCommand::Persist(staged) => {
            let result = staged.store(services.relay.as_ref()).await;
            if let Err(err) = &result {
                pages_warn!("failed to persist staged input: {}", err);
            }
            let _ = event_tx.send(EngineEvent::Persisted { result });
        }
    }
}

async fn run_request(
    services: &EngineServices,
    endpoint: Endpoint,
    url: &str,
    question: Option<&str>,
) -> Result<String, ApiError> {
    let markdown = match endpoint {
        Endpoint::Summary => fetch_summary(services.api.as_ref(), url).await?,
        Endpoint::Qa => {
            fetch_answer(services.api.as_ref(), url, question.unwrap_or_default())
                .await?
                .markdown
        }
    };
    Ok(services.renderer.to_html(&markdown))
}
