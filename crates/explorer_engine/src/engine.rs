use std::io;
use std::sync::{mpsc, Arc, Mutex};
use std::thread;
use std::time::Duration;

use explorer_core::RequestId;
use explorer_logging::explorer_debug;

use crate::{EngineEvent, FailureKind, FetchError, PageSource};

enum EngineCommand {
    FetchPage {
        request_id: RequestId,
        offset: usize,
        limit: usize,
    },
}

/// Runs page fetches on a background tokio runtime. Commands go in through
/// `fetch_page`; completions come back as `EngineEvent`s.
#[derive(Clone)]
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
    event_rx: Arc<Mutex<mpsc::Receiver<EngineEvent>>>,
}

impl EngineHandle {
    pub fn new(source: Arc<dyn PageSource>) -> io::Result<Self> {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()?;

        thread::Builder::new()
            .name("explorer-engine".to_string())
            .spawn(move || {
                while let Ok(command) = cmd_rx.recv() {
                    let source = source.clone();
                    let event_tx = event_tx.clone();
                    runtime.spawn(async move {
                        handle_command(source.as_ref(), command, event_tx).await;
                    });
                }
                explorer_debug!("Engine command channel closed");
            })?;

        Ok(Self {
            cmd_tx,
            event_rx: Arc::new(Mutex::new(event_rx)),
        })
    }

    pub fn fetch_page(
        &self,
        request_id: RequestId,
        offset: usize,
        limit: usize,
    ) -> Result<(), FetchError> {
        self.cmd_tx
            .send(EngineCommand::FetchPage {
                request_id,
                offset,
                limit,
            })
            .map_err(|_| FetchError::new(FailureKind::EngineStopped, "engine thread is gone"))
    }

    pub fn try_recv(&self) -> Option<EngineEvent> {
        self.event_rx.lock().ok()?.try_recv().ok()
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Result<EngineEvent, mpsc::RecvTimeoutError> {
        let rx = self
            .event_rx
            .lock()
            .map_err(|_| mpsc::RecvTimeoutError::Disconnected)?;
        rx.recv_timeout(timeout)
    }
}

async fn handle_command(
    source: &dyn PageSource,
    command: EngineCommand,
    event_tx: mpsc::Sender<EngineEvent>,
) {
    match command {
        EngineCommand::FetchPage {
            request_id,
            offset,
            limit,
        } => {
            let result = source.fetch_page(offset, limit).await;
            let _ = event_tx.send(EngineEvent::PageFetched {
                request_id,
                offset,
                result,
            });
        }
    }
}
