use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use explorer_core::{Effect, Msg};
use explorer_engine::{CatalogItem, EngineEvent, EngineHandle};
use explorer_logging::{explorer_error, explorer_info, explorer_warn};

use super::app::AppInput;

/// Executes core effects against the engine and feeds completions back into
/// the app's message channel.
pub struct EffectRunner {
    engine: EngineHandle,
    msg_tx: mpsc::Sender<AppInput>,
}

impl EffectRunner {
    pub fn new(engine: EngineHandle, msg_tx: mpsc::Sender<AppInput>) -> Self {
        let runner = Self { engine, msg_tx };
        runner.spawn_event_loop();
        runner
    }

    pub fn run(&self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::FetchPage {
                    request_id,
                    offset,
                    limit,
                } => {
                    explorer_info!(
                        "FetchPage request_id={} offset={} limit={}",
                        request_id,
                        offset,
                        limit
                    );
                    if let Err(err) = self.engine.fetch_page(request_id, offset, limit) {
                        explorer_error!("FetchPage request_id={} not sent: {}", request_id, err);
                        // Answer right away so the list does not stay in flight.
                        let _ = self.msg_tx.send(AppInput::Msg(Msg::PageLoaded {
                            request_id,
                            result: Err(err.to_string()),
                        }));
                    }
                }
            }
        }
    }

    fn spawn_event_loop(&self) {
        let engine = self.engine.clone();
        let msg_tx = self.msg_tx.clone();
        thread::spawn(move || loop {
            match engine.recv_timeout(Duration::from_millis(200)) {
                Ok(event) => {
                    if msg_tx.send(AppInput::Msg(page_loaded(event))).is_err() {
                        break;
                    }
                }
                Err(mpsc::RecvTimeoutError::Timeout) => {}
                Err(mpsc::RecvTimeoutError::Disconnected) => {
                    explorer_warn!("Engine event channel closed");
                    break;
                }
            }
        });
    }
}

fn page_loaded(event: EngineEvent) -> Msg<CatalogItem> {
    match event {
        EngineEvent::PageFetched {
            request_id,
            offset,
            result,
        } => Msg::PageLoaded {
            request_id,
            result: result.map_err(|err| {
                explorer_warn!("Fetch at offset {} failed: {}", offset, err);
                err.to_string()
            }),
        },
    }
}
