use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use explorer_engine::{
    CatalogItem, EngineEvent, EngineHandle, FailureKind, FetchError, ItemKey, PageSource,
};

/// Answers calls in order from a script of canned pages.
struct ScriptedSource {
    script: Mutex<VecDeque<Result<Vec<CatalogItem>, FetchError>>>,
    calls: Mutex<Vec<(usize, usize)>>,
}

impl ScriptedSource {
    fn new(script: Vec<Result<Vec<CatalogItem>, FetchError>>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            calls: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait::async_trait]
impl PageSource for ScriptedSource {
    async fn fetch_page(
        &self,
        offset: usize,
        limit: usize,
    ) -> Result<Vec<CatalogItem>, FetchError> {
        self.calls.lock().unwrap().push((offset, limit));
        self.script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(Vec::new()))
    }
}

fn item(n: u64) -> CatalogItem {
    CatalogItem::new(ItemKey::Number(n), format!("item {n}"))
}

fn next_event(engine: &EngineHandle) -> EngineEvent {
    engine
        .recv_timeout(Duration::from_secs(5))
        .expect("engine event")
}

#[test]
fn completed_fetch_is_reported_with_its_request_id() {
    let source = Arc::new(ScriptedSource::new(vec![Ok(vec![item(1), item(2)])]));
    let engine = EngineHandle::new(source.clone()).expect("engine");

    engine.fetch_page(42, 20, 10).expect("enqueue");

    assert_eq!(
        next_event(&engine),
        EngineEvent::PageFetched {
            request_id: 42,
            offset: 20,
            result: Ok(vec![item(1), item(2)]),
        }
    );
    assert_eq!(*source.calls.lock().unwrap(), vec![(20, 10)]);
}

#[test]
fn source_failure_is_forwarded() {
    let failure = FetchError {
        kind: FailureKind::Network,
        message: "connection refused".to_string(),
    };
    let source = Arc::new(ScriptedSource::new(vec![Err(failure.clone())]));
    let engine = EngineHandle::new(source).expect("engine");

    engine.fetch_page(1, 0, 10).expect("enqueue");

    match next_event(&engine) {
        EngineEvent::PageFetched {
            request_id, result, ..
        } => {
            assert_eq!(request_id, 1);
            assert_eq!(result, Err(failure));
        }
    }
}

#[test]
fn try_recv_is_empty_before_any_fetch() {
    let engine = EngineHandle::new(Arc::new(ScriptedSource::new(Vec::new()))).expect("engine");
    assert!(engine.try_recv().is_none());
}
