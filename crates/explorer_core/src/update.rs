use explorer_logging::{explorer_debug, explorer_info, explorer_warn};

use crate::state::PageOutcome;
use crate::{Effect, Keyed, ListState, Msg};

/// Pure update function: applies a message to state and returns any effects.
pub fn update<T: Keyed>(mut state: ListState<T>, msg: Msg<T>) -> (ListState<T>, Vec<Effect>) {
    let effects = match msg {
        Msg::StartClicked => {
            if state.in_flight() {
                explorer_debug!("Start ignored: a page fetch is already in flight");
                return (state, Vec::new());
            }
            state.clear();
            load_page(&mut state, 0)
        }
        Msg::LoadMoreClicked => {
            let target = state.offset() + state.limit();
            load_page(&mut state, target)
        }
        Msg::LoadPageRequested { offset } => {
            if !state.is_page_boundary(offset) {
                explorer_warn!(
                    "Ignoring page request at offset {} (page size {})",
                    offset,
                    state.limit()
                );
                return (state, Vec::new());
            }
            load_page(&mut state, offset)
        }
        Msg::LoadLessClicked => {
            if let Some(removed) = state.step_back() {
                explorer_debug!(
                    "Stepped back to offset {}, removed {} item(s) ({:?})",
                    state.offset(),
                    removed,
                    state.truncate_policy()
                );
            }
            Vec::new()
        }
        Msg::ResetClicked => {
            state.clear();
            Vec::new()
        }
        Msg::PageLoaded { request_id, result } => {
            match state.complete_page(request_id, result) {
                PageOutcome::Merged {
                    offset,
                    received,
                    added,
                } => {
                    explorer_info!(
                        "Page at offset {}: received {}, appended {}, total {}",
                        offset,
                        received,
                        added,
                        state.items().len()
                    );
                }
                PageOutcome::Failed { offset, error } => {
                    explorer_warn!("Page at offset {} failed: {}", offset, error);
                }
                PageOutcome::Stale { request_id } => {
                    explorer_debug!("Discarding stale page completion {}", request_id);
                }
            }
            Vec::new()
        }
    };

    (state, effects)
}

fn load_page<T>(state: &mut ListState<T>, offset: usize) -> Vec<Effect> {
    if state.in_flight() {
        explorer_debug!("Page request at offset {} ignored while in flight", offset);
        return Vec::new();
    }
    let request_id = state.begin_page(offset);
    vec![Effect::FetchPage {
        request_id,
        offset,
        limit: state.limit(),
    }]
}
