//! Explorer core: pure fetch-merge list state machine and view-model helpers.
mod effect;
mod merge;
mod msg;
mod state;
mod update;
mod view_model;

pub use effect::Effect;
pub use merge::{merge_unique, Keyed};
pub use msg::Msg;
pub use state::{ListState, RequestId, TruncatePolicy};
pub use update::update;
pub use view_model::ListViewModel;
