//! Explorer engine: page sources and background fetch execution.
mod catalog;
mod engine;
mod fetch;
mod types;

pub use catalog::Catalog;
pub use engine::EngineHandle;
pub use fetch::{FetchSettings, HttpPageSource, PageSource};
pub use types::{CatalogItem, EngineEvent, FailureKind, FetchError, ItemKey};
