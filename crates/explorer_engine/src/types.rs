use std::fmt;

use explorer_core::{Keyed, RequestId};

/// Identity of a catalog entry: APIs key their records by name or by number.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ItemKey {
    Text(String),
    Number(u64),
}

impl fmt::Display for ItemKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ItemKey::Text(text) => f.write_str(text),
            ItemKey::Number(n) => write!(f, "#{n}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogItem {
    pub key: ItemKey,
    pub title: String,
    pub details: Vec<String>,
    pub image_url: Option<String>,
}

impl CatalogItem {
    pub fn new(key: ItemKey, title: impl Into<String>) -> Self {
        Self {
            key,
            title: title.into(),
            details: Vec::new(),
            image_url: None,
        }
    }
}

impl Keyed for CatalogItem {
    type Key = ItemKey;

    fn key(&self) -> ItemKey {
        self.key.clone()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    PageFetched {
        request_id: RequestId,
        offset: usize,
        result: Result<Vec<CatalogItem>, FetchError>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct FetchError {
    pub kind: FailureKind,
    pub message: String,
}

impl FetchError {
    pub(crate) fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidUrl,
    HttpStatus(u16),
    Timeout,
    RedirectLimitExceeded,
    TooLarge { max_bytes: u64, actual: Option<u64> },
    UnsupportedContentType { content_type: String },
    Decode,
    Network,
    EngineStopped,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidUrl => write!(f, "invalid url"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::RedirectLimitExceeded => write!(f, "redirect limit exceeded"),
            FailureKind::TooLarge {
                max_bytes,
                actual: Some(actual),
            } => write!(f, "response too large (max {max_bytes}, actual {actual})"),
            FailureKind::TooLarge {
                max_bytes,
                actual: None,
            } => write!(f, "response too large (max {max_bytes})"),
            FailureKind::UnsupportedContentType { content_type } => {
                write!(f, "unsupported content type {content_type}")
            }
            FailureKind::Decode => write!(f, "malformed payload"),
            FailureKind::Network => write!(f, "network error"),
            FailureKind::EngineStopped => write!(f, "engine stopped"),
        }
    }
}
