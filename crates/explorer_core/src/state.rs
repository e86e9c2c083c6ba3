use std::num::NonZeroUsize;

use crate::merge::{merge_unique, Keyed};
use crate::view_model::ListViewModel;

pub type RequestId = u64;

/// How many items `LoadLessClicked` removes from the tail of the list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TruncatePolicy {
    /// Remove exactly one page worth (`limit`) of items. Over-removes when the
    /// matching forward load had duplicates filtered out.
    #[default]
    FixedLimit,
    /// Remove the number of items the matching forward load appended.
    RecordedCount,
}

/// The page fetch currently awaited by the list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PendingPage {
    request_id: RequestId,
    offset: usize,
}

/// Result of feeding a page completion into the list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum PageOutcome {
    Merged { offset: usize, received: usize, added: usize },
    Failed { offset: usize, error: String },
    Stale { request_id: RequestId },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListState<T> {
    items: Vec<T>,
    offset: usize,
    limit: NonZeroUsize,
    truncate: TruncatePolicy,
    pending: Option<PendingPage>,
    next_request_id: RequestId,
    added_history: Vec<usize>,
    last_added: Option<usize>,
    last_error: Option<String>,
    dirty: bool,
}

impl<T> ListState<T> {
    pub fn new(limit: NonZeroUsize) -> Self {
        Self {
            items: Vec::new(),
            offset: 0,
            limit,
            truncate: TruncatePolicy::default(),
            pending: None,
            next_request_id: 1,
            added_history: Vec::new(),
            last_added: None,
            last_error: None,
            dirty: false,
        }
    }

    pub fn with_truncate_policy(mut self, policy: TruncatePolicy) -> Self {
        self.truncate = policy;
        self
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn limit(&self) -> usize {
        self.limit.get()
    }

    pub fn truncate_policy(&self) -> TruncatePolicy {
        self.truncate
    }

    pub fn in_flight(&self) -> bool {
        self.pending.is_some()
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn is_page_boundary(&self, offset: usize) -> bool {
        offset % self.limit.get() == 0
    }

    pub fn can_load_less(&self) -> bool {
        !self.in_flight() && self.offset >= self.limit.get()
    }

    /// Returns whether the state changed since the last call, and clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub fn view(&self) -> ListViewModel<T>
    where
        T: Clone,
    {
        ListViewModel {
            items: self.items.clone(),
            offset: self.offset,
            limit: self.limit.get(),
            loading: self.in_flight(),
            can_load_more: !self.in_flight(),
            can_load_less: self.can_load_less(),
            last_added: self.last_added,
            last_error: self.last_error.clone(),
            dirty: self.dirty,
        }
    }

    /// Drop all items and bookkeeping. An outstanding request is forgotten, so
    /// its completion will be treated as stale.
    pub(crate) fn clear(&mut self) {
        self.items.clear();
        self.offset = 0;
        self.pending = None;
        self.added_history.clear();
        self.last_added = None;
        self.last_error = None;
        self.dirty = true;
    }

    /// Mark a fetch for the page at `offset` as in flight and return its id.
    pub(crate) fn begin_page(&mut self, offset: usize) -> RequestId {
        let request_id = self.next_request_id;
        self.next_request_id += 1;
        self.pending = Some(PendingPage { request_id, offset });
        self.last_error = None;
        self.dirty = true;
        request_id
    }

    pub(crate) fn complete_page(
        &mut self,
        request_id: RequestId,
        result: Result<Vec<T>, String>,
    ) -> PageOutcome
    where
        T: Keyed,
    {
        let pending = match self.pending {
            Some(pending) if pending.request_id == request_id => pending,
            _ => return PageOutcome::Stale { request_id },
        };
        self.pending = None;
        self.dirty = true;

        match result {
            Ok(page) => {
                let received = page.len();
                let existing = std::mem::take(&mut self.items);
                let (merged, added) = merge_unique(existing, page, |item: &T| item.key());
                self.items = merged;
                self.offset = pending.offset;
                self.added_history.push(added);
                self.last_added = Some(added);
                PageOutcome::Merged {
                    offset: pending.offset,
                    received,
                    added,
                }
            }
            Err(error) => {
                self.last_error = Some(error.clone());
                PageOutcome::Failed {
                    offset: pending.offset,
                    error,
                }
            }
        }
    }

    /// Step the cursor back one page and drop items from the tail.
    /// Returns the number of items removed, or `None` when not allowed.
    pub(crate) fn step_back(&mut self) -> Option<usize> {
        if !self.can_load_less() {
            return None;
        }
        self.offset -= self.limit.get();
        let recorded = self.added_history.pop();
        let count = match self.truncate {
            TruncatePolicy::FixedLimit => self.limit.get(),
            TruncatePolicy::RecordedCount => recorded.unwrap_or(self.limit.get()),
        };
        let keep = self.items.len().saturating_sub(count);
        let removed = self.items.len() - keep;
        self.items.truncate(keep);
        self.last_added = None;
        self.dirty = true;
        Some(removed)
    }
}
