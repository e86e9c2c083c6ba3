#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg<T> {
    /// User clicked Start: clear the list and load the first page.
    StartClicked,
    /// User asked for the next page.
    LoadMoreClicked,
    /// User asked to step back one page.
    LoadLessClicked,
    /// User cleared the list without fetching.
    ResetClicked,
    /// Load the page starting at `offset` (must be a multiple of the page size).
    LoadPageRequested { offset: usize },
    /// Page source completion for a previously emitted fetch.
    PageLoaded {
        request_id: crate::RequestId,
        result: Result<Vec<T>, String>,
    },
}
