#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    /// Fetch `limit` items starting at `offset` and answer with `Msg::PageLoaded`.
    FetchPage {
        request_id: crate::RequestId,
        offset: usize,
        limit: usize,
    },
}
