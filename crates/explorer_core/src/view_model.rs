#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListViewModel<T> {
    pub items: Vec<T>,
    pub offset: usize,
    pub limit: usize,
    pub loading: bool,
    pub can_load_more: bool,
    pub can_load_less: bool,
    /// Items appended by the most recent successful page load.
    pub last_added: Option<usize>,
    pub last_error: Option<String>,
    pub dirty: bool,
}
