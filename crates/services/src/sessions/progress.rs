/// Aggregated view of session progress, useful for UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SessionProgress {
    pub total: usize,
    pub current_index: usize,
    pub answered: usize,
    pub remaining: usize,
    pub is_complete: bool,
}
