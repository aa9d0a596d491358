/// Scan loop state machine.
///
/// ```text
/// Idle -> Refreshing -> Fetching -> Persisting -> Fetching ...
///              ^  |         |
///              |  v         v
///            Waiting <- Refreshing (height ahead of head)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScanState {
    /// No loop running for the task.
    #[default]
    Idle,

    /// Asking the node for its current head.
    Refreshing,

    /// Caught up with the head, backing off before the next refresh.
    Waiting,

    /// Requesting the block at the next height.
    Fetching,

    /// Writing a fetched block, then advancing the cursor.
    Persisting,
}

impl ScanState {
    /// Whether a loop may move from `self` to `target`.
    ///
    /// Every state may fall back to `Idle`: on shutdown, lease loss, a
    /// completed range or an error that ends the loop.
    pub fn can_transition_to(&self, target: ScanState) -> bool {
        if target == ScanState::Idle {
            return true;
        }
        match self {
            ScanState::Idle => matches!(target, ScanState::Refreshing),
            ScanState::Refreshing => matches!(target, ScanState::Fetching | ScanState::Waiting),
            ScanState::Waiting => matches!(target, ScanState::Refreshing),
            ScanState::Fetching => matches!(
                target,
                ScanState::Fetching | ScanState::Persisting | ScanState::Refreshing
            ),
            ScanState::Persisting => matches!(target, ScanState::Fetching),
        }
    }
}
