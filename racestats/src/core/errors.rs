use thiserror::Error;

/// FeedError is raised if an event of the session feed violates the input contract, i.e. it does
/// not match the configured session parameters. Such an event is rejected instead of truncated.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FeedError {
    #[error(
        "split index {index} of entrant {user_name} is not within the configured range \
        [1, {max_splits}] (configuration mismatch)"
    )]
    SplitIndexOutOfRange {
        user_name: String,
        index: u8,
        max_splits: usize,
    },
    #[error(
        "final split index {index} of entrant {user_name} exceeds the configured maximum of \
        {max_splits} (configuration mismatch)"
    )]
    FinalSplitOutOfRange {
        user_name: String,
        index: u8,
        max_splits: usize,
    },
}
