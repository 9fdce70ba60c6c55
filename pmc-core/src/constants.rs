//! Tuning constants and reserved names

/// Non-zero count above which matrix-vector products run in parallel
pub const PARALLEL_NONZERO_THRESHOLD: usize = 10_000;

/// Number of consecutive rows handled by one parallel task
pub const PARALLEL_BLOCK_ROWS: usize = 10;

/// Reserved labels
pub mod labels {
    /// States in which the system starts
    pub const INIT: &str = "init";

    /// Literal proposition satisfied by every state
    pub const TRUE: &str = "true";

    /// Literal proposition satisfied by no state
    pub const FALSE: &str = "false";
}
