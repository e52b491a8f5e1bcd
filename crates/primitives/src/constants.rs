//! Protocol constants.

/// The shortest challenge period a deployment may configure, in seconds (1 day).
pub const MIN_CHALLENGE_PERIOD: u64 = 86_400;

/// The default challenge period, in seconds (7 days).
pub const DEFAULT_CHALLENGE_PERIOD: u64 = 604_800;

/// The default time a dispute game participant has to act in a round, in seconds (1 day).
pub const DEFAULT_ROUND_TIMEOUT: u64 = 86_400;

/// The default number of descendant blocks processed per invalidation cascade batch.
pub const DEFAULT_CASCADE_BATCH_SIZE: u64 = 64;

/// Denominator for all basis point values.
pub const BPS_DENOMINATOR: u64 = 10_000;
