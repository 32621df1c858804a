//! Application constants.

/// Members of an expanded group shown at once; the rest scroll.
pub const MEMBER_WINDOW: usize = 8;

/// Channel buffer size for scan results.
pub const SCAN_CHANNEL_SIZE: usize = 100;

/// Event loop tick interval in milliseconds.
pub const TICK_INTERVAL_MS: u64 = 50;
