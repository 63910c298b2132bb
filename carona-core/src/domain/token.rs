//! Time-derived identifiers for rides, routes and messages

use std::sync::atomic::{AtomicU64, Ordering};

use chrono::Utc;

/// Counter for generating unique IDs within the same millisecond
static ID_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Generate a unique token based on timestamp + counter
///
/// Lower 16 bits hold the counter, so up to 65536 tokens per millisecond
/// are distinct. Tokens from later milliseconds always compare greater.
pub fn new_token() -> String {
    let timestamp = Utc::now().timestamp_millis().max(0) as u64;
    let counter = ID_COUNTER.fetch_add(1, Ordering::Relaxed) & 0xFFFF;
    ((timestamp << 16) | counter).to_string()
}
