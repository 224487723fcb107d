//! Wall-clock timestamps
//!
//! All domain timestamps are Unix nanos as i64.

use std::time::{SystemTime, UNIX_EPOCH};

/// Current time in Unix nanos
pub fn now_nanos() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as i64)
        .unwrap_or_default()
}
