//! Audit timestamps applied by the storage boundary.
//!
//! # Responsibility
//! - Provide the pre-save hook the note repository runs on every write.
//! - Abstract the time source so tests can pin timestamps.
//!
//! # Invariants
//! - `created_at` is set once on first insert and never changes.
//! - `modified_at` is refreshed on every write and never precedes `created_at`.

use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

/// Time source for audit stamping, in Unix epoch milliseconds.
pub trait Clock {
    fn now_ms(&self) -> i64;
}

/// Wall-clock time source.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> i64 {
        // A clock set before 1970 is clamped to the epoch.
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0, |elapsed| {
                i64::try_from(elapsed.as_millis()).unwrap_or(i64::MAX)
            })
    }
}

impl<F> Clock for F
where
    F: Fn() -> i64,
{
    fn now_ms(&self) -> i64 {
        self()
    }
}

/// Creation/modification timestamps carried by persisted notes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditStamp {
    /// Epoch ms of the first insert.
    pub created_at: i64,
    /// Epoch ms of the latest write.
    pub modified_at: i64,
}

impl AuditStamp {
    /// Stamp for a record being inserted for the first time.
    pub fn on_insert(now_ms: i64) -> Self {
        Self {
            created_at: now_ms,
            modified_at: now_ms,
        }
    }

    /// Returns the stamp for a later write of an existing record.
    pub fn touch(self, now_ms: i64) -> Self {
        Self {
            created_at: self.created_at,
            modified_at: now_ms.max(self.created_at),
        }
    }
}
