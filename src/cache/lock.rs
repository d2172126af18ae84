use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::warn;

// Poisoning is recovered; the next flush discards whatever a panicking writer left.

pub(crate) fn rw_read<'a, T>(lock: &'a RwLock<T>, op: &'static str) -> RwLockReadGuard<'a, T> {
    lock.read().unwrap_or_else(|poisoned| {
        warn!(
            target = "noticeboard::cache",
            op,
            lock_kind = "rwlock.read",
            "Recovered from poisoned page cache lock"
        );
        poisoned.into_inner()
    })
}

pub(crate) fn rw_write<'a, T>(lock: &'a RwLock<T>, op: &'static str) -> RwLockWriteGuard<'a, T> {
    lock.write().unwrap_or_else(|poisoned| {
        warn!(
            target = "noticeboard::cache",
            op,
            lock_kind = "rwlock.write",
            "Recovered from poisoned page cache lock"
        );
        poisoned.into_inner()
    })
}
