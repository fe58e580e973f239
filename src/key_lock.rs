//! Per-account lock registry.
//!
//! Each account id maps to a lock entry paired with a count of the callers
//! currently interested in it (holders, waiters, and in-flight attempts).
//! The entry lives in the registry exactly while that count is non-zero, so
//! accounts that stop being contended leave nothing behind.
//!
//! Registration (upsert + increment) and unregistration (decrement +
//! conditional remove) each run under the registry shard lock for the key,
//! which is the only global synchronization involved. The account lock
//! itself is held outside of it.

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use once_cell::sync::Lazy;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::{debug, error};

use crate::core_types::AccountId;

static GLOBAL_KEY_LOCKS: Lazy<Arc<KeyLockManager>> = Lazy::new(|| Arc::new(KeyLockManager::new()));

struct LockSlot {
    lock: Arc<Mutex<()>>,
    refs: usize,
}

/// Registry of reference-counted, mutually-exclusive locks keyed by account id
pub struct KeyLockManager {
    registry: DashMap<AccountId, LockSlot>,
}

impl KeyLockManager {
    pub fn new() -> Self {
        Self {
            registry: DashMap::new(),
        }
    }

    /// Process-wide registry, created on first use and never torn down
    pub fn global() -> Arc<KeyLockManager> {
        Arc::clone(&GLOBAL_KEY_LOCKS)
    }

    /// Take the lock for `key` without blocking.
    ///
    /// Returns `None` if someone else holds it. A failed attempt gives its
    /// reference back before returning.
    pub fn try_acquire(&self, key: &str) -> Option<KeyLockGuard<'_>> {
        match self.register(key).try_lock_owned() {
            Ok(guard) => {
                debug!(key, "lock acquired");
                Some(KeyLockGuard::new(self, key, guard))
            }
            Err(_) => {
                debug!(key, "lock busy");
                self.unregister(key);
                None
            }
        }
    }

    /// Take the lock for `key`, waiting for the current holder if needed.
    ///
    /// Parks the calling thread, so it must not run on an async worker
    /// (use `spawn_blocking`). Callers that take more than one key must take
    /// them in a consistent order.
    pub fn acquire(&self, key: &str) -> KeyLockGuard<'_> {
        let guard = self.register(key).blocking_lock_owned();
        debug!(key, "lock acquired (blocking)");
        KeyLockGuard::new(self, key, guard)
    }

    /// Whether `key` is locked right now. Advisory only: the answer may be
    /// stale by the time the caller acts on it.
    pub fn is_held(&self, key: &str) -> bool {
        self.registry
            .get(key)
            .map(|slot| slot.lock.try_lock().is_err())
            .unwrap_or(false)
    }

    /// Number of live references to `key` (0 when it has no entry)
    pub fn ref_count(&self, key: &str) -> usize {
        self.registry.get(key).map(|slot| slot.refs).unwrap_or(0)
    }

    /// Number of keys with a live entry
    pub fn len(&self) -> usize {
        self.registry.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registry.is_empty()
    }

    fn register(&self, key: &str) -> Arc<Mutex<()>> {
        let mut slot = self
            .registry
            .entry(key.to_owned())
            .or_insert_with(|| LockSlot {
                lock: Arc::new(Mutex::new(())),
                refs: 0,
            });
        slot.refs += 1;
        Arc::clone(&slot.lock)
    }

    fn unregister(&self, key: &str) {
        match self.registry.entry(key.to_owned()) {
            Entry::Occupied(mut slot) => {
                slot.get_mut().refs -= 1;
                if slot.get().refs == 0 {
                    slot.remove();
                    debug!(key, "lock entry evicted");
                }
            }
            Entry::Vacant(_) => {
                // Unreachable through guards; a dangling release would mean
                // the refcount invariant is already broken.
                error!(key, "release of a key with no lock entry");
            }
        }
    }
}

impl Default for KeyLockManager {
    fn default() -> Self {
        Self::new()
    }
}

/// Proof of holding the lock for one key.
///
/// Dropping the guard releases the lock and gives back its reference, which
/// makes releasing a key the caller never acquired impossible to express.
#[must_use = "the lock is released as soon as the guard is dropped"]
pub struct KeyLockGuard<'a> {
    manager: &'a KeyLockManager,
    key: AccountId,
    guard: Option<OwnedMutexGuard<()>>,
}

impl<'a> KeyLockGuard<'a> {
    fn new(manager: &'a KeyLockManager, key: &str, guard: OwnedMutexGuard<()>) -> Self {
        Self {
            manager,
            key: key.to_owned(),
            guard: Some(guard),
        }
    }

    /// Release explicitly. Same as dropping the guard.
    pub fn release(self) {
        drop(self);
    }
}

impl Drop for KeyLockGuard<'_> {
    fn drop(&mut self) {
        // unlock first, then give the reference back
        drop(self.guard.take());
        self.manager.unregister(&self.key);
        debug!(key = %self.key, "lock released");
    }
}
