//! Per-account write serialization.
//!
//! Favorites are stored as one value per account and rewritten whole, so two
//! concurrent toggles for the same account would race (read, read, write,
//! write loses the first update). [`AccountLocks`] hands out one async mutex
//! per account; different accounts never wait on each other.
//!
//! The locks only cover a single process. Several servers sharing one
//! database are still last-write-wins.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

type LockMap = HashMap<String, Arc<AsyncMutex<()>>>;

/// Registry of per-account async mutexes.
///
/// Entries are removed once the last holder or waiter is gone, including a
/// waiter whose future was dropped before it got the lock, so the map only
/// holds accounts with a write in flight.
#[derive(Debug, Clone, Default)]
pub struct AccountLocks {
    inner: Arc<Mutex<LockMap>>,
}

/// Held while an account's favorites are being rewritten.
///
/// Also exists while waiting (with no inner guard yet) so that a cancelled
/// wait still cleans up its map entry.
#[derive(Debug)]
pub struct AccountGuard {
    account: String,
    guard: Option<OwnedMutexGuard<()>>,
    locks: Arc<Mutex<LockMap>>,
}

impl AccountLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive access to `account`.
    ///
    /// Cancel safe: dropping the returned future while it waits leaves no
    /// entry behind.
    pub async fn acquire(&self, account: &str) -> AccountGuard {
        let mut held = AccountGuard {
            account: account.to_string(),
            guard: None,
            locks: self.inner.clone(),
        };
        let lock = {
            let mut map = self.inner.lock().unwrap_or_else(|e| e.into_inner());
            map.entry(account.to_string()).or_default().clone()
        };

        // `lock` moves into the wait future, which is dropped before `held`
        // if this future is cancelled.
        held.guard = Some(lock.lock_owned().await);
        held
    }

    /// Number of accounts currently locked or waited on.
    pub fn active(&self) -> usize {
        self.inner.lock().unwrap_or_else(|e| e.into_inner()).len()
    }
}

impl Drop for AccountGuard {
    fn drop(&mut self) {
        let mut map = self.locks.lock().unwrap_or_else(|e| e.into_inner());
        // Release before counting so our own reference is gone. A cancelled
        // waiter has no guard and only runs the count.
        drop(self.guard.take());
        if let Some(lock) = map.get(&self.account) {
            if Arc::strong_count(lock) == 1 {
                map.remove(&self.account);
            }
        }
    }
}
