//! Favorites reconciliation.
//!
//! Stored favorites are a weak reference to targets on disk: a target can be
//! deleted while accounts still list it. Reads filter dangling ids out, and
//! every write persists the filtered list, so stale entries disappear on the
//! account's next toggle without a migration step.
//!
//! Adds are not checked against the catalog. Favoriting an id that does not
//! exist yet is accepted and simply stays invisible until the file appears.

use std::collections::HashSet;
use std::sync::Arc;

use tracing::{info, warn};

use crate::catalog::TargetCatalog;
use crate::error::{Error, Result};
use crate::locks::AccountLocks;
use crate::models::TargetId;
use crate::traits::FavoritesRepository;

/// Reads and toggles favorites for accounts.
#[derive(Clone)]
pub struct FavoritesService {
    catalog: TargetCatalog,
    store: Arc<dyn FavoritesRepository>,
    locks: AccountLocks,
}

impl FavoritesService {
    pub fn new(catalog: TargetCatalog, store: Arc<dyn FavoritesRepository>) -> Self {
        Self {
            catalog,
            store,
            locks: AccountLocks::new(),
        }
    }

    /// Favorites of `account` that still exist in the catalog.
    ///
    /// Never fails: an unknown account, an unreadable record or an unreadable
    /// catalog all yield an empty list.
    pub async fn favorites(&self, account: &str) -> Vec<TargetId> {
        let stored = self.store.get(account).await;
        if stored.is_empty() {
            return stored;
        }

        match self.catalog.list_targets().await {
            Ok(live) => retain_live(stored, &live).0,
            Err(e) => {
                warn!(
                    subsystem = "favorites",
                    op = "favorites",
                    account,
                    error = %e,
                    "Catalog unreadable, returning no favorites"
                );
                Vec::new()
            }
        }
    }

    /// Add (`desired == true`) or remove `target` from the favorites of
    /// `account`, persisting the catalog-filtered result as one replace.
    pub async fn set_favorite(&self, account: &str, target: &str, desired: bool) -> Result<()> {
        if account.is_empty() {
            return Err(Error::InvalidInput("account cannot be empty".to_string()));
        }
        let target = TargetId::new(target)?;

        let _guard = self.locks.acquire(account).await;

        let stored = self.store.get(account).await;
        let live = self.catalog.list_targets().await?;
        let (mut targets, stale) = retain_live(stored, &live);
        apply_toggle(&mut targets, &target, desired);

        self.store.put(account, &targets).await?;

        info!(
            subsystem = "favorites",
            component = "reconciler",
            op = "set_favorite",
            account,
            target_id = %target,
            desired,
            stale_count = stale,
            result_count = targets.len(),
            "Favorites updated"
        );
        Ok(())
    }
}

/// Keep only ids present in `live`, preserving order. Returns the kept list
/// and the number of dropped entries.
fn retain_live(stored: Vec<TargetId>, live: &[TargetId]) -> (Vec<TargetId>, usize) {
    let live: HashSet<&TargetId> = live.iter().collect();
    let before = stored.len();
    let kept: Vec<TargetId> = stored.into_iter().filter(|id| live.contains(id)).collect();
    let dropped = before - kept.len();
    (kept, dropped)
}

fn apply_toggle(targets: &mut Vec<TargetId>, target: &TargetId, desired: bool) {
    if desired {
        if !targets.contains(target) {
            targets.push(target.clone());
        }
    } else {
        targets.retain(|t| t != target);
    }
}
