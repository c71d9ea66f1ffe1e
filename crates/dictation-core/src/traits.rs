//! Core traits for pluggable storage backends.

use async_trait::async_trait;

use crate::error::Result;
use crate::models::TargetId;

/// Key-value store of favorites, keyed by account.
#[async_trait]
pub trait FavoritesRepository: Send + Sync {
    /// Stored favorites of `account`, in insertion order.
    ///
    /// A missing or unreadable record is an empty list, never an error.
    async fn get(&self, account: &str) -> Vec<TargetId>;

    /// Replace the stored favorites of `account` with `targets`.
    ///
    /// Inserts the record if the account has none yet.
    async fn put(&self, account: &str, targets: &[TargetId]) -> Result<()>;
}
