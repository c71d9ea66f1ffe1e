//! Favorites repository implementation.
//!
//! Table `favorite(account TEXT PRIMARY KEY, targets TEXT)`, one row per
//! account. `targets` is a JSON array of target ids. Rows written by older
//! deployments hold a comma-joined string; those are still read, and are
//! rewritten as JSON on the account's next update.

use async_trait::async_trait;
use sqlx::{Pool, Sqlite};
use tracing::{debug, warn};

use dictation_core::{
    Error, FavoriteRecord, FavoritesRepository, Result, TargetId, LEGACY_DELIMITER,
};

/// SQLite implementation of FavoritesRepository.
#[derive(Clone)]
pub struct SqliteFavoritesRepository {
    pool: Pool<Sqlite>,
}

impl SqliteFavoritesRepository {
    /// Create a new SqliteFavoritesRepository with the given connection pool.
    pub fn new(pool: Pool<Sqlite>) -> Self {
        Self { pool }
    }

    /// Raw stored value for `account`, `None` when there is no row.
    pub async fn fetch_raw(&self, account: &str) -> Result<Option<String>> {
        let value = sqlx::query_scalar::<_, Option<String>>(
            "SELECT targets FROM favorite WHERE account = ?",
        )
        .bind(account)
        .fetch_optional(&self.pool)
        .await
        .map_err(Error::Database)?;
        Ok(value.map(Option::unwrap_or_default))
    }

    /// Decoded record for `account`, `None` when there is no row.
    ///
    /// Unlike [`FavoritesRepository::get`], database errors are returned to
    /// the caller.
    pub async fn fetch_record(&self, account: &str) -> Result<Option<FavoriteRecord>> {
        let Some(raw) = self.fetch_raw(account).await? else {
            return Ok(None);
        };
        Ok(Some(FavoriteRecord {
            account: account.to_string(),
            targets: decode_targets(&raw),
        }))
    }
}

#[async_trait]
impl FavoritesRepository for SqliteFavoritesRepository {
    async fn get(&self, account: &str) -> Vec<TargetId> {
        match self.fetch_record(account).await {
            Ok(record) => record.map(|r| r.targets).unwrap_or_default(),
            Err(e) => {
                warn!(
                    subsystem = "database",
                    component = "favorites",
                    op = "get",
                    account,
                    error = %e,
                    "Unreadable favorites record, treating as empty"
                );
                Vec::new()
            }
        }
    }

    async fn put(&self, account: &str, targets: &[TargetId]) -> Result<()> {
        let encoded = encode_targets(targets)?;

        sqlx::query(
            "INSERT INTO favorite (account, targets) VALUES (?, ?) \
             ON CONFLICT(account) DO UPDATE SET targets = excluded.targets",
        )
        .bind(account)
        .bind(&encoded)
        .execute(&self.pool)
        .await
        .map_err(Error::Database)?;

        debug!(
            subsystem = "database",
            component = "favorites",
            op = "put",
            account,
            result_count = targets.len(),
            "Favorites replaced"
        );
        Ok(())
    }
}

/// Encode a favorites list for storage.
pub fn encode_targets(targets: &[TargetId]) -> Result<String> {
    Ok(serde_json::to_string(targets)?)
}

/// Decode a stored favorites value.
///
/// A value that parses as a JSON array of strings is taken as such. Anything
/// else, including text that merely starts with `[`, is the legacy
/// comma-joined format: target ids may contain brackets, so a row such as
/// `[draft],t2` must still decode. Entries that are not valid target ids are
/// dropped in both formats.
pub fn decode_targets(raw: &str) -> Vec<TargetId> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Vec::new();
    }

    let entries: Vec<String> = match serde_json::from_str::<Vec<String>>(raw) {
        Ok(entries) => entries,
        Err(_) => raw
            .split(LEGACY_DELIMITER)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect(),
    };

    entries
        .into_iter()
        .filter_map(|entry| TargetId::new(entry).ok())
        .collect()
}
