//! Random preview selection over the target catalog.

use rand::seq::SliceRandom;
use rand::Rng;
use tracing::debug;

use crate::catalog::TargetCatalog;
use crate::error::{Error, Result};
use crate::models::TargetId;

/// Draws uniform random previews from a [`TargetCatalog`].
#[derive(Debug, Clone)]
pub struct PreviewSampler {
    catalog: TargetCatalog,
}

impl PreviewSampler {
    pub fn new(catalog: TargetCatalog) -> Self {
        Self { catalog }
    }

    /// Return up to `count` distinct targets in uniformly random order.
    pub async fn sample(&self, count: i64) -> Result<Vec<TargetId>> {
        let count = validate_count(count)?;
        let targets = self.catalog.list_targets().await?;
        Ok(self.pick(targets, count, &mut rand::thread_rng()))
    }

    /// Same as [`sample`](Self::sample) with a caller-supplied RNG.
    pub async fn sample_with_rng<R: Rng + Send>(
        &self,
        count: i64,
        rng: &mut R,
    ) -> Result<Vec<TargetId>> {
        let count = validate_count(count)?;
        let targets = self.catalog.list_targets().await?;
        Ok(self.pick(targets, count, rng))
    }

    fn pick<R: Rng + ?Sized>(
        &self,
        targets: Vec<TargetId>,
        count: usize,
        rng: &mut R,
    ) -> Vec<TargetId> {
        let picked = choose(targets, count, rng);
        debug!(
            subsystem = "catalog",
            component = "sampler",
            op = "sample",
            requested = count,
            result_count = picked.len(),
            "Sampled preview targets"
        );
        picked
    }
}

fn validate_count(count: i64) -> Result<usize> {
    if count <= 0 {
        return Err(Error::InvalidInput("count must be >= 1".to_string()));
    }
    Ok(usize::try_from(count).unwrap_or(usize::MAX))
}

/// Fisher–Yates shuffle of the whole list, truncated to `count`.
fn choose<R: Rng + ?Sized>(
    mut targets: Vec<TargetId>,
    count: usize,
    rng: &mut R,
) -> Vec<TargetId> {
    targets.shuffle(rng);
    targets.truncate(count);
    targets
}
