//! # dictation-core
//!
//! Core types, traits and logic for the dictation practice backend.
//!
//! - [`catalog`]: targets (`<id>.md` files) and their assets on disk
//! - [`sampler`]: uniform random previews over the catalog
//! - [`favorites`]: per-account favorites reconciled against the catalog
//! - [`traits`]: the storage seam implemented by `dictation-db`

pub mod catalog;
pub mod error;
pub mod favorites;
pub mod file_safety;
pub mod locks;
pub mod models;
pub mod sampler;
pub mod traits;

// Re-export commonly used types at crate root
pub use catalog::{Asset, TargetCatalog};
pub use error::{Error, Result};
pub use favorites::FavoritesService;
pub use file_safety::{content_type_for, validate_path_segment};
pub use locks::{AccountGuard, AccountLocks};
pub use models::*;
pub use sampler::PreviewSampler;
pub use traits::*;
