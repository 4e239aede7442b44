//! Category/product consistency core
//!
//! - [`tree`]: inherited properties, parent snapshots, ancestry checks
//! - [`properties`]: product property validation
//! - [`images`]: per-entity image set reconciliation
//! - [`transaction`]: begin/commit/abort wrapper for multi-document writes

pub mod images;
pub mod properties;
pub mod transaction;
pub mod tree;

pub use images::{ImageOwner, ImagePolicy, ImageSet, PendingImage};
pub use properties::validate_product_properties;
pub use transaction::run_in_transaction;
pub use tree::resolve_inherited_properties;
