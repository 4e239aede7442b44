//! Catalog write workflows
//!
//! Each operation validates, uploads pending images, then runs its document
//! writes through [`crate::catalog::run_in_transaction`].

pub mod category;
pub mod images;
pub mod product;

pub use category::{CategoryDraft, create_category, edit_category};
pub use images::{delete_image, delete_images};
pub use product::{ProductDraft, create_product, edit_product};
