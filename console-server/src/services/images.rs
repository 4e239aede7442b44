//! Stored image removal
//!
//! The blob is deleted first and the document reference pulled second, in
//! two separate calls. A failed pull leaves a dangling reference, which is
//! logged with its key.

use shared::error::AppError;
use shared::models::ImageRef;

use crate::catalog::{ImageOwner, ImageSet};
use crate::db::repository::{category as category_repo, product as product_repo};
use crate::error::ServiceResult;
use crate::state::AppState;

/// Remove one image from the product or category `owner_id`
///
/// Refused when it is the entity's last image.
pub async fn delete_image(state: &AppState, owner_id: i64, key: &str) -> ServiceResult<()> {
    let (owner, saved) = if let Some(product) = product_repo::find_by_id(&state.pool, owner_id).await? {
        (ImageOwner::Product, product.images)
    } else if let Some(category) = category_repo::find_by_id(&state.pool, owner_id).await? {
        (ImageOwner::Category, category.images)
    } else {
        return Err(AppError::not_found(format!("Image owner {owner_id} does not exist")).into());
    };

    let store = state.storage()?;
    let mut images = ImageSet::new(owner, saved);
    images.delete_saved(key, store).await?;

    let pulled = match owner {
        ImageOwner::Product => product_repo::pull_image(&state.pool, owner_id, key).await,
        ImageOwner::Category => category_repo::pull_image(&state.pool, owner_id, key).await,
    };
    if let Err(e) = pulled {
        tracing::error!(owner = owner.label(), id = owner_id, key = %key, error = %e, "Image deleted from store but still referenced by its document");
        return Err(e.into());
    }

    tracing::info!(owner = owner.label(), id = owner_id, key = %key, "Image deleted");
    Ok(())
}

/// Delete a batch of stored images, ahead of deleting their owner
///
/// Only the object store is touched; the caller removes the owning document.
pub async fn delete_images(state: &AppState, images: &[ImageRef]) -> ServiceResult<()> {
    if images.is_empty() {
        return Err(AppError::required("Images to be deleted are missing").into());
    }
    let store = state.storage()?;

    let keys: Vec<String> = images.iter().map(|image| image.key.clone()).collect();
    if let Err(e) = store.delete_objects(&keys).await {
        tracing::error!(keys = ?keys, error = %e, "Batch image delete failed");
        return Err(AppError::internal("An error occurred while deleting one or more images").into());
    }

    tracing::info!(count = keys.len(), "Images deleted");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::testing::state_with_store;
    use shared::error::ErrorCode;
    use shared::models::{Category, ParentCategory, Product};
    use std::collections::BTreeMap;

    fn product_with(images: &[&str]) -> Product {
        Product {
            id: 10,
            name: "Kettle".into(),
            brand: "Acme".into(),
            description: String::new(),
            contents: String::new(),
            price: 25.0,
            currency: "USD".into(),
            category: "Kitchen".into(),
            properties: BTreeMap::new(),
            discount: 0.0,
            stock: 1,
            images: images
                .iter()
                .map(|key| ImageRef::new(*key, format!("memory://images/{key}")))
                .collect(),
            created: 1,
            updated: 1,
        }
    }

    #[tokio::test]
    async fn test_delete_image_pulls_reference() {
        let (state, store) = state_with_store().await;
        store.insert("a.png", b"a", "image/png");
        store.insert("b.png", b"b", "image/png");
        product_repo::insert(&state.pool, &product_with(&["a.png", "b.png"]))
            .await
            .unwrap();

        delete_image(&state, 10, "a.png").await.unwrap();

        assert!(!store.contains("a.png"));
        let product = product_repo::find_by_id(&state.pool, 10)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(product.images.len(), 1);
        assert_eq!(product.images[0].key, "b.png");
    }

    #[tokio::test]
    async fn test_failed_pull_after_store_delete_is_surfaced() {
        let (state, store) = state_with_store().await;
        store.insert("a.png", b"a", "image/png");
        store.insert("b.png", b"b", "image/png");
        product_repo::insert(&state.pool, &product_with(&["a.png", "b.png"]))
            .await
            .unwrap();
        sqlx::query(
            "CREATE TRIGGER products_read_only BEFORE UPDATE ON products \
             BEGIN SELECT RAISE(ABORT, 'products are read-only'); END",
        )
        .execute(&state.pool)
        .await
        .unwrap();

        let err = AppError::from(delete_image(&state, 10, "a.png").await.unwrap_err());
        assert_eq!(err.code, ErrorCode::DatabaseError);
        assert!(err.message.contains("products are read-only"));

        // the blob is gone while the document still points at it
        assert!(!store.contains("a.png"));
        let product = product_repo::find_by_id(&state.pool, 10)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(product.images.len(), 2);
    }

    #[tokio::test]
    async fn test_last_image_cannot_be_deleted() {
        let (state, store) = state_with_store().await;
        store.insert("only.png", b"x", "image/png");
        let category = Category {
            id: 20,
            name: "Kitchen".into(),
            parent_category: ParentCategory::none(),
            properties: vec![],
            child_categories: vec![],
            images: vec![ImageRef::new("only.png", "memory://images/only.png")],
            created: 1,
            updated: 1,
        };
        category_repo::insert(&state.pool, &category, None).await.unwrap();

        let err = AppError::from(delete_image(&state, 20, "only.png").await.unwrap_err());
        assert_eq!(err.code, ErrorCode::ImageRequired);
        assert!(store.contains("only.png"));
        let category = category_repo::find_by_id(&state.pool, 20)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(category.images.len(), 1);
    }

    #[tokio::test]
    async fn test_unknown_owner_is_not_found() {
        let (state, _store) = state_with_store().await;
        let err = AppError::from(delete_image(&state, 5, "x.png").await.unwrap_err());
        assert_eq!(err.code, ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn test_batch_delete() {
        let (state, store) = state_with_store().await;
        store.insert("a.png", b"a", "image/png");
        store.insert("b.png", b"b", "image/png");
        let images = vec![ImageRef::new("a.png", ""), ImageRef::new("b.png", "")];

        delete_images(&state, &images).await.unwrap();
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_batch_delete_failure_message() {
        let (state, store) = state_with_store().await;
        store.insert("a.png", b"a", "image/png");
        store.fail_deletes(true);

        let err = AppError::from(
            delete_images(&state, &[ImageRef::new("a.png", "")])
                .await
                .unwrap_err(),
        );
        assert_eq!(err.code, ErrorCode::InternalError);
        assert_eq!(err.message, "An error occurred while deleting one or more images");
        assert!(store.contains("a.png"));
    }

    #[tokio::test]
    async fn test_empty_batch_is_rejected() {
        let (state, _store) = state_with_store().await;
        let err = AppError::from(delete_images(&state, &[]).await.unwrap_err());
        assert_eq!(err.message, "Images to be deleted are missing");
    }
}
