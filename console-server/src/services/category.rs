//! Category save/edit workflows

use shared::error::AppError;
use shared::models::{Category, ParentCategory, Property};
use shared::util::{now_millis, snowflake_id};
use sqlx::SqliteExecutor;

use crate::catalog::images::{delete_retired, log_orphaned_uploads};
use crate::catalog::tree::{ensure_not_ancestor, refresh_descendant_snapshots};
use crate::catalog::{ImageOwner, ImageSet, PendingImage, run_in_transaction};
use crate::db::repository::{category as category_repo, product as product_repo};
use crate::error::ServiceResult;
use crate::state::AppState;

/// Category form as submitted by the console
#[derive(Debug, Clone)]
pub struct CategoryDraft {
    pub name: String,
    /// Empty when the category has no parent; otherwise matched by id, or by
    /// name when the id is absent
    pub parent: ParentCategory,
    pub properties: Vec<Property>,
    pub images: Vec<PendingImage>,
}

fn parent_label(parent: &ParentCategory) -> String {
    match (&parent.id, parent.name.is_empty()) {
        (_, false) => parent.name.clone(),
        (Some(id), true) => id.to_string(),
        (None, true) => String::new(),
    }
}

/// Load the stored parent a draft points at
async fn resolve_parent<'e>(
    ex: impl SqliteExecutor<'e>,
    parent: &ParentCategory,
) -> ServiceResult<Option<Category>> {
    if parent.is_empty() {
        return Ok(None);
    }
    let found = match parent.id {
        Some(id) => category_repo::find_by_id(ex, id).await?,
        None => category_repo::find_by_name(ex, &parent.name).await?,
    };
    match found {
        Some(category) => Ok(Some(category)),
        None => Err(AppError::no_longer_exists(format!(
            "Parent category {} no longer exists",
            parent_label(parent)
        ))
        .into()),
    }
}

fn snapshot_of(parent: Option<&Category>) -> ParentCategory {
    parent
        .map(Category::to_parent_snapshot)
        .unwrap_or_default()
}

/// Create a category, upload its image and link it under its parent
pub async fn create_category(state: &AppState, draft: CategoryDraft) -> ServiceResult<Category> {
    let CategoryDraft {
        name,
        parent,
        properties,
        images: files,
    } = draft;

    if files.is_empty() {
        return Err(AppError::required("Please upload at least one image").into());
    }
    let mut images = ImageSet::new(ImageOwner::Category, Vec::new());
    for file in files {
        images.add_local(file, &state.image_policy)?;
    }

    if category_repo::find_by_name(&state.pool, &name).await?.is_some() {
        return Err(AppError::already_exists("Category already exists").into());
    }
    resolve_parent(&state.pool, &parent).await?;

    let uploaded = images.commit_upload(state.storage()?).await?;
    let saved = images.saved().to_vec();

    let result = run_in_transaction(&state.pool, "create_category", move |conn| {
        Box::pin(async move {
            // A concurrent create may have taken the name since the pre-check
            if category_repo::find_by_name(&mut *conn, &name).await?.is_some() {
                return Err(AppError::already_exists("Category already exists").into());
            }
            let parent = resolve_parent(&mut *conn, &parent).await?;

            let now = now_millis();
            let category = Category {
                id: snowflake_id(),
                name,
                parent_category: snapshot_of(parent.as_ref()),
                properties,
                child_categories: Vec::new(),
                images: saved,
                created: now,
                updated: now,
            };
            category_repo::insert(&mut *conn, &category, parent.as_ref().map(|p| p.id)).await?;
            if let Some(parent) = &parent {
                category_repo::push_child(&mut *conn, parent.id, &category.name).await?;
            }
            Ok(category)
        })
    })
    .await;

    match &result {
        Ok(category) => tracing::info!(category = %category.name, id = category.id, "Category created"),
        Err(_) => log_orphaned_uploads("create_category", &uploaded),
    }
    result
}

/// Edit a category in place
///
/// New images replace the stored one, which is deleted after the commit. The
/// old parent loses the child name, the new parent gains it, and products
/// and descendants follow a rename in the same transaction.
pub async fn edit_category(
    state: &AppState,
    id: i64,
    draft: CategoryDraft,
) -> ServiceResult<Category> {
    let CategoryDraft {
        name,
        parent,
        properties,
        images: files,
    } = draft;

    let current = category_repo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::no_longer_exists(format!("Category {name} no longer exists")))?;

    let mut images = ImageSet::new(ImageOwner::Category, current.images.clone());
    if !files.is_empty() {
        images.retire_saved();
        for file in files {
            images.add_local(file, &state.image_policy)?;
        }
    }
    if images.is_empty() {
        return Err(
            AppError::required("Please upload at least one image. No image is saved").into(),
        );
    }

    if name != current.name
        && category_repo::find_by_name(&state.pool, &name)
            .await?
            .is_some_and(|other| other.id != id)
    {
        return Err(AppError::already_exists("Category already exists").into());
    }
    resolve_parent(&state.pool, &parent).await?;

    let store = if images.has_unsaved() {
        Some(state.storage()?)
    } else {
        None
    };
    let uploaded = match store {
        Some(store) => images.commit_upload(store).await?,
        None => Vec::new(),
    };
    let saved = images.saved().to_vec();

    let result = run_in_transaction(&state.pool, "edit_category", move |conn| {
        Box::pin(async move {
            let current = category_repo::find_by_id(&mut *conn, id)
                .await?
                .ok_or_else(|| {
                    AppError::no_longer_exists(format!("Category {name} no longer exists"))
                })?;
            if name != current.name
                && category_repo::find_by_name(&mut *conn, &name)
                    .await?
                    .is_some_and(|other| other.id != id)
            {
                return Err(AppError::already_exists("Category already exists").into());
            }

            let parent = resolve_parent(&mut *conn, &parent).await?;
            if let Some(parent) = &parent {
                ensure_not_ancestor(&mut *conn, id, parent.id).await?;
            }
            let old_parent_id = category_repo::find_parent_id(&mut *conn, id)
                .await?
                .flatten();

            let now = now_millis();
            let updated = Category {
                id,
                name,
                parent_category: snapshot_of(parent.as_ref()),
                properties,
                child_categories: current.child_categories.clone(),
                images: saved,
                created: current.created,
                updated: now,
            };
            category_repo::update(&mut *conn, &updated, parent.as_ref().map(|p| p.id)).await?;

            if let Some(old_parent_id) = old_parent_id {
                category_repo::pull_child(&mut *conn, old_parent_id, &current.name).await?;
            }
            if let Some(parent) = &parent {
                category_repo::push_child(&mut *conn, parent.id, &updated.name).await?;
            }
            if updated.name != current.name {
                let renamed =
                    product_repo::rename_category(&mut *conn, &current.name, &updated.name, now)
                        .await?;
                tracing::debug!(from = %current.name, to = %updated.name, products = renamed, "Products follow category rename");
            }
            refresh_descendant_snapshots(&mut *conn, &updated).await?;
            Ok(updated)
        })
    })
    .await;

    match &result {
        Ok(category) => {
            tracing::info!(category = %category.name, id = category.id, "Category updated");
            if let Some(store) = store {
                delete_retired(store, images.retired()).await;
            }
        }
        Err(_) => log_orphaned_uploads("edit_category", &uploaded),
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::images::tests::png;
    use crate::services::testing::state_with_store;
    use shared::error::ErrorCode;
    use shared::models::Product;
    use std::collections::BTreeMap;

    fn draft(name: &str, parent: ParentCategory, properties: Vec<Property>) -> CategoryDraft {
        CategoryDraft {
            name: name.to_string(),
            parent,
            properties,
            images: vec![png(&format!("{name}.png"))],
        }
    }

    fn under(name: &str) -> ParentCategory {
        ParentCategory {
            name: name.to_string(),
            ..ParentCategory::none()
        }
    }

    fn code(err: crate::error::ServiceError) -> ErrorCode {
        AppError::from(err).code
    }

    #[tokio::test]
    async fn test_create_round_trip() {
        let (state, store) = state_with_store().await;
        let created = create_category(
            &state,
            draft(
                "Phones",
                ParentCategory::none(),
                vec![Property::enumerated("RAM", "4GB,8GB")],
            ),
        )
        .await
        .unwrap();

        let fetched = category_repo::find_by_name(&state.pool, "Phones")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(fetched.id, created.id);
        assert_eq!(fetched.properties[0].value, "4GB,8GB");
        assert_eq!(fetched.images.len(), 1);
        assert!(store.contains(&fetched.images[0].key));
        assert!(fetched.parent_category.is_empty());
    }

    #[tokio::test]
    async fn test_create_links_child_under_parent() {
        let (state, _store) = state_with_store().await;
        let parent = create_category(&state, draft("Electronics", ParentCategory::none(), vec![]))
            .await
            .unwrap();
        let child = create_category(&state, draft("Phones", under("Electronics"), vec![]))
            .await
            .unwrap();

        let parent = category_repo::find_by_id(&state.pool, parent.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(parent.child_categories, vec!["Phones".to_string()]);
        assert_eq!(child.parent_category.id, Some(parent.id));
        assert_eq!(child.parent_category.name, "Electronics");
    }

    #[tokio::test]
    async fn test_duplicate_name_is_conflict_without_writes() {
        let (state, store) = state_with_store().await;
        create_category(&state, draft("Phones", ParentCategory::none(), vec![]))
            .await
            .unwrap();
        let objects_before = store.len();

        let err = create_category(&state, draft("Phones", ParentCategory::none(), vec![]))
            .await
            .unwrap_err();
        let err = AppError::from(err);
        assert_eq!(err.code, ErrorCode::AlreadyExists);
        assert_eq!(err.message, "Category already exists");
        assert_eq!(store.len(), objects_before);
        assert_eq!(category_repo::find_all(&state.pool).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_create_requires_an_image() {
        let (state, _store) = state_with_store().await;
        let mut no_image = draft("Phones", ParentCategory::none(), vec![]);
        no_image.images.clear();
        let err = AppError::from(create_category(&state, no_image).await.unwrap_err());
        assert_eq!(err.code, ErrorCode::RequiredField);
        assert_eq!(err.message, "Please upload at least one image");
    }

    #[tokio::test]
    async fn test_create_rejects_second_image() {
        let (state, store) = state_with_store().await;
        let mut two = draft("Phones", ParentCategory::none(), vec![]);
        two.images.push(png("second.png"));
        let err = create_category(&state, two).await.unwrap_err();
        assert_eq!(code(err), ErrorCode::ImageLimitExceeded);
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_create_without_bucket_is_config_error() {
        let (mut state, _store) = state_with_store().await;
        state.storage = None;
        let err = create_category(&state, draft("Phones", ParentCategory::none(), vec![]))
            .await
            .unwrap_err();
        let err = AppError::from(err);
        assert_eq!(err.code, ErrorCode::ConfigError);
        assert_eq!(err.message, "A credential/property is missing");
    }

    #[tokio::test]
    async fn test_create_under_missing_parent_fails() {
        let (state, store) = state_with_store().await;
        let err = create_category(&state, draft("Phones", under("Ghost"), vec![]))
            .await
            .unwrap_err();
        let err = AppError::from(err);
        assert_eq!(err.code, ErrorCode::NoLongerExists);
        assert_eq!(err.message, "Parent category Ghost no longer exists");
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_edit_moves_category_between_parents() {
        let (state, _store) = state_with_store().await;
        create_category(&state, draft("Home", ParentCategory::none(), vec![]))
            .await
            .unwrap();
        let p2 = create_category(&state, draft("Garden", ParentCategory::none(), vec![]))
            .await
            .unwrap();
        let child = create_category(&state, draft("Tools", under("Home"), vec![]))
            .await
            .unwrap();

        let mut edit = draft("Tools", under("Garden"), vec![]);
        edit.images.clear();
        let edited = edit_category(&state, child.id, edit).await.unwrap();

        let home = category_repo::find_by_name(&state.pool, "Home")
            .await
            .unwrap()
            .unwrap();
        let garden = category_repo::find_by_name(&state.pool, "Garden")
            .await
            .unwrap()
            .unwrap();
        assert!(home.child_categories.is_empty());
        assert_eq!(garden.child_categories, vec!["Tools".to_string()]);
        assert_eq!(edited.parent_category.id, Some(p2.id));
        assert_eq!(edited.images, child.images);
    }

    #[tokio::test]
    async fn test_failed_edit_leaves_tree_unchanged() {
        let (state, _store) = state_with_store().await;
        let a = create_category(&state, draft("A", ParentCategory::none(), vec![]))
            .await
            .unwrap();
        create_category(&state, draft("B", under("A"), vec![]))
            .await
            .unwrap();

        // A under its own child
        let mut edit = draft("A", under("B"), vec![]);
        edit.images.clear();
        let err = edit_category(&state, a.id, edit).await.unwrap_err();
        assert_eq!(code(err), ErrorCode::CategoryCycle);

        let a = category_repo::find_by_id(&state.pool, a.id)
            .await
            .unwrap()
            .unwrap();
        let b = category_repo::find_by_name(&state.pool, "B")
            .await
            .unwrap()
            .unwrap();
        assert!(a.parent_category.is_empty());
        assert_eq!(a.child_categories, vec!["B".to_string()]);
        assert!(b.child_categories.is_empty());
    }

    #[tokio::test]
    async fn test_edit_replaces_image_and_deletes_old_one() {
        let (state, store) = state_with_store().await;
        let created = create_category(&state, draft("Phones", ParentCategory::none(), vec![]))
            .await
            .unwrap();
        let old_key = created.images[0].key.clone();

        let edited = edit_category(
            &state,
            created.id,
            draft("Phones", ParentCategory::none(), vec![]),
        )
        .await
        .unwrap();

        assert_eq!(edited.images.len(), 1);
        assert_ne!(edited.images[0].key, old_key);
        assert!(!store.contains(&old_key));
        assert!(store.contains(&edited.images[0].key));
    }

    #[tokio::test]
    async fn test_rename_follows_to_products_and_children() {
        let (state, _store) = state_with_store().await;
        let phones = create_category(
            &state,
            draft("Phones", ParentCategory::none(), vec![Property::custom("Model")]),
        )
        .await
        .unwrap();
        create_category(&state, draft("Android", under("Phones"), vec![]))
            .await
            .unwrap();
        let product = Product {
            id: 77,
            name: "Pixel".into(),
            brand: "Google".into(),
            description: String::new(),
            contents: String::new(),
            price: 499.0,
            currency: "USD".into(),
            category: "Phones".into(),
            properties: BTreeMap::from([("Model".to_string(), "8".to_string())]),
            discount: 0.0,
            stock: 3,
            images: vec![],
            created: 1,
            updated: 1,
        };
        product_repo::insert(&state.pool, &product).await.unwrap();

        let mut edit = draft("Mobiles", ParentCategory::none(), vec![Property::custom("Model")]);
        edit.images.clear();
        edit_category(&state, phones.id, edit).await.unwrap();

        let product = product_repo::find_by_id(&state.pool, 77)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(product.category, "Mobiles");
        let android = category_repo::find_by_name(&state.pool, "Android")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(android.parent_category.name, "Mobiles");
        let mobiles = category_repo::find_by_id(&state.pool, phones.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(mobiles.child_categories, vec!["Android".to_string()]);
    }

    #[tokio::test]
    async fn test_edit_of_missing_category_is_conflict() {
        let (state, _store) = state_with_store().await;
        let err = edit_category(&state, 999, draft("Ghost", ParentCategory::none(), vec![]))
            .await
            .unwrap_err();
        let err = AppError::from(err);
        assert_eq!(err.code, ErrorCode::NoLongerExists);
        assert_eq!(err.message, "Category Ghost no longer exists");
    }
}
