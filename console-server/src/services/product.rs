//! Product save/edit workflows

use std::collections::BTreeMap;

use shared::error::{AppError, AppResult, ErrorCode};
use shared::models::Product;
use shared::util::{now_millis, snowflake_id};
use sqlx::SqliteExecutor;

use crate::catalog::images::log_orphaned_uploads;
use crate::catalog::{
    ImageOwner, ImageSet, PendingImage, resolve_inherited_properties, run_in_transaction,
    validate_product_properties,
};
use crate::db::repository::{category as category_repo, product as product_repo};
use crate::error::ServiceResult;
use crate::state::AppState;

/// Product form as submitted by the console
#[derive(Debug, Clone)]
pub struct ProductDraft {
    pub name: String,
    pub brand: String,
    pub description: String,
    pub contents: String,
    pub price: f64,
    pub currency: String,
    /// Category name
    pub category: String,
    pub properties: BTreeMap<String, String>,
    pub discount: f64,
    pub stock: i64,
    pub images: Vec<PendingImage>,
}

impl ProductDraft {
    fn check_ranges(&self) -> AppResult<()> {
        if !(0.0..=100.0).contains(&self.discount) {
            return Err(AppError::with_message(
                ErrorCode::ValueOutOfRange,
                "Discount must be between 0 and 100",
            ));
        }
        if self.stock < 0 {
            return Err(AppError::with_message(
                ErrorCode::ValueOutOfRange,
                "Stock cannot be negative",
            ));
        }
        if !self.price.is_finite() || self.price < 0.0 {
            return Err(AppError::with_message(
                ErrorCode::ValueOutOfRange,
                "Price cannot be negative",
            ));
        }
        Ok(())
    }
}

/// Resolve the product's category and check its property values against it
async fn check_properties<'e>(
    ex: impl SqliteExecutor<'e>,
    category: &str,
    properties: &BTreeMap<String, String>,
) -> ServiceResult<()> {
    let category = category_repo::find_by_name(ex, category)
        .await?
        .ok_or_else(|| AppError::validation(format!("Category {category} does not exist")))?;
    validate_product_properties(&resolve_inherited_properties(&category), properties)?;
    Ok(())
}

/// Create a product with 1 to 3 images
pub async fn create_product(state: &AppState, mut draft: ProductDraft) -> ServiceResult<Product> {
    if draft.images.is_empty() {
        return Err(AppError::required("Please upload at least one image").into());
    }
    draft.check_ranges()?;

    let mut images = ImageSet::new(ImageOwner::Product, Vec::new());
    for file in std::mem::take(&mut draft.images) {
        images.add_local(file, &state.image_policy)?;
    }

    if product_repo::find_by_name(&state.pool, &draft.name)
        .await?
        .is_some()
    {
        return Err(AppError::already_exists("Product already exists").into());
    }
    check_properties(&state.pool, &draft.category, &draft.properties).await?;

    let uploaded = images.commit_upload(state.storage()?).await?;
    let saved = images.saved().to_vec();

    let result = run_in_transaction(&state.pool, "create_product", move |conn| {
        Box::pin(async move {
            if product_repo::find_by_name(&mut *conn, &draft.name)
                .await?
                .is_some()
            {
                return Err(AppError::already_exists("Product already exists").into());
            }
            check_properties(&mut *conn, &draft.category, &draft.properties).await?;

            let now = now_millis();
            let product = Product {
                id: snowflake_id(),
                name: draft.name,
                brand: draft.brand,
                description: draft.description,
                contents: draft.contents,
                price: draft.price,
                currency: draft.currency,
                category: draft.category,
                properties: draft.properties,
                discount: draft.discount,
                stock: draft.stock,
                images: saved,
                created: now,
                updated: now,
            };
            product_repo::insert(&mut *conn, &product).await?;
            Ok(product)
        })
    })
    .await;

    match &result {
        Ok(product) => tracing::info!(product = %product.name, id = product.id, "Product created"),
        Err(_) => log_orphaned_uploads("create_product", &uploaded),
    }
    result
}

/// Edit a product in place; new images are appended to the stored ones
pub async fn edit_product(
    state: &AppState,
    id: i64,
    mut draft: ProductDraft,
) -> ServiceResult<Product> {
    let current = product_repo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| {
            AppError::no_longer_exists(format!("Product {} no longer exists", draft.name))
        })?;
    draft.check_ranges()?;

    let mut images = ImageSet::new(ImageOwner::Product, current.images.clone());
    for file in std::mem::take(&mut draft.images) {
        images.add_local(file, &state.image_policy)?;
    }
    if images.is_empty() {
        return Err(
            AppError::required("Please upload at least one image. No image is saved").into(),
        );
    }

    if draft.name != current.name
        && product_repo::find_by_name(&state.pool, &draft.name)
            .await?
            .is_some_and(|other| other.id != id)
    {
        return Err(AppError::already_exists("Product already exists").into());
    }
    check_properties(&state.pool, &draft.category, &draft.properties).await?;

    let uploaded = if images.has_unsaved() {
        images.commit_upload(state.storage()?).await?
    } else {
        Vec::new()
    };
    let appended = uploaded.clone();

    let result = run_in_transaction(&state.pool, "edit_product", move |conn| {
        Box::pin(async move {
            let current = product_repo::find_by_id(&mut *conn, id)
                .await?
                .ok_or_else(|| {
                    AppError::no_longer_exists(format!("Product {} no longer exists", draft.name))
                })?;
            if draft.name != current.name
                && product_repo::find_by_name(&mut *conn, &draft.name)
                    .await?
                    .is_some_and(|other| other.id != id)
            {
                return Err(AppError::already_exists("Product already exists").into());
            }
            check_properties(&mut *conn, &draft.category, &draft.properties).await?;

            // Stored images as of now, so a concurrent single-image delete is kept
            let mut images = current.images;
            images.extend(appended);

            let product = Product {
                id,
                name: draft.name,
                brand: draft.brand,
                description: draft.description,
                contents: draft.contents,
                price: draft.price,
                currency: draft.currency,
                category: draft.category,
                properties: draft.properties,
                discount: draft.discount,
                stock: draft.stock,
                images,
                created: current.created,
                updated: now_millis(),
            };
            product_repo::update(&mut *conn, &product).await?;
            Ok(product)
        })
    })
    .await;

    match &result {
        Ok(product) => tracing::info!(product = %product.name, id = product.id, "Product updated"),
        Err(_) => log_orphaned_uploads("edit_product", &uploaded),
    }
    result
}
