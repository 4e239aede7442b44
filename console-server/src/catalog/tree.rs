//! Category tree manager
//!
//! `parent_id` is the canonical link; the `parentCategory` embed is a
//! snapshot rebuilt from the stored parent whenever a category or one of its
//! ancestors is written.

use shared::error::{AppError, ErrorCode};
use shared::models::{Category, Property};
use sqlx::SqliteConnection;
use std::collections::VecDeque;

use crate::db::repository::category as category_repo;
use crate::error::ServiceResult;

/// Own properties followed by each ancestor's, nearest first.
///
/// Names are not deduplicated: a property redefined at several levels is
/// listed once per level.
pub fn resolve_inherited_properties(category: &Category) -> Vec<Property> {
    let mut resolved = category.properties.clone();
    let mut level = Some(&category.parent_category);
    while let Some(parent) = level {
        if parent.id.is_none() {
            break;
        }
        resolved.extend(parent.properties.iter().cloned());
        level = parent.parent();
    }
    resolved
}

/// Reject a parent assignment that would make `category_id` its own ancestor
pub async fn ensure_not_ancestor(
    conn: &mut SqliteConnection,
    category_id: i64,
    new_parent_id: i64,
) -> ServiceResult<()> {
    let mut cursor = Some(new_parent_id);
    while let Some(current) = cursor {
        if current == category_id {
            return Err(AppError::new(ErrorCode::CategoryCycle).into());
        }
        cursor = category_repo::find_parent_id(&mut *conn, current)
            .await?
            .flatten();
    }
    Ok(())
}

/// Rebuild the parent snapshot of every descendant of `root`
///
/// Returns the number of categories touched.
pub async fn refresh_descendant_snapshots(
    conn: &mut SqliteConnection,
    root: &Category,
) -> ServiceResult<usize> {
    let mut queue = VecDeque::from([root.clone()]);
    let mut refreshed = 0;

    while let Some(parent) = queue.pop_front() {
        let snapshot = parent.to_parent_snapshot();
        for child_id in category_repo::find_child_ids(&mut *conn, parent.id).await? {
            category_repo::set_parent_snapshot(&mut *conn, child_id, &snapshot).await?;
            if let Some(child) = category_repo::find_by_id(&mut *conn, child_id).await? {
                queue.push_back(child);
            }
            refreshed += 1;
        }
    }

    Ok(refreshed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DbService;
    use shared::models::{ImageRef, ParentCategory};

    fn category(id: i64, name: &str, properties: Vec<Property>, parent: Option<&Category>) -> Category {
        Category {
            id,
            name: name.to_string(),
            parent_category: parent
                .map(Category::to_parent_snapshot)
                .unwrap_or_default(),
            properties,
            child_categories: vec![],
            images: vec![ImageRef::new(format!("{id}.png"), "")],
            created: id,
            updated: id,
        }
    }

    #[test]
    fn test_root_category_resolves_to_own_properties() {
        let root = category(
            1,
            "Electronics",
            vec![Property::enumerated("Brand", "A,B"), Property::custom("Model")],
            None,
        );
        assert_eq!(resolve_inherited_properties(&root), root.properties);
    }

    #[test]
    fn test_chain_concatenates_nearest_first() {
        let a = category(1, "A", vec![Property::enumerated("Brand", "X,Y")], None);
        let b = category(2, "B", vec![Property::enumerated("OS", "Android,iOS")], Some(&a));
        let c = category(3, "C", vec![Property::enumerated("RAM", "4GB,8GB")], Some(&b));

        let names: Vec<_> = resolve_inherited_properties(&c)
            .into_iter()
            .map(|p| p.name)
            .collect();
        assert_eq!(names, vec!["RAM", "OS", "Brand"]);
    }

    #[test]
    fn test_colliding_names_are_kept_per_level() {
        let a = category(1, "A", vec![Property::enumerated("Color", "Red")], None);
        let b = category(2, "B", vec![Property::enumerated("Color", "Blue")], Some(&a));

        let resolved = resolve_inherited_properties(&b);
        assert_eq!(resolved.len(), 2);
        assert_eq!(resolved[0].value, "Blue");
        assert_eq!(resolved[1].value, "Red");
    }

    #[test]
    fn test_walk_stops_at_level_without_id() {
        let mut c = category(3, "C", vec![Property::custom("Note")], None);
        c.parent_category = ParentCategory {
            id: None,
            name: "legacy".into(),
            properties: vec![Property::custom("Ignored")],
            parent_category: None,
        };
        assert_eq!(resolve_inherited_properties(&c).len(), 1);
    }

    #[tokio::test]
    async fn test_cycle_is_rejected() {
        let db = DbService::in_memory().await.unwrap();
        let a = category(1, "A", vec![], None);
        let b = category(2, "B", vec![], Some(&a));
        category_repo::insert(&db.pool, &a, None).await.unwrap();
        category_repo::insert(&db.pool, &b, Some(1)).await.unwrap();

        let mut conn = db.pool.acquire().await.unwrap();
        assert!(ensure_not_ancestor(&mut conn, 1, 2).await.is_err());
        assert!(ensure_not_ancestor(&mut conn, 1, 1).await.is_err());
        assert!(ensure_not_ancestor(&mut conn, 2, 1).await.is_ok());
    }

    #[tokio::test]
    async fn test_descendants_pick_up_renamed_ancestor() {
        let db = DbService::in_memory().await.unwrap();
        let a = category(1, "A", vec![Property::custom("Brand")], None);
        let b = category(2, "B", vec![], Some(&a));
        let c = category(3, "C", vec![], Some(&b));
        category_repo::insert(&db.pool, &a, None).await.unwrap();
        category_repo::insert(&db.pool, &b, Some(1)).await.unwrap();
        category_repo::insert(&db.pool, &c, Some(2)).await.unwrap();

        let mut renamed = a.clone();
        renamed.name = "A2".into();
        renamed.properties.push(Property::custom("Origin"));

        let mut conn = db.pool.acquire().await.unwrap();
        let touched = refresh_descendant_snapshots(&mut conn, &renamed).await.unwrap();
        assert_eq!(touched, 2);

        let c = category_repo::find_by_id(&mut *conn, 3).await.unwrap().unwrap();
        let grandparent = c.parent_category.parent().unwrap();
        assert_eq!(grandparent.name, "A2");
        assert_eq!(resolve_inherited_properties(&c).len(), 2);
    }
}
