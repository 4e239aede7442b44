//! Transactional write orchestrator
//!
//! Begin, run the writes in order, commit on success, roll back on error.
//! The transaction is released on every path when it goes out of scope.
//! Object-store calls never happen inside `work`.

use futures::future::BoxFuture;
use sqlx::{SqliteConnection, SqlitePool};

use crate::error::ServiceResult;

/// Run `work` inside one store transaction
///
/// Every read and write in `work` must go through the connection it is
/// handed; the pool may have no other connection to give.
pub async fn run_in_transaction<T, F>(
    pool: &SqlitePool,
    operation: &'static str,
    work: F,
) -> ServiceResult<T>
where
    T: Send,
    F: for<'c> FnOnce(&'c mut SqliteConnection) -> BoxFuture<'c, ServiceResult<T>> + Send,
{
    let mut tx = pool.begin().await?;

    match work(&mut tx).await {
        Ok(value) => {
            tx.commit().await?;
            tracing::debug!(operation, "Transaction committed");
            Ok(value)
        }
        Err(err) => {
            if let Err(rollback_err) = tx.rollback().await {
                tracing::error!(operation, error = %rollback_err, "Rollback failed");
            }
            tracing::warn!(operation, "Transaction aborted");
            Err(err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DbService;
    use crate::db::repository::currency;
    use shared::error::AppError;
    use shared::models::Currency;

    fn usd(id: i64) -> Currency {
        Currency {
            id,
            name: "US Dollar".into(),
            short_name: "USD".into(),
            symbol: "$".into(),
            created: 1,
            updated: 1,
        }
    }

    #[tokio::test]
    async fn test_commit_persists_all_writes() {
        let db = DbService::in_memory().await.unwrap();
        run_in_transaction(&db.pool, "test", |conn| {
            Box::pin(async move {
                currency::insert(&mut *conn, &usd(1)).await?;
                currency::insert(&mut *conn, &usd(2)).await?;
                Ok(())
            })
        })
        .await
        .unwrap();

        assert_eq!(currency::find_all(&db.pool).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_error_rolls_back_earlier_writes() {
        let db = DbService::in_memory().await.unwrap();
        let result: ServiceResult<()> = run_in_transaction(&db.pool, "test", |conn| {
            Box::pin(async move {
                currency::insert(&mut *conn, &usd(1)).await?;
                Err(AppError::validation("second write refused").into())
            })
        })
        .await;

        assert!(result.is_err());
        assert!(currency::find_all(&db.pool).await.unwrap().is_empty());
    }
}
