//! Service layer.
//!
//! One service per component. Services own the per-call timeout and the
//! translation from repository errors into [`ServiceError`]; the
//! repositories own validation and transactions.
//!
//! ```text
//! handler ──► Service::op ──► bounded(op, timeout, repo call)
//!                                  │
//!                    ┌─────────────┼──────────────┐
//!                    ▼             ▼              ▼
//!                 Ok(value)   Err(DbError)    timed out
//!                              from_db()     Unavailable
//! ```

pub mod health_service;
pub mod inventory_service;
pub mod menu_service;
pub mod order_service;

use std::future::Future;
use std::time::Duration;

use hotcoffee_db::DbResult;
use tracing::warn;

use crate::error::{ServiceError, ServiceResult};

/// Run `fut` under `timeout`, mapping failures for operation `op`.
///
/// Dropping the future on timeout drops any open transaction with it,
/// which rolls it back.
pub(crate) async fn bounded<T, F>(op: &'static str, timeout: Duration, fut: F) -> ServiceResult<T>
where
    F: Future<Output = DbResult<T>>,
{
    match tokio::time::timeout(timeout, fut).await {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(err)) => Err(ServiceError::from_db(op, err)),
        Err(_) => {
            warn!(op, timeout_ms = timeout.as_millis() as u64, "operation timed out");
            Err(ServiceError::Unavailable(format!(
                "{op} timed out, retry later"
            )))
        }
    }
}

/// `None` from a lookup becomes a 404.
pub(crate) fn found<T>(entity: &str, id: i64, value: Option<T>) -> ServiceResult<T> {
    value.ok_or_else(|| ServiceError::NotFound(format!("{entity} not found: {id}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use hotcoffee_db::DbError;

    #[tokio::test]
    async fn test_bounded_passes_value() {
        let out = bounded("op", Duration::from_secs(1), async { Ok::<_, DbError>(7) }).await;
        assert_eq!(out.unwrap(), 7);
    }

    #[tokio::test]
    async fn test_bounded_times_out() {
        let out: ServiceResult<()> = bounded("slow op", Duration::from_millis(10), async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok(())
        })
        .await;
        assert!(matches!(out, Err(ServiceError::Unavailable(_))));
    }

    #[test]
    fn test_found() {
        assert_eq!(found("Order", 1, Some(3)).unwrap(), 3);
        let err = found::<()>("Order", 42, None).unwrap_err();
        assert_eq!(err.to_string(), "Order not found: 42");
    }
}
