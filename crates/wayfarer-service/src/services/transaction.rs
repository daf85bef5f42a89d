//! Commit-or-rollback for a store transaction

use tracing::warn;

use wayfarer_core::traits::StoreTx;

use super::error::ServiceResult;

/// Commit when `result` is `Ok`, otherwise roll back and hand the error back.
///
/// A failed rollback is logged only; the original error is what the caller sees.
pub(crate) async fn finish<T>(tx: Box<dyn StoreTx>, result: ServiceResult<T>) -> ServiceResult<T> {
    match result {
        Ok(value) => {
            tx.commit().await?;
            Ok(value)
        }
        Err(err) => {
            if let Err(rollback_err) = tx.rollback().await {
                warn!(error = %rollback_err, "Rollback failed");
            }
            Err(err)
        }
    }
}
