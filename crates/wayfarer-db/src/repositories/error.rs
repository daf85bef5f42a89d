//! Error handling utilities for repositories

use sqlx::Error as SqlxError;
use wayfarer_core::error::DomainError;
use wayfarer_core::value_objects::Snowflake;

const SERIALIZATION_FAILURE: &str = "40001";
const DEADLOCK_DETECTED: &str = "40P01";
const CHECK_VIOLATION: &str = "23514";

/// Convert SQLx error to DomainError.
///
/// Serialization failures and deadlocks become `TransactionConflict` so the
/// service layer can retry the whole operation.
pub fn map_db_error(e: SqlxError) -> DomainError {
    if let Some(db_err) = e.as_database_error() {
        match db_err.code().as_deref() {
            Some(SERIALIZATION_FAILURE | DEADLOCK_DETECTED) => {
                return DomainError::TransactionConflict;
            }
            Some(CHECK_VIOLATION) => {
                tracing::error!(
                    constraint = db_err.constraint().unwrap_or("unknown"),
                    "check constraint violated; counter and edges have drifted"
                );
                return DomainError::InternalError(format!(
                    "constraint violated: {}",
                    db_err.constraint().unwrap_or("unknown")
                ));
            }
            _ => {}
        }
    }
    DomainError::DatabaseError(e.to_string())
}

/// Check for unique violation and return appropriate error or fallback
pub fn map_unique_violation<F>(e: SqlxError, on_unique: F) -> DomainError
where
    F: FnOnce() -> DomainError,
{
    if let Some(db_err) = e.as_database_error() {
        if db_err.is_unique_violation() {
            return on_unique();
        }
    }
    map_db_error(e)
}

/// Map an error from a row written on behalf of `actor`.
///
/// Every other referenced row is looked up before the write and rows are never
/// hard-deleted, so a foreign-key violation means the actor has no `users` row.
pub fn map_missing_actor(e: SqlxError, actor: Snowflake) -> DomainError {
    if let Some(db_err) = e.as_database_error() {
        if db_err.is_foreign_key_violation() {
            tracing::warn!(actor_id = %actor, "write rejected: actor has no user row");
            return DomainError::UserNotFound(actor);
        }
    }
    map_db_error(e)
}

/// [`map_missing_actor`] for edge inserts, where a duplicate pair is reported by `on_unique`
pub fn map_edge_insert<F>(e: SqlxError, actor: Snowflake, on_unique: F) -> DomainError
where
    F: FnOnce() -> DomainError,
{
    if let Some(db_err) = e.as_database_error() {
        if db_err.is_unique_violation() {
            return on_unique();
        }
    }
    map_missing_actor(e, actor)
}

/// Check that a conditional write touched exactly one row
pub fn expect_one_row(rows_affected: u64) -> Result<(), DomainError> {
    if rows_affected == 1 {
        Ok(())
    } else {
        Err(DomainError::TransactionConflict)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expect_one_row() {
        assert!(expect_one_row(1).is_ok());
        assert!(matches!(
            expect_one_row(0),
            Err(DomainError::TransactionConflict)
        ));
    }

    #[test]
    fn test_non_database_error_is_database_error() {
        let err = map_db_error(SqlxError::RowNotFound);
        assert!(matches!(err, DomainError::DatabaseError(_)));
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_actor_mapping_falls_through_for_non_database_errors() {
        let actor = Snowflake::new(7);
        assert!(matches!(
            map_missing_actor(SqlxError::RowNotFound, actor),
            DomainError::DatabaseError(_)
        ));
        assert!(matches!(
            map_edge_insert(SqlxError::RowNotFound, actor, || DomainError::TransactionConflict),
            DomainError::DatabaseError(_)
        ));
    }
}
