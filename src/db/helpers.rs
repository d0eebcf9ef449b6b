//! Database query helpers shared by handlers and services.
//!
//! - [`require_record`] turns a missing row into `NotFound`
//! - [`or_empty_when_unavailable`] lets read paths render an empty state while
//!   the database is unreachable, instead of failing the request

use crate::errors::AppError;

/// Unwrap an optional database result, returning NotFound if None.
///
/// # Example
/// ```ignore
/// let fixture = require_record(find_match(pool, id).await, "Match not found")?;
/// ```
pub fn require_record<T>(
    result: Result<Option<T>, sqlx::Error>,
    not_found_message: &str,
) -> Result<T, AppError> {
    match result {
        Ok(Some(record)) => Ok(record),
        Ok(None) => Err(AppError::not_found(not_found_message)),
        Err(e) => Err(AppError::from(e)),
    }
}

/// Replace an `Unavailable` failure with the empty value of `T`.
///
/// Only for read paths; writes must surface the failure.
pub fn or_empty_when_unavailable<T: Default>(
    result: Result<T, AppError>,
    what: &str,
) -> Result<T, AppError> {
    match result {
        Err(e) if e.is_unavailable() => {
            tracing::warn!("Database unavailable, serving empty {}: {:?}", what, e);
            Ok(T::default())
        }
        other => other,
    }
}
