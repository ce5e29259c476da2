//! Row mapping trait.

use postgres::Row;

use crate::error::PlanResult;

/// Maps one result row back into a caller-owned struct.
///
/// Terminal select calls use this to marshal rows into the reference
/// target's type:
///
/// ```ignore
/// impl FromRow for Invoice {
///     fn from_row(row: &Row) -> PlanResult<Self> {
///         Ok(Self {
///             id: row.try_get("id")?,
///             memo: row.try_get("memo")?,
///             is_paid: row.try_get("is_paid")?,
///         })
///     }
/// }
/// ```
pub trait FromRow: Sized {
    /// Build a value from one row.
    fn from_row(row: &Row) -> PlanResult<Self>;
}
