//! Error types for pgplan

use thiserror::Error;

/// Result type alias for plan construction and execution
pub type PlanResult<T> = Result<T, PlanError>;

/// Error types for query-plan construction and execution.
///
/// Builder methods never return these directly; the first error raised
/// anywhere in a fluent chain is stored on the plan and surfaced by the
/// terminal call. See the crate docs for the deferred-error contract.
#[derive(Debug, Error)]
pub enum PlanError {
    /// No column is bound to the supplied field reference. Almost always
    /// means the field belongs to a struct other than the plan's reference
    /// target.
    #[error("cannot find a column matching the passed in field reference")]
    FieldNotFound,

    /// The field resolves to a column excluded from persistence.
    #[error("cannot run queries against transient column {0}")]
    TransientColumn(&'static str),

    /// A field enumerated by the reference target has no entry in its
    /// table metadata.
    #[error("field {field} on table {table} has no column mapping")]
    UnmappedField {
        table: &'static str,
        field: &'static str,
    },

    /// Order direction outside `""`, `"asc"`, `"desc"` (case-insensitive).
    #[error(r#"order direction must be "", "asc", or "desc", got {0:?}"#)]
    InvalidOrderDirection(String),

    /// Driver-reported error, passed through unchanged.
    #[error("database error: {0}")]
    Database(#[from] postgres::Error),
}

impl PlanError {
    /// Check if this is a field-resolution error
    pub fn is_field_not_found(&self) -> bool {
        matches!(self, Self::FieldNotFound)
    }

    /// Check if this is a transient-column error
    pub fn is_transient_column(&self) -> bool {
        matches!(self, Self::TransientColumn(_))
    }

    /// Check if this is an order-direction error
    pub fn is_invalid_order_direction(&self) -> bool {
        matches!(self, Self::InvalidOrderDirection(_))
    }
}
