//! Convenient imports for typical `pgplan` usage.
//!
//! This module is intentionally small and focused on the most common APIs
//! so examples can start with:
//!
//! ```ignore
//! use pgplan::prelude::*;
//! ```

pub use crate::{
    ColumnMeta, FieldAddr, FieldSet, Filter, FromRow, Model, PlanError, PlanResult,
    StatementExecutor, TableMeta, query, query_with,
};

pub use crate::dialect::{Dialect, PostgresDialect};
