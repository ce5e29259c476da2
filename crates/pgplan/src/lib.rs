//! # pgplan
//!
//! A field-addressed, compile-time-narrowed SQL plan builder for
//! PostgreSQL.
//!
//! ## Features
//!
//! - **Typo-proof columns**: columns are referenced by borrowing a field of
//!   a reference struct (`&inv.memo`), never by string name
//! - **Illegal SQL doesn't compile**: builder return types narrow as
//!   methods are called, so an INSERT with a WHERE clause or a SELECT with
//!   a SET clause is a type error
//! - **Positional parameters done once**: every value is bound through one
//!   ordered argument list whose order always matches placeholder order
//! - **Deferred errors**: a fluent chain never panics or aborts mid-way;
//!   the first construction error is returned by the terminal call and
//!   nothing reaches the database
//! - **Pluggable boundaries**: dialect, table metadata, and statement
//!   execution are traits the caller supplies
//!
//! ## Example
//!
//! ```ignore
//! use pgplan::prelude::*;
//!
//! let inv = Invoice::default();
//!
//! // INSERT INTO "invoice" ("memo", "is_paid") VALUES ($1, $2)
//! pgplan::query(&inv, &mut client)
//!     .set(&inv.memo, "coffee")
//!     .set(&inv.is_paid, false)
//!     .insert()?;
//!
//! // SELECT ... FROM "invoice" WHERE "invoice"."is_paid" = $1
//! let unpaid = pgplan::query(&inv, &mut client)
//!     .where_clause()
//!     .eq(&inv.is_paid, false)
//!     .select()?;
//!
//! // UPDATE "invoice" SET "is_paid" = $1 WHERE "invoice"."id" = $2
//! let changed = pgplan::query(&inv, &mut client)
//!     .set(&inv.is_paid, true)
//!     .where_clause()
//!     .eq(&inv.id, "4")
//!     .update()?;
//! ```

pub mod binding;
pub mod dialect;
pub mod error;
pub mod executor;
pub mod filter;
pub mod meta;
pub mod param;
pub mod plan;
pub mod prelude;
pub mod row;

pub use binding::FieldRef;
pub use dialect::{AnsiDialect, Dialect, PostgresDialect};
pub use error::{PlanError, PlanResult};
pub use executor::StatementExecutor;
pub use filter::Filter;
pub use meta::{ColumnMeta, FieldAddr, FieldSet, Model, TableMeta};
pub use param::{Param, ParamList};
pub use plan::{
    BuiltStatement, JoinPlan, Plan, SelectPlan, SetJoinPlan, SetPlan, UpdatePlan, WherePlan, query,
    query_with,
};
pub use row::FromRow;
