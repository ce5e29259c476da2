//! Query plans with compile-time clause checking.
//!
//! A plan starts unrestricted and narrows as methods are called: each call
//! returns a view type exposing only the operations still legal for the
//! statement kinds that remain possible. UPDATE statements may both set
//! values and carry a where clause, but SELECT and DELETE cannot set
//! values, INSERT cannot have a where clause, and only SELECT can order,
//! group, or paginate.
//!
//! Because of this design, the following refuses to compile:
//!
//! ```ignore
//! let inv = Invoice::default();
//! pgplan::query(&inv, &mut client)
//!     .set(&inv.memo, "test")
//!     .where_clause()
//!     .lt(&inv.created, now)
//!     .insert(); // error: no method `insert` on UpdatePlan
//! ```
//!
//! Columns are referenced by borrowing a field of the reference struct,
//! never by name, so a typo in a column reference is a compile error too.
//! The reference struct's values are never read; it serves purely as an
//! addressing scheme:
//!
//! ```ignore
//! let inv = Invoice::default();
//! let unpaid = pgplan::query(&inv, &mut client)
//!     .where_clause()
//!     .eq(&inv.is_paid, false)
//!     .gt(&inv.created, cutoff)
//!     .select()?;
//! ```
//!
//! Errors raised mid-chain (unknown field, transient column, bad order
//! direction) do not abort the chain; the first one is remembered and
//! returned by the terminal call, and nothing is sent to the database.

mod core;
mod join;
mod query;
mod set;

pub use self::core::BuiltStatement;
pub use join::{JoinPlan, SetJoinPlan};
pub use query::{Plan, SelectPlan, WherePlan};
pub use set::{SetPlan, UpdatePlan};

use std::marker::PhantomData;

use crate::dialect::{Dialect, PostgresDialect};
use crate::executor::StatementExecutor;
use crate::meta::Model;

use self::core::QueryPlan;

/// Start a plan for `target` using the PostgreSQL dialect.
///
/// The target is borrowed for the plan's whole lifetime; pass borrows of
/// its fields to identify columns.
pub fn query<'a, T: Model>(
    target: &'a T,
    executor: &'a mut dyn StatementExecutor,
) -> Plan<'a, T> {
    static DIALECT: PostgresDialect = PostgresDialect;
    query_with(target, executor, &DIALECT)
}

/// Start a plan for `target` with an explicit dialect.
pub fn query_with<'a, T: Model>(
    target: &'a T,
    executor: &'a mut dyn StatementExecutor,
    dialect: &'a dyn Dialect,
) -> Plan<'a, T> {
    Plan {
        plan: QueryPlan::new(target, executor, dialect),
        _target: PhantomData,
    }
}
