//! The join-scoped narrowed views.
//!
//! While one of these views is active, comparison calls populate the most
//! recently added join's ON clause instead of the WHERE clause. Calling
//! `where_clause` closes the join scope and returns to WHERE accumulation
//! for the base table.

use std::marker::PhantomData;

use postgres::types::ToSql;

use crate::error::PlanResult;
use crate::filter::Filter;
use crate::meta::Model;
use crate::plan::core::{BuiltStatement, QueryPlan};
use crate::plan::query::{WherePlan, select_all, select_append};
use crate::plan::set::UpdatePlan;
use crate::row::FromRow;

/// A read-side plan inside a join scope: SELECT- or DELETE-capable.
pub struct JoinPlan<'a, T> {
    pub(crate) plan: QueryPlan<'a>,
    pub(crate) _target: PhantomData<&'a T>,
}

impl<'a, T: Model> JoinPlan<'a, T> {
    /// Add another joined table; later ON conditions apply to it.
    pub fn join<U: Model>(mut self, target: &'a U) -> Self {
        self.plan.add_join(target);
        self
    }

    /// Add a filter to the current join's ON clause.
    pub fn on(mut self, filter: Filter) -> Self {
        self.plan.push_on(filter);
        self
    }

    /// Add `field = value` to the current join's ON clause.
    pub fn eq<F, V: ToSql + Send + Sync + 'static>(self, field: &F, value: V) -> Self {
        self.on(Filter::eq(field, value))
    }

    /// Add `field != value` to the current join's ON clause.
    pub fn ne<F, V: ToSql + Send + Sync + 'static>(self, field: &F, value: V) -> Self {
        self.on(Filter::ne(field, value))
    }

    /// Add `field < value` to the current join's ON clause.
    pub fn lt<F, V: ToSql + Send + Sync + 'static>(self, field: &F, value: V) -> Self {
        self.on(Filter::lt(field, value))
    }

    /// Add `field <= value` to the current join's ON clause.
    pub fn lte<F, V: ToSql + Send + Sync + 'static>(self, field: &F, value: V) -> Self {
        self.on(Filter::lte(field, value))
    }

    /// Add `field > value` to the current join's ON clause.
    pub fn gt<F, V: ToSql + Send + Sync + 'static>(self, field: &F, value: V) -> Self {
        self.on(Filter::gt(field, value))
    }

    /// Add `field >= value` to the current join's ON clause.
    pub fn gte<F, V: ToSql + Send + Sync + 'static>(self, field: &F, value: V) -> Self {
        self.on(Filter::gte(field, value))
    }

    /// Add `field IS NULL` to the current join's ON clause.
    pub fn is_null<F>(self, field: &F) -> Self {
        self.on(Filter::is_null(field))
    }

    /// Add `field IS NOT NULL` to the current join's ON clause.
    pub fn is_not_null<F>(self, field: &F) -> Self {
        self.on(Filter::is_not_null(field))
    }

    /// Close the join scope and return to WHERE accumulation for the base
    /// table.
    pub fn where_clause(self) -> WherePlan<'a, T> {
        WherePlan {
            plan: self.plan,
            _target: self._target,
        }
    }

    /// Run the plan as a SELECT statement.
    pub fn select(self) -> PlanResult<Vec<T>>
    where
        T: FromRow,
    {
        select_all(self.plan)
    }

    /// Run the plan as a SELECT statement, appending to `out`.
    pub fn select_into(self, out: &mut Vec<T>) -> PlanResult<()>
    where
        T: FromRow,
    {
        select_append(self.plan, out)
    }

    /// Run the plan as a DELETE statement, returning the affected count.
    pub fn delete(self) -> PlanResult<u64> {
        self.plan.delete_exec()
    }

    /// Render the SELECT statement without executing it.
    pub fn build_select(mut self) -> PlanResult<BuiltStatement> {
        self.plan.build_select()
    }

    /// Render the DELETE statement without executing it.
    pub fn build_delete(mut self) -> PlanResult<BuiltStatement> {
        self.plan.build_delete()
    }
}

/// A write-side plan inside a join scope: only UPDATE remains reachable
/// once the scope closes.
pub struct SetJoinPlan<'a, T> {
    pub(crate) plan: QueryPlan<'a>,
    pub(crate) _target: PhantomData<&'a T>,
}

impl<'a, T: Model> SetJoinPlan<'a, T> {
    /// Add another joined table; later ON conditions apply to it.
    pub fn join<U: Model>(mut self, target: &'a U) -> Self {
        self.plan.add_join(target);
        self
    }

    /// Add a filter to the current join's ON clause.
    pub fn on(mut self, filter: Filter) -> Self {
        self.plan.push_on(filter);
        self
    }

    /// Add `field = value` to the current join's ON clause.
    pub fn eq<F, V: ToSql + Send + Sync + 'static>(self, field: &F, value: V) -> Self {
        self.on(Filter::eq(field, value))
    }

    /// Add `field != value` to the current join's ON clause.
    pub fn ne<F, V: ToSql + Send + Sync + 'static>(self, field: &F, value: V) -> Self {
        self.on(Filter::ne(field, value))
    }

    /// Add `field < value` to the current join's ON clause.
    pub fn lt<F, V: ToSql + Send + Sync + 'static>(self, field: &F, value: V) -> Self {
        self.on(Filter::lt(field, value))
    }

    /// Add `field <= value` to the current join's ON clause.
    pub fn lte<F, V: ToSql + Send + Sync + 'static>(self, field: &F, value: V) -> Self {
        self.on(Filter::lte(field, value))
    }

    /// Add `field > value` to the current join's ON clause.
    pub fn gt<F, V: ToSql + Send + Sync + 'static>(self, field: &F, value: V) -> Self {
        self.on(Filter::gt(field, value))
    }

    /// Add `field >= value` to the current join's ON clause.
    pub fn gte<F, V: ToSql + Send + Sync + 'static>(self, field: &F, value: V) -> Self {
        self.on(Filter::gte(field, value))
    }

    /// Add `field IS NULL` to the current join's ON clause.
    pub fn is_null<F>(self, field: &F) -> Self {
        self.on(Filter::is_null(field))
    }

    /// Add `field IS NOT NULL` to the current join's ON clause.
    pub fn is_not_null<F>(self, field: &F) -> Self {
        self.on(Filter::is_not_null(field))
    }

    /// Close the join scope; assignments plus a where clause can only be
    /// an UPDATE.
    pub fn where_clause(self) -> UpdatePlan<'a, T> {
        UpdatePlan {
            plan: self.plan,
            _target: self._target,
        }
    }

    /// Run the plan as an UPDATE statement, returning the affected count.
    pub fn update(self) -> PlanResult<u64> {
        self.plan.update_exec()
    }

    /// Render the UPDATE statement without executing it.
    pub fn build_update(mut self) -> PlanResult<BuiltStatement> {
        self.plan.build_update()
    }
}
