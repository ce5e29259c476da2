//! The unrestricted entry view and the read-side narrowed views.

use std::marker::PhantomData;

use postgres::types::ToSql;

use crate::binding::FieldRef;
use crate::error::PlanResult;
use crate::filter::Filter;
use crate::meta::Model;
use crate::param::Param;
use crate::plan::core::{BuiltStatement, QueryPlan};
use crate::plan::join::JoinPlan;
use crate::plan::set::SetPlan;
use crate::row::FromRow;

/// A freshly created plan: nothing has been ruled out yet.
///
/// Every method narrows the plan. Setting a value rules out SELECT and
/// DELETE; opening a WHERE clause rules out INSERT; ordering, grouping, or
/// pagination rules out everything but SELECT. The compiler enforces the
/// narrowing, so an illegal combination like `set(...).where_clause(...)
/// .insert()` fails to build rather than at run time.
pub struct Plan<'a, T> {
    pub(crate) plan: QueryPlan<'a>,
    pub(crate) _target: PhantomData<&'a T>,
}

impl<'a, T: Model> Plan<'a, T> {
    /// Assign a value to a field's column, for INSERT or UPDATE.
    pub fn set<F, V: ToSql + Send + Sync + 'static>(
        mut self,
        field: &F,
        value: V,
    ) -> SetPlan<'a, T> {
        self.plan
            .push_set(FieldRef::of(field), Param::new(value));
        SetPlan {
            plan: self.plan,
            _target: self._target,
        }
    }

    /// Add a joined table. Comparison calls on the returned view populate
    /// the join's ON clause rather than the WHERE clause.
    pub fn join<U: Model>(mut self, target: &'a U) -> JoinPlan<'a, T> {
        self.plan.add_join(target);
        JoinPlan {
            plan: self.plan,
            _target: self._target,
        }
    }

    /// Switch to WHERE-clause construction.
    ///
    /// Only SELECT and DELETE statements can have a where clause without
    /// any assignment, so those are the terminals still reachable.
    pub fn where_clause(self) -> WherePlan<'a, T> {
        WherePlan {
            plan: self.plan,
            _target: self._target,
        }
    }

    /// Add a filter directly; shorthand for `where_clause().filter(...)`.
    pub fn filter(self, filter: Filter) -> WherePlan<'a, T> {
        self.where_clause().filter(filter)
    }

    /// Add an ORDER BY entry. The direction may be `""` (column default),
    /// `"asc"`, or `"desc"`, case-insensitively.
    pub fn order_by<F>(mut self, field: &F, direction: &str) -> SelectPlan<'a, T> {
        self.plan
            .push_order(FieldRef::of(field), direction);
        SelectPlan {
            plan: self.plan,
            _target: self._target,
        }
    }

    /// Add a GROUP BY entry.
    pub fn group_by<F>(mut self, field: &F) -> SelectPlan<'a, T> {
        self.plan.push_group(FieldRef::of(field));
        SelectPlan {
            plan: self.plan,
            _target: self._target,
        }
    }

    /// Set the limit clause.
    pub fn limit(mut self, limit: i64) -> SelectPlan<'a, T> {
        self.plan.set_limit(limit);
        SelectPlan {
            plan: self.plan,
            _target: self._target,
        }
    }

    /// Set the offset clause.
    pub fn offset(mut self, offset: i64) -> SelectPlan<'a, T> {
        self.plan.set_offset(offset);
        SelectPlan {
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

    /// Run the plan as a SELECT statement, appending to a caller-owned
    /// vector instead of allocating one.
    pub fn select_into(self, out: &mut Vec<T>) -> PlanResult<()>
    where
        T: FromRow,
    {
        select_append(self.plan, out)
    }

    /// Run the plan as a DELETE statement, returning the affected count.
    ///
    /// With no filter this deletes every row; callers should check the
    /// returned count against what they expected to remove.
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

/// A plan that filters but assigns nothing: still SELECT- or
/// DELETE-capable. INSERT is unreachable from here.
pub struct WherePlan<'a, T> {
    pub(crate) plan: QueryPlan<'a>,
    pub(crate) _target: PhantomData<&'a T>,
}

impl<'a, T: Model> WherePlan<'a, T> {
    /// Add a filter. Successive filters are combined with AND; use
    /// [`Filter::or`] / [`Filter::not`] for anything more complex.
    pub fn filter(mut self, filter: Filter) -> Self {
        self.plan.push_where(filter);
        self
    }

    /// Add several filters at once, combined with AND.
    pub fn filter_all(mut self, filters: impl IntoIterator<Item = Filter>) -> Self {
        for filter in filters {
            self.plan.push_where(filter);
        }
        self
    }

    /// Add `field = value` to the where clause.
    pub fn eq<F, V: ToSql + Send + Sync + 'static>(self, field: &F, value: V) -> Self {
        self.filter(Filter::eq(field, value))
    }

    /// Add `field != value` to the where clause.
    pub fn ne<F, V: ToSql + Send + Sync + 'static>(self, field: &F, value: V) -> Self {
        self.filter(Filter::ne(field, value))
    }

    /// Add `field < value` to the where clause.
    pub fn lt<F, V: ToSql + Send + Sync + 'static>(self, field: &F, value: V) -> Self {
        self.filter(Filter::lt(field, value))
    }

    /// Add `field <= value` to the where clause.
    pub fn lte<F, V: ToSql + Send + Sync + 'static>(self, field: &F, value: V) -> Self {
        self.filter(Filter::lte(field, value))
    }

    /// Add `field > value` to the where clause.
    pub fn gt<F, V: ToSql + Send + Sync + 'static>(self, field: &F, value: V) -> Self {
        self.filter(Filter::gt(field, value))
    }

    /// Add `field >= value` to the where clause.
    pub fn gte<F, V: ToSql + Send + Sync + 'static>(self, field: &F, value: V) -> Self {
        self.filter(Filter::gte(field, value))
    }

    /// Add `field IS NULL` to the where clause.
    pub fn is_null<F>(self, field: &F) -> Self {
        self.filter(Filter::is_null(field))
    }

    /// Add `field IS NOT NULL` to the where clause.
    pub fn is_not_null<F>(self, field: &F) -> Self {
        self.filter(Filter::is_not_null(field))
    }

    /// Add an ORDER BY entry; see [`Plan::order_by`].
    pub fn order_by<F>(mut self, field: &F, direction: &str) -> SelectPlan<'a, T> {
        self.plan
            .push_order(FieldRef::of(field), direction);
        SelectPlan {
            plan: self.plan,
            _target: self._target,
        }
    }

    /// Add a GROUP BY entry.
    pub fn group_by<F>(mut self, field: &F) -> SelectPlan<'a, T> {
        self.plan.push_group(FieldRef::of(field));
        SelectPlan {
            plan: self.plan,
            _target: self._target,
        }
    }

    /// Set the limit clause.
    pub fn limit(mut self, limit: i64) -> SelectPlan<'a, T> {
        self.plan.set_limit(limit);
        SelectPlan {
            plan: self.plan,
            _target: self._target,
        }
    }

    /// Set the offset clause.
    pub fn offset(mut self, offset: i64) -> SelectPlan<'a, T> {
        self.plan.set_offset(offset);
        SelectPlan {
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

/// A plan carrying ordering, grouping, or pagination: only SELECT remains.
pub struct SelectPlan<'a, T> {
    pub(crate) plan: QueryPlan<'a>,
    pub(crate) _target: PhantomData<&'a T>,
}

impl<'a, T: Model> SelectPlan<'a, T> {
    /// Add an ORDER BY entry; see [`Plan::order_by`].
    pub fn order_by<F>(mut self, field: &F, direction: &str) -> Self {
        self.plan
            .push_order(FieldRef::of(field), direction);
        self
    }

    /// Add a GROUP BY entry.
    pub fn group_by<F>(mut self, field: &F) -> Self {
        self.plan.push_group(FieldRef::of(field));
        self
    }

    /// Set the limit clause.
    pub fn limit(mut self, limit: i64) -> Self {
        self.plan.set_limit(limit);
        self
    }

    /// Set the offset clause.
    pub fn offset(mut self, offset: i64) -> Self {
        self.plan.set_offset(offset);
        self
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

    /// Render the SELECT statement without executing it.
    pub fn build_select(mut self) -> PlanResult<BuiltStatement> {
        self.plan.build_select()
    }
}

pub(crate) fn select_all<T: FromRow>(plan: QueryPlan<'_>) -> PlanResult<Vec<T>> {
    let rows = plan.select_rows()?;
    rows.iter().map(T::from_row).collect()
}

pub(crate) fn select_append<T: FromRow>(plan: QueryPlan<'_>, out: &mut Vec<T>) -> PlanResult<()> {
    let rows = plan.select_rows()?;
    out.reserve(rows.len());
    for row in &rows {
        out.push(T::from_row(row)?);
    }
    Ok(())
}
