//! The write-side narrowed views: plans that assign values.

use std::marker::PhantomData;

use postgres::types::ToSql;

use crate::binding::FieldRef;
use crate::error::PlanResult;
use crate::filter::Filter;
use crate::meta::Model;
use crate::param::Param;
use crate::plan::core::{BuiltStatement, QueryPlan};
use crate::plan::join::SetJoinPlan;

/// A plan with at least one assignment: INSERT- or UPDATE-capable.
///
/// SELECT and DELETE never assign, so they are unreachable from here, as
/// are ordering, grouping, and pagination.
pub struct SetPlan<'a, T> {
    pub(crate) plan: QueryPlan<'a>,
    pub(crate) _target: PhantomData<&'a T>,
}

impl<'a, T: Model> SetPlan<'a, T> {
    /// Assign another value.
    pub fn set<F, V: ToSql + Send + Sync + 'static>(mut self, field: &F, value: V) -> Self {
        self.plan.push_set(FieldRef::of(field), Param::new(value));
        self
    }

    /// Add a joined table for an UPDATE with a FROM clause.
    pub fn join<U: Model>(mut self, target: &'a U) -> SetJoinPlan<'a, T> {
        self.plan.add_join(target);
        SetJoinPlan {
            plan: self.plan,
            _target: self._target,
        }
    }

    /// Switch to WHERE-clause construction.
    ///
    /// An assignment plus a where clause can only be an UPDATE, so the
    /// returned view no longer offers `insert`.
    pub fn where_clause(self) -> UpdatePlan<'a, T> {
        UpdatePlan {
            plan: self.plan,
            _target: self._target,
        }
    }

    /// Add a filter directly; shorthand for `where_clause().filter(...)`.
    pub fn filter(self, filter: Filter) -> UpdatePlan<'a, T> {
        self.where_clause().filter(filter)
    }

    /// Run the plan as an INSERT statement.
    pub fn insert(self) -> PlanResult<()> {
        self.plan.insert_exec()
    }

    /// Run the plan as an UPDATE statement applying to every row,
    /// returning the affected count.
    pub fn update(self) -> PlanResult<u64> {
        self.plan.update_exec()
    }

    /// Render the INSERT statement without executing it.
    pub fn build_insert(mut self) -> PlanResult<BuiltStatement> {
        self.plan.build_insert()
    }

    /// Render the UPDATE statement without executing it.
    pub fn build_update(mut self) -> PlanResult<BuiltStatement> {
        self.plan.build_update()
    }
}

/// A plan with assignments and a where clause: only UPDATE remains.
pub struct UpdatePlan<'a, T> {
    pub(crate) plan: QueryPlan<'a>,
    pub(crate) _target: PhantomData<&'a T>,
}

impl<'a, T: Model> UpdatePlan<'a, T> {
    /// Add a filter. Successive filters are combined with AND.
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

    /// Run the plan as an UPDATE statement, returning the affected count.
    pub fn update(self) -> PlanResult<u64> {
        self.plan.update_exec()
    }

    /// Render the UPDATE statement without executing it.
    pub fn build_update(mut self) -> PlanResult<BuiltStatement> {
        self.plan.build_update()
    }
}
