//! The shared query-plan accumulator and statement renderers.
//!
//! Every public view type in this module's siblings wraps one [`QueryPlan`].
//! The views decide *which* mutations are reachable; the plan records them
//! and, at a terminal call, renders the accumulated state into one
//! statement and hands it to the executor.
//!
//! Errors raised while building are stored, not returned: the first error
//! freezes the plan (later calls become no-ops) and is surfaced by the
//! terminal call, which then renders and executes nothing.

use std::mem;

use crate::binding::{BindingSet, FieldRef};
use crate::dialect::Dialect;
use crate::error::{PlanError, PlanResult};
use crate::executor::StatementExecutor;
use crate::filter::Filter;
use crate::meta::Model;
use crate::param::{Param, ParamList};

/// A finished statement: SQL text plus its ordered argument list.
///
/// Returned by the `build_*` methods on the view types so callers and tests
/// can inspect what would be executed.
#[derive(Clone, Debug)]
pub struct BuiltStatement {
    pub sql: String,
    pub params: ParamList,
}

impl BuiltStatement {
    /// Borrow the arguments in the call shape the driver expects.
    pub fn params_ref(&self) -> Vec<&(dyn postgres::types::ToSql + Sync)> {
        self.params.as_refs()
    }
}

/// Ordering direction for one ORDER BY entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Direction {
    Default,
    Asc,
    Desc,
}

impl Direction {
    /// Accepts `""`, `"asc"`, `"desc"` case-insensitively.
    fn parse(direction: &str) -> Option<Self> {
        if direction.is_empty() {
            Some(Self::Default)
        } else if direction.eq_ignore_ascii_case("asc") {
            Some(Self::Asc)
        } else if direction.eq_ignore_ascii_case("desc") {
            Some(Self::Desc)
        } else {
            None
        }
    }
}

/// One joined table and its ON conditions.
pub(crate) struct JoinClause {
    pub(crate) quoted_table: String,
    pub(crate) on: Vec<Filter>,
}

/// The mutable accumulator behind one fluent chain.
///
/// Lives for exactly one chain: created fresh per logical query, consumed
/// by its terminal call.
pub(crate) struct QueryPlan<'a> {
    dialect: &'a dyn Dialect,
    executor: &'a mut dyn StatementExecutor,
    quoted_table: String,
    /// Pre-quoted `table.column` list of the base table's non-transient
    /// columns, in metadata order.
    select_columns: Vec<String>,
    bindings: BindingSet,
    set_columns: Vec<String>,
    set_placeholders: Vec<String>,
    /// Root-level WHERE filters, combined with an implicit AND.
    wheres: Vec<Filter>,
    joins: Vec<JoinClause>,
    order_by: Vec<(String, Direction)>,
    group_by: Vec<String>,
    limit: Option<i64>,
    offset: Option<i64>,
    /// Arguments bound so far, in placeholder order.
    args: ParamList,
    /// First error raised anywhere in the chain; freezes the plan.
    error: Option<PlanError>,
}

impl<'a> QueryPlan<'a> {
    pub(crate) fn new<T: Model>(
        target: &T,
        executor: &'a mut dyn StatementExecutor,
        dialect: &'a dyn Dialect,
    ) -> Self {
        let quoted_table = dialect.quoted_table(T::schema_name(), T::table_name());
        let select_columns = T::columns()
            .iter()
            .filter(|column| !column.transient)
            .map(|column| format!("{}.{}", quoted_table, dialect.quote_identifier(column.column)))
            .collect();
        let mut bindings = BindingSet::new();
        let error = bindings.map_target(target, dialect).err();
        Self {
            dialect,
            executor,
            quoted_table,
            select_columns,
            bindings,
            set_columns: Vec::new(),
            set_placeholders: Vec::new(),
            wheres: Vec::new(),
            joins: Vec::new(),
            order_by: Vec::new(),
            group_by: Vec::new(),
            limit: None,
            offset: None,
            args: ParamList::new(),
            error,
        }
    }

    /// Record an error unless one is already stored.
    fn fail(&mut self, error: PlanError) {
        if self.error.is_none() {
            self.error = Some(error);
        }
    }

    // ==================== Builder-time mutations ====================

    pub(crate) fn push_set(&mut self, field: FieldRef, value: Param) {
        if self.error.is_some() {
            return;
        }
        match self.bindings.column(field).map(str::to_string) {
            Ok(column) => {
                let ordinal = self.args.push_param(value);
                self.set_columns.push(column);
                self.set_placeholders.push(self.dialect.placeholder(ordinal));
            }
            Err(error) => self.fail(error),
        }
    }

    pub(crate) fn push_where(&mut self, filter: Filter) {
        if self.error.is_some() {
            return;
        }
        self.wheres.push(filter);
    }

    /// Add a filter to the newest join's ON list.
    pub(crate) fn push_on(&mut self, filter: Filter) {
        if self.error.is_some() {
            return;
        }
        if let Some(join) = self.joins.last_mut() {
            join.on.push(filter);
        }
    }

    /// Map a joined table's fields into the binding set and open a new
    /// join clause for its ON conditions.
    pub(crate) fn add_join<U: Model>(&mut self, target: &U) {
        if self.error.is_some() {
            return;
        }
        if let Err(error) = self.bindings.map_target(target, self.dialect) {
            self.fail(error);
            return;
        }
        let quoted_table = self
            .dialect
            .quoted_table(U::schema_name(), U::table_name());
        self.joins.push(JoinClause {
            quoted_table,
            on: Vec::new(),
        });
    }

    pub(crate) fn push_order(&mut self, field: FieldRef, direction: &str) {
        if self.error.is_some() {
            return;
        }
        let column = match self.bindings.table_column(field) {
            Ok(column) => column,
            Err(error) => {
                self.fail(error);
                return;
            }
        };
        let Some(direction) = Direction::parse(direction) else {
            self.fail(PlanError::InvalidOrderDirection(direction.to_string()));
            return;
        };
        self.order_by.push((column, direction));
    }

    pub(crate) fn push_group(&mut self, field: FieldRef) {
        if self.error.is_some() {
            return;
        }
        match self.bindings.table_column(field) {
            Ok(column) => self.group_by.push(column),
            Err(error) => self.fail(error),
        }
    }

    pub(crate) fn set_limit(&mut self, limit: i64) {
        self.limit = Some(limit);
    }

    pub(crate) fn set_offset(&mut self, offset: i64) {
        self.offset = Some(offset);
    }

    // ==================== Rendering ====================

    /// Surface the first recorded error, if any. Every renderer calls this
    /// before touching the accumulated state.
    fn check_error(&mut self) -> PlanResult<()> {
        match self.error.take() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    /// Render the root WHERE filters, appending their arguments.
    ///
    /// Returns the bare fragment; empty when no filters were recorded.
    fn render_wheres(&mut self) -> PlanResult<String> {
        let wheres = mem::take(&mut self.wheres);
        if wheres.is_empty() {
            return Ok(String::new());
        }
        let root = Filter::And(wheres);
        let (fragment, params) = root.render(&self.bindings, self.dialect, self.args.len())?;
        self.args.extend(&params);
        Ok(fragment)
    }

    /// Render WHERE fragments for UPDATE/DELETE: the base filter first,
    /// then each join's ON conditions, in text order so argument order
    /// matches placeholder order.
    fn render_where_parts(&mut self, joins: &[JoinClause]) -> PlanResult<Vec<String>> {
        let mut parts = Vec::new();
        let base = self.render_wheres()?;
        if !base.is_empty() {
            parts.push(base);
        }
        for join in joins {
            let on = Filter::And(join.on.clone());
            let (fragment, params) = on.render(&self.bindings, self.dialect, self.args.len())?;
            if fragment.is_empty() {
                continue;
            }
            self.args.extend(&params);
            parts.push(fragment);
        }
        Ok(parts)
    }

    pub(crate) fn build_select(&mut self) -> PlanResult<BuiltStatement> {
        self.check_error()?;
        let mut sql = format!(
            "SELECT {} FROM {}",
            self.select_columns.join(", "),
            self.quoted_table
        );

        let joins = mem::take(&mut self.joins);
        for join in &joins {
            let on = Filter::And(join.on.clone());
            let (fragment, params) = on.render(&self.bindings, self.dialect, self.args.len())?;
            self.args.extend(&params);
            sql.push_str(" INNER JOIN ");
            sql.push_str(&join.quoted_table);
            sql.push_str(" ON ");
            sql.push_str(if fragment.is_empty() {
                "1=1"
            } else {
                fragment.as_str()
            });
        }

        let where_fragment = self.render_wheres()?;
        if !where_fragment.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&where_fragment);
        }

        if !self.group_by.is_empty() {
            sql.push_str(" GROUP BY ");
            sql.push_str(&self.group_by.join(", "));
        }

        if !self.order_by.is_empty() {
            let entries: Vec<String> = self
                .order_by
                .iter()
                .map(|(column, direction)| match direction {
                    Direction::Default => column.clone(),
                    Direction::Asc => format!("{column} ASC"),
                    Direction::Desc => format!("{column} DESC"),
                })
                .collect();
            sql.push_str(" ORDER BY ");
            sql.push_str(&entries.join(", "));
        }

        if let Some(offset) = self.offset {
            let placeholder = self.dialect.placeholder(self.args.push(offset));
            sql.push(' ');
            sql.push_str(&self.dialect.offset_clause(&placeholder));
        }
        if let Some(limit) = self.limit {
            let placeholder = self.dialect.placeholder(self.args.push(limit));
            sql.push(' ');
            sql.push_str(&self.dialect.limit_clause(&placeholder));
        }

        Ok(BuiltStatement {
            sql,
            params: self.args.clone(),
        })
    }

    pub(crate) fn build_insert(&mut self) -> PlanResult<BuiltStatement> {
        self.check_error()?;
        let sql = format!(
            "INSERT INTO {} ({}) VALUES ({})",
            self.quoted_table,
            self.set_columns.join(", "),
            self.set_placeholders.join(", ")
        );
        Ok(BuiltStatement {
            sql,
            params: self.args.clone(),
        })
    }

    pub(crate) fn build_update(&mut self) -> PlanResult<BuiltStatement> {
        self.check_error()?;
        let assignments: Vec<String> = self
            .set_columns
            .iter()
            .zip(&self.set_placeholders)
            .map(|(column, placeholder)| format!("{column} = {placeholder}"))
            .collect();
        let mut sql = format!(
            "UPDATE {} SET {}",
            self.quoted_table,
            assignments.join(", ")
        );

        let joins = mem::take(&mut self.joins);
        if !joins.is_empty() {
            let tables: Vec<&str> = joins.iter().map(|j| j.quoted_table.as_str()).collect();
            sql.push_str(" FROM ");
            sql.push_str(&tables.join(", "));
        }

        let where_parts = self.render_where_parts(&joins)?;
        if !where_parts.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&where_parts.join(" AND "));
        }

        Ok(BuiltStatement {
            sql,
            params: self.args.clone(),
        })
    }

    pub(crate) fn build_delete(&mut self) -> PlanResult<BuiltStatement> {
        self.check_error()?;
        let mut sql = format!("DELETE FROM {}", self.quoted_table);

        let joins = mem::take(&mut self.joins);
        if !joins.is_empty() {
            let tables: Vec<&str> = joins.iter().map(|j| j.quoted_table.as_str()).collect();
            sql.push_str(" USING ");
            sql.push_str(&tables.join(", "));
        }

        let where_parts = self.render_where_parts(&joins)?;
        if !where_parts.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&where_parts.join(" AND "));
        }

        Ok(BuiltStatement {
            sql,
            params: self.args.clone(),
        })
    }

    // ==================== Execution ====================

    pub(crate) fn select_rows(mut self) -> PlanResult<Vec<postgres::Row>> {
        let statement = self.build_select()?;
        #[cfg(feature = "tracing")]
        tracing::debug!(sql = %statement.sql, args = statement.params.len(), "executing SELECT plan");
        self.executor
            .query(&statement.sql, &statement.params.as_refs())
    }

    pub(crate) fn insert_exec(mut self) -> PlanResult<()> {
        let statement = self.build_insert()?;
        #[cfg(feature = "tracing")]
        tracing::debug!(sql = %statement.sql, args = statement.params.len(), "executing INSERT plan");
        self.executor
            .execute(&statement.sql, &statement.params.as_refs())?;
        Ok(())
    }

    pub(crate) fn update_exec(mut self) -> PlanResult<u64> {
        let statement = self.build_update()?;
        #[cfg(feature = "tracing")]
        tracing::debug!(sql = %statement.sql, args = statement.params.len(), "executing UPDATE plan");
        self.executor
            .execute(&statement.sql, &statement.params.as_refs())
    }

    pub(crate) fn delete_exec(mut self) -> PlanResult<u64> {
        let statement = self.build_delete()?;
        #[cfg(feature = "tracing")]
        tracing::debug!(sql = %statement.sql, args = statement.params.len(), "executing DELETE plan");
        self.executor
            .execute(&statement.sql, &statement.params.as_refs())
    }
}
