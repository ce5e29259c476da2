//! Composable filter expressions for WHERE and join ON clauses.
//!
//! A [`Filter`] identifies columns by field reference, so it can only be
//! rendered against the plan whose reference target (or joined targets) the
//! fields belong to. Rendering produces a SQL fragment plus the arguments it
//! bound, with placeholder ordinals threaded from a caller-supplied start
//! index so fragments compose without colliding.

use postgres::types::ToSql;

use crate::binding::{BindingSet, FieldRef};
use crate::dialect::Dialect;
use crate::error::PlanResult;
use crate::param::{Param, ParamList};

/// One node of a filter expression tree.
#[derive(Clone, Debug)]
pub enum Filter {
    /// AND group: all conditions must hold.
    And(Vec<Filter>),

    /// OR group: at least one condition must hold.
    Or(Vec<Filter>),

    /// NOT: negate the inner filter.
    Not(Box<Filter>),

    /// Simple comparison: `table.column OP $n`
    Compare {
        field: FieldRef,
        op: &'static str,
        value: Param,
    },

    /// NULL check: `table.column IS [NOT] NULL`
    NullCheck { field: FieldRef, is_null: bool },
}

impl Filter {
    /// Combine filters with AND.
    pub fn and(filters: Vec<Filter>) -> Self {
        Filter::And(filters)
    }

    /// Combine filters with OR.
    pub fn or(filters: Vec<Filter>) -> Self {
        Filter::Or(filters)
    }

    /// Negate a filter.
    #[allow(clippy::should_implement_trait)]
    pub fn not(filter: Filter) -> Self {
        Filter::Not(Box::new(filter))
    }

    /// `field = value`
    pub fn eq<F, V: ToSql + Send + Sync + 'static>(field: &F, value: V) -> Self {
        Self::compare(field, "=", value)
    }

    /// `field != value`
    pub fn ne<F, V: ToSql + Send + Sync + 'static>(field: &F, value: V) -> Self {
        Self::compare(field, "!=", value)
    }

    /// `field < value`
    pub fn lt<F, V: ToSql + Send + Sync + 'static>(field: &F, value: V) -> Self {
        Self::compare(field, "<", value)
    }

    /// `field <= value`
    pub fn lte<F, V: ToSql + Send + Sync + 'static>(field: &F, value: V) -> Self {
        Self::compare(field, "<=", value)
    }

    /// `field > value`
    pub fn gt<F, V: ToSql + Send + Sync + 'static>(field: &F, value: V) -> Self {
        Self::compare(field, ">", value)
    }

    /// `field >= value`
    pub fn gte<F, V: ToSql + Send + Sync + 'static>(field: &F, value: V) -> Self {
        Self::compare(field, ">=", value)
    }

    /// `field IS NULL`
    pub fn is_null<F>(field: &F) -> Self {
        Filter::NullCheck {
            field: FieldRef::of(field),
            is_null: true,
        }
    }

    /// `field IS NOT NULL`
    pub fn is_not_null<F>(field: &F) -> Self {
        Filter::NullCheck {
            field: FieldRef::of(field),
            is_null: false,
        }
    }

    fn compare<F, V: ToSql + Send + Sync + 'static>(
        field: &F,
        op: &'static str,
        value: V,
    ) -> Self {
        Filter::Compare {
            field: FieldRef::of(field),
            op,
            value: Param::new(value),
        }
    }

    /// Render this filter to a SQL fragment and the arguments it binds.
    ///
    /// `start_index` is the number of arguments already bound by earlier
    /// parts of the statement; the first placeholder this node emits gets
    /// ordinal `start_index + 1`. The returned list holds exactly the
    /// arguments consumed by this node's placeholders, in placeholder
    /// order, so callers advance their running index by its length.
    pub(crate) fn render(
        &self,
        bindings: &BindingSet,
        dialect: &dyn Dialect,
        start_index: usize,
    ) -> PlanResult<(String, ParamList)> {
        match self {
            Filter::And(children) => {
                Self::render_group(children, " AND ", bindings, dialect, start_index)
            }
            Filter::Or(children) => {
                Self::render_group(children, " OR ", bindings, dialect, start_index)
            }
            Filter::Not(inner) => {
                let (fragment, params) = inner.render(bindings, dialect, start_index)?;
                if fragment.is_empty() {
                    return Ok((fragment, params));
                }
                Ok((format!("NOT ({fragment})"), params))
            }
            Filter::Compare { field, op, value } => {
                let column = bindings.table_column(*field)?;
                let mut params = ParamList::new();
                let ordinal = start_index + params.push_param(value.clone());
                let placeholder = dialect.placeholder(ordinal);
                Ok((format!("{column} {op} {placeholder}"), params))
            }
            Filter::NullCheck { field, is_null } => {
                let column = bindings.table_column(*field)?;
                let check = if *is_null { "IS NULL" } else { "IS NOT NULL" };
                Ok((format!("{column} {check}"), ParamList::new()))
            }
        }
    }

    /// Join a group's children with `separator`.
    ///
    /// The group is parenthesized only when more than one child rendered,
    /// so single-child groups don't nest needlessly.
    fn render_group(
        children: &[Filter],
        separator: &str,
        bindings: &BindingSet,
        dialect: &dyn Dialect,
        start_index: usize,
    ) -> PlanResult<(String, ParamList)> {
        let mut params = ParamList::new();
        let mut fragments = Vec::with_capacity(children.len());
        for child in children {
            let (fragment, child_params) =
                child.render(bindings, dialect, start_index + params.len())?;
            if fragment.is_empty() {
                continue;
            }
            params.extend(&child_params);
            fragments.push(fragment);
        }
        let sql = match fragments.len() {
            0 => String::new(),
            1 => fragments.pop().expect("len == 1"),
            _ => format!("({})", fragments.join(separator)),
        };
        Ok((sql, params))
    }
}
