//! Field-address to column resolution.
//!
//! A plan identifies columns by the address of a field on its reference
//! target, never by name. The [`BindingSet`] is built eagerly when the plan
//! is created (and extended once per joined table) and every later lookup is
//! a plain address-identity scan.
//!
//! Address identity is sound here because the plan borrows its reference
//! target for its whole lifetime, so the target cannot move or drop while
//! any lookup can still happen. Two distinct fields never share an address,
//! and equal values in different fields never compare equal.

use crate::dialect::Dialect;
use crate::error::{PlanError, PlanResult};
use crate::meta::{ColumnMeta, FieldAddr, Model};

/// A type-erased reference to a field on some reference target.
///
/// Created from a plain borrow; carries only the field's address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldRef(usize);

impl FieldRef {
    /// Erase a field borrow down to its address.
    pub fn of<F>(field: &F) -> Self {
        Self(field as *const F as usize)
    }

    pub(crate) fn addr(self) -> usize {
        self.0
    }
}

/// One resolved field-to-column binding.
pub(crate) struct FieldBinding {
    /// Address of the field within the reference target.
    pub(crate) addr: usize,
    /// The column this field maps to.
    pub(crate) column: &'static ColumnMeta,
    /// Pre-quoted table fragment for this column's table.
    pub(crate) quoted_table: String,
    /// Pre-quoted column fragment.
    pub(crate) quoted_column: String,
}

/// All bindings known to one plan.
///
/// Holds the base target's fields plus, after joins, the fields of every
/// joined target, in one flat namespace keyed by address.
#[derive(Default)]
pub(crate) struct BindingSet {
    bindings: Vec<FieldBinding>,
}

impl BindingSet {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Map every field of `target` into this set.
    ///
    /// Embedded sub-structs are flattened by the target's own
    /// [`crate::meta::FieldSet`] implementation; their field names must
    /// appear in the outer table's column metadata.
    pub(crate) fn map_target<T: Model>(
        &mut self,
        target: &T,
        dialect: &dyn Dialect,
    ) -> PlanResult<()> {
        let quoted_table = dialect.quoted_table(T::schema_name(), T::table_name());
        let mut fields = Vec::with_capacity(T::columns().len());
        target.collect_fields(&mut fields);
        for FieldAddr { field, addr } in fields {
            let Some(column) = T::columns().iter().find(|c| c.field == field) else {
                return Err(PlanError::UnmappedField {
                    table: T::table_name(),
                    field,
                });
            };
            self.bindings.push(FieldBinding {
                addr,
                column,
                quoted_table: quoted_table.clone(),
                quoted_column: dialect.quote_identifier(column.column),
            });
        }
        Ok(())
    }

    /// Resolve a field reference to its binding.
    ///
    /// Transient columns are recorded in the set but fail resolution.
    pub(crate) fn binding(&self, field: FieldRef) -> PlanResult<&FieldBinding> {
        let found = self
            .bindings
            .iter()
            .find(|b| b.addr == field.addr())
            .ok_or(PlanError::FieldNotFound)?;
        if found.column.transient {
            return Err(PlanError::TransientColumn(found.column.column));
        }
        Ok(found)
    }

    /// Pre-quoted bare column name, for assignment and insert column lists.
    pub(crate) fn column(&self, field: FieldRef) -> PlanResult<&str> {
        Ok(&self.binding(field)?.quoted_column)
    }

    /// Pre-quoted `table.column`, for filters, ordering, and grouping.
    pub(crate) fn table_column(&self, field: FieldRef) -> PlanResult<String> {
        let binding = self.binding(field)?;
        Ok(format!("{}.{}", binding.quoted_table, binding.quoted_column))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialect::PostgresDialect;
    use crate::meta::{FieldSet, TableMeta};

    struct Account {
        name: String,
        balance: i64,
        // computed at load time, not stored
        rank: i64,
    }

    impl TableMeta for Account {
        fn table_name() -> &'static str {
            "account"
        }

        fn columns() -> &'static [ColumnMeta] {
            const COLUMNS: &[ColumnMeta] = &[
                ColumnMeta::new("name", "name"),
                ColumnMeta::new("balance", "balance"),
                ColumnMeta::transient("rank", "rank"),
            ];
            COLUMNS
        }
    }

    impl FieldSet for Account {
        fn collect_fields(&self, out: &mut Vec<FieldAddr>) {
            out.push(FieldAddr::new("name", &self.name));
            out.push(FieldAddr::new("balance", &self.balance));
            out.push(FieldAddr::new("rank", &self.rank));
        }
    }

    fn account() -> Account {
        Account {
            name: String::new(),
            balance: 0,
            rank: 0,
        }
    }

    fn bindings_for(target: &Account) -> BindingSet {
        let mut set = BindingSet::new();
        set.map_target(target, &PostgresDialect).unwrap();
        set
    }

    #[test]
    fn test_resolution_by_address_identity() {
        let acct = account();
        let set = bindings_for(&acct);
        assert_eq!(set.column(FieldRef::of(&acct.name)).unwrap(), "\"name\"");
        assert_eq!(
            set.table_column(FieldRef::of(&acct.balance)).unwrap(),
            "\"account\".\"balance\""
        );
    }

    #[test]
    fn test_resolution_is_stable_across_repeated_lookups() {
        let acct = account();
        let set = bindings_for(&acct);
        let first = set.table_column(FieldRef::of(&acct.name)).unwrap();
        let second = set.table_column(FieldRef::of(&acct.name)).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_distinct_fields_resolve_to_distinct_columns() {
        let acct = account();
        let set = bindings_for(&acct);
        let name = set.table_column(FieldRef::of(&acct.name)).unwrap();
        let balance = set.table_column(FieldRef::of(&acct.balance)).unwrap();
        assert_ne!(name, balance);
    }

    #[test]
    fn test_unrelated_address_fails() {
        let acct = account();
        let other = account();
        let set = bindings_for(&acct);
        // equal values, different instance: must not match
        let err = set.column(FieldRef::of(&other.name)).unwrap_err();
        assert!(err.is_field_not_found());
    }

    #[test]
    fn test_transient_column_fails_resolution() {
        let acct = account();
        let set = bindings_for(&acct);
        let err = set.column(FieldRef::of(&acct.rank)).unwrap_err();
        assert!(err.is_transient_column());
    }

    #[test]
    fn test_unmapped_field_is_reported() {
        struct Bogus {
            mystery: i64,
        }

        impl TableMeta for Bogus {
            fn table_name() -> &'static str {
                "bogus"
            }

            fn columns() -> &'static [ColumnMeta] {
                &[]
            }
        }

        impl FieldSet for Bogus {
            fn collect_fields(&self, out: &mut Vec<FieldAddr>) {
                out.push(FieldAddr::new("mystery", &self.mystery));
            }
        }

        let bogus = Bogus { mystery: 0 };
        let mut set = BindingSet::new();
        let err = set.map_target(&bogus, &PostgresDialect).unwrap_err();
        assert!(matches!(
            err,
            PlanError::UnmappedField {
                table: "bogus",
                field: "mystery",
            }
        ));
    }
}
