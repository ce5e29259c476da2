//! Positional argument storage using Arc for clone-friendly filters.

use std::sync::Arc;

use postgres::types::ToSql;

/// A clone-friendly query argument wrapper.
///
/// Filters are cloned when a plan renders them, so argument values are
/// reference-counted rather than copied.
#[derive(Clone)]
pub struct Param(pub(crate) Arc<dyn ToSql + Send + Sync>);

impl Param {
    /// Wrap any ToSql value.
    pub fn new<T: ToSql + Send + Sync + 'static>(value: T) -> Self {
        Param(Arc::new(value))
    }

    /// Get the inner value as the trait object the driver expects.
    pub fn as_dyn(&self) -> &(dyn ToSql + Sync) {
        &*self.0 as &(dyn ToSql + Sync)
    }
}

impl std::fmt::Debug for Param {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Param").field(&"<dyn ToSql>").finish()
    }
}

/// An ordered argument list.
///
/// Values are appended in the exact order their placeholders appear in the
/// rendered statement and must reach the executor unreordered.
#[derive(Clone, Debug, Default)]
pub struct ParamList {
    params: Vec<Param>,
}

impl ParamList {
    /// Create a new empty argument list.
    pub fn new() -> Self {
        Self { params: Vec::new() }
    }

    /// Append a value and return its 1-based ordinal.
    pub fn push<T: ToSql + Send + Sync + 'static>(&mut self, value: T) -> usize {
        self.params.push(Param::new(value));
        self.params.len()
    }

    /// Append a pre-wrapped Param and return its 1-based ordinal.
    pub fn push_param(&mut self, param: Param) -> usize {
        self.params.push(param);
        self.params.len()
    }

    /// Current argument count.
    pub fn len(&self) -> usize {
        self.params.len()
    }

    /// Check if the list is empty.
    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Append all of another list's arguments, preserving order.
    pub fn extend(&mut self, other: &ParamList) {
        self.params.extend(other.params.iter().cloned());
    }

    /// Borrow all arguments in the call shape the driver expects.
    pub fn as_refs(&self) -> Vec<&(dyn ToSql + Sync)> {
        self.params.iter().map(|p| p.as_dyn()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_returns_one_based_ordinals() {
        let mut params = ParamList::new();
        assert_eq!(params.push(1i64), 1);
        assert_eq!(params.push("two"), 2);
        assert_eq!(params.push_param(Param::new(false)), 3);
        assert_eq!(params.len(), 3);
    }

    #[test]
    fn test_extend_preserves_order() {
        let mut a = ParamList::new();
        a.push(1i64);
        let mut b = ParamList::new();
        b.push(2i64);
        b.push(3i64);
        a.extend(&b);
        assert_eq!(a.len(), 3);
        assert_eq!(a.as_refs().len(), 3);
    }
}
