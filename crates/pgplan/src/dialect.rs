//! SQL dialect support.
//!
//! Vendors disagree on identifier quoting, bind-variable syntax, and the
//! spelling of limit/offset clauses. The plan renderers never hardcode any
//! of these; they ask the [`Dialect`] they were constructed with.
//!
//! Implementations must be deterministic and side-effect free: the renderers
//! may call them any number of times, in any order.

/// Trait for SQL dialect-specific behavior.
pub trait Dialect: Sync {
    /// Quote a single identifier, escaping embedded quote characters.
    fn quote_identifier(&self, name: &str) -> String {
        format!("\"{}\"", name.replace('"', "\"\""))
    }

    /// Quote a possibly schema-qualified table reference.
    fn quoted_table(&self, schema: &str, table: &str) -> String {
        if schema.is_empty() {
            self.quote_identifier(table)
        } else {
            format!(
                "{}.{}",
                self.quote_identifier(schema),
                self.quote_identifier(table)
            )
        }
    }

    /// Render the bind variable for the given 1-based ordinal.
    fn placeholder(&self, ordinal: usize) -> String;

    /// Render the limit clause around an already-bound placeholder.
    fn limit_clause(&self, placeholder: &str) -> String {
        format!("LIMIT {placeholder}")
    }

    /// Render the offset clause around an already-bound placeholder.
    fn offset_clause(&self, placeholder: &str) -> String {
        format!("OFFSET {placeholder}")
    }
}

/// PostgreSQL dialect: `"ident"` quoting, `$n` bind variables,
/// `OFFSET n` / `LIMIT n`.
#[derive(Debug, Default, Clone, Copy)]
pub struct PostgresDialect;

impl Dialect for PostgresDialect {
    fn placeholder(&self, ordinal: usize) -> String {
        format!("${ordinal}")
    }
}

/// ANSI-flavored dialect using `?` bind variables and the standard
/// `OFFSET … ROWS` / `FETCH NEXT (…) ROWS ONLY` pagination clauses.
///
/// The ordinal passed to [`Dialect::placeholder`] is ignored; `?` markers
/// are positional by appearance, which the renderers guarantee matches the
/// argument list order.
#[derive(Debug, Default, Clone, Copy)]
pub struct AnsiDialect;

impl Dialect for AnsiDialect {
    fn placeholder(&self, _ordinal: usize) -> String {
        String::from("?")
    }

    fn limit_clause(&self, placeholder: &str) -> String {
        format!("FETCH NEXT ({placeholder}) ROWS ONLY")
    }

    fn offset_clause(&self, placeholder: &str) -> String {
        format!("OFFSET {placeholder} ROWS")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_postgres_placeholders() {
        let dialect = PostgresDialect;
        assert_eq!(dialect.placeholder(1), "$1");
        assert_eq!(dialect.placeholder(12), "$12");
    }

    #[test]
    fn test_quoting_escapes_embedded_quotes() {
        let dialect = PostgresDialect;
        assert_eq!(dialect.quote_identifier("memo"), "\"memo\"");
        assert_eq!(dialect.quote_identifier("we\"ird"), "\"we\"\"ird\"");
    }

    #[test]
    fn test_quoted_table_with_and_without_schema() {
        let dialect = PostgresDialect;
        assert_eq!(dialect.quoted_table("", "invoice"), "\"invoice\"");
        assert_eq!(
            dialect.quoted_table("billing", "invoice"),
            "\"billing\".\"invoice\""
        );
    }

    #[test]
    fn test_ansi_pagination_clauses() {
        let dialect = AnsiDialect;
        assert_eq!(dialect.placeholder(7), "?");
        assert_eq!(dialect.offset_clause("?"), "OFFSET ? ROWS");
        assert_eq!(dialect.limit_clause("?"), "FETCH NEXT (?) ROWS ONLY");
    }
}
