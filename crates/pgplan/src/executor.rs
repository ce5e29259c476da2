//! Statement execution boundary.
//!
//! The plan machinery renders SQL and hands it off here; connection
//! handling, transactions, timeouts, and retries all live behind this
//! trait. Driver errors pass through unchanged.

use postgres::Row;
use postgres::types::ToSql;

use crate::error::PlanResult;

/// Executes finished statements on behalf of a plan.
///
/// All calls are plain blocking calls on the invoking thread; a plan
/// borrows its executor mutably for the duration of one fluent chain.
pub trait StatementExecutor {
    /// Run a write statement, returning the affected-row count.
    fn execute(&mut self, sql: &str, params: &[&(dyn ToSql + Sync)]) -> PlanResult<u64>;

    /// Run a read statement, returning the raw rows.
    fn query(&mut self, sql: &str, params: &[&(dyn ToSql + Sync)]) -> PlanResult<Vec<Row>>;
}

impl StatementExecutor for postgres::Client {
    fn execute(&mut self, sql: &str, params: &[&(dyn ToSql + Sync)]) -> PlanResult<u64> {
        Ok(postgres::Client::execute(self, sql, params)?)
    }

    fn query(&mut self, sql: &str, params: &[&(dyn ToSql + Sync)]) -> PlanResult<Vec<Row>> {
        Ok(postgres::Client::query(self, sql, params)?)
    }
}

impl StatementExecutor for postgres::Transaction<'_> {
    fn execute(&mut self, sql: &str, params: &[&(dyn ToSql + Sync)]) -> PlanResult<u64> {
        Ok(postgres::Transaction::execute(self, sql, params)?)
    }

    fn query(&mut self, sql: &str, params: &[&(dyn ToSql + Sync)]) -> PlanResult<Vec<Row>> {
        Ok(postgres::Transaction::query(self, sql, params)?)
    }
}
