//! Live-database round trip for the plan builder.
//!
//! Needs a reachable PostgreSQL instance. Set DATABASE_URL in .env or the
//! environment; the test skips quietly when it is missing.

use pgplan::prelude::*;
use postgres::{Client, NoTls, Row};

/// Creation/modification stamps, embedded and flattened into the invoice.
#[derive(Debug, Default)]
struct Stamp {
    created: i64,
    updated: i64,
}

impl FieldSet for Stamp {
    fn collect_fields(&self, out: &mut Vec<FieldAddr>) {
        out.push(FieldAddr::new("created", &self.created));
        out.push(FieldAddr::new("updated", &self.updated));
    }
}

#[derive(Debug, Default)]
struct Invoice {
    id: String,
    stamp: Stamp,
    memo: String,
    person_id: i64,
    is_paid: bool,
}

impl TableMeta for Invoice {
    fn table_name() -> &'static str {
        "plan_invoice"
    }

    fn columns() -> &'static [ColumnMeta] {
        const COLUMNS: &[ColumnMeta] = &[
            ColumnMeta::new("id", "id"),
            ColumnMeta::new("created", "created"),
            ColumnMeta::new("updated", "updated"),
            ColumnMeta::new("memo", "memo"),
            ColumnMeta::new("person_id", "person_id"),
            ColumnMeta::new("is_paid", "is_paid"),
        ];
        COLUMNS
    }
}

impl FieldSet for Invoice {
    fn collect_fields(&self, out: &mut Vec<FieldAddr>) {
        out.push(FieldAddr::new("id", &self.id));
        self.stamp.collect_fields(out);
        out.push(FieldAddr::new("memo", &self.memo));
        out.push(FieldAddr::new("person_id", &self.person_id));
        out.push(FieldAddr::new("is_paid", &self.is_paid));
    }
}

impl FromRow for Invoice {
    fn from_row(row: &Row) -> PlanResult<Self> {
        Ok(Self {
            id: row.try_get("id")?,
            stamp: Stamp {
                created: row.try_get("created")?,
                updated: row.try_get("updated")?,
            },
            memo: row.try_get("memo")?,
            person_id: row.try_get("person_id")?,
            is_paid: row.try_get("is_paid")?,
        })
    }
}

fn insert_invoice(
    client: &mut Client,
    id: &str,
    created: i64,
    updated: i64,
    memo: &str,
    person_id: i64,
) -> PlanResult<()> {
    let inv = Invoice::default();
    pgplan::query(&inv, client)
        .set(&inv.id, id.to_string())
        .set(&inv.stamp.created, created)
        .set(&inv.stamp.updated, updated)
        .set(&inv.memo, memo.to_string())
        .set(&inv.person_id, person_id)
        .set(&inv.is_paid, false)
        .insert()
}

#[test]
fn invoice_round_trip() {
    dotenvy::dotenv().ok();
    let url = match std::env::var("DATABASE_URL") {
        Ok(url) => url,
        Err(_) => {
            eprintln!("DATABASE_URL is not set; skipping invoice_round_trip");
            return;
        }
    };
    let mut client = Client::connect(&url, NoTls).expect("failed to connect");
    client
        .batch_execute(
            "DROP TABLE IF EXISTS plan_invoice;
             CREATE TABLE plan_invoice (
                 id TEXT PRIMARY KEY,
                 created BIGINT NOT NULL,
                 updated BIGINT NOT NULL,
                 memo TEXT NOT NULL,
                 person_id BIGINT NOT NULL,
                 is_paid BOOLEAN NOT NULL
             )",
        )
        .expect("failed to create table");

    insert_invoice(&mut client, "1", 1, 1, "test_memo", 1).expect("insert 1");
    insert_invoice(&mut client, "2", 2, 2, "another_test_memo", 2).expect("insert 2");
    insert_invoice(&mut client, "3", 1, 3, "test_memo", 1).expect("insert 3");
    insert_invoice(&mut client, "4", 2, 1, "another_test_memo", 1).expect("insert 4");

    let inv = Invoice::default();

    // nothing is paid yet
    let paid = pgplan::query(&inv, &mut client)
        .where_clause()
        .eq(&inv.is_paid, true)
        .select()
        .expect("select paid");
    assert!(paid.is_empty());

    // filtering on a text column
    let memos = pgplan::query(&inv, &mut client)
        .where_clause()
        .eq(&inv.memo, "test_memo")
        .order_by(&inv.id, "asc")
        .select()
        .expect("select by memo");
    assert_eq!(memos.len(), 2);
    assert_eq!(memos[0].id, "1");
    assert_eq!(memos[1].id, "3");

    // filtering through the embedded stamp
    let recent = pgplan::query(&inv, &mut client)
        .where_clause()
        .gt(&inv.stamp.updated, 1i64)
        .select()
        .expect("select updated > 1");
    assert_eq!(recent.len(), 2);

    // mark invoice 4 paid
    let changed = pgplan::query(&inv, &mut client)
        .set(&inv.is_paid, true)
        .where_clause()
        .eq(&inv.id, "4")
        .update()
        .expect("update");
    assert_eq!(changed, 1);

    let paid = pgplan::query(&inv, &mut client)
        .where_clause()
        .eq(&inv.is_paid, true)
        .select()
        .expect("select paid after update");
    assert_eq!(paid.len(), 1);
    assert_eq!(paid[0].id, "4");

    let unpaid = pgplan::query(&inv, &mut client)
        .where_clause()
        .eq(&inv.is_paid, false)
        .select()
        .expect("select unpaid");
    assert_eq!(unpaid.len(), 3);

    // intersection of two conditions: created = 2 and still unpaid
    let both = pgplan::query(&inv, &mut client)
        .where_clause()
        .eq(&inv.is_paid, false)
        .eq(&inv.stamp.created, 2i64)
        .select()
        .expect("select unpaid created=2");
    assert_eq!(both.len(), 1);
    assert_eq!(both[0].id, "2");

    // select into a caller-owned vector
    let mut collected = Vec::new();
    pgplan::query(&inv, &mut client)
        .where_clause()
        .eq(&inv.memo, "test_memo")
        .select_into(&mut collected)
        .expect("select_into");
    assert_eq!(collected.len(), 2);

    // delete everything that is paid
    let deleted = pgplan::query(&inv, &mut client)
        .where_clause()
        .eq(&inv.is_paid, true)
        .delete()
        .expect("delete paid");
    assert_eq!(deleted, 1);

    let paid = pgplan::query(&inv, &mut client)
        .where_clause()
        .eq(&inv.is_paid, true)
        .select()
        .expect("select paid after delete");
    assert!(paid.is_empty());

    client
        .batch_execute("DROP TABLE plan_invoice")
        .expect("failed to drop table");
}
