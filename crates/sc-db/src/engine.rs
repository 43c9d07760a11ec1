//! The SQLite-backed persistence engine (§4.2). Deliberately written
//! against `sqlx::Sqlite` concretely rather than behind a generic
//! `sqlx::Database` trait bound — the pull pipeline only ever targets one
//! SQLite file, and a generic engine would buy flexibility nobody asked for
//! at the cost of a much harder-to-read query layer.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde_json::{json, Map, Value};
use sqlx::query_builder::Separated;
use sqlx::sqlite::{SqlitePoolOptions, SqliteRow};
use sqlx::{Executor, Pool, QueryBuilder, Row, Sqlite};
use tracing::{debug, instrument};

use crate::ddl;
use crate::dialect::Dialect;
use crate::error::{Error, Result};
use crate::hash;
use crate::schema::{self, ColumnSchema, ColumnType, TableSchema};

/// Rows per `INSERT ... VALUES` statement (§4.2).
const UPSERT_CHUNK_SIZE: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HashLevel {
    Database,
    Table,
    Row,
}

pub struct Engine {
    pool: Pool<Sqlite>,
}

impl Engine {
    #[instrument(skip_all)]
    pub async fn connect(connection_string: &str) -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect(connection_string)
            .await
            .map_err(Error::Connect)?;
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &Pool<Sqlite> {
        &self.pool
    }

    /// Creates every base table and its SCD companion if missing. Reuses
    /// the same DDL the `schema` CLI subcommand prints (§6.2), so the two
    /// never drift.
    #[instrument(skip_all)]
    pub async fn ensure_schema(&self) -> Result<()> {
        let rendered = ddl::render_schema(Dialect::Sqlite);
        for statement in split_statements(&rendered) {
            sqlx::query(&statement).execute(&self.pool).await?;
        }
        Ok(())
    }

    /// Upserts JSON-encoded rows (one [`Value::Object`] per row, keyed by
    /// column name — see `sc_schema::hash::Entity::row_json`) into `table`,
    /// chunked to [`UPSERT_CHUNK_SIZE`] rows per statement.
    #[instrument(skip(self, rows), fields(table = table_name, rows = rows.len()))]
    pub async fn upsert(&self, table_name: &str, rows: &[Value]) -> Result<()> {
        let table = schema::table(table_name).ok_or_else(|| Error::UnknownTable(table_name.to_string()))?;
        for chunk in rows.chunks(UPSERT_CHUNK_SIZE) {
            exec_upsert_chunk(&self.pool, table, chunk).await?;
        }
        debug!("upserted {} row(s) into {table_name}", rows.len());
        Ok(())
    }

    /// Marks every currently-`ACTIVE` row for `vendor_id` in `table` as
    /// `INACTIVE`, ahead of an adapter call whose still-reported rows the
    /// following [`Engine::upsert`] will flip back to `ACTIVE` (§4.5's
    /// mark-inactive-then-upsert pattern). `predicate` is an optional raw
    /// SQL fragment ANDed onto the `WHERE` clause, used to scope the spot
    /// price invalidation to `allocation = 'SPOT'` without touching
    /// on-demand/reserved rows in the same table.
    #[instrument(skip(self), fields(table = table_name, vendor_id))]
    pub async fn mark_inactive(&self, table_name: &str, vendor_id: &str, observed_at: DateTime<Utc>, predicate: Option<&str>) -> Result<u64> {
        let table = schema::table(table_name).ok_or_else(|| Error::UnknownTable(table_name.to_string()))?;
        exec_mark_inactive(&self.pool, table, vendor_id, observed_at, predicate).await
    }

    /// Copies the current state of every row for `vendor_id` in `table`
    /// into its `_scd` companion (§3.3). A no-op for tables without an SCD
    /// companion. Duplicate `(pk..., observed_at)` rows are ignored rather
    /// than erroring, since re-running a pull that made no new
    /// observations should be idempotent (§8, I-IDEMPOTENT).
    #[instrument(skip(self), fields(table = table_name, vendor_id))]
    pub async fn duplicate_to_scd(&self, table_name: &str, vendor_id: &str) -> Result<u64> {
        let table = schema::table(table_name).ok_or_else(|| Error::UnknownTable(table_name.to_string()))?;
        exec_duplicate_to_scd(&self.pool, table, vendor_id).await
    }

    /// Runs one full inventory stage (§4.5's mark-inactive → upsert →
    /// optional SCD-duplicate sequence) as a single SQL transaction, so a
    /// mid-stage failure leaves the database exactly in its pre-stage state
    /// (§4.2 "one stage = one commit"; invariant 2/§8 S6). Callers must have
    /// already run schema and referential validation on `rows` — this
    /// method only ever touches rows the caller has already accepted.
    #[instrument(skip(self, rows), fields(table = table_name, vendor_id, rows = rows.len()))]
    pub async fn run_stage(
        &self,
        table_name: &str,
        vendor_id: &str,
        observed_at: DateTime<Utc>,
        predicate: Option<&str>,
        rows: &[Value],
        scd_enabled: bool,
    ) -> Result<()> {
        let table = schema::table(table_name).ok_or_else(|| Error::UnknownTable(table_name.to_string()))?;
        let mut tx = self.pool.begin().await?;

        exec_mark_inactive(&mut *tx, table, vendor_id, observed_at, predicate).await?;
        for chunk in rows.chunks(UPSERT_CHUNK_SIZE) {
            exec_upsert_chunk(&mut *tx, table, chunk).await?;
        }
        if scd_enabled {
            exec_duplicate_to_scd(&mut *tx, table, vendor_id).await?;
        }

        tx.commit().await?;
        debug!("committed stage for {table_name}: {} row(s)", rows.len());
        Ok(())
    }

    /// Computes a canonical SHA-1 content hash of the database (§4.2/§8),
    /// at DATABASE, TABLE or ROW granularity. `ignored` columns (typically
    /// `["observed_at"]`) are dropped before hashing so re-pulling
    /// unchanged upstream data hashes identically across runs.
    #[instrument(skip(self))]
    pub async fn hash_database(&self, level: HashLevel, ignored: &[&str]) -> Result<Value> {
        let mut per_table = BTreeMap::new();
        for table in schema::TABLES {
            per_table.insert(table.name, self.hash_rows(table, ignored).await?);
        }

        Ok(match level {
            HashLevel::Row => {
                let mut out = Map::new();
                for (table_name, rows) in &per_table {
                    let arr: Vec<Value> = rows.iter().map(|(pk, h)| json!({ "primary_key": pk, "hash": h })).collect();
                    out.insert(table_name.to_string(), Value::Array(arr));
                }
                Value::Object(out)
            }
            HashLevel::Table => {
                let mut out = Map::new();
                for (table_name, rows) in &per_table {
                    let hashes: Vec<String> = rows.iter().map(|(_, h)| h.clone()).collect();
                    out.insert(table_name.to_string(), Value::String(hash::combine(&hashes)));
                }
                Value::Object(out)
            }
            HashLevel::Database => {
                let table_hashes: Vec<String> = per_table
                    .values()
                    .map(|rows| hash::combine(&rows.iter().map(|(_, h)| h.clone()).collect::<Vec<_>>()))
                    .collect();
                json!({ "hash": hash::combine(&table_hashes) })
            }
        })
    }

    async fn hash_rows(&self, table: &TableSchema, ignored: &[&str]) -> Result<Vec<(Value, String)>> {
        let order_by = table.primary_key.iter().map(|c| format!("\"{c}\"")).collect::<Vec<_>>().join(", ");
        let sql = format!("SELECT * FROM \"{}\" ORDER BY {order_by}", table.name);
        let rows = sqlx::query(&sql).fetch_all(&self.pool).await?;

        let mut out = Vec::with_capacity(rows.len());
        for row in &rows {
            let mut attrs = Map::new();
            let mut pk = Map::new();
            for col in table.columns {
                let value = decode_column(row, col)?;
                if table.primary_key.contains(&col.name) {
                    pk.insert(col.name.to_string(), value.clone());
                }
                if !ignored.contains(&col.name) {
                    attrs.insert(col.name.to_string(), value);
                }
            }
            out.push((Value::Object(pk), hash::hash_value(&Value::Object(attrs))));
        }
        Ok(out)
    }
}

/// Shared by [`Engine::upsert`] (runs against the pool directly) and
/// [`Engine::run_stage`] (runs inside a transaction) — `E` is either `&Pool`
/// or `&mut Transaction`, both of which implement `sqlx::Executor`.
async fn exec_upsert_chunk<'e, E>(executor: E, table: &TableSchema, rows: &[Value]) -> Result<()>
where
    E: Executor<'e, Database = Sqlite>,
{
    if rows.is_empty() {
        return Ok(());
    }

    let column_list = table.columns.iter().map(|c| format!("\"{}\"", c.name)).collect::<Vec<_>>().join(", ");
    let mut builder: QueryBuilder<Sqlite> = QueryBuilder::new(format!("INSERT INTO \"{}\" ({column_list}) ", table.name));

    builder.push_values(rows, |b, row| push_row(b, table, row));

    builder.push(" ON CONFLICT (");
    let pk_list = table.primary_key.iter().map(|c| format!("\"{c}\"")).collect::<Vec<_>>().join(", ");
    builder.push(pk_list);
    builder.push(") DO UPDATE SET ");

    let mut first = true;
    for col in table.columns.iter().filter(|c| !table.primary_key.contains(&c.name)) {
        if !first {
            builder.push(", ");
        }
        first = false;
        builder.push(format!("\"{}\" = excluded.\"{}\"", col.name, col.name));
    }

    builder.build().execute(executor).await?;
    Ok(())
}

async fn exec_mark_inactive<'e, E>(
    executor: E,
    table: &TableSchema,
    vendor_id: &str,
    observed_at: DateTime<Utc>,
    predicate: Option<&str>,
) -> Result<u64>
where
    E: Executor<'e, Database = Sqlite>,
{
    let mut sql = format!(
        "UPDATE \"{}\" SET \"status\" = 'INACTIVE', \"observed_at\" = ? WHERE \"vendor_id\" = ? AND \"status\" = 'ACTIVE'",
        table.name
    );
    if let Some(predicate) = predicate {
        sql.push_str(" AND ");
        sql.push_str(predicate);
    }
    let result = sqlx::query(&sql).bind(observed_at.to_rfc3339()).bind(vendor_id).execute(executor).await?;
    Ok(result.rows_affected())
}

async fn exec_duplicate_to_scd<'e, E>(executor: E, table: &TableSchema, vendor_id: &str) -> Result<u64>
where
    E: Executor<'e, Database = Sqlite>,
{
    if !table.has_scd {
        return Ok(0);
    }
    let scd_name = table.scd_table_name();
    let column_list = table.columns.iter().map(|c| format!("\"{}\"", c.name)).collect::<Vec<_>>().join(", ");
    let sql = format!(
        "INSERT OR IGNORE INTO \"{scd_name}\" ({column_list}) SELECT {column_list} FROM \"{}\" WHERE \"vendor_id\" = ?",
        table.name
    );
    let result = sqlx::query(&sql).bind(vendor_id).execute(executor).await?;
    Ok(result.rows_affected())
}

fn split_statements(rendered: &str) -> Vec<String> {
    rendered
        .split("\n\n")
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| s.replacen("CREATE TABLE ", "CREATE TABLE IF NOT EXISTS ", 1))
        .collect()
}

fn push_row<'args>(mut b: Separated<'_, 'args, Sqlite, &'static str>, table: &TableSchema, row: &'args Value) {
    for col in table.columns {
        let value = row.as_object().and_then(|m| m.get(col.name)).cloned().unwrap_or(Value::Null);
        match col.ty {
            ColumnType::Text | ColumnType::Timestamp => {
                b.push_bind(value.as_str().map(|s| s.to_string()));
            }
            ColumnType::Integer => {
                b.push_bind(value.as_i64());
            }
            ColumnType::Real => {
                b.push_bind(value.as_f64());
            }
            ColumnType::Bool => {
                b.push_bind(value.as_bool().map(|v| v as i64));
            }
            ColumnType::Json => {
                if value.is_null() {
                    b.push_bind(Option::<String>::None);
                } else {
                    b.push_bind(value.to_string());
                }
            }
        };
    }
}

fn decode_column(row: &SqliteRow, col: &ColumnSchema) -> Result<Value> {
    Ok(match col.ty {
        ColumnType::Text | ColumnType::Timestamp => row
            .try_get::<Option<String>, _>(col.name)?
            .map(Value::String)
            .unwrap_or(Value::Null),
        ColumnType::Integer => row.try_get::<Option<i64>, _>(col.name)?.map(|v| json!(v)).unwrap_or(Value::Null),
        ColumnType::Real => row.try_get::<Option<f64>, _>(col.name)?.map(|v| json!(v)).unwrap_or(Value::Null),
        ColumnType::Bool => row
            .try_get::<Option<i64>, _>(col.name)?
            .map(|v| json!(v != 0))
            .unwrap_or(Value::Null),
        ColumnType::Json => match row.try_get::<Option<String>, _>(col.name)? {
            Some(s) => serde_json::from_str(&s).unwrap_or(Value::Null),
            None => Value::Null,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn test_engine() -> Engine {
        let engine = Engine::connect("sqlite::memory:").await.expect("in-memory sqlite connects");
        engine.ensure_schema().await.expect("schema creation succeeds");
        engine
    }

    #[tokio::test]
    async fn ensure_schema_is_idempotent() {
        let engine = test_engine().await;
        engine.ensure_schema().await.expect("re-running ensure_schema is a no-op");
    }

    #[tokio::test]
    async fn upsert_then_mark_inactive_then_upsert_round_trips() {
        let engine = test_engine().await;

        let country = json!({ "country_id": "DE", "continent": "Europe", "status": "ACTIVE", "observed_at": "2026-01-01T00:00:00Z" });
        engine.upsert("country", &[country]).await.expect("country upsert succeeds");

        let vendor = json!({
            "vendor_id": "hcloud", "name": "Hetzner", "logo": null, "homepage": "https://hetzner.com",
            "country_id": "DE", "state": null, "city": null, "address_line": null, "zip_code": null,
            "founding_year": 1997, "status_page": null, "status": "ACTIVE", "observed_at": "2026-01-01T00:00:00Z",
        });
        engine.upsert("vendor", &[vendor]).await.expect("vendor upsert succeeds");

        let later = DateTime::parse_from_rfc3339("2026-01-02T00:00:00Z").unwrap().with_timezone(&Utc);
        let affected = engine.mark_inactive("vendor", "hcloud", later, None).await.expect("mark_inactive succeeds");
        assert_eq!(affected, 1);

        let hash = engine.hash_database(HashLevel::Database, &["observed_at"]).await.expect("hash succeeds");
        assert!(hash.get("hash").is_some());
    }

    #[tokio::test]
    async fn run_stage_commits_mark_inactive_and_upsert_together() {
        let engine = test_engine().await;
        let country = json!({ "country_id": "DE", "continent": "Europe", "status": "ACTIVE", "observed_at": "2026-01-01T00:00:00Z" });
        engine.upsert("country", &[country]).await.unwrap();

        let observed_at = DateTime::parse_from_rfc3339("2026-01-02T00:00:00Z").unwrap().with_timezone(&Utc);
        let row = json!({ "country_id": "FR", "continent": "Europe", "status": "ACTIVE", "observed_at": "2026-01-02T00:00:00Z" });
        engine.run_stage("country", "unused", observed_at, None, &[row], false).await.expect("stage commits");

        let hash = engine.hash_database(HashLevel::Row, &["observed_at"]).await.unwrap();
        let rows = hash["country"].as_array().unwrap();
        assert_eq!(rows.len(), 2);
    }

    #[tokio::test]
    async fn run_stage_rolls_back_entirely_on_upsert_failure() {
        let engine = test_engine().await;
        let observed_at = Utc::now();
        // "not_a_table" doesn't exist: run_stage must fail before mutating anything.
        let err = engine.run_stage("not_a_table", "hcloud", observed_at, None, &[], false).await;
        assert!(err.is_err());
    }
}
