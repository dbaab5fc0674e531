//! Ad-hoc SQL over an in-memory SQLite database.
//!
//! The pool holds exactly one connection that never expires: every
//! `sqlite::memory:` connection is its own database, so a second or recycled
//! connection would see empty tables. The same property makes
//! `read_only` stick: `query_only` is a per-connection pragma.

use serde_json::{Map, Value};
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions, SqliteRow};
use sqlx::{Column, Row, TypeInfo, ValueRef};

use concierge_core::error::{Error, Result};

pub type SqlRow = Map<String, Value>;

const DEMO_SEED: &[&str] = &[
    "DROP TABLE IF EXISTS sales",
    "DROP TABLE IF EXISTS employees",
    "DROP TABLE IF EXISTS products",
    "CREATE TABLE sales(id INTEGER, item VARCHAR, qty INTEGER, price FLOAT)",
    "INSERT INTO sales VALUES (1,'apple',2,1.2),(2,'pear',5,2.5),(3,'apple',3,1.2),\
     (4,'banana',10,0.8),(5,'orange',7,1.5),(6,'grape',3,2.8)",
    "CREATE TABLE employees(id INTEGER, name VARCHAR, department VARCHAR, salary FLOAT)",
    "INSERT INTO employees VALUES (1,'Alice Johnson','IT',75000),(2,'Bob Smith','Marketing',65000),\
     (3,'Carol Davis','IT',80000),(4,'David Wilson','Sales',60000),(5,'Eva Brown','Marketing',70000)",
    "CREATE TABLE products(id INTEGER, name VARCHAR, category VARCHAR, stock INTEGER, price FLOAT)",
    "INSERT INTO products VALUES (1,'Laptop','Electronics',50,999.99),(2,'Mouse','Electronics',200,25.50),\
     (3,'Notebook','Stationery',500,3.99),(4,'Pen','Stationery',1000,1.99),(5,'Monitor','Electronics',75,299.99)",
];

pub struct SqlAgent {
    pool: SqlitePool,
}

impl SqlAgent {
    /// Open a fresh, empty in-memory database.
    pub async fn in_memory() -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await
            .map_err(sql_err)?;
        Ok(Self { pool })
    }

    /// Recreate the `sales`, `employees` and `products` demo tables.
    pub async fn seed_demo(&self) -> Result<()> {
        let mut tx = self.pool.begin().await.map_err(sql_err)?;
        for stmt in DEMO_SEED {
            sqlx::query(stmt).execute(&mut *tx).await.map_err(sql_err)?;
        }
        tx.commit().await.map_err(sql_err)?;
        tracing::debug!("seeded demo tables");
        Ok(())
    }

    /// Reject every write from now on, including writes smuggled in after a
    /// `SELECT` in a multi-statement string.
    pub async fn read_only(&self) -> Result<()> {
        sqlx::query("PRAGMA query_only = ON").execute(&self.pool).await.map_err(sql_err)?;
        tracing::debug!("sql connection is now read-only");
        Ok(())
    }

    /// Execute `sql` and return every row as a column-name -> value object.
    pub async fn run(&self, sql: &str) -> Result<Vec<SqlRow>> {
        let rows = sqlx::query(sql).fetch_all(&self.pool).await.map_err(sql_err)?;
        tracing::debug!(rows = rows.len(), "sql query finished");
        rows.iter().map(row_to_json).collect()
    }
}

fn row_to_json(row: &SqliteRow) -> Result<SqlRow> {
    let mut out = Map::new();
    for (i, column) in row.columns().iter().enumerate() {
        out.insert(column.name().to_string(), cell_to_json(row, i)?);
    }
    Ok(out)
}

// SQLite is dynamically typed, so decode by the storage class of the value itself.
fn cell_to_json(row: &SqliteRow, i: usize) -> Result<Value> {
    let raw = row.try_get_raw(i).map_err(sql_err)?;
    if raw.is_null() {
        return Ok(Value::Null);
    }
    let kind = raw.type_info().name().to_string();
    let value = match kind.as_str() {
        "INTEGER" => Value::from(row.try_get::<i64, _>(i).map_err(sql_err)?),
        "REAL" => Value::from(row.try_get::<f64, _>(i).map_err(sql_err)?),
        "TEXT" => Value::from(row.try_get::<String, _>(i).map_err(sql_err)?),
        "BLOB" => Value::from(row.try_get::<Vec<u8>, _>(i).map_err(sql_err)?),
        other => return Err(Error::Sql(format!("unsupported column type {other}"))),
    };
    Ok(value)
}

fn sql_err(e: sqlx::Error) -> Error {
    Error::Sql(e.to_string())
}
