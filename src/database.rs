use anyhow::Result;
use libsql::{Builder, Connection};
use std::{path::Path, sync::Arc};
use tokio::sync::RwLock;

use crate::constants::DATABASE_FILE;

const CREATE_USERS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS users (
    id             TEXT    PRIMARY KEY,
    name           TEXT    NOT NULL,
    email          TEXT    UNIQUE NOT NULL,
    password_hash  TEXT    NOT NULL
);
"#;

const CREATE_INCOMES_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS incomes (
    id           TEXT    PRIMARY KEY,
    owner_id     TEXT    NOT NULL REFERENCES users(id),
    label        TEXT    NOT NULL,
    amount       REAL    NOT NULL CHECK (amount >= 0),
    currency     TEXT    NOT NULL,
    occurred_on  TEXT    NOT NULL
);
"#;

const CREATE_EXPENSES_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS expenses (
    id           TEXT    PRIMARY KEY,
    owner_id     TEXT    NOT NULL REFERENCES users(id),
    label        TEXT    NOT NULL,
    amount       REAL    NOT NULL CHECK (amount >= 0),
    currency     TEXT    NOT NULL,
    occurred_on  TEXT    NOT NULL
);
"#;

const CREATE_OWNER_INDEXES: [&str; 2] = [
    "CREATE INDEX IF NOT EXISTS idx_incomes_owner ON incomes(owner_id);",
    "CREATE INDEX IF NOT EXISTS idx_expenses_owner ON expenses(owner_id);",
];

pub type Db = Arc<RwLock<Connection>>;

/// Opens (or creates) `finance.db` under `data_dir` and ensures the schema exists.
pub async fn init_db(data_dir: &str) -> Result<Db> {
    tokio::fs::create_dir_all(data_dir).await?;
    let path = Path::new(data_dir).join(DATABASE_FILE);
    let db = Builder::new_local(path).build().await?;
    let conn = db.connect()?;

    conn.execute(CREATE_USERS_TABLE, ()).await?;
    conn.execute(CREATE_INCOMES_TABLE, ()).await?;
    conn.execute(CREATE_EXPENSES_TABLE, ()).await?;
    for statement in CREATE_OWNER_INDEXES {
        conn.execute(statement, ()).await?;
    }

    Ok(Arc::new(RwLock::new(conn)))
}
