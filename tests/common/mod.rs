#![allow(dead_code)]

use finance_tracker_server::auth::create_user;
use finance_tracker_server::database::{Db, init_db};
use finance_tracker_server::models::{
    Currency, Expense, ExpenseCategory, Income, IncomeSource, PublicUser,
};
use tempfile::{TempDir, tempdir};
use uuid::Uuid;

/// Fresh database in its own temporary directory. Keep the `TempDir` alive
/// for the duration of the test.
pub async fn setup_test_environment() -> (Db, TempDir) {
    let temp_dir = tempdir().expect("Failed to create temporary directory");
    let data_path = temp_dir
        .path()
        .to_str()
        .expect("Failed to convert path to string")
        .to_string();

    let db = init_db(&data_path)
        .await
        .unwrap_or_else(|e| panic!("Failed to initialize database at {}: {}", data_path, e));

    (db, temp_dir)
}

pub async fn create_test_user(db: &Db, name: &str) -> PublicUser {
    let email = format!("{}@example.com", name.to_lowercase());
    create_user(db, name, &email, "secret123")
        .await
        .unwrap_or_else(|e| panic!("Failed to create test user '{}': {}", name, e))
}

/// Inserts a raw income row, bypassing validation so legacy date text can be stored.
pub async fn insert_raw_income(
    db: &Db,
    owner_id: &str,
    source: &str,
    amount: f64,
    currency: &str,
    occurred_on: &str,
) -> String {
    insert_raw(db, "incomes", owner_id, source, amount, currency, occurred_on).await
}

pub async fn insert_raw_expense(
    db: &Db,
    owner_id: &str,
    category: &str,
    amount: f64,
    currency: &str,
    occurred_on: &str,
) -> String {
    insert_raw(db, "expenses", owner_id, category, amount, currency, occurred_on).await
}

async fn insert_raw(
    db: &Db,
    table: &str,
    owner_id: &str,
    label: &str,
    amount: f64,
    currency: &str,
    occurred_on: &str,
) -> String {
    let id = Uuid::new_v4().to_string();
    let conn = db.write().await;
    conn.execute(
        &format!(
            "INSERT INTO {} (id, owner_id, label, amount, currency, occurred_on) VALUES (?, ?, ?, ?, ?, ?)",
            table
        ),
        (id.as_str(), owner_id, label, amount, currency, occurred_on),
    )
    .await
    .unwrap_or_else(|e| panic!("Failed to insert test row into {}: {}", table, e));
    id
}

/// In-memory income fixture for the summary tests.
pub fn income(amount: f64, currency: Currency, date: &str) -> Income {
    Income {
        id: Uuid::new_v4().to_string(),
        owner_id: "owner".to_string(),
        source: IncomeSource::Salary,
        amount,
        currency,
        date_received: date.to_string(),
    }
}

pub fn expense(amount: f64, currency: Currency, date: &str) -> Expense {
    Expense {
        id: Uuid::new_v4().to_string(),
        owner_id: "owner".to_string(),
        category: ExpenseCategory::Food,
        amount,
        currency,
        date_spent: date.to_string(),
    }
}
