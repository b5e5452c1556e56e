use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::{Serialize, de::DeserializeOwned};
use time::Date;
use tower_sessions::Session;
use uuid::Uuid;

use crate::auth::get_current_user;
use crate::database::Db;
use crate::models::{
    Currency, Expense, ExpensePayload, Income, IncomePayload, MessageResponse, MonetaryRecord,
    Owned,
};
use crate::ownership::require_owner;
use crate::state::AppState;
use crate::utils::{internal_error, today, validate_amount, validate_entry_date};

const RECORD_COLUMNS: &str = "id, owner_id, label, amount, currency, occurred_on";

/// Column values of an income or expense row, before label parsing.
#[derive(Debug, Clone)]
pub struct StoredRecord {
    pub id: String,
    pub owner_id: String,
    pub label: String,
    pub amount: f64,
    pub currency: String,
    pub occurred_on: String,
}

/// Writable fields borrowed from a create/edit payload.
#[derive(Debug, Clone, Copy)]
pub struct RecordFields<'a> {
    pub label: &'static str,
    pub amount: f64,
    pub currency: Currency,
    pub occurred_on: &'a str,
}

/// Storage and wire details that differ between incomes and expenses.
pub trait RecordKind: MonetaryRecord + Owned + Serialize + Send + Sync + Sized + 'static {
    type Payload: DeserializeOwned + Send + 'static;

    const TABLE: &'static str;
    const NOUN: &'static str;
    const DATE_FIELD: &'static str;

    fn fields(payload: &Self::Payload) -> RecordFields<'_>;
    fn from_stored(stored: StoredRecord) -> anyhow::Result<Self>;
}

impl RecordKind for Income {
    type Payload = IncomePayload;

    const TABLE: &'static str = "incomes";
    const NOUN: &'static str = "Income";
    const DATE_FIELD: &'static str = "dateReceived";

    fn fields(payload: &IncomePayload) -> RecordFields<'_> {
        RecordFields {
            label: payload.source.as_str(),
            amount: payload.amount,
            currency: payload.currency,
            occurred_on: &payload.date_received,
        }
    }

    fn from_stored(stored: StoredRecord) -> anyhow::Result<Self> {
        Ok(Income {
            id: stored.id,
            owner_id: stored.owner_id,
            source: stored.label.parse()?,
            amount: stored.amount,
            currency: stored.currency.parse()?,
            date_received: stored.occurred_on,
        })
    }
}

impl RecordKind for Expense {
    type Payload = ExpensePayload;

    const TABLE: &'static str = "expenses";
    const NOUN: &'static str = "Expense";
    const DATE_FIELD: &'static str = "dateSpent";

    fn fields(payload: &ExpensePayload) -> RecordFields<'_> {
        RecordFields {
            label: payload.category.as_str(),
            amount: payload.amount,
            currency: payload.currency,
            occurred_on: &payload.date_spent,
        }
    }

    fn from_stored(stored: StoredRecord) -> anyhow::Result<Self> {
        Ok(Expense {
            id: stored.id,
            owner_id: stored.owner_id,
            category: stored.label.parse()?,
            amount: stored.amount,
            currency: stored.currency.parse()?,
            date_spent: stored.occurred_on,
        })
    }
}

pub fn extract_record_from_row<K: RecordKind>(row: &libsql::Row) -> anyhow::Result<K> {
    K::from_stored(read_stored_row(row)?)
}

fn read_stored_row(row: &libsql::Row) -> anyhow::Result<StoredRecord> {
    Ok(StoredRecord {
        id: row.get(0)?,
        owner_id: row.get(1)?,
        label: row.get(2)?,
        amount: row.get(3)?,
        currency: row.get(4)?,
        occurred_on: row.get(5)?,
    })
}

/// Rows whose label or currency is outside the known set are skipped.
async fn collect_records<K: RecordKind>(mut rows: libsql::Rows) -> anyhow::Result<Vec<K>> {
    let mut records = Vec::new();
    while let Some(row) = rows.next().await? {
        let stored = read_stored_row(&row)?;
        let id = stored.id.clone();
        match K::from_stored(stored) {
            Ok(record) => records.push(record),
            Err(e) => {
                tracing::warn!(id = %id, table = K::TABLE, error = %e, "skipping unreadable record")
            }
        }
    }
    Ok(records)
}

/// Inserts a record for `owner_id`. The date is stored as `YYYY-MM-DD`.
pub async fn insert_record<K: RecordKind>(
    db: &Db,
    owner_id: &str,
    fields: &RecordFields<'_>,
    occurred_on: Date,
) -> anyhow::Result<K> {
    let id = Uuid::new_v4().to_string();
    let occurred_on = occurred_on.to_string();

    let conn = db.write().await;
    conn.execute(
        &format!(
            "INSERT INTO {} ({}) VALUES (?, ?, ?, ?, ?, ?)",
            K::TABLE,
            RECORD_COLUMNS
        ),
        (
            id.as_str(),
            owner_id,
            fields.label,
            fields.amount,
            fields.currency.as_str(),
            occurred_on.as_str(),
        ),
    )
    .await?;

    K::from_stored(StoredRecord {
        id,
        owner_id: owner_id.to_string(),
        label: fields.label.to_string(),
        amount: fields.amount,
        currency: fields.currency.as_str().to_string(),
        occurred_on,
    })
}

/// All records belonging to `owner_id`, oldest insert first.
pub async fn list_records<K: RecordKind>(db: &Db, owner_id: &str) -> anyhow::Result<Vec<K>> {
    let conn = db.read().await;
    let rows = conn
        .query(
            &format!(
                "SELECT {} FROM {} WHERE owner_id = ? ORDER BY rowid ASC",
                RECORD_COLUMNS,
                K::TABLE
            ),
            [owner_id],
        )
        .await?;

    collect_records(rows).await
}

/// Looks a record up by id regardless of owner; callers run the ownership check.
pub async fn find_record<K: RecordKind>(db: &Db, id: &str) -> anyhow::Result<Option<K>> {
    let conn = db.read().await;
    let mut rows = conn
        .query(
            &format!("SELECT {} FROM {} WHERE id = ?", RECORD_COLUMNS, K::TABLE),
            [id],
        )
        .await?;

    match rows.next().await? {
        Some(row) => Ok(Some(extract_record_from_row(&row)?)),
        None => Ok(None),
    }
}

/// Replaces every writable field. Returns `None` when no row of `owner_id` matched.
pub async fn update_record<K: RecordKind>(
    db: &Db,
    id: &str,
    owner_id: &str,
    fields: &RecordFields<'_>,
    occurred_on: Date,
) -> anyhow::Result<Option<K>> {
    let occurred_on = occurred_on.to_string();

    let conn = db.write().await;
    let affected = conn
        .execute(
            &format!(
                "UPDATE {} SET label = ?, amount = ?, currency = ?, occurred_on = ? WHERE id = ? AND owner_id = ?",
                K::TABLE
            ),
            (
                fields.label,
                fields.amount,
                fields.currency.as_str(),
                occurred_on.as_str(),
                id,
                owner_id,
            ),
        )
        .await?;

    if affected == 0 {
        return Ok(None);
    }

    Ok(Some(K::from_stored(StoredRecord {
        id: id.to_string(),
        owner_id: owner_id.to_string(),
        label: fields.label.to_string(),
        amount: fields.amount,
        currency: fields.currency.as_str().to_string(),
        occurred_on,
    })?))
}

/// Returns whether a row of `owner_id` was removed.
pub async fn remove_record<K: RecordKind>(
    db: &Db,
    id: &str,
    owner_id: &str,
) -> anyhow::Result<bool> {
    let conn = db.write().await;
    let affected = conn
        .execute(
            &format!("DELETE FROM {} WHERE id = ? AND owner_id = ?", K::TABLE),
            (id, owner_id),
        )
        .await?;
    Ok(affected > 0)
}

fn validate_fields<K: RecordKind>(fields: &RecordFields<'_>) -> Result<Date, (StatusCode, String)> {
    validate_amount(fields.amount)?;
    validate_entry_date(fields.occurred_on, K::DATE_FIELD, today())
}

fn not_found<K: RecordKind>() -> (StatusCode, String) {
    (StatusCode::NOT_FOUND, format!("{} not found", K::NOUN))
}

pub async fn get_records<K: RecordKind>(
    State(state): State<AppState>,
    session: Session,
) -> Result<(StatusCode, Json<Vec<K>>), (StatusCode, String)> {
    let user = get_current_user(&session).await?;

    let records = list_records::<K>(&state.db, &user.id)
        .await
        .map_err(|e| internal_error(K::TABLE, e))?;

    Ok((StatusCode::OK, Json(records)))
}

pub async fn create_record<K: RecordKind>(
    State(state): State<AppState>,
    session: Session,
    Json(payload): Json<K::Payload>,
) -> Result<(StatusCode, Json<K>), (StatusCode, String)> {
    let user = get_current_user(&session).await?;

    let fields = K::fields(&payload);
    let occurred_on = validate_fields::<K>(&fields)?;

    let record = insert_record::<K>(&state.db, &user.id, &fields, occurred_on)
        .await
        .map_err(|e| internal_error(K::TABLE, e))?;

    tracing::info!(owner_id = %user.id, kind = K::NOUN, "record created");
    Ok((StatusCode::CREATED, Json(record)))
}

pub async fn edit_record<K: RecordKind>(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<String>,
    Json(payload): Json<K::Payload>,
) -> Result<(StatusCode, Json<K>), (StatusCode, String)> {
    let user = get_current_user(&session).await?;

    let existing = find_record::<K>(&state.db, &id)
        .await
        .map_err(|e| internal_error(K::TABLE, e))?
        .ok_or_else(not_found::<K>)?;
    require_owner(&existing, &user.id, "edit", K::NOUN)?;

    let fields = K::fields(&payload);
    let occurred_on = validate_fields::<K>(&fields)?;

    let updated = update_record::<K>(&state.db, &id, &user.id, &fields, occurred_on)
        .await
        .map_err(|e| internal_error(K::TABLE, e))?
        .ok_or_else(not_found::<K>)?;

    Ok((StatusCode::OK, Json(updated)))
}

pub async fn delete_record<K: RecordKind>(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<String>,
) -> Result<(StatusCode, Json<MessageResponse>), (StatusCode, String)> {
    let user = get_current_user(&session).await?;

    let existing = find_record::<K>(&state.db, &id)
        .await
        .map_err(|e| internal_error(K::TABLE, e))?
        .ok_or_else(not_found::<K>)?;
    require_owner(&existing, &user.id, "delete", K::NOUN)?;

    let removed = remove_record::<K>(&state.db, &id, &user.id)
        .await
        .map_err(|e| internal_error(K::TABLE, e))?;
    if !removed {
        return Err(not_found::<K>());
    }

    Ok((
        StatusCode::OK,
        Json(MessageResponse::new(format!("{} deleted", K::NOUN))),
    ))
}
