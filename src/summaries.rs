use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use time::OffsetDateTime;
use tower_sessions::Session;

use crate::aggregation::{
    HomeSummary, SavingsEntry, YearFilter, summarize_home, summarize_savings_by_month_name,
};
use crate::auth::get_current_user;
use crate::database::Db;
use crate::models::{Expense, Income};
use crate::records::list_records;
use crate::state::AppState;
use crate::utils::{aggregation_unavailable, validate_year};

/// Both record streams of one owner, loaded for a single summary request.
pub async fn load_owner_records(
    db: &Db,
    owner_id: &str,
) -> anyhow::Result<(Vec<Income>, Vec<Expense>)> {
    let incomes = list_records::<Income>(db, owner_id).await?;
    let expenses = list_records::<Expense>(db, owner_id).await?;
    Ok((incomes, expenses))
}

/// Dashboard summary for the current calendar year.
pub async fn home_data(
    State(state): State<AppState>,
    session: Session,
) -> Result<(StatusCode, Json<HomeSummary>), (StatusCode, String)> {
    let user = get_current_user(&session).await?;

    let (incomes, expenses) = load_owner_records(&state.db, &user.id)
        .await
        .map_err(aggregation_unavailable)?;

    let year = OffsetDateTime::now_utc().year();
    let summary = summarize_home(&incomes, &expenses, year, state.summary);

    Ok((StatusCode::OK, Json(summary)))
}

pub async fn get_savings(
    State(state): State<AppState>,
    session: Session,
    Path(year): Path<String>,
) -> Result<(StatusCode, Json<Vec<SavingsEntry>>), (StatusCode, String)> {
    let user = get_current_user(&session).await?;
    let year = validate_year(&year)?;

    let (incomes, expenses) = load_owner_records(&state.db, &user.id)
        .await
        .map_err(aggregation_unavailable)?;

    let filter = YearFilter::new(year, state.summary.year_match);
    let savings = summarize_savings_by_month_name(&incomes, &expenses, &filter);

    Ok((StatusCode::OK, Json(savings)))
}
