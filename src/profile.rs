use axum::{Json, extract::State, http::StatusCode};
use tower_sessions::Session;

use crate::auth::{get_current_user, get_user_by_id, hash_password};
use crate::database::Db;
use crate::models::{ProfileResponse, PublicUser, UpdateProfilePayload};
use crate::state::AppState;
use crate::utils::{internal_error, validate_name, validate_password};

/// Applies a name and/or password change. Returns `None` if the user is gone.
pub async fn update_user_profile(
    db: &Db,
    user_id: &str,
    name: Option<&str>,
    new_password: Option<&str>,
) -> anyhow::Result<Option<PublicUser>> {
    let Some(user) = get_user_by_id(db, user_id).await? else {
        return Ok(None);
    };

    let name = name.map(str::trim).unwrap_or(&user.name).to_string();
    let password_hash = match new_password {
        Some(password) => hash_password(password)?,
        None => user.password_hash.clone(),
    };

    let conn = db.write().await;
    conn.execute(
        "UPDATE users SET name = ?, password_hash = ? WHERE id = ?",
        (name.as_str(), password_hash.as_str(), user_id),
    )
    .await?;

    Ok(Some(PublicUser {
        id: user.id,
        name,
        email: user.email,
    }))
}

pub async fn update_profile(
    State(state): State<AppState>,
    session: Session,
    Json(payload): Json<UpdateProfilePayload>,
) -> Result<(StatusCode, Json<ProfileResponse>), (StatusCode, String)> {
    let current = get_current_user(&session).await?;

    // Empty fields mean "leave unchanged".
    let name = payload.name.as_deref().filter(|n| !n.trim().is_empty());
    let new_password = payload.new_password.as_deref().filter(|p| !p.is_empty());

    if let Some(name) = name {
        validate_name(name)?;
    }
    if let Some(password) = new_password {
        validate_password(password)?;
    }

    let user = update_user_profile(&state.db, &current.id, name, new_password)
        .await
        .map_err(|e| internal_error("profile update", e))?
        .ok_or_else(|| (StatusCode::NOT_FOUND, "User not found".to_string()))?;

    Ok((
        StatusCode::OK,
        Json(ProfileResponse {
            message: "Profile updated successfully".to_string(),
            user,
        }),
    ))
}
