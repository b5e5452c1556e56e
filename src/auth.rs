use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use axum::{Json, extract::State, http::StatusCode};
use tower_sessions::Session;
use uuid::Uuid;

use crate::constants::*;
use crate::database::Db;
use crate::models::{LoginPayload, MessageResponse, PublicUser, SessionUser, SignupPayload, User};
use crate::state::AppState;
use crate::utils::{internal_error, validate_email, validate_name, validate_password};

pub fn hash_password(password: &str) -> anyhow::Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!("Failed to hash password: {}", e))?;
    Ok(hash.to_string())
}

pub fn verify_password(password: &str, hash: &str) -> anyhow::Result<bool> {
    let parsed_hash = PasswordHash::new(hash)
        .map_err(|e| anyhow::anyhow!("Failed to parse password hash: {}", e))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

pub async fn create_user(
    db: &Db,
    name: &str,
    email: &str,
    password: &str,
) -> anyhow::Result<PublicUser> {
    let hash = hash_password(password)?;
    let id = Uuid::new_v4().to_string();
    let conn = db.write().await;

    conn.execute(
        "INSERT INTO users (id, name, email, password_hash) VALUES (?, ?, ?, ?)",
        (id.as_str(), name, email, hash.as_str()),
    )
    .await?;

    Ok(PublicUser {
        id,
        name: name.to_string(),
        email: email.to_string(),
    })
}

fn user_from_row(row: &libsql::Row) -> anyhow::Result<User> {
    Ok(User {
        id: row.get(0)?,
        name: row.get(1)?,
        email: row.get(2)?,
        password_hash: row.get(3)?,
    })
}

pub async fn get_user_by_email(db: &Db, email: &str) -> anyhow::Result<Option<User>> {
    let conn = db.read().await;
    let mut rows = conn
        .query(
            "SELECT id, name, email, password_hash FROM users WHERE email = ?",
            [email],
        )
        .await?;

    match rows.next().await? {
        Some(row) => Ok(Some(user_from_row(&row)?)),
        None => Ok(None),
    }
}

pub async fn get_user_by_id(db: &Db, id: &str) -> anyhow::Result<Option<User>> {
    let conn = db.read().await;
    let mut rows = conn
        .query(
            "SELECT id, name, email, password_hash FROM users WHERE id = ?",
            [id],
        )
        .await?;

    match rows.next().await? {
        Some(row) => Ok(Some(user_from_row(&row)?)),
        None => Ok(None),
    }
}

pub async fn signup(
    State(state): State<AppState>,
    Json(payload): Json<SignupPayload>,
) -> Result<(StatusCode, Json<PublicUser>), (StatusCode, String)> {
    validate_name(&payload.name)?;
    validate_email(&payload.email)?;
    validate_password(&payload.password)?;

    let name = payload.name.trim();
    let email = payload.email.trim().to_lowercase();

    let user = create_user(&state.db, name, &email, &payload.password)
        .await
        .map_err(|e| {
            if e.to_string().contains("UNIQUE constraint failed") {
                (StatusCode::CONFLICT, "User already exists".to_string())
            } else {
                internal_error("signup", e)
            }
        })?;

    tracing::info!(user_id = %user.id, "user registered");
    Ok((StatusCode::CREATED, Json(user)))
}

pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Json(payload): Json<LoginPayload>,
) -> Result<(StatusCode, Json<PublicUser>), (StatusCode, String)> {
    if payload.email.trim().is_empty() {
        return Err((StatusCode::BAD_REQUEST, "Email cannot be empty".to_string()));
    }
    if payload.password.is_empty() {
        return Err((
            StatusCode::BAD_REQUEST,
            "Password cannot be empty".to_string(),
        ));
    }

    let email = payload.email.trim().to_lowercase();
    let user = get_user_by_email(&state.db, &email)
        .await
        .map_err(|e| internal_error("login lookup", e))?
        .ok_or_else(|| (StatusCode::UNAUTHORIZED, ERR_INVALID_CREDENTIALS.to_string()))?;

    let is_valid = verify_password(&payload.password, &user.password_hash)
        .map_err(|e| internal_error("password verification", e))?;

    if !is_valid {
        return Err((StatusCode::UNAUTHORIZED, ERR_INVALID_CREDENTIALS.to_string()));
    }

    session
        .insert(SESSION_USER_ID, &user.id)
        .await
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;
    session
        .insert(SESSION_EMAIL, &user.email)
        .await
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;

    tracing::info!(user_id = %user.id, "user logged in");
    Ok((StatusCode::OK, Json(PublicUser::from(user))))
}

/// Resolves the authenticated owner from the session, or 401.
pub async fn get_current_user(session: &Session) -> Result<SessionUser, (StatusCode, String)> {
    let user_id: Option<String> = session
        .get(SESSION_USER_ID)
        .await
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;

    let email: Option<String> = session
        .get(SESSION_EMAIL)
        .await
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;

    match (user_id, email) {
        (Some(id), Some(email)) => Ok(SessionUser { id, email }),
        _ => Err((StatusCode::UNAUTHORIZED, ERR_UNAUTHORIZED.to_string())),
    }
}

pub async fn logout(session: Session) -> Result<Json<MessageResponse>, (StatusCode, String)> {
    session.clear().await;

    Ok(Json(MessageResponse::new("Logout Successful")))
}
