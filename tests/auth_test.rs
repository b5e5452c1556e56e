/*!
 * Auth and Profile Integration Tests
 *
 * User creation, credential lookup, password hashing and profile updates
 * against isolated temporary databases.
 */

mod common;

use common::*;
use finance_tracker_server::auth::{
    create_user, get_user_by_email, get_user_by_id, hash_password, verify_password,
};
use finance_tracker_server::profile::update_user_profile;

#[test]
fn password_hash_round_trip() {
    let hash = hash_password("correct horse").expect("Failed to hash password");

    assert_ne!(hash, "correct horse");
    assert!(verify_password("correct horse", &hash).expect("Failed to verify"));
    assert!(!verify_password("wrong horse", &hash).expect("Failed to verify"));
}

#[test]
fn malformed_hash_is_an_error() {
    assert!(verify_password("anything", "not-a-phc-string").is_err());
}

#[tokio::test]
async fn created_user_can_be_found_by_email_and_id() {
    let (db, _temp_dir) = setup_test_environment().await;

    let created = create_user(&db, "Alice", "alice@example.com", "secret123")
        .await
        .expect("Failed to create user");

    let by_email = get_user_by_email(&db, "alice@example.com")
        .await
        .expect("Failed to query user")
        .expect("User should exist");
    assert_eq!(by_email.id, created.id);
    assert_eq!(by_email.name, "Alice");
    assert!(verify_password("secret123", &by_email.password_hash).expect("Failed to verify"));

    let by_id = get_user_by_id(&db, &created.id)
        .await
        .expect("Failed to query user")
        .expect("User should exist");
    assert_eq!(by_id.email, "alice@example.com");
}

#[tokio::test]
async fn unknown_email_returns_none() {
    let (db, _temp_dir) = setup_test_environment().await;

    let user = get_user_by_email(&db, "nobody@example.com")
        .await
        .expect("Failed to query user");

    assert!(user.is_none());
}

#[tokio::test]
async fn duplicate_email_is_rejected() {
    let (db, _temp_dir) = setup_test_environment().await;

    create_user(&db, "Alice", "alice@example.com", "secret123")
        .await
        .expect("Failed to create user");
    let err = create_user(&db, "Alice Again", "alice@example.com", "secret456")
        .await
        .expect_err("Duplicate email must fail");

    assert!(err.to_string().contains("UNIQUE constraint failed"));
}

#[tokio::test]
async fn password_hash_is_not_serialized() {
    let (db, _temp_dir) = setup_test_environment().await;
    let created = create_test_user(&db, "alice").await;

    let user = get_user_by_id(&db, &created.id)
        .await
        .expect("Failed to query user")
        .expect("User should exist");
    let value = serde_json::to_value(&user).expect("Failed to serialize user");

    assert!(value.get("password_hash").is_none());
    assert_eq!(value["email"], "alice@example.com");
}

#[tokio::test]
async fn profile_update_changes_name_only() {
    let (db, _temp_dir) = setup_test_environment().await;
    let created = create_test_user(&db, "alice").await;

    let updated = update_user_profile(&db, &created.id, Some("  Alice Liddell "), None)
        .await
        .expect("Failed to update profile")
        .expect("User should exist");
    assert_eq!(updated.name, "Alice Liddell");
    assert_eq!(updated.email, created.email);

    let stored = get_user_by_id(&db, &created.id)
        .await
        .expect("Failed to query user")
        .expect("User should exist");
    assert_eq!(stored.name, "Alice Liddell");
    assert!(verify_password("secret123", &stored.password_hash).expect("Failed to verify"));
}

#[tokio::test]
async fn profile_update_rehashes_new_password() {
    let (db, _temp_dir) = setup_test_environment().await;
    let created = create_test_user(&db, "alice").await;

    update_user_profile(&db, &created.id, None, Some("new-secret"))
        .await
        .expect("Failed to update profile")
        .expect("User should exist");

    let stored = get_user_by_id(&db, &created.id)
        .await
        .expect("Failed to query user")
        .expect("User should exist");
    assert_eq!(stored.name, "alice");
    assert!(verify_password("new-secret", &stored.password_hash).expect("Failed to verify"));
    assert!(!verify_password("secret123", &stored.password_hash).expect("Failed to verify"));
}

#[tokio::test]
async fn profile_update_for_missing_user_returns_none() {
    let (db, _temp_dir) = setup_test_environment().await;

    let result = update_user_profile(&db, "missing", Some("Ghost"), None)
        .await
        .expect("Update should run");

    assert!(result.is_none());
}
