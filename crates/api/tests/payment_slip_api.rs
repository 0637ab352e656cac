//! Integration tests for payment slip upload and finance review.

mod common;

use axum::http::StatusCode;
use axum::Router;
use common::{
    at, body_json, create_machine, get_auth, post_file_auth, post_json_auth, user_with_token,
};
use rentfleet_core::roles::Role;
use serde_json::json;
use sqlx::PgPool;

/// App whose uploads land in a fresh temporary directory.
fn app_with_uploads(pool: PgPool) -> (Router, tempfile::TempDir) {
    let dir = tempfile::tempdir().expect("tempdir should be created");
    let app = common::build_test_app_with(pool, common::config_with_upload_dir(dir.path().into()));
    (app, dir)
}

async fn create_booking(app: Router, token: &str, machine_id: i64) -> i64 {
    let response = post_json_auth(
        app,
        "/api/v1/bookings",
        token,
        json!({ "machine_id": machine_id, "start_at": at(3, 8), "end_at": at(3, 12) }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["data"]["id"].as_i64().unwrap()
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn owner_uploads_slip_to_disk(pool: PgPool) {
    let (customer, token) = user_with_token(&pool, "carl", Role::Customer).await;
    let machine = create_machine(&pool, "3CX", Some(1000)).await;
    let (app, dir) = app_with_uploads(pool);
    let booking_id = create_booking(app.clone(), &token, machine.id).await;

    let response = post_file_auth(
        app.clone(),
        &format!("/api/v1/bookings/{booking_id}/payment-slips"),
        &token,
        "Receipt.PDF",
        b"%PDF-1.4 fake receipt",
    )
    .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["data"]["booking_id"], booking_id);
    assert_eq!(json["data"]["status"], "uploaded");
    assert_eq!(json["data"]["uploaded_by"], customer.id);

    let path = json["data"]["file_path"].as_str().unwrap();
    assert!(path.ends_with(".pdf"));
    let file_name = std::path::Path::new(path).file_name().unwrap().to_str().unwrap();
    assert!(file_name.starts_with(&format!("booking_{booking_id}_")));
    assert_eq!(std::fs::read(path).unwrap(), b"%PDF-1.4 fake receipt");
    assert!(std::path::Path::new(path).starts_with(dir.path()));

    let json = body_json(
        get_auth(
            app,
            &format!("/api/v1/bookings/{booking_id}/payment-slips"),
            &token,
        )
        .await,
    )
    .await;
    assert_eq!(json["data"].as_array().unwrap().len(), 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn failed_insert_leaves_no_file_behind(pool: PgPool) {
    let (_c, token) = user_with_token(&pool, "carl", Role::Customer).await;
    let machine = create_machine(&pool, "3CX", Some(1000)).await;
    let (app, dir) = app_with_uploads(pool.clone());
    let booking_id = create_booking(app.clone(), &token, machine.id).await;

    sqlx::query(
        "ALTER TABLE payment_slips ADD CONSTRAINT ck_no_new_slips CHECK (booking_id < 0) NOT VALID",
    )
    .execute(&pool)
    .await
    .unwrap();

    let response = post_file_auth(
        app,
        &format!("/api/v1/bookings/{booking_id}/payment-slips"),
        &token,
        "receipt.pdf",
        b"%PDF-1.4 fake receipt",
    )
    .await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn upload_rejects_bad_input(pool: PgPool) {
    let (_c, token) = user_with_token(&pool, "carl", Role::Customer).await;
    let (_o, other) = user_with_token(&pool, "olga", Role::Customer).await;
    let machine = create_machine(&pool, "3CX", None).await;
    let (app, _dir) = app_with_uploads(pool);
    let booking_id = create_booking(app.clone(), &token, machine.id).await;
    let uri = format!("/api/v1/bookings/{booking_id}/payment-slips");

    let response = post_file_auth(app.clone(), &uri, &token, "slip.exe", b"MZ").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");

    let response = post_file_auth(app.clone(), &uri, &token, "slip.png", b"").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["error"], "Uploaded file is empty");

    let response = post_file_auth(app, &uri, &other, "slip.png", b"png-bytes").await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn finance_verifies_slip_once(pool: PgPool) {
    let (_c, customer) = user_with_token(&pool, "carl", Role::Customer).await;
    let (finance_user, finance) = user_with_token(&pool, "fiona", Role::FinanceOfficer).await;
    let machine = create_machine(&pool, "3CX", None).await;
    let (app, _dir) = app_with_uploads(pool);
    let booking_id = create_booking(app.clone(), &customer, machine.id).await;

    let json = body_json(
        post_file_auth(
            app.clone(),
            &format!("/api/v1/bookings/{booking_id}/payment-slips"),
            &customer,
            "slip.jpg",
            b"jpeg-bytes",
        )
        .await,
    )
    .await;
    let slip_id = json["data"]["id"].as_i64().unwrap();

    let response = get_auth(app.clone(), "/api/v1/payment-slips?status=uploaded", &finance).await;
    let json = body_json(response).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 1);

    let response = post_json_auth(
        app.clone(),
        &format!("/api/v1/payment-slips/{slip_id}/verify"),
        &customer,
        json!({ "status": "verified" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = post_json_auth(
        app.clone(),
        &format!("/api/v1/payment-slips/{slip_id}/verify"),
        &finance,
        json!({ "status": "verified", "remarks": "Matches bank statement" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["status"], "verified");
    assert_eq!(json["data"]["verified_by"], finance_user.id);
    assert_eq!(json["data"]["remarks"], "Matches bank statement");

    let json = body_json(
        get_auth(app.clone(), &format!("/api/v1/bookings/{booking_id}"), &customer).await,
    )
    .await;
    assert_eq!(json["data"]["payment_verified"], true);
    assert!(json["data"]["payment_verified_at"].is_string());

    let response = post_json_auth(
        app,
        &format!("/api/v1/payment-slips/{slip_id}/verify"),
        &finance,
        json!({ "status": "rejected" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn rejected_slip_leaves_booking_unverified(pool: PgPool) {
    let (_c, customer) = user_with_token(&pool, "carl", Role::Customer).await;
    let (_f, finance) = user_with_token(&pool, "fiona", Role::FinanceOfficer).await;
    let machine = create_machine(&pool, "3CX", None).await;
    let (app, _dir) = app_with_uploads(pool);
    let booking_id = create_booking(app.clone(), &customer, machine.id).await;

    let json = body_json(
        post_file_auth(
            app.clone(),
            &format!("/api/v1/bookings/{booking_id}/payment-slips"),
            &customer,
            "slip.png",
            b"png-bytes",
        )
        .await,
    )
    .await;
    let slip_id = json["data"]["id"].as_i64().unwrap();

    let response = post_json_auth(
        app.clone(),
        &format!("/api/v1/payment-slips/{slip_id}/verify"),
        &finance,
        json!({ "status": "pending" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = post_json_auth(
        app.clone(),
        &format!("/api/v1/payment-slips/{slip_id}/verify"),
        &finance,
        json!({ "status": "rejected", "remarks": "Amount mismatch" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(
        get_auth(app, &format!("/api/v1/bookings/{booking_id}"), &finance).await,
    )
    .await;
    assert_eq!(json["data"]["payment_verified"], false);
}
