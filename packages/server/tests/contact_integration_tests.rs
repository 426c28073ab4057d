//! Integration tests for the contact-form endpoints.

mod common;

use axum::http::StatusCode;
use common::TestHarness;
use serde_json::json;
use test_context::test_context;

#[test_context(TestHarness)]
#[tokio::test]
async fn contact_lifecycle(ctx: &TestHarness) {
    let res = ctx
        .post_json(
            "/api/contact",
            json!({
                "name": "Anita Desai",
                "email": "anita@example.com",
                "phone": "9812345678",
                "subject": "Other",
                "otherSubject": "Site visit",
                "comments": "Can I visit on Sunday?"
            }),
        )
        .await;
    assert_eq!(res.status, StatusCode::OK, "{:?}", res.body);
    assert_eq!(res.body["message"], "Contact form submitted successfully.");

    let res = ctx.get("/api/contact").await;
    assert_eq!(res.status, StatusCode::OK);
    let contact = res
        .body
        .as_array()
        .unwrap()
        .iter()
        .find(|c| c["email"] == "anita@example.com")
        .cloned()
        .expect("submitted contact is listed");
    assert_eq!(contact["otherSubject"], "Site visit");
    let id = contact["id"].as_i64().unwrap();

    let res = ctx.get(&format!("/api/contact/{}", id)).await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["name"], "Anita Desai");

    let res = ctx
        .put_json(
            &format!("/api/contact/{}", id),
            json!({ "comments": "Saturday works too" }),
        )
        .await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["message"], "Contact updated successfully");
    assert_eq!(res.body["contact"]["comments"], "Saturday works too");
    assert_eq!(res.body["contact"]["name"], "Anita Desai");

    let res = ctx.delete(&format!("/api/contact/{}", id)).await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["message"], "Contact deleted successfully");

    let res = ctx.delete(&format!("/api/contact/{}", id)).await;
    assert_eq!(res.status, StatusCode::NOT_FOUND);
    assert_eq!(res.error(), "Contact not found or already deleted");

    let res = ctx.get(&format!("/api/contact/{}", id)).await;
    assert_eq!(res.status, StatusCode::NOT_FOUND);
    assert_eq!(res.error(), "Contact not found");
}

#[test_context(TestHarness)]
#[tokio::test]
async fn contact_requires_name_email_and_comments(ctx: &TestHarness) {
    let res = ctx
        .post_json(
            "/api/contact",
            json!({ "name": "Anita", "email": "  ", "comments": "hi" }),
        )
        .await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.body["success"], false);
    assert_eq!(res.error(), "Name, Email, and Comments are required.");
}

#[test_context(TestHarness)]
#[tokio::test]
async fn unknown_contact_is_not_found(ctx: &TestHarness) {
    assert_eq!(
        ctx.get("/api/contact/999999999").await.status,
        StatusCode::NOT_FOUND
    );
    assert_eq!(ctx.get("/api/contact/abc").await.status, StatusCode::NOT_FOUND);
    assert_eq!(
        ctx.put_json("/api/contact/999999999", json!({ "name": "x" }))
            .await
            .status,
        StatusCode::NOT_FOUND
    );
}
