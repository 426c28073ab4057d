//! Integration tests for property sell-enquiries and their attachments.

mod common;

use axum::http::{Method, StatusCode};
use chrono::{DateTime, Utc};
use common::{random_phone, stored_file_count, MultipartBody, TestHarness};
use estate_core::domains::sell_enquiries::SellEnquiry;
use test_context::test_context;

fn valid_form() -> MultipartBody {
    MultipartBody::new()
        .text("propertyType", "Residential")
        .text("propertySubType", "Apartment")
        .text("transactionType", "Sell")
        .text("propertyName", "Sai Residency 402")
        .text("location", "Kalyan West")
        .text("price", "6500000")
        .text("description", "<p>3 BHK, <b>east</b> facing</p>")
        .text("area", "1150")
        .text("bedrooms", "3")
        .text("availabilityStatus", "Ready to move")
        .text("amenities", r#"["Lift","Gym"]"#)
        .text("registryAvailable", "true")
        .text("contactName", "Meera Joshi")
        .text("contactEmail", "meera@example.com")
        .text("contactMobile", "+919812345678")
}

#[test_context(TestHarness)]
#[tokio::test]
async fn create_fetch_update_delete(ctx: &TestHarness) {
    let form = valid_form()
        .file("images", "front view.jpg", "image/jpeg", b"jpeg-1")
        .file("images", "hall.png", "image/png", b"png-2")
        .file("document", "deed.pdf", "application/pdf", b"%PDF-deed");
    let res = ctx.multipart(Method::POST, "/api/sell-enquiries", form).await;
    assert_eq!(res.status, StatusCode::CREATED, "{:?}", res.body);
    assert_eq!(res.body["message"], "Property enquiry created successfully");

    let data = &res.body["data"];
    let id = data["id"].as_i64().unwrap();
    assert_eq!(data["description"], "3 BHK, east facing");
    assert_eq!(data["amenities"], serde_json::json!(["Lift", "Gym"]));
    assert_eq!(data["registryAvailable"], true);
    assert_eq!(data["electricityAvailable"], false);
    assert_eq!(data["propertyImages"].as_array().unwrap().len(), 2);
    let old_document = data["document"].as_str().unwrap().to_string();
    assert!(old_document.ends_with("deed.pdf"));
    assert_eq!(stored_file_count(ctx), 3);

    let (status, bytes) = ctx.fetch_upload(&old_document).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(bytes, b"%PDF-deed");

    let res = ctx.get(&format!("/api/sell-enquiries/{}", id)).await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["message"], "Enquiry fetched successfully");
    assert_eq!(res.body["data"]["propertyName"], "Sai Residency 402");

    // Partial update: new image appended, document replaced, unchecked flag resets
    let form = MultipartBody::new()
        .text("price", "6250000")
        .file("images", "kitchen.jpg", "image/jpeg", b"jpeg-3")
        .file("document", "deed-v2.pdf", "application/pdf", b"%PDF-v2");
    let res = ctx
        .multipart(Method::PUT, &format!("/api/sell-enquiries/{}", id), form)
        .await;
    assert_eq!(res.status, StatusCode::OK, "{:?}", res.body);
    assert_eq!(res.body["message"], "Enquiry updated successfully");
    let data = &res.body["data"];
    assert_eq!(data["price"], 6250000.0);
    assert_eq!(data["propertyName"], "Sai Residency 402");
    assert_eq!(data["propertyImages"].as_array().unwrap().len(), 3);
    assert!(data["document"].as_str().unwrap().ends_with("deed-v2.pdf"));
    assert_eq!(data["registryAvailable"], false);

    let (status, _) = ctx.fetch_upload(&old_document).await;
    assert_eq!(status, StatusCode::NOT_FOUND, "replaced document is removed");
    assert_eq!(stored_file_count(ctx), 4);

    let res = ctx.delete(&format!("/api/sell-enquiries/{}", id)).await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["message"], "Enquiry deleted successfully");
    assert_eq!(stored_file_count(ctx), 0);

    let res = ctx.get(&format!("/api/sell-enquiries/{}", id)).await;
    assert_eq!(res.status, StatusCode::NOT_FOUND);
    assert_eq!(res.error(), "Enquiry not found");
}

#[test_context(TestHarness)]
#[tokio::test]
async fn validation_errors_are_field_keyed_and_files_discarded(ctx: &TestHarness) {
    let form = valid_form()
        .text("transactionType", "Lease")
        .text("price", "0")
        .text("contactEmail", "not-an-email")
        .file("images", "a.jpg", "image/jpeg", b"jpeg");
    let res = ctx.multipart(Method::POST, "/api/sell-enquiries", form).await;

    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.body["success"], false);
    assert_eq!(res.error(), "Please fix the following errors:");
    let fields: Vec<&str> = res.body["errors"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|e| e["field"].as_str())
        .collect();
    assert!(fields.contains(&"transactionType"));
    assert!(fields.contains(&"price"));
    assert!(fields.contains(&"contactEmail"));
    assert_eq!(stored_file_count(ctx), 0);
}

#[test_context(TestHarness)]
#[tokio::test]
async fn amenities_must_be_a_json_array(ctx: &TestHarness) {
    let form = valid_form().text("amenities", "Lift, Gym");
    let res = ctx.multipart(Method::POST, "/api/sell-enquiries", form).await;

    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(
        res.error(),
        "Invalid format for amenities or nearby landmarks. Please provide valid JSON."
    );
}

#[test_context(TestHarness)]
#[tokio::test]
async fn upload_rules_are_enforced(ctx: &TestHarness) {
    let form = valid_form().file("images", "notes.txt", "text/plain", b"hello");
    let res = ctx.multipart(Method::POST, "/api/sell-enquiries", form).await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.error(), "Invalid file upload");

    let mut form = valid_form();
    for i in 0..6 {
        form = form.file("images", &format!("{}.jpg", i), "image/jpeg", b"x");
    }
    let res = ctx.multipart(Method::POST, "/api/sell-enquiries", form).await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert!(res.body["details"].as_str().unwrap().contains("Too many files"));

    let form = valid_form().file("floorPlan", "plan.png", "image/png", b"x");
    let res = ctx.multipart(Method::POST, "/api/sell-enquiries", form).await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);

    assert_eq!(stored_file_count(ctx), 0);
}

#[test_context(TestHarness)]
#[tokio::test]
async fn listing_is_paginated_newest_first(ctx: &TestHarness) {
    let marker = random_phone();
    for i in 0..3 {
        let form = valid_form().text("propertyName", &format!("{}-{}", marker, i));
        let res = ctx.multipart(Method::POST, "/api/sell-enquiries", form).await;
        assert_eq!(res.status, StatusCode::CREATED, "{:?}", res.body);
    }

    let res = ctx.get("/api/sell-enquiries?page=1&limit=2").await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["message"], "Enquiries fetched successfully");
    assert_eq!(res.body["data"].as_array().unwrap().len(), 2);
    assert_eq!(res.body["pagination"]["limit"], 2);
    assert!(res.body["pagination"]["total"].as_i64().unwrap() >= 3);

    let created: Vec<DateTime<Utc>> = res.body["data"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|e| e["createdAt"].as_str())
        .map(|ts| ts.parse().unwrap())
        .collect();
    assert!(created[0] >= created[1]);

    // Bad values fall back to defaults
    let res = ctx.get("/api/sell-enquiries?page=zero&limit=-4").await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["pagination"]["page"], 1);
    assert_eq!(res.body["pagination"]["limit"], 10);
}

#[test_context(TestHarness)]
#[tokio::test]
async fn authenticated_create_records_owner(ctx: &TestHarness) {
    let phone = random_phone();
    ctx.post_json(
        "/api/auth/send-otp",
        serde_json::json!({ "phoneNumber": phone }),
    )
    .await;
    let code = ctx.sms().last_code_for(&common::normalized(&phone)).unwrap();
    let res = ctx
        .post_json(
            "/api/auth/verify-otp",
            serde_json::json!({ "phoneNumber": phone, "otp": code }),
        )
        .await;
    let token = res.body["token"].as_str().unwrap().to_string();
    let user_id = res.body["user"]["id"].as_i64().unwrap();

    let form = valid_form();
    let res = ctx
        .send(
            axum::http::Request::post("/api/sell-enquiries")
                .header("authorization", format!("Bearer {}", token))
                .header(
                    "content-type",
                    format!("multipart/form-data; boundary={}", common::BOUNDARY),
                )
                .body(axum::body::Body::from(form.finish()))
                .unwrap(),
        )
        .await;
    assert_eq!(res.status, StatusCode::CREATED, "{:?}", res.body);

    let id = res.body["data"]["id"].as_i64().unwrap();
    let enquiry = SellEnquiry::find_by_id(id, &ctx.db_pool)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(enquiry.user_id, Some(user_id));
}

#[test_context(TestHarness)]
#[tokio::test]
async fn missing_enquiry_is_not_found(ctx: &TestHarness) {
    let res = ctx
        .multipart(
            Method::PUT,
            "/api/sell-enquiries/999999999",
            MultipartBody::new().text("price", "10"),
        )
        .await;
    assert_eq!(res.status, StatusCode::NOT_FOUND);

    assert_eq!(
        ctx.delete("/api/sell-enquiries/999999999").await.status,
        StatusCode::NOT_FOUND
    );
    assert_eq!(
        ctx.get("/api/sell-enquiries/not-a-number").await.status,
        StatusCode::NOT_FOUND
    );
}
