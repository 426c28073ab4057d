//! `/api/numbers` routes for the marketing phone list.

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    routing::{delete, get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::common::{ApiError, ApiResult};
use crate::domains::numbers::{parse_number, MobileNumber, TEST_NUMBER};
use crate::server::app::AxumAppState;
use crate::server::extract::FormOrJson;

pub fn routes() -> Router {
    Router::new()
        .route("/addnumber", post(add_number_handler))
        .route("/get", get(list_numbers_handler))
        .route("/delete/:id", delete(delete_number_handler))
        .route("/delete-all", delete(delete_all_numbers_handler))
        .route("/test-number", post(add_test_number_handler))
}

#[derive(Debug, Default, Deserialize)]
struct AddNumberInput {
    number: Option<String>,
}

#[derive(Serialize)]
struct NumberSaved {
    message: &'static str,
    data: MobileNumber,
}

#[derive(Serialize)]
struct TestNumberAdded {
    message: &'static str,
    number: &'static str,
}

#[derive(Serialize)]
struct MessageResponse {
    message: String,
}

async fn add_number_handler(
    Extension(state): Extension<AxumAppState>,
    FormOrJson(input): FormOrJson<AddNumberInput>,
) -> ApiResult<(StatusCode, Json<NumberSaved>)> {
    let number = input
        .number
        .as_deref()
        .and_then(parse_number)
        .ok_or_else(|| ApiError::bad_request("Invalid or missing 10-digit phone number"))?;

    let saved = MobileNumber::create(number, &state.db_pool)
        .await
        .map_err(|e| ApiError::internal("Error saving number", format!("{:#}", e)))?;
    info!(number_id = saved.id, "Number saved");

    Ok((
        StatusCode::CREATED,
        Json(NumberSaved {
            message: "Number saved",
            data: saved,
        }),
    ))
}

async fn list_numbers_handler(
    Extension(state): Extension<AxumAppState>,
) -> ApiResult<Json<Vec<MobileNumber>>> {
    let numbers = MobileNumber::find_active(&state.db_pool)
        .await
        .map_err(|e| ApiError::internal("Error fetching numbers", format!("{:#}", e)))?;
    Ok(Json(numbers))
}

async fn delete_number_handler(
    Extension(state): Extension<AxumAppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<MessageResponse>> {
    let id: i64 = id
        .trim()
        .parse()
        .map_err(|_| ApiError::bad_request("Invalid ID"))?;

    let deleted = MobileNumber::delete(id, &state.db_pool)
        .await
        .map_err(|e| ApiError::internal("Error deleting number", format!("{:#}", e)))?;

    if deleted == 0 {
        return Err(ApiError::not_found("Number not found"));
    }
    Ok(Json(MessageResponse {
        message: "Number deleted successfully".to_string(),
    }))
}

async fn delete_all_numbers_handler(
    Extension(state): Extension<AxumAppState>,
) -> ApiResult<Json<MessageResponse>> {
    let deleted = MobileNumber::delete_all(&state.db_pool)
        .await
        .map_err(|e| ApiError::internal("Error deleting numbers", format!("{:#}", e)))?;
    info!(deleted, "Cleared number list");

    Ok(Json(MessageResponse {
        message: format!("{} numbers deleted successfully", deleted),
    }))
}

async fn add_test_number_handler(
    Extension(state): Extension<AxumAppState>,
) -> ApiResult<(StatusCode, Json<TestNumberAdded>)> {
    let pool = &state.db_pool;
    let exists = MobileNumber::exists_active(TEST_NUMBER, pool)
        .await
        .map_err(|e| ApiError::internal("Error adding test number", format!("{:#}", e)))?;

    if !exists {
        MobileNumber::create(TEST_NUMBER, pool)
            .await
            .map_err(|e| ApiError::internal("Error adding test number", format!("{:#}", e)))?;
    }

    Ok((
        StatusCode::CREATED,
        Json(TestNumberAdded {
            message: "Test number added",
            number: TEST_NUMBER,
        }),
    ))
}
