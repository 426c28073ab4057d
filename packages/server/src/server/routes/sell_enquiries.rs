//! `/api/sell-enquiries` routes. Create and update take multipart bodies with
//! `images`, `document` and `verificationDocs` file fields.

use axum::{
    extract::{Extension, Path, Query, Request},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::Serialize;

use crate::common::{ApiError, ApiResult, PageArgs, PageInfo};
use crate::domains::sell_enquiries::{
    create_enquiry, delete_enquiry, update_enquiry, SellEnquiry,
};
use crate::domains::uploads::{MultipartForm, SELL_ENQUIRY_RULES};
use crate::server::app::AxumAppState;
use crate::server::extract::{is_multipart, multipart_form};
use crate::server::middleware::AuthUser;

pub fn routes() -> Router {
    Router::new()
        .route("/", get(list_enquiries_handler).post(create_enquiry_handler))
        .route(
            "/:id",
            get(get_enquiry_handler)
                .put(update_enquiry_handler)
                .delete(delete_enquiry_handler),
        )
}

#[derive(Serialize)]
struct EnquiryResponse<T: Serialize> {
    success: bool,
    message: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<T>,
}

impl<T: Serialize> EnquiryResponse<T> {
    fn ok(message: &'static str, data: T) -> Json<Self> {
        Json(Self {
            success: true,
            message,
            data: Some(data),
        })
    }
}

#[derive(Serialize)]
struct EnquiryPage {
    success: bool,
    message: &'static str,
    data: Vec<SellEnquiry>,
    pagination: PageInfo,
}

fn enquiry_id(raw: &str) -> ApiResult<i64> {
    raw.parse()
        .map_err(|_| ApiError::not_found("Enquiry not found"))
}

async fn enquiry_form(request: Request) -> ApiResult<MultipartForm> {
    if is_multipart(request.headers()) {
        multipart_form(request, SELL_ENQUIRY_RULES, "Invalid file upload").await
    } else {
        Err(ApiError::bad_request_with(
            "Invalid file upload",
            "Expected a multipart/form-data body",
        ))
    }
}

async fn create_enquiry_handler(
    Extension(state): Extension<AxumAppState>,
    auth: Option<AuthUser>,
    request: Request,
) -> ApiResult<(StatusCode, Json<EnquiryResponse<SellEnquiry>>)> {
    let form = enquiry_form(request).await?;
    let enquiry = create_enquiry(form, auth.map(|user| user.user_id), &state.server_deps)
        .await
        .map_err(|e| e.into_api_error("Failed to create enquiry. Please try again."))?;

    Ok((
        StatusCode::CREATED,
        EnquiryResponse::ok("Property enquiry created successfully", enquiry),
    ))
}

async fn list_enquiries_handler(
    Extension(state): Extension<AxumAppState>,
    Query(args): Query<PageArgs>,
) -> ApiResult<Json<EnquiryPage>> {
    const FAILED: &str = "Failed to fetch enquiries. Please try again.";

    let page = args.validate();
    let data = SellEnquiry::find_page(page, &state.db_pool)
        .await
        .map_err(|e| ApiError::internal(FAILED, format!("{:#}", e)))?;
    let total = SellEnquiry::count(&state.db_pool)
        .await
        .map_err(|e| ApiError::internal(FAILED, format!("{:#}", e)))?;

    Ok(Json(EnquiryPage {
        success: true,
        message: "Enquiries fetched successfully",
        data,
        pagination: PageInfo::new(page, total),
    }))
}

async fn get_enquiry_handler(
    Extension(state): Extension<AxumAppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<EnquiryResponse<SellEnquiry>>> {
    let id = enquiry_id(&id)?;
    let enquiry = SellEnquiry::find_by_id(id, &state.db_pool)
        .await
        .map_err(|e| {
            ApiError::internal("Failed to fetch enquiry. Please try again.", format!("{:#}", e))
        })?
        .ok_or_else(|| ApiError::not_found("Enquiry not found"))?;

    Ok(EnquiryResponse::ok("Enquiry fetched successfully", enquiry))
}

async fn update_enquiry_handler(
    Extension(state): Extension<AxumAppState>,
    Path(id): Path<String>,
    request: Request,
) -> ApiResult<Json<EnquiryResponse<SellEnquiry>>> {
    let id = enquiry_id(&id)?;
    let form = enquiry_form(request).await?;
    let enquiry = update_enquiry(id, form, &state.server_deps)
        .await
        .map_err(|e| e.into_api_error("Failed to update enquiry. Please try again."))?;

    Ok(EnquiryResponse::ok("Enquiry updated successfully", enquiry))
}

async fn delete_enquiry_handler(
    Extension(state): Extension<AxumAppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<EnquiryResponse<()>>> {
    let id = enquiry_id(&id)?;
    delete_enquiry(id, &state.server_deps)
        .await
        .map_err(|e| e.into_api_error("Failed to delete enquiry. Please try again."))?;

    Ok(Json(EnquiryResponse {
        success: true,
        message: "Enquiry deleted successfully",
        data: None,
    }))
}
