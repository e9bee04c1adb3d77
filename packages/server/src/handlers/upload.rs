use axum::Json;
use axum::extract::State;
use tracing::instrument;

use crate::error::{AppError, ErrorBody};
use crate::extractors::json::AppJson;
use crate::models::shared::ApiResponse;
use crate::models::upload::{SignUploadData, SignUploadRequest, validate_sign_upload};
use crate::state::AppState;
use crate::utils::filename::generate_object_key;

#[utoipa::path(
    post,
    path = "/sign",
    tag = "Uploads",
    operation_id = "signUpload",
    summary = "Get a presigned upload URL",
    description = "Derives a storage key from the content type (and, as a fallback, the original filename's extension), then returns a time-limited presigned PUT URL. The client uploads directly to object storage; this backend never relays bytes.",
    request_body = SignUploadRequest,
    responses(
        (status = 200, description = "Presigned URL and key", body = ApiResponse<SignUploadData>),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, payload), fields(content_type = %payload.content_type))]
pub async fn sign_upload(
    State(state): State<AppState>,
    AppJson(payload): AppJson<SignUploadRequest>,
) -> Result<Json<ApiResponse<SignUploadData>>, AppError> {
    validate_sign_upload(&payload)?;

    let key = generate_object_key(&payload.content_type, payload.file_name.as_deref());
    let url = state
        .store
        .presign_upload(&key, &payload.content_type)
        .await?;

    Ok(Json(ApiResponse::ok(
        "Signed upload URL fetched successfully",
        SignUploadData { url, key },
    )))
}
