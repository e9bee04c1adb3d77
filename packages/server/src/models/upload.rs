use serde::{Deserialize, Serialize};

use crate::error::AppError;

#[derive(Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SignUploadRequest {
    /// MIME type the client will upload, e.g. "image/png".
    #[schema(example = "image/png")]
    pub content_type: String,
    /// Original filename; only its extension matters, and only when the
    /// content type is not recognized.
    #[schema(example = "holiday.png")]
    pub file_name: Option<String>,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct SignUploadData {
    /// Presigned PUT URL, valid for the configured expiration window.
    pub url: String,
    /// Storage key to persist alongside the blog content.
    #[schema(example = "image-1736601600000.png")]
    pub key: String,
}

pub fn validate_sign_upload(req: &SignUploadRequest) -> Result<(), AppError> {
    if req.content_type.trim().is_empty() {
        return Err(AppError::Validation("contentType is required".into()));
    }
    Ok(())
}
