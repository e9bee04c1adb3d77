use axum::Json;
use axum::extract::State;
use tracing::instrument;

use crate::error::AppError;
use crate::models::shared::ApiResponse;
use crate::models::tag::{TagItem, TagListData};
use crate::service::BlogService;
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/",
    tag = "Tags",
    operation_id = "listTags",
    summary = "List all tags",
    description = "Returns the whole tag vocabulary ordered by name, each with the number of blogs referencing it.",
    responses(
        (status = 200, description = "All tags", body = ApiResponse<TagListData>),
    ),
)]
#[instrument(skip(state))]
pub async fn list_tags(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<TagListData>>, AppError> {
    let tags = BlogService::new(&state.db).list_tags().await?;

    Ok(Json(ApiResponse::ok(
        "Tags retrieved successfully",
        TagListData {
            tags: tags.into_iter().map(TagItem::from).collect(),
        },
    )))
}
