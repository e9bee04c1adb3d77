use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum_extra::extract::Query;
use sea_orm::TransactionTrait;
use tracing::instrument;
use uuid::Uuid;

use crate::error::{AppError, ErrorBody};
use crate::extractors::json::AppJson;
use crate::models::blog::*;
use crate::models::shared::ApiResponse;
use crate::service::BlogService;
use crate::state::AppState;

#[utoipa::path(
    post,
    path = "/",
    tag = "Blogs",
    operation_id = "createBlog",
    summary = "Create a blog with nested content and tags",
    description = "Creates a blog post together with its ordered content blocks, their media, and tag associations in one atomic operation. Tags are created on first use. Returns the fully assembled aggregate.",
    request_body = CreateBlogRequest,
    responses(
        (status = 201, description = "Blog created", body = ApiResponse<BlogResponse>),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, payload), fields(title = %payload.title))]
pub async fn create_blog(
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateBlogRequest>,
) -> Result<impl IntoResponse, AppError> {
    // Fail fast: no transaction is opened for an invalid payload.
    validate_create_blog(&payload)?;

    let txn = state.db.begin().await?;
    let aggregate = BlogService::new(&txn).create_blog(payload).await?;
    txn.commit().await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(
            "Blog created successfully",
            BlogResponse::from(aggregate),
        )),
    ))
}

#[utoipa::path(
    get,
    path = "/",
    tag = "Blogs",
    operation_id = "listBlogs",
    summary = "List blogs with filters, sorting and pagination",
    description = "Returns a page of blog aggregates. Supports a match-any tag filter, case-insensitive substring search across title and meta fields, and sorting by `createdAt` (default, desc), `updatedAt`, `viewCount` or `title`. Unknown sort parameters fall back to the defaults.",
    params(BlogListQuery),
    responses(
        (status = 200, description = "Page of blogs", body = ApiResponse<BlogListData>),
    ),
)]
#[instrument(skip(state, query))]
pub async fn list_blogs(
    State(state): State<AppState>,
    Query(query): Query<BlogListQuery>,
) -> Result<Json<ApiResponse<BlogListData>>, AppError> {
    let filter = query.into_filter();
    let page = BlogService::new(&state.db).list_blogs(&filter).await?;

    Ok(Json(ApiResponse::ok(
        "Blogs retrieved successfully",
        BlogListData::from(page),
    )))
}

#[utoipa::path(
    get,
    path = "/{id}",
    tag = "Blogs",
    operation_id = "getBlog",
    summary = "Get a blog by ID",
    description = "Returns the full aggregate: blog fields, content blocks with media ordered ascending, and tags.",
    params(("id" = Uuid, Path, description = "Blog ID")),
    responses(
        (status = 200, description = "Blog details", body = ApiResponse<BlogResponse>),
        (status = 404, description = "Blog not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state), fields(id))]
pub async fn get_blog(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<BlogResponse>>, AppError> {
    let aggregate = BlogService::new(&state.db)
        .get_blog(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Blog not found".into()))?;

    Ok(Json(ApiResponse::ok(
        "Blog retrieved successfully",
        BlogResponse::from(aggregate),
    )))
}

#[utoipa::path(
    patch,
    path = "/{id}",
    tag = "Blogs",
    operation_id = "updateBlog",
    summary = "Update a blog's top-level fields",
    description = "Partially updates the blog's scalar fields (title, coverImage, metaTitle, metaDescription, readTime). Content blocks and tags are managed through their own endpoints. An empty payload returns the current aggregate unchanged.",
    params(("id" = Uuid, Path, description = "Blog ID")),
    request_body = UpdateBlogRequest,
    responses(
        (status = 200, description = "Blog updated", body = ApiResponse<BlogResponse>),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 404, description = "Blog not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, payload), fields(id))]
pub async fn update_blog(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    AppJson(payload): AppJson<UpdateBlogRequest>,
) -> Result<Json<ApiResponse<BlogResponse>>, AppError> {
    validate_update_blog(&payload)?;

    if payload == UpdateBlogRequest::default() {
        return get_blog(State(state), Path(id)).await;
    }

    let txn = state.db.begin().await?;
    let aggregate = BlogService::new(&txn)
        .update_blog(id, payload)
        .await?
        .ok_or_else(|| AppError::NotFound("Blog not found".into()))?;
    txn.commit().await?;

    Ok(Json(ApiResponse::ok(
        "Blog updated successfully",
        BlogResponse::from(aggregate),
    )))
}

#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "Blogs",
    operation_id = "deleteBlog",
    summary = "Delete a blog",
    description = "Removes the blog together with its content blocks, media and tag associations. Shared tag rows are left intact.",
    params(("id" = Uuid, Path, description = "Blog ID")),
    responses(
        (status = 200, description = "Blog deleted"),
        (status = 404, description = "Blog not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state), fields(id))]
pub async fn delete_blog(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let txn = state.db.begin().await?;
    let deleted = BlogService::new(&txn).delete_blog(id).await?;
    if !deleted {
        return Err(AppError::NotFound("Blog not found".into()));
    }
    txn.commit().await?;

    Ok(Json(ApiResponse::message("Blog deleted successfully")))
}

#[utoipa::path(
    post,
    path = "/{id}/view",
    tag = "Blogs",
    operation_id = "incrementViewCount",
    summary = "Increment a blog's view count",
    description = "Atomically increments the view counter by one. Safe under concurrent invocation for the same blog.",
    params(("id" = Uuid, Path, description = "Blog ID")),
    responses(
        (status = 200, description = "View recorded", body = ApiResponse<BlogResponse>),
        (status = 404, description = "Blog not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state), fields(id))]
pub async fn increment_view_count(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<BlogResponse>>, AppError> {
    let service = BlogService::new(&state.db);
    service
        .increment_view_count(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Blog not found".into()))?;

    let aggregate = service
        .get_blog(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Blog not found".into()))?;

    Ok(Json(ApiResponse::ok(
        "View count incremented",
        BlogResponse::from(aggregate),
    )))
}

#[utoipa::path(
    post,
    path = "/{id}/tags",
    tag = "Blogs",
    operation_id = "addTags",
    summary = "Associate tags with a blog",
    description = "Creates missing tag rows, then associates the requested names with the blog. Names are trimmed and lower-cased; already-associated names are skipped, so the operation is idempotent. Returns the blog's current tag set.",
    params(("id" = Uuid, Path, description = "Blog ID")),
    request_body = TagNamesRequest,
    responses(
        (status = 200, description = "Current tag set", body = ApiResponse<BlogTagsData>),
        (status = 404, description = "Blog not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, payload), fields(id))]
pub async fn add_tags(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    AppJson(payload): AppJson<TagNamesRequest>,
) -> Result<Json<ApiResponse<BlogTagsData>>, AppError> {
    let txn = state.db.begin().await?;
    let tags = BlogService::new(&txn)
        .add_tags(id, &payload.tags)
        .await?
        .ok_or_else(|| AppError::NotFound("Blog not found".into()))?;
    txn.commit().await?;

    Ok(Json(ApiResponse::ok(
        "Tags added successfully",
        BlogTagsData { tags },
    )))
}

#[utoipa::path(
    delete,
    path = "/{id}/tags",
    tag = "Blogs",
    operation_id = "removeTags",
    summary = "Remove tag associations from a blog",
    description = "Deletes only the requested (blog, tag) pairs. The tag rows themselves are never removed. Returns the blog's remaining tag set.",
    params(("id" = Uuid, Path, description = "Blog ID")),
    request_body = TagNamesRequest,
    responses(
        (status = 200, description = "Remaining tag set", body = ApiResponse<BlogTagsData>),
        (status = 404, description = "Blog not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, payload), fields(id))]
pub async fn remove_tags(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    AppJson(payload): AppJson<TagNamesRequest>,
) -> Result<Json<ApiResponse<BlogTagsData>>, AppError> {
    let tags = BlogService::new(&state.db)
        .remove_tags(id, &payload.tags)
        .await?
        .ok_or_else(|| AppError::NotFound("Blog not found".into()))?;

    Ok(Json(ApiResponse::ok(
        "Tags removed successfully",
        BlogTagsData { tags },
    )))
}

#[utoipa::path(
    post,
    path = "/{id}/content",
    tag = "Content",
    operation_id = "addContent",
    summary = "Add a content block to a blog",
    description = "Inserts one content block (with its media, when the type carries any) into an existing blog, following the same nested insert sequence as blog creation.",
    params(("id" = Uuid, Path, description = "Blog ID")),
    request_body = ContentBlockInput,
    responses(
        (status = 201, description = "Content block created", body = ApiResponse<ContentBlockResponse>),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 404, description = "Blog not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, payload), fields(id))]
pub async fn add_content(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    AppJson(payload): AppJson<ContentBlockInput>,
) -> Result<impl IntoResponse, AppError> {
    validate_content_block(&payload)?;

    let txn = state.db.begin().await?;
    let block = BlogService::new(&txn)
        .add_content(id, payload)
        .await?
        .ok_or_else(|| AppError::NotFound("Blog not found".into()))?;
    txn.commit().await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(
            "Content added successfully",
            ContentBlockResponse::from(block),
        )),
    ))
}

#[utoipa::path(
    patch,
    path = "/{id}/content/{content_id}",
    tag = "Content",
    operation_id = "updateContent",
    summary = "Update a content block's scalar fields",
    description = "Partially updates type, order, title or description of one content block. Media arrays are excluded from scalar updates. The block must belong to the addressed blog.",
    params(
        ("id" = Uuid, Path, description = "Blog ID"),
        ("content_id" = Uuid, Path, description = "Content block ID"),
    ),
    request_body = UpdateContentRequest,
    responses(
        (status = 200, description = "Content block updated", body = ApiResponse<ContentBlockResponse>),
        (status = 404, description = "Content block not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, payload), fields(id, content_id))]
pub async fn update_content(
    State(state): State<AppState>,
    Path((id, content_id)): Path<(Uuid, Uuid)>,
    AppJson(payload): AppJson<UpdateContentRequest>,
) -> Result<Json<ApiResponse<ContentBlockResponse>>, AppError> {
    if payload == UpdateContentRequest::default() {
        let block = BlogService::new(&state.db)
            .get_content(id, content_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Content block not found".into()))?;
        return Ok(Json(ApiResponse::ok(
            "Content updated successfully",
            ContentBlockResponse::from(block),
        )));
    }

    let txn = state.db.begin().await?;
    let block = BlogService::new(&txn)
        .update_content(id, content_id, payload)
        .await?
        .ok_or_else(|| AppError::NotFound("Content block not found".into()))?;
    txn.commit().await?;

    Ok(Json(ApiResponse::ok(
        "Content updated successfully",
        ContentBlockResponse::from(block),
    )))
}

#[utoipa::path(
    delete,
    path = "/{id}/content/{content_id}",
    tag = "Content",
    operation_id = "deleteContent",
    summary = "Delete a content block",
    description = "Removes one content block and its media rows. The block must belong to the addressed blog.",
    params(
        ("id" = Uuid, Path, description = "Blog ID"),
        ("content_id" = Uuid, Path, description = "Content block ID"),
    ),
    responses(
        (status = 200, description = "Content block deleted"),
        (status = 404, description = "Content block not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state), fields(id, content_id))]
pub async fn delete_content(
    State(state): State<AppState>,
    Path((id, content_id)): Path<(Uuid, Uuid)>,
) -> Result<impl IntoResponse, AppError> {
    let txn = state.db.begin().await?;
    let deleted = BlogService::new(&txn).delete_content(id, content_id).await?;
    if !deleted {
        return Err(AppError::NotFound("Content block not found".into()));
    }
    txn.commit().await?;

    Ok(Json(ApiResponse::message("Content deleted successfully")))
}
