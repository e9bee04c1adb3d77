use chrono::{DateTime, Utc};
use sea_orm::Order;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::entity::{blog, content::ContentKind};
use crate::error::AppError;
use crate::service::{BlogAggregate, BlogPage, ContentBlock, normalize_tag_names};

pub use super::shared::{double_option, escape_like, validate_title};

/// Default page size for blog listings.
pub const DEFAULT_LIMIT: u64 = 10;

#[derive(Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateBlogRequest {
    pub title: String,
    /// Storage key of the cover image.
    pub cover_image: Option<String>,
    pub meta_title: Option<String>,
    pub meta_description: Option<String>,
    /// Estimated read time in minutes.
    pub read_time: Option<i32>,
    #[serde(default)]
    pub content: Vec<ContentBlockInput>,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// A content block in a create/add request, keyed by `type`.
///
/// Only the variant matching the declared type carries media, so a TEXT
/// block cannot smuggle images or videos past validation.
#[derive(Deserialize, utoipa::ToSchema)]
#[serde(tag = "type")]
pub enum ContentBlockInput {
    #[serde(rename = "TEXT")]
    Text {
        order: i32,
        title: Option<String>,
        description: Option<String>,
    },
    #[serde(rename = "IMAGES")]
    Images {
        order: i32,
        title: Option<String>,
        description: Option<String>,
        #[serde(default)]
        images: Vec<ContentImageInput>,
    },
    #[serde(rename = "VIDEOS")]
    Videos {
        order: i32,
        title: Option<String>,
        description: Option<String>,
        #[serde(default)]
        videos: Vec<ContentVideoInput>,
    },
}

#[derive(Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ContentImageInput {
    /// Storage reference of the image.
    pub url: String,
    pub alt_text: Option<String>,
    pub caption: Option<String>,
    #[serde(default)]
    pub order: i32,
}

#[derive(Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ContentVideoInput {
    pub url: String,
    pub thumbnail_url: Option<String>,
    pub title: Option<String>,
    /// Length in seconds, positive.
    pub duration: Option<i32>,
    #[serde(default)]
    pub order: i32,
}

#[derive(Deserialize, Default, PartialEq, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBlogRequest {
    pub title: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub cover_image: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub meta_title: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub meta_description: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub read_time: Option<Option<i32>>,
}

#[derive(Deserialize, utoipa::ToSchema)]
pub struct TagNamesRequest {
    pub tags: Vec<String>,
}

#[derive(Deserialize, Default, PartialEq, utoipa::ToSchema)]
pub struct UpdateContentRequest {
    #[serde(rename = "type")]
    pub kind: Option<ContentKind>,
    pub order: Option<i32>,
    #[serde(default, deserialize_with = "double_option")]
    pub title: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub description: Option<Option<String>>,
}

/// Raw query parameters of the blog listing endpoint.
///
/// Numeric and enumerated parameters are parsed permissively: anything
/// that does not parse or is outside the allowed set falls back to its
/// default instead of rejecting the request.
#[derive(Deserialize, Default, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct BlogListQuery {
    /// Tag filter; repeatable. A blog matches when it carries at least one
    /// of the requested tags.
    #[serde(default)]
    pub tags: Vec<String>,
    /// Case-insensitive substring match against title and meta fields.
    pub search: Option<String>,
    /// Page size, 1-100. Default 10.
    pub limit: Option<String>,
    /// Row offset. Ignored when `page` is present.
    pub offset: Option<String>,
    /// 1-based page number; translated to `offset = (page - 1) * limit`.
    pub page: Option<String>,
    /// One of `createdAt`, `updatedAt`, `viewCount`, `title`.
    #[serde(rename = "sortBy")]
    pub sort_by: Option<String>,
    /// `asc` or `desc`.
    #[serde(rename = "sortOrder")]
    pub sort_order: Option<String>,
}

/// Sortable blog columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BlogSortField {
    #[default]
    CreatedAt,
    UpdatedAt,
    ViewCount,
    Title,
}

impl BlogSortField {
    pub fn column(self) -> blog::Column {
        match self {
            Self::CreatedAt => blog::Column::CreatedAt,
            Self::UpdatedAt => blog::Column::UpdatedAt,
            Self::ViewCount => blog::Column::ViewCount,
            Self::Title => blog::Column::Title,
        }
    }
}

/// Typed filter consumed by the blog service.
#[derive(Debug, Clone)]
pub struct BlogFilter {
    pub tags: Vec<String>,
    pub search: Option<String>,
    pub limit: u64,
    pub offset: u64,
    pub sort_by: BlogSortField,
    pub sort_order: Order,
}

impl Default for BlogFilter {
    fn default() -> Self {
        Self {
            tags: Vec::new(),
            search: None,
            limit: DEFAULT_LIMIT,
            offset: 0,
            sort_by: BlogSortField::default(),
            sort_order: Order::Desc,
        }
    }
}

impl BlogListQuery {
    /// Resolve raw parameters into a typed filter, applying defaults.
    pub fn into_filter(self) -> BlogFilter {
        let limit = parse_number(self.limit.as_deref())
            .unwrap_or(DEFAULT_LIMIT)
            .clamp(1, 100);

        // `page` wins over `offset` when both are supplied.
        let offset = match parse_number(self.page.as_deref()) {
            Some(page) => page.saturating_sub(1) * limit,
            None => parse_number(self.offset.as_deref()).unwrap_or(0),
        };

        let sort_by = match self.sort_by.as_deref() {
            Some("createdAt") => BlogSortField::CreatedAt,
            Some("updatedAt") => BlogSortField::UpdatedAt,
            Some("viewCount") => BlogSortField::ViewCount,
            Some("title") => BlogSortField::Title,
            _ => BlogSortField::default(),
        };
        let sort_order = match self.sort_order.as_deref() {
            Some("asc") => Order::Asc,
            Some("desc") => Order::Desc,
            _ => Order::Desc,
        };

        BlogFilter {
            // Tag names are stored normalized, so the filter set must be too.
            tags: normalize_tag_names(&self.tags),
            search: self.search.filter(|s| !s.trim().is_empty()),
            limit,
            offset,
            sort_by,
            sort_order,
        }
    }
}

fn parse_number(raw: Option<&str>) -> Option<u64> {
    raw.and_then(|s| s.trim().parse().ok())
}

#[derive(Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BlogResponse {
    pub id: Uuid,
    pub title: String,
    pub cover_image: Option<String>,
    pub meta_title: Option<String>,
    pub meta_description: Option<String>,
    pub read_time: Option<i32>,
    pub view_count: i64,
    pub content: Vec<ContentBlockResponse>,
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A content block in a response, keyed by `type`.
#[derive(Serialize, utoipa::ToSchema)]
#[serde(tag = "type")]
pub enum ContentBlockResponse {
    #[serde(rename = "TEXT")]
    Text {
        id: Uuid,
        order: i32,
        title: Option<String>,
        description: Option<String>,
    },
    #[serde(rename = "IMAGES")]
    Images {
        id: Uuid,
        order: i32,
        title: Option<String>,
        description: Option<String>,
        images: Vec<ContentImageResponse>,
    },
    #[serde(rename = "VIDEOS")]
    Videos {
        id: Uuid,
        order: i32,
        title: Option<String>,
        description: Option<String>,
        videos: Vec<ContentVideoResponse>,
    },
}

#[derive(Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ContentImageResponse {
    pub id: Uuid,
    pub url: String,
    pub alt_text: Option<String>,
    pub caption: Option<String>,
    pub order: i32,
}

#[derive(Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ContentVideoResponse {
    pub id: Uuid,
    pub url: String,
    pub thumbnail_url: Option<String>,
    pub title: Option<String>,
    pub duration: Option<i32>,
    pub order: i32,
}

#[derive(Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BlogListData {
    pub blogs: Vec<BlogResponse>,
    /// Matching blogs across all pages.
    pub total: u64,
    /// Current 1-based page number.
    pub page: u64,
    pub total_pages: u64,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct BlogTagsData {
    pub tags: Vec<String>,
}

impl From<BlogAggregate> for BlogResponse {
    fn from(aggregate: BlogAggregate) -> Self {
        let BlogAggregate {
            blog,
            content,
            tags,
        } = aggregate;
        Self {
            id: blog.id,
            title: blog.title,
            cover_image: blog.cover_image,
            meta_title: blog.meta_title,
            meta_description: blog.meta_description,
            read_time: blog.read_time,
            view_count: blog.view_count,
            content: content.into_iter().map(Into::into).collect(),
            tags,
            created_at: blog.created_at,
            updated_at: blog.updated_at,
        }
    }
}

impl From<ContentBlock> for ContentBlockResponse {
    fn from(block: ContentBlock) -> Self {
        let ContentBlock {
            content,
            images,
            videos,
        } = block;
        match content.kind {
            ContentKind::Text => Self::Text {
                id: content.id,
                order: content.position,
                title: content.title,
                description: content.description,
            },
            ContentKind::Images => Self::Images {
                id: content.id,
                order: content.position,
                title: content.title,
                description: content.description,
                images: images.into_iter().map(Into::into).collect(),
            },
            ContentKind::Videos => Self::Videos {
                id: content.id,
                order: content.position,
                title: content.title,
                description: content.description,
                videos: videos.into_iter().map(Into::into).collect(),
            },
        }
    }
}

impl From<crate::entity::content_image::Model> for ContentImageResponse {
    fn from(m: crate::entity::content_image::Model) -> Self {
        Self {
            id: m.id,
            url: m.url,
            alt_text: m.alt_text,
            caption: m.caption,
            order: m.position,
        }
    }
}

impl From<crate::entity::content_video::Model> for ContentVideoResponse {
    fn from(m: crate::entity::content_video::Model) -> Self {
        Self {
            id: m.id,
            url: m.url,
            thumbnail_url: m.thumbnail_url,
            title: m.title,
            duration: m.duration,
            order: m.position,
        }
    }
}

impl From<BlogPage> for BlogListData {
    fn from(page: BlogPage) -> Self {
        Self {
            blogs: page.blogs.into_iter().map(Into::into).collect(),
            total: page.total,
            page: page.page,
            total_pages: page.total_pages,
        }
    }
}

pub fn validate_create_blog(req: &CreateBlogRequest) -> Result<(), AppError> {
    validate_title(&req.title)?;
    if let Some(rt) = req.read_time
        && rt <= 0
    {
        return Err(AppError::Validation("Read time must be positive".into()));
    }
    for block in &req.content {
        validate_content_block(block)?;
    }
    Ok(())
}

pub fn validate_content_block(block: &ContentBlockInput) -> Result<(), AppError> {
    match block {
        ContentBlockInput::Text { .. } => {}
        ContentBlockInput::Images { images, .. } => {
            for image in images {
                if image.url.trim().is_empty() {
                    return Err(AppError::Validation("Image url must not be empty".into()));
                }
            }
        }
        ContentBlockInput::Videos { videos, .. } => {
            for video in videos {
                if video.url.trim().is_empty() {
                    return Err(AppError::Validation("Video url must not be empty".into()));
                }
                if let Some(duration) = video.duration
                    && duration <= 0
                {
                    return Err(AppError::Validation(
                        "Video duration must be positive".into(),
                    ));
                }
            }
        }
    }
    Ok(())
}

pub fn validate_update_blog(req: &UpdateBlogRequest) -> Result<(), AppError> {
    if let Some(ref title) = req.title {
        validate_title(title)?;
    }
    if let Some(Some(rt)) = req.read_time
        && rt <= 0
    {
        return Err(AppError::Validation("Read time must be positive".into()));
    }
    Ok(())
}
