use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// What a content block holds. TEXT blocks carry no media rows.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
    utoipa::ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum ContentKind {
    #[sea_orm(string_value = "TEXT")]
    #[serde(rename = "TEXT")]
    Text,
    #[sea_orm(string_value = "IMAGES")]
    #[serde(rename = "IMAGES")]
    Images,
    #[sea_orm(string_value = "VIDEOS")]
    #[serde(rename = "VIDEOS")]
    Videos,
}

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "content")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    pub blog_id: Uuid,
    #[sea_orm(belongs_to, from = "blog_id", to = "id")]
    pub blog: HasOne<super::blog::Entity>,

    pub kind: ContentKind,
    /// Display order within the owning blog. Unique per blog only.
    pub position: i32,
    pub title: Option<String>,
    pub description: Option<String>,

    #[sea_orm(has_many)]
    pub images: HasMany<super::content_image::Entity>,

    #[sea_orm(has_many)]
    pub videos: HasMany<super::content_video::Entity>,
}

impl ActiveModelBehavior for ActiveModel {}
