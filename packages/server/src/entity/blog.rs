use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "blog")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    pub title: String,
    /// Storage key of the cover image, not a full URL.
    pub cover_image: Option<String>,
    pub meta_title: Option<String>,
    pub meta_description: Option<String>,
    /// Estimated read time in minutes.
    pub read_time: Option<i32>,
    #[sea_orm(default_value = 0)]
    pub view_count: i64,

    #[sea_orm(has_many)]
    pub content: HasMany<super::content::Entity>,

    #[sea_orm(has_many)]
    pub tags: HasMany<super::blog_tag::Entity>,

    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
