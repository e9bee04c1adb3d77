use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "content_video")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    pub content_id: Uuid,
    #[sea_orm(belongs_to, from = "content_id", to = "id")]
    pub content: HasOne<super::content::Entity>,

    pub url: String,
    pub thumbnail_url: Option<String>,
    pub title: Option<String>,
    /// Length in seconds.
    pub duration: Option<i32>,
    pub position: i32,
}

impl ActiveModelBehavior for ActiveModel {}
