use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "blog_tag")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub blog_id: Uuid,
    #[sea_orm(primary_key, auto_increment = false)]
    pub tag_name: String,

    #[sea_orm(belongs_to, from = "blog_id", to = "id")]
    pub blog: HasOne<super::blog::Entity>,
    #[sea_orm(belongs_to, from = "tag_name", to = "name")]
    pub tag: HasOne<super::tag::Entity>,
}

impl ActiveModelBehavior for ActiveModel {}
