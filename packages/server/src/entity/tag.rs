use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Shared tag vocabulary. Tags are created lazily on first use and are
/// never deleted when the last blog stops referencing them.
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "tag")]
pub struct Model {
    /// Natural key, stored trimmed and lower-cased.
    #[sea_orm(primary_key, auto_increment = false)]
    pub name: String,

    #[sea_orm(has_many)]
    pub blogs: HasMany<super::blog_tag::Entity>,
}

impl ActiveModelBehavior for ActiveModel {}
