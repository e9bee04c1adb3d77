use serde::Serialize;

use crate::service::TagUsage;

/// A tag together with the number of blogs referencing it.
#[derive(Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TagItem {
    #[schema(example = "rust")]
    pub name: String,
    #[schema(example = 3)]
    pub blog_count: u64,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct TagListData {
    pub tags: Vec<TagItem>,
}

impl From<TagUsage> for TagItem {
    fn from(usage: TagUsage) -> Self {
        Self {
            name: usage.name,
            blog_count: usage.blog_count,
        }
    }
}
