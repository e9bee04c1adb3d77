use std::collections::{HashMap, HashSet};

use chrono::Utc;
use sea_orm::sea_query::{Expr, ExprTrait, Func, LikeExpr, OnConflict, Query as SeaQuery};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Select, Set,
};
use uuid::Uuid;

use crate::entity::content::ContentKind;
use crate::entity::{blog, blog_tag, content, content_image, content_video, tag};
use crate::models::blog::{
    BlogFilter, ContentBlockInput, CreateBlogRequest, UpdateBlogRequest, UpdateContentRequest,
    escape_like,
};

/// A blog together with its owned content blocks, their media, and the
/// associated tag names: one consistency unit for reads and writes.
#[derive(Debug, Clone)]
pub struct BlogAggregate {
    pub blog: blog::Model,
    /// Ordered by ascending position.
    pub content: Vec<ContentBlock>,
    /// Ordered by name.
    pub tags: Vec<String>,
}

/// One content block with its media rows, each ordered by ascending position.
#[derive(Debug, Clone)]
pub struct ContentBlock {
    pub content: content::Model,
    pub images: Vec<content_image::Model>,
    pub videos: Vec<content_video::Model>,
}

/// One page of a filtered blog listing.
#[derive(Debug, Clone)]
pub struct BlogPage {
    pub blogs: Vec<BlogAggregate>,
    /// Matches across all pages, ignoring limit/offset.
    pub total: u64,
    pub page: u64,
    pub total_pages: u64,
}

#[derive(Debug, Clone)]
pub struct TagUsage {
    pub name: String,
    pub blog_count: u64,
}

/// Orchestrates aggregate reads and writes over an explicit connection
/// handle. Handlers pass a transaction for multi-row writes and the plain
/// connection for reads; the service never opens transactions itself.
pub struct BlogService<'a, C: ConnectionTrait> {
    conn: &'a C,
}

/// Normalize user-supplied tag names: trim, lower-case, drop empties and
/// duplicates while preserving first-seen order.
pub fn normalize_tag_names(names: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for name in names {
        let normalized = name.trim().to_lowercase();
        if normalized.is_empty() {
            continue;
        }
        if seen.insert(normalized.clone()) {
            out.push(normalized);
        }
    }
    out
}

impl<'a, C: ConnectionTrait> BlogService<'a, C> {
    pub fn new(conn: &'a C) -> Self {
        Self { conn }
    }

    /// Persist a blog together with its content blocks, media and tags.
    ///
    /// Must run inside a transaction: a failure at any step leaves nothing
    /// behind once the caller rolls back.
    pub async fn create_blog(&self, payload: CreateBlogRequest) -> Result<BlogAggregate, DbErr> {
        let now = Utc::now();
        let blog_id = Uuid::now_v7();

        let new_blog = blog::ActiveModel {
            id: Set(blog_id),
            title: Set(payload.title.trim().to_string()),
            cover_image: Set(payload.cover_image),
            meta_title: Set(payload.meta_title),
            meta_description: Set(payload.meta_description),
            read_time: Set(payload.read_time),
            view_count: Set(0),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };
        new_blog.insert(self.conn).await?;

        for block in payload.content {
            self.insert_content_block(blog_id, block).await?;
        }

        let names = normalize_tag_names(&payload.tags);
        self.upsert_tags(&names).await?;
        self.associate_tags(blog_id, &names).await?;

        self.load_aggregate(blog_id)
            .await?
            .ok_or_else(|| DbErr::RecordNotFound("blog vanished during creation".into()))
    }

    /// Filtered, sorted, paginated listing with fully assembled aggregates.
    pub async fn list_blogs(&self, filter: &BlogFilter) -> Result<BlogPage, DbErr> {
        let select = self.filtered(filter);

        let total = select.clone().count(self.conn).await?;

        let rows = select
            .order_by(filter.sort_by.column(), filter.sort_order.clone())
            .offset(Some(filter.offset))
            .limit(Some(filter.limit))
            .all(self.conn)
            .await?;

        let blogs = self.assemble(rows).await?;

        Ok(BlogPage {
            blogs,
            total,
            page: filter.offset / filter.limit + 1,
            total_pages: total.div_ceil(filter.limit),
        })
    }

    pub async fn get_blog(&self, id: Uuid) -> Result<Option<BlogAggregate>, DbErr> {
        self.load_aggregate(id).await
    }

    /// Update top-level scalar fields only; content and tags are managed
    /// through their own operations.
    pub async fn update_blog(
        &self,
        id: Uuid,
        payload: UpdateBlogRequest,
    ) -> Result<Option<BlogAggregate>, DbErr> {
        let Some(existing) = blog::Entity::find_by_id(id).one(self.conn).await? else {
            return Ok(None);
        };

        let mut active: blog::ActiveModel = existing.into();
        if let Some(title) = payload.title {
            active.title = Set(title.trim().to_string());
        }
        if let Some(cover_image) = payload.cover_image {
            active.cover_image = Set(cover_image);
        }
        if let Some(meta_title) = payload.meta_title {
            active.meta_title = Set(meta_title);
        }
        if let Some(meta_description) = payload.meta_description {
            active.meta_description = Set(meta_description);
        }
        if let Some(read_time) = payload.read_time {
            active.read_time = Set(read_time);
        }
        active.updated_at = Set(Utc::now());
        active.update(self.conn).await?;

        self.load_aggregate(id).await
    }

    /// Delete a blog and everything it owns. Shared tag rows stay.
    ///
    /// Returns `false` when the blog does not exist.
    pub async fn delete_blog(&self, id: Uuid) -> Result<bool, DbErr> {
        if blog::Entity::find_by_id(id).one(self.conn).await?.is_none() {
            return Ok(false);
        }

        let owned_content = SeaQuery::select()
            .column(content::Column::Id)
            .from(content::Entity)
            .and_where(content::Column::BlogId.eq(id))
            .to_owned();

        content_image::Entity::delete_many()
            .filter(content_image::Column::ContentId.in_subquery(owned_content.clone()))
            .exec(self.conn)
            .await?;
        content_video::Entity::delete_many()
            .filter(content_video::Column::ContentId.in_subquery(owned_content))
            .exec(self.conn)
            .await?;
        content::Entity::delete_many()
            .filter(content::Column::BlogId.eq(id))
            .exec(self.conn)
            .await?;
        blog_tag::Entity::delete_many()
            .filter(blog_tag::Column::BlogId.eq(id))
            .exec(self.conn)
            .await?;
        blog::Entity::delete_by_id(id).exec(self.conn).await?;

        Ok(true)
    }

    /// Bump the view counter by exactly one with a store-level arithmetic
    /// update, so concurrent increments never lose writes.
    pub async fn increment_view_count(&self, id: Uuid) -> Result<Option<blog::Model>, DbErr> {
        let result = blog::Entity::update_many()
            .col_expr(
                blog::Column::ViewCount,
                Expr::col(blog::Column::ViewCount).add(1),
            )
            .filter(blog::Column::Id.eq(id))
            .exec(self.conn)
            .await?;

        if result.rows_affected == 0 {
            return Ok(None);
        }
        blog::Entity::find_by_id(id).one(self.conn).await
    }

    /// Associate tags with a blog, creating missing tag rows first.
    /// Already-associated names are skipped. Returns the current tag set.
    pub async fn add_tags(
        &self,
        blog_id: Uuid,
        names: &[String],
    ) -> Result<Option<Vec<String>>, DbErr> {
        if !self.blog_exists(blog_id).await? {
            return Ok(None);
        }

        let names = normalize_tag_names(names);
        self.upsert_tags(&names).await?;
        self.associate_tags(blog_id, &names).await?;

        Ok(Some(self.tag_names(blog_id).await?))
    }

    /// Drop only the requested associations; tag rows themselves survive.
    /// Returns the remaining tag set.
    pub async fn remove_tags(
        &self,
        blog_id: Uuid,
        names: &[String],
    ) -> Result<Option<Vec<String>>, DbErr> {
        if !self.blog_exists(blog_id).await? {
            return Ok(None);
        }

        let names = normalize_tag_names(names);
        if !names.is_empty() {
            blog_tag::Entity::delete_many()
                .filter(blog_tag::Column::BlogId.eq(blog_id))
                .filter(blog_tag::Column::TagName.is_in(names))
                .exec(self.conn)
                .await?;
        }

        Ok(Some(self.tag_names(blog_id).await?))
    }

    /// Add one content block (with media) to an existing blog.
    pub async fn add_content(
        &self,
        blog_id: Uuid,
        block: ContentBlockInput,
    ) -> Result<Option<ContentBlock>, DbErr> {
        if !self.blog_exists(blog_id).await? {
            return Ok(None);
        }

        let model = self.insert_content_block(blog_id, block).await?;
        self.load_content_block(model.id).await
    }

    /// One content block with its media, when it belongs to the blog.
    pub async fn get_content(
        &self,
        blog_id: Uuid,
        content_id: Uuid,
    ) -> Result<Option<ContentBlock>, DbErr> {
        if self.find_owned_content(blog_id, content_id).await?.is_none() {
            return Ok(None);
        }
        self.load_content_block(content_id).await
    }

    /// Update the scalar fields of one content block. Media arrays are not
    /// touched here.
    pub async fn update_content(
        &self,
        blog_id: Uuid,
        content_id: Uuid,
        payload: UpdateContentRequest,
    ) -> Result<Option<ContentBlock>, DbErr> {
        let Some(existing) = self.find_owned_content(blog_id, content_id).await? else {
            return Ok(None);
        };

        let mut active: content::ActiveModel = existing.into();
        if let Some(kind) = payload.kind {
            active.kind = Set(kind);
        }
        if let Some(order) = payload.order {
            active.position = Set(order);
        }
        if let Some(title) = payload.title {
            active.title = Set(title);
        }
        if let Some(description) = payload.description {
            active.description = Set(description);
        }
        active.update(self.conn).await?;

        self.load_content_block(content_id).await
    }

    /// Delete one content block and its media.
    pub async fn delete_content(&self, blog_id: Uuid, content_id: Uuid) -> Result<bool, DbErr> {
        if self.find_owned_content(blog_id, content_id).await?.is_none() {
            return Ok(false);
        }

        content_image::Entity::delete_many()
            .filter(content_image::Column::ContentId.eq(content_id))
            .exec(self.conn)
            .await?;
        content_video::Entity::delete_many()
            .filter(content_video::Column::ContentId.eq(content_id))
            .exec(self.conn)
            .await?;
        content::Entity::delete_by_id(content_id).exec(self.conn).await?;

        Ok(true)
    }

    /// All tags ordered by name, with the number of blogs using each.
    pub async fn list_tags(&self) -> Result<Vec<TagUsage>, DbErr> {
        let tags = tag::Entity::find()
            .order_by_asc(tag::Column::Name)
            .all(self.conn)
            .await?;

        let counts: Vec<(String, i64)> = blog_tag::Entity::find()
            .select_only()
            .column(blog_tag::Column::TagName)
            .column_as(blog_tag::Column::BlogId.count(), "blog_count")
            .group_by(blog_tag::Column::TagName)
            .into_tuple()
            .all(self.conn)
            .await?;
        let mut by_name: HashMap<String, u64> = counts
            .into_iter()
            .map(|(name, count)| (name, count as u64))
            .collect();

        Ok(tags
            .into_iter()
            .map(|t| TagUsage {
                blog_count: by_name.remove(&t.name).unwrap_or(0),
                name: t.name,
            })
            .collect())
    }

    /// Build the filtered (unsorted, unpaginated) selection shared by the
    /// listing query and its total count.
    fn filtered(&self, filter: &BlogFilter) -> Select<blog::Entity> {
        let mut select = blog::Entity::find();

        if !filter.tags.is_empty() {
            // Match-any: at least one association with a requested tag.
            select = select.filter(
                blog::Column::Id.in_subquery(
                    SeaQuery::select()
                        .column(blog_tag::Column::BlogId)
                        .from(blog_tag::Entity)
                        .and_where(blog_tag::Column::TagName.is_in(filter.tags.clone()))
                        .to_owned(),
                ),
            );
        }

        if let Some(ref search) = filter.search {
            let term = escape_like(search.trim());
            if !term.is_empty() {
                let pattern = format!("%{}%", term.to_lowercase());
                let matches = |column: blog::Column| {
                    Expr::expr(Func::lower(Expr::col(column)))
                        .like(LikeExpr::new(pattern.clone()).escape('\\'))
                };
                select = select.filter(
                    Condition::any()
                        .add(matches(blog::Column::Title))
                        .add(matches(blog::Column::MetaTitle))
                        .add(matches(blog::Column::MetaDescription)),
                );
            }
        }

        select
    }

    async fn insert_content_block(
        &self,
        blog_id: Uuid,
        block: ContentBlockInput,
    ) -> Result<content::Model, DbErr> {
        let (kind, order, title, description, images, videos) = match block {
            ContentBlockInput::Text {
                order,
                title,
                description,
            } => (ContentKind::Text, order, title, description, vec![], vec![]),
            ContentBlockInput::Images {
                order,
                title,
                description,
                images,
            } => (ContentKind::Images, order, title, description, images, vec![]),
            ContentBlockInput::Videos {
                order,
                title,
                description,
                videos,
            } => (ContentKind::Videos, order, title, description, vec![], videos),
        };

        let content_id = Uuid::now_v7();
        let model = content::ActiveModel {
            id: Set(content_id),
            blog_id: Set(blog_id),
            kind: Set(kind),
            position: Set(order),
            title: Set(title),
            description: Set(description),
            ..Default::default()
        }
        .insert(self.conn)
        .await?;

        if !images.is_empty() {
            let rows = images.into_iter().map(|image| content_image::ActiveModel {
                id: Set(Uuid::now_v7()),
                content_id: Set(content_id),
                url: Set(image.url),
                alt_text: Set(image.alt_text),
                caption: Set(image.caption),
                position: Set(image.order),
                ..Default::default()
            });
            content_image::Entity::insert_many(rows)
                .exec_without_returning(self.conn)
                .await?;
        }

        if !videos.is_empty() {
            let rows = videos.into_iter().map(|video| content_video::ActiveModel {
                id: Set(Uuid::now_v7()),
                content_id: Set(content_id),
                url: Set(video.url),
                thumbnail_url: Set(video.thumbnail_url),
                title: Set(video.title),
                duration: Set(video.duration),
                position: Set(video.order),
                ..Default::default()
            });
            content_video::Entity::insert_many(rows)
                .exec_without_returning(self.conn)
                .await?;
        }

        Ok(model)
    }

    /// Insert missing tag rows. Must run before any association insert
    /// referencing the names.
    async fn upsert_tags(&self, names: &[String]) -> Result<(), DbErr> {
        for name in names {
            let model = tag::ActiveModel {
                name: Set(name.clone()),
                ..Default::default()
            };
            let result = tag::Entity::insert(model)
                .on_conflict(
                    OnConflict::column(tag::Column::Name)
                        .do_nothing()
                        .to_owned(),
                )
                .exec_without_returning(self.conn)
                .await;
            match result {
                Ok(_) | Err(DbErr::RecordNotInserted) => {}
                Err(e) => return Err(e),
            }
        }
        Ok(())
    }

    /// Insert blog-tag associations, skipping names already associated.
    async fn associate_tags(&self, blog_id: Uuid, names: &[String]) -> Result<(), DbErr> {
        if names.is_empty() {
            return Ok(());
        }

        let existing: HashSet<String> = blog_tag::Entity::find()
            .filter(blog_tag::Column::BlogId.eq(blog_id))
            .filter(blog_tag::Column::TagName.is_in(names.to_vec()))
            .select_only()
            .column(blog_tag::Column::TagName)
            .into_tuple::<String>()
            .all(self.conn)
            .await?
            .into_iter()
            .collect();

        let rows: Vec<blog_tag::ActiveModel> = names
            .iter()
            .filter(|name| !existing.contains(*name))
            .map(|name| blog_tag::ActiveModel {
                blog_id: Set(blog_id),
                tag_name: Set(name.clone()),
                ..Default::default()
            })
            .collect();

        if rows.is_empty() {
            return Ok(());
        }

        let result = blog_tag::Entity::insert_many(rows)
            .on_conflict(
                OnConflict::columns([blog_tag::Column::BlogId, blog_tag::Column::TagName])
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(self.conn)
            .await;
        match result {
            Ok(_) | Err(DbErr::RecordNotInserted) => Ok(()),
            Err(e) => Err(e),
        }
    }

    async fn blog_exists(&self, id: Uuid) -> Result<bool, DbErr> {
        Ok(blog::Entity::find_by_id(id).one(self.conn).await?.is_some())
    }

    async fn tag_names(&self, blog_id: Uuid) -> Result<Vec<String>, DbErr> {
        blog_tag::Entity::find()
            .filter(blog_tag::Column::BlogId.eq(blog_id))
            .select_only()
            .column(blog_tag::Column::TagName)
            .order_by_asc(blog_tag::Column::TagName)
            .into_tuple()
            .all(self.conn)
            .await
    }

    async fn find_owned_content(
        &self,
        blog_id: Uuid,
        content_id: Uuid,
    ) -> Result<Option<content::Model>, DbErr> {
        let Some(model) = content::Entity::find_by_id(content_id).one(self.conn).await? else {
            return Ok(None);
        };
        // A block addressed through the wrong blog stays invisible.
        if model.blog_id != blog_id {
            return Ok(None);
        }
        Ok(Some(model))
    }

    async fn load_aggregate(&self, id: Uuid) -> Result<Option<BlogAggregate>, DbErr> {
        let Some(model) = blog::Entity::find_by_id(id).one(self.conn).await? else {
            return Ok(None);
        };
        let mut aggregates = self.assemble(vec![model]).await?;
        Ok(aggregates.pop())
    }

    async fn load_content_block(&self, id: Uuid) -> Result<Option<ContentBlock>, DbErr> {
        let Some(model) = content::Entity::find_by_id(id).one(self.conn).await? else {
            return Ok(None);
        };

        let images = content_image::Entity::find()
            .filter(content_image::Column::ContentId.eq(id))
            .order_by_asc(content_image::Column::Position)
            .all(self.conn)
            .await?;
        let videos = content_video::Entity::find()
            .filter(content_video::Column::ContentId.eq(id))
            .order_by_asc(content_video::Column::Position)
            .all(self.conn)
            .await?;

        Ok(Some(ContentBlock {
            content: model,
            images,
            videos,
        }))
    }

    /// Eager-load relations for a batch of blog rows in four queries, then
    /// stitch the aggregates together in process.
    async fn assemble(&self, blogs: Vec<blog::Model>) -> Result<Vec<BlogAggregate>, DbErr> {
        if blogs.is_empty() {
            return Ok(Vec::new());
        }

        let blog_ids: Vec<Uuid> = blogs.iter().map(|b| b.id).collect();

        let contents = content::Entity::find()
            .filter(content::Column::BlogId.is_in(blog_ids.clone()))
            .order_by_asc(content::Column::Position)
            .all(self.conn)
            .await?;
        let content_ids: Vec<Uuid> = contents.iter().map(|c| c.id).collect();

        let mut images_by_content: HashMap<Uuid, Vec<content_image::Model>> = HashMap::new();
        let mut videos_by_content: HashMap<Uuid, Vec<content_video::Model>> = HashMap::new();
        if !content_ids.is_empty() {
            let images = content_image::Entity::find()
                .filter(content_image::Column::ContentId.is_in(content_ids.clone()))
                .order_by_asc(content_image::Column::Position)
                .all(self.conn)
                .await?;
            for image in images {
                images_by_content
                    .entry(image.content_id)
                    .or_default()
                    .push(image);
            }

            let videos = content_video::Entity::find()
                .filter(content_video::Column::ContentId.is_in(content_ids))
                .order_by_asc(content_video::Column::Position)
                .all(self.conn)
                .await?;
            for video in videos {
                videos_by_content
                    .entry(video.content_id)
                    .or_default()
                    .push(video);
            }
        }

        let mut tags_by_blog: HashMap<Uuid, Vec<String>> = HashMap::new();
        let tag_rows = blog_tag::Entity::find()
            .filter(blog_tag::Column::BlogId.is_in(blog_ids))
            .order_by_asc(blog_tag::Column::TagName)
            .all(self.conn)
            .await?;
        for row in tag_rows {
            tags_by_blog
                .entry(row.blog_id)
                .or_default()
                .push(row.tag_name);
        }

        // `contents` is globally ordered by position, so per-blog grouping
        // preserves ascending order.
        let mut content_by_blog: HashMap<Uuid, Vec<ContentBlock>> = HashMap::new();
        for model in contents {
            let block = ContentBlock {
                images: images_by_content.remove(&model.id).unwrap_or_default(),
                videos: videos_by_content.remove(&model.id).unwrap_or_default(),
                content: model,
            };
            content_by_blog
                .entry(block.content.blog_id)
                .or_default()
                .push(block);
        }

        Ok(blogs
            .into_iter()
            .map(|b| BlogAggregate {
                content: content_by_blog.remove(&b.id).unwrap_or_default(),
                tags: tags_by_blog.remove(&b.id).unwrap_or_default(),
                blog: b,
            })
            .collect())
    }
}
