use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

use crate::handlers;
use crate::state::AppState;

pub fn routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .nest("/blogs", blog_routes())
        .nest("/tags", tag_routes())
        .nest("/uploads", upload_routes())
}

fn blog_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(
            handlers::blog::list_blogs,
            handlers::blog::create_blog
        ))
        .routes(routes!(
            handlers::blog::get_blog,
            handlers::blog::update_blog,
            handlers::blog::delete_blog
        ))
        .routes(routes!(handlers::blog::increment_view_count))
        .routes(routes!(handlers::blog::add_tags, handlers::blog::remove_tags))
        .routes(routes!(handlers::blog::add_content))
        .routes(routes!(
            handlers::blog::update_content,
            handlers::blog::delete_content
        ))
}

fn tag_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new().routes(routes!(handlers::tag::list_tags))
}

fn upload_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new().routes(routes!(handlers::upload::sign_upload))
}
