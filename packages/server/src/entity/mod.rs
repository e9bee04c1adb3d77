pub mod blog;
pub mod blog_tag;
pub mod content;
pub mod content_image;
pub mod content_video;
pub mod tag;
