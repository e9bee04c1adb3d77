pub mod blog;
pub mod shared;
pub mod tag;
pub mod upload;
