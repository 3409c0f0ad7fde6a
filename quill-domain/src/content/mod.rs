mod post;
mod site;

pub use post::{BlogPost, BlogPostMetadata, PublishStatus};
pub use site::SiteMetadata;
