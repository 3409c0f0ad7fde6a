pub mod content;
pub mod media;
pub mod security;
pub mod url;

pub use content::{
    BlogPost, BlogPostMetadata, PublishStatus, SiteMetadata,
};
pub use media::MediaFileInfo;
pub use security::{AuthenticatedUser, User, UserProfile};
pub use url::RedirectEntry;
