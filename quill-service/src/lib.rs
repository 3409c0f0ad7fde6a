pub mod content;
pub mod error;
pub mod media;
pub mod security;
pub mod url;

pub use content::{FileBackedPostService, PostPage, PostQuery, PostService, SortField};
pub use error::{Result, ServiceError};
pub use media::{FileBackedMediaService, MediaService};
pub use security::{
    BcryptPasswordService, FileBackedUserService, PasswordService, UserService,
};
pub use url::UrlService;
