pub mod fs;
pub mod metadata;
pub mod redirect;
pub mod security;

pub use fs::{FileSystemService, LocalFileSystemService};
pub use metadata::MetadataStore;
pub use redirect::RedirectStore;
pub use security::JwtService;
