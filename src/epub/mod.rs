//! EPUB container access
//!
//! Read-only view of an EPUB: zip entries, the OPF package and the NCX
//! navigation map.
//!
//! # Features
//!
//! - Zip entry listing and lossy UTF-8 reads
//! - Rootfile discovery through `META-INF/container.xml`
//! - Manifest and spine parsing with resolved archive paths
//! - NCX navPoint parsing with nesting depth

mod archive;
mod ncx;
mod package;
mod types;

pub use archive::EpubArchive;
pub use ncx::parse_ncx;
pub use package::{parse_container, Package};
pub use types::{
    is_markup_name, resolve_href, EpubError, ManifestItem, NavPoint, Result, CONTAINER_PATH,
    DEFAULT_NCX_PATH, MARKUP_EXTENSIONS, NCX_MEDIA_TYPE,
};

#[cfg(test)]
pub(crate) use archive::fixture;
