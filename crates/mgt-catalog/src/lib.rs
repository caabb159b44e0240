//! Catalog of pre-built GNU toolchain archives.
//!
//! Maps each toolchain version to the variants published for it and each
//! variant to per-host archives pinned by SHA-256. The catalog is loaded
//! once and never mutated by the resolver.

pub mod catalog;
pub mod error;
pub mod integrity;
pub mod version;

pub use catalog::{Catalog, HostTable, Source};
pub use error::{CatalogError, Result};
pub use integrity::ContentHash;
