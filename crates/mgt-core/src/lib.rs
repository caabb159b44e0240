//! Configuration core of the multiarch GNU toolchain.
//!
//! Decides which toolchain variant a build needs, checks the request
//! against the catalog, and synthesizes the flags, build-system overrides,
//! and environment bindings a consuming build uses.
//!
//! # Pipeline
//!
//! 1. [`resolver::resolve_variant`] maps the target platform to a variant
//! 2. [`validate::validate`] collects every reason the request cannot be served
//! 3. [`flags::synthesize`] produces ordered compile and link flags
//! 4. [`env::export_bindings`] names the executables for each tool role
//!
//! [`resolution::resolve`] runs the whole pipeline. Nothing here touches
//! the filesystem or the network.

pub mod env;
pub mod error;
pub mod flags;
pub mod options;
pub mod overrides;
pub mod resolution;
pub mod resolver;
pub mod validate;

// Re-exports for convenience.
pub use env::{export_bindings, render_shell, ToolRole};
pub use error::{ConfigError, ResolveError};
pub use flags::{synthesize, FlagSet, Synthesis};
pub use options::{OptionInfo, OptionSet};
pub use overrides::{BuildOverrides, CompilerExecutables};
pub use resolution::{resolve, PackageId, ResolveRequest, ResolvedConfiguration};
pub use resolver::resolve_variant;
pub use validate::validate;
