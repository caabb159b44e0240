//! Installing a resolved toolchain onto disk.
//!
//! - **Normalization:** flattens macOS archives and adds unsuffixed aliases
//! - **Local paths:** records and follows a pre-installed toolchain
//! - **Orchestration:** [`Installer`] over an [`Acquire`] implementation

pub mod error;
pub mod installer;
pub mod local;
pub mod normalize;

pub use error::{AcquireError, InstallError, NormalizeError, Result};
pub use installer::{Acquire, DirectoryMirror, InstallReport, Installer};
pub use local::{installed_bin_dir, record_local_path};
pub use normalize::{normalize_install, AliasFailure, NormalizeOutcome};
