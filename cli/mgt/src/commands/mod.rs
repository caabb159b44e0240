//! CLI command implementations.

pub mod catalog;
pub mod info;
pub mod normalize;
pub mod resolve;
