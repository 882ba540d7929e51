//! Asset pipeline for kiln sites.
//!
//! Renders templated pages with layouts, minifies stylesheets, bundles scripts
//! behind the page-ready bootstrap, and copies static assets into the output
//! directory.

pub mod assets;
pub mod builder;
pub mod data;
pub mod task;
pub mod templates;

pub use builder::{BuildConfig, BuildError, BuildResult, StaticBuilder};
pub use task::{Task, UnknownTask};
