// Document layout: classification, wrapping, height estimation and pagination.
// Pure and synchronous; rendering lives in `crate::render`.

pub mod classifier;
pub mod constraints;
pub mod font_metrics;
pub mod height;
pub mod paginator;
pub mod wrapper;

pub use constraints::{default_layout_config, LayoutConfig};
