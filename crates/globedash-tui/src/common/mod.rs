//! Helpers shared by the feature slices and overlays.

pub mod text;

pub use text::{mask, truncate_with_ellipsis};
