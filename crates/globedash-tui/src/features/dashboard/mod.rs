//! Country table: search box, sortable columns, pagination, row selection.

mod render;
mod state;
mod update;

pub use render::render_dashboard;
pub use state::{Column, DashboardState, column_rects};
pub use update::{handle_dashboard_key, handle_dashboard_mouse, handle_dashboard_paste};
