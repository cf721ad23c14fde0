//! Login screen shown when there is no session.

mod render;
mod state;
mod update;

pub use render::render_login;
pub use state::{LoginField, LoginForm};
pub use update::{handle_login_key, handle_login_paste};
