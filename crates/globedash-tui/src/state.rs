//! Application state composition.
//!
//! ```text
//! AppState
//! ├── tui: TuiState
//! │   ├── auth: AuthContext       (session, loading flag)
//! │   ├── login: LoginForm        (email/password fields)
//! │   ├── countries: CountriesState (fetch lifecycle, records)
//! │   └── dashboard: DashboardState (search, sort, page, selection)
//! └── overlay: Option<Overlay>    (detail view)
//! ```
//!
//! The overlay sits beside `TuiState` so overlay handlers can borrow both.

use globedash_core::config::Config;
use globedash_core::countries::CountryRecord;
use globedash_core::session::{AuthContext, KeyValueStore};

use crate::auth::LoginForm;
use crate::dashboard::DashboardState;
use crate::overlays::Overlay;

/// Session storage behind the auth context.
pub type SessionStore = Box<dyn KeyValueStore + Send>;

pub struct AppState {
    pub tui: TuiState,
    pub overlay: Option<Overlay>,
}

impl AppState {
    pub fn new(config: Config, auth: AuthContext<SessionStore>) -> Self {
        Self {
            tui: TuiState::new(config, auth),
            overlay: None,
        }
    }
}

/// Which top-level view is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    /// Session restore has not finished.
    Restoring,
    Login,
    Dashboard,
}

/// Country fetch lifecycle. Records are kept for the process lifetime.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum CountriesState {
    #[default]
    NotRequested,
    Loading,
    Loaded(Vec<CountryRecord>),
}

impl CountriesState {
    pub fn records(&self) -> &[CountryRecord] {
        match self {
            CountriesState::Loaded(records) => records,
            CountriesState::NotRequested | CountriesState::Loading => &[],
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, CountriesState::Loading)
    }
}

pub struct TuiState {
    pub should_quit: bool,
    pub config: Config,
    pub auth: AuthContext<SessionStore>,
    pub login: LoginForm,
    pub countries: CountriesState,
    pub dashboard: DashboardState,
    /// Spinner animation frame counter.
    pub spinner_frame: usize,
}

impl TuiState {
    pub fn new(config: Config, auth: AuthContext<SessionStore>) -> Self {
        Self {
            should_quit: false,
            config,
            auth,
            login: LoginForm::default(),
            countries: CountriesState::default(),
            dashboard: DashboardState::default(),
            spinner_frame: 0,
        }
    }

    pub fn screen(&self) -> Screen {
        if self.auth.is_loading() {
            Screen::Restoring
        } else if self.auth.is_authenticated() {
            Screen::Dashboard
        } else {
            Screen::Login
        }
    }
}
