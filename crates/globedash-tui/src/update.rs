//! TUI reducer.
//!
//! All state mutations happen here. The runtime calls `update(app, event)`
//! and executes the returned effects.

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::effects::UiEffect;
use crate::events::UiEvent;
use crate::overlays::{self, Overlay};
use crate::dashboard::DashboardState;
use crate::state::{AppState, CountriesState, Screen};
use crate::{auth, dashboard};

/// Effects to run once, before the first event.
pub fn init(_app: &mut AppState) -> Vec<UiEffect> {
    vec![UiEffect::RestoreSession]
}

/// The main reducer function.
pub fn update(app: &mut AppState, event: UiEvent) -> Vec<UiEffect> {
    match event {
        UiEvent::Tick => {
            app.tui.spinner_frame = app.tui.spinner_frame.wrapping_add(1);
            vec![]
        }
        UiEvent::Terminal(term_event) => handle_terminal_event(app, term_event),
        UiEvent::SessionChanged => handle_session_changed(app),
        UiEvent::CountriesLoaded(records) => {
            tracing::debug!(count = records.len(), "countries loaded");
            app.tui.countries = CountriesState::Loaded(records);
            app.tui.dashboard.reset_selection();
            vec![]
        }
    }
}

fn handle_session_changed(app: &mut AppState) -> Vec<UiEffect> {
    app.overlay = None;
    if app.tui.screen() != Screen::Dashboard {
        // Each login starts from a fresh table.
        app.tui.dashboard = DashboardState::default();
        return vec![];
    }

    app.tui.login.reset();
    // Fetched once per process; a later login reuses the list.
    if app.tui.countries == CountriesState::NotRequested {
        app.tui.countries = CountriesState::Loading;
        return vec![UiEffect::FetchCountries];
    }
    vec![]
}

fn handle_terminal_event(app: &mut AppState, event: Event) -> Vec<UiEffect> {
    match event {
        Event::Key(key) if key.kind != KeyEventKind::Release => handle_key(app, key),
        Event::Mouse(mouse) => {
            if app.overlay.is_none() && app.tui.screen() == Screen::Dashboard {
                let tui = &mut app.tui;
                if let Some(request) = dashboard::handle_dashboard_mouse(
                    &mut tui.dashboard,
                    tui.countries.records(),
                    mouse,
                ) {
                    app.overlay = Some(Overlay::open(request));
                }
            }
            vec![]
        }
        Event::Paste(text) => {
            match app.tui.screen() {
                Screen::Login => auth::handle_login_paste(&mut app.tui.login, &text),
                Screen::Dashboard if app.overlay.is_none() => {
                    dashboard::handle_dashboard_paste(&mut app.tui.dashboard, &text);
                }
                Screen::Dashboard | Screen::Restoring => {}
            }
            vec![]
        }
        _ => vec![],
    }
}

fn handle_key(app: &mut AppState, key: KeyEvent) -> Vec<UiEffect> {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return vec![UiEffect::Quit];
    }

    if let Some(effects) = overlays::handle_overlay_key(&mut app.overlay, key) {
        return effects;
    }

    match app.tui.screen() {
        Screen::Restoring => {
            if key.code == KeyCode::Esc {
                vec![UiEffect::Quit]
            } else {
                vec![]
            }
        }
        Screen::Login => auth::handle_login_key(&mut app.tui.login, key),
        Screen::Dashboard => {
            let tui = &mut app.tui;
            let (effects, request) =
                dashboard::handle_dashboard_key(&mut tui.dashboard, tui.countries.records(), key);
            if let Some(request) = request {
                app.overlay = Some(Overlay::open(request));
            }
            effects
        }
    }
}
