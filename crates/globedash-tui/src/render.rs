//! Pure view functions.
//!
//! Rendering only reads `AppState` and draws to the frame. The one exception
//! is the table area, recorded through a `Cell` for mouse routing.

use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::overlays::OverlayExt;
use crate::state::{AppState, Screen};
use crate::{auth, dashboard};

/// Spinner frames for loading indicators.
const SPINNER_FRAMES: &[&str] = &["◐", "◓", "◑", "◒"];

pub fn spinner(frame: usize) -> &'static str {
    SPINNER_FRAMES[frame % SPINNER_FRAMES.len()]
}

/// Renders the whole UI.
pub fn render(app: &AppState, frame: &mut Frame) {
    let area = frame.area();
    let tui = &app.tui;

    match tui.screen() {
        Screen::Restoring => render_restoring(frame, area, tui.spinner_frame),
        Screen::Login => auth::render_login(frame, &tui.login, area),
        Screen::Dashboard => {
            dashboard::render_dashboard(frame, tui, area);
            app.overlay.render(frame, area);
        }
    }
}

fn render_restoring(frame: &mut Frame, area: Rect, spinner_frame: usize) {
    if area.height == 0 {
        return;
    }
    let line = Line::from(Span::styled(
        format!("{} Restoring session...", spinner(spinner_frame)),
        Style::default().fg(Color::Cyan),
    ));
    let middle = Rect::new(area.x, area.y + area.height / 2, area.width, 1);
    frame.render_widget(Paragraph::new(line).alignment(Alignment::Center), middle);
}
