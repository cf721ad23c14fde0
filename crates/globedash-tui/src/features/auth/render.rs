//! Login screen view.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use super::state::{LoginField, LoginForm};
use crate::common::{mask, truncate_with_ellipsis};
use crate::overlays::render_utils::{
    InputHint, calculate_overlay_area, render_hints, render_overlay_container,
};

const FORM_WIDTH: u16 = 56;
const FORM_HEIGHT: u16 = 11;

/// Renders the login form centered on screen.
pub fn render_login(frame: &mut Frame, form: &LoginForm, area: Rect) {
    let popup = calculate_overlay_area(area, area.height, FORM_WIDTH, FORM_HEIGHT);
    render_overlay_container(frame, popup, "GlobeDash Login", Color::Cyan);

    let inner = Rect::new(
        popup.x + 2,
        popup.y + 1,
        popup.width.saturating_sub(4),
        popup.height.saturating_sub(2),
    );
    let field_width = inner.width.saturating_sub(12) as usize;

    let mut lines = vec![
        Line::from(Span::styled(
            "Any email and password will do.",
            Style::default().fg(Color::DarkGray),
        )),
        Line::from(""),
        field_line(
            "Email",
            &form.email,
            form.focus == LoginField::Email,
            field_width,
        ),
        Line::from(""),
        field_line(
            "Password",
            &mask(&form.password),
            form.focus == LoginField::Password,
            field_width,
        ),
        Line::from(""),
    ];
    if let Some(error) = &form.error {
        lines.push(Line::from(Span::styled(
            error.clone(),
            Style::default().fg(Color::Red),
        )));
    }
    frame.render_widget(Paragraph::new(lines), inner);

    render_hints(
        frame,
        inner,
        &[
            InputHint::new("Tab", "switch field"),
            InputHint::new("Enter", "log in"),
            InputHint::new("Esc", "quit"),
        ],
        Color::Cyan,
    );
}

fn field_line(label: &str, value: &str, focused: bool, width: usize) -> Line<'static> {
    let label_style = if focused {
        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Gray)
    };

    let mut spans = vec![
        Span::styled(format!("{label:>9}: "), label_style),
        Span::raw(truncate_with_ellipsis(value, width.saturating_sub(1))),
    ];
    if focused {
        spans.push(Span::styled("█", Style::default().fg(Color::Cyan)));
    }
    Line::from(spans)
}
