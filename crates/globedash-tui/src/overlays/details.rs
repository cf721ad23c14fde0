//! Country detail overlay.

use crossterm::event::{KeyCode, KeyEvent};
use globedash_core::countries::CountryRecord;
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Wrap};

use super::OverlayUpdate;
use super::render_utils::{InputHint, calculate_overlay_area, render_hints, render_overlay_container};
use crate::effects::UiEffect;

const WIDTH: u16 = 76;
const HEIGHT: u16 = 18;
const LABEL_WIDTH: usize = 14;

#[derive(Debug, Clone, PartialEq)]
pub struct DetailsState {
    pub record: CountryRecord,
}

impl DetailsState {
    pub fn new(record: CountryRecord) -> Self {
        Self { record }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> OverlayUpdate {
        match key.code {
            KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q') => OverlayUpdate::close(),
            KeyCode::Char('o') => match self.record.map_link() {
                Some(url) => OverlayUpdate::stay().with_ui_effects(vec![UiEffect::OpenBrowser {
                    url: url.to_string(),
                }]),
                None => OverlayUpdate::stay(),
            },
            _ => OverlayUpdate::stay(),
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let popup = calculate_overlay_area(area, area.height, WIDTH, HEIGHT);
        render_overlay_container(frame, popup, &self.record.detail_title(), Color::Cyan);

        let inner = Rect::new(
            popup.x + 2,
            popup.y + 1,
            popup.width.saturating_sub(4),
            popup.height.saturating_sub(2),
        );

        let mut lines = vec![Line::from(Span::styled(
            self.record.name.common.clone(),
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        ))];
        lines.push(Line::from(""));
        for (label, value) in self.record.detail_fields() {
            lines.push(Line::from(vec![
                Span::styled(
                    format!("{label:<LABEL_WIDTH$}"),
                    Style::default().fg(Color::Cyan),
                ),
                Span::raw(value),
            ]));
        }

        let body = Rect::new(inner.x, inner.y, inner.width, inner.height.saturating_sub(1));
        frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), body);

        let mut hints = vec![InputHint::new("Esc", "close")];
        if self.record.map_link().is_some() {
            hints.push(InputHint::new("o", "open map"));
        }
        render_hints(frame, inner, &hints, Color::Cyan);
    }
}
