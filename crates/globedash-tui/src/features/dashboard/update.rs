//! Dashboard input handling.
//!
//! Every change to the search text, the sort, or the page moves the
//! highlight back to the first row.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use globedash_core::countries::CountryRecord;
use globedash_core::pipeline::{self, SortColumn};
use ratatui::layout::{Position, Rect};

use super::state::{Column, DashboardState, column_rects};
use crate::effects::UiEffect;
use crate::overlays::OverlayRequest;

/// Handles a key while the dashboard has focus.
pub fn handle_dashboard_key(
    state: &mut DashboardState,
    records: &[CountryRecord],
    key: KeyEvent,
) -> (Vec<UiEffect>, Option<OverlayRequest>) {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let alt = key.modifiers.contains(KeyModifiers::ALT);

    match key.code {
        KeyCode::Esc => return (vec![UiEffect::Quit], None),
        KeyCode::Char('l') if ctrl => return (vec![UiEffect::Logout], None),
        KeyCode::Char('u') if ctrl => {
            state.view.set_search("");
            state.reset_selection();
        }
        KeyCode::Char(c) if !ctrl && !alt => {
            state.view.push_search_char(c);
            state.reset_selection();
        }
        KeyCode::Backspace => {
            state.view.pop_search_char();
            state.reset_selection();
        }
        KeyCode::Up => {
            state.selected = state.selected.saturating_sub(1);
        }
        KeyCode::Down => {
            state.selected += 1;
        }
        KeyCode::Enter => return (vec![], details_request(state, records)),
        KeyCode::Left | KeyCode::PageUp => {
            if state.view.previous_page() {
                state.reset_selection();
            }
        }
        KeyCode::Right | KeyCode::PageDown => {
            let total_pages = pipeline::process(records, &state.view).page.total_pages;
            if state.view.next_page(total_pages) {
                state.reset_selection();
            }
        }
        KeyCode::F(n @ 1..=4) => {
            let column = SortColumn::ALL[usize::from(n - 1)];
            state.view.sort_by(column);
            state.reset_selection();
        }
        _ => {}
    }

    let rows = pipeline::process(records, &state.view).rows.len();
    state.clamp_selection(rows);
    (vec![], None)
}

/// Pasted text is appended to the search box.
pub fn handle_dashboard_paste(state: &mut DashboardState, text: &str) {
    let mut search = state.view.search_text.clone();
    search.extend(text.chars().filter(|c| !c.is_control()));
    state.view.set_search(search);
    state.reset_selection();
}

/// Header clicks sort, row clicks select, and a click in the Action
/// column opens the details.
pub fn handle_dashboard_mouse(
    state: &mut DashboardState,
    records: &[CountryRecord],
    mouse: MouseEvent,
) -> Option<OverlayRequest> {
    let area = state.table_area.get();
    let position = Position::new(mouse.column, mouse.row);
    if !area.contains(position) {
        return None;
    }

    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => {
            let column = column_at(area, mouse.column);
            let offset = usize::from(mouse.row - area.y);
            if offset == 0 {
                if let Some(sort) = column.and_then(Column::sort_column) {
                    state.view.sort_by(sort);
                    state.reset_selection();
                }
                return None;
            }

            let row = offset - 1 + state.table_offset.get();
            let rows = pipeline::process(records, &state.view).rows.len();
            if row >= rows {
                return None;
            }
            state.selected = row;
            if column == Some(Column::Action) {
                return details_request(state, records);
            }
            None
        }
        MouseEventKind::ScrollUp => {
            state.selected = state.selected.saturating_sub(1);
            None
        }
        MouseEventKind::ScrollDown => {
            let rows = pipeline::process(records, &state.view).rows.len();
            state.selected += 1;
            state.clamp_selection(rows);
            None
        }
        _ => None,
    }
}

fn column_at(area: Rect, x: u16) -> Option<Column> {
    let header = Rect::new(area.x, area.y, area.width, 1);
    column_rects(header)
        .iter()
        .position(|r| x >= r.x && x < r.right())
        .map(|i| Column::ALL[i])
}

fn details_request(state: &DashboardState, records: &[CountryRecord]) -> Option<OverlayRequest> {
    let output = pipeline::process(records, &state.view);
    output
        .rows
        .get(state.selected)
        .map(|record| OverlayRequest::Details(Box::new((*record).clone())))
}
