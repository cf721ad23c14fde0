//! Dashboard view.

use globedash_core::countries::CountryRecord;
use globedash_core::pipeline::{self, PageInfo};
use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Flex, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{
    Block, Borders, Cell, HighlightSpacing, Paragraph, Row, Table, TableState,
};

use super::state::{COLUMN_SPACING, Column, DashboardState, column_rects};
use crate::common::truncate_with_ellipsis;
use crate::overlays::render_utils::{InputHint, hint_spans};
use crate::render::spinner;
use crate::state::TuiState;

const ACCENT: Color = Color::Cyan;
const DISABLED: Color = Color::DarkGray;

/// Renders header, search box, table, pager, and key hints.
pub fn render_dashboard(frame: &mut Frame, tui: &TuiState, area: Rect) {
    let [header, search, table, footer, hints] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(3),
        Constraint::Min(4),
        Constraint::Length(1),
        Constraint::Length(1),
    ])
    .areas(area);

    render_header(frame, tui, header);
    render_search(frame, &tui.dashboard, search);

    let records = tui.countries.records();
    let output = pipeline::process(records, &tui.dashboard.view);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(DISABLED))
        .title(" Countries ");
    let inner = block.inner(table);
    frame.render_widget(block, table);
    tui.dashboard.table_area.set(inner);

    if tui.countries.is_loading() {
        tui.dashboard.table_offset.set(0);
        let text = format!("{} Loading countries...", spinner(tui.spinner_frame));
        render_centered(frame, inner, Span::styled(text, Style::default().fg(ACCENT)));
    } else {
        render_table(frame, &tui.dashboard, &output.rows, inner);
        if output.is_empty() {
            let body = Rect::new(
                inner.x,
                inner.y + 1,
                inner.width,
                inner.height.saturating_sub(1),
            );
            render_centered(
                frame,
                body,
                Span::styled("No countries found", Style::default().fg(DISABLED)),
            );
        }
    }

    render_footer(frame, &output.page, footer);
    frame.render_widget(
        Paragraph::new(Line::from(hint_spans(
            &[
                InputHint::new("F1-F4", "sort"),
                InputHint::new("↑↓", "select"),
                InputHint::new("Enter", "details"),
                InputHint::new("←→", "page"),
                InputHint::new("Ctrl+U", "clear"),
            ],
            ACCENT,
        )))
        .alignment(Alignment::Center),
        hints,
    );
}

fn render_header(frame: &mut Frame, tui: &TuiState, area: Rect) {
    let title = Line::from(Span::styled(
        " GlobeDash",
        Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
    ));
    frame.render_widget(Paragraph::new(title), area);

    let mut spans = Vec::new();
    if let Some(identity) = tui.auth.identity() {
        spans.push(Span::styled(
            identity.to_string(),
            Style::default().fg(Color::White),
        ));
        spans.push(Span::styled(" • ", Style::default().fg(DISABLED)));
    }
    spans.extend(hint_spans(
        &[
            InputHint::new("Ctrl+L", "logout"),
            InputHint::new("Esc", "quit"),
        ],
        ACCENT,
    ));
    spans.push(Span::raw(" "));
    frame.render_widget(
        Paragraph::new(Line::from(spans)).alignment(Alignment::Right),
        area,
    );
}

fn render_search(frame: &mut Frame, state: &DashboardState, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(ACCENT))
        .title(" Search by name ");
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let text = &state.view.search_text;
    let max = inner.width.saturating_sub(3) as usize;
    let line = if text.is_empty() {
        Line::from(vec![
            Span::styled("> ", Style::default().fg(ACCENT)),
            Span::styled("█", Style::default().fg(ACCENT)),
            Span::styled("Type to filter countries", Style::default().fg(DISABLED)),
        ])
    } else {
        Line::from(vec![
            Span::styled("> ", Style::default().fg(ACCENT)),
            Span::raw(truncate_with_ellipsis(text, max)),
            Span::styled("█", Style::default().fg(ACCENT)),
        ])
    };
    frame.render_widget(Paragraph::new(line), inner);
}

fn render_table(frame: &mut Frame, state: &DashboardState, rows: &[&CountryRecord], area: Rect) {
    let widths: Vec<usize> = column_rects(area)
        .iter()
        .map(|r| usize::from(r.width))
        .collect();

    let header = Row::new(Column::ALL.iter().zip(&widths).map(|(column, width)| {
        let mut title = column.title().to_string();
        let mut style = Style::default().fg(ACCENT).add_modifier(Modifier::BOLD);
        if let Some(sort) = column.sort_column() {
            if sort.is_active(&state.view.sort) {
                title = format!("{title} {}", state.view.sort.direction.arrow());
            } else {
                style = style.add_modifier(Modifier::UNDERLINED);
            }
        }
        Cell::from(truncate_with_ellipsis(&title, *width)).style(style)
    }));

    let body = rows.iter().map(|record| {
        Row::new(
            Column::ALL
                .iter()
                .zip(&widths)
                .map(|(column, width)| cell(record, *column, *width)),
        )
    });

    let table = Table::new(body, Column::ALL.map(Column::constraint))
        .header(header)
        .column_spacing(COLUMN_SPACING)
        .flex(Flex::Start)
        .highlight_spacing(HighlightSpacing::Never)
        .row_highlight_style(
            Style::default()
                .bg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),
        );

    let mut table_state = TableState::default().with_offset(state.table_offset.get());
    if !rows.is_empty() {
        table_state.select(Some(state.selected));
    }
    frame.render_stateful_widget(table, area, &mut table_state);
    state.table_offset.set(table_state.offset());
}

fn cell(record: &CountryRecord, column: Column, width: usize) -> Cell<'static> {
    let text = match column {
        Column::Flag => record.flag_emoji().unwrap_or_default(),
        Column::Name => record.name.common.clone(),
        Column::Region => record.region_cell().to_string(),
        Column::Capital => record.capital_cell().to_string(),
        Column::Population => record.population_display(),
        Column::Currencies => record.currency_cell().to_string(),
        Column::Languages => record.languages_display(),
        Column::Action => {
            return Cell::from("Details").style(Style::default().fg(ACCENT));
        }
    };
    Cell::from(truncate_with_ellipsis(&text, width))
}

fn render_footer(frame: &mut Frame, page: &PageInfo, area: Rect) {
    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(
            format!(" {}", page.summary()),
            Style::default().fg(Color::Gray),
        ))),
        area,
    );

    let enabled = |on: bool| {
        if on {
            Style::default().fg(ACCENT)
        } else {
            Style::default().fg(DISABLED)
        }
    };
    let mut spans = vec![Span::styled("◀ Previous", enabled(page.has_previous()))];
    if page.total_pages > 0 {
        spans.push(Span::styled(
            format!("  Page {} of {}  ", page.page, page.total_pages),
            Style::default().fg(Color::Gray),
        ));
    } else {
        spans.push(Span::raw("  "));
    }
    spans.push(Span::styled("Next ▶ ", enabled(page.has_next())));
    frame.render_widget(
        Paragraph::new(Line::from(spans)).alignment(Alignment::Right),
        area,
    );
}

fn render_centered(frame: &mut Frame, area: Rect, span: Span<'_>) {
    if area.height == 0 {
        return;
    }
    let middle = Rect::new(area.x, area.y + area.height / 2, area.width, 1);
    frame.render_widget(
        Paragraph::new(Line::from(span)).alignment(Alignment::Center),
        middle,
    );
}
