use std::cell::Cell;
use std::rc::Rc;

use globedash_core::pipeline::{SortColumn, ViewState};
use ratatui::layout::{Constraint, Flex, Layout, Rect};

/// Table columns, left to right.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    Flag,
    Name,
    Region,
    Capital,
    Population,
    Currencies,
    Languages,
    Action,
}

impl Column {
    pub const ALL: [Column; 8] = [
        Column::Flag,
        Column::Name,
        Column::Region,
        Column::Capital,
        Column::Population,
        Column::Currencies,
        Column::Languages,
        Column::Action,
    ];

    pub fn title(self) -> &'static str {
        match self {
            Column::Flag => "Flag",
            Column::Name => "Name",
            Column::Region => "Region",
            Column::Capital => "Capital",
            Column::Population => "Population",
            Column::Currencies => "Currencies",
            Column::Languages => "Languages",
            Column::Action => "Action",
        }
    }

    /// Sort key behind a clickable header.
    pub fn sort_column(self) -> Option<SortColumn> {
        match self {
            Column::Name => Some(SortColumn::Name),
            Column::Population => Some(SortColumn::Population),
            Column::Region => Some(SortColumn::Region),
            Column::Capital => Some(SortColumn::Capital),
            Column::Flag | Column::Currencies | Column::Languages | Column::Action => None,
        }
    }

    pub fn constraint(self) -> Constraint {
        match self {
            Column::Flag => Constraint::Length(4),
            Column::Name => Constraint::Fill(3),
            Column::Region => Constraint::Length(11),
            Column::Capital => Constraint::Fill(2),
            Column::Population => Constraint::Length(14),
            Column::Currencies => Constraint::Fill(2),
            Column::Languages => Constraint::Fill(3),
            Column::Action => Constraint::Length(9),
        }
    }
}

/// Gap between columns, shared by the table widget and click hit-testing.
pub const COLUMN_SPACING: u16 = 1;

/// Column cells for a table row spanning `area`.
pub fn column_rects(area: Rect) -> Rc<[Rect]> {
    Layout::horizontal(Column::ALL.map(Column::constraint))
        .flex(Flex::Start)
        .spacing(COLUMN_SPACING)
        .split(area)
}

/// Dashboard view state: pipeline inputs plus the highlighted row.
#[derive(Debug, Default)]
pub struct DashboardState {
    pub view: ViewState,
    /// Index into the rows of the current page.
    pub selected: usize,
    /// Inner table area from the last render, for mouse routing.
    pub table_area: Cell<Rect>,
    /// First body row drawn by the last render; the table scrolls on short
    /// terminals to keep the selection visible.
    pub table_offset: Cell<usize>,
}

impl DashboardState {
    /// Moves the highlight back to the first row after the page contents change.
    pub fn reset_selection(&mut self) {
        self.selected = 0;
        self.table_offset.set(0);
    }

    pub fn clamp_selection(&mut self, row_count: usize) {
        self.selected = self.selected.min(row_count.saturating_sub(1));
    }
}
