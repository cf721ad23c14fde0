//! Filter -> sort -> paginate over an in-memory record list.
//!
//! Everything here is pure: the source slice is never mutated, and calling
//! [`process`] twice with the same inputs yields the same rows in the same
//! order. Views recompute it whenever the records, the search text, the sort
//! spec, or the page change.

use std::cmp::Ordering;
use std::iter::Peekable;
use std::str::Chars;

/// Rows per page.
pub const PAGE_SIZE: usize = 10;

// ============================================================================
// Field values
// ============================================================================

/// Value found at a dotted field path.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// Path missing or value absent.
    Null,
    Number(f64),
    Text(String),
    List(Vec<FieldValue>),
}

impl FieldValue {
    pub fn text(value: impl Into<String>) -> Self {
        FieldValue::Text(value.into())
    }

    pub fn opt_text(value: Option<&str>) -> Self {
        value.map_or(FieldValue::Null, FieldValue::text)
    }

    fn rank(&self) -> u8 {
        match self {
            FieldValue::Null => 0,
            FieldValue::Number(_) => 1,
            FieldValue::Text(_) => 2,
            FieldValue::List(_) => 3,
        }
    }

    /// Total ordering: `Null < Number < Text < List`.
    ///
    /// Text compares in natural order so that `C2 < C10`.
    pub fn compare(&self, other: &Self) -> Ordering {
        match (self, other) {
            (FieldValue::Null, FieldValue::Null) => Ordering::Equal,
            (FieldValue::Number(a), FieldValue::Number(b)) => a.total_cmp(b),
            (FieldValue::Text(a), FieldValue::Text(b)) => natural_cmp(a, b),
            (FieldValue::List(a), FieldValue::List(b)) => {
                for (x, y) in a.iter().zip(b) {
                    let ord = x.compare(y);
                    if ord != Ordering::Equal {
                        return ord;
                    }
                }
                a.len().cmp(&b.len())
            }
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

/// A record the pipeline can search and sort.
pub trait Row {
    /// Text matched by the search box.
    fn search_key(&self) -> &str;

    /// Resolves a dotted path such as `name.common`; unknown paths are `Null`.
    fn field(&self, path: &str) -> FieldValue;
}

/// Compares strings with digit runs taken as numbers, then by plain order.
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    let mut left = a.chars().peekable();
    let mut right = b.chars().peekable();

    loop {
        match (left.peek().copied(), right.peek().copied()) {
            (None, None) => return a.cmp(b),
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(x), Some(y)) if x.is_ascii_digit() && y.is_ascii_digit() => {
                let l = take_digits(&mut left);
                let r = take_digits(&mut right);
                let ord = cmp_digit_runs(&l, &r);
                if ord != Ordering::Equal {
                    return ord;
                }
            }
            (Some(x), Some(y)) => {
                if x != y {
                    return x.cmp(&y);
                }
                left.next();
                right.next();
            }
        }
    }
}

fn take_digits(chars: &mut Peekable<Chars<'_>>) -> String {
    let mut run = String::new();
    while let Some(c) = chars.peek().copied() {
        if !c.is_ascii_digit() {
            break;
        }
        run.push(c);
        chars.next();
    }
    run
}

fn cmp_digit_runs(a: &str, b: &str) -> Ordering {
    let a = a.trim_start_matches('0');
    let b = b.trim_start_matches('0');
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}

// ============================================================================
// Sorting
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn flipped(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }

    pub fn arrow(self) -> &'static str {
        match self {
            SortDirection::Asc => "▲",
            SortDirection::Desc => "▼",
        }
    }
}

/// Sort key and direction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortSpec {
    pub field_path: String,
    pub direction: SortDirection,
}

impl Default for SortSpec {
    fn default() -> Self {
        Self {
            field_path: SortColumn::Name.field_path().to_string(),
            direction: SortDirection::Asc,
        }
    }
}

impl SortSpec {
    pub fn new(field_path: impl Into<String>, direction: SortDirection) -> Self {
        Self {
            field_path: field_path.into(),
            direction,
        }
    }

    /// Header-click semantics: the active column flips, another column starts ascending.
    #[must_use]
    pub fn toggled(&self, field_path: &str) -> Self {
        if self.field_path == field_path {
            Self::new(field_path, self.direction.flipped())
        } else {
            Self::new(field_path, SortDirection::Asc)
        }
    }

    pub fn compare<T: Row>(&self, a: &T, b: &T) -> Ordering {
        let ord = a.field(&self.field_path).compare(&b.field(&self.field_path));
        match self.direction {
            SortDirection::Asc => ord,
            SortDirection::Desc => ord.reverse(),
        }
    }
}

/// The sortable table columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortColumn {
    Name,
    Population,
    Region,
    Capital,
}

impl SortColumn {
    pub const ALL: [SortColumn; 4] = [
        SortColumn::Name,
        SortColumn::Population,
        SortColumn::Region,
        SortColumn::Capital,
    ];

    pub fn field_path(self) -> &'static str {
        match self {
            SortColumn::Name => "name.common",
            SortColumn::Population => "population",
            SortColumn::Region => "region",
            SortColumn::Capital => "capital",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SortColumn::Name => "Name",
            SortColumn::Population => "Population",
            SortColumn::Region => "Region",
            SortColumn::Capital => "Capital",
        }
    }

    pub fn is_active(self, spec: &SortSpec) -> bool {
        spec.field_path == self.field_path()
    }
}

// ============================================================================
// View state
// ============================================================================

/// User-controlled pipeline inputs. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewState {
    pub search_text: String,
    pub sort: SortSpec,
    /// 1-based.
    pub page: usize,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            search_text: String::new(),
            sort: SortSpec::default(),
            page: 1,
        }
    }
}

impl ViewState {
    /// Replaces the search text; always returns to page 1.
    pub fn set_search(&mut self, text: impl Into<String>) {
        self.search_text = text.into();
        self.page = 1;
    }

    pub fn push_search_char(&mut self, c: char) {
        self.search_text.push(c);
        self.page = 1;
    }

    pub fn pop_search_char(&mut self) {
        self.search_text.pop();
        self.page = 1;
    }

    pub fn sort_by(&mut self, column: SortColumn) {
        self.sort = self.sort.toggled(column.field_path());
    }

    /// Moves forward one page if one exists. Returns whether the page changed.
    pub fn next_page(&mut self, total_pages: usize) -> bool {
        self.clamp(total_pages);
        if self.page < total_pages {
            self.page += 1;
            true
        } else {
            false
        }
    }

    /// Moves back one page if possible. Returns whether the page changed.
    pub fn previous_page(&mut self) -> bool {
        if self.page > 1 {
            self.page -= 1;
            true
        } else {
            false
        }
    }

    /// Pulls the page index back into `[1, max(total_pages, 1)]`.
    pub fn clamp(&mut self, total_pages: usize) {
        self.page = clamp_page(self.page, total_pages);
    }
}

// ============================================================================
// Pagination
// ============================================================================

/// `ceil(count / PAGE_SIZE)`.
pub fn total_pages(count: usize) -> usize {
    count.div_ceil(PAGE_SIZE)
}

pub fn clamp_page(page: usize, total_pages: usize) -> usize {
    page.clamp(1, total_pages.max(1))
}

/// Where the current page sits in the filtered list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageInfo {
    /// 1-based, already clamped.
    pub page: usize,
    pub total_pages: usize,
    pub filtered_count: usize,
    /// Window into the filtered list, `start..end`.
    pub start: usize,
    pub end: usize,
}

impl PageInfo {
    pub fn new(filtered_count: usize, requested_page: usize) -> Self {
        let total_pages = total_pages(filtered_count);
        let page = clamp_page(requested_page, total_pages);
        let start = ((page - 1) * PAGE_SIZE).min(filtered_count);
        let end = (page * PAGE_SIZE).min(filtered_count);
        Self {
            page,
            total_pages,
            filtered_count,
            start,
            end,
        }
    }

    pub fn has_previous(&self) -> bool {
        self.page > 1
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }

    /// 1-based number of the first visible entry (0 when empty).
    pub fn first_entry(&self) -> usize {
        ((self.page - 1) * PAGE_SIZE + 1).min(self.filtered_count)
    }

    /// 1-based number of the last visible entry.
    pub fn last_entry(&self) -> usize {
        (self.page * PAGE_SIZE).min(self.filtered_count)
    }

    /// `Showing X to Y of Z entries`.
    pub fn summary(&self) -> String {
        format!(
            "Showing {} to {} of {} entries",
            self.first_entry(),
            self.last_entry(),
            self.filtered_count
        )
    }
}

// ============================================================================
// Pipeline
// ============================================================================

/// Records whose search key contains `search` case-insensitively.
pub fn filter<'a, T: Row>(records: &'a [T], search: &str) -> Vec<&'a T> {
    if search.is_empty() {
        return records.iter().collect();
    }
    let needle = search.to_lowercase();
    records
        .iter()
        .filter(|r| r.search_key().to_lowercase().contains(&needle))
        .collect()
}

/// Stable sort by `spec`.
pub fn sort<T: Row>(rows: &mut [&T], spec: &SortSpec) {
    rows.sort_by(|a, b| spec.compare(*a, *b));
}

/// Result of one pipeline run.
#[derive(Debug)]
pub struct PipelineOutput<'a, T> {
    /// Rows on the current page, in display order.
    pub rows: Vec<&'a T>,
    pub page: PageInfo,
}

impl<T> PipelineOutput<'_, T> {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Runs filter -> sort -> paginate.
pub fn process<'a, T: Row>(records: &'a [T], view: &ViewState) -> PipelineOutput<'a, T> {
    let mut matched = filter(records, &view.search_text);
    sort(&mut matched, &view.sort);
    let page = PageInfo::new(matched.len(), view.page);
    let rows = matched[page.start..page.end].to_vec();
    PipelineOutput { rows, page }
}
