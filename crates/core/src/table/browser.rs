//! Stateful browser over one record set.
//!
//! The browser owns (or borrows) the records, the discovered columns, its
//! [`BrowserState`] and the cached list of visible row indices. The visible
//! list is rebuilt on search, sort and record changes only; paging slices it.

use std::borrow::Cow;
use std::fmt;

use log::debug;
use serde::{Deserialize, Serialize};

use super::compare::sort_indices;
use super::schema::discover_columns;
use super::state::{BrowserState, SortSpec};
use crate::constants::{DEFAULT_PAGE_SIZE, MISSING_CELL_PLACEHOLDER};
use crate::values::{as_display_text, as_search_text, Record};

// =============================================================================
// Options
// =============================================================================

/// Per-browser configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BrowserOptions {
    /// Rows per page; values below 1 are treated as 1
    pub page_size: usize,
    pub preferred_columns: Vec<String>,
    pub hidden_columns: Vec<String>,
    /// Server-side row total when the records are a bounded preview
    pub total_available: Option<usize>,
    /// Opaque tool output shown when there is nothing to browse
    pub debug_log: Option<String>,
}

impl Default for BrowserOptions {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            preferred_columns: Vec::new(),
            hidden_columns: Vec::new(),
            total_available: None,
            debug_log: None,
        }
    }
}

impl BrowserOptions {
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    fn effective_page_size(&self) -> usize {
        self.page_size.max(1)
    }
}

// =============================================================================
// View
// =============================================================================

/// One rendered cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Cell {
    /// Absent or null; rendered as a placeholder
    Missing,
    Text(String),
}

impl Cell {
    fn from_value(value: Option<&serde_json::Value>) -> Self {
        as_display_text(value).map_or(Cell::Missing, Cell::Text)
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Missing => f.write_str(MISSING_CELL_PLACEHOLDER),
            Cell::Text(text) => f.write_str(text),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderedRow {
    /// Index of the row in the browser's record set
    pub source_index: usize,
    pub cells: Vec<Cell>,
}

/// Notice shown when the records are a subset of the server-side dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewNotice {
    pub delivered_rows: usize,
    pub total_rows: usize,
    pub message: String,
}

impl PreviewNotice {
    fn new(delivered_rows: usize, total_rows: usize) -> Self {
        Self {
            delivered_rows,
            total_rows,
            message: format!(
                "Showing a preview of {delivered_rows} of {total_rows} rows; search and sort apply to the preview only"
            ),
        }
    }
}

/// One page of a non-degenerate table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TablePage {
    pub columns: Vec<String>,
    pub rows: Vec<RenderedRow>,
    pub page: usize,
    pub total_pages: usize,
    pub page_size: usize,
    /// Rows surviving the search
    pub matched_rows: usize,
    /// Rows delivered to the browser
    pub total_rows: usize,
    pub search_term: String,
    pub sort: Option<SortSpec>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preview: Option<PreviewNotice>,
}

/// What the browser currently shows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum BrowserView {
    /// Empty record set
    NoData {
        #[serde(rename = "debugLog")]
        debug_log: Option<String>,
    },
    /// Records exist but none carries a displayable field
    NoColumns {
        #[serde(rename = "totalRows")]
        total_rows: usize,
    },
    Table(TablePage),
}

// =============================================================================
// Browser
// =============================================================================

pub struct TableBrowser<'a> {
    records: Cow<'a, [Record]>,
    options: BrowserOptions,
    columns: Vec<String>,
    state: BrowserState,
    visible: Vec<usize>,
}

impl<'a> TableBrowser<'a> {
    /// Creates a browser over borrowed or owned records.
    pub fn new(records: impl Into<Cow<'a, [Record]>>, options: BrowserOptions) -> Self {
        let records = records.into();
        let columns = discover_columns(
            &records,
            options.preferred_columns.as_slice(),
            options.hidden_columns.as_slice(),
        );
        let mut browser = Self {
            records,
            options,
            columns,
            state: BrowserState::default(),
            visible: Vec::new(),
        };
        browser.refresh();
        browser
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn state(&self) -> &BrowserState {
        &self.state
    }

    pub fn options(&self) -> &BrowserOptions {
        &self.options
    }

    pub fn set_search(&mut self, term: impl Into<String>) {
        let term = term.into();
        if term == self.state.search_term {
            return;
        }
        self.state = std::mem::take(&mut self.state).apply_search(term);
        self.refresh();
    }

    /// Header click: cycles the sort of `key`.
    pub fn toggle_sort(&mut self, key: &str) {
        self.state = std::mem::take(&mut self.state).apply_sort(key);
        self.refresh();
    }

    pub fn set_sort(&mut self, sort: Option<SortSpec>) {
        self.state = std::mem::take(&mut self.state).with_sort(sort);
        self.refresh();
    }

    /// Moves to `page`, clamped to `[1, total_pages]`.
    pub fn go_to_page(&mut self, page: usize) {
        let page = page.min(self.total_pages());
        self.state = std::mem::take(&mut self.state).apply_page(page);
    }

    /// Swaps in a new record set. Columns are rediscovered and the page
    /// returns to 1; search and sort carry over.
    pub fn replace_records(&mut self, records: impl Into<Cow<'a, [Record]>>) {
        self.records = records.into();
        self.columns = discover_columns(
            &self.records,
            self.options.preferred_columns.as_slice(),
            self.options.hidden_columns.as_slice(),
        );
        self.state = std::mem::take(&mut self.state).reset();
        self.refresh();
    }

    /// Restores a full state, e.g. from query parameters. The page is
    /// clamped after search and sort are applied.
    pub fn restore_state(&mut self, state: BrowserState) {
        let page = state.current_page;
        self.state = state;
        self.refresh();
        self.go_to_page(page);
    }

    pub fn matched_rows(&self) -> usize {
        self.visible.len()
    }

    pub fn page_size(&self) -> usize {
        self.options.effective_page_size()
    }

    /// Page count of the matched rows; at least 1.
    pub fn total_pages(&self) -> usize {
        self.visible.len().div_ceil(self.page_size()).max(1)
    }

    pub fn current_page(&self) -> usize {
        self.state.current_page.clamp(1, self.total_pages())
    }

    /// Source indices of the rows on the current page.
    pub fn page_indices(&self) -> &[usize] {
        let size = self.page_size();
        let start = (self.current_page() - 1) * size;
        let end = (start + size).min(self.visible.len());
        self.visible.get(start..end).unwrap_or(&[])
    }

    pub fn view(&self) -> BrowserView {
        if self.records.is_empty() {
            return BrowserView::NoData {
                debug_log: self.options.debug_log.clone(),
            };
        }
        if self.columns.is_empty() {
            return BrowserView::NoColumns {
                total_rows: self.records.len(),
            };
        }

        let rows = self
            .page_indices()
            .iter()
            .map(|&index| RenderedRow {
                source_index: index,
                cells: self
                    .columns
                    .iter()
                    .map(|column| Cell::from_value(self.records[index].get(column)))
                    .collect(),
            })
            .collect();

        let preview = self
            .options
            .total_available
            .filter(|total| *total > self.records.len())
            .map(|total| PreviewNotice::new(self.records.len(), total));

        BrowserView::Table(TablePage {
            columns: self.columns.clone(),
            rows,
            page: self.current_page(),
            total_pages: self.total_pages(),
            page_size: self.page_size(),
            matched_rows: self.matched_rows(),
            total_rows: self.records.len(),
            search_term: self.state.search_term.clone(),
            sort: self.state.sort.clone(),
            preview,
        })
    }

    fn refresh(&mut self) {
        let needle = self.state.search_term.trim().to_lowercase();
        let mut visible: Vec<usize> = if needle.is_empty() {
            (0..self.records.len()).collect()
        } else {
            (0..self.records.len())
                .filter(|&index| self.row_matches(&self.records[index], &needle))
                .collect()
        };

        if let Some(sort) = &self.state.sort {
            sort_indices(&self.records, &mut visible, &sort.key, sort.direction);
        }

        debug!(
            "Table refresh: {} of {} rows match '{}'",
            visible.len(),
            self.records.len(),
            self.state.search_term
        );
        self.visible = visible;
        self.state.current_page = self.current_page();
    }

    fn row_matches(&self, record: &Record, needle: &str) -> bool {
        self.columns
            .iter()
            .any(|column| as_search_text(record.get(column)).contains(needle))
    }
}

impl fmt::Debug for TableBrowser<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TableBrowser")
            .field("rows", &self.records.len())
            .field("columns", &self.columns)
            .field("state", &self.state)
            .field("matched", &self.visible.len())
            .finish()
    }
}
