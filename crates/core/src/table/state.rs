use serde::{Deserialize, Serialize};

/// Sort direction of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }

    /// Parses `asc`/`ascending` and `desc`/`descending`, case-insensitively.
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "asc" | "ascending" => Some(SortDirection::Asc),
            "desc" | "descending" => Some(SortDirection::Desc),
            _ => None,
        }
    }
}

/// Active sort of a browser.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SortSpec {
    pub key: String,
    pub direction: SortDirection,
}

impl SortSpec {
    pub fn new(key: impl Into<String>, direction: SortDirection) -> Self {
        Self {
            key: key.into(),
            direction,
        }
    }
}

/// View-state of one table browser.
///
/// Transitions consume the state and return the next one. The page is only
/// bounded below here; the browser clamps it to the page count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrowserState {
    pub search_term: String,
    pub sort: Option<SortSpec>,
    pub current_page: usize,
}

impl Default for BrowserState {
    fn default() -> Self {
        Self {
            search_term: String::new(),
            sort: None,
            current_page: 1,
        }
    }
}

impl BrowserState {
    /// Sets the search term. A changed term returns to page 1.
    pub fn apply_search(self, term: impl Into<String>) -> Self {
        let term = term.into();
        if term == self.search_term {
            return self;
        }
        Self {
            search_term: term,
            current_page: 1,
            ..self
        }
    }

    /// Header click on `key`.
    ///
    /// The same column cycles unsorted → ascending → descending → unsorted;
    /// another column starts at ascending. Always returns to page 1.
    pub fn apply_sort(self, key: &str) -> Self {
        let sort = match &self.sort {
            Some(current) if current.key == key => match current.direction {
                SortDirection::Asc => Some(SortSpec::new(key, SortDirection::Desc)),
                SortDirection::Desc => None,
            },
            _ => Some(SortSpec::new(key, SortDirection::Asc)),
        };
        self.with_sort(sort)
    }

    /// Sets the sort directly, for callers restoring a known sort.
    pub fn with_sort(self, sort: Option<SortSpec>) -> Self {
        Self {
            sort,
            current_page: 1,
            ..self
        }
    }

    pub fn apply_page(self, page: usize) -> Self {
        Self {
            current_page: page.max(1),
            ..self
        }
    }

    /// State for a new record set: search and sort carry over, the page
    /// returns to 1.
    pub fn reset(self) -> Self {
        Self {
            current_page: 1,
            ..self
        }
    }
}
