//! Schema-less table browsing.
//!
//! - **Schema** (`schema.rs`) - Column discovery over arbitrary record shapes
//! - **Compare** (`compare.rs`) - Natural text order and column sort modes
//! - **State** (`state.rs`) - BrowserState and its pure transitions
//! - **Browser** (`browser.rs`) - TableBrowser, search, pagination and views

pub mod browser;
pub mod compare;
pub mod schema;
pub mod state;


pub use browser::{
    BrowserOptions, BrowserView, Cell, PreviewNotice, RenderedRow, TableBrowser, TablePage,
};
pub use compare::natural_cmp;
pub use schema::discover_columns;
pub use state::{BrowserState, SortDirection, SortSpec};
