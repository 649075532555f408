//! Fabricscope Core - severity classification, health rollup and
//! schema-less table browsing for fabric diagnostics captures.
//!
//! The crate is split along the two engines every category page depends on:
//!
//! - [`health`] classifies records into severity tiers with data-driven
//!   category definitions and rolls them up into per-category evaluations
//!   and dashboard cards.
//! - [`table`] discovers columns over arbitrary record shapes and browses
//!   them with search, type-aware sort and pagination.
//!
//! Both rely on [`values`] for every type coercion and on [`snapshot`] for
//! the in-memory payload handed over by the capture-ingestion side.
//! [`category_page`] composes them into one category's page.

pub mod category_page;
pub mod constants;
pub mod errors;
pub mod health;
pub mod snapshot;
pub mod table;
pub mod values;

pub use category_page::{CategoryPage, CategoryPageView, RowHealth};
pub use errors::Error;
pub use errors::Result;
pub use snapshot::{CategoryPayload, CategorySummary, PayloadSnapshot};
pub use values::Record;
