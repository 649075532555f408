//! Value normalization for schema-less records.
//!
//! Diagnostic captures disagree on how they spell both field names and
//! values: a flag may arrive as `true`, `"true"` or `1`, a counter as a
//! number or a string, and the same logical field as `"Node Name"` or
//! `NodeName`. Every classifier and the table browser read records through
//! this module so coercion semantics are identical across the system.

mod fields;
mod normalizer;

pub use fields::{bool_field, field, has_field, loose_key, number_field, text_field};
pub use normalizer::{as_boolean, as_display_text, as_number, as_search_text, strict_number};

/// One row of diagnostic data. Field order is the order the capture
/// delivered them in.
pub type Record = serde_json::Map<String, serde_json::Value>;
