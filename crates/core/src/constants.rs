/// Rows per page when a browser is not configured otherwise
pub const DEFAULT_PAGE_SIZE: usize = 100;

/// Prefix marking fields the system adds to records for its own bookkeeping.
/// Such fields never appear as discovered columns.
pub const INTERNAL_FIELD_PREFIX: &str = "__";

/// Internal field carrying a row's classified tier
pub const TIER_FIELD: &str = "__tier";

/// Internal field carrying a row's issue reason
pub const REASON_FIELD: &str = "__reason";

/// Placeholder rendered for a missing or null cell
pub const MISSING_CELL_PLACEHOLDER: &str = "—";

/// Aliases of the per-record explicit severity override
pub const SEVERITY_FIELD_ALIASES: &[&str] = &["Severity", "severity"];

/// Separator between reasons when several rules match one record
pub const REASON_SEPARATOR: &str = "; ";
