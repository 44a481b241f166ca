//! Positional layout of the register's result table.
//!
//! The register renders each company as one index-tagged row whose cells carry
//! no semantic markup, so fields are read by position. These offsets mirror the
//! page as currently published; adjust them here if the layout moves.

/// Result containers, tried in order; the first one present wins.
pub const CONTAINER_SELECTORS: [&str; 3] = [
    r#"table[role="grid"]"#,
    "table.results",
    "div.search-results",
];

/// Row attribute carrying the numeric row index. Rows without it are headers or spacers.
pub const ROW_INDEX_ATTR: &str = "data-ri";

/// Anchor class marking a document download link.
pub const DOCUMENT_LINK_SELECTOR: &str = "a.dokumentList";

/// Label element inside a document link holding its type code.
pub const DOCUMENT_LABEL_SELECTOR: &str = "span";

/// Type code used when a document link carries no label.
pub const UNKNOWN_DOCUMENT_TYPE: &str = "Unknown";

/// Rows with fewer cells than this are malformed.
pub const MIN_CELLS: usize = 5;

pub const COURT_CELL: usize = 1;
pub const NAME_CELL: usize = 2;
pub const STATE_CELL: usize = 3;
pub const STATUS_CELL: usize = 4;
pub const DOCUMENTS_CELL: usize = 5;

/// First cell of the history block.
pub const HISTORY_START: usize = 8;

/// Each history entry spans this many cells: label, location, and an empty trailer.
pub const HISTORY_STRIDE: usize = 3;
