//! Result-list parsing for Handelsregister search pages.
//!
//! Turns the raw markup of a register result page into [`CompanyRecord`]s.
//! Parsing is partial-failure tolerant: a malformed row is logged and dropped,
//! and a page without a results container simply yields no records.

pub mod layout;

use std::sync::LazyLock;

use handelsregister_shared::{CompanyRecord, DocumentLink};
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, info, instrument};

use layout::*;

// ---------------------------------------------------------------------------
// Selectors (compiled once)
// ---------------------------------------------------------------------------

static CONTAINER_SELS: LazyLock<Vec<Selector>> = LazyLock::new(|| {
    CONTAINER_SELECTORS
        .iter()
        .map(|s| Selector::parse(s).expect("container selector"))
        .collect()
});

static ROW_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("tr").expect("row selector"));

static CELL_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("td").expect("cell selector"));

static LINK_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(DOCUMENT_LINK_SELECTOR).expect("link selector"));

static LABEL_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(DOCUMENT_LABEL_SELECTOR).expect("label selector"));

// ---------------------------------------------------------------------------
// Row errors
// ---------------------------------------------------------------------------

/// Why a candidate row was dropped.
#[derive(Debug, thiserror::Error)]
enum RowError {
    #[error("row index '{0}' is not numeric")]
    BadRowIndex(String),

    #[error("row has {found} cells, expected at least {min}", min = MIN_CELLS)]
    TooFewCells { found: usize },
}

// ---------------------------------------------------------------------------
// Parser
// ---------------------------------------------------------------------------

/// Parse a register result page into company records, in page order.
///
/// Returns an empty list when the page has no results container.
#[instrument(skip_all, fields(markup_len = raw_markup.len()))]
pub fn parse(raw_markup: &str) -> Vec<CompanyRecord> {
    let doc = Html::parse_document(raw_markup);

    let Some(container) = find_container(&doc) else {
        info!("no results container found, treating page as zero results");
        return Vec::new();
    };

    let mut records = Vec::new();
    let mut dropped = 0usize;

    for row in container.select(&ROW_SEL) {
        // Header and spacer rows carry no row index.
        let Some(index) = row.value().attr(ROW_INDEX_ATTR) else {
            continue;
        };

        match parse_row(index, row) {
            Ok(record) => records.push(record),
            Err(e) => {
                dropped += 1;
                debug!(row_index = index, error = %e, "skipping malformed result row");
            }
        }
    }

    debug!(records = records.len(), dropped, "result list parsed");
    records
}

/// Locate the results container, trying each known layout in order.
fn find_container(doc: &Html) -> Option<ElementRef<'_>> {
    CONTAINER_SELS
        .iter()
        .zip(CONTAINER_SELECTORS)
        .find_map(|(sel, name)| {
            doc.select(sel).next().inspect(|_| {
                debug!(container = name, "results container located");
            })
        })
}

/// Parse a single index-tagged row.
fn parse_row(index: &str, row: ElementRef<'_>) -> Result<CompanyRecord, RowError> {
    index
        .trim()
        .parse::<usize>()
        .map_err(|_| RowError::BadRowIndex(index.to_string()))?;

    let cells: Vec<String> = row
        .select(&CELL_SEL)
        .map(|cell| cell.text().collect::<String>().trim().to_string())
        .collect();

    if cells.len() < MIN_CELLS {
        return Err(RowError::TooFewCells { found: cells.len() });
    }

    let cell = |i: usize| cells.get(i).cloned().unwrap_or_default();

    Ok(CompanyRecord {
        court: cell(COURT_CELL),
        name: cell(NAME_CELL),
        state: cell(STATE_CELL),
        status: cell(STATUS_CELL),
        documents_summary: cell(DOCUMENTS_CELL),
        history: history_pairs(&cells),
        document_links: document_links(row),
        extracted_fields: None,
    })
}

/// Pair up history cells, starting at [`HISTORY_START`] with stride [`HISTORY_STRIDE`].
fn history_pairs(cells: &[String]) -> Vec<(String, String)> {
    (HISTORY_START..cells.len())
        .step_by(HISTORY_STRIDE)
        .filter(|&i| i + 1 < cells.len())
        .map(|i| (cells[i].clone(), cells[i + 1].clone()))
        .collect()
}

/// Collect the row's document links. Anchors without an id are ignored.
fn document_links(row: ElementRef<'_>) -> Vec<DocumentLink> {
    row.select(&LINK_SEL)
        .filter_map(|link| {
            let id = link.value().attr("id").filter(|id| !id.is_empty())?;

            let doc_type = link
                .select(&LABEL_SEL)
                .next()
                .map(|label| label.text().collect::<String>().trim().to_string())
                .unwrap_or_else(|| UNKNOWN_DOCUMENT_TYPE.to_string());

            Some(DocumentLink {
                id: id.to_string(),
                doc_type,
                onclick_action: link.value().attr("onclick").unwrap_or_default().to_string(),
            })
        })
        .collect()
}
