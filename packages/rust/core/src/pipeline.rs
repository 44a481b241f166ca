//! Search orchestration: cache → fetch → parse → document extraction.

use std::time::{Duration, Instant};

use tracing::{debug, info, instrument, warn};

use handelsregister_shared::{CompanyRecord, DocumentLink, Result, SearchConfig};

use crate::cache::ResultCache;
use crate::source::RegisterSource;

// ---------------------------------------------------------------------------
// Outcome
// ---------------------------------------------------------------------------

/// What a search produced.
#[derive(Debug)]
pub struct SearchOutcome {
    pub records: Vec<CompanyRecord>,
    /// Result page came from the cache rather than the source.
    pub from_cache: bool,
    /// Records that received extracted document fields.
    pub documents_extracted: usize,
    pub elapsed: Duration,
}

// ---------------------------------------------------------------------------
// Progress reporting
// ---------------------------------------------------------------------------

/// Progress callback so the CLI can show a spinner.
pub trait ProgressReporter: Send + Sync {
    fn phase(&self, name: &str);
    fn company_processed(&self, name: &str, current: usize, total: usize);
    fn done(&self, outcome: &SearchOutcome);
}

/// No-op progress reporter.
pub struct SilentProgress;

impl ProgressReporter for SilentProgress {
    fn phase(&self, _name: &str) {}
    fn company_processed(&self, _name: &str, _current: usize, _total: usize) {}
    fn done(&self, _outcome: &SearchOutcome) {}
}

// ---------------------------------------------------------------------------
// Search
// ---------------------------------------------------------------------------

/// Run one search.
///
/// The cached page is used unless `config.force` or `config.fetch_documents`
/// is set, since document links only resolve against the page the source
/// just loaded. A fresh page is always stored back. With
/// `config.fetch_documents`, each record's first retrievable document of
/// `config.document_type` is run through field extraction. Document failures are logged and skipped; only a failure to
/// obtain the result page aborts the search.
#[instrument(skip_all, fields(term = %term, option = %config.option, force = config.force, documents = config.fetch_documents))]
pub async fn search<S: RegisterSource>(
    source: &S,
    cache: &ResultCache,
    term: &str,
    config: &SearchConfig,
    progress: &dyn ProgressReporter,
) -> Result<SearchOutcome> {
    let start = Instant::now();

    let cached = if config.force || config.fetch_documents {
        None
    } else {
        match cache.load(term).await {
            Ok(hit) => hit,
            Err(e) => {
                warn!(error = %e, "result cache unreadable, fetching fresh page");
                None
            }
        }
    };
    let from_cache = cached.is_some();

    let markup = match cached {
        Some(markup) => markup,
        None => {
            progress.phase("Fetching result page");
            let markup = source.fetch_results(term, config.option).await?;
            if let Err(e) = cache.store(term, &markup).await {
                warn!(error = %e, "could not cache result page");
            }
            markup
        }
    };

    progress.phase("Parsing results");
    let mut records = handelsregister_results::parse(&markup);
    info!(count = records.len(), from_cache, "result page parsed");

    let mut documents_extracted = 0;
    if config.fetch_documents && !records.is_empty() {
        progress.phase("Extracting documents");
        let total = records.len();
        for (i, record) in records.iter_mut().enumerate() {
            if attach_document(source, record, &config.document_type).await {
                documents_extracted += 1;
            }
            progress.company_processed(&record.name, i + 1, total);
        }
        info!(documents_extracted, total, "document extraction finished");
    }

    let outcome = SearchOutcome {
        records,
        from_cache,
        documents_extracted,
        elapsed: start.elapsed(),
    };
    progress.done(&outcome);
    Ok(outcome)
}

/// Try `doc_type` links in order until one can be retrieved, then extract.
/// Returns whether fields were attached.
async fn attach_document<S: RegisterSource>(
    source: &S,
    record: &mut CompanyRecord,
    doc_type: &str,
) -> bool {
    let links: Vec<DocumentLink> = record.links_of_type(doc_type).cloned().collect();
    if links.is_empty() {
        debug!(company = %record.name, doc_type, "no matching document link");
        return false;
    }

    for link in &links {
        match source.fetch_document_text(record, link).await {
            Ok(text) => {
                let fields = handelsregister_extract::extract(&text);
                let attached = record.attach_extracted(fields);
                if !attached {
                    debug!(company = %record.name, "document yielded no fields");
                }
                return attached;
            }
            Err(e) => {
                warn!(company = %record.name, link = %link.id, error = %e, "document retrieval failed");
            }
        }
    }
    false
}
