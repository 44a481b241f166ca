//! Where result pages and disclosure documents come from.
//!
//! The live register sits behind a browser session that is out of scope here;
//! [`RegisterSource`] is the seam where one plugs in. [`LocalSource`] serves
//! pages and documents previously saved to disk.

use std::future::Future;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::path::{Path, PathBuf};

use tracing::{debug, instrument};

use handelsregister_shared::{
    CompanyRecord, DocumentLink, RegisterError, Result, SearchConfig, SearchOption,
};

use crate::cache::slugify;

/// A provider of raw result markup and document text.
pub trait RegisterSource: Send + Sync {
    /// Raw markup of the result page for `term`.
    fn fetch_results(
        &self,
        term: &str,
        option: SearchOption,
    ) -> impl Future<Output = Result<String>> + Send;

    /// Plain text of the document behind `link` on `record`.
    fn fetch_document_text(
        &self,
        record: &CompanyRecord,
        link: &DocumentLink,
    ) -> impl Future<Output = Result<String>> + Send;
}

/// Serves saved result pages and downloaded documents from two directories.
///
/// Pages live at `<pages_dir>/<slug>.html`. Documents live at
/// `<documents_dir>/<Company_Name>_<TYPE>.txt` or `.pdf`, text preferred.
#[derive(Debug, Clone)]
pub struct LocalSource {
    pages_dir: PathBuf,
    documents_dir: PathBuf,
}

impl LocalSource {
    pub fn new(pages_dir: impl Into<PathBuf>, documents_dir: impl Into<PathBuf>) -> Self {
        Self {
            pages_dir: pages_dir.into(),
            documents_dir: documents_dir.into(),
        }
    }

    pub fn from_config(config: &SearchConfig) -> Self {
        Self::new(&config.pages_dir, &config.documents_dir)
    }

    /// Saved page for `term`.
    pub fn page_path(&self, term: &str) -> PathBuf {
        self.pages_dir.join(format!("{}.html", slugify(term)))
    }

    /// Candidate document files for `record`, in lookup order.
    pub fn document_paths(&self, record: &CompanyRecord, link: &DocumentLink) -> [PathBuf; 2] {
        let stem = format!("{}_{}", document_stem(&record.name), link.doc_type);
        [
            self.documents_dir.join(format!("{stem}.txt")),
            self.documents_dir.join(format!("{stem}.pdf")),
        ]
    }
}

impl RegisterSource for LocalSource {
    #[instrument(skip(self))]
    async fn fetch_results(&self, term: &str, option: SearchOption) -> Result<String> {
        let path = self.page_path(term);
        debug!(?path, code = option.code(), "reading saved result page");

        match tokio::fs::read_to_string(&path).await {
            Ok(markup) => Ok(markup),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(RegisterError::Source(
                format!("no saved result page for '{term}' at {}", path.display()),
            )),
            Err(e) => Err(RegisterError::io(path, e)),
        }
    }

    #[instrument(skip_all, fields(company = %record.name, link = %link.id))]
    async fn fetch_document_text(
        &self,
        record: &CompanyRecord,
        link: &DocumentLink,
    ) -> Result<String> {
        for path in self.document_paths(record, link) {
            if !tokio::fs::try_exists(&path).await.unwrap_or(false) {
                continue;
            }
            debug!(?path, "reading document");
            return match path.extension().and_then(|e| e.to_str()) {
                Some("pdf") => pdf_text(&path).await,
                _ => tokio::fs::read_to_string(&path)
                    .await
                    .map_err(|e| RegisterError::io(&path, e)),
            };
        }

        Err(RegisterError::Document(format!(
            "no {} document for '{}' in {}",
            link.doc_type,
            record.name,
            self.documents_dir.display()
        )))
    }
}

/// File stem for a company's documents: spaces and slashes become underscores.
pub fn document_stem(company_name: &str) -> String {
    company_name.replace([' ', '/'], "_")
}

/// Extract the text layer of a PDF off the async runtime.
pub async fn pdf_text(path: &Path) -> Result<String> {
    let path = path.to_path_buf();
    tokio::task::spawn_blocking(move || {
        // pdf-extract panics on some malformed inputs
        catch_unwind(AssertUnwindSafe(|| pdf_extract::extract_text(&path)))
            .map_err(|_| {
                RegisterError::Document(format!("PDF reader crashed on {}", path.display()))
            })?
            .map_err(|e| {
                RegisterError::Document(format!("cannot read PDF {}: {e}", path.display()))
            })
    })
    .await
    .map_err(|e| RegisterError::Document(format!("PDF extraction task failed: {e}")))?
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_dir(label: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("hr-source-{label}-{}", uuid::Uuid::now_v7()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn ad_link() -> DocumentLink {
        DocumentLink {
            id: "ergebnissForm:selectedSuchErgebnisFormTable:0:j_idt161:0:fade_".into(),
            doc_type: "AD".into(),
            onclick_action: String::new(),
        }
    }

    #[test]
    fn document_stem_replaces_separators() {
        assert_eq!(
            document_stem("European EPC Competence Center GmbH"),
            "European_EPC_Competence_Center_GmbH"
        );
        assert_eq!(document_stem("A/B Handel KG"), "A_B_Handel_KG");
    }

    #[test]
    fn document_paths_prefer_text() {
        let source = LocalSource::new("pages", "docs");
        let record = CompanyRecord {
            name: "Muster GmbH".into(),
            ..Default::default()
        };
        let [txt, pdf] = source.document_paths(&record, &ad_link());
        assert_eq!(txt, Path::new("docs").join("Muster_GmbH_AD.txt"));
        assert_eq!(pdf, Path::new("docs").join("Muster_GmbH_AD.pdf"));
    }

    #[tokio::test]
    async fn reads_saved_page() {
        let pages = temp_dir("pages");
        std::fs::write(pages.join("gasag.html"), "<table></table>").unwrap();
        let source = LocalSource::new(&pages, &pages);

        let markup = source.fetch_results("GASAG", SearchOption::Exact).await.unwrap();
        assert_eq!(markup, "<table></table>");

        let err = source.fetch_results("unknown", SearchOption::All).await.unwrap_err();
        assert!(matches!(err, RegisterError::Source(_)));

        std::fs::remove_dir_all(&pages).ok();
    }

    #[tokio::test]
    async fn reads_text_document() {
        let docs = temp_dir("docs");
        std::fs::write(docs.join("Muster_GmbH_AD.txt"), "HRB 1234").unwrap();
        let source = LocalSource::new(&docs, &docs);
        let record = CompanyRecord {
            name: "Muster GmbH".into(),
            ..Default::default()
        };

        let text = source.fetch_document_text(&record, &ad_link()).await.unwrap();
        assert_eq!(text, "HRB 1234");

        let other = CompanyRecord {
            name: "Andere AG".into(),
            ..Default::default()
        };
        let err = source.fetch_document_text(&other, &ad_link()).await.unwrap_err();
        assert!(matches!(err, RegisterError::Document(_)));

        std::fs::remove_dir_all(&docs).ok();
    }

    #[tokio::test]
    async fn broken_pdf_is_a_document_error() {
        let docs = temp_dir("pdf");
        let path = docs.join("broken.pdf");
        std::fs::write(&path, b"%PDF-1.4 not really").unwrap();

        let err = pdf_text(&path).await.unwrap_err();
        assert!(matches!(err, RegisterError::Document(_)));

        std::fs::remove_dir_all(&docs).ok();
    }
}
