//! Human-readable and JSON renderings of company records.

use serde::Serialize;

use handelsregister_shared::{CompanyRecord, DocumentLink, ExtractedFields, Result};

#[derive(Serialize)]
struct CompanyJson<'a> {
    basic_info: BasicInfo<'a>,
    #[serde(skip_serializing_if = "Option::is_none")]
    extracted_data: Option<&'a ExtractedFields>,
    #[serde(skip_serializing_if = "Option::is_none")]
    document_links: Option<&'a [DocumentLink]>,
}

#[derive(Serialize)]
struct BasicInfo<'a> {
    name: &'a str,
    court: &'a str,
    state: &'a str,
    status: &'a str,
    documents: &'a str,
    history: &'a [(String, String)],
}

impl<'a> From<&'a CompanyRecord> for CompanyJson<'a> {
    fn from(record: &'a CompanyRecord) -> Self {
        Self {
            basic_info: BasicInfo {
                name: &record.name,
                court: &record.court,
                state: &record.state,
                status: &record.status,
                documents: &record.documents_summary,
                history: &record.history,
            },
            extracted_data: record.extracted_fields.as_ref(),
            document_links: (!record.document_links.is_empty())
                .then_some(record.document_links.as_slice()),
        }
    }
}

/// Pretty-printed JSON array of all records. Non-ASCII text is written as-is.
pub fn json(records: &[CompanyRecord]) -> Result<String> {
    let entries: Vec<CompanyJson<'_>> = records.iter().map(CompanyJson::from).collect();
    Ok(serde_json::to_string_pretty(&entries)?)
}

/// Multi-line text block for one record.
pub fn text(record: &CompanyRecord) -> Result<String> {
    let mut out = format!(
        "name: {}\ncourt: {}\nstate: {}\nstatus: {}\n",
        record.name, record.court, record.state, record.status
    );

    out.push_str("history:\n");
    for (name, location) in &record.history {
        out.push_str(&format!("  {name} {location}\n"));
    }

    if let Some(fields) = &record.extracted_fields {
        out.push_str("extracted_data:\n");
        out.push_str(&serde_json::to_string_pretty(fields)?);
        out.push('\n');
    }

    Ok(out)
}
