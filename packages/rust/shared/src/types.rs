//! Core domain types for register search results and extracted document data.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// SearchOption
// ---------------------------------------------------------------------------

/// How the register matches the search keywords.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchOption {
    /// Results must contain all keywords.
    #[default]
    All,
    /// Results must contain at least one keyword.
    Min,
    /// Results must carry the exact company name.
    Exact,
}

/// Numeric form codes the register's search form expects for each option.
pub const SEARCH_OPTION_CODES: [(SearchOption, u8); 3] = [
    (SearchOption::All, 1),
    (SearchOption::Min, 2),
    (SearchOption::Exact, 3),
];

impl SearchOption {
    /// The register's numeric form code for this option.
    pub fn code(self) -> u8 {
        SEARCH_OPTION_CODES
            .iter()
            .find(|(option, _)| *option == self)
            .map(|(_, code)| *code)
            .unwrap_or(1)
    }

    /// Lowercase label as used on the command line and in config.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Min => "min",
            Self::Exact => "exact",
        }
    }
}

impl std::fmt::Display for SearchOption {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for SearchOption {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(Self::All),
            "min" => Ok(Self::Min),
            "exact" => Ok(Self::Exact),
            other => Err(format!(
                "unknown search option '{other}': expected 'all', 'min', or 'exact'"
            )),
        }
    }
}

// ---------------------------------------------------------------------------
// CompanyRecord
// ---------------------------------------------------------------------------

/// A download link for one disclosure document attached to a result row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentLink {
    /// Element id of the anchor; never empty.
    pub id: String,
    /// Short document-type code, e.g. `AD`, `CD`, `HD`. `Unknown` when unlabelled.
    #[serde(rename = "type")]
    pub doc_type: String,
    /// Raw `onclick` attribute value (empty when absent).
    #[serde(rename = "onclick")]
    pub onclick_action: String,
}

/// One company entry from a register result list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompanyRecord {
    /// Registering court plus registration-number suffix.
    pub court: String,
    /// Company name.
    pub name: String,
    /// Registered seat shown in the results.
    pub state: String,
    /// Free-text registration status label.
    pub status: String,
    /// All document-type abbreviations of the row, concatenated without delimiter.
    pub documents_summary: String,
    /// `(event label, event location)` pairs in document order.
    pub history: Vec<(String, String)>,
    /// Document links in document order.
    pub document_links: Vec<DocumentLink>,
    /// Fields extracted from the company's disclosure document, if retrieved.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extracted_fields: Option<ExtractedFields>,
}

impl CompanyRecord {
    /// Document links of the given type code, in document order.
    pub fn links_of_type<'a>(&'a self, doc_type: &'a str) -> impl Iterator<Item = &'a DocumentLink> {
        self.document_links
            .iter()
            .filter(move |link| link.doc_type == doc_type)
    }

    /// Attach extracted document fields. Empty extractions are not attached.
    pub fn attach_extracted(&mut self, fields: ExtractedFields) -> bool {
        if fields.is_empty() {
            return false;
        }
        self.extracted_fields = Some(fields);
        true
    }
}

// ---------------------------------------------------------------------------
// ExtractedFields
// ---------------------------------------------------------------------------

/// A person listed as managing director or holder of Prokura.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
    /// `"Last, First"` (or the raw name when only one name part is present).
    pub name: String,
    /// Place of residence.
    pub location: String,
    /// Birth date as the literal `DD.MM.YYYY` string found in the document.
    pub birth_date: String,
}

/// Structured fields extracted from a register disclosure document.
///
/// Every field is optional; absence means the corresponding pattern did not match.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedFields {
    #[serde(rename = "company_number", default, skip_serializing_if = "Option::is_none")]
    pub registration_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number_of_entries: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub business_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub business_purpose: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capital: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub representation_rules: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub management: Vec<Person>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub prokura: Vec<Person>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub legal_form: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub founding_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_entry_date: Option<String>,
}

impl ExtractedFields {
    /// True when no field was populated.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_option_codes() {
        assert_eq!(SearchOption::All.code(), 1);
        assert_eq!(SearchOption::Min.code(), 2);
        assert_eq!(SearchOption::Exact.code(), 3);
    }

    #[test]
    fn search_option_parses_case_insensitively() {
        assert_eq!("EXACT".parse::<SearchOption>(), Ok(SearchOption::Exact));
        assert!("fuzzy".parse::<SearchOption>().is_err());
    }

    #[test]
    fn extracted_fields_uses_register_key_names() {
        let fields = ExtractedFields {
            registration_number: Some("HRB 44343".into()),
            number_of_entries: Some(12),
            management: vec![Person {
                name: "Müller, Hans".into(),
                location: "Berlin".into(),
                birth_date: "01.02.1970".into(),
            }],
            ..Default::default()
        };

        let json = serde_json::to_value(&fields).expect("serialize");
        assert_eq!(json["company_number"], "HRB 44343");
        assert_eq!(json["number_of_entries"], 12);
        assert_eq!(json["management"][0]["birth_date"], "01.02.1970");
        // Absent fields are omitted entirely
        assert!(json.get("capital").is_none());
        assert!(json.get("prokura").is_none());
    }

    #[test]
    fn document_link_serializes_short_keys() {
        let link = DocumentLink {
            id: "row:0:fade".into(),
            doc_type: "AD".into(),
            onclick_action: String::new(),
        };
        let json = serde_json::to_value(&link).expect("serialize");
        assert_eq!(json, serde_json::json!({"id": "row:0:fade", "type": "AD", "onclick": ""}));
    }

    #[test]
    fn empty_extraction_is_not_attached() {
        let mut record = CompanyRecord::default();
        assert!(!record.attach_extracted(ExtractedFields::default()));
        assert!(record.extracted_fields.is_none());

        let fields = ExtractedFields {
            capital: Some("25.000,00 EUR".into()),
            ..Default::default()
        };
        assert!(record.attach_extracted(fields));
        assert!(record.extracted_fields.is_some());
    }
}
