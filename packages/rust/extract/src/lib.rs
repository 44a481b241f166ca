//! Field extraction from register disclosure documents.
//!
//! The text of a current-data printout ("Aktueller Ausdruck") follows a loose
//! numbered-clause convention and arrives with whatever layout the PDF text
//! extractor produced. Rather than one grammar, extraction is a battery of
//! independent best-effort [`rules`]: a field whose pattern does not match is
//! simply absent.

mod cleanup;
pub mod people;
pub mod rules;

use std::panic::{AssertUnwindSafe, catch_unwind};

use handelsregister_shared::ExtractedFields;
use tracing::{debug, error, instrument, trace};

pub use rules::{Field, FieldRule, GMBH_LEGAL_FORM, battery, rule};

/// Extract every recognizable field from raw document text.
///
/// Never fails: unmatched fields stay `None`/empty, and an internal fault
/// yields an empty [`ExtractedFields`].
#[instrument(skip_all, fields(text_len = raw_text.len()))]
pub fn extract(raw_text: &str) -> ExtractedFields {
    extract_with(raw_text, battery())
}

fn extract_with(text: &str, rules: &[FieldRule]) -> ExtractedFields {
    match catch_unwind(AssertUnwindSafe(|| run_rules(text, rules))) {
        Ok(fields) => fields,
        Err(_) => {
            error!("field extraction aborted, returning empty result");
            ExtractedFields::default()
        }
    }
}

fn run_rules(text: &str, rules: &[FieldRule]) -> ExtractedFields {
    let mut fields = ExtractedFields::default();
    let mut populated = 0usize;

    for rule in rules {
        let hit = rule.run(text, &mut fields);
        trace!(field = rule.field.as_str(), hit, "rule evaluated");
        populated += usize::from(hit);
    }

    debug!(populated, total = rules.len(), "document fields extracted");
    fields
}

#[cfg(test)]
mod tests {
    use super::*;
    use handelsregister_shared::Person;

    fn load_fixture(name: &str) -> String {
        let path = format!("../../../fixtures/documents/{name}");
        std::fs::read_to_string(&path).unwrap_or_else(|_| panic!("missing fixture: {path}"))
    }

    #[test]
    fn extracts_full_printout() {
        let text = load_fixture("European_EPC_Competence_Center_GmbH_AD.txt");
        let fields = extract(&text);

        assert_eq!(fields.registration_number.as_deref(), Some("HRB 77834"));
        assert_eq!(fields.number_of_entries, Some(7));
        assert_eq!(
            fields.company_name.as_deref(),
            Some("European EPC Competence Center GmbH")
        );
        assert_eq!(fields.location.as_deref(), Some("Köln"));
        assert_eq!(
            fields.business_address.as_deref(),
            Some("Widdersdorfer Straße 415, 50825 Köln")
        );
        assert_eq!(
            fields.business_purpose.as_deref(),
            Some(
                "Die Entwicklung und der Vertrieb von Lösungen für die\n\
                 elektronische Produktkennzeichnung sowie die Beratung\n\
                 auf diesem Gebiet."
            )
        );
        assert_eq!(fields.capital.as_deref(), Some("25.000,00 EUR"));
        assert_eq!(
            fields.representation_rules.as_deref(),
            Some(
                "Ist nur ein Geschäftsführer bestellt, so vertritt er die Gesellschaft allein. \
                 Sind mehrere Geschäftsführer bestellt, so wird die Gesellschaft durch zwei \
                 Geschäftsführer oder durch einen Geschäftsführer gemeinsam mit einem \
                 Prokuristen vertreten."
            )
        );
        assert_eq!(
            fields.management,
            vec![
                Person {
                    name: "Müller, Hans".into(),
                    location: "Köln".into(),
                    birth_date: "01.02.1970".into(),
                },
                Person {
                    name: "Schmidt, Eva".into(),
                    location: "Bonn".into(),
                    birth_date: "15.08.1982".into(),
                },
            ]
        );
        assert_eq!(
            fields.prokura,
            vec![Person {
                name: "Meier, Anna".into(),
                location: "Köln".into(),
                birth_date: "05.06.1975".into(),
            }]
        );
        assert_eq!(fields.legal_form.as_deref(), Some(GMBH_LEGAL_FORM));
        assert_eq!(fields.founding_date.as_deref(), Some("12.05.2010"));
        assert_eq!(fields.last_entry_date.as_deref(), Some("21.09.2023"));
    }

    #[test]
    fn fragments_from_register_text() {
        let fields = extract("HRB 44343");
        assert_eq!(fields.registration_number.as_deref(), Some("HRB 44343"));

        let fields = extract("Anzahl der bisherigen Eintragungen: 12");
        assert_eq!(fields.number_of_entries, Some(12));
        assert!(fields.registration_number.is_none());
    }

    #[test]
    fn unrecognized_text_yields_empty_fields() {
        let fields = extract("Lorem ipsum dolor sit amet.\nNichts zu sehen.");
        assert!(fields.is_empty());
        assert!(extract("").is_empty());
    }

    #[test]
    fn faulting_rule_yields_empty_fields() {
        let rules = [
            rule(Field::RegistrationNumber).clone(),
            FieldRule::new(Field::Capital, r"Stammkapital", |_, _| panic!("rule fault")),
        ];
        let fields = extract_with("HRB 44343\nGrund- oder Stammkapital: 1 EUR", &rules);
        assert!(fields.is_empty());

        // The same text without the faulting rule extracts normally.
        let fields = extract_with("HRB 44343\nGrund- oder Stammkapital: 1 EUR", &rules[..1]);
        assert_eq!(fields.registration_number.as_deref(), Some("HRB 44343"));
    }

    #[test]
    fn extraction_is_idempotent() {
        let text = load_fixture("European_EPC_Competence_Center_GmbH_AD.txt");
        assert_eq!(extract(&text), extract(&text));
    }

    #[test]
    fn management_falls_back_to_comma_split() {
        let text = "Geschäftsführer:\nMüller Hans, Berlin, *1.2.1970\n5. Prokura:";
        let fields = extract(text);
        assert_eq!(
            fields.management,
            vec![Person {
                name: "Müller Hans".into(),
                location: "Berlin".into(),
                birth_date: "1.2.1970".into(),
            }]
        );
    }

    #[test]
    fn extracted_json_keys() {
        let text = load_fixture("European_EPC_Competence_Center_GmbH_AD.txt");
        let json = serde_json::to_value(extract(&text)).expect("serialize");
        let keys: Vec<&str> = json
            .as_object()
            .expect("object")
            .keys()
            .map(String::as_str)
            .collect();
        for field in battery().iter().map(|r| r.field.as_str()) {
            assert!(keys.contains(&field), "missing key {field}");
        }
        assert!(keys.contains(&"founding_date"));
    }
}
