//! The extraction battery: one independent rule per field.
//!
//! Each [`FieldRule`] pairs a pattern with a post-processor that writes into
//! [`ExtractedFields`]. Rules never depend on each other and may run in any order.
//!
//! Block-valued clauses (business purpose, managing directors, Prokura) run up to
//! the next numbered clause (`\n<digits>.`) or the end of the text. The business
//! purpose additionally ends at the first line starting with a capital letter.

use std::sync::LazyLock;

use handelsregister_shared::ExtractedFields;
use regex::{Captures, Regex};
use tracing::debug;

use crate::cleanup::{collapse_whitespace, reflow_lines};
use crate::people;

/// The only legal form whose founding clause is recognized.
pub const GMBH_LEGAL_FORM: &str = "Gesellschaft mit beschränkter Haftung";

/// Fields the battery can populate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    RegistrationNumber,
    NumberOfEntries,
    CompanyName,
    Location,
    BusinessAddress,
    BusinessPurpose,
    Capital,
    RepresentationRules,
    Management,
    Prokura,
    /// Legal form together with the founding date.
    LegalForm,
    LastEntryDate,
}

impl Field {
    /// Key of the field in JSON output.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::RegistrationNumber => "company_number",
            Self::NumberOfEntries => "number_of_entries",
            Self::CompanyName => "company_name",
            Self::Location => "location",
            Self::BusinessAddress => "business_address",
            Self::BusinessPurpose => "business_purpose",
            Self::Capital => "capital",
            Self::RepresentationRules => "representation_rules",
            Self::Management => "management",
            Self::Prokura => "prokura",
            Self::LegalForm => "legal_form",
            Self::LastEntryDate => "last_entry_date",
        }
    }
}

/// Writes a match into the output; returns whether a value was stored.
type Apply = fn(&Captures<'_>, &mut ExtractedFields) -> bool;

/// One pattern plus its post-processing step.
#[derive(Clone)]
pub struct FieldRule {
    /// Field this rule populates.
    pub field: Field,
    pattern: Regex,
    apply: Apply,
}

impl FieldRule {
    pub(crate) fn new(field: Field, pattern: &str, apply: Apply) -> Self {
        Self {
            field,
            pattern: Regex::new(pattern).expect("field rule regex"),
            apply,
        }
    }

    /// The rule's pattern source.
    pub fn pattern(&self) -> &str {
        self.pattern.as_str()
    }

    /// Run against `text`, storing into `out` on a match.
    /// Returns `true` when the field was populated.
    pub fn run(&self, text: &str, out: &mut ExtractedFields) -> bool {
        match self.pattern.captures(text) {
            Some(caps) => (self.apply)(&caps, out),
            None => false,
        }
    }
}

static BATTERY: LazyLock<Vec<FieldRule>> = LazyLock::new(|| {
    vec![
        FieldRule::new(Field::RegistrationNumber, r"HRB\s*(\d+)", |caps, out| {
            out.registration_number = Some(format!("HRB {}", &caps[1]));
            true
        }),
        FieldRule::new(
            Field::NumberOfEntries,
            r"Anzahl der bisherigen Eintragungen:\s*(\d+)",
            |caps, out| match caps[1].parse::<u32>() {
                Ok(n) => {
                    out.number_of_entries = Some(n);
                    true
                }
                Err(e) => {
                    debug!(value = &caps[1], error = %e, "entry count out of range");
                    false
                }
            },
        ),
        FieldRule::new(
            Field::CompanyName,
            r"2\.\s*a\)\s*Firma:\s*([^\n]+)",
            |caps, out| store_trimmed(&mut out.company_name, &caps[1]),
        ),
        FieldRule::new(Field::Location, r"Sitz[^:]*:\s*([^\n]+)", |caps, out| {
            store_trimmed(&mut out.location, &caps[1])
        }),
        FieldRule::new(
            Field::BusinessAddress,
            r"Geschäftsanschrift:\s*([^\n]+)",
            |caps, out| store_trimmed(&mut out.business_address, &caps[1]),
        ),
        FieldRule::new(
            Field::BusinessPurpose,
            r"Gegenstand des Unternehmens:\s*((?s:.+?))(?:\n\d+\.|\n\p{Lu}|\z)",
            |caps, out| store_nonempty(&mut out.business_purpose, reflow_lines(&caps[1])),
        ),
        FieldRule::new(
            Field::Capital,
            r"Grund- oder Stammkapital:\s*([^\n]+)",
            |caps, out| store_trimmed(&mut out.capital, &caps[1]),
        ),
        FieldRule::new(
            Field::RepresentationRules,
            r"Allgemeine Vertretungsregelung:\s*((?s:.+?))(?:b\)|\z)",
            |caps, out| {
                store_nonempty(&mut out.representation_rules, collapse_whitespace(&caps[1]))
            },
        ),
        FieldRule::new(
            Field::Management,
            r"Geschäftsführer:((?s:.+?))(?:\n\d+\.|\z)",
            |caps, out| {
                out.management = people::management(&caps[1]);
                !out.management.is_empty()
            },
        ),
        FieldRule::new(
            Field::Prokura,
            r"Prokura:\s*((?s:.+?))(?:\n\d+\.|\z)",
            |caps, out| {
                out.prokura = people::prokura(&caps[1]);
                !out.prokura.is_empty()
            },
        ),
        FieldRule::new(
            Field::LegalForm,
            r"Gesellschaft mit beschränkter Haftung\s*Gesellschaftsvertrag vom\s*(\d{2}\.\d{2}\.\d{4})",
            |caps, out| {
                out.legal_form = Some(GMBH_LEGAL_FORM.to_string());
                out.founding_date = Some(caps[1].to_string());
                true
            },
        ),
        FieldRule::new(
            Field::LastEntryDate,
            r"Tag der letzten Eintragung:\s*(\d{2}\.\d{2}\.\d{4})",
            |caps, out| {
                out.last_entry_date = Some(caps[1].to_string());
                true
            },
        ),
    ]
});

/// All rules, in a fixed but insignificant order.
pub fn battery() -> &'static [FieldRule] {
    &BATTERY
}

/// The rule that populates `field`.
pub fn rule(field: Field) -> &'static FieldRule {
    battery()
        .iter()
        .find(|r| r.field == field)
        .expect("every field has a rule")
}

fn store_trimmed(slot: &mut Option<String>, value: &str) -> bool {
    store_nonempty(slot, value.trim().to_string())
}

fn store_nonempty(slot: &mut Option<String>, value: String) -> bool {
    if value.is_empty() {
        return false;
    }
    *slot = Some(value);
    true
}
