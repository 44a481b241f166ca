//! Person lists for the managing-director and Prokura clauses.
//!
//! Entries are written as `Last, First, Location, *DD.MM.YYYY`. The tuple pattern
//! handles the regular layout; when it finds nobody, each line is split on commas
//! instead, accepting both the four-part layout and a three-part
//! `Name, Location, *Birth` layout.
//!
//! The comma split is a heuristic: names that themselves contain commas
//! (academic titles such as `Dr., jur.`) shift the parts and are read wrongly.

use std::sync::LazyLock;

use handelsregister_shared::Person;
use regex::Regex;
use tracing::debug;

use crate::cleanup::collapse_whitespace;

static PERSON_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([^,\n]+),\s*([^,\n]+),\s*([^,\n]+),\s*\*\s*(\d{2}\.\d{2}\.\d{4})")
        .expect("person regex")
});

/// Signing-authority prefixes in front of Prokura holders.
static PROKURA_PREFIX_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:Einzelprokura|Gesamtprokura):\s*").expect("prokura prefix regex")
});

/// People listed in a managing-director block.
pub(crate) fn management(block: &str) -> Vec<Person> {
    people(block)
}

/// People listed in a Prokura block, with signing-authority prefixes removed.
pub(crate) fn prokura(block: &str) -> Vec<Person> {
    let stripped = PROKURA_PREFIX_RE.replace_all(block, "");
    people(&stripped)
}

fn people(block: &str) -> Vec<Person> {
    let found = from_tuples(&collapse_whitespace(block));
    if !found.is_empty() {
        return found;
    }

    let fallback = from_lines(block);
    debug!(
        found = fallback.len(),
        "tuple pattern matched nobody, used comma-split fallback"
    );
    fallback
}

/// Match repeated `Last, First, Location, *Birth` tuples.
pub fn from_tuples(text: &str) -> Vec<Person> {
    PERSON_RE
        .captures_iter(text)
        .map(|caps| Person {
            name: format!("{}, {}", caps[1].trim(), caps[2].trim()),
            location: caps[3].trim().to_string(),
            birth_date: caps[4].to_string(),
        })
        .collect()
}

/// Split each line on commas. A line counts only if it carries a `*` birth marker.
pub fn from_lines(block: &str) -> Vec<Person> {
    block
        .lines()
        .map(str::trim)
        .filter(|line| line.contains('*') && line.contains(','))
        .filter_map(person_from_parts)
        .collect()
}

fn person_from_parts(line: &str) -> Option<Person> {
    let parts: Vec<&str> = line.split(',').map(str::trim).collect();

    let (name, location, birth_info) = match parts.as_slice() {
        [last, first, location, birth, ..] => (format!("{last}, {first}"), *location, *birth),
        [name, location, birth] => (name.to_string(), *location, *birth),
        _ => return None,
    };

    let birth_date = birth_info.split('*').nth(1)?.trim();
    if birth_date.is_empty() {
        return None;
    }

    Some(Person {
        name,
        location: location.to_string(),
        birth_date: birth_date.to_string(),
    })
}
