use std::collections::BTreeSet;
use std::sync::LazyLock;

use medrec_model::DEFAULT_HEADER;
use medrec_standards::CompiledPatterns;
use regex::Regex;

const PATIENT_INSTRUCTIONS: &str = "Patient Instructions";

/// "given patient instructions" refers to instructions, not a section header.
static GIVEN_INSTRUCTIONS_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\bgiven\s+patient instructions\b")
        .expect("Invalid given-instructions regex")
});

/// Literal trigger of the default label.
static DEFAULT_HEADER_TRIGGER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\bPROGRESS NOTES\b").expect("Invalid progress notes regex")
});

/// Labels of every pattern matching `text`, after the exclusion and
/// dilution rules. May be empty.
pub(crate) fn detect_headers(text: &str, patterns: &CompiledPatterns) -> BTreeSet<String> {
    let instructions_given = GIVEN_INSTRUCTIONS_REGEX.is_match(text);
    let mut found = BTreeSet::new();
    for pattern in patterns.iter() {
        if instructions_given && pattern.label == PATIENT_INSTRUCTIONS {
            continue;
        }
        if pattern.regex.is_match(text) {
            found.insert(pattern.label.clone());
        }
    }
    if found.len() > 1 && found.contains(DEFAULT_HEADER) && !DEFAULT_HEADER_TRIGGER.is_match(text)
    {
        found.remove(DEFAULT_HEADER);
    }
    found
}
