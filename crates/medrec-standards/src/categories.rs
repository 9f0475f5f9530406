//! Header label to numeric category code table.

use std::collections::BTreeMap;

/// Category code for labels without a table entry.
pub const DEFAULT_CATEGORY_ID: u32 = 17;

const BUILTIN_CATEGORIES: &[(&str, u32)] = &[
    ("Admission Assessment", 26),
    ("Billing", 25),
    ("Clinical Comments", 40),
    ("Clinical Notes", 1),
    ("Consultation Note", 34),
    ("Consent Form", 22),
    ("Diagnostic Report", 27),
    ("Discharge Summary", 21),
    ("Initial Assessment", 1),
    ("Intake And Output Record", 41),
    ("IV Fluids Chart", 19),
    ("Laboratory Components", 36),
    ("Laboratory Information", 37),
    ("Laboratory Narrative", 39),
    ("Laboratory Notes", 38),
    ("Laboratory Report", 24),
    ("Medication Orders", 18),
    ("Nursing Notes", 20),
    ("Patient Education", 28),
    ("Pre-Op Checklist", 23),
    ("Preventive Care", 33),
    ("Progress Notes", 17),
    ("Temperature Chart", 16),
    ("Vital Signs", 16),
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryMap {
    entries: BTreeMap<String, u32>,
    default_id: u32,
}

impl Default for CategoryMap {
    fn default() -> Self {
        Self::builtin()
    }
}

impl CategoryMap {
    pub fn builtin() -> Self {
        Self {
            entries: BUILTIN_CATEGORIES
                .iter()
                .map(|(label, id)| ((*label).to_string(), *id))
                .collect(),
            default_id: DEFAULT_CATEGORY_ID,
        }
    }

    /// Adds or replaces entries.
    #[must_use]
    pub fn with_overrides(mut self, overrides: &BTreeMap<String, u32>) -> Self {
        for (label, id) in overrides {
            self.entries.insert(label.clone(), *id);
        }
        self
    }

    pub fn get(&self, label: &str) -> Option<u32> {
        self.entries.get(label).copied()
    }

    /// Category code for a label; unmapped labels get the default code.
    pub fn category_id(&self, label: &str) -> u32 {
        self.get(label).unwrap_or(self.default_id)
    }

    pub fn default_id(&self) -> u32 {
        self.default_id
    }

    /// Recovers a category code from a composite output header by label
    /// prefix. The longest matching label wins.
    pub fn category_from_header(&self, header: &str) -> Option<u32> {
        self.entries
            .iter()
            .filter(|(label, _)| header.starts_with(label.as_str()))
            .max_by_key(|(label, _)| label.len())
            .map(|(_, id)| *id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> {
        self.entries.iter().map(|(label, id)| (label.as_str(), *id))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
