//! Rolling metadata context threaded through the pages of one document.
//!
//! The context remembers the last known-good date of service, provider,
//! header and patient so that continuation pages (which rarely repeat their
//! headers) can inherit them. It must be fed pages in ascending page order
//! and is owned by exactly one processing run.

use medrec_model::{DEFAULT_HEADER, ExtractedEntities, PatientInfo, UNKNOWN_PROVIDER};

/// Default page distance across which metadata is inherited.
pub const DEFAULT_MAX_INHERIT_GAP: u32 = 5;

/// Metadata a page may inherit from the pages before it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContextSnapshot {
    pub dos: Option<String>,
    pub provider: Option<String>,
    pub header: Option<String>,
    pub patient_info: PatientInfo,
}

#[derive(Debug, Clone)]
pub struct DocumentContext {
    unresolved_dos: String,
    max_gap: u32,
    current_dos: Option<String>,
    current_provider: Option<String>,
    current_header: Option<String>,
    current_patient: PatientInfo,
    last_valid_page: Option<u32>,
}

impl DocumentContext {
    /// Creates an empty context. `unresolved_dos` is the date-of-service
    /// sentinel of the run and is never stored as a known date.
    pub fn new(unresolved_dos: impl Into<String>) -> Self {
        Self {
            unresolved_dos: unresolved_dos.into(),
            max_gap: DEFAULT_MAX_INHERIT_GAP,
            current_dos: None,
            current_provider: None,
            current_header: None,
            current_patient: PatientInfo::default(),
            last_valid_page: None,
        }
    }

    #[must_use]
    pub fn with_max_gap(mut self, max_gap: u32) -> Self {
        self.max_gap = max_gap;
        self
    }

    pub fn max_gap(&self) -> u32 {
        self.max_gap
    }

    pub fn last_valid_page(&self) -> Option<u32> {
        self.last_valid_page
    }

    /// Records the metadata of a processed page.
    ///
    /// Sentinel and empty values never overwrite known ones; the page number
    /// is always recorded.
    pub fn update(
        &mut self,
        page_num: u32,
        dos: &str,
        provider: &str,
        header: &str,
        patient_info: &PatientInfo,
    ) {
        if !dos.is_empty() && dos != self.unresolved_dos {
            self.current_dos = Some(dos.to_string());
        }
        if !provider.is_empty() && provider != UNKNOWN_PROVIDER {
            self.current_provider = Some(provider.to_string());
        }
        if !header.is_empty() && header != DEFAULT_HEADER {
            self.current_header = Some(header.to_string());
        }
        if patient_info.has_mrn() {
            self.current_patient = patient_info.clone();
        }
        self.last_valid_page = Some(page_num);
    }

    /// Records a page from its extraction result, using its first header.
    pub fn update_from(&mut self, page_num: u32, entities: &ExtractedEntities) {
        self.update(
            page_num,
            &entities.dos,
            &entities.provider,
            entities.primary_header(),
            &entities.patient_info,
        );
    }

    /// Snapshot for `page_num` using the configured maximum gap.
    pub fn inherit(&self, page_num: u32) -> Option<ContextSnapshot> {
        self.inherit_within(page_num, self.max_gap)
    }

    /// Snapshot for `page_num` if the last recorded page is at most
    /// `max_gap` pages before it.
    pub fn inherit_within(&self, page_num: u32, max_gap: u32) -> Option<ContextSnapshot> {
        let last = self.last_valid_page?;
        if i64::from(page_num) - i64::from(last) > i64::from(max_gap) {
            return None;
        }
        Some(ContextSnapshot {
            dos: self.current_dos.clone(),
            provider: self.current_provider.clone(),
            header: self.current_header.clone(),
            patient_info: self.current_patient.clone(),
        })
    }

    /// Forgets everything, keeping the sentinel and gap.
    pub fn reset(&mut self) {
        self.current_dos = None;
        self.current_provider = None;
        self.current_header = None;
        self.current_patient = PatientInfo::default();
        self.last_valid_page = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TODAY: &str = "10/19/2026";

    fn patient(mrn: &str) -> PatientInfo {
        PatientInfo {
            mrn: mrn.to_string(),
            ..PatientInfo::default()
        }
    }

    #[test]
    fn empty_context_inherits_nothing() {
        let context = DocumentContext::new(TODAY);
        assert_eq!(context.inherit(1), None);
    }

    #[test]
    fn sentinels_do_not_overwrite() {
        let mut context = DocumentContext::new(TODAY);
        context.update(1, "01/02/2024", "Dr. Smith", "Vital Signs", &patient("42"));
        context.update(
            2,
            TODAY,
            UNKNOWN_PROVIDER,
            DEFAULT_HEADER,
            &PatientInfo::default(),
        );
        let snapshot = context.inherit(3).expect("within gap");
        assert_eq!(snapshot.dos.as_deref(), Some("01/02/2024"));
        assert_eq!(snapshot.provider.as_deref(), Some("Dr. Smith"));
        assert_eq!(snapshot.header.as_deref(), Some("Vital Signs"));
        assert_eq!(snapshot.patient_info.mrn, "42");
        assert_eq!(context.last_valid_page(), Some(2));
    }

    #[test]
    fn gap_of_five_inherits_six_does_not() {
        let mut context = DocumentContext::new(TODAY);
        context.update(10, "01/02/2024", "Dr. Smith", "Vital Signs", &patient("1"));
        assert!(context.inherit(15).is_some());
        assert!(context.inherit(16).is_none());
    }

    #[test]
    fn default_header_is_never_remembered() {
        let mut context = DocumentContext::new(TODAY);
        context.update(1, TODAY, UNKNOWN_PROVIDER, DEFAULT_HEADER, &PatientInfo::default());
        let snapshot = context.inherit(2).expect("within gap");
        assert_eq!(snapshot, ContextSnapshot::default());
    }

    #[test]
    fn reset_clears_state() {
        let mut context = DocumentContext::new(TODAY).with_max_gap(2);
        context.update(1, "01/02/2024", "Dr. Smith", "Vital Signs", &patient("1"));
        context.reset();
        assert_eq!(context.inherit(2), None);
        assert_eq!(context.max_gap(), 2);
    }
}
