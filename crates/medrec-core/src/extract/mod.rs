//! Per-page entity extraction.
//!
//! [`EntityExtractor`] turns page text into an [`ExtractedEntities`] record:
//! patient banner, inherited context, header labels, provider and date of
//! service, in that order. Fields that cannot be resolved keep their sentinel
//! values; extraction never fails.

mod dates;
mod headers;
mod patient;
mod provider;

use chrono::{Local, NaiveDate};
use medrec_model::{DEFAULT_HEADER, ExtractedEntities, format_dos};
use medrec_standards::CompiledPatterns;

use crate::context::DocumentContext;

/// Extracts metadata from page text using one compiled pattern list and a
/// date-of-service sentinel fixed at construction.
#[derive(Debug, Clone)]
pub struct EntityExtractor {
    patterns: CompiledPatterns,
    unresolved_dos: String,
}

impl EntityExtractor {
    /// Uses the local date as the unresolved date of service.
    pub fn new(patterns: CompiledPatterns) -> Self {
        Self::with_today(patterns, Local::now().date_naive())
    }

    pub fn with_today(patterns: CompiledPatterns, today: NaiveDate) -> Self {
        Self {
            patterns,
            unresolved_dos: format_dos(today),
        }
    }

    /// Date-of-service sentinel of this extractor.
    pub fn unresolved_dos(&self) -> &str {
        &self.unresolved_dos
    }

    pub fn patterns(&self) -> &CompiledPatterns {
        &self.patterns
    }

    /// A fresh context sharing this extractor's sentinel.
    pub fn new_context(&self, max_gap: u32) -> DocumentContext {
        DocumentContext::new(self.unresolved_dos.clone()).with_max_gap(max_gap)
    }

    /// Context-free extraction.
    pub fn extract(&self, text: &str) -> ExtractedEntities {
        self.extract_with_context(text, None, None)
    }

    /// Extraction that may inherit metadata from `context` when `page_num`
    /// lies within the context's gap. Detected values override inherited
    /// ones.
    pub fn extract_with_context(
        &self,
        text: &str,
        context: Option<&DocumentContext>,
        page_num: Option<u32>,
    ) -> ExtractedEntities {
        let mut entities = ExtractedEntities::unresolved(self.unresolved_dos.clone());
        entities.patient_info = patient::detect_patient(text);

        if let (Some(context), Some(page_num)) = (context, page_num)
            && let Some(inherited) = context.inherit(page_num)
        {
            if !entities.patient_info.has_mrn() && inherited.patient_info.has_mrn() {
                entities.patient_info = inherited.patient_info;
            }
            if let Some(dos) = inherited.dos {
                entities.dos = dos;
            }
            if let Some(provider) = inherited.provider {
                entities.provider = provider;
            }
            if let Some(header) = inherited.header {
                entities.headers = vec![header];
            }
        }

        let found = headers::detect_headers(text, &self.patterns);
        if !found.is_empty() {
            entities.headers = found.into_iter().collect();
        }

        if let Some(provider) = provider::detect_provider(text) {
            entities.provider = provider;
        }

        entities.dos = dates::detect_dos(text, &entities.dos, &self.unresolved_dos);
        entities
    }

    /// Header labels of `text` without context, never empty.
    pub fn headers(&self, text: &str) -> Vec<String> {
        let found = headers::detect_headers(text, &self.patterns);
        if found.is_empty() {
            vec![DEFAULT_HEADER.to_string()]
        } else {
            found.into_iter().collect()
        }
    }
}
