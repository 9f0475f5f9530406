use serde::{Deserialize, Serialize};

/// Column header of the persisted record set, in output order.
pub const OUTPUT_COLUMNS: [&str; 13] = [
    "pagenumber",
    "category",
    "isreviewable",
    "dos",
    "provider",
    "referencekey",
    "parentkey",
    "lockstatus",
    "header",
    "facilitygroup",
    "reviewerid",
    "qcreviewerid",
    "isduplicate",
];

/// Parent key carried by the first page of every cluster.
pub const ROOT_PARENT_KEY: &str = "0";

/// One output record: a single `(page, header label)` pair.
///
/// Field order matches [`OUTPUT_COLUMNS`]; `header_label` is kept for
/// ordering only and is not written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputRow {
    #[serde(rename = "pagenumber")]
    pub page_num: u32,
    #[serde(rename = "category")]
    pub category_id: u32,
    #[serde(rename = "isreviewable")]
    pub reviewable: String,
    pub dos: String,
    pub provider: String,
    #[serde(rename = "referencekey")]
    pub reference_key: String,
    #[serde(rename = "parentkey")]
    pub parent_key: String,
    #[serde(rename = "lockstatus")]
    pub lock_status: String,
    /// Composite header: optional patient name, label, optional MRN.
    pub header: String,
    #[serde(rename = "facilitygroup")]
    pub facility_group: String,
    #[serde(rename = "reviewerid")]
    pub reviewer_id: String,
    #[serde(rename = "qcreviewerid")]
    pub qc_reviewer_id: String,
    #[serde(rename = "isduplicate")]
    pub duplicate: String,
    #[serde(skip)]
    pub header_label: String,
}

impl OutputRow {
    pub fn is_cluster_root(&self) -> bool {
        self.parent_key == ROOT_PARENT_KEY
    }
}
