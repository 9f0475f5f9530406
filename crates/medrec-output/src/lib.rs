//! Persisted outputs of a processing run: the record CSV consumed by the
//! document-management import and an optional JSON run report.

pub mod error;
pub mod records;
pub mod report;

pub use error::{OutputError, Result};
pub use records::{
    DEFAULT_OUTPUT_CSV, read_output_csv, read_rows, write_output_csv, write_rows,
};
pub use report::{
    REPORT_SCHEMA, REPORT_SCHEMA_VERSION, RunReport, SourceFingerprint, write_run_report_json,
};
