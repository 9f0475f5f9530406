pub mod entities;
pub mod options;
pub mod output;
pub mod page;

pub use entities::{
    DEFAULT_HEADER, DOS_FORMAT, ExtractedEntities, PatientInfo, UNKNOWN_PROVIDER, format_dos,
};
pub use options::{
    ClusterOrder, ClusteringOptions, ContextOptions, OutputPolicy, PipelineOptions,
    PostprocessOptions,
};
pub use output::{OUTPUT_COLUMNS, OutputRow, ROOT_PARENT_KEY};
pub use page::{ClusterLabel, NOISE_LABEL, Page, PageMetadata};
