//! Input loading for medical record processing.
//!
//! Pages arrive either as a JSON array of page records or as a directory of
//! per-page text files named with their page number. Precomputed embeddings
//! arrive as a JSON array of vectors aligned with the page input order.
//!
//! # Example
//!
//! ```ignore
//! use std::path::Path;
//! use medrec_ingest::{read_pages, read_embeddings_json};
//!
//! let pages = read_pages(Path::new("input/pages.json"))?;
//! let vectors = read_embeddings_json(Path::new("input/embeddings.json"))?;
//! ```

mod discovery;
mod error;
mod pages;

// === Error Types ===
pub use error::{IngestError, Result};

// === Discovery ===
pub use discovery::{list_page_files, page_number_from_path};

// === Loading ===
pub use pages::{
    parse_pages_json, read_embeddings_json, read_input_bytes, read_pages, read_pages_dir,
    read_pages_json,
};
