//! Page and embedding loading.

use std::path::Path;

use medrec_model::Page;
use serde_json::de::from_slice;
use tracing::{debug, warn};

use crate::discovery::{list_page_files, page_number_from_path};
use crate::error::{IngestError, Result};

/// Reads the raw bytes of an input file.
pub fn read_input_bytes(path: &Path) -> Result<Vec<u8>> {
    if !path.is_file() {
        return Err(IngestError::FileNotFound {
            path: path.to_path_buf(),
        });
    }
    std::fs::read(path).map_err(|source| IngestError::FileRead {
        path: path.to_path_buf(),
        source,
    })
}

/// Reads a JSON array of `{"text": ..., "metadata": {"page_num": n}}`.
pub fn read_pages_json(path: &Path) -> Result<Vec<Page>> {
    let bytes = read_input_bytes(path)?;
    parse_pages_json(&bytes, path)
}

/// Parses page JSON already read from `path`; `path` is only used in errors.
pub fn parse_pages_json(bytes: &[u8], path: &Path) -> Result<Vec<Page>> {
    let pages: Vec<Page> = from_slice(bytes).map_err(|source| IngestError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(path = %path.display(), pages = pages.len(), "loaded pages");
    Ok(pages)
}

/// Reads one page per `.txt` file; the page number comes from the file
/// name. Files without a number are skipped with a warning.
pub fn read_pages_dir(dir: &Path) -> Result<Vec<Page>> {
    let mut pages = Vec::new();
    for path in list_page_files(dir)? {
        let Some(page_num) = page_number_from_path(&path) else {
            warn!(path = %path.display(), "skipping page file without a page number");
            continue;
        };
        let text = std::fs::read_to_string(&path).map_err(|source| IngestError::FileRead {
            path: path.clone(),
            source,
        })?;
        pages.push(Page::new(page_num, text));
    }
    if pages.is_empty() {
        return Err(IngestError::NoPages {
            path: dir.to_path_buf(),
        });
    }
    pages.sort_by_key(Page::page_num);
    debug!(path = %dir.display(), pages = pages.len(), "loaded page directory");
    Ok(pages)
}

/// Reads pages from a directory of text files or a JSON page file.
pub fn read_pages(path: &Path) -> Result<Vec<Page>> {
    if path.is_dir() {
        read_pages_dir(path)
    } else {
        read_pages_json(path)
    }
}

/// Reads a JSON array of float arrays, one per page in input order.
pub fn read_embeddings_json(path: &Path) -> Result<Vec<Vec<f32>>> {
    let bytes = read_input_bytes(path)?;
    let embeddings: Vec<Vec<f32>> = from_slice(&bytes).map_err(|source| IngestError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(path = %path.display(), vectors = embeddings.len(), "loaded embeddings");
    Ok(embeddings)
}
