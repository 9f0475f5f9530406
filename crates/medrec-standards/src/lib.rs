#![deny(unsafe_code)]

pub mod categories;
pub mod error;
pub mod hash;
pub mod patterns;
pub mod store;

pub use crate::categories::{CategoryMap, DEFAULT_CATEGORY_ID};
pub use crate::error::StandardsError;
pub use crate::hash::sha256_hex;
pub use crate::patterns::{
    CompiledPattern, CompiledPatterns, HeaderPattern, default_patterns, validate_pattern,
};
pub use crate::store::{
    DEFAULT_PATTERNS_PATH, PATTERNS_ENV_VAR, PatternStore, resolve_patterns_path,
};
