//! Static page copy, kept as data next to the crate rather than in code.

use lazy_static::lazy_static;
use std::collections::BTreeMap;

use crate::error::{AppError, Result};

const EXPLANATIONS_JSON: &str = include_str!("../assets/explanations.json");

lazy_static! {
    static ref EXPLANATIONS: std::result::Result<BTreeMap<String, String>, String> =
        serde_json::from_str(EXPLANATIONS_JSON).map_err(|e| e.to_string());
}

/// All explanation blocks keyed by page section.
pub fn explanations() -> Result<&'static BTreeMap<String, String>> {
    EXPLANATIONS
        .as_ref()
        .map_err(|e| AppError::Config(format!("explanations.json: {}", e)))
}

/// The explanation text for one page section.
pub fn explanation(key: &str) -> Result<&'static str> {
    explanations()?
        .get(key)
        .map(String::as_str)
        .ok_or_else(|| AppError::Config(format!("no explanation named '{}'", key)))
}
