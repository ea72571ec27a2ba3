//! EAN code input.
//!
//! Codes come from command-line literals (each possibly a comma-separated list)
//! and from newline-delimited files. They are kept as text: leading zeros and
//! non-numeric codes are significant.

use std::collections::HashSet;
use std::path::Path;

use crate::error_handling::ConfigError;

/// Trims, drops empty entries and removes duplicates keeping the first occurrence.
pub fn normalize_eans<I, S>(values: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut codes: Vec<String> = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();
    for value in values {
        for code in value.as_ref().split(',').map(str::trim) {
            if !code.is_empty() && seen.insert(code.to_string()) {
                codes.push(code.to_string());
            }
        }
    }
    codes
}

/// Reads one code per line.
pub fn read_ean_file(path: &Path) -> Result<Vec<String>, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::EanFile {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(content.lines().map(str::to_string).collect())
}

/// Collects the codes of literals and an optional file; an empty result is an error.
pub fn collect_eans(literals: &[String], file: Option<&Path>) -> Result<Vec<String>, ConfigError> {
    let mut raw: Vec<String> = literals.to_vec();
    if let Some(path) = file {
        raw.extend(read_ean_file(path)?);
    }
    let codes = normalize_eans(raw);
    if codes.is_empty() {
        return Err(ConfigError::NoEanCodes);
    }
    Ok(codes)
}
