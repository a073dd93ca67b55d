//! TOML configuration file parsing with category filtering.
use anyhow::Result;
use serde::de::DeserializeOwned;
use std::path::Path;

use super::category_matcher::{self, Category};
use crate::error::ConfigError;

/// Deserialize a whole TOML file into `T`.
///
/// A missing file deserializes from an empty document, so types whose
/// fields all have defaults load as their defaults.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed.
pub fn load_config<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = read_or_empty(path)?;
    toml::from_str(&content).map_err(|e| {
        ConfigError::InvalidSyntax {
            file: path.display().to_string(),
            message: e.message().to_string(),
        }
        .into()
    })
}

/// Load a TOML config file where each top-level section contains a single
/// repeated field, and return all items as `(section_name, Vec<T>)` pairs
/// in document order.
///
/// `extract` receives the deserialized section value and returns the `Vec<T>`
/// stored inside it (e.g. `|s: ToolSection| s.tools`).
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed, or if a section
/// does not match `S`.
pub fn load_section_items<S, T>(
    path: &Path,
    extract: impl Fn(S) -> Vec<T>,
) -> Result<Vec<(String, Vec<T>)>>
where
    S: DeserializeOwned,
{
    let table: toml::Table = load_config(path)?;
    table
        .into_iter()
        .map(|(name, value)| -> Result<(String, Vec<T>)> {
            let section: S = value.try_into().map_err(|e: toml::de::Error| {
                ConfigError::InvalidSection {
                    file: path.display().to_string(),
                    section: name.clone(),
                    message: e.message().to_string(),
                }
            })?;
            Ok((name, extract(section)))
        })
        .collect()
}

/// Keep the items of sections whose categories are all active.
#[must_use]
pub fn filter_by_categories<T>(
    items: Vec<(String, Vec<T>)>,
    active_categories: &[Category],
) -> Vec<T> {
    items
        .into_iter()
        .filter(|(section_name, _)| {
            category_matcher::matches(&Category::parse_section(section_name), active_categories)
        })
        .flat_map(|(_, items)| items)
        .collect()
}

fn read_or_empty(path: &Path) -> Result<String> {
    match std::fs::read_to_string(path) {
        Ok(content) => Ok(content),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(String::new()),
        Err(source) => Err(ConfigError::Io {
            path: path.display().to_string(),
            source,
        }
        .into()),
    }
}
