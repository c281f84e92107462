//! Translation catalog files.
//!
//! A catalog is a JSON array of entries, sorted case-insensitively:
//!
//! ```json
//! [
//!   { "text": "About", "context": "", "translation": "About" },
//!   { "text": "{0} files", "context": "count", "translation": "{0} Dateien" }
//! ]
//! ```
//!
//! New entries start with the text as their translation. Re-extracting keeps
//! any translation that differs from its text.

use std::{
    cmp::Ordering,
    collections::{HashMap, HashSet},
    fs,
    path::Path,
};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::core::{
    data::LocalizableString,
    diagnostics::Diagnostics,
    normalize::{ContextNormalizer, PLACEHOLDER},
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub text: String,
    #[serde(default)]
    pub context: String,
    pub translation: String,
}

impl CatalogEntry {
    pub fn untranslated(record: LocalizableString) -> Self {
        Self {
            translation: record.text.clone(),
            text: record.text,
            context: record.context,
        }
    }

    pub fn is_translated(&self) -> bool {
        self.translation != self.text
    }

    fn key(&self) -> (&str, &str) {
        (&self.text, &self.context)
    }

    /// Key used to match fresh records against a previous catalog.
    ///
    /// Placeholder entries may have been written with a padded context; the
    /// padding is ignored so they still match the record they came from.
    fn merge_key(&self) -> (&str, &str) {
        if self.text.contains(PLACEHOLDER) {
            (&self.text, self.context.trim_end_matches(' '))
        } else {
            self.key()
        }
    }
}

/// Read an existing catalog; a missing file is an empty catalog.
pub fn read_catalog(path: &Path) -> Result<Vec<CatalogEntry>> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read catalog: {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse catalog: {}", path.display()))
}

pub fn write_catalog(path: &Path, entries: &[CatalogEntry]) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }
    let mut json = serde_json::to_string_pretty(entries).context("Failed to serialize catalog")?;
    json.push('\n');
    fs::write(path, json).with_context(|| format!("Failed to write catalog: {}", path.display()))
}

/// Merge freshly extracted records with an existing catalog.
///
/// Duplicate records collapse to their first occurrence. Translated entries of
/// `existing` replace their untranslated counterparts; translated entries whose
/// text is no longer extracted are kept and reported. The result is sorted by
/// text, then context (ignoring case), and passed through [`ContextNormalizer`].
pub fn build_catalog(
    records: Vec<LocalizableString>,
    existing: &[CatalogEntry],
    diagnostics: &mut Diagnostics,
) -> Vec<CatalogEntry> {
    let mut seen = HashSet::new();
    let mut entries: Vec<CatalogEntry> = records
        .into_iter()
        .filter(|r| seen.insert((r.text.clone(), r.context.clone())))
        .map(CatalogEntry::untranslated)
        .collect();

    let mut preserved: HashMap<(&str, &str), &CatalogEntry> = HashMap::new();
    for previous in existing.iter().filter(|e| e.is_translated()) {
        preserved.entry(previous.merge_key()).or_insert(previous);
    }

    let mut merged = HashSet::new();
    for entry in &mut entries {
        if let Some(previous) = preserved.get(&entry.merge_key()) {
            merged.insert((previous.text.as_str(), previous.context.as_str()));
            entry.translation = previous.translation.clone();
        }
    }

    let orphans: Vec<&CatalogEntry> = existing
        .iter()
        .filter(|e| e.is_translated() && !merged.contains(&e.key()))
        .collect();
    if !orphans.is_empty() {
        let texts: Vec<String> = orphans.iter().map(|e| format!("{:?}", e.text)).collect();
        diagnostics.warning(format!(
            "{} translated {} no longer in the source code: {}",
            orphans.len(),
            if orphans.len() == 1 { "string is" } else { "strings are" },
            texts.join(", ")
        ));
        let mut orphan_keys = HashSet::new();
        entries.extend(
            orphans
                .into_iter()
                .filter(|e| orphan_keys.insert((e.text.clone(), e.context.clone())))
                .cloned(),
        );
    }

    entries.sort_by(compare_entries);

    let mut normalizer = ContextNormalizer::new();
    entries
        .into_iter()
        .map(|entry| {
            let record = LocalizableString {
                text: entry.text,
                context: entry.context,
            };
            let record = normalizer.normalize(record, diagnostics);
            CatalogEntry {
                text: record.text,
                context: record.context,
                translation: entry.translation,
            }
        })
        .collect()
}

fn compare_entries(a: &CatalogEntry, b: &CatalogEntry) -> Ordering {
    compare_ignore_case(&a.text, &b.text)
        .then_with(|| compare_ignore_case(&a.context, &b.context))
        .then_with(|| a.key().cmp(&b.key()))
}

fn compare_ignore_case(a: &str, b: &str) -> Ordering {
    a.chars()
        .flat_map(char::to_lowercase)
        .cmp(b.chars().flat_map(char::to_lowercase))
}
