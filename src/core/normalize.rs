use std::collections::HashSet;

use crate::core::{data::LocalizableString, diagnostics::Diagnostics};

/// Positional placeholder that triggers context de-duplication.
pub const PLACEHOLDER: &str = "{0}";

/// Keeps context strings of placeholder-bearing records unique within one catalog.
///
/// Some translation tools key such records by context alone, so two records
/// with `{0}` in the text must not share a context. Colliding contexts are
/// padded with trailing spaces until unique. Other records pass through.
#[derive(Debug, Default)]
pub struct ContextNormalizer {
    used: HashSet<String>,
}

impl ContextNormalizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn normalize(
        &mut self,
        mut record: LocalizableString,
        diagnostics: &mut Diagnostics,
    ) -> LocalizableString {
        if !record.has_context() || !record.text.contains(PLACEHOLDER) {
            return record;
        }

        if self.used.contains(&record.context) {
            while self.used.contains(&record.context) {
                record.context.push(' ');
            }
            diagnostics.warning(format!(
                "context padded to stay unique for {:?}",
                record.text
            ));
        }
        self.used.insert(record.context.clone());
        record
    }

    pub fn normalize_all(
        &mut self,
        records: impl IntoIterator<Item = LocalizableString>,
        diagnostics: &mut Diagnostics,
    ) -> Vec<LocalizableString> {
        records
            .into_iter()
            .map(|record| self.normalize(record, diagnostics))
            .collect()
    }
}
