use std::fmt;

use serde::{Deserialize, Serialize};

/// A piece of user-facing text found at a marker call site.
///
/// `context` disambiguates identical text used with different meanings and is
/// empty when the call site supplied none. `text` is never empty: call sites
/// that resolve to an empty string are dropped instead of producing a record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LocalizableString {
    pub text: String,
    #[serde(default)]
    pub context: String,
}

impl LocalizableString {
    /// Build a record, returning `None` when `text` is empty.
    pub fn new(text: impl Into<String>, context: impl Into<String>) -> Option<Self> {
        let text = text.into();
        if text.is_empty() {
            return None;
        }
        Some(Self {
            text,
            context: context.into(),
        })
    }

    /// Build a record without disambiguating context.
    pub fn without_context(text: impl Into<String>) -> Option<Self> {
        Self::new(text, String::new())
    }

    pub fn has_context(&self) -> bool {
        !self.context.is_empty()
    }
}

impl fmt::Display for LocalizableString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.context.is_empty() {
            write!(f, "{:?}", self.text)
        } else {
            write!(f, "{:?} ({:?})", self.text, self.context)
        }
    }
}
