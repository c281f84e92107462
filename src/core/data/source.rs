use std::ops::Deref;

/// Source text indexed by character rather than by byte.
///
/// Every scanner in the engine moves a cursor forwards and backwards over
/// characters; holding them in a `Vec<char>` keeps that cursor arithmetic
/// trivially correct for non-ASCII text.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SourceText {
    chars: Vec<char>,
}

impl SourceText {
    pub fn new(text: &str) -> Self {
        Self {
            chars: text.chars().collect(),
        }
    }

    /// Zero-based line number of the character at `index`.
    pub fn line_of(&self, index: usize) -> usize {
        let end = index.min(self.chars.len());
        self.chars[..end].iter().filter(|&&c| c == '\n').count()
    }
}

impl From<&str> for SourceText {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

impl Deref for SourceText {
    type Target = [char];

    fn deref(&self) -> &[char] {
        &self.chars
    }
}
