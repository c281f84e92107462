//! Common utility functions shared across the codebase.

/// Checks if the character may appear inside an identifier.
///
/// # Examples
///
/// ```
/// use locx::utils::is_identifier_char;
///
/// assert!(is_identifier_char('a'));
/// assert!(is_identifier_char('_'));
/// assert!(is_identifier_char('7'));
/// assert!(is_identifier_char('é'));
/// assert!(!is_identifier_char('.'));
/// assert!(!is_identifier_char('('));
/// ```
pub fn is_identifier_char(c: char) -> bool {
    c == '_' || c.is_alphanumeric()
}

/// Checks if the whole text is a plain identifier (no dots, not starting with a digit).
///
/// Returns false for empty strings.
pub fn is_identifier(text: &str) -> bool {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) if first == '_' || first.is_alphabetic() => chars.all(is_identifier_char),
        _ => false,
    }
}
