//! Quoting utilities for PostgreSQL identifiers and string literals.

/// Escape a string by doubling every occurrence of `quote_char`.
///
/// # Arguments
/// * `s` - The string to escape
/// * `quote_char` - The quote character to escape ('"' for identifiers, '\'' for literals)
pub fn escape_string_for_quote(s: &str, quote_char: char) -> String {
    let mut result = String::with_capacity(s.len() + 2);
    for c in s.chars() {
        if c == quote_char {
            result.push(c);
        }
        result.push(c);
    }
    result
}

/// Quote an identifier (table, column, type or constraint name).
///
/// Always quotes, so camelCase column names keep their case.
#[inline]
pub fn quote_ident(s: &str) -> String {
    format!("\"{}\"", escape_string_for_quote(s, '"'))
}

/// Quote a string literal.
#[inline]
pub fn quote_literal(s: &str) -> String {
    format!("'{}'", escape_string_for_quote(s, '\''))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn test_quote_ident_basic() {
        assert_eq!(quote_ident("employeeCode"), r#""employeeCode""#);
    }

    #[rstest]
    fn test_quote_ident_with_quotes() {
        assert_eq!(quote_ident(r#"we"ird"#), r#""we""ird""#);
    }

    #[rstest]
    fn test_quote_literal_with_apostrophe() {
        assert_eq!(quote_literal("O'Brien"), "'O''Brien'");
    }

    #[rstest]
    fn test_quote_literal_keeps_backslash() {
        assert_eq!(quote_literal(r"a\b"), r"'a\b'");
    }
}
