//! Identifier sanitization for catalog queries.
//!
//! Table names arrive as free-form caller input and are interpolated into
//! catalog SQL, so everything outside a conservative identifier alphabet is
//! stripped. Stripping (rather than rejecting) keeps dotted names like
//! `schema.table` working; a name that becomes nonexistent after stripping
//! simply fails at the engine.

/// Strip every character outside `[A-Za-z0-9_.]` from an identifier.
pub fn sanitize_identifier(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_' || *c == '.')
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_identifier_unchanged() {
        assert_eq!(sanitize_identifier("users"), "users");
        assert_eq!(sanitize_identifier("order_items_2024"), "order_items_2024");
    }

    #[test]
    fn test_dotted_name_preserved() {
        assert_eq!(sanitize_identifier("public.users"), "public.users");
    }

    #[test]
    fn test_injection_attempt_stripped() {
        assert_eq!(
            sanitize_identifier("users; DROP TABLE x--"),
            "usersDROPTABLEx"
        );
    }

    #[test]
    fn test_quotes_and_whitespace_stripped() {
        assert_eq!(sanitize_identifier("\"users\""), "users");
        assert_eq!(sanitize_identifier("my table"), "mytable");
        assert_eq!(sanitize_identifier("t`1`"), "t1");
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(sanitize_identifier(""), "");
        assert_eq!(sanitize_identifier("'; --"), "");
    }

    #[test]
    fn test_unicode_stripped() {
        assert_eq!(sanitize_identifier("tablé"), "tabl");
    }
}
