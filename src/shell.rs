//! POSIX shell quoting
//!
//! Quotes arbitrary strings so they survive verbatim inside a generated
//! shell script, including credentials and environment values containing
//! spaces, quotes, `$`, or backticks.

/// Quote a string for safe use as a single POSIX shell token.
///
/// Strings made up entirely of shell-safe characters pass through
/// unchanged. The empty string becomes `''`. Everything else is wrapped
/// in single quotes, with embedded single quotes escaped as `'"'"'`.
///
/// Total over all inputs; never fails.
pub fn quote(value: &str) -> String {
    if value.is_empty() {
        return "''".to_string();
    }

    if value.chars().all(is_safe_char) {
        return value.to_string();
    }

    let escaped = value.replace('\'', "'\"'\"'");
    format!("'{escaped}'")
}

/// Characters that never need quoting in a POSIX shell word.
fn is_safe_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '_' | '@' | '%' | '+' | '=' | ':' | ',' | '.' | '/' | '-')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_safe_strings_pass_through() {
        assert_eq!(quote("simple"), "simple");
        assert_eq!(quote("AWS_REGION"), "AWS_REGION");
        assert_eq!(quote("us-east-1"), "us-east-1");
        assert_eq!(quote("registry.example.com/app:latest"), "registry.example.com/app:latest");
        assert_eq!(quote("a@b%c+d=e"), "a@b%c+d=e");
    }

    #[test]
    fn test_empty_string() {
        assert_eq!(quote(""), "''");
    }

    #[test]
    fn test_spaces_are_quoted() {
        assert_eq!(quote("hello world"), "'hello world'");
    }

    #[test]
    fn test_single_quote_is_escaped() {
        assert_eq!(quote("it's ok"), "'it'\"'\"'s ok'");
    }

    #[test]
    fn test_shell_metacharacters_are_quoted() {
        assert_eq!(quote("$HOME"), "'$HOME'");
        assert_eq!(quote("`id`"), "'`id`'");
        assert_eq!(quote("a;b"), "'a;b'");
        assert_eq!(quote("a\"b"), "'a\"b'");
    }
}
