/// True when `code` has content and every non-blank line is a comment.
///
/// Such code cannot print anything, so it is answered without a round trip to
/// the sandbox.
pub fn is_comment_only(code: &str, marker: &str) -> bool {
    let mut lines = code
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .peekable();
    lines.peek().is_some() && lines.all(|l| l.starts_with(marker))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_comments() {
        assert!(is_comment_only("# one\n  # two", "#"));
        assert!(is_comment_only("# one\n\n   \n# two", "#"));
    }

    #[test]
    fn any_code_line_runs() {
        assert!(!is_comment_only("# one\nprint(1)", "#"));
        assert!(!is_comment_only("x = 1  # note", "#"));
    }

    #[test]
    fn empty_code_is_not_comment_only() {
        assert!(!is_comment_only("", "#"));
        assert!(!is_comment_only("  \n\t", "#"));
    }

    #[test]
    fn marker_is_configurable() {
        assert!(is_comment_only("// a\n// b", "//"));
        assert!(!is_comment_only("// a\n// b", "#"));
    }
}
