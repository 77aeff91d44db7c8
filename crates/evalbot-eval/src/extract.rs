//! Code extraction from a raw chat message.
//!
//! Accepted shapes, tried in order:
//!
//! ~~~text
//! ```py            `code`          anything else
//! code             ``code``        (bare text)
//! ```
//! ~~~
//!
//! A fenced or inline match requires the message (ignoring surrounding
//! whitespace) to open and close with the same run of 1, 2 or 3 backticks.
//! Anything that does not fit falls back to bare text, so extraction never
//! fails.

use crate::patterns::{is_blank_char, BACKTICK};

/// How the code was quoted in the message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceKind {
    /// Triple-backtick block, with the language tag if one was given.
    FencedBlock { language: Option<String> },
    /// Single or double backtick span.
    InlineCode { width: u8 },
    /// No (or unbalanced) markup.
    BareText,
}

impl SourceKind {
    /// Short description used in logs.
    pub fn describe(&self) -> String {
        match self {
            SourceKind::FencedBlock { language: Some(lang) } => {
                format!("'{lang}' highlighted code block")
            }
            SourceKind::FencedBlock { language: None } => "plain code block".to_string(),
            SourceKind::InlineCode { width } => {
                format!("{}-enclosed inline code", "`".repeat(usize::from(*width)))
            }
            SourceKind::BareText => "unformatted text".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extraction {
    pub code: String,
    pub kind: SourceKind,
}

/// Recover the code payload from `raw`.
pub fn extract(raw: &str) -> Extraction {
    match match_formatted(raw) {
        Some((body, kind)) => Extraction {
            code: dedent(body),
            kind,
        },
        None => Extraction {
            code: dedent(skip_blank_lines(raw).trim_end()),
            kind: SourceKind::BareText,
        },
    }
}

/// Match the whole of `raw` against the fenced/inline shape and return the
/// undedented body.
fn match_formatted(raw: &str) -> Option<(&str, SourceKind)> {
    let start = raw.len() - raw.trim_start().len();
    let end = raw.trim_end().len();
    if start >= end {
        return None;
    }

    let region = &raw[start..end];
    let open = region.chars().take_while(|&c| c == BACKTICK).count();
    if !(1..=3).contains(&open) {
        return None;
    }
    let close = region.chars().rev().take_while(|&c| c == BACKTICK).count();
    if close != open {
        return None;
    }

    // Backticks are one byte each, so the counts double as byte offsets.
    let body_start = start + open;
    let body_end = end - close;
    if body_start > body_end {
        return None;
    }

    let mut body = &raw[body_start..body_end];
    let kind = if open == 3 {
        let language = take_language(&mut body);
        SourceKind::FencedBlock { language }
    } else {
        SourceKind::InlineCode { width: open as u8 }
    };

    Some((skip_blank_lines(body).trim_end(), kind))
}

/// Consume a `letters\n` language line from the front of a block body.
fn take_language(body: &mut &str) -> Option<String> {
    let letters = body.bytes().take_while(u8::is_ascii_alphabetic).count();
    if letters == 0 || body.as_bytes().get(letters) != Some(&b'\n') {
        return None;
    }
    let language = body[..letters].to_string();
    *body = &body[letters + 1..];
    Some(language)
}

/// Drop leading lines made only of spaces and tabs.
fn skip_blank_lines(mut text: &str) -> &str {
    while let Some(nl) = text.find('\n') {
        if !text[..nl].chars().all(is_blank_char) {
            break;
        }
        text = &text[nl + 1..];
    }
    text
}

/// Remove the longest run of leading spaces/tabs shared by every non-blank
/// line. Blank lines are emptied and do not count towards the margin.
pub fn dedent(text: &str) -> String {
    let mut margin: Option<&str> = None;
    for line in text.split('\n') {
        if line.chars().all(is_blank_char) {
            continue;
        }
        let indent = &line[..line.len() - line.trim_start_matches(is_blank_char).len()];
        margin = Some(match margin {
            None => indent,
            Some(m) => common_prefix(m, indent),
        });
    }
    let margin = margin.unwrap_or("").len();

    text.split('\n')
        .map(|line| {
            if line.chars().all(is_blank_char) {
                ""
            } else {
                &line[margin..]
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn common_prefix<'a>(a: &'a str, b: &str) -> &'a str {
    let n = a
        .bytes()
        .zip(b.bytes())
        .take_while(|(x, y)| x == y)
        .count();
    &a[..n]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block(language: &str) -> SourceKind {
        SourceKind::FencedBlock {
            language: Some(language.to_string()),
        }
    }

    #[test]
    fn fenced_block_with_language_is_dedented() {
        let ex = extract("```py\n  print(1)\n  print(2)\n```");
        assert_eq!(ex.code, "print(1)\nprint(2)");
        assert_eq!(ex.kind, block("py"));
    }

    #[test]
    fn language_tag_keeps_its_case() {
        let ex = extract("```Python\nx = 1\n```");
        assert_eq!(ex.code, "x = 1");
        assert_eq!(ex.kind, block("Python"));
    }

    #[test]
    fn fenced_block_without_language() {
        let ex = extract("```\nx = 1\n```");
        assert_eq!(ex.code, "x = 1");
        assert_eq!(ex.kind, SourceKind::FencedBlock { language: None });
    }

    #[test]
    fn letters_without_newline_are_code_not_language() {
        let ex = extract("```print```");
        assert_eq!(ex.code, "print");
        assert_eq!(ex.kind, SourceKind::FencedBlock { language: None });
    }

    #[test]
    fn language_line_must_hold_only_letters() {
        let ex = extract("```py3\nx = 1\n```");
        assert_eq!(ex.code, "py3\nx = 1");
        assert_eq!(ex.kind, SourceKind::FencedBlock { language: None });
    }

    #[test]
    fn blank_lines_before_code_are_skipped() {
        let ex = extract("  ```py\n\n   \t\n    a = 1\n      b = 2\n\n```  \n");
        assert_eq!(ex.code, "a = 1\n  b = 2");
        assert_eq!(ex.kind, block("py"));
    }

    #[test]
    fn inline_code_single_and_double() {
        let one = extract("`print('hi')`");
        assert_eq!(one.code, "print('hi')");
        assert_eq!(one.kind, SourceKind::InlineCode { width: 1 });

        let two = extract(" ``print(`x`)`` ");
        assert_eq!(two.code, "print(`x`)");
        assert_eq!(two.kind, SourceKind::InlineCode { width: 2 });
    }

    #[test]
    fn inline_code_never_has_a_language() {
        let ex = extract("`py\nx = 1`");
        assert_eq!(ex.code, "py\nx = 1");
        assert_eq!(ex.kind, SourceKind::InlineCode { width: 1 });
    }

    #[test]
    fn mismatched_delimiters_fall_back_to_bare_text() {
        for raw in ["```x = 1``", "``x = 1```", "`x = 1``", "```x = 1`", "````x````"] {
            let ex = extract(raw);
            assert_eq!(ex.kind, SourceKind::BareText, "input: {raw:?}");
            assert_eq!(ex.code, raw);
        }
    }

    #[test]
    fn unbalanced_backticks_are_bare_text() {
        let ex = extract("print('`')");
        assert_eq!(ex.kind, SourceKind::BareText);
        assert_eq!(ex.code, "print('`')");

        let lone = extract("```");
        assert_eq!(lone.kind, SourceKind::BareText);
        assert_eq!(lone.code, "```");
    }

    #[test]
    fn bare_text_strips_blank_lines_and_trailing_whitespace() {
        let ex = extract("   \n\n  x = 1  \n");
        assert_eq!(ex.code, "x = 1");
        assert_eq!(ex.kind, SourceKind::BareText);
    }

    #[test]
    fn bare_text_keeps_relative_indentation() {
        let ex = extract("for i in range(3):\n    print(i)");
        assert_eq!(ex.code, "for i in range(3):\n    print(i)");
    }

    #[test]
    fn whitespace_only_input_gives_empty_code() {
        assert_eq!(extract("").code, "");
        assert_eq!(extract(" \n\t\n  ").code, "");
        assert_eq!(extract("``` ```").code, "");
    }

    #[test]
    fn wrapping_in_a_block_round_trips() {
        let samples = [
            "print(1)",
            "def f():\n    return 2\n\nprint(f())",
            "x = '`'\nprint(x)",
        ];
        for s in samples {
            let ex = extract(&format!("```\n{s}\n```"));
            assert_eq!(ex.code, s);
        }
    }

    #[test]
    fn dedent_ignores_blank_lines_for_margin() {
        assert_eq!(dedent("    a\n\n      b\n  \n    c"), "a\n\n  b\n\nc");
    }

    #[test]
    fn dedent_treats_tabs_and_spaces_as_distinct() {
        assert_eq!(dedent("\tfoo\n    bar"), "\tfoo\n    bar");
        assert_eq!(dedent("\t\tfoo\n\tbar"), "\tfoo\nbar");
    }

    #[test]
    fn describe_matches_kind() {
        assert_eq!(block("py").describe(), "'py' highlighted code block");
        assert_eq!(
            SourceKind::InlineCode { width: 2 }.describe(),
            "``-enclosed inline code"
        );
    }
}
