//! Rendering of raw sandbox output into a reply body.
//!
//! Steps, in order:
//!
//! 1. trim spaces and newlines at both ends
//! 2. break mention triggers with a zero-width space
//! 3. refuse output containing a run of code-block escape characters
//! 4. number lines (multi-line output only), then cap at [`MAX_LINES`] lines
//!    or [`MAX_CHARS`] characters
//! 5. upload the untruncated text to the overflow store when anything was cut
//!
//! An empty `display` means the sandbox printed nothing; the caller picks the
//! placeholder text.

use tracing::{debug, warn};

use crate::paste::OverflowStore;
use crate::patterns::{
    is_escape_char, ESCAPE_RUN, ESCAPE_WARNING, MAX_CHARS, MAX_LINES, MENTION_TRIGGERS,
    TOO_LONG, TOO_LONG_TOO_MANY_LINES, TOO_MANY_LINES, ZERO_WIDTH_SPACE,
};

/// Final reply body plus the overflow key, if the full output was uploaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rendered {
    pub display: String,
    pub overflow_key: Option<String>,
    pub truncated: bool,
}

/// Output of the synchronous part of rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormattedOutput {
    pub display: String,
    /// The whole sanitised output; present only when `display` was truncated.
    pub full_output: Option<String>,
}

impl FormattedOutput {
    pub fn truncated(&self) -> bool {
        self.full_output.is_some()
    }
}

/// Render `raw` and upload the full text to `store` when it had to be cut.
///
/// Upload failures are logged and otherwise ignored.
pub async fn render(raw: &str, store: &dyn OverflowStore) -> Rendered {
    let formatted = format_output(raw);
    let truncated = formatted.truncated();

    let overflow_key = match formatted.full_output {
        Some(full) => match store.upload(&full).await {
            Ok(key) => {
                debug!(key = %key, "uploaded full output");
                Some(key)
            }
            Err(e) => {
                warn!(error = %e, "failed to upload full output to paste service");
                None
            }
        },
        None => None,
    };

    Rendered {
        display: formatted.display,
        overflow_key,
        truncated,
    }
}

/// Everything in [`render`] except the upload.
pub fn format_output(raw: &str) -> FormattedOutput {
    let output = neutralize_mentions(raw.trim_matches(|c: char| c == ' ' || c == '\n'));

    if has_escape_run(&output) {
        return FormattedOutput {
            display: ESCAPE_WARNING.to_string(),
            full_output: None,
        };
    }

    let numbered = if output.contains('\n') {
        number_lines(&output)
    } else {
        output.clone()
    };

    let lines: Vec<&str> = numbered.split('\n').collect();
    let display = if lines.len() > MAX_LINES {
        let kept = lines[..MAX_LINES].join("\n");
        if kept.chars().count() >= MAX_CHARS {
            Some(format!("{}\n{TOO_LONG_TOO_MANY_LINES}", take_chars(&kept, MAX_CHARS)))
        } else {
            Some(format!("{kept}\n{TOO_MANY_LINES}"))
        }
    } else if numbered.chars().count() >= MAX_CHARS {
        Some(format!("{}\n{TOO_LONG}", take_chars(&numbered, MAX_CHARS)))
    } else {
        None
    };

    match display {
        Some(display) => FormattedOutput {
            display,
            full_output: Some(output),
        },
        None => FormattedOutput {
            display: numbered,
            full_output: None,
        },
    }
}

/// Insert a zero-width space after every mention trigger that lacks one.
///
/// Applying this twice gives the same text as applying it once.
pub fn neutralize_mentions(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut i = 0;

    while i < text.len() {
        let rest = &text[i..];
        if let Some(trigger) = MENTION_TRIGGERS.iter().find(|t| rest.starts_with(**t)) {
            out.push_str(trigger);
            i += trigger.len();
            if !text[i..].starts_with(ZERO_WIDTH_SPACE) {
                out.push(ZERO_WIDTH_SPACE);
            }
            continue;
        }
        let Some(c) = rest.chars().next() else {
            break;
        };
        out.push(c);
        i += c.len_utf8();
    }

    out
}

/// True if `text` has [`ESCAPE_RUN`] or more escape characters in a row.
pub fn has_escape_run(text: &str) -> bool {
    let mut run = 0;
    for c in text.chars() {
        if is_escape_char(c) {
            run += 1;
            if run >= ESCAPE_RUN {
                return true;
            }
        } else {
            run = 0;
        }
    }
    false
}

/// Prefix each line with `NNN | `, counting from 1.
fn number_lines(text: &str) -> String {
    text.split('\n')
        .enumerate()
        .map(|(i, line)| format!("{:03} | {}", i + 1, line))
        .collect::<Vec<_>>()
        .join("\n")
}

fn take_chars(text: &str, n: usize) -> &str {
    match text.char_indices().nth(n) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
