//! Limits, markers, and character classes shared by extraction and rendering.

/// Maximum number of output lines shown before truncating.
pub const MAX_LINES: usize = 10;

/// Maximum number of characters shown before truncating.
pub const MAX_CHARS: usize = 1000;

pub const TOO_MANY_LINES: &str = "... (truncated - too many lines)";
pub const TOO_LONG_TOO_MANY_LINES: &str = "... (truncated - too long, too many lines)";
pub const TOO_LONG: &str = "... (truncated - too long)";

pub const ESCAPE_WARNING: &str = "Code block escape attempt detected; will not output result";

pub const ZERO_WIDTH_SPACE: char = '\u{200B}';
pub const RIGHT_TO_LEFT_OVERRIDE: char = '\u{202E}';
pub const BACKTICK: char = '`';

/// A run of this many escape-class characters aborts rendering.
pub const ESCAPE_RUN: usize = 3;

/// Sequences that would ping a user or role if posted verbatim.
pub const MENTION_TRIGGERS: &[&str] = &["<@", "<!@"];

/// Characters that can break out of the reply's code block.
pub fn is_escape_char(c: char) -> bool {
    matches!(c, BACKTICK | RIGHT_TO_LEFT_OVERRIDE | ZERO_WIDTH_SPACE)
}

/// Blank in the "blank line" sense: spaces and tabs only.
pub fn is_blank_char(c: char) -> bool {
    c == ' ' || c == '\t'
}
