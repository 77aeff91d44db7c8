//! Text command parsing: `<prefix>eval <code>` or `@bot eval <code>`.

const COMMAND_NAMES: &[&str] = &["eval", "e"];

/// Return the code argument if `content` invokes the eval command.
///
/// Prefixes and the command name are matched case-insensitively. `bot_id`
/// enables the leading-mention prefix.
pub fn parse_eval_invocation<'a>(
    content: &'a str,
    prefixes: &[String],
    bot_id: Option<u64>,
) -> Option<&'a str> {
    let after_prefix = strip_bot_mention(content, bot_id).or_else(|| {
        prefixes
            .iter()
            .find_map(|p| strip_prefix_ignore_case(content, p))
    })?;

    let (name, rest) = match after_prefix.find(char::is_whitespace) {
        Some(i) => (&after_prefix[..i], &after_prefix[i..]),
        None => (after_prefix, ""),
    };
    COMMAND_NAMES
        .iter()
        .any(|c| name.eq_ignore_ascii_case(c))
        .then(|| rest.trim())
}

fn strip_prefix_ignore_case<'a>(content: &'a str, prefix: &str) -> Option<&'a str> {
    if prefix.is_empty() {
        return None;
    }
    let head = content.get(..prefix.len())?;
    head.eq_ignore_ascii_case(prefix)
        .then(|| &content[prefix.len()..])
}

/// Remove a leading `<@id>` / `<@!id>` mention of the bot.
fn strip_bot_mention(content: &str, bot_id: Option<u64>) -> Option<&str> {
    let id = bot_id?.to_string();
    let rest = content.strip_prefix("<@")?;
    let rest = rest.strip_prefix('!').unwrap_or(rest);
    let rest = rest.strip_prefix(id.as_str())?;
    rest.strip_prefix('>').map(str::trim_start)
}
